//! Data models
//!
//! Shapes of the boarding house API resources. Server field names are
//! Vietnamese PascalCase (`MaPhong`, `HoTen`, ...) and are mapped with
//! serde renames. All IDs are `i64`.

pub mod dashboard;
pub mod deposit;
pub mod employee;
pub mod report;
pub mod role;
pub mod room;
pub mod user;

// Re-exports
pub use dashboard::*;
pub use deposit::*;
pub use employee::*;
pub use report::*;
pub use role::*;
pub use room::*;
pub use user::*;
