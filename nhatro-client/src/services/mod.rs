//! Per-resource services
//!
//! Each service wraps a [`ResourceClient`](crate::ResourceClient) for its
//! collection and adds the endpoints that do not fit plain CRUD. The plain
//! CRUD operations are reached through `Deref`.

pub mod dashboard;
pub mod deposit;
pub mod employee;
pub mod report;
pub mod room;

pub use dashboard::DashboardService;
pub use deposit::DepositService;
pub use employee::EmployeeService;
pub use report::ReportService;
pub use room::RoomService;
