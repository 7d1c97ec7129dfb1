//! Shared types for the boarding house client
//!
//! Wire types used by every client surface: response envelopes,
//! query parameters and the API resource models.

pub mod models;
pub mod request;
pub mod response;
pub mod types;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use request::QueryParams;
pub use response::{ApiResponse, FieldErrors, ListBody, ListPayload, Paginated};
pub use types::{Keyed, ResourceId};
