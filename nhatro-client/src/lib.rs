//! NhaTro Client - API client for the boarding house management server
//!
//! Layers, leaf first:
//! - [`Transport`]: bearer injection, cancellation, failure classification
//! - [`ResourceClient`] and the per-resource [`services`]
//! - [`SessionStore`] / [`AuthStore`]: the persisted session and its lifecycle
//! - [`RouteGuard`]: role-based access decisions over the session
//!
//! [`NhaTroClient`] wires them together.

pub mod assets;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod guard;
pub mod latest;
pub mod logging;
pub mod resource;
pub mod services;
pub mod session;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use assets::AssetResolver;
pub use auth::{AuthStore, RegisterRequest};
pub use client::http::{FilePart, HttpClient, HttpRequest, HttpResponse, NetworkHttpClient};
pub use client::{NhaTroClient, NhaTroClientBuilder};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, ErrorKind, Notice};
pub use guard::{AccessView, GuardOutcome, GuardState, RouteGuard};
pub use latest::{LatestRequest, RequestTicket};
pub use resource::{DownloadedFile, ResourceClient};
pub use session::{FileStorage, MemoryStorage, Session, SessionStorage, SessionStore};
pub use transport::{TokenSource, Transport};

// Re-export shared types for convenience
pub use shared::models;
pub use shared::{ApiResponse, FieldErrors, ListPayload, Paginated, QueryParams, ResourceId};
pub use tokio_util::sync::CancellationToken;
