//! Client error types
//!
//! The transport is the only place that turns raw HTTP outcomes into a
//! [`ClientError`]; every layer above passes it through unchanged.

use reqwest::StatusCode;
use shared::{ApiResponse, FieldErrors};
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Request rejected with field-level validation messages
    #[error("{message}")]
    Validation { message: String, errors: FieldErrors },

    /// Missing, expired or revoked session
    #[error("Authentication required: {0}")]
    Unauthenticated(String),

    /// Credentials rejected by a public endpoint (login)
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Resource already exists or state conflict
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Server answered with a failure status
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Connection failure or timeout
    #[error("Network error: {0}")]
    Network(String),

    /// Caller-initiated cancellation
    #[error("Request cancelled")]
    Cancelled,

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Session persistence failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Failure category, used to decide how a failure is surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ValidationFailed,
    Unauthenticated,
    InvalidCredentials,
    Forbidden,
    NotFound,
    Conflict,
    NetworkOrServerFailure,
    Cancelled,
    Local,
}

/// User-visible notification for a failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: &'static str,
    pub message: String,
    /// Per-field messages for inline form display
    pub fields: FieldErrors,
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::ValidationFailed,
            Self::Unauthenticated(_) => ErrorKind::Unauthenticated,
            Self::InvalidCredentials(_) => ErrorKind::InvalidCredentials,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Server { .. } | Self::Network(_) | Self::InvalidResponse(_) => {
                ErrorKind::NetworkOrServerFailure
            }
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Serialization(_) | Self::Storage(_) | Self::Config(_) => ErrorKind::Local,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Field errors of a validation failure
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation { errors, .. } => Some(errors),
            _ => None,
        }
    }

    /// HTTP status the failure was classified from, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            Self::Unauthenticated(_) => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::NotFound(_) => Some(404),
            Self::Conflict(_) => Some(409),
            _ => None,
        }
    }

    /// Notification to show the user; `None` for cancellations.
    pub fn notice(&self) -> Option<Notice> {
        let title = match self.kind() {
            ErrorKind::Cancelled => return None,
            ErrorKind::ValidationFailed => "Dữ liệu không hợp lệ",
            ErrorKind::Unauthenticated => "Phiên đăng nhập đã hết hạn",
            ErrorKind::InvalidCredentials => "Đăng nhập thất bại",
            ErrorKind::Forbidden => "Không có quyền truy cập",
            ErrorKind::NotFound => "Không tìm thấy",
            ErrorKind::Conflict => "Dữ liệu bị trùng",
            ErrorKind::NetworkOrServerFailure => "Lỗi kết nối",
            ErrorKind::Local => "Lỗi",
        };
        let message = match self {
            Self::Validation { message, .. }
            | Self::Unauthenticated(message)
            | Self::InvalidCredentials(message)
            | Self::Forbidden(message)
            | Self::NotFound(message)
            | Self::Conflict(message)
            | Self::Server { message, .. }
            | Self::Network(message) => message.clone(),
            other => other.to_string(),
        };
        Some(Notice {
            title,
            message,
            fields: self.field_errors().cloned().unwrap_or_default(),
        })
    }

    /// Classify a failed (or error-carrying) HTTP exchange.
    ///
    /// A body with non-empty `errors` is always a validation failure,
    /// whatever the status. `public` requests never report
    /// `Unauthenticated`; a 401 there means the submitted credentials
    /// were rejected.
    pub fn from_status(status: StatusCode, body: &[u8], public: bool) -> Self {
        let envelope: ApiResponse<serde::de::IgnoredAny> =
            serde_json::from_slice(body).unwrap_or_default();

        let message = envelope
            .message
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| default_message(status).to_string());

        if envelope.has_errors() {
            return Self::Validation {
                message,
                errors: envelope.errors.unwrap_or_default(),
            };
        }

        match status {
            StatusCode::UNAUTHORIZED if public => Self::InvalidCredentials(message),
            StatusCode::UNAUTHORIZED => Self::Unauthenticated(message),
            StatusCode::FORBIDDEN => Self::Forbidden(message),
            StatusCode::NOT_FOUND => Self::NotFound(message),
            StatusCode::CONFLICT => Self::Conflict(message),
            StatusCode::UNPROCESSABLE_ENTITY => Self::Validation {
                message,
                errors: FieldErrors::new(),
            },
            _ => Self::Server {
                status: status.as_u16(),
                message,
            },
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Network("Request timed out".into())
        } else if e.is_builder() {
            Self::Config(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}

fn default_message(status: StatusCode) -> &'static str {
    match status {
        StatusCode::UNAUTHORIZED => "Unauthenticated",
        StatusCode::FORBIDDEN => "This action is unauthorized",
        StatusCode::NOT_FOUND => "Resource not found",
        StatusCode::CONFLICT => "Resource already exists",
        StatusCode::UNPROCESSABLE_ENTITY => "The given data was invalid",
        s if s.is_server_error() => "Internal server error",
        _ => "Request failed",
    }
}
