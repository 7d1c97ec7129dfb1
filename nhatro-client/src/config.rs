//! Client configuration

use std::path::PathBuf;
use std::time::Duration;

use crate::{ClientError, ClientResult};

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration for connecting to the boarding house API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root URL (e.g., "http://localhost:8000/api")
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// File the session is persisted to; in-memory when `None`
    pub session_file: Option<PathBuf>,

    /// Absolute URL of the public deposit submission endpoint, when it
    /// lives outside the API root
    pub public_submission_url: Option<String>,

    /// User-Agent header value
    pub user_agent: String,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            session_file: None,
            public_submission_url: None,
            user_agent: concat!("nhatro-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Load configuration from environment variables
    ///
    /// - `NHATRO_API_URL` (required)
    /// - `NHATRO_TIMEOUT_SECS` (default 30)
    /// - `NHATRO_SESSION_FILE` (optional)
    /// - `NHATRO_PUBLIC_SUBMIT_URL` (optional)
    pub fn from_env() -> ClientResult<Self> {
        Self::from_env_with_base_url(None)
    }

    /// Like [`from_env`](Self::from_env), but `base_url` (when given)
    /// replaces `NHATRO_API_URL`, which then need not be set.
    pub fn from_env_with_base_url(base_url: Option<String>) -> ClientResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok(), base_url)
    }

    fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        base_url: Option<String>,
    ) -> ClientResult<Self> {
        let var = |key: &str| lookup(key).filter(|s| !s.is_empty());

        let base_url = base_url
            .or_else(|| var("NHATRO_API_URL"))
            .ok_or_else(|| ClientError::Config("NHATRO_API_URL must be set".into()))?;

        let timeout_secs = match var("NHATRO_TIMEOUT_SECS") {
            Some(raw) => raw.parse().map_err(|_| {
                ClientError::Config(format!("NHATRO_TIMEOUT_SECS is not a number: {raw}"))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let mut config = Self::new(base_url).with_timeout(timeout_secs);
        config.session_file = var("NHATRO_SESSION_FILE").map(PathBuf::from);
        config.public_submission_url = var("NHATRO_PUBLIC_SUBMIT_URL");
        config.validate()?;
        Ok(config)
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_secs = seconds;
        self
    }

    /// Persist the session to a file
    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = Some(path.into());
        self
    }

    /// Send public deposit submissions to an absolute URL
    pub fn with_public_submission_url(mut self, url: impl Into<String>) -> Self {
        self.public_submission_url = Some(url.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> ClientResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "base_url must be an http(s) URL: {}",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ClientError::Config("timeout must be greater than zero".into()));
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8000/api")
    }
}
