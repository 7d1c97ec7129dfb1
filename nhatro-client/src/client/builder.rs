//! Builder for [`NhaTroClient`] construction.

use std::path::PathBuf;
use std::sync::Arc;

use crate::session::SessionStorage;
use crate::{ClientConfig, ClientError, ClientResult};

use super::{NetworkHttpClient, NhaTroClient, storage_for};

/// Builder for `NhaTroClient` over the network.
///
/// # Example
///
/// ```no_run
/// use nhatro_client::NhaTroClient;
///
/// let client = NhaTroClient::builder()
///     .base_url("http://localhost:8000/api")
///     .session_file("./session.json")
///     .build()
///     .expect("Failed to build client");
/// ```
#[derive(Default)]
pub struct NhaTroClientBuilder {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    session_file: Option<PathBuf>,
    public_submission_url: Option<String>,
    storage: Option<Arc<dyn SessionStorage>>,
}

impl std::fmt::Debug for NhaTroClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NhaTroClientBuilder")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("session_file", &self.session_file)
            .field("public_submission_url", &self.public_submission_url)
            .field("custom_storage", &self.storage.is_some())
            .finish()
    }
}

impl NhaTroClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            base_url: Some(config.base_url.clone()),
            timeout_secs: Some(config.timeout_secs),
            session_file: config.session_file.clone(),
            public_submission_url: config.public_submission_url.clone(),
            storage: None,
        }
    }

    /// API root URL (e.g., "http://localhost:8000/api")
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn timeout_secs(mut self, seconds: u64) -> Self {
        self.timeout_secs = Some(seconds);
        self
    }

    /// Persist the session to a JSON file
    pub fn session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = Some(path.into());
        self
    }

    pub fn public_submission_url(mut self, url: impl Into<String>) -> Self {
        self.public_submission_url = Some(url.into());
        self
    }

    /// Use a custom storage backend; takes precedence over `session_file`.
    pub fn storage(mut self, storage: Arc<dyn SessionStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn build(self) -> ClientResult<NhaTroClient<NetworkHttpClient>> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Config("base_url is required".into()))?;

        let mut config = ClientConfig::new(base_url);
        if let Some(seconds) = self.timeout_secs {
            config = config.with_timeout(seconds);
        }
        config.session_file = self.session_file;
        config.public_submission_url = self.public_submission_url;
        config.validate()?;

        let storage = self.storage.unwrap_or_else(|| storage_for(&config));
        let http = NetworkHttpClient::new(&config)?;
        Ok(NhaTroClient::with_http(http, storage, &config))
    }
}
