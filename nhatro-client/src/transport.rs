//! Transport - credentials, cancellation and failure classification
//!
//! Wraps an [`HttpClient`] and is shared by every resource client and the
//! auth store. The bearer token is read from the [`TokenSource`] on every
//! call, so a login or logout takes effect on the next request.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::ApiResponse;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::client::http::{HttpClient, HttpRequest, HttpResponse, NetworkHttpClient};
use crate::{ClientError, ClientResult};

/// Supplies the current bearer token
pub trait TokenSource: Send + Sync {
    fn bearer_token(&self) -> Option<String>;
}

/// Shared request plumbing
pub struct Transport<H: HttpClient = NetworkHttpClient> {
    http: Arc<H>,
    tokens: Arc<dyn TokenSource>,
}

impl<H: HttpClient> Clone for Transport<H> {
    fn clone(&self) -> Self {
        Self {
            http: Arc::clone(&self.http),
            tokens: Arc::clone(&self.tokens),
        }
    }
}

impl<H: HttpClient> std::fmt::Debug for Transport<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport").finish_non_exhaustive()
    }
}

impl<H: HttpClient> Transport<H> {
    pub fn new(http: H, tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            http: Arc::new(http),
            tokens,
        }
    }

    /// Underlying HTTP client
    pub fn http(&self) -> &H {
        &self.http
    }

    /// Perform one exchange and return the successful raw reply.
    ///
    /// Cancellation is checked before the call is issued, raced against
    /// the exchange, and checked again before the reply is handed back, so
    /// a superseded request never resolves into caller-visible state.
    pub async fn exchange(
        &self,
        mut request: HttpRequest,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<HttpResponse> {
        if request.query.strip_reserved() {
            tracing::debug!(path = %request.target_str(), "Dropped reserved `signal` query parameter");
        }
        request.bearer = if request.public {
            None
        } else {
            self.tokens.bearer_token()
        };

        if cancel.is_some_and(CancellationToken::is_cancelled) {
            return Err(ClientError::Cancelled);
        }

        let request_id = Uuid::new_v4();
        let method = request.method.clone();
        let path = request.target_str().to_string();
        let public = request.public;
        tracing::debug!(%request_id, %method, %path, "Sending request");

        let outcome = match cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => {
                    tracing::debug!(%request_id, "Request cancelled in flight");
                    return Err(ClientError::Cancelled);
                }
                result = self.http.execute(request) => result,
            },
            None => self.http.execute(request).await,
        };

        if cancel.is_some_and(CancellationToken::is_cancelled) {
            tracing::debug!(%request_id, "Discarding reply of cancelled request");
            return Err(ClientError::Cancelled);
        }

        let response = outcome.inspect_err(|e| {
            tracing::warn!(%request_id, %method, %path, error = %e, "Request failed");
        })?;

        tracing::debug!(%request_id, status = %response.status, "Received response");

        if !response.status.is_success() {
            let err = ClientError::from_status(response.status, &response.body, public);
            if response.status.is_server_error() {
                tracing::warn!(%request_id, %method, %path, status = %response.status, "Server error");
            }
            return Err(err);
        }
        Ok(response)
    }

    /// Exchange and decode the body as `B`.
    ///
    /// A successful status whose body still carries field `errors` is
    /// reported as a validation failure.
    pub async fn send_as<B: DeserializeOwned>(
        &self,
        request: HttpRequest,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<B> {
        let public = request.public;
        let response = self.exchange(request, cancel).await?;
        let value: Value = if response.body.iter().all(u8::is_ascii_whitespace) {
            Value::Object(Default::default())
        } else {
            serde_json::from_slice(&response.body)
                .map_err(|e| ClientError::InvalidResponse(format!("Body is not JSON: {}", e)))?
        };

        if value
            .get("errors")
            .and_then(Value::as_object)
            .is_some_and(|errors| !errors.is_empty())
        {
            return Err(ClientError::from_status(
                response.status,
                &response.body,
                public,
            ));
        }

        serde_json::from_value(value).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    /// Exchange and decode the standard envelope
    pub async fn send<T: DeserializeOwned>(
        &self,
        request: HttpRequest,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<ApiResponse<T>> {
        self.send_as(request, cancel).await
    }

    /// Exchange and decode an envelope whose payload is ignored
    pub async fn send_unit(
        &self,
        request: HttpRequest,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<ApiResponse<()>> {
        let envelope: ApiResponse<serde::de::IgnoredAny> = self.send_as(request, cancel).await?;
        Ok(envelope.map(|_| ()))
    }

    /// Exchange and return the raw body bytes (file downloads)
    pub async fn send_bytes(
        &self,
        request: HttpRequest,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<Vec<u8>> {
        Ok(self.exchange(request, cancel).await?.body)
    }
}
