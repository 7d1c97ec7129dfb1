// nhatro-client/src/client/http.rs
// HTTP client - raw network exchange

use async_trait::async_trait;
use http::{Method, StatusCode};
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use shared::QueryParams;

use crate::{ClientConfig, ClientError, ClientResult};

/// Where a request goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Path relative to the API root
    Api(String),
    /// Absolute URL outside the authenticated API root
    Absolute(String),
}

/// File sent as a multipart part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime: Option<String>,
}

impl FilePart {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
            mime: None,
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    Multipart { field: String, file: FilePart },
}

/// A single HTTP call, before the transport attaches credentials
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub target: Target,
    pub query: QueryParams,
    pub body: RequestBody,
    pub headers: Vec<(String, String)>,
    /// Bearer token, filled in by the transport at call time
    pub bearer: Option<String>,
    /// Reachable without a session; never sends a token
    pub public: bool,
}

impl HttpRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            target: Target::Api(path.into()),
            query: QueryParams::new(),
            body: RequestBody::Empty,
            headers: Vec::new(),
            bearer: None,
            public: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Request to an absolute URL outside the API root
    pub fn absolute(method: Method, url: impl Into<String>) -> Self {
        Self {
            target: Target::Absolute(url.into()),
            ..Self::new(method, String::new())
        }
    }

    pub fn query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> ClientResult<Self> {
        self.body = RequestBody::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn multipart(mut self, field: impl Into<String>, file: FilePart) -> Self {
        self.body = RequestBody::Multipart {
            field: field.into(),
            file,
        };
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn public(mut self) -> Self {
        self.public = true;
        self
    }

    /// Path or URL, for logging
    pub fn target_str(&self) -> &str {
        match &self.target {
            Target::Api(path) | Target::Absolute(path) => path,
        }
    }
}

/// Raw reply: status plus body bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// HTTP client trait
///
/// Performs one exchange and reports the raw outcome. Status codes are
/// not interpreted here; only connection failures and timeouts are errors.
#[async_trait]
pub trait HttpClient: Send + Sync + 'static {
    async fn execute(&self, request: HttpRequest) -> ClientResult<HttpResponse>;
}

/// Network HTTP client
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
}

impl NetworkHttpClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// API root URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, target: &Target) -> String {
        match target {
            Target::Api(path) => format!("{}/{}", self.base_url, path.trim_start_matches('/')),
            Target::Absolute(url) => url.clone(),
        }
    }
}

#[async_trait]
impl HttpClient for NetworkHttpClient {
    async fn execute(&self, request: HttpRequest) -> ClientResult<HttpResponse> {
        let url = self.url_for(&request.target);
        let HttpRequest {
            method,
            query,
            body,
            headers,
            bearer,
            ..
        } = request;

        let mut req = self.client.request(method, &url);
        if !query.is_empty() {
            req = req.query(&query.into_pairs());
        }
        for (name, value) in headers {
            req = req.header(name, value);
        }
        if let Some(token) = bearer {
            req = req.bearer_auth(token);
        }
        req = match body {
            RequestBody::Empty => req,
            RequestBody::Json(value) => req.json(&value),
            RequestBody::Multipart { field, file } => {
                let mut part = Part::bytes(file.bytes).file_name(file.file_name);
                if let Some(mime) = file.mime {
                    part = part.mime_str(&mime)?;
                }
                req.multipart(Form::new().part(field, part))
            }
        };

        let response = req.send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();
        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for_joins_without_double_slash() {
        let config = ClientConfig::new("http://localhost:8000/api/");
        let client = NetworkHttpClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000/api");
        assert_eq!(
            client.url_for(&Target::Api("/rooms/1".into())),
            "http://localhost:8000/api/rooms/1"
        );
        assert_eq!(
            client.url_for(&Target::Absolute("https://forms.example.com/dat-coc".into())),
            "https://forms.example.com/dat-coc"
        );
    }

    #[test]
    fn test_request_builders() {
        let request = HttpRequest::post("deposits")
            .json(&serde_json::json!({ "MaPhong": 1 }))
            .unwrap()
            .header("X-Trace", "abc")
            .public();
        assert_eq!(request.method, Method::POST);
        assert!(request.public);
        assert!(matches!(request.body, RequestBody::Json(_)));
        assert_eq!(request.target_str(), "deposits");
    }
}
