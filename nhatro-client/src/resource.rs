//! Generic resource client
//!
//! One [`ResourceClient`] per server-side collection. It only builds URLs
//! and decodes envelopes; filtering, sorting and validation happen on the
//! server, so query parameters and payloads are forwarded as given.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use shared::{ApiResponse, Keyed, ListBody, ListPayload, QueryParams, ResourceId};
use tokio_util::sync::CancellationToken;

use crate::client::http::{FilePart, HttpClient, HttpRequest, NetworkHttpClient};
use crate::transport::Transport;
use crate::{ClientError, ClientResult};

/// Field name used for uploads when the caller has no preference
pub const DEFAULT_UPLOAD_FIELD: &str = "file";

/// CRUD access to one collection endpoint
pub struct ResourceClient<T, H: HttpClient = NetworkHttpClient> {
    transport: Transport<H>,
    path: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T, H: HttpClient> Clone for ResourceClient<T, H> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            path: self.path.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T, H: HttpClient> std::fmt::Debug for ResourceClient<T, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceClient")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl<T, H> ResourceClient<T, H>
where
    T: DeserializeOwned,
    H: HttpClient,
{
    pub fn new(transport: Transport<H>, path: impl Into<String>) -> Self {
        Self {
            transport,
            path: path.into().trim_matches('/').to_string(),
            _marker: PhantomData,
        }
    }

    /// Resource root, relative to the API root
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn transport(&self) -> &Transport<H> {
        &self.transport
    }

    fn item_path(&self, id: ResourceId) -> String {
        format!("{}/{}", self.path, id)
    }

    fn sub_path(&self, sub: &str) -> String {
        let sub = sub.trim_matches('/');
        if sub.is_empty() {
            self.path.clone()
        } else {
            format!("{}/{}", self.path, sub)
        }
    }

    /// List the collection; the reply may be a plain sequence or a page.
    pub async fn list(
        &self,
        query: QueryParams,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<ApiResponse<ListPayload<T>>> {
        let body: ListBody<T> = self
            .transport
            .send_as(HttpRequest::get(&self.path).query(query), cancel)
            .await?;
        Ok(body.into())
    }

    pub async fn get(
        &self,
        id: ResourceId,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<ApiResponse<T>> {
        self.transport
            .send(HttpRequest::get(self.item_path(id)), cancel)
            .await
    }

    pub async fn create<B: Serialize + ?Sized>(&self, payload: &B) -> ClientResult<ApiResponse<T>> {
        let request = HttpRequest::post(&self.path).json(payload)?;
        self.transport.send(request, None).await
    }

    /// Full replace (PUT)
    pub async fn update<B: Serialize + ?Sized>(
        &self,
        id: ResourceId,
        payload: &B,
    ) -> ClientResult<ApiResponse<T>> {
        let request = HttpRequest::put(self.item_path(id)).json(payload)?;
        self.transport.send(request, None).await
    }

    /// Partial merge (PATCH)
    pub async fn patch<B: Serialize + ?Sized>(
        &self,
        id: ResourceId,
        payload: &B,
    ) -> ClientResult<ApiResponse<T>> {
        let request = HttpRequest::patch(self.item_path(id)).json(payload)?;
        self.transport.send(request, None).await
    }

    pub async fn delete(&self, id: ResourceId) -> ClientResult<ApiResponse<()>> {
        self.transport
            .send_unit(HttpRequest::delete(self.item_path(id)), None)
            .await
    }

    /// Delete several records at once.
    ///
    /// An empty id list succeeds locally without contacting the server.
    pub async fn bulk_delete(&self, ids: &[ResourceId]) -> ClientResult<ApiResponse<()>> {
        if ids.is_empty() {
            tracing::debug!(path = %self.path, "Skipping bulk delete of empty id list");
            return Ok(ApiResponse::default());
        }
        let request = HttpRequest::post(self.sub_path("bulk-delete")).json(&json!({ "ids": ids }))?;
        self.transport.send_unit(request, None).await
    }

    /// GET `<path>/<sub>` with a caller-chosen payload type
    pub async fn custom_get<R: DeserializeOwned>(
        &self,
        sub: &str,
        query: QueryParams,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<ApiResponse<R>> {
        self.transport
            .send(HttpRequest::get(self.sub_path(sub)).query(query), cancel)
            .await
    }

    pub async fn custom_post<R, B>(&self, sub: &str, payload: Option<&B>) -> ClientResult<ApiResponse<R>>
    where
        R: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let mut request = HttpRequest::post(self.sub_path(sub));
        if let Some(payload) = payload {
            request = request.json(payload)?;
        }
        self.transport.send(request, None).await
    }

    pub async fn custom_put<R, B>(&self, sub: &str, payload: Option<&B>) -> ClientResult<ApiResponse<R>>
    where
        R: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let mut request = HttpRequest::put(self.sub_path(sub));
        if let Some(payload) = payload {
            request = request.json(payload)?;
        }
        self.transport.send(request, None).await
    }

    pub async fn custom_delete<R: DeserializeOwned>(&self, sub: &str) -> ClientResult<ApiResponse<R>> {
        self.transport
            .send(HttpRequest::delete(self.sub_path(sub)), None)
            .await
    }

    /// GET `<path>/<sub>` and return the raw body (exports)
    pub async fn custom_bytes(
        &self,
        sub: &str,
        query: QueryParams,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<Vec<u8>> {
        self.transport
            .send_bytes(HttpRequest::get(self.sub_path(sub)).query(query), cancel)
            .await
    }

    /// Upload a file as multipart under `field`
    pub async fn upload_file(
        &self,
        id: ResourceId,
        file: FilePart,
        field: &str,
    ) -> ClientResult<ApiResponse<T>> {
        let request = HttpRequest::post(format!("{}/upload", self.item_path(id))).multipart(field, file);
        self.transport.send(request, None).await
    }

    /// Fetch a file; the name is supplied by the caller, not the response.
    pub async fn download_file(
        &self,
        id: ResourceId,
        file_name: impl Into<String>,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<DownloadedFile> {
        let bytes = self
            .transport
            .send_bytes(HttpRequest::get(format!("{}/download", self.item_path(id))), cancel)
            .await?;
        Ok(DownloadedFile {
            file_name: file_name.into(),
            bytes,
        })
    }
}

impl<T, H> ResourceClient<T, H>
where
    T: DeserializeOwned + Keyed,
    H: HttpClient,
{
    /// Re-fetch a record the caller already holds
    pub async fn reload(&self, item: &T) -> ClientResult<ApiResponse<T>> {
        self.get(item.key(), None).await
    }
}

/// Downloaded file contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl DownloadedFile {
    /// Write the file into `dir`, returning the full path.
    ///
    /// Only the final component of `file_name` is used.
    pub async fn save_to(&self, dir: impl AsRef<Path>) -> ClientResult<PathBuf> {
        let name = Path::new(&self.file_name)
            .file_name()
            .ok_or_else(|| ClientError::Storage(format!("Invalid file name: {}", self.file_name)))?;
        let path = dir.as_ref().join(name);
        tokio::fs::write(&path, &self.bytes)
            .await
            .map_err(|e| ClientError::Storage(format!("Failed to write {}: {}", path.display(), e)))?;
        tracing::debug!(path = %path.display(), size = self.bytes.len(), "Saved downloaded file");
        Ok(path)
    }
}
