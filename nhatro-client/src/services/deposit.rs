//! Deposits (`dat_coc`)

use std::ops::Deref;

use http::Method;
use shared::models::{Deposit, DepositCreate};
use shared::{ApiResponse, ResourceId};

use crate::ClientResult;
use crate::client::http::{HttpClient, HttpRequest, NetworkHttpClient};
use crate::resource::ResourceClient;
use crate::transport::Transport;

pub const DEPOSITS_PATH: &str = "deposits";
/// Booking form endpoint reachable without a session
pub const PUBLIC_DEPOSITS_PATH: &str = "public/deposits";

#[derive(Debug)]
pub struct DepositService<H: HttpClient = NetworkHttpClient> {
    resource: ResourceClient<Deposit, H>,
    public_submission_url: Option<String>,
}

impl<H: HttpClient> Clone for DepositService<H> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
            public_submission_url: self.public_submission_url.clone(),
        }
    }
}

impl<H: HttpClient> DepositService<H> {
    /// `public_submission_url` overrides where public bookings are posted
    pub fn new(transport: Transport<H>, public_submission_url: Option<String>) -> Self {
        Self {
            resource: ResourceClient::new(transport, DEPOSITS_PATH),
            public_submission_url,
        }
    }

    /// Submit a booking from the public form; sends no token.
    pub async fn submit_public(&self, payload: &DepositCreate) -> ClientResult<ApiResponse<Deposit>> {
        let request = match &self.public_submission_url {
            Some(url) => HttpRequest::absolute(Method::POST, url),
            None => HttpRequest::post(PUBLIC_DEPOSITS_PATH),
        };
        let request = request.json(payload)?.public();
        self.resource.transport().send(request, None).await
    }

    pub async fn confirm(&self, id: ResourceId) -> ClientResult<ApiResponse<Deposit>> {
        self.resource
            .custom_put::<_, ()>(&format!("{id}/confirm"), None)
            .await
    }

    pub async fn cancel(&self, id: ResourceId) -> ClientResult<ApiResponse<Deposit>> {
        self.resource
            .custom_put::<_, ()>(&format!("{id}/cancel"), None)
            .await
    }
}

impl<H: HttpClient> Deref for DepositService<H> {
    type Target = ResourceClient<Deposit, H>;

    fn deref(&self) -> &Self::Target {
        &self.resource
    }
}
