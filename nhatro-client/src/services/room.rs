//! Rooms (`phong`)

use std::ops::Deref;

use shared::models::Room;
use shared::{ApiResponse, ListBody, ListPayload, QueryParams};
use tokio_util::sync::CancellationToken;

use crate::ClientResult;
use crate::assets::AssetResolver;
use crate::client::http::{HttpClient, HttpRequest, NetworkHttpClient};
use crate::resource::ResourceClient;
use crate::transport::Transport;

pub const ROOMS_PATH: &str = "rooms";
/// Room listing reachable without a session
pub const PUBLIC_ROOMS_PATH: &str = "public/rooms";

#[derive(Debug)]
pub struct RoomService<H: HttpClient = NetworkHttpClient> {
    resource: ResourceClient<Room, H>,
    assets: AssetResolver,
}

impl<H: HttpClient> Clone for RoomService<H> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
            assets: self.assets.clone(),
        }
    }
}

impl<H: HttpClient> RoomService<H> {
    pub fn new(transport: Transport<H>, assets: AssetResolver) -> Self {
        Self {
            resource: ResourceClient::new(transport, ROOMS_PATH),
            assets,
        }
    }

    /// Rooms currently free to rent
    pub async fn available(
        &self,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<ApiResponse<Vec<Room>>> {
        self.resource
            .custom_get("available", QueryParams::new(), cancel)
            .await
    }

    /// Public room listing; sends no token.
    pub async fn public_list(
        &self,
        query: QueryParams,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<ApiResponse<ListPayload<Room>>> {
        let request = HttpRequest::get(PUBLIC_ROOMS_PATH).query(query).public();
        let body: ListBody<Room> = self.resource.transport().send_as(request, cancel).await?;
        Ok(body.into())
    }

    /// Absolute URL of the room's image, if it has one
    pub fn image_url(&self, room: &Room) -> Option<String> {
        self.assets.resolve(room.image.as_deref())
    }
}

impl<H: HttpClient> Deref for RoomService<H> {
    type Target = ResourceClient<Room, H>;

    fn deref(&self) -> &Self::Target {
        &self.resource
    }
}
