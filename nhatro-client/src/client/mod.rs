//! Top-level client
//!
//! [`NhaTroClient`] wires one transport, one session store, the auth store
//! and every resource service together. Nothing is global: build as many
//! independent clients as needed.

pub mod builder;
pub mod http;

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::assets::AssetResolver;
use crate::auth::AuthStore;
use crate::resource::ResourceClient;
use crate::services::{
    DashboardService, DepositService, EmployeeService, ReportService, RoomService,
};
use crate::session::{FileStorage, MemoryStorage, SessionStorage, SessionStore};
use crate::transport::Transport;
use crate::{ClientConfig, ClientResult};

pub use builder::NhaTroClientBuilder;
pub use self::http::{HttpClient, NetworkHttpClient};

pub struct NhaTroClient<H: HttpClient = NetworkHttpClient> {
    transport: Transport<H>,
    session: SessionStore,
    auth: AuthStore<H>,
    assets: AssetResolver,
    employees: EmployeeService<H>,
    rooms: RoomService<H>,
    deposits: DepositService<H>,
    reports: ReportService<H>,
    dashboard: DashboardService<H>,
}

impl<H: HttpClient> Clone for NhaTroClient<H> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            session: self.session.clone(),
            auth: self.auth.clone(),
            assets: self.assets.clone(),
            employees: self.employees.clone(),
            rooms: self.rooms.clone(),
            deposits: self.deposits.clone(),
            reports: self.reports.clone(),
            dashboard: self.dashboard.clone(),
        }
    }
}

impl<H: HttpClient> std::fmt::Debug for NhaTroClient<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NhaTroClient")
            .field("session", &self.session)
            .field("asset_origin", &self.assets.origin())
            .finish_non_exhaustive()
    }
}

impl NhaTroClient<NetworkHttpClient> {
    /// Client over the network, with storage chosen by `config.session_file`
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        config.validate()?;
        let http = NetworkHttpClient::new(config)?;
        Ok(Self::with_http(http, storage_for(config), config))
    }

    pub fn builder() -> NhaTroClientBuilder {
        NhaTroClientBuilder::new()
    }
}

impl<H: HttpClient> NhaTroClient<H> {
    /// Wire a client over any [`HttpClient`]; the session is restored from `storage`.
    pub fn with_http(http: H, storage: Arc<dyn SessionStorage>, config: &ClientConfig) -> Self {
        let session = SessionStore::new(storage);
        let transport = Transport::new(http, Arc::new(session.clone()));
        let assets = AssetResolver::new(&config.base_url);
        Self {
            auth: AuthStore::new(transport.clone(), session.clone()),
            employees: EmployeeService::new(transport.clone()),
            rooms: RoomService::new(transport.clone(), assets.clone()),
            deposits: DepositService::new(transport.clone(), config.public_submission_url.clone()),
            reports: ReportService::new(transport.clone()),
            dashboard: DashboardService::new(transport.clone()),
            transport,
            session,
            assets,
        }
    }

    pub fn transport(&self) -> &Transport<H> {
        &self.transport
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn auth(&self) -> &AuthStore<H> {
        &self.auth
    }

    pub fn assets(&self) -> &AssetResolver {
        &self.assets
    }

    pub fn employees(&self) -> &EmployeeService<H> {
        &self.employees
    }

    pub fn rooms(&self) -> &RoomService<H> {
        &self.rooms
    }

    pub fn deposits(&self) -> &DepositService<H> {
        &self.deposits
    }

    pub fn reports(&self) -> &ReportService<H> {
        &self.reports
    }

    pub fn dashboard(&self) -> &DashboardService<H> {
        &self.dashboard
    }

    /// Resource client for a collection without a dedicated service
    pub fn resource<T: DeserializeOwned>(&self, path: &str) -> ResourceClient<T, H> {
        ResourceClient::new(self.transport.clone(), path)
    }
}

pub(crate) fn storage_for(config: &ClientConfig) -> Arc<dyn SessionStorage> {
    match &config.session_file {
        Some(path) => Arc::new(FileStorage::new(path)),
        None => Arc::new(MemoryStorage::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::{GuardOutcome, RouteGuard};
    use crate::test_support::MockHttpClient;
    use ::http::StatusCode;
    use serde_json::json;
    use shared::QueryParams;

    #[tokio::test]
    async fn test_login_token_reaches_every_service() {
        let mock = MockHttpClient::new();
        let config = ClientConfig::default();
        let client = NhaTroClient::with_http(mock.clone(), Arc::new(MemoryStorage::new()), &config);

        mock.reply_json(
            StatusCode::OK,
            json!({ "data": { "access_token": "tok123", "user": {
                "MaTaiKhoan": 7, "MaQuyen": 2, "TenDangNhap": "alice", "TenQuyen": "Staff"
            } } }),
        );
        mock.reply_json(StatusCode::OK, json!({ "data": [] }));
        mock.reply_json(StatusCode::OK, json!({ "data": [] }));

        client.auth().login("alice", "secret1").await.unwrap();
        client.rooms().list(QueryParams::new(), None).await.unwrap();
        client.clone().employees().list(QueryParams::new(), None).await.unwrap();

        let requests = mock.requests();
        assert!(requests[0].bearer.is_none());
        assert_eq!(requests[1].bearer.as_deref(), Some("tok123"));
        assert_eq!(requests[2].bearer.as_deref(), Some("tok123"));

        assert_eq!(
            RouteGuard::admin_only().evaluate(client.session(), "/employees"),
            GuardOutcome::Redirect {
                to: "/forbidden".into(),
                from: None
            }
        );
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        assert!(NhaTroClient::new(&ClientConfig::new("ftp://example.com")).is_err());
    }

    #[test]
    fn test_file_session_is_restored() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig::default().with_session_file(dir.path().join("session.json"));

        let first = NhaTroClient::with_http(MockHttpClient::new(), storage_for(&config), &config);
        let user = shared::models::UserProfile::from_server(json!({
            "MaTaiKhoan": 1, "MaQuyen": 1, "TenDangNhap": "admin"
        }))
        .unwrap();
        first.session().establish("tok".into(), user).unwrap();

        let second = NhaTroClient::with_http(MockHttpClient::new(), storage_for(&config), &config);
        assert!(second.session().is_authenticated());
        assert!(second.session().has_role(shared::models::RoleCode::ADMIN));
    }
}
