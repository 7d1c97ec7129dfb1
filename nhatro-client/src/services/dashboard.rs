//! Dashboard figures

use shared::ApiResponse;
use shared::models::DashboardOverview;
use tokio_util::sync::CancellationToken;

use crate::ClientResult;
use crate::client::http::{HttpClient, HttpRequest, NetworkHttpClient};
use crate::transport::Transport;

pub const DASHBOARD_PATH: &str = "dashboard";

/// Read-only; the dashboard is not a keyed collection.
#[derive(Debug)]
pub struct DashboardService<H: HttpClient = NetworkHttpClient> {
    transport: Transport<H>,
}

impl<H: HttpClient> Clone for DashboardService<H> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
        }
    }
}

impl<H: HttpClient> DashboardService<H> {
    pub fn new(transport: Transport<H>) -> Self {
        Self { transport }
    }

    pub async fn overview(
        &self,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<ApiResponse<DashboardOverview>> {
        self.transport
            .send(HttpRequest::get(DASHBOARD_PATH), cancel)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockHttpClient, StaticToken};
    use http::StatusCode;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_overview() {
        let mock = MockHttpClient::new();
        mock.reply_json(
            StatusCode::OK,
            json!({ "data": { "TongSoPhong": 12, "SoPhongTrong": 3, "SoKhachThue": 14, "DoanhThuThang": "30500000", "DatCocChoDuyet": 2 } }),
        );
        let service = DashboardService::new(Transport::new(mock.clone(), Arc::new(StaticToken(None))));

        let overview = service.overview(None).await.unwrap().data.unwrap();
        assert_eq!(overview.total_rooms, 12);
        assert_eq!(overview.vacant_rooms, 3);
        assert_eq!(mock.requests()[0].target_str(), "dashboard");
    }
}
