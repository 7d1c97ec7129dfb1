//! Revenue reports (`bao_cao`)

use std::ops::Deref;

use shared::models::{MonthlyComparison, Report};
use shared::{ApiResponse, QueryParams};
use tokio_util::sync::CancellationToken;

use crate::ClientResult;
use crate::client::http::{HttpClient, NetworkHttpClient};
use crate::resource::ResourceClient;
use crate::transport::Transport;

pub const REPORTS_PATH: &str = "reports";

#[derive(Debug)]
pub struct ReportService<H: HttpClient = NetworkHttpClient> {
    resource: ResourceClient<Report, H>,
}

impl<H: HttpClient> Clone for ReportService<H> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
        }
    }
}

impl<H: HttpClient> ReportService<H> {
    pub fn new(transport: Transport<H>) -> Self {
        Self {
            resource: ResourceClient::new(transport, REPORTS_PATH),
        }
    }

    /// Revenue of `month`/`year` against the month before
    pub async fn monthly_comparison(
        &self,
        year: i32,
        month: u32,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<ApiResponse<MonthlyComparison>> {
        let query = QueryParams::new().with("nam", year).with("thang", month);
        self.resource.custom_get("so-sanh-thang", query, cancel).await
    }

    /// Rendered PDF of the reports matching `query`
    pub async fn export_pdf(
        &self,
        query: QueryParams,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<Vec<u8>> {
        self.resource.custom_bytes("export/pdf", query, cancel).await
    }
}

impl<H: HttpClient> Deref for ReportService<H> {
    type Target = ResourceClient<Report, H>;

    fn deref(&self) -> &Self::Target {
        &self.resource
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockHttpClient, StaticToken};
    use http::StatusCode;
    use rust_decimal::Decimal;
    use serde_json::json;
    use std::sync::Arc;

    fn service(mock: &MockHttpClient) -> ReportService<MockHttpClient> {
        ReportService::new(Transport::new(
            mock.clone(),
            Arc::new(StaticToken(Some("tok".into()))),
        ))
    }

    #[tokio::test]
    async fn test_monthly_comparison() {
        let mock = MockHttpClient::new();
        mock.reply_json(
            StatusCode::OK,
            json!({ "data": { "ThangHienTai": 12000000, "ThangTruoc": 10000000, "TiLeThayDoi": 20 } }),
        );

        let comparison = service(&mock)
            .monthly_comparison(2026, 9, None)
            .await
            .unwrap()
            .data
            .unwrap();
        assert_eq!(comparison.change_percent, Some(Decimal::new(20, 0)));

        let sent = &mock.requests()[0];
        assert_eq!(sent.target_str(), "reports/so-sanh-thang");
        assert_eq!(sent.query.get("nam"), Some("2026"));
        assert_eq!(sent.query.get("thang"), Some("9"));
    }

    #[tokio::test]
    async fn test_export_pdf_returns_bytes() {
        let mock = MockHttpClient::new();
        mock.reply_raw(StatusCode::OK, b"%PDF-1.7 report".to_vec());

        let bytes = service(&mock)
            .export_pdf(QueryParams::new().with("nam", 2026), None)
            .await
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert_eq!(mock.requests()[0].target_str(), "reports/export/pdf");
    }
}
