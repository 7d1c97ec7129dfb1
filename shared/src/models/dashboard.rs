//! Dashboard Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Headline figures shown on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardOverview {
    #[serde(rename = "TongSoPhong")]
    pub total_rooms: u32,
    #[serde(rename = "SoPhongTrong")]
    pub vacant_rooms: u32,
    #[serde(rename = "SoKhachThue", default)]
    pub tenants: u32,
    #[serde(rename = "DoanhThuThang", default)]
    pub monthly_revenue: Decimal,
    #[serde(rename = "DatCocChoDuyet", default)]
    pub pending_deposits: u32,
}
