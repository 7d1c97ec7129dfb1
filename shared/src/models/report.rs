//! Report Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Keyed, ResourceId};

/// Monthly revenue report (`bao_cao`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    #[serde(rename = "MaBaoCao")]
    pub id: ResourceId,
    #[serde(rename = "Thang")]
    pub month: u32,
    #[serde(rename = "Nam")]
    pub year: i32,
    #[serde(rename = "TongDoanhThu")]
    pub revenue: Decimal,
    #[serde(rename = "TongChiPhi", default)]
    pub expenses: Option<Decimal>,
    #[serde(rename = "SoPhongDaThue", default)]
    pub rented_rooms: Option<u32>,
}

impl Keyed for Report {
    fn key(&self) -> ResourceId {
        self.id
    }
}

/// Revenue of one month compared with the month before
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyComparison {
    #[serde(rename = "ThangHienTai")]
    pub current: Decimal,
    #[serde(rename = "ThangTruoc")]
    pub previous: Decimal,
    /// Percentage change, absent when the previous month had no revenue
    #[serde(rename = "TiLeThayDoi", default)]
    pub change_percent: Option<Decimal>,
}
