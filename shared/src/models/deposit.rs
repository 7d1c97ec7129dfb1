//! Deposit Model

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Keyed, ResourceId};

/// Room deposit record (`dat_coc`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deposit {
    #[serde(rename = "MaDatCoc")]
    pub id: ResourceId,
    #[serde(rename = "MaPhong")]
    pub room_id: ResourceId,
    #[serde(rename = "HoTen")]
    pub full_name: String,
    #[serde(rename = "SoDienThoai")]
    pub phone: String,
    #[serde(rename = "SoTienDatCoc")]
    pub amount: Decimal,
    #[serde(rename = "NgayDatCoc", default)]
    pub deposited_on: Option<NaiveDate>,
    #[serde(rename = "TrangThai", default)]
    pub status: Option<String>,
    #[serde(rename = "GhiChu", default)]
    pub note: Option<String>,
}

impl Keyed for Deposit {
    fn key(&self) -> ResourceId {
        self.id
    }
}

/// Deposit submission payload (staff form and public booking form)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositCreate {
    #[serde(rename = "MaPhong")]
    pub room_id: ResourceId,
    #[serde(rename = "HoTen")]
    pub full_name: String,
    #[serde(rename = "SoDienThoai")]
    pub phone: String,
    #[serde(rename = "SoTienDatCoc")]
    pub amount: Decimal,
    #[serde(rename = "NgayDatCoc", skip_serializing_if = "Option::is_none")]
    pub deposited_on: Option<NaiveDate>,
    #[serde(rename = "GhiChu", skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
