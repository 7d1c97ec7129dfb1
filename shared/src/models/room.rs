//! Room Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Keyed, ResourceId};

/// Room record (`phong`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    #[serde(rename = "MaPhong")]
    pub id: ResourceId,
    #[serde(rename = "SoPhong")]
    pub number: String,
    /// Floor area in m²
    #[serde(rename = "DienTich", default)]
    pub area: Option<Decimal>,
    /// Monthly rent
    #[serde(rename = "GiaThue")]
    pub rent: Decimal,
    /// Occupancy status as reported by the server (e.g. "Trống", "Đã thuê")
    #[serde(rename = "TrangThai", default)]
    pub status: Option<String>,
    #[serde(rename = "MoTa", default)]
    pub description: Option<String>,
    /// Image path, possibly relative to the asset host
    #[serde(rename = "HinhAnh", default)]
    pub image: Option<String>,
}

impl Keyed for Room {
    fn key(&self) -> ResourceId {
        self.id
    }
}

/// Create room payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomCreate {
    #[serde(rename = "SoPhong")]
    pub number: String,
    #[serde(rename = "DienTich", skip_serializing_if = "Option::is_none")]
    pub area: Option<Decimal>,
    #[serde(rename = "GiaThue")]
    pub rent: Decimal,
    #[serde(rename = "MoTa", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Update room payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoomUpdate {
    #[serde(rename = "SoPhong", skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(rename = "DienTich", skip_serializing_if = "Option::is_none")]
    pub area: Option<Decimal>,
    #[serde(rename = "GiaThue", skip_serializing_if = "Option::is_none")]
    pub rent: Option<Decimal>,
    #[serde(rename = "TrangThai", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "MoTa", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
