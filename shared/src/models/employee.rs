//! Employee Model

use serde::{Deserialize, Serialize};

use crate::types::{Keyed, ResourceId};

/// Employee record (`nhan_vien`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(rename = "MaNhanVien")]
    pub id: ResourceId,
    #[serde(rename = "HoTen")]
    pub full_name: String,
    #[serde(rename = "SoDienThoai", default)]
    pub phone: Option<String>,
    #[serde(rename = "Email", default)]
    pub email: Option<String>,
    #[serde(rename = "ChucVu", default)]
    pub position: Option<String>,
    /// Linked login account, if any
    #[serde(rename = "MaTaiKhoan", default)]
    pub account_id: Option<ResourceId>,
}

impl Keyed for Employee {
    fn key(&self) -> ResourceId {
        self.id
    }
}

/// Create employee payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeCreate {
    #[serde(rename = "HoTen")]
    pub full_name: String,
    #[serde(rename = "SoDienThoai", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "Email", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "ChucVu", skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

/// Update employee payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployeeUpdate {
    #[serde(rename = "HoTen", skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(rename = "SoDienThoai", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "Email", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "ChucVu", skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}
