//! User Model
//!
//! The server is inconsistent about how it shapes the account object: the
//! nested profile may arrive under a camelCase or a snake_case key, and the
//! "current user" endpoint sometimes wraps the account in `{data: ...}`.
//! [`UserProfile::from_server`] is the one place that maps every known
//! shape onto the canonical [`UserProfile`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::role::RoleCode;
use crate::types::ResourceId;

/// Key that identifies an account object in a server reply
const ACCOUNT_KEY: &str = "MaTaiKhoan";

/// Keys under which the account object may be wrapped
const WRAPPER_KEYS: &[&str] = &["data", "user"];

/// Maximum wrapper nesting accepted (`{data: {user: {...}}}`)
const MAX_WRAP_DEPTH: usize = 3;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Unrecognized user profile shape")]
    UnknownShape,

    #[error("Invalid user profile: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// Staff member details attached to an employee account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeProfile {
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
}

/// Tenant details attached to a tenant account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantProfile {
    #[serde(rename = "MaKhachThue")]
    pub id: ResourceId,
    #[serde(rename = "HoTen")]
    pub full_name: String,
    #[serde(rename = "SoDienThoai", default)]
    pub phone: Option<String>,
    #[serde(rename = "CCCD", default)]
    pub id_number: Option<String>,
    #[serde(rename = "MaPhong", default)]
    pub room_id: Option<ResourceId>,
}

/// Person attached to an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "details", rename_all = "snake_case")]
pub enum Profile {
    Employee(EmployeeProfile),
    Tenant(TenantProfile),
}

impl Profile {
    pub fn full_name(&self) -> &str {
        match self {
            Self::Employee(e) => &e.full_name,
            Self::Tenant(t) => &t.full_name,
        }
    }
}

/// Canonical authenticated account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub account_id: ResourceId,
    pub username: String,
    pub role_code: RoleCode,
    pub role_name: String,
    #[serde(default)]
    pub account_status: Option<String>,
    #[serde(default)]
    pub profile: Option<Profile>,
}

/// Account object as sent by the server
#[derive(Debug, Deserialize)]
struct ServerAccount {
    #[serde(rename = "MaTaiKhoan")]
    account_id: ResourceId,
    #[serde(rename = "TenDangNhap")]
    username: String,
    #[serde(rename = "MaQuyen")]
    role_code: RoleCode,
    #[serde(rename = "TenQuyen", default)]
    role_name: Option<String>,
    #[serde(rename = "TrangThaiTaiKhoan", default)]
    account_status: Option<String>,
    #[serde(rename = "nhanVien", default)]
    employee: Option<EmployeeProfile>,
    #[serde(rename = "nhan_vien", default)]
    employee_snake: Option<EmployeeProfile>,
    #[serde(rename = "khachThue", default)]
    tenant: Option<TenantProfile>,
    #[serde(rename = "khach_thue", default)]
    tenant_snake: Option<TenantProfile>,
}

impl From<ServerAccount> for UserProfile {
    fn from(raw: ServerAccount) -> Self {
        let employee = raw.employee.or(raw.employee_snake).map(Profile::Employee);
        let tenant = raw.tenant.or(raw.tenant_snake).map(Profile::Tenant);
        Self {
            account_id: raw.account_id,
            username: raw.username,
            role_name: raw
                .role_name
                .unwrap_or_else(|| raw.role_code.name().to_string()),
            role_code: raw.role_code,
            account_status: raw.account_status,
            profile: employee.or(tenant),
        }
    }
}

impl UserProfile {
    /// Normalize any known server shape into a canonical profile.
    ///
    /// Accepts the bare account object as well as `{data: account}`,
    /// `{user: account}` and `{data: {user: account}}`.
    pub fn from_server(value: Value) -> Result<Self, ProfileError> {
        let account = unwrap_account(value, MAX_WRAP_DEPTH).ok_or(ProfileError::UnknownShape)?;
        let raw: ServerAccount = serde_json::from_value(account)?;
        Ok(raw.into())
    }

    pub fn has_role(&self, role: RoleCode) -> bool {
        self.role_code == role
    }

    pub fn has_any_role(&self, roles: &[RoleCode]) -> bool {
        roles.contains(&self.role_code)
    }

    /// Name to greet the user with
    pub fn display_name(&self) -> &str {
        self.profile
            .as_ref()
            .map(Profile::full_name)
            .unwrap_or(&self.username)
    }

    pub fn employee(&self) -> Option<&EmployeeProfile> {
        match &self.profile {
            Some(Profile::Employee(e)) => Some(e),
            _ => None,
        }
    }

    pub fn tenant(&self) -> Option<&TenantProfile> {
        match &self.profile {
            Some(Profile::Tenant(t)) => Some(t),
            _ => None,
        }
    }
}

fn unwrap_account(value: Value, depth: usize) -> Option<Value> {
    let Value::Object(mut map) = value else {
        return None;
    };
    if map.contains_key(ACCOUNT_KEY) {
        return Some(Value::Object(map));
    }
    if depth == 0 {
        return None;
    }
    WRAPPER_KEYS
        .iter()
        .find_map(|key| map.remove(*key))
        .and_then(|inner| unwrap_account(inner, depth - 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn staff_account() -> Value {
        json!({
            "MaTaiKhoan": 7,
            "MaQuyen": 2,
            "TenDangNhap": "alice",
            "TenQuyen": "Staff",
            "TrangThaiTaiKhoan": "Hoạt động"
        })
    }

    #[test]
    fn test_from_server_bare_account() {
        let user = UserProfile::from_server(staff_account()).unwrap();
        assert_eq!(user.account_id, 7);
        assert_eq!(user.username, "alice");
        assert_eq!(user.role_code, RoleCode::STAFF);
        assert_eq!(user.role_name, "Staff");
        assert_eq!(user.account_status.as_deref(), Some("Hoạt động"));
        assert!(user.profile.is_none());
        assert_eq!(user.display_name(), "alice");
    }

    #[test]
    fn test_from_server_wrapped_shapes_agree() {
        let bare = UserProfile::from_server(staff_account()).unwrap();
        let wrapped = UserProfile::from_server(json!({ "data": staff_account() })).unwrap();
        let user_key = UserProfile::from_server(json!({ "user": staff_account() })).unwrap();
        let nested =
            UserProfile::from_server(json!({ "data": { "user": staff_account() } })).unwrap();
        assert_eq!(bare, wrapped);
        assert_eq!(bare, user_key);
        assert_eq!(bare, nested);
    }

    #[test]
    fn test_from_server_camel_and_snake_profiles_agree() {
        let employee = json!({ "MaNhanVien": 3, "HoTen": "Nguyễn Văn A", "ChucVu": "Quản lý" });

        let mut camel = staff_account();
        camel["nhanVien"] = employee.clone();
        let mut snake = staff_account();
        snake["nhan_vien"] = employee;

        let camel = UserProfile::from_server(camel).unwrap();
        let snake = UserProfile::from_server(snake).unwrap();
        assert_eq!(camel, snake);
        assert_eq!(camel.employee().unwrap().id, 3);
        assert_eq!(camel.display_name(), "Nguyễn Văn A");
    }

    #[test]
    fn test_from_server_tenant_profile() {
        let value = json!({
            "MaTaiKhoan": 12,
            "MaQuyen": 3,
            "TenDangNhap": "tenant01",
            "khach_thue": { "MaKhachThue": 40, "HoTen": "Trần Thị B", "MaPhong": 101 }
        });
        let user = UserProfile::from_server(value).unwrap();
        assert_eq!(user.role_code, RoleCode::TENANT);
        assert_eq!(user.role_name, "Tenant");
        assert_eq!(user.tenant().unwrap().room_id, Some(101));
        assert!(user.employee().is_none());
    }

    #[test]
    fn test_from_server_unknown_shape() {
        assert!(matches!(
            UserProfile::from_server(json!({ "data": { "id": 1 } })),
            Err(ProfileError::UnknownShape)
        ));
        assert!(matches!(
            UserProfile::from_server(json!("alice")),
            Err(ProfileError::UnknownShape)
        ));
    }

    #[test]
    fn test_canonical_profile_round_trips_through_json() {
        let mut account = staff_account();
        account["nhanVien"] = json!({ "MaNhanVien": 3, "HoTen": "Nguyễn Văn A" });
        let user = UserProfile::from_server(account).unwrap();

        let stored = serde_json::to_string(&user).unwrap();
        let restored: UserProfile = serde_json::from_str(&stored).unwrap();
        assert_eq!(user, restored);
    }

    #[test]
    fn test_role_queries() {
        let user = UserProfile::from_server(staff_account()).unwrap();
        assert!(user.has_role(RoleCode::STAFF));
        assert!(!user.has_role(RoleCode::ADMIN));
        assert!(user.has_any_role(&[RoleCode::ADMIN, RoleCode::STAFF]));
        assert!(!user.has_any_role(&[]));
    }
}
