//! Role Model

use serde::{Deserialize, Serialize};

/// Authorization class of an account (`MaQuyen`)
///
/// The server uses a small closed set of integers; all authorization
/// decisions are made on this code, never on the display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleCode(pub i32);

impl RoleCode {
    pub const ADMIN: RoleCode = RoleCode(1);
    pub const STAFF: RoleCode = RoleCode(2);
    pub const TENANT: RoleCode = RoleCode(3);

    pub fn code(self) -> i32 {
        self.0
    }

    /// Whether the code is one of the known roles
    pub fn is_known(self) -> bool {
        matches!(self, Self::ADMIN | Self::STAFF | Self::TENANT)
    }

    /// Default display name for the role
    pub fn name(self) -> &'static str {
        match self {
            Self::ADMIN => "Admin",
            Self::STAFF => "Staff",
            Self::TENANT => "Tenant",
            _ => "Unknown",
        }
    }
}

impl From<i32> for RoleCode {
    fn from(code: i32) -> Self {
        Self(code)
    }
}

impl std::fmt::Display for RoleCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name(), self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_code_serde_is_plain_integer() {
        assert_eq!(serde_json::to_string(&RoleCode::STAFF).unwrap(), "2");
        let code: RoleCode = serde_json::from_str("3").unwrap();
        assert_eq!(code, RoleCode::TENANT);
    }

    #[test]
    fn test_role_code_known() {
        assert!(RoleCode::ADMIN.is_known());
        assert!(!RoleCode(9).is_known());
        assert_eq!(RoleCode(9).name(), "Unknown");
    }
}
