//! Route guard
//!
//! Decides, per navigation, whether a protected view renders, waits for
//! the session bootstrap, or redirects. Branches are checked in order and
//! the first match wins.

use shared::models::RoleCode;

pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_FORBIDDEN_PATH: &str = "/forbidden";

/// Read-only view of the session used for access decisions
pub trait AccessView {
    fn is_loading(&self) -> bool;
    fn is_authenticated(&self) -> bool;
    fn has_role(&self, role: RoleCode) -> bool;
    fn has_any_role(&self, roles: &[RoleCode]) -> bool;
}

/// Result of checking the session against a guard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Loading,
    Unauthenticated,
    RoleMismatch,
    RoleSetMismatch,
    Authorized,
}

/// What the caller should do with the navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Show a waiting placeholder
    Pending,
    /// Render the guarded content
    Render,
    /// Navigate to `to`; `from` is the requested location for a post-login return
    Redirect { to: String, from: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteGuard {
    required_role: Option<RoleCode>,
    allowed_roles: Option<Vec<RoleCode>>,
    login_path: String,
    forbidden_path: String,
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::authenticated()
    }
}

impl RouteGuard {
    /// Any logged-in user
    pub fn authenticated() -> Self {
        Self {
            required_role: None,
            allowed_roles: None,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            forbidden_path: DEFAULT_FORBIDDEN_PATH.to_string(),
        }
    }

    pub fn require_role(role: RoleCode) -> Self {
        Self {
            required_role: Some(role),
            ..Self::authenticated()
        }
    }

    pub fn allow_roles(roles: impl Into<Vec<RoleCode>>) -> Self {
        Self {
            allowed_roles: Some(roles.into()),
            ..Self::authenticated()
        }
    }

    pub fn admin_only() -> Self {
        Self::require_role(RoleCode::ADMIN)
    }

    pub fn admin_or_staff() -> Self {
        Self::allow_roles([RoleCode::ADMIN, RoleCode::STAFF])
    }

    pub fn staff_only() -> Self {
        Self::require_role(RoleCode::STAFF)
    }

    pub fn tenant_only() -> Self {
        Self::require_role(RoleCode::TENANT)
    }

    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    pub fn with_forbidden_path(mut self, path: impl Into<String>) -> Self {
        self.forbidden_path = path.into();
        self
    }

    pub fn check(&self, view: &impl AccessView) -> GuardState {
        if view.is_loading() {
            return GuardState::Loading;
        }
        if !view.is_authenticated() {
            return GuardState::Unauthenticated;
        }
        if self.required_role.is_some_and(|role| !view.has_role(role)) {
            return GuardState::RoleMismatch;
        }
        if self
            .allowed_roles
            .as_deref()
            .is_some_and(|roles| !view.has_any_role(roles))
        {
            return GuardState::RoleSetMismatch;
        }
        GuardState::Authorized
    }

    /// Decide the navigation to `location`
    pub fn evaluate(&self, view: &impl AccessView, location: &str) -> GuardOutcome {
        match self.check(view) {
            GuardState::Loading => GuardOutcome::Pending,
            GuardState::Unauthenticated => GuardOutcome::Redirect {
                to: self.login_path.clone(),
                from: Some(location.to_string()),
            },
            GuardState::RoleMismatch | GuardState::RoleSetMismatch => GuardOutcome::Redirect {
                to: self.forbidden_path.clone(),
                from: None,
            },
            GuardState::Authorized => GuardOutcome::Render,
        }
    }
}
