//! Session store
//!
//! Holds the current `{token, user}` pair. Every mutation writes storage
//! and swaps memory while holding the write lock, with no suspension point
//! in between, so readers never observe a half-updated session.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use shared::models::{RoleCode, UserProfile};

use super::storage::{ACCESS_TOKEN_KEY, MemoryStorage, SessionStorage, USER_KEY};
use crate::ClientResult;
use crate::guard::AccessView;
use crate::transport::TokenSource;

/// Authenticated session
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Default)]
struct SessionState {
    session: Option<Session>,
    loading: bool,
}

struct Inner {
    state: RwLock<SessionState>,
    storage: Arc<dyn SessionStorage>,
}

/// Shared handle to the current session
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read();
        f.debug_struct("SessionStore")
            .field("authenticated", &state.session.is_some())
            .field("loading", &state.loading)
            .finish()
    }
}

impl SessionStore {
    /// Create a store and restore any persisted session
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        let session = restore(storage.as_ref());
        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(SessionState {
                    session,
                    loading: false,
                }),
                storage,
            }),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.inner.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn session(&self) -> Option<Session> {
        self.read().session.clone()
    }

    pub fn token(&self) -> Option<String> {
        self.read().session.as_ref().map(|s| s.token.clone())
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.read().session.as_ref().map(|s| s.user.clone())
    }

    /// Token presence only; expiry is discovered by a rejected call.
    pub fn is_authenticated(&self) -> bool {
        self.read().session.is_some()
    }

    /// `false` when there is no session
    pub fn has_role(&self, role: RoleCode) -> bool {
        self.read()
            .session
            .as_ref()
            .is_some_and(|s| s.user.has_role(role))
    }

    /// `false` when there is no session
    pub fn has_any_role(&self, roles: &[RoleCode]) -> bool {
        self.read()
            .session
            .as_ref()
            .is_some_and(|s| s.user.has_any_role(roles))
    }

    /// Whether the session bootstrap is in flight
    pub fn is_loading(&self) -> bool {
        self.read().loading
    }

    pub fn set_loading(&self, loading: bool) {
        self.write().loading = loading;
    }

    /// Replace the session with a new one.
    ///
    /// Both keys are persisted before memory changes; on a storage failure
    /// the previous session stays in place.
    pub fn establish(&self, token: String, user: UserProfile) -> ClientResult<()> {
        let user_json = serde_json::to_string(&user)?;
        let mut state = self.write();
        self.inner
            .storage
            .set_many(&[(ACCESS_TOKEN_KEY, token.clone()), (USER_KEY, user_json)])?;
        state.session = Some(Session { token, user });
        Ok(())
    }

    /// Replace the cached profile, but only while `token` is still the
    /// current session's token. Returns whether the profile was applied.
    pub fn update_user_if_current(&self, token: &str, user: UserProfile) -> ClientResult<bool> {
        let user_json = serde_json::to_string(&user)?;
        let mut state = self.write();
        let Some(session) = state.session.as_mut().filter(|s| s.token == token) else {
            return Ok(false);
        };
        self.inner
            .storage
            .set_many(&[(ACCESS_TOKEN_KEY, token.to_string()), (USER_KEY, user_json)])?;
        session.user = user;
        Ok(true)
    }

    /// Drop the session.
    ///
    /// Memory is cleared even when removing the persisted keys fails; the
    /// storage error is still returned.
    pub fn clear(&self) -> ClientResult<()> {
        let mut state = self.write();
        state.session = None;
        self.inner.storage.remove_many(&[ACCESS_TOKEN_KEY, USER_KEY])
    }

    /// Drop the session only while `token` is still its token. Returns
    /// whether it was dropped; memory is cleared before storage is touched.
    pub fn clear_if_current(&self, token: &str) -> ClientResult<bool> {
        let mut state = self.write();
        if !state.session.as_ref().is_some_and(|s| s.token == token) {
            return Ok(false);
        }
        state.session = None;
        self.inner.storage.remove_many(&[ACCESS_TOKEN_KEY, USER_KEY])?;
        Ok(true)
    }
}

fn restore(storage: &dyn SessionStorage) -> Option<Session> {
    let read = |key: &str| {
        storage.get(key).unwrap_or_else(|e| {
            tracing::warn!(key, error = %e, "Failed to read persisted session");
            None
        })
    };
    let (token, user_json) = match (read(ACCESS_TOKEN_KEY), read(USER_KEY)) {
        (None, None) => return None,
        (Some(token), Some(user)) => (token, user),
        _ => {
            tracing::warn!("Persisted session is incomplete, discarding");
            discard(storage);
            return None;
        }
    };

    let user = serde_json::from_str::<UserProfile>(&user_json)
        .ok()
        .or_else(|| {
            serde_json::from_str(&user_json)
                .ok()
                .and_then(|value| UserProfile::from_server(value).ok())
        });
    match user {
        Some(user) => {
            tracing::debug!(username = %user.username, "Restored persisted session");
            Some(Session { token, user })
        }
        None => {
            tracing::warn!("Persisted user profile is corrupt, discarding session");
            discard(storage);
            None
        }
    }
}

fn discard(storage: &dyn SessionStorage) {
    if let Err(e) = storage.remove_many(&[ACCESS_TOKEN_KEY, USER_KEY]) {
        tracing::warn!(error = %e, "Failed to clear persisted session");
    }
}

impl TokenSource for SessionStore {
    fn bearer_token(&self) -> Option<String> {
        self.token()
    }
}

impl AccessView for SessionStore {
    fn is_loading(&self) -> bool {
        SessionStore::is_loading(self)
    }

    fn is_authenticated(&self) -> bool {
        SessionStore::is_authenticated(self)
    }

    fn has_role(&self, role: RoleCode) -> bool {
        SessionStore::has_role(self, role)
    }

    fn has_any_role(&self, roles: &[RoleCode]) -> bool {
        SessionStore::has_any_role(self, roles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientError;
    use serde_json::json;

    fn profile(role: i32) -> UserProfile {
        UserProfile::from_server(json!({
            "MaTaiKhoan": 7,
            "TenDangNhap": "alice",
            "MaQuyen": role,
            "TenQuyen": "Staff",
            "TrangThaiTaiKhoan": "Hoạt động"
        }))
        .unwrap()
    }

    struct FailingStorage;

    impl SessionStorage for FailingStorage {
        fn get(&self, _key: &str) -> ClientResult<Option<String>> {
            Ok(None)
        }
        fn set_many(&self, _entries: &[(&str, String)]) -> ClientResult<()> {
            Err(ClientError::Storage("disk full".into()))
        }
        fn remove_many(&self, _keys: &[&str]) -> ClientResult<()> {
            Err(ClientError::Storage("disk full".into()))
        }
    }

    #[test]
    fn test_establish_persists_both_keys() {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::new(storage.clone());
        store.establish("tok123".into(), profile(2)).unwrap();

        assert_eq!(storage.get(ACCESS_TOKEN_KEY).unwrap().as_deref(), Some("tok123"));
        assert!(storage.get(USER_KEY).unwrap().is_some());
        assert_eq!(store.bearer_token().as_deref(), Some("tok123"));

        let restored = SessionStore::new(storage);
        assert_eq!(restored.user(), Some(profile(2)));
    }

    #[test]
    fn test_role_queries_agree() {
        let store = SessionStore::in_memory();
        for code in 0..5 {
            let role = RoleCode(code);
            assert_eq!(store.has_role(role), store.has_any_role(&[role]));
        }

        store.establish("tok".into(), profile(2)).unwrap();
        for code in 0..5 {
            let role = RoleCode(code);
            assert_eq!(store.has_role(role), store.has_any_role(&[role]));
        }
        assert!(store.has_role(RoleCode::STAFF));
        assert!(!store.has_role(RoleCode::ADMIN));
    }

    #[test]
    fn test_clear_drops_roles() {
        let store = SessionStore::in_memory();
        store.establish("tok".into(), profile(1)).unwrap();
        store.clear().unwrap();

        assert!(!store.is_authenticated());
        assert!(!store.has_any_role(&[RoleCode::ADMIN, RoleCode::STAFF, RoleCode::TENANT]));
        assert!(store.token().is_none());
    }

    #[test]
    fn test_failed_persist_keeps_previous_session() {
        let store = SessionStore::new(Arc::new(FailingStorage));
        assert!(store.establish("tok".into(), profile(2)).is_err());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_clear_empties_memory_even_if_storage_fails() {
        let store = SessionStore::new(Arc::new(FailingStorage));
        store.write().session = Some(Session {
            token: "tok".into(),
            user: profile(2),
        });
        assert!(store.clear().is_err());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_update_user_only_for_current_token() {
        let store = SessionStore::in_memory();
        store.establish("new".into(), profile(2)).unwrap();

        assert!(!store.update_user_if_current("old", profile(1)).unwrap());
        assert!(store.has_role(RoleCode::STAFF));

        assert!(store.update_user_if_current("new", profile(1)).unwrap());
        assert!(store.has_role(RoleCode::ADMIN));
    }

    #[test]
    fn test_clear_only_for_current_token() {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::new(storage.clone());
        store.establish("new".into(), profile(2)).unwrap();

        assert!(!store.clear_if_current("old").unwrap());
        assert_eq!(store.token().as_deref(), Some("new"));
        assert_eq!(storage.get(ACCESS_TOKEN_KEY).unwrap().as_deref(), Some("new"));

        assert!(store.clear_if_current("new").unwrap());
        assert!(!store.is_authenticated());
        assert!(storage.get(ACCESS_TOKEN_KEY).unwrap().is_none());
    }

    #[test]
    fn test_corrupt_profile_discards_session() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .set_many(&[(ACCESS_TOKEN_KEY, "tok".into()), (USER_KEY, "{broken".into())])
            .unwrap();

        let store = SessionStore::new(storage.clone());
        assert!(!store.is_authenticated());
        assert!(storage.get(ACCESS_TOKEN_KEY).unwrap().is_none());
    }

    #[test]
    fn test_restores_server_shaped_profile() {
        let storage = Arc::new(MemoryStorage::new());
        let raw = json!({ "MaTaiKhoan": 3, "TenDangNhap": "bob", "MaQuyen": 3 }).to_string();
        storage
            .set_many(&[(ACCESS_TOKEN_KEY, "tok".into()), (USER_KEY, raw)])
            .unwrap();

        let store = SessionStore::new(storage);
        assert!(store.has_role(RoleCode::TENANT));
    }
}
