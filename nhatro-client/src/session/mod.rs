//! Session persistence and state
//!
//! [`SessionStorage`] is the persisted key-value backend (two keys: the
//! access token and the serialized profile). [`SessionStore`] is the
//! in-memory source of truth layered over it.

pub mod storage;
pub mod store;

pub use storage::{ACCESS_TOKEN_KEY, FileStorage, MemoryStorage, SessionStorage, USER_KEY};
pub use store::{Session, SessionStore};
