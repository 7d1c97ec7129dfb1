//! Common types for the shared crate

/// Integer identifier every API resource is keyed by
pub type ResourceId = i64;

/// A resource uniquely identified by an integer key
pub trait Keyed {
    fn key(&self) -> ResourceId;
}
