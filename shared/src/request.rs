//! Request types for the shared crate
//!
//! Query parameters are forwarded to the server verbatim; filtering,
//! sorting and validation all happen server-side.

use serde::{Deserialize, Serialize};

/// Query key reserved for cancellation; it is never sent to the server
pub const RESERVED_SIGNAL_KEY: &str = "signal";

/// Ordered list of query parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter (builder style)
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.push(key, value);
        self
    }

    /// Append a parameter
    pub fn push(&mut self, key: impl Into<String>, value: impl ToString) {
        self.0.push((key.into(), value.to_string()));
    }

    /// Append a parameter only when a value is present
    pub fn with_opt(self, key: impl Into<String>, value: Option<impl ToString>) -> Self {
        match value {
            Some(v) => self.with(key, v),
            None => self,
        }
    }

    /// Page number (1-based)
    pub fn page(self, page: u64) -> Self {
        self.with("page", page)
    }

    /// Items per page
    pub fn per_page(self, per_page: u64) -> Self {
        self.with("per_page", per_page)
    }

    /// Free-text search keyword
    pub fn search(self, keyword: impl Into<String>) -> Self {
        self.with("search", keyword.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Remove the reserved `signal` key, returning whether it was present
    pub fn strip_reserved(&mut self) -> bool {
        let before = self.0.len();
        self.0.retain(|(k, _)| k != RESERVED_SIGNAL_KEY);
        before != self.0.len()
    }

    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.0
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.to_string()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_params_keep_order() {
        let params = QueryParams::new().page(2).per_page(20).search("phòng 101");
        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(
            pairs,
            vec![("page", "2"), ("per_page", "20"), ("search", "phòng 101")]
        );
    }

    #[test]
    fn test_strip_reserved_signal() {
        let mut params: QueryParams = [("signal", "x"), ("TrangThai", "Trống")].into_iter().collect();
        assert!(params.strip_reserved());
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("TrangThai"), Some("Trống"));
        assert!(!params.strip_reserved());
    }

    #[test]
    fn test_with_opt() {
        let params = QueryParams::new()
            .with_opt("MaPhong", Some(5))
            .with_opt("year", None::<i32>);
        assert_eq!(params.get("MaPhong"), Some("5"));
        assert!(params.get("year").is_none());
    }
}
