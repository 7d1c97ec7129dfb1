//! API Response types
//!
//! Envelope structures returned by the boarding house API

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field-level validation messages, keyed by field name
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Unified API response structure
///
/// Every server reply follows this format:
/// ```json
/// {
///     "data": { ... },
///     "message": "Success",
///     "errors": { "field": ["message", ...] }
/// }
/// ```
///
/// `errors` is only populated on validation failures (4xx).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Response data (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human-readable message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Field-level validation errors (present on validation failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            message: None,
            errors: None,
        }
    }

    /// Create a response that carries only a message
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            data: None,
            message: Some(message.into()),
            errors: None,
        }
    }

    /// Create a validation failure response
    pub fn invalid(message: impl Into<String>, errors: FieldErrors) -> Self {
        Self {
            data: None,
            message: Some(message.into()),
            errors: Some(errors),
        }
    }

    /// Whether this envelope reports field-level validation errors
    pub fn has_errors(&self) -> bool {
        self.errors.as_ref().is_some_and(|e| !e.is_empty())
    }

    /// Take the payload, leaving the envelope metadata behind
    pub fn into_data(self) -> Option<T> {
        self.data
    }

    /// Map the payload type, keeping message and errors
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            data: self.data.map(f),
            message: self.message,
            errors: self.errors,
        }
    }
}

impl<T> Default for ApiResponse<T> {
    fn default() -> Self {
        Self {
            data: None,
            message: None,
            errors: None,
        }
    }
}

/// Paginated list reply
///
/// `from`/`to` are 1-based inclusive bounds of the current page and are
/// absent when `total == 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub current_page: u64,
    pub last_page: u64,
    pub per_page: u64,
    pub total: u64,
    #[serde(default)]
    pub from: Option<u64>,
    #[serde(default)]
    pub to: Option<u64>,
}

impl<T> Paginated<T> {
    /// Build page metadata for `data` being page `page` (1-based)
    pub fn new(data: Vec<T>, page: u64, per_page: u64, total: u64) -> Self {
        let last_page = if per_page == 0 {
            0
        } else {
            total.div_ceil(per_page)
        };
        let (from, to) = if total == 0 || data.is_empty() {
            (None, None)
        } else {
            let from = (page.saturating_sub(1)) * per_page + 1;
            (Some(from), Some(from + data.len() as u64 - 1))
        };
        Self {
            data,
            current_page: page,
            last_page,
            per_page,
            total,
            from,
            to,
        }
    }

    /// Number of items on this page according to `from`/`to`
    pub fn page_len(&self) -> u64 {
        match (self.from, self.to) {
            (Some(from), Some(to)) if to >= from => to - from + 1,
            _ => 0,
        }
    }

    /// Whether another page follows this one
    pub fn has_more(&self) -> bool {
        self.current_page < self.last_page
    }
}

/// Payload of a list call: either a plain sequence or a paginated page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    Page(Paginated<T>),
    Items(Vec<T>),
}

impl<T> ListPayload<T> {
    /// Items on this page (or the whole sequence)
    pub fn items(&self) -> &[T] {
        match self {
            Self::Page(page) => &page.data,
            Self::Items(items) => items,
        }
    }

    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Page(page) => page.data,
            Self::Items(items) => items,
        }
    }

    /// Pagination metadata, if the server paginated the reply
    pub fn page(&self) -> Option<&Paginated<T>> {
        match self {
            Self::Page(page) => Some(page),
            Self::Items(_) => None,
        }
    }
}

/// Raw body of a list reply
///
/// Accepts a top-level paginated body as well as the usual envelope whose
/// `data` holds either a sequence or a paginated page.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListBody<T> {
    Paginated(Paginated<T>),
    Envelope(ApiResponse<ListPayload<T>>),
}

impl<T> From<ListBody<T>> for ApiResponse<ListPayload<T>> {
    fn from(body: ListBody<T>) -> Self {
        match body {
            ListBody::Paginated(page) => ApiResponse::ok(ListPayload::Page(page)),
            ListBody::Envelope(envelope) => envelope,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paginate(total: u64, per_page: u64) -> Vec<Paginated<u64>> {
        let items: Vec<u64> = (1..=total).collect();
        if items.is_empty() {
            return vec![Paginated::new(Vec::new(), 1, per_page, 0)];
        }
        items
            .chunks(per_page as usize)
            .enumerate()
            .map(|(i, chunk)| Paginated::new(chunk.to_vec(), i as u64 + 1, per_page, total))
            .collect()
    }

    #[test]
    fn test_paginated_last_page_and_bounds() {
        for (total, per_page) in [(1, 10), (10, 10), (11, 10), (95, 20), (3, 1)] {
            let pages = paginate(total, per_page);
            assert_eq!(pages[0].last_page, total.div_ceil(per_page));
            assert_eq!(pages.len() as u64, pages[0].last_page);

            let covered: u64 = pages.iter().map(Paginated::page_len).sum();
            assert_eq!(covered, total);
            assert_eq!(pages[0].from, Some(1));
            assert_eq!(pages.last().unwrap().to, Some(total));
        }
    }

    #[test]
    fn test_paginated_zero_total() {
        let page = Paginated::<u64>::new(Vec::new(), 1, 15, 0);
        assert_eq!(page.last_page, 0);
        assert!(page.from.is_none());
        assert!(page.to.is_none());
        assert!(page.data.is_empty());
        assert!(!page.has_more());
    }

    #[test]
    fn test_api_response_deserialize_validation() {
        let json = r#"{"message":"The given data was invalid.","errors":{"SoPhong":["Số phòng đã tồn tại"]}}"#;
        let response: ApiResponse<serde_json::Value> = serde_json::from_str(json).unwrap();
        assert!(response.data.is_none());
        assert!(response.has_errors());
        assert_eq!(
            response.errors.unwrap()["SoPhong"],
            vec!["Số phòng đã tồn tại".to_string()]
        );
    }

    #[test]
    fn test_api_response_serialize_skips_empty() {
        let json = serde_json::to_string(&ApiResponse::ok(42)).unwrap();
        assert_eq!(json, r#"{"data":42}"#);
    }

    #[test]
    fn test_list_body_top_level_paginated() {
        let json = r#"{"data":[1,2],"current_page":1,"last_page":1,"per_page":15,"total":2,"from":1,"to":2}"#;
        let body: ListBody<u32> = serde_json::from_str(json).unwrap();
        let response: ApiResponse<ListPayload<u32>> = body.into();
        let payload = response.data.unwrap();
        assert_eq!(payload.items(), &[1, 2]);
        assert_eq!(payload.page().unwrap().total, 2);
    }

    #[test]
    fn test_list_body_wrapped_sequence() {
        let json = r#"{"data":[3,4,5],"message":"OK"}"#;
        let body: ListBody<u32> = serde_json::from_str(json).unwrap();
        let response: ApiResponse<ListPayload<u32>> = body.into();
        assert_eq!(response.message.as_deref(), Some("OK"));
        let payload = response.data.unwrap();
        assert!(payload.page().is_none());
        assert_eq!(payload.into_items(), vec![3, 4, 5]);
    }

    #[test]
    fn test_list_body_wrapped_page() {
        let json = r#"{"data":{"data":[],"current_page":1,"last_page":0,"per_page":10,"total":0,"from":null,"to":null}}"#;
        let body: ListBody<u32> = serde_json::from_str(json).unwrap();
        let response: ApiResponse<ListPayload<u32>> = body.into();
        let payload = response.data.unwrap();
        let page = payload.page().unwrap();
        assert_eq!(page.total, 0);
        assert!(page.from.is_none());
    }
}
