//! Canonical paginated result and normalization of backend envelopes.
//!
//! The services answer collection requests in several shapes: a bare JSON
//! array, a paginated object (with `pageNumber`/`number`, `pageSize`/`size`
//! and `totalElements`/`numberOfElements` used interchangeably), or an
//! empty/`null` body. [`Page::from_body`] folds all of them into one
//! [`Page`].

use serde::Deserialize;
use serde::de::{DeserializeOwned, Error as _};
use serde_json::Value;

use crate::error::Result;

/// Page size assumed when the server does not report one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Position of a page within a server-side result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Zero-based page index.
    pub page_number: u32,
    /// Requested page size.
    pub page_size: u32,
    /// Total number of pages.
    pub total_pages: u32,
    /// Total number of records across all pages.
    pub total_elements: u64,
}

impl Default for Pagination {
    #[inline]
    fn default() -> Self {
        Self {
            page_number: 0,
            page_size: DEFAULT_PAGE_SIZE,
            total_pages: 0,
            total_elements: 0,
        }
    }
}

/// A normalized page of records.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Records on this page.
    pub content: Vec<T>,
    /// Position of this page in the full result set.
    pub pagination: Pagination,
}

/// Paginated object as sent by the services, with every alias kept apart
/// so precedence can be applied explicitly.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPage<T> {
    /// Records; `null` or missing means none.
    content: Option<Vec<T>>,
    /// Preferred page index field.
    page_number: Option<u32>,
    /// Spring-style page index field.
    number: Option<u32>,
    /// Preferred page size field.
    page_size: Option<u32>,
    /// Spring-style page size field.
    size: Option<u32>,
    /// Total pages, when reported.
    total_pages: Option<u32>,
    /// Preferred total count field.
    total_elements: Option<u64>,
    /// Fallback total count field.
    number_of_elements: Option<u64>,
}

impl<T> Page<T> {
    /// Returns an empty page with default pagination.
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self {
            content: Vec::new(),
            pagination: Pagination::default(),
        }
    }

    /// Wraps an unpaginated list as a single page holding every record.
    #[inline]
    #[must_use]
    pub fn single(content: Vec<T>) -> Self {
        let len = content.len();
        let page_size = u32::try_from(len).unwrap_or(u32::MAX);
        Self {
            content,
            pagination: Pagination {
                page_number: 0,
                page_size,
                total_pages: 1,
                total_elements: u64::try_from(len).unwrap_or(u64::MAX),
            },
        }
    }
}

impl<T: DeserializeOwned> Page<T> {
    /// Parses a response body in any of the supported envelope shapes.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::BackofficeError::Serialization`] if the body is
    /// not JSON, is a JSON scalar, or its records do not match `T`.
    #[inline]
    pub fn from_body(body: &str) -> Result<Self> {
        if body.trim().is_empty() {
            return Ok(Self::empty());
        }
        let value: Value = serde_json::from_str(body)?;
        match value {
            Value::Null => Ok(Self::empty()),
            Value::Array(_) => Ok(Self::single(serde_json::from_value(value)?)),
            Value::Object(_) => {
                let raw: RawPage<T> = serde_json::from_value(value)?;
                Ok(raw.normalize())
            }
            Value::Bool(_) | Value::Number(_) | Value::String(_) => Err(
                serde_json::Error::custom("expected an array or a paginated object").into(),
            ),
        }
    }
}

impl<T> RawPage<T> {
    /// Applies alias precedence and derives missing totals.
    fn normalize(self) -> Page<T> {
        let page_size = self.page_size.or(self.size).unwrap_or(DEFAULT_PAGE_SIZE);
        let total_elements = self
            .total_elements
            .or(self.number_of_elements)
            .unwrap_or_default();
        let total_pages = self.total_pages.unwrap_or_else(|| {
            if page_size == 0 {
                0
            } else {
                u32::try_from(total_elements.div_ceil(u64::from(page_size))).unwrap_or(u32::MAX)
            }
        });
        Page {
            content: self.content.unwrap_or_default(),
            pagination: Pagination {
                page_number: self.page_number.or(self.number).unwrap_or_default(),
                page_size,
                total_pages,
                total_elements,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_array_is_single_page() {
        let page: Page<u32> = Page::from_body("[1, 2, 3]").unwrap();
        assert_eq!(page.content, vec![1, 2, 3]);
        assert_eq!(
            page.pagination,
            Pagination {
                page_number: 0,
                page_size: 3,
                total_pages: 1,
                total_elements: 3,
            }
        );
    }

    #[test]
    fn empty_and_null_bodies_are_empty_pages() {
        let page: Page<u32> = Page::from_body("").unwrap();
        assert!(page.content.is_empty());
        assert_eq!(page.pagination, Pagination::default());

        let page: Page<u32> = Page::from_body("null").unwrap();
        assert!(page.content.is_empty());
        assert_eq!(page.pagination.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn paginated_object_uses_preferred_fields() {
        let body = r#"{
            "content": [7],
            "pageNumber": 2,
            "number": 9,
            "pageSize": 5,
            "size": 50,
            "totalPages": 4,
            "totalElements": 16,
            "firstPage": false,
            "lastPage": false
        }"#;
        let page: Page<u32> = Page::from_body(body).unwrap();
        assert_eq!(page.content, vec![7]);
        assert_eq!(page.pagination.page_number, 2);
        assert_eq!(page.pagination.page_size, 5);
        assert_eq!(page.pagination.total_pages, 4);
        assert_eq!(page.pagination.total_elements, 16);
    }

    #[test]
    fn spring_aliases_are_fallbacks() {
        let body = r#"{
            "content": [],
            "number": 3,
            "size": 20,
            "numberOfElements": 0,
            "pageable": {"pageNumber": 3, "pageSize": 20},
            "sort": {"empty": true, "sorted": false, "unsorted": true}
        }"#;
        let page: Page<u32> = Page::from_body(body).unwrap();
        assert_eq!(page.pagination.page_number, 3);
        assert_eq!(page.pagination.page_size, 20);
        assert_eq!(page.pagination.total_elements, 0);
    }

    #[test]
    fn total_pages_derived_when_missing() {
        let body = r#"{"content": [], "pageNumber": 1, "pageSize": 10, "totalElements": 25}"#;
        let page: Page<u32> = Page::from_body(body).unwrap();
        assert_eq!(page.pagination.total_pages, 3);
        assert_eq!(page.pagination.page_number, 1);
    }

    #[test]
    fn missing_content_defaults_to_empty() {
        let page: Page<u32> = Page::from_body(r#"{"content": null}"#).unwrap();
        assert!(page.content.is_empty());
        assert_eq!(page.pagination.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn scalar_body_is_rejected() {
        assert!(Page::<u32>::from_body("42").is_err());
        assert!(Page::<u32>::from_body("not json").is_err());
    }
}
