//
//  bitbucket-pullrequests
//  api/common/pagination.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Page envelope for Bitbucket Cloud list endpoints.
//!
//! Cloud list endpoints wrap their items in an object carrying a `values`
//! array plus optional `next`/`previous` links. Only the page that was asked
//! for is decoded; following `next` is left to the caller.

use serde::{Deserialize, Serialize};

/// A single page of results from the Bitbucket Cloud REST API.
///
/// `values` is required: a list response without it is a decode error.
/// Every other field is optional because Bitbucket omits them freely.
///
/// # Example
///
/// ```rust
/// use bitbucket_pullrequests::api::common::PaginatedResponse;
///
/// let json = r#"{
///     "values": [{"id": 1}, {"id": 2}],
///     "pagelen": 2,
///     "next": "https://api.bitbucket.org/2.0/repositories/a/b/pullrequests/?page=2"
/// }"#;
///
/// let page: PaginatedResponse<serde_json::Value> = serde_json::from_str(json).unwrap();
/// assert_eq!(page.values.len(), 2);
/// assert!(page.has_next());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    /// Items on this page, in server order.
    pub values: Vec<T>,

    /// Current page number (1-indexed).
    #[serde(default)]
    pub page: Option<u32>,

    /// Maximum number of items per page.
    #[serde(default)]
    pub pagelen: Option<u32>,

    /// Total number of items across all pages, when Bitbucket reports it.
    #[serde(default)]
    pub size: Option<u32>,

    /// URL of the next page.
    #[serde(default)]
    pub next: Option<String>,

    /// URL of the previous page.
    #[serde(default)]
    pub previous: Option<String>,
}

impl<T> PaginatedResponse<T> {
    /// Returns `true` if Bitbucket reported a further page.
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// Returns the URL of the next page without cloning it.
    pub fn next_url(&self) -> Option<&str> {
        self.next.as_deref()
    }

    /// Consumes the page and returns its items.
    pub fn into_values(self) -> Vec<T> {
        self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_page() {
        let page: PaginatedResponse<u32> = serde_json::from_str(r#"{"values": [7]}"#).unwrap();
        assert!(!page.has_next());
        assert_eq!(page.next_url(), None);
        assert_eq!(page.into_values(), vec![7]);
    }

    #[test]
    fn test_missing_values_fails() {
        let result = serde_json::from_str::<PaginatedResponse<u32>>(r#"{"pagelen": 10}"#);
        assert!(result.is_err());
    }
}
