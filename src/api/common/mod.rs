//
//  bitbucket-pullrequests
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types for the Bitbucket Cloud bindings
//!
//! This module provides the shared pieces every endpoint binding relies on:
//! error handling, the error payload decoder, the discriminated reply type and
//! small data structures that appear in many responses.
//!
//! # Overview
//!
//! - [`ApiError`] - Unified error type for all API operations
//! - [`ErrorPayload`] - Message and detail extracted from a Bitbucket error body
//! - [`ApiReply`] - A response that is either an error payload or a typed value
//! - [`Link`] - HATEOAS-style link representation
//! - Pagination types (re-exported from [`pagination`] submodule)
//!
//! # Example
//!
//! ```rust
//! use bitbucket_pullrequests::api::common::{ApiError, ApiReply};
//! use serde_json::json;
//!
//! let reply = ApiReply::<serde_json::Value>::from_value(json!({
//!     "type": "error",
//!     "error": {"message": "Repository not found"}
//! }))
//! .unwrap();
//!
//! match reply.into_result() {
//!     Err(ApiError::Api { message, .. }) => assert_eq!(message, "Repository not found"),
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```
//!
//! # Notes
//!
//! - Bitbucket marks error bodies with `"type": "error"`, sometimes with a 2xx status
//! - Decoding is lenient: unknown fields are ignored and `null` becomes the zero value

use serde::{Deserialize, Deserializer, Serialize};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

mod pagination;

pub use pagination::*;

/// Unified error type for all Bitbucket API operations.
///
/// # Variants
///
/// | Variant | Description |
/// |---------|-------------|
/// | `Network` | Transport failure reported by the HTTP client, passed through unmodified |
/// | `Api` | Bitbucket answered with an error payload |
/// | `Http` | Non-success status whose body carried no recognisable message |
/// | `Decode` | The response did not have the expected shape |
/// | `Encode` | A request body could not be serialized |
/// | `InvalidUrl` | A configured base URL could not be parsed |
///
/// # Example
///
/// ```rust
/// use bitbucket_pullrequests::api::common::ApiError;
///
/// let err = ApiError::Api {
///     status: Some(404),
///     message: "Pull request not found".to_string(),
///     detail: None,
/// };
///
/// assert!(err.is_not_found());
/// assert_eq!(err.to_string(), "Pull request not found");
/// ```
#[derive(Error, Debug)]
pub enum ApiError {
    /// A network-level error occurred during the request.
    ///
    /// Covers connection failures, timeouts, DNS resolution errors and other
    /// transport-layer issues.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Bitbucket returned an error payload.
    ///
    /// `status` is `None` when the payload arrived with a successful HTTP status.
    #[error("{message}")]
    Api {
        /// HTTP status code of the response, if it was not a success.
        status: Option<u16>,
        /// Human readable message from `error.message`.
        message: String,
        /// Optional longer explanation from `error.detail`.
        detail: Option<String>,
    },

    /// A non-success response without a recognisable error message.
    #[error("API error ({status}): {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The response body did not match the expected structure.
    #[error("Failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),

    /// The request body could not be serialized.
    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// The configured base URL is not a usable HTTP(S) URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Returns the HTTP status associated with this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => *status,
            Self::Http { status, .. } => Some(*status),
            Self::Network(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` for 401 and 403 responses.
    pub fn is_auth_error(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }

    /// Returns `true` for 404 responses.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Message and detail extracted from a Bitbucket error body.
///
/// Bitbucket Cloud returns errors in the format:
/// ```json
/// {"type": "error", "error": {"message": "Human readable message", "detail": "..."}}
/// ```
///
/// A few endpoints answer with `{"error": {"detail": "..."}}` or a bare
/// `{"message": "..."}`; those shapes are recognised as well.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorPayload {
    /// The primary error message.
    pub message: String,
    /// Optional longer explanation.
    pub detail: Option<String>,
}

impl ErrorPayload {
    /// Extracts an error payload from a JSON value.
    ///
    /// Returns `None` when no message or detail can be found.
    pub fn from_value(value: &Value) -> Option<Self> {
        let error = value.get("error");
        let detail = error
            .and_then(|e| e.get("detail"))
            .and_then(Value::as_str)
            .map(str::to_string);

        // Cloud format: {"type": "error", "error": {"message": "..."}}
        if let Some(message) = error
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
        {
            return Some(Self {
                message: message.to_string(),
                detail,
            });
        }

        // Alternative Cloud format: {"error": {"detail": "..."}}
        if let Some(detail) = detail {
            return Some(Self {
                message: detail,
                detail: None,
            });
        }

        // Simple message format: {"message": "..."}
        value
            .get("message")
            .and_then(Value::as_str)
            .map(|message| Self {
                message: message.to_string(),
                detail: None,
            })
    }

    /// Converts the payload into an [`ApiError::Api`].
    pub fn into_error(self, status: Option<u16>) -> ApiError {
        ApiError::Api {
            status,
            message: self.message,
            detail: self.detail,
        }
    }
}

/// Returns `true` when a response body is tagged `"type": "error"`.
pub fn is_error_payload(value: &Value) -> bool {
    value.get("type").and_then(Value::as_str) == Some("error")
}

/// A decoded API response: either an error payload or a typed value.
///
/// The `type` discriminator is checked before structural decoding, so an
/// error body never produces a partially filled `T`.
#[derive(Debug)]
pub enum ApiReply<T> {
    /// The response was tagged `"type": "error"`.
    Failure(ErrorPayload),
    /// The response decoded into `T`.
    Success(T),
}

impl<T: DeserializeOwned> ApiReply<T> {
    /// Decodes a JSON value into a reply.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] if the value is not an error payload and
    /// does not match the shape of `T`.
    pub fn from_value(value: Value) -> Result<Self, ApiError> {
        if is_error_payload(&value) {
            let payload = ErrorPayload::from_value(&value).unwrap_or_else(|| ErrorPayload {
                message: "Bitbucket returned an error without a message".to_string(),
                detail: None,
            });
            return Ok(Self::Failure(payload));
        }

        serde_json::from_value(value)
            .map(Self::Success)
            .map_err(ApiError::Decode)
    }
}

impl<T> ApiReply<T> {
    /// Converts the reply into a `Result`, turning error payloads into [`ApiError::Api`].
    pub fn into_result(self) -> Result<T, ApiError> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(payload) => {
                tracing::warn!(message = %payload.message, "Bitbucket returned an error payload");
                Err(payload.into_error(None))
            }
        }
    }
}

/// Decodes a JSON value into `T`, short-circuiting on error payloads.
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    ApiReply::from_value(value)?.into_result()
}

/// HATEOAS-style link for API resource navigation.
///
/// Common link names include `self`, `html`, `avatar`, `commits`, `diff`.
///
/// # Example
///
/// ```rust
/// use bitbucket_pullrequests::api::common::Link;
///
/// let link: Link = serde_json::from_str(r#"{"href": "https://bitbucket.org/a/b/pull-requests/1"}"#).unwrap();
/// assert!(link.href.ends_with("/pull-requests/1"));
/// assert!(link.name.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Link {
    /// The URL of the linked resource.
    #[serde(deserialize_with = "null_as_default")]
    pub href: String,

    /// Optional descriptive name for the link.
    pub name: Option<String>,
}

/// Deserializes a field that Bitbucket may send as `null`, falling back to `T::default()`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_payload_cloud_format() {
        let payload = ErrorPayload::from_value(&json!({
            "type": "error",
            "error": {"message": "boom", "detail": "more context"}
        }))
        .unwrap();

        assert_eq!(payload.message, "boom");
        assert_eq!(payload.detail.as_deref(), Some("more context"));
    }

    #[test]
    fn test_error_payload_fallback_formats() {
        let detail_only = ErrorPayload::from_value(&json!({"error": {"detail": "denied"}})).unwrap();
        assert_eq!(detail_only.message, "denied");

        let bare = ErrorPayload::from_value(&json!({"message": "plain"})).unwrap();
        assert_eq!(bare.message, "plain");

        assert!(ErrorPayload::from_value(&json!({"values": []})).is_none());
    }

    #[test]
    fn test_reply_error_never_decodes_value() {
        #[derive(Debug, Deserialize)]
        struct Thing {
            #[allow(dead_code)]
            id: u64,
        }

        let result: Result<Thing, ApiError> =
            decode(json!({"type": "error", "error": {"message": "boom"}}));

        let err = result.unwrap_err();
        assert!(matches!(err, ApiError::Api { status: None, .. }));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_reply_error_without_message() {
        let err = decode::<Value>(json!({"type": "error"})).unwrap_err();
        assert!(err.to_string().contains("without a message"));
    }

    #[test]
    fn test_reply_shape_mismatch_is_decode_error() {
        let err = decode::<Link>(json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn test_null_link_href() {
        let link: Link = serde_json::from_value(json!({"href": null})).unwrap();
        assert_eq!(link.href, "");
    }

    #[test]
    fn test_status_helpers() {
        let err = ApiError::Http {
            status: 403,
            body: "nope".to_string(),
        };
        assert!(err.is_auth_error());
        assert!(!err.is_not_found());
        assert_eq!(err.status(), Some(403));
    }
}
