//
//  bitbucket-pullrequests
//  config/endpoint.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Endpoint Normalization
//!
//! Users type base URLs in many shapes (`https://api.bitbucket.org/2.0/`,
//! ` http://localhost:8080 `). Before a URL is stored or handed to the HTTP
//! client it is trimmed, stripped of trailing slashes and checked to be an
//! HTTP(S) URL.
//!
//! ```rust
//! use bitbucket_pullrequests::config::normalize_base_url;
//!
//! assert_eq!(
//!     normalize_base_url("  https://api.bitbucket.org/2.0/  ").unwrap(),
//!     "https://api.bitbucket.org/2.0"
//! );
//! assert!(normalize_base_url("api.bitbucket.org").is_err());
//! ```

use anyhow::{bail, Context, Result};
use url::Url;

pub use crate::api::DEFAULT_API_URL;

/// Normalizes and validates an API base URL.
///
/// # Errors
///
/// Fails if the input does not parse as an absolute URL or its scheme is
/// neither `http` nor `https`.
pub fn normalize_base_url(input: &str) -> Result<String> {
    let trimmed = input.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).with_context(|| format!("Invalid API URL '{}'", input.trim()))?;

    if !matches!(url.scheme(), "http" | "https") {
        bail!("API URL '{}' must use http or https", trimmed);
    }
    if url.host_str().is_none() {
        bail!("API URL '{}' has no host", trimmed);
    }

    Ok(trimmed.to_string())
}

/// Returns `true` if the URL points at Bitbucket Cloud.
pub fn is_cloud_api(base_url: &str) -> bool {
    Url::parse(base_url)
        .ok()
        .and_then(|url| url.host_str().map(|h| h.eq_ignore_ascii_case("api.bitbucket.org")))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_keeps_path() {
        assert_eq!(
            normalize_base_url("http://127.0.0.1:1234/api/2.0///").unwrap(),
            "http://127.0.0.1:1234/api/2.0"
        );
    }

    #[test]
    fn test_normalize_rejects_other_schemes() {
        assert!(normalize_base_url("ftp://example.com").is_err());
        assert!(normalize_base_url("").is_err());
    }

    #[test]
    fn test_is_cloud_api() {
        assert!(is_cloud_api(DEFAULT_API_URL));
        assert!(!is_cloud_api("http://localhost:8080/2.0"));
    }
}
