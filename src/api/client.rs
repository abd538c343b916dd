//
//  bitbucket-pullrequests
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # HTTP Client Wrapper for Bitbucket API
//!
//! This module provides the reqwest-backed [`Executor`] used by every binding.
//! It handles authentication, JSON request bodies, status code checks and the
//! decoding of Bitbucket error bodies.
//!
//! ## Features
//!
//! - Injected base URL (no process-wide globals)
//! - Authentication header injection
//! - JSON bodies in, JSON (or plain text) values out
//! - Optional request timeout
//! - Custom User-Agent header

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use tracing::debug;

use super::cloud::PullRequestClient;
use super::common::{ApiError, ErrorPayload};
use super::executor::Executor;
use crate::auth::AuthCredential;
use crate::config::ApiConfig;

/// Root of the Bitbucket Cloud REST API v2.0.
pub const DEFAULT_API_URL: &str = "https://api.bitbucket.org/2.0";

/// Turns a non-success response into an [`ApiError`].
///
/// If the body carries a Bitbucket error message it becomes
/// [`ApiError::Api`]; otherwise the raw body is kept in [`ApiError::Http`].
///
/// # Example
///
/// ```rust
/// use bitbucket_pullrequests::api::{format_api_error, ApiError};
/// use reqwest::StatusCode;
///
/// let err = format_api_error(
///     StatusCode::NOT_FOUND,
///     r#"{"type": "error", "error": {"message": "Repository not found"}}"#,
/// );
/// assert!(matches!(err, ApiError::Api { status: Some(404), .. }));
///
/// let err = format_api_error(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
/// assert!(matches!(err, ApiError::Http { status: 502, .. }));
/// ```
pub fn format_api_error(status: StatusCode, body: &str) -> ApiError {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| ErrorPayload::from_value(&json))
        .map(|payload| payload.into_error(Some(status.as_u16())))
        .unwrap_or_else(|| ApiError::Http {
            status: status.as_u16(),
            body: body.to_string(),
        })
}

/// The HTTP client for the Bitbucket Cloud API.
///
/// The client is immutable once built and can be shared by reference
/// across tasks.
///
/// # Example
///
/// ```rust,no_run
/// use bitbucket_pullrequests::api::BitbucketClient;
/// use bitbucket_pullrequests::auth::AuthCredential;
///
/// let client = BitbucketClient::cloud()?
///     .with_auth(AuthCredential::app_password("me", "app-password"));
/// assert_eq!(client.base_url(), "https://api.bitbucket.org/2.0");
/// # Ok::<(), bitbucket_pullrequests::api::ApiError>(())
/// ```
#[derive(Debug, Clone)]
pub struct BitbucketClient {
    /// The underlying HTTP client
    http: Client,
    /// API root without trailing slash
    base_url: String,
    /// Optional authentication credentials
    auth: Option<AuthCredential>,
}

impl BitbucketClient {
    /// Creates a client for `https://api.bitbucket.org/2.0`.
    pub fn cloud() -> Result<Self, ApiError> {
        Self::with_base_url(DEFAULT_API_URL)
    }

    /// Creates a client for a custom API root, e.g. a proxy or a test server.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] if `base_url` is not an HTTP(S) URL.
    pub fn with_base_url(base_url: &str) -> Result<Self, ApiError> {
        Self::build(base_url, None)
    }

    /// Creates a client from the `[api]` section of the configuration.
    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        Self::build(&config.base_url, config.timeout_secs.map(Duration::from_secs))
    }

    fn build(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let parsed = url::Url::parse(base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidUrl(format!(
                "{base_url}: unsupported scheme '{}'",
                parsed.scheme()
            )));
        }

        let mut builder = Client::builder().user_agent(format!("bbpr/{}", crate::VERSION));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth: None,
        })
    }

    /// Sets the authentication credentials for this client.
    pub fn with_auth(mut self, auth: AuthCredential) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Returns `true` if credentials are configured.
    pub fn is_authenticated(&self) -> bool {
        self.auth.is_some()
    }

    /// Returns the API root, without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Pull request operations using this client.
    pub fn pull_requests(&self) -> PullRequestClient<'_, Self> {
        PullRequestClient::new(self, &self.base_url)
    }
}

#[async_trait]
impl Executor for BitbucketClient {
    async fn execute(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let mut request = self.http.request(method.clone(), url);

        if let Some(body) = body {
            request = request.json(body);
        }

        if let Some(auth) = &self.auth {
            request = auth.apply_to_request(request);
        }

        let response = request.send().await?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let text = response.text().await?;

        debug!(%method, url, status = status.as_u16(), bytes = text.len(), "response received");

        if !status.is_success() {
            return Err(format_api_error(status, &text));
        }

        parse_body(content_type.as_deref(), text)
    }
}

/// JSON bodies are parsed; anything else is kept as a string value.
fn parse_body(content_type: Option<&str>, text: String) -> Result<Value, ApiError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }

    match content_type {
        Some(ct) if ct.contains("json") => serde_json::from_str(&text).map_err(ApiError::Decode),
        Some(_) => Ok(Value::String(text)),
        None => Ok(serde_json::from_str(&text).unwrap_or(Value::String(text))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_base_url_is_normalized() {
        let client = BitbucketClient::with_base_url("http://localhost:8080/2.0/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/2.0");
        assert!(!client.is_authenticated());
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            BitbucketClient::with_base_url("not a url"),
            Err(ApiError::InvalidUrl(_))
        ));
        assert!(matches!(
            BitbucketClient::with_base_url("ftp://example.com"),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_format_api_error_keeps_detail() {
        let err = format_api_error(
            StatusCode::BAD_REQUEST,
            r#"{"type":"error","error":{"message":"Bad request","detail":"title is required"}}"#,
        );

        match err {
            ApiError::Api {
                status,
                message,
                detail,
            } => {
                assert_eq!(status, Some(400));
                assert_eq!(message, "Bad request");
                assert_eq!(detail.as_deref(), Some("title is required"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_body() {
        assert_eq!(
            parse_body(Some("application/json; charset=utf-8"), r#"{"id":1}"#.into()).unwrap(),
            json!({"id": 1})
        );
        assert_eq!(
            parse_body(Some("text/plain"), "diff --git".into()).unwrap(),
            json!("diff --git")
        );
        assert_eq!(parse_body(None, "  ".into()).unwrap(), Value::Null);
        assert_eq!(parse_body(None, "[1]".into()).unwrap(), json!([1]));
        assert!(matches!(
            parse_body(Some("application/json"), "{".into()),
            Err(ApiError::Decode(_))
        ));
    }
}
