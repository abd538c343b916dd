//
//  bitbucket-pullrequests
//  api/executor.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! The request execution seam.
//!
//! Endpoint bindings never talk to the network themselves. They build a
//! method, a URL and an optional JSON body and hand them to an [`Executor`],
//! which returns the decoded JSON value of the response.
//! [`BitbucketClient`](super::BitbucketClient) is the production implementation.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use super::common::ApiError;

/// Performs one HTTP round trip and returns the response body as JSON.
///
/// Implementations should:
/// - return transport failures as [`ApiError::Network`] unchanged
/// - return non-JSON bodies (diffs, patches) as [`Value::String`]
/// - return an empty body as [`Value::Null`]
#[async_trait]
pub trait Executor: Send + Sync {
    /// Sends `method url` with an optional JSON body.
    async fn execute(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<Value, ApiError>;
}
