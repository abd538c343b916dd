//
//  bitbucket-pullrequests
//  api/cloud/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Pull request endpoint bindings.
//!
//! [`PullRequestClient`] maps each pull request operation to one HTTP request
//! under `/repositories/{owner}/{repo_slug}/pullrequests/` and decodes the
//! answer. Operations ending in `_raw`, and those documented as returning a
//! raw response, hand back the JSON value untouched apart from error payload
//! detection.
//!
//! | Operation | Method | Path |
//! |-----------|--------|------|
//! | [`create`](PullRequestClient::create) | POST | `pullrequests/` |
//! | [`update`](PullRequestClient::update) | PUT | `pullrequests/{id}` |
//! | [`list`](PullRequestClient::list) | GET | `pullrequests/` |
//! | [`list_with_query`](PullRequestClient::list_with_query) | GET | `pullrequests/?q={query}` |
//! | [`get`](PullRequestClient::get) | GET | `pullrequests/{id}` |
//! | [`activities`](PullRequestClient::activities) | GET | `pullrequests/activity` |
//! | [`activity`](PullRequestClient::activity) | GET | `pullrequests/{id}/activity` |
//! | [`commits`](PullRequestClient::commits) | GET | `pullrequests/{id}/commits` |
//! | [`patch`](PullRequestClient::patch) | GET | `pullrequests/{id}/patch` |
//! | [`diff`](PullRequestClient::diff) | GET | `pullrequests/{id}/diff` |
//! | [`merge`](PullRequestClient::merge) | POST | `pullrequests/{id}/merge` |
//! | [`decline`](PullRequestClient::decline) | POST | `pullrequests/{id}/decline` |
//! | [`comments`](PullRequestClient::comments) | GET | `pullrequests/{id}/comments/` |
//! | [`comment`](PullRequestClient::comment) | GET | `pullrequests/{id}/comments/{comment_id}` |
//!
//! Options are not validated: an empty id simply produces the corresponding
//! path with nothing in its place.
//!
//! # Example
//!
//! ```rust,no_run
//! use bitbucket_pullrequests::api::BitbucketClient;
//! use bitbucket_pullrequests::api::cloud::PullRequestsOptions;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = BitbucketClient::cloud()?;
//! let options = PullRequestsOptions::new("my-team", "my-repo");
//!
//! for pr in client.pull_requests().list(&options).await? {
//!     println!("#{} {} [{}]", pr.id, pr.title, pr.state);
//! }
//! # Ok(())
//! # }
//! ```

use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use super::options::PullRequestsOptions;
use super::pullrequests::{decode_pull_request, decode_pull_requests, PullRequest};
use crate::api::common::{decode, ApiError};
use crate::api::executor::Executor;

/// Pull request operations bound to an executor and a base URL.
///
/// The client is a borrowed view: it holds no state of its own and is
/// cheap to create per call site.
pub struct PullRequestClient<'a, E: ?Sized> {
    executor: &'a E,
    base_url: &'a str,
}

impl<'a, E: Executor + ?Sized> PullRequestClient<'a, E> {
    /// Creates a client that sends requests through `executor`.
    ///
    /// `base_url` is the API root, e.g. `https://api.bitbucket.org/2.0`.
    pub fn new(executor: &'a E, base_url: &'a str) -> Self {
        Self { executor, base_url }
    }

    /// Creates a pull request and decodes the result.
    pub async fn create(&self, options: &PullRequestsOptions) -> Result<PullRequest, ApiError> {
        let body = options.build_body()?;
        let response = self
            .send(Method::POST, self.collection_url(options), Some(body))
            .await?;
        decode_pull_request(response)
    }

    /// Creates a pull request and returns the raw response.
    pub async fn create_raw(&self, options: &PullRequestsOptions) -> Result<Value, ApiError> {
        let body = options.build_body()?;
        self.send_raw(Method::POST, self.collection_url(options), Some(body))
            .await
    }

    /// Updates a pull request and returns the raw response.
    pub async fn update(&self, options: &PullRequestsOptions) -> Result<Value, ApiError> {
        let body = options.build_body()?;
        self.send_raw(Method::PUT, self.item_url(options, ""), Some(body))
            .await
    }

    /// Lists the first page of pull requests.
    pub async fn list(&self, options: &PullRequestsOptions) -> Result<Vec<PullRequest>, ApiError> {
        let response = self
            .send(Method::GET, self.collection_url(options), None)
            .await?;
        decode_pull_requests(response)
    }

    /// Lists the first page of pull requests matching a Bitbucket query,
    /// e.g. `state="OPEN" AND author.nickname="jane"`.
    pub async fn list_with_query(
        &self,
        options: &PullRequestsOptions,
        query: &str,
    ) -> Result<Vec<PullRequest>, ApiError> {
        let response = self
            .send(Method::GET, self.query_url(options, query), None)
            .await?;
        decode_pull_requests(response)
    }

    /// Same as [`list_with_query`](Self::list_with_query) without decoding.
    pub async fn list_with_query_raw(
        &self,
        options: &PullRequestsOptions,
        query: &str,
    ) -> Result<Value, ApiError> {
        self.send_raw(Method::GET, self.query_url(options, query), None)
            .await
    }

    /// Fetches a pull request and returns the raw response.
    pub async fn get(&self, options: &PullRequestsOptions) -> Result<Value, ApiError> {
        self.send_raw(Method::GET, self.item_url(options, ""), None)
            .await
    }

    /// Fetches a pull request and decodes it.
    pub async fn get_pull_request(
        &self,
        options: &PullRequestsOptions,
    ) -> Result<PullRequest, ApiError> {
        let response = self
            .send(Method::GET, self.item_url(options, ""), None)
            .await?;
        decode_pull_request(response)
    }

    /// Activity across all pull requests of the repository.
    pub async fn activities(&self, options: &PullRequestsOptions) -> Result<Value, ApiError> {
        let url = format!("{}activity", self.collection_url(options));
        self.send_raw(Method::GET, url, None).await
    }

    /// Activity of a single pull request.
    pub async fn activity(&self, options: &PullRequestsOptions) -> Result<Value, ApiError> {
        self.send_raw(Method::GET, self.item_url(options, "/activity"), None)
            .await
    }

    pub async fn commits(&self, options: &PullRequestsOptions) -> Result<Value, ApiError> {
        self.send_raw(Method::GET, self.item_url(options, "/commits"), None)
            .await
    }

    /// The patch series; the body arrives as a JSON string value.
    pub async fn patch(&self, options: &PullRequestsOptions) -> Result<Value, ApiError> {
        self.send_raw(Method::GET, self.item_url(options, "/patch"), None)
            .await
    }

    /// The unified diff; the body arrives as a JSON string value.
    pub async fn diff(&self, options: &PullRequestsOptions) -> Result<Value, ApiError> {
        self.send_raw(Method::GET, self.item_url(options, "/diff"), None)
            .await
    }

    /// The patch series as text.
    pub async fn patch_text(&self, options: &PullRequestsOptions) -> Result<String, ApiError> {
        self.patch(options).await.map(into_text)
    }

    /// The unified diff as text.
    pub async fn diff_text(&self, options: &PullRequestsOptions) -> Result<String, ApiError> {
        self.diff(options).await.map(into_text)
    }

    /// Merges a pull request. `message` and `close_source_branch` are honoured.
    pub async fn merge(&self, options: &PullRequestsOptions) -> Result<Value, ApiError> {
        let body = options.build_body()?;
        self.send_raw(Method::POST, self.item_url(options, "/merge"), Some(body))
            .await
    }

    pub async fn decline(&self, options: &PullRequestsOptions) -> Result<Value, ApiError> {
        let body = options.build_body()?;
        self.send_raw(Method::POST, self.item_url(options, "/decline"), Some(body))
            .await
    }

    pub async fn comments(&self, options: &PullRequestsOptions) -> Result<Value, ApiError> {
        self.send_raw(Method::GET, self.item_url(options, "/comments/"), None)
            .await
    }

    pub async fn comment(&self, options: &PullRequestsOptions) -> Result<Value, ApiError> {
        let url = format!(
            "{}{}",
            self.item_url(options, "/comments/"),
            options.comment_id
        );
        self.send_raw(Method::GET, url, None).await
    }

    fn collection_url(&self, options: &PullRequestsOptions) -> String {
        format!(
            "{}/repositories/{}/{}/pullrequests/",
            self.base_url.trim_end_matches('/'),
            options.owner,
            options.repo_slug
        )
    }

    fn item_url(&self, options: &PullRequestsOptions, suffix: &str) -> String {
        format!("{}{}{}", self.collection_url(options), options.id, suffix)
    }

    fn query_url(&self, options: &PullRequestsOptions, query: &str) -> String {
        let query: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
        format!("{}?q={}", self.collection_url(options), query)
    }

    async fn send(
        &self,
        method: Method,
        url: String,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        debug!(%method, %url, has_body = body.is_some(), "pull request call");
        self.executor.execute(method, &url, body.as_ref()).await
    }

    async fn send_raw(
        &self,
        method: Method,
        url: String,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        let response = self.send(method, url, body).await?;
        decode(response)
    }
}

fn into_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
