//
//  bitbucket-pullrequests
//  api/cloud/options.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Pull request options and request body construction.
//!
//! [`PullRequestsOptions`] identifies the target of a call (owner, repository
//! slug, pull request id, comment id) and carries the fields used when
//! creating, updating, merging or declining. Empty strings, `false` and empty
//! lists mean "not set".
//!
//! The body sent for create/update/merge/decline always has the same seven
//! top-level keys:
//!
//! ```json
//! {"source": {}, "destination": {}, "reviewers": [], "title": "",
//!  "description": "", "message": "", "close_source_branch": false}
//! ```
//!
//! Each key is only overridden when the matching option is set, except
//! `close_source_branch`, which always carries the option's value.
//!
//! # Example
//!
//! ```rust
//! use bitbucket_pullrequests::api::cloud::PullRequestsOptions;
//!
//! let options = PullRequestsOptions {
//!     title: "Add user authentication".to_string(),
//!     source_branch: "feature/auth".to_string(),
//!     destination_branch: "main".to_string(),
//!     reviewers: vec!["alice".to_string()],
//!     ..PullRequestsOptions::new("my-team", "my-repo")
//! };
//!
//! let body = options.build_body().unwrap();
//! assert_eq!(body["source"]["branch"]["name"], "feature/auth");
//! assert_eq!(body["reviewers"][0]["username"], "alice");
//! ```

use serde::Serialize;
use serde_json::Value;

use crate::api::common::ApiError;

/// Target and payload fields for a pull request call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequestsOptions {
    /// Pull request id, as it appears in the URL.
    pub id: String,
    /// Comment id for single-comment lookups.
    pub comment_id: String,
    /// Workspace or user that owns the repository.
    pub owner: String,
    /// Repository slug.
    pub repo_slug: String,
    pub title: String,
    pub description: String,
    /// Merge commit or decline message.
    pub message: String,
    pub source_branch: String,
    /// `{workspace}/{repo_slug}` of a fork holding the source branch.
    pub source_repository: String,
    pub destination_branch: String,
    pub destination_commit: String,
    /// Always sent, even when left at `false`.
    pub close_source_branch: bool,
    /// Reviewer usernames, sent in order.
    pub reviewers: Vec<String>,
}

impl PullRequestsOptions {
    /// Creates options targeting a repository, with every other field unset.
    pub fn new(owner: impl Into<String>, repo_slug: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo_slug: repo_slug.into(),
            ..Default::default()
        }
    }

    /// Sets the pull request id.
    pub fn with_id(mut self, id: impl ToString) -> Self {
        self.id = id.to_string();
        self
    }

    /// Sets the comment id.
    pub fn with_comment_id(mut self, comment_id: impl ToString) -> Self {
        self.comment_id = comment_id.to_string();
        self
    }

    /// Borrows the options as a serializable request body.
    pub fn to_body(&self) -> PullRequestBody<'_> {
        PullRequestBody::from(self)
    }

    /// Serializes the request body to JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Encode`] if serialization fails.
    pub fn build_body(&self) -> Result<Value, ApiError> {
        serde_json::to_value(self.to_body()).map_err(ApiError::Encode)
    }
}

/// Request body for create, update, merge and decline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestBody<'a> {
    pub source: BranchSpec<'a>,
    pub destination: BranchSpec<'a>,
    pub reviewers: Vec<ReviewerSpec<'a>>,
    pub title: &'a str,
    pub description: &'a str,
    pub message: &'a str,
    pub close_source_branch: bool,
}

/// Source or destination description. Serializes to `{}` when nothing is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BranchSpec<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<BranchName<'a>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<RepositoryName<'a>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<CommitHash<'a>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchName<'a> {
    pub name: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryName<'a> {
    pub full_name: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitHash<'a> {
    pub hash: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewerSpec<'a> {
    pub username: &'a str,
}

fn non_empty(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}

impl<'a> From<&'a PullRequestsOptions> for PullRequestBody<'a> {
    fn from(options: &'a PullRequestsOptions) -> Self {
        let source = BranchSpec {
            branch: non_empty(&options.source_branch).map(|name| BranchName { name }),
            repository: non_empty(&options.source_repository)
                .map(|full_name| RepositoryName { full_name }),
            commit: None,
        };

        let destination = BranchSpec {
            branch: non_empty(&options.destination_branch).map(|name| BranchName { name }),
            repository: None,
            commit: non_empty(&options.destination_commit).map(|hash| CommitHash { hash }),
        };

        Self {
            source,
            destination,
            reviewers: options
                .reviewers
                .iter()
                .map(|username| ReviewerSpec { username })
                .collect(),
            title: &options.title,
            description: &options.description,
            message: &options.message,
            close_source_branch: options.close_source_branch,
        }
    }
}
