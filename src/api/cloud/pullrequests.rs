//
//  bitbucket-pullrequests
//  api/cloud/pullrequests.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Cloud pull request API types and data structures.
//!
//! This module provides the decoded representation of Bitbucket Cloud pull
//! requests together with the functions that turn raw JSON responses into it.
//!
//! # Pull Request Lifecycle
//!
//! 1. **OPEN** - Initial state when created
//! 2. **MERGED** - Successfully merged into the destination branch
//! 3. **DECLINED** - Rejected and closed without merging
//! 4. **SUPERSEDED** - Replaced by another pull request
//!
//! # Decoding
//!
//! Decoding is structural and lenient. Unknown fields are ignored, while
//! missing fields and `null`s take the zero value of the field. A value of
//! the wrong JSON type (a string where a number is expected) is an error.
//!
//! ```rust
//! use bitbucket_pullrequests::api::cloud::pullrequests::{decode_pull_request, PullRequestState};
//! use serde_json::json;
//!
//! let pr = decode_pull_request(json!({
//!     "id": 42,
//!     "title": "Add user authentication",
//!     "state": "OPEN",
//!     "source": {"branch": {"name": "feature/auth"}},
//!     "destination": {"branch": {"name": "main"}}
//! }))
//! .unwrap();
//!
//! assert_eq!(pr.id, 42);
//! assert_eq!(pr.state, PullRequestState::Open);
//! assert_eq!(pr.source.branch.name, "feature/auth");
//! ```

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::common::{decode, null_as_default, ApiError, Link, PaginatedResponse};

/// Named links attached to a resource (`self`, `html`, `diff`, ...).
pub type Links = BTreeMap<String, Link>;

/// State of a pull request.
///
/// Values Bitbucket may add later decode as [`PullRequestState::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PullRequestState {
    /// Open and awaiting review or merge.
    Open,
    /// Merged into the destination branch.
    Merged,
    /// Closed without merging.
    Declined,
    /// Replaced by another pull request.
    Superseded,
    /// Missing or unrecognised state.
    #[default]
    #[serde(other)]
    Unknown,
}

impl PullRequestState {
    /// Returns the wire representation (`OPEN`, `MERGED`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Merged => "MERGED",
            Self::Declined => "DECLINED",
            Self::Superseded => "SUPERSEDED",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for PullRequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents a pull request in Bitbucket Cloud.
///
/// # Example
///
/// ```rust,no_run
/// use bitbucket_pullrequests::api::cloud::pullrequests::PullRequest;
///
/// fn display_pr(pr: &PullRequest) {
///     println!("PR #{}: {}", pr.id, pr.title);
///     println!("  State: {}", pr.state);
///     println!("  {} -> {}", pr.source.branch.name, pr.destination.branch.name);
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullRequest {
    /// Numeric identifier, unique within the repository.
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,

    /// Short summary of the changes.
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,

    /// Detailed description. Supports Markdown formatting.
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,

    /// Current state of the pull request.
    #[serde(deserialize_with = "null_as_default")]
    pub state: PullRequestState,

    /// The user who opened the pull request.
    #[serde(deserialize_with = "null_as_default")]
    pub author: Person,

    /// The branch containing the proposed changes.
    #[serde(deserialize_with = "null_as_default")]
    pub source: PullRequestEndpoint,

    /// The branch the changes will be merged into.
    #[serde(deserialize_with = "null_as_default")]
    pub destination: PullRequestEndpoint,

    /// Whether the source branch is deleted once the pull request is merged.
    #[serde(deserialize_with = "null_as_default")]
    pub close_source_branch: bool,

    /// Number of open tasks.
    #[serde(deserialize_with = "null_as_default")]
    pub task_count: u32,

    /// Number of comments.
    #[serde(deserialize_with = "null_as_default")]
    pub comment_count: u32,

    /// ISO 8601 creation timestamp.
    #[serde(deserialize_with = "null_as_default")]
    pub created_on: String,

    /// ISO 8601 last update timestamp.
    #[serde(deserialize_with = "null_as_default")]
    pub updated_on: String,

    /// Named links (`self`, `html`, `diff`, `commits`, ...).
    #[serde(deserialize_with = "null_as_default")]
    pub links: Links,

    /// The user who merged or declined the pull request.
    pub closed_by: Option<Person>,

    /// Reason given when the pull request was declined.
    #[serde(deserialize_with = "null_as_default")]
    pub reason: String,

    /// The merge commit, once merged.
    pub merge_commit: Option<Commit>,

    /// Users asked to review.
    #[serde(deserialize_with = "null_as_default")]
    pub reviewers: Vec<Person>,

    /// Everyone who commented, approved or reviewed.
    #[serde(deserialize_with = "null_as_default")]
    pub participants: Vec<Participant>,
}

impl PullRequest {
    /// Returns the browser URL of the pull request, if present.
    pub fn html_url(&self) -> Option<&str> {
        self.links.get("html").map(|link| link.href.as_str())
    }

    /// Parses `created_on`, returning `None` when it is empty or malformed.
    pub fn created_at(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.created_on).ok()
    }

    /// Parses `updated_on`, returning `None` when it is empty or malformed.
    pub fn updated_at(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.updated_on).ok()
    }

    /// Number of participants who approved.
    pub fn approval_count(&self) -> usize {
        self.participants.iter().filter(|p| p.approved).count()
    }
}

/// One side (source or destination) of a pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullRequestEndpoint {
    /// Head commit of the branch.
    #[serde(deserialize_with = "null_as_default")]
    pub commit: Commit,

    /// Repository that holds the branch.
    #[serde(deserialize_with = "null_as_default")]
    pub repository: PullRequestRepository,

    /// The branch itself.
    #[serde(deserialize_with = "null_as_default")]
    pub branch: BranchRef,
}

/// Branch name wrapper as it appears in pull request endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BranchRef {
    /// The branch name.
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
}

/// Minimal repository reference embedded in a pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullRequestRepository {
    /// Human-readable name.
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,

    /// UUID, including curly braces.
    #[serde(deserialize_with = "null_as_default")]
    pub uuid: String,

    /// `{workspace}/{repo_slug}`.
    #[serde(deserialize_with = "null_as_default")]
    pub full_name: String,

    #[serde(deserialize_with = "null_as_default")]
    pub links: Links,
}

/// Reference to a Git commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Commit {
    /// Commit hash. Bitbucket often sends the 12 character short form.
    #[serde(deserialize_with = "null_as_default")]
    pub hash: String,

    #[serde(deserialize_with = "null_as_default")]
    pub links: Links,
}

/// A Bitbucket account as embedded in pull request payloads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Person {
    #[serde(deserialize_with = "null_as_default")]
    pub display_name: String,

    #[serde(deserialize_with = "null_as_default")]
    pub account_id: String,

    #[serde(deserialize_with = "null_as_default")]
    pub nickname: String,

    #[serde(deserialize_with = "null_as_default")]
    pub uuid: String,

    /// Only present on older accounts.
    #[serde(deserialize_with = "null_as_default")]
    pub username: String,

    #[serde(deserialize_with = "null_as_default")]
    pub links: Links,
}

impl Person {
    /// Best available short handle: nickname, then username, then display name.
    pub fn handle(&self) -> &str {
        [&self.nickname, &self.username, &self.display_name]
            .into_iter()
            .find(|s| !s.is_empty())
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// A participant in a pull request with role and approval status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Participant {
    #[serde(deserialize_with = "null_as_default")]
    pub user: Person,

    /// `PARTICIPANT` or `REVIEWER`.
    #[serde(deserialize_with = "null_as_default")]
    pub role: String,

    #[serde(deserialize_with = "null_as_default")]
    pub approved: bool,

    /// `approved`, `changes_requested`, or absent.
    pub state: Option<String>,

    pub participated_on: Option<String>,
}

/// Decodes a single pull request response.
///
/// # Errors
///
/// - [`ApiError::Api`] if the body is an error payload
/// - [`ApiError::Decode`] if the body is not a pull request object
pub fn decode_pull_request(response: Value) -> Result<PullRequest, ApiError> {
    decode(response)
}

/// Decodes the `values` of a pull request list page, preserving order.
///
/// A single malformed element fails the whole page.
///
/// # Errors
///
/// - [`ApiError::Api`] if the body is an error payload
/// - [`ApiError::Decode`] if `values` is missing or an element does not decode
pub fn decode_pull_requests(response: Value) -> Result<Vec<PullRequest>, ApiError> {
    let page: PaginatedResponse<PullRequest> = decode(response)?;
    if page.has_next() {
        tracing::debug!(
            returned = page.values.len(),
            size = ?page.size,
            "pull request list has further pages that were not fetched"
        );
    }
    Ok(page.into_values())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_pull_request() -> Value {
        json!({
            "type": "pullrequest",
            "id": 7,
            "title": "Fix login",
            "description": "Handles expired sessions",
            "state": "MERGED",
            "author": {
                "display_name": "Jane Doe",
                "account_id": "557058:abc",
                "nickname": "jane",
                "uuid": "{1111}",
                "type": "user",
                "links": {"avatar": {"href": "https://avatars.example/jane.png"}}
            },
            "source": {
                "commit": {"hash": "abc123def456", "type": "commit"},
                "repository": {"name": "app", "full_name": "team/app", "uuid": "{2222}"},
                "branch": {"name": "fix/login"}
            },
            "destination": {
                "commit": {"hash": "0000aaaa1111"},
                "repository": {"name": "app", "full_name": "team/app", "uuid": "{2222}"},
                "branch": {"name": "main"}
            },
            "close_source_branch": true,
            "task_count": 2,
            "comment_count": 5,
            "created_on": "2025-01-02T03:04:05.678901+00:00",
            "updated_on": "2025-01-03T03:04:05.678901+00:00",
            "links": {
                "html": {"href": "https://bitbucket.org/team/app/pull-requests/7"},
                "self": {"href": "https://api.bitbucket.org/2.0/repositories/team/app/pullrequests/7"}
            },
            "closed_by": {"display_name": "Bob", "nickname": "bob"},
            "reason": "",
            "merge_commit": {"hash": "feedbeef0001"},
            "reviewers": [{"display_name": "Bob", "nickname": "bob"}],
            "participants": [
                {"user": {"nickname": "bob"}, "role": "REVIEWER", "approved": true, "state": "approved"},
                {"user": {"nickname": "eve"}, "role": "PARTICIPANT", "approved": false, "state": null}
            ],
            "summary": {"raw": "Handles expired sessions", "markup": "markdown"}
        })
    }

    #[test]
    fn test_decode_full_pull_request() {
        let pr = decode_pull_request(full_pull_request()).unwrap();

        assert_eq!(pr.id, 7);
        assert_eq!(pr.state, PullRequestState::Merged);
        assert_eq!(pr.author.handle(), "jane");
        assert_eq!(pr.source.commit.hash, "abc123def456");
        assert_eq!(pr.source.repository.full_name, "team/app");
        assert_eq!(pr.destination.branch.name, "main");
        assert!(pr.close_source_branch);
        assert_eq!(pr.task_count, 2);
        assert_eq!(pr.comment_count, 5);
        assert_eq!(pr.html_url(), Some("https://bitbucket.org/team/app/pull-requests/7"));
        assert_eq!(pr.closed_by.as_ref().map(Person::handle), Some("bob"));
        assert_eq!(pr.merge_commit.as_ref().map(|c| c.hash.as_str()), Some("feedbeef0001"));
        assert_eq!(pr.approval_count(), 1);
        assert!(pr.created_at().is_some());
    }

    #[test]
    fn test_missing_and_null_fields_take_zero_values() {
        let pr = decode_pull_request(json!({
            "id": 3,
            "description": null,
            "merge_commit": null,
            "closed_by": null,
            "source": {"commit": null, "branch": {"name": "topic"}}
        }))
        .unwrap();

        assert_eq!(pr.id, 3);
        assert_eq!(pr.title, "");
        assert_eq!(pr.description, "");
        assert_eq!(pr.state, PullRequestState::Unknown);
        assert!(pr.merge_commit.is_none());
        assert!(pr.closed_by.is_none());
        assert_eq!(pr.source.commit, Commit::default());
        assert_eq!(pr.source.branch.name, "topic");
        assert!(pr.created_at().is_none());

        let pr = decode_pull_request(json!({"id": null, "title": "a"})).unwrap();
        assert_eq!(pr.id, 0);
        assert_eq!(pr.title, "a");
    }

    #[test]
    fn test_unknown_state_is_tolerated() {
        let pr = decode_pull_request(json!({"id": 1, "state": "DRAFT"})).unwrap();
        assert_eq!(pr.state, PullRequestState::Unknown);
    }

    #[test]
    fn test_wrong_type_is_decode_error() {
        let err = decode_pull_request(json!({"id": "seven"})).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));

        let err = decode_pull_request(json!("not an object")).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn test_decode_list_preserves_order() {
        let prs = decode_pull_requests(json!({
            "values": [{"id": 1, "title": "a"}, {"id": 2, "title": "b"}],
            "pagelen": 10,
            "next": "https://api.bitbucket.org/2.0/repositories/a/b/pullrequests/?page=2"
        }))
        .unwrap();

        let summary: Vec<(u64, &str)> = prs.iter().map(|p| (p.id, p.title.as_str())).collect();
        assert_eq!(summary, vec![(1, "a"), (2, "b")]);
    }

    #[test]
    fn test_decode_list_item_failure_fails_all() {
        let err = decode_pull_requests(json!({
            "values": [{"id": 1}, {"id": "two"}]
        }))
        .unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn test_decode_list_without_values() {
        let err = decode_pull_requests(json!({"size": 0})).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn test_decode_error_payload() {
        let response = json!({"type": "error", "error": {"message": "boom"}});

        let err = decode_pull_request(response.clone()).unwrap_err();
        assert!(err.to_string().contains("boom"));

        let err = decode_pull_requests(response).unwrap_err();
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_state_display() {
        assert_eq!(PullRequestState::Declined.to_string(), "DECLINED");
        assert_eq!(
            serde_json::to_value(PullRequestState::Superseded).unwrap(),
            json!("SUPERSEDED")
        );
    }
}
