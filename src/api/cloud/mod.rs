//
//  bitbucket-pullrequests
//  api/cloud/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Bitbucket Cloud API v2.0 pull request bindings.
//!
//! # Module Organization
//!
//! - [`pullrequests`] - Decoded pull request types and response decoding
//! - [`options`] - Call options and request body construction
//! - [`client`] - The endpoint bindings themselves
//!
//! # Notes
//!
//! - All timestamps are in ISO 8601 format
//! - UUIDs are returned with curly braces (e.g., `{123e4567-e89b-...}`)
//! - List endpoints return a single page; `next` links are not followed

pub mod client;
pub mod options;
pub mod pullrequests;

pub use client::PullRequestClient;
pub use options::PullRequestsOptions;
pub use pullrequests::{PullRequest, PullRequestState};
