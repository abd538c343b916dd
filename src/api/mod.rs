//
//  bitbucket-pullrequests
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! This module provides the HTTP plumbing and the pull request bindings for
//! the Bitbucket Cloud REST API v2.0 at `api.bitbucket.org`.
//!
//! ## Architecture
//!
//! - [`client`]: reqwest-backed [`BitbucketClient`] with authentication
//! - [`executor`]: the [`Executor`] trait every binding sends requests through
//! - [`cloud`]: pull request types, options and endpoint bindings
//! - [`common`]: shared types (errors, error payloads, pagination, links)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bitbucket_pullrequests::api::BitbucketClient;
//! use bitbucket_pullrequests::api::cloud::PullRequestsOptions;
//! use bitbucket_pullrequests::auth::AuthCredential;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = BitbucketClient::cloud()?
//!     .with_auth(AuthCredential::bearer("your-token"));
//!
//! let options = PullRequestsOptions::new("my-team", "my-repo").with_id(7);
//! let pr = client.pull_requests().get_pull_request(&options).await?;
//! println!("{} [{}]", pr.title, pr.state);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Every operation returns [`ApiError`]:
//!
//! - `Network`: transport failure, passed through unchanged
//! - `Api`: Bitbucket error payload (`"type": "error"`)
//! - `Http`: non-success status without a readable message
//! - `Decode`: response shape did not match

pub mod client;
pub mod cloud;
pub mod common;
pub mod executor;

pub use client::{format_api_error, BitbucketClient, DEFAULT_API_URL};
pub use common::{ApiError, ApiReply};
pub use executor::Executor;
