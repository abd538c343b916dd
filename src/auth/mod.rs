//
//  bitbucket-pullrequests
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authentication Module
//!
//! Credentials accepted by the Bitbucket Cloud API and how they are attached
//! to outgoing requests.
//!
//! | Credential | Header |
//! |------------|--------|
//! | App password | `Authorization: Basic base64(username:password)` |
//! | Access token (OAuth, repository or workspace token) | `Authorization: Bearer <token>` |
//!
//! Credentials are usually built from the configuration file or environment
//! by [`Config::credential`](crate::config::Config::credential).

use std::fmt;

use reqwest::RequestBuilder;

/// Authentication credentials for Bitbucket Cloud.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthCredential {
    /// Username plus app password, sent with HTTP Basic authentication.
    AppPassword {
        /// The Bitbucket username.
        username: String,
        /// The app password generated from Bitbucket settings.
        password: String,
    },
    /// Any bearer token: OAuth access token, repository or workspace access token.
    Bearer {
        /// The token string.
        token: String,
    },
}

impl AuthCredential {
    /// Creates an app password credential.
    pub fn app_password(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::AppPassword {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Creates a bearer token credential.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// Applies the credential to an HTTP request.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bitbucket_pullrequests::auth::AuthCredential;
    /// use reqwest::Client;
    ///
    /// let request = AuthCredential::bearer("secret")
    ///     .apply_to_request(Client::new().get("https://api.bitbucket.org/2.0/user"))
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(request.headers()["authorization"], "Bearer secret");
    /// ```
    pub fn apply_to_request(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::AppPassword { username, password } => {
                request.basic_auth(username, Some(password))
            }
            Self::Bearer { token } => request.bearer_auth(token),
        }
    }

    /// Short name of the credential kind, safe to log.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AppPassword { .. } => "app-password",
            Self::Bearer { .. } => "bearer",
        }
    }
}

// Secrets stay out of logs and panic messages.
impl fmt::Debug for AuthCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AppPassword { username, .. } => f
                .debug_struct("AppPassword")
                .field("username", username)
                .field("password", &"***")
                .finish(),
            Self::Bearer { .. } => f.debug_struct("Bearer").field("token", &"***").finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Client;

    #[test]
    fn test_app_password_uses_basic_auth() {
        let request = AuthCredential::app_password("jane", "pw")
            .apply_to_request(Client::new().get("https://example.test"))
            .build()
            .unwrap();

        // base64("jane:pw")
        assert_eq!(request.headers()["authorization"], "Basic amFuZTpwdw==");
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let debug = format!("{:?}", AuthCredential::app_password("jane", "hunter2"));
        assert!(debug.contains("jane"));
        assert!(!debug.contains("hunter2"));

        let debug = format!("{:?}", AuthCredential::bearer("tok-123"));
        assert!(!debug.contains("tok-123"));
    }

    #[test]
    fn test_kind() {
        assert_eq!(AuthCredential::bearer("x").kind(), "bearer");
        assert_eq!(AuthCredential::app_password("a", "b").kind(), "app-password");
    }
}
