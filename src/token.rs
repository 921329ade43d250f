// ABOUTME: Access/refresh token state and freshness rules for authenticated calls
// ABOUTME: Partial updates keep stored values, and stale tokens are refused when set
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::tokens::ACCESS_TOKEN_MINIMUM_VALIDITY_SECS;
use crate::errors::{ClientError, ClientResult};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tokens held by one client instance
#[derive(Clone, Default, PartialEq, Eq)]
pub struct TokenState {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_at: Option<DateTime<Utc>>,
}

impl TokenState {
    /// Empty state: no tokens and no known expiry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current access token, if one was accepted
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// Current refresh token
    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// Expiry of the access token, if known
    #[must_use]
    pub const fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Whether the access token must be refreshed before use
    #[must_use]
    pub fn is_refresh_needed(&self) -> bool {
        self.is_refresh_needed_at(Utc::now())
    }

    /// Freshness check against an explicit clock
    ///
    /// True iff an expiry is known and fewer than
    /// [`ACCESS_TOKEN_MINIMUM_VALIDITY_SECS`] seconds remain at `now`.
    /// Without an expiry the caller is trusted and this is always false.
    #[must_use]
    pub fn is_refresh_needed_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| {
            expires_at - now < Duration::seconds(ACCESS_TOKEN_MINIMUM_VALIDITY_SECS)
        })
    }

    /// Store a new access token, updating refresh token and expiry only when given
    ///
    /// The refresh token and expiry are written first. If the resulting state
    /// needs a refresh, the access token is not stored and the call fails, so
    /// the held refresh token can be used to obtain a usable one.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::TokenExpired`] when `expires_at` is already
    /// inside the minimum-validity window
    pub fn set(
        &mut self,
        access_token: String,
        refresh_token: Option<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> ClientResult<()> {
        if let Some(refresh_token) = refresh_token {
            self.refresh_token = Some(refresh_token);
        }
        if let Some(expires_at) = expires_at {
            self.expires_at = Some(expires_at);
            if self.is_refresh_needed() {
                return Err(ClientError::TokenExpired);
            }
        }

        self.access_token = Some(access_token);
        Ok(())
    }

    /// Store a refresh token alone, leaving access token and expiry untouched
    pub fn set_refresh_token(&mut self, refresh_token: String) {
        self.refresh_token = Some(refresh_token);
    }

    /// Drop every held token and the expiry
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl fmt::Debug for TokenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenState")
            .field("has_access_token", &self.access_token.is_some())
            .field("has_refresh_token", &self.refresh_token.is_some())
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Token endpoint response body
///
/// The client does not require this shape; it is a typed view for callers
/// that want to store the tokens from an exchange without manual plumbing.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The access token issued by the authorization server
    pub access_token: String,
    /// Refresh token for obtaining new access tokens
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Token lifetime in seconds
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// The type of token (usually "bearer")
    #[serde(default)]
    pub token_type: Option<String>,
    /// Space-separated list of granted scopes
    #[serde(default)]
    pub scope: Option<String>,
}

impl TokenResponse {
    /// Absolute expiry computed from `expires_in` relative to `issued_at`
    ///
    /// `None` when `expires_in` is absent or lands outside the representable
    /// time range.
    #[must_use]
    pub fn expires_at_from(&self, issued_at: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.expires_in
            .and_then(Duration::try_seconds)
            .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
    }

    /// Absolute expiry computed from `expires_in` relative to now
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at_from(Utc::now())
    }
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"[REDACTED]")
            .field("has_refresh_token", &self.refresh_token.is_some())
            .field("expires_in", &self.expires_in)
            .field("token_type", &self.token_type)
            .field("scope", &self.scope)
            .finish()
    }
}
