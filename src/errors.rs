// ABOUTME: Error types for the TrainingPeaks API client
// ABOUTME: Token freshness, transport, header lookup, parameter and configuration failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Client Error Handling
//!
//! Every fallible operation of the client returns [`ClientResult`]. Errors are
//! never retried here; they surface synchronously to the caller of the method
//! that triggered them.

/// Errors produced by the TrainingPeaks client
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The held access token is inside the minimum-validity window
    ///
    /// Raised before any network call. Recover by running the refresh flow
    /// and storing the new token.
    #[error("TrainingPeaks access token needs to be refreshed")]
    TokenExpired,

    /// The transport failed before a response was received
    #[error("Transport error: {reason}")]
    Transport {
        /// Message reported by the transport
        reason: String,
    },

    /// The requested header was not part of the last response
    #[error("Header does not exist: {name}")]
    HeaderNotFound {
        /// Header name that was queried
        name: String,
    },

    /// A caller-supplied parameter collides with one the client injects
    #[error("Parameter '{key}' is reserved and set by the client")]
    ReservedParameter {
        /// The colliding key
        key: String,
    },

    /// An authenticated call was attempted before any access token was set
    #[error("No access token has been set")]
    MissingAccessToken,

    /// Configuration value missing or malformed
    #[error("Configuration error for {key}: {reason}")]
    Config {
        /// Configuration key
        key: &'static str,
        /// What was wrong with it
        reason: String,
    },

    /// A response body did not match the requested type
    #[error("Failed to deserialize response into {target}")]
    Deserialization {
        /// Name of the target type
        target: &'static str,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },
}

impl ClientError {
    /// Build a transport error from anything displayable
    pub fn transport(reason: impl std::fmt::Display) -> Self {
        Self::Transport {
            reason: reason.to_string(),
        }
    }

    /// Whether the caller can recover by refreshing the access token
    #[must_use]
    pub const fn is_token_expired(&self) -> bool {
        matches!(self, Self::TokenExpired)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        Self::transport(error)
    }
}

/// Result alias used throughout the crate
pub type ClientResult<T> = Result<T, ClientError>;
