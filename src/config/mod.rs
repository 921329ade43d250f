// ABOUTME: Client configuration: credentials, target environment and derived base URLs
// ABOUTME: Base URLs are computed once at construction and never change afterwards
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration for the TrainingPeaks client

/// Environment-variable loading for [`ApiConfig`] and [`HttpConfig`]
pub mod environment;

use crate::constants::{hosts, http};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which TrainingPeaks deployment the client talks to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApiEnvironment {
    /// `sandbox.trainingpeaks.com`
    #[default]
    Sandbox,
    /// `trainingpeaks.com`
    Production,
}

impl ApiEnvironment {
    /// Map the production flag used by the constructor
    #[must_use]
    pub const fn from_production_flag(production: bool) -> Self {
        if production {
            Self::Production
        } else {
            Self::Sandbox
        }
    }

    /// Parse from string with fallback to sandbox
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" | "true" | "1" => Self::Production,
            _ => Self::Sandbox,
        }
    }

    /// Host name for this environment
    #[must_use]
    pub const fn host(self) -> &'static str {
        match self {
            Self::Production => hosts::PRODUCTION,
            Self::Sandbox => hosts::SANDBOX,
        }
    }

    /// Whether this is the production deployment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for ApiEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Production => write!(f, "production"),
            Self::Sandbox => write!(f, "sandbox"),
        }
    }
}

/// HTTP transport settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// Skip TLS certificate verification (sandbox and self-signed hosts)
    pub accept_invalid_certs: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: http::DEFAULT_TIMEOUT_SECS,
            connect_timeout_secs: http::DEFAULT_CONNECT_TIMEOUT_SECS,
            accept_invalid_certs: true,
        }
    }
}

/// Credentials and base URLs for one TrainingPeaks application
///
/// The id and secret are opaque; no format validation is performed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiConfig {
    client_id: String,
    client_secret: String,
    environment: ApiEnvironment,
    api_base_url: String,
    auth_base_url: String,
}

impl ApiConfig {
    /// Build a configuration, deriving both base URLs from the environment
    #[must_use]
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        environment: ApiEnvironment,
    ) -> Self {
        let host = environment.host();
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            environment,
            api_base_url: format!("https://{}.{host}/{}", hosts::API_SUBDOMAIN, hosts::API_PATH),
            auth_base_url: format!(
                "https://{}.{host}/{}",
                hosts::OAUTH_SUBDOMAIN,
                hosts::OAUTH_PATH
            ),
        }
    }

    /// OAuth client id
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// OAuth client secret
    #[must_use]
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// Target deployment
    #[must_use]
    pub const fn environment(&self) -> ApiEnvironment {
        self.environment
    }

    /// `https://api.<host>/v1/`
    #[must_use]
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// `https://oauth.<host>/oauth/`
    #[must_use]
    pub fn auth_base_url(&self) -> &str {
        &self.auth_base_url
    }

    /// Absolute URL of an OAuth endpoint such as `token`
    #[must_use]
    pub fn oauth_endpoint(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.auth_base_url)
    }
}

// The secret stays out of debug output and therefore out of logs.
impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("environment", &self.environment)
            .field("api_base_url", &self.api_base_url)
            .field("auth_base_url", &self.auth_base_url)
            .finish()
    }
}
