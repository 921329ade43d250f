// ABOUTME: Constants for the TrainingPeaks API client grouped by domain
// ABOUTME: Hosts, OAuth endpoint paths, parameter names, token validity window and env keys
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped into small domain modules rather than one flat list.

/// TrainingPeaks host names and URL templates
pub mod hosts {
    /// Production host
    pub const PRODUCTION: &str = "trainingpeaks.com";
    /// Sandbox host
    pub const SANDBOX: &str = "sandbox.trainingpeaks.com";
    /// Subdomain serving the REST API
    pub const API_SUBDOMAIN: &str = "api";
    /// Subdomain serving the OAuth endpoints
    pub const OAUTH_SUBDOMAIN: &str = "oauth";
    /// Versioned REST base path
    pub const API_PATH: &str = "v1/";
    /// OAuth base path
    pub const OAUTH_PATH: &str = "oauth/";
}

/// OAuth endpoint names, relative to the OAuth base URL
pub mod oauth_endpoints {
    /// Authorization page the user is redirected to
    pub const AUTHORIZE: &str = "authorize";
    /// Token endpoint for code and refresh exchanges
    pub const TOKEN: &str = "token";
    /// Token revocation endpoint
    pub const DEAUTHORIZE: &str = "deauthorize";
}

/// Request parameter names and fixed values
pub mod params {
    /// Access token parameter attached to every authenticated call
    pub const ACCESS_TOKEN: &str = "access_token";
    /// OAuth client id
    pub const CLIENT_ID: &str = "client_id";
    /// OAuth client secret
    pub const CLIENT_SECRET: &str = "client_secret";
    /// Redirect URI for the authorization step
    pub const REDIRECT_URI: &str = "redirect_uri";
    /// Response type for the authorization step
    pub const RESPONSE_TYPE: &str = "response_type";
    /// Requested scopes
    pub const SCOPE: &str = "scope";
    /// Authorization code
    pub const CODE: &str = "code";
    /// Grant type for the token endpoint
    pub const GRANT_TYPE: &str = "grant_type";
    /// Refresh token
    pub const REFRESH_TOKEN: &str = "refresh_token";

    /// `response_type` value for the authorization-code flow
    pub const RESPONSE_TYPE_CODE: &str = "code";
    /// `grant_type` value for code exchange
    pub const GRANT_AUTHORIZATION_CODE: &str = "authorization_code";
    /// `grant_type` value for refresh exchange
    pub const GRANT_REFRESH_TOKEN: &str = "refresh_token";
}

/// Token freshness rules
pub mod tokens {
    /// Minimum remaining lifetime, in seconds, an access token needs to be used
    pub const ACCESS_TOKEN_MINIMUM_VALIDITY_SECS: i64 = 3600;
}

/// HTTP transport defaults
pub mod http {
    /// Default request timeout in seconds
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
    /// Default connection timeout in seconds
    pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
    /// Form body content type
    pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
}

/// Environment variable names read by the configuration layer
pub mod env_config {
    /// OAuth client id
    pub const CLIENT_ID: &str = "TRAININGPEAKS_CLIENT_ID";
    /// OAuth client secret
    pub const CLIENT_SECRET: &str = "TRAININGPEAKS_CLIENT_SECRET";
    /// `production` or `sandbox`
    pub const ENVIRONMENT: &str = "TRAININGPEAKS_ENVIRONMENT";
    /// Access token used by the CLI
    pub const ACCESS_TOKEN: &str = "TRAININGPEAKS_ACCESS_TOKEN";
    /// Request timeout override
    pub const HTTP_TIMEOUT_SECS: &str = "TRAININGPEAKS_HTTP_TIMEOUT_SECS";
    /// Connect timeout override
    pub const HTTP_CONNECT_TIMEOUT_SECS: &str = "TRAININGPEAKS_HTTP_CONNECT_TIMEOUT_SECS";
    /// Whether to accept invalid TLS certificates
    pub const ACCEPT_INVALID_CERTS: &str = "TRAININGPEAKS_ACCEPT_INVALID_CERTS";
}

/// Service identity used in logs
pub mod service_names {
    /// Name reported by the logging layer
    pub const TRAININGPEAKS_CLIENT: &str = "trainingpeaks-api";
}
