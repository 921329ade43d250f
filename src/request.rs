// ABOUTME: Turns logical API calls into fully-qualified transport requests
// ABOUTME: Resolves paths against the API base URL and shapes query or body per HTTP verb
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Request building
//!
//! `get` puts every parameter in the query string. `post` sends them as a
//! form body with no method override, so the transport default of POST
//! applies. `put` and `delete` send a form body with an explicit override.

use crate::config::ApiConfig;
use crate::constants::{oauth_endpoints, params};
use crate::errors::ClientResult;
use crate::params::Parameters;
use serde::Serialize;
use std::fmt;

/// HTTP verbs the client issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
}

impl HttpMethod {
    /// Upper-case verb name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully assembled request, ready for the transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransportRequest {
    /// Absolute URL, including any query string
    pub url: String,
    /// Logical parameters of the call, kept for introspection
    pub parameters: Parameters,
    /// Form-encoded body, if the verb sends one
    pub body: Option<String>,
    /// Explicit verb override (`PUT`, `DELETE`)
    pub method_override: Option<HttpMethod>,
    /// Whether the request is signed with the access token
    pub authenticated: bool,
}

impl TransportRequest {
    /// Verb the transport should use
    ///
    /// An override wins; otherwise a request with a body is a POST and one
    /// without is a GET.
    #[must_use]
    pub fn method(&self) -> HttpMethod {
        self.method_override.unwrap_or(if self.body.is_some() {
            HttpMethod::Post
        } else {
            HttpMethod::Get
        })
    }

    /// URL with the access token value masked, suitable for logs
    #[must_use]
    pub fn redacted_url(&self) -> String {
        redact_access_token(&self.url)
    }
}

/// Builds [`TransportRequest`]s against one [`ApiConfig`]
#[derive(Debug, Clone, Copy)]
pub struct RequestBuilder<'a> {
    config: &'a ApiConfig,
}

impl<'a> RequestBuilder<'a> {
    /// Builder for the given configuration
    #[must_use]
    pub const fn new(config: &'a ApiConfig) -> Self {
        Self { config }
    }

    /// Absolute URL for `path`
    ///
    /// Leading whitespace is ignored. A path that already starts with `http`
    /// (for example a link returned by the API) is used verbatim; anything
    /// else is appended to the API base URL.
    #[must_use]
    pub fn absolute_url(&self, path: &str) -> String {
        let path = path.trim_start();
        if path.starts_with("http") {
            path.to_owned()
        } else {
            format!("{}{path}", self.config.api_base_url())
        }
    }

    /// Signed request for one of the CRUD verbs
    ///
    /// # Errors
    ///
    /// Returns [`crate::ClientError::ReservedParameter`] when `parameters`
    /// already carries `access_token`
    pub fn authenticated(
        &self,
        method: HttpMethod,
        path: &str,
        parameters: &Parameters,
        access_token: &str,
    ) -> ClientResult<TransportRequest> {
        let signed = parameters.with_access_token(access_token)?;
        let url = self.absolute_url(path);

        let request = match method {
            HttpMethod::Get => TransportRequest {
                url: append_query(&url, &signed),
                parameters: signed,
                body: None,
                method_override: None,
                authenticated: true,
            },
            HttpMethod::Post => TransportRequest {
                url,
                body: Some(signed.encode()),
                parameters: signed,
                method_override: None,
                authenticated: true,
            },
            HttpMethod::Put | HttpMethod::Delete => TransportRequest {
                url,
                body: Some(signed.encode()),
                parameters: signed,
                method_override: Some(method),
                authenticated: true,
            },
        };
        Ok(request)
    }

    /// Authorization page URL for the authorization-code flow
    #[must_use]
    pub fn authorization_url(&self, redirect_uri: &str, scope: Option<&str>) -> String {
        let mut query = Parameters::new()
            .with(params::CLIENT_ID, self.config.client_id())
            .with(params::REDIRECT_URI, redirect_uri)
            .with(params::RESPONSE_TYPE, params::RESPONSE_TYPE_CODE);
        if let Some(scope) = scope {
            query.insert(params::SCOPE, scope);
        }

        append_query(
            &self.config.oauth_endpoint(oauth_endpoints::AUTHORIZE),
            &query,
        )
    }

    /// Code-for-token exchange
    #[must_use]
    pub fn code_exchange(&self, code: &str) -> TransportRequest {
        self.token_request(
            Parameters::new()
                .with(params::CLIENT_ID, self.config.client_id())
                .with(params::CLIENT_SECRET, self.config.client_secret())
                .with(params::CODE, code)
                .with(params::GRANT_TYPE, params::GRANT_AUTHORIZATION_CODE),
        )
    }

    /// Refresh-token exchange
    #[must_use]
    pub fn refresh_exchange(&self, refresh_token: &str) -> TransportRequest {
        self.token_request(
            Parameters::new()
                .with(params::CLIENT_ID, self.config.client_id())
                .with(params::CLIENT_SECRET, self.config.client_secret())
                .with(params::REFRESH_TOKEN, refresh_token)
                .with(params::GRANT_TYPE, params::GRANT_REFRESH_TOKEN),
        )
    }

    /// Token revocation, signed with the current access token
    #[must_use]
    pub fn deauthorize(&self, access_token: &str) -> TransportRequest {
        let signed = Parameters::new().with(params::ACCESS_TOKEN, access_token);
        TransportRequest {
            url: self.config.oauth_endpoint(oauth_endpoints::DEAUTHORIZE),
            body: Some(signed.encode()),
            parameters: signed,
            method_override: None,
            authenticated: true,
        }
    }

    fn token_request(&self, parameters: Parameters) -> TransportRequest {
        TransportRequest {
            url: self.config.oauth_endpoint(oauth_endpoints::TOKEN),
            body: Some(parameters.encode()),
            parameters,
            method_override: None,
            authenticated: false,
        }
    }
}

/// Append `parameters` to `url` as a query string
///
/// Uses `&` when the URL already has a query and `?` otherwise. An empty
/// parameter set leaves the URL untouched.
#[must_use]
pub fn append_query(url: &str, parameters: &Parameters) -> String {
    if parameters.is_empty() {
        return url.to_owned();
    }
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}{}", parameters.encode())
}

/// Mask the value of any `access_token=` query parameter in `url`
#[must_use]
pub fn redact_access_token(url: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_owned();
    };
    let masked: Vec<String> = query
        .split('&')
        .map(|pair| {
            if pair.starts_with("access_token=") {
                "access_token=[REDACTED]".to_owned()
            } else {
                pair.to_owned()
            }
        })
        .collect();
    format!("{base}?{}", masked.join("&"))
}
