// ABOUTME: TrainingPeaks API client driving the OAuth2 dance and signed CRUD calls
// ABOUTME: Gates every authenticated request on token freshness before touching the transport
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # API Client
//!
//! [`ApiClient`] composes the configuration, the held tokens, a request
//! builder and a [`Transport`]. Each network method checks token freshness
//! when the call is signed, builds its request, sends it, and returns an [`ApiResponse`] describing the call.
//!
//! The most recent request URL, parameters, metadata and headers are also
//! kept on the instance and exposed through accessors. They are overwritten
//! on every call. Network methods take `&mut self`; use one client per
//! session.

use crate::config::{ApiConfig, ApiEnvironment, HttpConfig};
use crate::errors::{ClientError, ClientResult};
use crate::headers::ResponseHeaders;
use crate::params::Parameters;
use crate::request::{HttpMethod, RequestBuilder, TransportRequest};
use crate::response::{ApiResponse, RequestRecord};
use crate::token::{TokenResponse, TokenState};
use crate::transport::{ReqwestTransport, RequestMetadata, Transport};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

/// Client for one TrainingPeaks application and one user session
pub struct ApiClient<T: Transport = ReqwestTransport> {
    config: ApiConfig,
    tokens: TokenState,
    transport: T,
    last_request: RequestRecord,
    last_request_info: Option<RequestMetadata>,
    response_headers: ResponseHeaders,
}

impl ApiClient<ReqwestTransport> {
    /// Create a client for the production or sandbox deployment
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if the HTTP client cannot be built
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        production: bool,
    ) -> ClientResult<Self> {
        let config = ApiConfig::new(
            client_id,
            client_secret,
            ApiEnvironment::from_production_flag(production),
        );
        Self::from_config(config, &HttpConfig::default())
    }

    /// Create a client from explicit configuration
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if the HTTP client cannot be built
    pub fn from_config(config: ApiConfig, http: &HttpConfig) -> ClientResult<Self> {
        Ok(Self::with_transport(config, ReqwestTransport::new(http)?))
    }

    /// Create a client from `TRAININGPEAKS_*` environment variables
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] for missing or malformed settings
    pub fn from_env() -> ClientResult<Self> {
        Self::from_config(ApiConfig::from_env()?, &HttpConfig::from_env()?)
    }
}

impl<T: Transport> ApiClient<T> {
    /// Create a client over a custom transport
    pub fn with_transport(config: ApiConfig, transport: T) -> Self {
        debug!(environment = %config.environment(), "Creating TrainingPeaks client");
        Self {
            config,
            tokens: TokenState::new(),
            transport,
            last_request: RequestRecord::default(),
            last_request_info: None,
            response_headers: ResponseHeaders::new(),
        }
    }

    /// Client configuration
    pub const fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Held tokens
    pub const fn tokens(&self) -> &TokenState {
        &self.tokens
    }

    /// Underlying transport
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Whether the held access token must be refreshed before use
    pub fn is_token_refresh_needed(&self) -> bool {
        self.tokens.is_refresh_needed()
    }

    /// Store an access token, and optionally a refresh token and expiry
    ///
    /// Omitted values keep what is already stored.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::TokenExpired`] when `expires_at` lies inside the
    /// minimum-validity window; the access token is then not stored
    pub fn set_access_token(
        &mut self,
        token: impl Into<String>,
        refresh_token: Option<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> ClientResult<&str> {
        if let Err(e) = self.tokens.set(token.into(), refresh_token, expires_at) {
            warn!(
                expires_at = ?self.tokens.expires_at(),
                "Refusing access token inside validity window"
            );
            return Err(e);
        }
        Ok(self.tokens.access_token().unwrap_or_default())
    }

    /// Store a refresh token without touching the access token or expiry
    pub fn set_refresh_token(&mut self, refresh_token: impl Into<String>) {
        self.tokens.set_refresh_token(refresh_token.into());
    }

    /// Store the tokens from a token endpoint response
    ///
    /// # Errors
    ///
    /// Same as [`Self::set_access_token`]
    pub fn store_token_response(&mut self, response: &TokenResponse) -> ClientResult<&str> {
        self.set_access_token(
            response.access_token.clone(),
            response.refresh_token.clone(),
            response.expires_at(),
        )
    }

    /// Authorization page URL to send the user to; no network call
    pub fn authentication_url(&self, redirect_uri: &str, scope: Option<&str>) -> String {
        RequestBuilder::new(&self.config).authorization_url(redirect_uri, scope)
    }

    /// Exchange an authorization code for tokens
    ///
    /// The response is returned as decoded; tokens are not stored
    /// automatically (see [`Self::store_token_response`]).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if the request could not be sent
    pub async fn token_exchange(&mut self, code: &str) -> ClientResult<ApiResponse> {
        info!("Exchanging TrainingPeaks authorization code");
        let request = RequestBuilder::new(&self.config).code_exchange(code);
        self.dispatch(request).await
    }

    /// Exchange the held refresh token for new tokens
    ///
    /// Returns `Ok(None)` without any network call when no refresh token is held.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if the request could not be sent
    pub async fn token_exchange_refresh(&mut self) -> ClientResult<Option<ApiResponse>> {
        let Some(refresh_token) = self.tokens.refresh_token() else {
            debug!("No refresh token held, skipping refresh exchange");
            return Ok(None);
        };

        info!("Refreshing TrainingPeaks access token");
        let request = RequestBuilder::new(&self.config).refresh_exchange(refresh_token);
        self.dispatch(request).await.map(Some)
    }

    /// Revoke the held access token
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::TokenExpired`] when the token needs a refresh,
    /// [`ClientError::MissingAccessToken`] when none is held, or
    /// [`ClientError::Transport`] if the request could not be sent
    pub async fn deauthorize(&mut self) -> ClientResult<ApiResponse> {
        let access_token = self.signing_token()?;

        info!("Deauthorizing TrainingPeaks access token");
        let request = RequestBuilder::new(&self.config).deauthorize(access_token);
        self.dispatch(request).await
    }

    /// Signed GET; parameters go into the query string
    ///
    /// # Errors
    ///
    /// See [`Self::request`]
    pub async fn get(&mut self, path: &str, parameters: &Parameters) -> ClientResult<ApiResponse> {
        self.request(HttpMethod::Get, path, parameters).await
    }

    /// Signed POST; parameters go into a form body
    ///
    /// # Errors
    ///
    /// See [`Self::request`]
    pub async fn post(&mut self, path: &str, parameters: &Parameters) -> ClientResult<ApiResponse> {
        self.request(HttpMethod::Post, path, parameters).await
    }

    /// Signed PUT; parameters go into a form body
    ///
    /// # Errors
    ///
    /// See [`Self::request`]
    pub async fn put(&mut self, path: &str, parameters: &Parameters) -> ClientResult<ApiResponse> {
        self.request(HttpMethod::Put, path, parameters).await
    }

    /// Signed DELETE; parameters go into a form body
    ///
    /// # Errors
    ///
    /// See [`Self::request`]
    pub async fn delete(
        &mut self,
        path: &str,
        parameters: &Parameters,
    ) -> ClientResult<ApiResponse> {
        self.request(HttpMethod::Delete, path, parameters).await
    }

    /// Signed request with an explicit verb
    ///
    /// `path` is relative to the API base URL unless it starts with `http`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::TokenExpired`] when the token needs a refresh; the
    ///   transport is not called
    /// - [`ClientError::MissingAccessToken`] when no token is held
    /// - [`ClientError::ReservedParameter`] when `parameters` sets `access_token`
    /// - [`ClientError::Transport`] if the request could not be sent
    pub async fn request(
        &mut self,
        method: HttpMethod,
        path: &str,
        parameters: &Parameters,
    ) -> ClientResult<ApiResponse> {
        let access_token = self.signing_token()?;
        let request = RequestBuilder::new(&self.config).authenticated(
            method,
            path,
            parameters,
            access_token,
        )?;
        self.dispatch(request).await
    }

    /// Headers captured from the last response
    pub const fn response_headers(&self) -> &ResponseHeaders {
        &self.response_headers
    }

    /// One header from the last response
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::HeaderNotFound`] when the header is absent
    pub fn response_header(&self, name: &str) -> ClientResult<&str> {
        self.response_headers.require(name)
    }

    /// URL of the last issued request
    pub fn last_request_url(&self) -> &str {
        &self.last_request.url
    }

    /// Parameters of the last issued request
    pub const fn last_request_parameters(&self) -> &Parameters {
        &self.last_request.parameters
    }

    /// Transport metadata of the last completed request
    pub const fn last_request_info(&self) -> Option<&RequestMetadata> {
        self.last_request_info.as_ref()
    }

    /// Freshness gate and token lookup for every signed request
    ///
    /// A stale state is reported as expired even when no access token is held.
    fn signing_token(&self) -> ClientResult<&str> {
        if self.tokens.is_refresh_needed() {
            warn!(
                expires_at = ?self.tokens.expires_at(),
                "TrainingPeaks access token needs to be refreshed"
            );
            return Err(ClientError::TokenExpired);
        }
        self.tokens
            .access_token()
            .ok_or(ClientError::MissingAccessToken)
    }

    async fn dispatch(&mut self, request: TransportRequest) -> ClientResult<ApiResponse> {
        self.last_request = RequestRecord {
            url: request.url.clone(),
            parameters: request.parameters.clone(),
        };
        self.last_request_info = None;
        self.response_headers.clear();

        debug!(
            method = %request.method(),
            url = %request.redacted_url(),
            "Sending TrainingPeaks request"
        );
        let raw = self.transport.send(&request).await.map_err(|e| {
            warn!(error = %e, url = %request.redacted_url(), "TrainingPeaks transport failure");
            e
        })?;

        let response = ApiResponse::from_transport(self.last_request.clone(), raw);
        self.response_headers = response.headers.clone();
        self.last_request_info = Some(response.metadata.clone());
        Ok(response)
    }
}
