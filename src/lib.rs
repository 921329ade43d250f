// ABOUTME: TrainingPeaks API client library entry point
// ABOUTME: OAuth2 code/refresh exchange, token freshness gating and signed REST calls
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # TrainingPeaks API Client
//!
//! A client for the TrainingPeaks REST API.
//!
//! - OAuth2 authorization-code flow: build the authorization URL, exchange
//!   the returned code, refresh and deauthorize tokens
//! - Token bookkeeping: an access token with less than an hour of validity
//!   left is refused, both when it is set and before every signed request
//! - Signed `GET`/`POST`/`PUT`/`DELETE` calls with the access token attached
//!   as a parameter
//!
//! ```no_run
//! use trainingpeaks_api::{ApiClient, Parameters};
//!
//! # async fn run() -> trainingpeaks_api::ClientResult<()> {
//! let mut client = ApiClient::new("client-id", "client-secret", false)?;
//! let url = client.authentication_url("https://app.example.com/callback", Some("workouts:read"));
//! # let _ = url;
//!
//! let exchange = client.token_exchange("code-from-callback").await?;
//! client.store_token_response(&exchange.token_response()?)?;
//!
//! let workouts = client
//!     .get("workouts/2024-01-01/2024-01-31", &Parameters::new())
//!     .await?;
//! println!("{}", workouts.body);
//! # Ok(())
//! # }
//! ```

/// The API client itself
pub mod client;
/// Credentials, environment selection and HTTP settings
pub mod config;
/// Hosts, endpoint names, parameter names and limits
pub mod constants;
/// Client error types
pub mod errors;
/// Response header capture
pub mod headers;
/// Tracing subscriber setup for applications
pub mod logging;
/// Ordered request parameters
pub mod params;
/// Request assembly per HTTP verb
pub mod request;
/// Per-call response records
pub mod response;
/// Token state and token endpoint responses
pub mod token;
/// Network transport abstraction and reqwest implementation
pub mod transport;

pub use client::ApiClient;
pub use config::{ApiConfig, ApiEnvironment, HttpConfig};
pub use errors::{ClientError, ClientResult};
pub use headers::ResponseHeaders;
pub use params::Parameters;
pub use request::{HttpMethod, RequestBuilder, TransportRequest};
pub use response::{ApiResponse, RequestRecord};
pub use token::{TokenResponse, TokenState};
pub use transport::{ReqwestTransport, RequestMetadata, Transport, TransportResponse};
