// ABOUTME: Transport abstraction performing network I/O for assembled requests
// ABOUTME: Reqwest-backed implementation reporting raw header lines, body and timing metadata
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! HTTP transport
//!
//! The client never talks to the network directly. It hands a
//! [`TransportRequest`] to a [`Transport`] and receives the raw body, the
//! header lines in arrival order and execution metadata. A failure to obtain
//! any response is a [`ClientError::Transport`]; a non-2xx response is a
//! successful send and is reported through [`RequestMetadata::status`].

use crate::config::HttpConfig;
use crate::constants::http::FORM_CONTENT_TYPE;
use crate::errors::{ClientError, ClientResult};
use crate::request::{HttpMethod, TransportRequest};
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, REFERER};
use reqwest::{Client, ClientBuilder, Method};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::debug;

/// Execution details of the last request, kept for introspection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequestMetadata {
    /// URL after redirects
    pub effective_url: String,
    /// HTTP status code
    pub status: u16,
    /// Protocol version, e.g. `HTTP/1.1`
    pub http_version: String,
    /// `Content-Type` of the response, if any
    pub content_type: Option<String>,
    /// Wall-clock time from dispatch to the full body being read
    pub elapsed: Duration,
}

impl RequestMetadata {
    /// Whether the status is in the 2xx range
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Raw outcome of one request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportResponse {
    /// Response body as received
    pub body: String,
    /// Header lines in arrival order, status line first
    pub header_lines: Vec<String>,
    /// Execution metadata
    pub metadata: RequestMetadata,
}

/// Network collaborator used by [`crate::ApiClient`]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute `request` and report the raw response
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] when no response could be obtained
    async fn send(&self, request: &TransportRequest) -> ClientResult<TransportResponse>;
}

/// [`Transport`] backed by `reqwest`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a transport with the given timeouts and TLS policy
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if the TLS backend cannot be initialized
    pub fn new(config: &HttpConfig) -> ClientResult<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(ClientError::transport)?;
        Ok(Self { client })
    }

    /// Wrap an existing `reqwest` client
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }

    const fn reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &TransportRequest) -> ClientResult<TransportResponse> {
        let method = request.method();
        let mut builder = self
            .client
            .request(Self::reqwest_method(method), &request.url)
            .header(REFERER, request.url.as_str());
        if let Some(body) = &request.body {
            builder = builder
                .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
                .body(body.clone());
        }

        let started = Instant::now();
        let response = builder.send().await?;

        let status = response.status();
        let http_version = format!("{:?}", response.version());
        let mut header_lines = Vec::with_capacity(response.headers().len() + 2);
        header_lines.push(format!("{http_version} {status}"));
        for (name, value) in response.headers() {
            header_lines.push(format!(
                "{}: {}",
                name.as_str(),
                String::from_utf8_lossy(value.as_bytes())
            ));
        }
        header_lines.push(String::new());

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned());
        let effective_url = response.url().to_string();
        let body = response.text().await?;
        let elapsed = started.elapsed();

        debug!(
            %method,
            status = status.as_u16(),
            elapsed_ms = elapsed.as_millis(),
            "TrainingPeaks request completed"
        );

        Ok(TransportResponse {
            body,
            header_lines,
            metadata: RequestMetadata {
                effective_url,
                status: status.as_u16(),
                http_version,
                content_type,
                elapsed,
            },
        })
    }
}
