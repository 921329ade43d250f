// ABOUTME: Shared test utilities for client integration tests
// ABOUTME: Provides a recording fake transport with canned responses and a sandbox client factory
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `trainingpeaks_api`

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, Once};
use trainingpeaks_api::{
    ApiClient, ApiConfig, ApiEnvironment, ClientError, ClientResult, RequestMetadata, Transport,
    TransportRequest, TransportResponse,
};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Canned outcome returned by [`RecordingTransport`]
#[derive(Debug, Clone)]
pub enum Canned {
    Response(TransportResponse),
    Failure(String),
}

/// Fake transport that records every request and replays canned outcomes in order
///
/// Outcomes are consumed front to back; the last one repeats once the queue
/// is down to a single entry.
#[derive(Debug, Clone)]
pub struct RecordingTransport {
    sent: Arc<Mutex<Vec<TransportRequest>>>,
    outcomes: Arc<Mutex<VecDeque<Canned>>>,
}

impl RecordingTransport {
    fn with_outcome(outcome: Canned) -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            outcomes: Arc::new(Mutex::new(VecDeque::from([outcome]))),
        }
    }

    pub fn responding(status: u16, body: &str, headers: &[&str]) -> Self {
        let mut header_lines = vec![format!("HTTP/1.1 {status}")];
        header_lines.extend(headers.iter().map(|line| (*line).to_owned()));
        header_lines.push(String::new());

        Self::with_outcome(Canned::Response(TransportResponse {
            body: body.to_owned(),
            header_lines,
            metadata: RequestMetadata {
                status,
                http_version: "HTTP/1.1".to_owned(),
                ..RequestMetadata::default()
            },
        }))
    }

    pub fn ok_json(body: &str) -> Self {
        Self::responding(200, body, &["Content-Type: application/json"])
    }

    pub fn failing(reason: &str) -> Self {
        Self::with_outcome(Canned::Failure(reason.to_owned()))
    }

    /// Queue the outcomes of `next` after the ones already queued
    pub fn then(self, next: Self) -> Self {
        let queued: Vec<Canned> = next.outcomes.lock().unwrap().drain(..).collect();
        self.outcomes.lock().unwrap().extend(queued);
        self
    }

    /// Handle on the recorded requests that outlives moving the transport into a client
    pub fn log(&self) -> Arc<Mutex<Vec<TransportRequest>>> {
        Arc::clone(&self.sent)
    }

    pub fn sent(&self) -> Vec<TransportRequest> {
        self.sent.lock().unwrap().clone()
    }

    fn next_outcome(&self) -> Canned {
        let mut outcomes = self.outcomes.lock().unwrap();
        if outcomes.len() > 1 {
            outcomes.pop_front().unwrap()
        } else {
            outcomes.front().cloned().unwrap()
        }
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: &TransportRequest) -> ClientResult<TransportResponse> {
        self.sent.lock().unwrap().push(request.clone());
        match self.next_outcome() {
            Canned::Response(mut response) => {
                response.metadata.effective_url.clone_from(&request.url);
                Ok(response)
            }
            Canned::Failure(reason) => Err(ClientError::transport(reason)),
        }
    }
}

/// Sandbox configuration with fixed credentials
pub fn sandbox_config() -> ApiConfig {
    ApiConfig::new("client-42", "secret-shh", ApiEnvironment::Sandbox)
}

/// Sandbox client over the given fake transport
pub fn sandbox_client(transport: RecordingTransport) -> ApiClient<RecordingTransport> {
    init_test_logging();
    ApiClient::with_transport(sandbox_config(), transport)
}
