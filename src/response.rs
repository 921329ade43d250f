// ABOUTME: Per-call response record returned by every network operation of the client
// ABOUTME: Permissive JSON decoding plus the request URL, parameters, headers and metadata
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::{ClientError, ClientResult};
use crate::headers::ResponseHeaders;
use crate::params::Parameters;
use crate::token::TokenResponse;
use crate::transport::{RequestMetadata, TransportResponse};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

/// URL and parameters of an issued request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequestRecord {
    /// Absolute URL, including any query string
    pub url: String,
    /// Parameters sent with the request
    pub parameters: Parameters,
}

/// Everything known about one completed call
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// Decoded body; `Value::Null` when the body was empty or not JSON
    pub body: Value,
    /// Body exactly as received
    pub raw_body: String,
    /// Captured response headers
    pub headers: ResponseHeaders,
    /// What was sent
    pub request: RequestRecord,
    /// Transport execution details
    pub metadata: RequestMetadata,
}

impl ApiResponse {
    /// Assemble the record for a completed transport call
    #[must_use]
    pub fn from_transport(request: RequestRecord, response: TransportResponse) -> Self {
        let headers = ResponseHeaders::from_lines(&response.header_lines);
        let body = decode_body(&response.body);
        Self {
            body,
            raw_body: response.body,
            headers,
            request,
            metadata: response.metadata,
        }
    }

    /// HTTP status code
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.metadata.status
    }

    /// Whether the status is in the 2xx range
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.metadata.is_success()
    }

    /// Header value from this response
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::HeaderNotFound`] when the header is absent
    pub fn header(&self, name: &str) -> ClientResult<&str> {
        self.headers.require(name)
    }

    /// Deserialize the body into `T`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Deserialization`] when the body does not match `T`
    pub fn json<T: DeserializeOwned>(&self) -> ClientResult<T> {
        serde_json::from_value(self.body.clone()).map_err(|source| {
            ClientError::Deserialization {
                target: std::any::type_name::<T>(),
                source,
            }
        })
    }

    /// Typed view of a token endpoint response
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Deserialization`] when no `access_token` is present
    pub fn token_response(&self) -> ClientResult<TokenResponse> {
        self.json()
    }
}

/// Decode a response body without ever failing
///
/// Empty or malformed bodies become `Value::Null`; callers check the shape.
#[must_use]
pub fn decode_body(raw: &str) -> Value {
    if raw.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(raw).unwrap_or_else(|e| {
        warn!(error = %e, body_len = raw.len(), "Response body is not valid JSON");
        Value::Null
    })
}
