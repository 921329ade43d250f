// ABOUTME: Response header capture from raw header lines reported by the transport
// ABOUTME: Skips blank and status lines, splits on the first colon, last occurrence wins
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::{ClientError, ClientResult};
use serde::Serialize;
use std::collections::BTreeMap;

/// Headers captured from the most recent response
///
/// Names are stored as received. Lookup tries the exact name first and then
/// falls back to a case-insensitive match, since HTTP/2 transports lowercase
/// every name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResponseHeaders {
    headers: BTreeMap<String, String>,
}

impl ResponseHeaders {
    /// Empty header map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture every line from an iterator of raw header lines
    #[must_use]
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut headers = Self::new();
        for line in lines {
            headers.capture_line(line.as_ref());
        }
        headers
    }

    /// Handle a single raw header line
    ///
    /// Blank lines and `HTTP/` status lines are ignored. Lines without a
    /// colon are stored with an empty value.
    pub fn capture_line(&mut self, line: &str) {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("HTTP/") {
            return;
        }

        let (key, value) = trimmed.split_once(':').unwrap_or((trimmed, ""));
        self.headers
            .insert(key.trim().to_owned(), value.trim().to_owned());
    }

    /// Remove every captured header
    pub fn clear(&mut self) {
        self.headers.clear();
    }

    /// Header value, if present
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str).or_else(|| {
            self.headers
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.as_str())
        })
    }

    /// Header value or a lookup error
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::HeaderNotFound`] when the header is absent
    pub fn require(&self, name: &str) -> ClientResult<&str> {
        self.get(name).ok_or_else(|| ClientError::HeaderNotFound {
            name: name.to_owned(),
        })
    }

    /// Number of captured headers
    #[must_use]
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// Whether nothing was captured
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Iterate over `(name, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Underlying map
    #[must_use]
    pub const fn as_map(&self) -> &BTreeMap<String, String> {
        &self.headers
    }
}
