// ABOUTME: Ordered request parameter list with form-urlencoding
// ABOUTME: Builds caller parameters and appends the access token last, rejecting collisions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::params::ACCESS_TOKEN;
use crate::errors::{ClientError, ClientResult};
use serde::Serialize;
use std::fmt;
use url::form_urlencoded;

/// Ordered key/value parameters for one request
///
/// Insertion order is kept so encoded query strings and bodies are stable.
/// Setting an existing key replaces its value in place.
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct Parameters {
    pairs: Vec<(String, String)>,
}

impl Parameters {
    /// Empty parameter set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a parameter
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        let value = value.to_string();
        match self.pairs.iter_mut().find(|(existing, _)| *existing == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key, value)),
        }
    }

    /// Value stored under `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    /// Whether `key` is present
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of parameters
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether there are no parameters
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Copy of these parameters with `access_token` appended last
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ReservedParameter`] when the caller already set
    /// `access_token`
    pub fn with_access_token(&self, access_token: &str) -> ClientResult<Self> {
        if self.contains_key(ACCESS_TOKEN) {
            return Err(ClientError::ReservedParameter {
                key: ACCESS_TOKEN.to_owned(),
            });
        }
        let mut signed = self.clone();
        signed.pairs.push((ACCESS_TOKEN.to_owned(), access_token.to_owned()));
        Ok(signed)
    }

    /// `application/x-www-form-urlencoded` rendering
    #[must_use]
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }

    /// Copy with the access token value masked, suitable for logs
    #[must_use]
    pub fn redacted(&self) -> Self {
        let pairs = self
            .pairs
            .iter()
            .map(|(key, value)| {
                if key == ACCESS_TOKEN {
                    (key.clone(), "[REDACTED]".to_owned())
                } else {
                    (key.clone(), value.clone())
                }
            })
            .collect();
        Self { pairs }
    }
}

impl fmt::Debug for Parameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.redacted().pairs.iter().map(|(k, v)| (k, v)))
            .finish()
    }
}

impl<K, V> FromIterator<(K, V)> for Parameters
where
    K: Into<String>,
    V: ToString,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Parameters
where
    K: Into<String>,
    V: ToString,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}
