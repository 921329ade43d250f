// ABOUTME: Environment variable loading for client credentials and HTTP settings
// ABOUTME: Required values fail with a configuration error, optional ones fall back to defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration

use super::{ApiConfig, ApiEnvironment, HttpConfig};
use crate::constants::env_config;
use crate::errors::{ClientError, ClientResult};
use std::env;
use std::str::FromStr;
use tracing::{debug, info};

impl ApiConfig {
    /// Load credentials and environment from `TRAININGPEAKS_*` variables
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] when the client id or secret is unset
    pub fn from_env() -> ClientResult<Self> {
        let client_id = required_var(env_config::CLIENT_ID)?;
        let client_secret = required_var(env_config::CLIENT_SECRET)?;
        let environment = env::var(env_config::ENVIRONMENT)
            .map(|value| ApiEnvironment::from_str_or_default(&value))
            .unwrap_or_default();

        info!(%environment, "Loaded TrainingPeaks configuration from environment");
        Ok(Self::new(client_id, client_secret, environment))
    }
}

impl HttpConfig {
    /// Load HTTP settings, keeping defaults for anything unset
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] when a set value cannot be parsed
    pub fn from_env() -> ClientResult<Self> {
        let defaults = Self::default();
        let config = Self {
            timeout_secs: parsed_var_or(env_config::HTTP_TIMEOUT_SECS, defaults.timeout_secs)?,
            connect_timeout_secs: parsed_var_or(
                env_config::HTTP_CONNECT_TIMEOUT_SECS,
                defaults.connect_timeout_secs,
            )?,
            accept_invalid_certs: parsed_var_or(
                env_config::ACCEPT_INVALID_CERTS,
                defaults.accept_invalid_certs,
            )?,
        };
        debug!(?config, "Loaded HTTP configuration");
        Ok(config)
    }
}

fn required_var(key: &'static str) -> ClientResult<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        Ok(_) => Err(ClientError::Config {
            key,
            reason: "value is empty".to_owned(),
        }),
        Err(e) => Err(ClientError::Config {
            key,
            reason: e.to_string(),
        }),
    }
}

fn parsed_var_or<T>(key: &'static str, default: T) -> ClientResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ClientError::Config {
            key,
            reason: format!("cannot parse '{raw}': {e}"),
        }),
        Err(_) => Ok(default),
    }
}
