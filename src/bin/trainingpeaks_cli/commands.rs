// ABOUTME: Subcommand handlers for the TrainingPeaks CLI
// ABOUTME: Each handler runs one client operation and prints the decoded body as JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Utc};
use trainingpeaks_api::{ApiClient, ApiResponse, HttpMethod, Parameters};

/// Parse an expiry given as RFC 3339 or as unix seconds
pub fn parse_expiry(value: &str) -> Result<DateTime<Utc>> {
    if let Ok(seconds) = value.parse::<i64>() {
        return DateTime::from_timestamp(seconds, 0)
            .ok_or_else(|| anyhow!("Expiry timestamp out of range: {seconds}"));
    }
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .with_context(|| format!("Invalid expiry '{value}', expected RFC 3339 or unix seconds"))
}

/// Parse repeated `key=value` arguments, keeping their order
pub fn parse_params(raw: &[String]) -> Result<Parameters> {
    let mut parameters = Parameters::new();
    for pair in raw {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("Invalid parameter '{pair}', expected key=value");
        };
        if key.is_empty() {
            bail!("Invalid parameter '{pair}', key is empty");
        }
        parameters.insert(key, value);
    }
    Ok(parameters)
}

pub fn auth_url(client: &ApiClient, redirect_uri: &str, scope: Option<&str>) {
    println!("{}", client.authentication_url(redirect_uri, scope));
}

pub async fn exchange(client: &mut ApiClient, code: &str) -> Result<()> {
    let response = client.token_exchange(code).await?;
    print_response(&response)
}

pub async fn refresh(client: &mut ApiClient, refresh_token: String) -> Result<()> {
    client.set_refresh_token(refresh_token);
    let response = client
        .token_exchange_refresh()
        .await?
        .ok_or_else(|| anyhow!("No refresh token held"))?;
    print_response(&response)
}

pub async fn deauthorize(client: &mut ApiClient) -> Result<()> {
    let response = client.deauthorize().await?;
    print_response(&response)
}

pub async fn call(
    client: &mut ApiClient,
    method: HttpMethod,
    path: &str,
    raw_params: &[String],
) -> Result<()> {
    let parameters = parse_params(raw_params)?;
    let response = client.request(method, path, &parameters).await?;
    print_response(&response)
}

fn print_response(response: &ApiResponse) -> Result<()> {
    if !response.is_success() {
        eprintln!(
            "HTTP {} from {}",
            response.status(),
            response.request.url
        );
    }
    println!("{}", serde_json::to_string_pretty(&response.body)?);
    Ok(())
}
