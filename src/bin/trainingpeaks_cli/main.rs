// ABOUTME: TrainingPeaks CLI - drive the OAuth flow and issue signed API calls from a shell
// ABOUTME: Reads credentials from TRAININGPEAKS_* variables and prints response JSON to stdout
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Print the authorization URL for a redirect URI
//! trainingpeaks-cli auth-url --redirect-uri https://app.example.com/cb --scope workouts:read
//!
//! # Exchange the code from the callback for tokens
//! trainingpeaks-cli exchange --code 4/abcdef
//!
//! # Refresh tokens
//! trainingpeaks-cli refresh --refresh-token r-123
//!
//! # Call the API with an access token
//! trainingpeaks-cli --access-token T get athlete/profile
//! trainingpeaks-cli --access-token T post workouts --param title=Intervals
//! ```

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use trainingpeaks_api::constants::env_config;
use trainingpeaks_api::logging::LoggingConfig;
use trainingpeaks_api::{ApiClient, ApiConfig, ApiEnvironment, HttpConfig, HttpMethod};

#[derive(Parser)]
#[command(
    name = "trainingpeaks-cli",
    about = "TrainingPeaks API command-line client",
    long_about = "Runs the TrainingPeaks OAuth2 flow and issues signed API requests. \
                  Credentials come from TRAININGPEAKS_CLIENT_ID and TRAININGPEAKS_CLIENT_SECRET."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Target the production deployment instead of the sandbox
    #[arg(long, global = true)]
    production: bool,

    /// Access token for signed calls
    #[arg(long, global = true, env = env_config::ACCESS_TOKEN, hide_env_values = true)]
    access_token: Option<String>,

    /// Access token expiry, as RFC 3339 or unix seconds
    #[arg(long, global = true)]
    expires_at: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Print the authorization URL
    AuthUrl {
        /// Where TrainingPeaks redirects after consent
        #[arg(long)]
        redirect_uri: String,

        /// Requested scopes
        #[arg(long)]
        scope: Option<String>,
    },

    /// Exchange an authorization code for tokens
    Exchange {
        /// Code from the redirect
        #[arg(long)]
        code: String,
    },

    /// Exchange a refresh token for new tokens
    Refresh {
        /// Refresh token from a previous exchange
        #[arg(long)]
        refresh_token: String,
    },

    /// Revoke the access token
    Deauthorize,

    /// Signed GET
    Get(CallArgs),

    /// Signed POST
    Post(CallArgs),

    /// Signed PUT
    Put(CallArgs),

    /// Signed DELETE
    Delete(CallArgs),
}

impl Command {
    /// Whether the command signs its request with the access token
    ///
    /// The OAuth commands never touch the held access token, so a stale one
    /// must not stop them.
    const fn is_signed(&self) -> bool {
        matches!(
            self,
            Self::Deauthorize | Self::Get(_) | Self::Post(_) | Self::Put(_) | Self::Delete(_)
        )
    }
}

/// Path and parameters of a signed call
#[derive(clap::Args)]
struct CallArgs {
    /// Path relative to the API base URL, or an absolute URL
    path: String,

    /// Request parameter as key=value (repeatable)
    #[arg(long = "param", short = 'p')]
    params: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let logging = LoggingConfig::from_env();
    let logging = if cli.verbose {
        logging.with_level("debug")
    } else {
        logging
    };
    logging.init()?;

    let config = if cli.production {
        let base = ApiConfig::from_env().context("Loading TrainingPeaks credentials")?;
        ApiConfig::new(
            base.client_id(),
            base.client_secret(),
            ApiEnvironment::Production,
        )
    } else {
        ApiConfig::from_env().context("Loading TrainingPeaks credentials")?
    };
    let http = HttpConfig::from_env().context("Loading HTTP settings")?;
    let mut client = ApiClient::from_config(config, &http)?;

    if cli.command.is_signed() {
        if let Some(token) = cli.access_token {
            let expires_at = cli
                .expires_at
                .as_deref()
                .map(commands::parse_expiry)
                .transpose()?;
            client.set_access_token(token, None, expires_at)?;
        }
    }

    match cli.command {
        Command::AuthUrl {
            redirect_uri,
            scope,
        } => commands::auth_url(&client, &redirect_uri, scope.as_deref()),
        Command::Exchange { code } => commands::exchange(&mut client, &code).await?,
        Command::Refresh { refresh_token } => {
            commands::refresh(&mut client, refresh_token).await?;
        }
        Command::Deauthorize => commands::deauthorize(&mut client).await?,
        Command::Get(args) => {
            commands::call(&mut client, HttpMethod::Get, &args.path, &args.params).await?;
        }
        Command::Post(args) => {
            commands::call(&mut client, HttpMethod::Post, &args.path, &args.params).await?;
        }
        Command::Put(args) => {
            commands::call(&mut client, HttpMethod::Put, &args.path, &args.params).await?;
        }
        Command::Delete(args) => {
            commands::call(&mut client, HttpMethod::Delete, &args.path, &args.params).await?;
        }
    }

    Ok(())
}
