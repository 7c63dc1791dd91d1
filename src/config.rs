// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honored for local development.

use chrono::Duration;
use std::env;
use std::path::PathBuf;

/// Default backend location, matching the development server.
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5000/api";

/// Age verification stays valid for a day unless configured otherwise.
pub const DEFAULT_AGE_VERIFICATION_TTL_HOURS: i64 = 24;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend base URL including the `/api` prefix
    pub api_base_url: String,
    /// Session file; `None` means the platform config directory
    pub session_file: Option<PathBuf>,
    /// How long an age verification remains valid
    pub age_verification_ttl: Duration,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            session_file: None,
            age_verification_ttl: Duration::hours(DEFAULT_AGE_VERIFICATION_TTL_HOURS),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let ttl_hours = match env::var("AGE_VERIFICATION_TTL_HOURS") {
            Ok(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|h| *h > 0)
                .ok_or(ConfigError::Invalid("AGE_VERIFICATION_TTL_HOURS", raw))?,
            Err(_) => DEFAULT_AGE_VERIFICATION_TTL_HOURS,
        };

        Ok(Self {
            api_base_url: env::var("API_BASE_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
            session_file: env::var("SESSION_FILE").ok().map(PathBuf::from),
            age_verification_ttl: Duration::hours(ttl_hours),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
