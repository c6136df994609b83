// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! There is no module-level global credential state: the `Config` value
//! is constructed once in `main` and handed to each component.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default port for the loopback OAuth callback listener.
const DEFAULT_CALLBACK_PORT: u16 = 8723;

/// Default bound on the interactive consent wait.
const DEFAULT_CONSENT_TIMEOUT_SECS: u64 = 120;

/// Bounded timeout applied to every outbound HTTP request.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Strava OAuth client ID (public)
    pub strava_client_id: String,
    /// Strava OAuth client secret
    pub strava_client_secret: String,
    /// Requested OAuth scopes
    pub strava_scopes: Vec<String>,
    /// Strava authorization endpoint
    pub strava_auth_url: String,
    /// Strava token endpoint (exchange and refresh)
    pub strava_token_url: String,
    /// Strava REST API base URL
    pub strava_api_base_url: String,

    /// OTF member email
    pub otf_email: String,
    /// OTF member password
    pub otf_password: String,

    /// Where the OAuth token is persisted between runs
    pub token_path: PathBuf,
    /// Loopback port for the OAuth redirect (0 = ephemeral)
    pub callback_port: u16,
    /// Bound on the interactive consent wait
    pub consent_timeout: Duration,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            strava_client_id: "test_client_id".to_string(),
            strava_client_secret: "test_secret".to_string(),
            strava_scopes: vec![
                "activity:read_all".to_string(),
                "activity:write".to_string(),
            ],
            strava_auth_url: "https://www.strava.com/oauth/authorize".to_string(),
            strava_token_url: "https://www.strava.com/oauth/token".to_string(),
            strava_api_base_url: "https://www.strava.com/api/v3".to_string(),
            otf_email: "member@example.com".to_string(),
            otf_password: "test_password".to_string(),
            token_path: PathBuf::from("strava_token.json"),
            callback_port: 0,
            consent_timeout: Duration::from_secs(DEFAULT_CONSENT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            strava_client_id: env::var("STRAVA_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_ID"))?,
            strava_client_secret: env::var("STRAVA_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_SECRET"))?,
            strava_scopes: vec![
                "activity:read_all".to_string(),
                "activity:write".to_string(),
            ],
            strava_auth_url: env::var("STRAVA_AUTH_URL")
                .unwrap_or_else(|_| "https://www.strava.com/oauth/authorize".to_string()),
            strava_token_url: env::var("STRAVA_TOKEN_URL")
                .unwrap_or_else(|_| "https://www.strava.com/oauth/token".to_string()),
            strava_api_base_url: env::var("STRAVA_API_BASE_URL")
                .unwrap_or_else(|_| "https://www.strava.com/api/v3".to_string()),

            otf_email: env::var("OTF_EMAIL").map_err(|_| ConfigError::Missing("OTF_EMAIL"))?,
            otf_password: env::var("OTF_PASSWORD")
                .map_err(|_| ConfigError::Missing("OTF_PASSWORD"))?,

            token_path: env::var("TOKEN_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("strava_token.json")),
            callback_port: env::var("CALLBACK_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CALLBACK_PORT),
            consent_timeout: env::var("CONSENT_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(Duration::from_secs(DEFAULT_CONSENT_TIMEOUT_SECS)),
        })
    }

    /// Space-free scope string for the authorization URL.
    pub fn scope_param(&self) -> String {
        self.strava_scopes.join(",")
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("STRAVA_CLIENT_ID", "test_id");
        env::set_var("STRAVA_CLIENT_SECRET", "test_secret");
        env::set_var("OTF_EMAIL", "someone@example.com");
        env::set_var("OTF_PASSWORD", "hunter2");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.strava_client_id, "test_id");
        assert_eq!(config.strava_client_secret, "test_secret");
        assert_eq!(config.scope_param(), "activity:read_all,activity:write");
    }

    #[test]
    fn test_default_is_test_only() {
        let config = Config::default();
        assert_eq!(config.callback_port, 0);
        assert!(config.consent_timeout >= Duration::from_secs(1));
    }
}
