// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava OAuth token lifecycle.
//!
//! Owns the authorization-code flow end to end:
//! - returns a persisted token untouched while it is still valid
//! - prefers a refresh over a fresh interactive login whenever a
//!   refresh token exists
//! - falls back to the browser consent flow only when the provider
//!   rejects the refresh token outright
//!
//! Every successfully acquired token is persisted (atomically) before it
//! is handed to the caller.

use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::Utc;
use ring::rand::{SecureRandom, SystemRandom};
use serde::Deserialize;

use crate::config::{Config, HTTP_TIMEOUT};
use crate::error::{AppError, Result};
use crate::models::Token;
use crate::services::callback::CallbackListener;
use crate::services::token_store::TokenStore;

/// Entropy of the single-use OAuth state value, pre-encoding.
const STATE_BYTES: usize = 24;

/// Browser/consent surface. Injectable so tests never launch a real
/// browser.
pub trait ConsentBrowser: Send + Sync {
    fn open(&self, url: &str) -> anyhow::Result<()>;
}

/// Opens the system default browser.
pub struct SystemBrowser;

impl ConsentBrowser for SystemBrowser {
    fn open(&self, url: &str) -> anyhow::Result<()> {
        if let Err(e) = open::that(url) {
            tracing::warn!(error = %e, "Failed to open browser automatically");
            eprintln!("Please open the following URL manually to complete login:");
            eprintln!("{url}");
        }
        Ok(())
    }
}

/// Generate a fresh single-use OAuth state value.
///
/// Cryptographically random, URL-safe base64. Generated per login
/// attempt and never reused.
pub fn generate_state() -> Result<String> {
    let mut bytes = [0u8; STATE_BYTES];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("system RNG failure")))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// Manages acquisition, persistence, expiry and refresh of the Strava
/// OAuth token.
pub struct TokenLifecycleManager {
    http: reqwest::Client,
    config: Config,
    store: TokenStore,
    browser: Arc<dyn ConsentBrowser>,
}

impl TokenLifecycleManager {
    pub fn new(config: Config, store: TokenStore, browser: Arc<dyn ConsentBrowser>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("HTTP client build failed: {}", e)))?;
        Ok(Self {
            http,
            config,
            store,
            browser,
        })
    }

    /// Get a usable access token, driving whatever part of the lifecycle
    /// is needed.
    ///
    /// A persisted token with `expires_at` strictly in the future is
    /// returned as-is with no network or interactive call. Otherwise the
    /// refresh path runs first; only a provider-side rejection of the
    /// refresh token falls through to the interactive consent flow.
    pub async fn get_valid_token(&self) -> Result<Token> {
        let now = Utc::now().timestamp();

        if let Some(token) = self.store.load()? {
            if token.is_valid_at(now) {
                tracing::debug!("Persisted token still valid, no login needed");
                return Ok(token);
            }

            if !token.refresh_token.is_empty() {
                match self.refresh(&token.refresh_token).await {
                    Ok(fresh) => {
                        self.store.save(&fresh)?;
                        tracing::info!("Access token refreshed");
                        return Ok(fresh);
                    }
                    Err(e) if e.is_refresh_rejection() => {
                        tracing::warn!(
                            error = %e,
                            "Refresh token rejected by provider, starting interactive login"
                        );
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        self.login().await
    }

    /// Run the full interactive authorization-code flow.
    pub async fn login(&self) -> Result<Token> {
        let state = generate_state()?;

        // Bind before opening the browser so the redirect cannot race us.
        let listener = CallbackListener::bind(self.config.callback_port).await?;
        let redirect_uri = listener.redirect_uri();

        let auth_url = self.build_authorization_url(&redirect_uri, &state);
        tracing::info!("Opening Strava consent page");
        self.browser.open(&auth_url)?;

        let params = listener.wait(self.config.consent_timeout).await?;

        // State is validated before anything else; a mismatched callback
        // is rejected even if it carries a well-formed code.
        if params.state.as_deref() != Some(state.as_str()) {
            return Err(AppError::StateMismatch);
        }

        if let Some(error) = params.error {
            if error == "access_denied" {
                return Err(AppError::ConsentDenied);
            }
            return Err(AppError::TokenExchangeFailed(format!(
                "authorization error from provider: {}",
                error
            )));
        }

        let code = params.code.ok_or_else(|| {
            AppError::TokenExchangeFailed("missing code parameter in callback".to_string())
        })?;

        let token = self.exchange_code(&code).await?;
        self.store.save(&token)?;
        tracing::info!("Login successful, token persisted");
        Ok(token)
    }

    /// Authorization URL for one login attempt.
    fn build_authorization_url(&self, redirect_uri: &str, state: &str) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}",
            self.config.strava_auth_url,
            self.config.strava_client_id,
            urlencoding::encode(redirect_uri),
            urlencoding::encode(&self.config.scope_param()),
            state
        )
    }

    /// Exchange an authorization code for a token.
    pub async fn exchange_code(&self, code: &str) -> Result<Token> {
        let response = self
            .http
            .post(&self.config.strava_token_url)
            .form(&[
                ("client_id", self.config.strava_client_id.as_str()),
                ("client_secret", self.config.strava_client_secret.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| AppError::TokenExchangeFailed(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Strava token exchange failed");
            return Err(AppError::TokenExchangeFailed(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }

        let parsed: TokenEndpointResponse = response
            .json()
            .await
            .map_err(|e| AppError::TokenExchangeFailed(format!("JSON parse error: {}", e)))?;
        Ok(self.token_from_response(parsed))
    }

    /// Refresh an expired access token.
    pub async fn refresh(&self, refresh_token: &str) -> Result<Token> {
        let response = self
            .http
            .post(&self.config.strava_token_url)
            .form(&[
                ("client_id", self.config.strava_client_id.as_str()),
                ("client_secret", self.config.strava_client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| AppError::RefreshFailed(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::RefreshFailed(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }

        let parsed: TokenEndpointResponse = response
            .json()
            .await
            .map_err(|e| AppError::RefreshFailed(format!("JSON parse error: {}", e)))?;
        Ok(self.token_from_response(parsed))
    }

    /// Build a replacement [`Token`] with an absolute expiry.
    fn token_from_response(&self, parsed: TokenEndpointResponse) -> Token {
        let expires_at = parsed
            .expires_at
            .or_else(|| parsed.expires_in.map(|ttl| Utc::now().timestamp() + ttl))
            .unwrap_or_else(|| Utc::now().timestamp());

        let scope = parsed
            .scope
            .map(|s| s.split(',').map(str::to_string).collect())
            .unwrap_or_else(|| self.config.strava_scopes.clone());

        Token {
            access_token: parsed.access_token,
            refresh_token: parsed.refresh_token,
            expires_at,
            scope,
        }
    }
}

/// Token endpoint response (exchange and refresh share the shape).
///
/// Strava reports both an absolute `expires_at` and a relative
/// `expires_in`; the absolute value wins, and a relative-only response
/// is converted so the persisted expiry is always absolute.
#[derive(Debug, Deserialize)]
struct TokenEndpointResponse {
    access_token: String,
    refresh_token: String,
    expires_at: Option<i64>,
    expires_in: Option<i64>,
    scope: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoopBrowser;
    impl ConsentBrowser for NoopBrowser {
        fn open(&self, _url: &str) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn test_manager() -> TokenLifecycleManager {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("token.json"));
        TokenLifecycleManager::new(Config::default(), store, Arc::new(NoopBrowser)).unwrap()
    }

    #[test]
    fn test_state_is_url_safe() {
        let state = generate_state().unwrap();
        assert!(state
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert!(!state.contains('='));
    }

    #[test]
    fn test_state_never_repeats_across_attempts() {
        let states: Vec<String> = (0..100).map(|_| generate_state().unwrap()).collect();
        for (i, a) in states.iter().enumerate() {
            for b in &states[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_authorization_url_contains_flow_parameters() {
        let manager = test_manager();
        let url = manager.build_authorization_url("http://127.0.0.1:4242/callback", "abc123");

        assert!(url.starts_with("https://www.strava.com/oauth/authorize?"));
        assert!(url.contains("client_id=test_client_id"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("state=abc123"));
        assert!(url.contains(&urlencoding::encode("http://127.0.0.1:4242/callback").into_owned()));
        assert!(url.contains(&urlencoding::encode("activity:read_all,activity:write").into_owned()));
    }

    #[test]
    fn test_token_from_response_prefers_absolute_expiry() {
        let manager = test_manager();
        let token = manager.token_from_response(TokenEndpointResponse {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            expires_at: Some(1_900_000_000),
            expires_in: Some(60),
            scope: None,
        });
        assert_eq!(token.expires_at, 1_900_000_000);
        assert_eq!(token.scope, Config::default().strava_scopes);
    }

    #[test]
    fn test_token_from_response_converts_relative_expiry() {
        let manager = test_manager();
        let before = Utc::now().timestamp();
        let token = manager.token_from_response(TokenEndpointResponse {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            expires_at: None,
            expires_in: Some(3600),
            scope: Some("activity:write".to_string()),
        });
        assert!(token.expires_at >= before + 3600);
        assert_eq!(token.scope, vec!["activity:write".to_string()]);
    }
}
