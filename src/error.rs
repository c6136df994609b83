// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types.
//!
//! Every failure mode a caller may need to distinguish gets its own
//! variant. A duplicate activity (HTTP 409 from Strava) is deliberately
//! *not* here: it is a normal `SubmissionOutcome`, not an error.

use crate::config::ConfigError;

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The user declined authorization on the consent page.
    #[error("Strava access was denied by the user")]
    ConsentDenied,

    /// The callback carried a state value that does not match the one
    /// issued for this login attempt. Possible CSRF/replay; the
    /// authorization code must not be used.
    #[error("OAuth state mismatch, refusing authorization code")]
    StateMismatch,

    /// No callback arrived within the consent wait bound.
    #[error("Timed out waiting for the OAuth consent callback")]
    ConsentTimeout,

    /// The token endpoint rejected the authorization-code exchange.
    #[error("Token exchange failed: {0}")]
    TokenExchangeFailed(String),

    /// The token endpoint rejected or failed the refresh request.
    #[error("Token refresh failed: {0}")]
    RefreshFailed(String),

    /// Translation cannot produce a required aggregate (e.g. every
    /// heart-rate sample was a sensor dropout).
    #[error("Incomplete telemetry: {0}")]
    IncompleteTelemetry(String),

    /// Translation input is self-contradictory (e.g. negative total
    /// duration). Not coerced, surfaced.
    #[error("Invalid telemetry: {0}")]
    InvalidTelemetry(String),

    /// The destination rejected the activity with a status other than
    /// 201 or 409. Body is passed through verbatim.
    #[error("Activity submission rejected (HTTP {status}): {body}")]
    SubmissionRejected { status: u16, body: String },

    /// Local token persistence failed.
    #[error("Token store error: {0}")]
    TokenStore(String),

    #[error("OTF API error: {0}")]
    OtfApi(String),

    #[error("Strava API error: {0}")]
    StravaApi(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Whether a refresh failure was the provider rejecting the refresh
    /// token itself (vs. a transport problem). Only this case falls back
    /// to a fresh interactive login.
    pub fn is_refresh_rejection(&self) -> bool {
        matches!(self, AppError::RefreshFailed(msg) if msg.starts_with("HTTP 4"))
    }

    /// Whether this error ends the run without a retry.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AppError::ConsentDenied | AppError::StateMismatch | AppError::ConsentTimeout
        )
    }
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AppError>;
