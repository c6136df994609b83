// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client for creating activities.

use serde::Deserialize;

use crate::config::HTTP_TIMEOUT;
use crate::error::{AppError, Result};
use crate::models::Activity;

/// Outcome of an activity submission.
///
/// A 409 duplicate is an expected, recoverable result (the activity is
/// already on Strava), not a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Activity created (HTTP 201).
    Created { id: Option<u64> },
    /// Strava already has this activity (HTTP 409).
    Duplicate,
}

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    base_url: String,
}

impl StravaClient {
    /// Create a new Strava client.
    pub fn new(base_url: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("HTTP client build failed: {}", e)))?;
        Ok(Self { http, base_url })
    }

    /// Create an activity on the authenticated athlete's profile.
    ///
    /// 201 is success, 409 is a duplicate. Any other status is a
    /// [`AppError::SubmissionRejected`] carrying the verbatim body.
    pub async fn create_activity(
        &self,
        access_token: &str,
        activity: &Activity,
    ) -> Result<SubmissionOutcome> {
        let url = format!("{}/activities", self.base_url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(access_token)
            .json(activity)
            .send()
            .await
            .map_err(|e| AppError::StravaApi(e.to_string()))?;

        let status = response.status().as_u16();
        match status {
            201 => {
                let created: Option<CreatedActivity> = response.json().await.ok();
                let id = created.map(|c| c.id);
                tracing::info!(?id, name = %activity.name, "Activity created on Strava");
                Ok(SubmissionOutcome::Created { id })
            }
            409 => {
                tracing::info!(name = %activity.name, "Activity already exists on Strava");
                Ok(SubmissionOutcome::Duplicate)
            }
            _ => {
                let body = response.text().await.unwrap_or_default();
                Err(AppError::SubmissionRejected { status, body })
            }
        }
    }
}

/// Minimal slice of the created-activity response.
#[derive(Debug, Deserialize)]
struct CreatedActivity {
    id: u64,
}
