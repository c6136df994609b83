// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OTF (Orangetheory Fitness) API client.
//!
//! Authenticates against the OTF Cognito user pool, lists the member's
//! in-studio workout history, fetches the per-class performance summary,
//! and normalizes the loosely-structured upstream JSON into the typed
//! [`Workout`] record consumed by the translator.

use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::json;

use crate::config::HTTP_TIMEOUT;
use crate::error::{AppError, Result};
use crate::models::{Distance, DistanceUnit, HeartRateSample, Workout, ZoneTime};

const COGNITO_URL: &str = "https://cognito-idp.us-east-1.amazonaws.com/";
const OTF_API_BASE_URL: &str = "https://api.orangetheory.co";
const OTF_PERFORMANCE_BASE_URL: &str = "https://performance.orangetheory.co";

/// Public Cognito app client ID for the OTF member pool.
const OTF_COGNITO_CLIENT_ID: &str = "65knvqta6p37efc2l3eh26pl5o";

/// Spacing of the minute-by-minute heart-rate series.
const HR_SAMPLE_INTERVAL_SECS: i64 = 60;

/// OTF API client.
#[derive(Clone)]
pub struct OtfClient {
    http: reqwest::Client,
    email: String,
    password: String,
    cognito_url: String,
    api_base_url: String,
    performance_base_url: String,
}

impl OtfClient {
    /// Create a new client for the production OTF endpoints.
    pub fn new(email: String, password: String) -> Result<Self> {
        Self::with_endpoints(
            email,
            password,
            COGNITO_URL.to_string(),
            OTF_API_BASE_URL.to_string(),
            OTF_PERFORMANCE_BASE_URL.to_string(),
        )
    }

    /// Create a client against alternate endpoints (tests).
    pub fn with_endpoints(
        email: String,
        password: String,
        cognito_url: String,
        api_base_url: String,
        performance_base_url: String,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("HTTP client build failed: {}", e)))?;
        Ok(Self {
            http,
            email,
            password,
            cognito_url,
            api_base_url,
            performance_base_url,
        })
    }

    /// Authenticate with the OTF Cognito pool, returning an Id token.
    pub async fn login(&self) -> Result<String> {
        let body = json!({
            "AuthParameters": {
                "USERNAME": self.email,
                "PASSWORD": self.password,
            },
            "AuthFlow": "USER_PASSWORD_AUTH",
            "ClientId": OTF_COGNITO_CLIENT_ID,
        });

        let response = self
            .http
            .post(&self.cognito_url)
            .header("Content-Type", "application/x-amz-json-1.1")
            .header(
                "X-Amz-Target",
                "AWSCognitoIdentityProviderService.InitiateAuth",
            )
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::OtfApi(format!("Cognito request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::OtfApi(format!(
                "OTF authentication failed (HTTP {}), check OTF_EMAIL/OTF_PASSWORD",
                status.as_u16()
            )));
        }

        let auth: CognitoAuthResponse = response
            .json()
            .await
            .map_err(|e| AppError::OtfApi(format!("Cognito response parse error: {}", e)))?;

        Ok(auth.authentication_result.id_token)
    }

    /// List the member's most recent in-studio workouts, newest first as
    /// returned by OTF (display order only), normalized for translation.
    pub async fn list_recent_workouts(&self, limit: usize) -> Result<Vec<Workout>> {
        let token = self.login().await?;

        let url = format!("{}/virtual-class/in-studio-workouts", self.api_base_url);
        let response = self
            .http
            .get(&url)
            .header("Authorization", &token)
            .header("Origin", "https://otlive.orangetheory.com")
            .header("Referer", "https://otlive.orangetheory.com")
            .send()
            .await
            .map_err(|e| AppError::OtfApi(format!("workout list request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::OtfApi(format!(
                "workout list failed (HTTP {}): {}",
                status.as_u16(),
                body
            )));
        }

        let listing: InStudioResponse = response
            .json()
            .await
            .map_err(|e| AppError::OtfApi(format!("workout list parse error: {}", e)))?;

        let mut workouts = Vec::new();
        for row in listing.data.into_iter().take(limit) {
            let summary = self
                .fetch_performance_summary(&token, &row.class_history_uu_id, &row.member_uu_id)
                .await?;
            workouts.push(normalize_workout(row, summary)?);
        }

        tracing::info!(count = workouts.len(), "Fetched OTF workout history");
        Ok(workouts)
    }

    /// Fetch the performance summary for one class.
    async fn fetch_performance_summary(
        &self,
        token: &str,
        class_history_uuid: &str,
        member_uuid: &str,
    ) -> Result<PerformanceSummary> {
        let url = format!(
            "{}/v2.4/member/workout/summary",
            self.performance_base_url
        );
        let payload = json!({
            "ClassHistoryUUId": class_history_uuid,
            "MemberUUId": member_uuid,
        });

        let response = self
            .http
            .post(&url)
            .header("Authorization", token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::OtfApi(format!("performance summary request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::OtfApi(format!(
                "performance summary for class {} failed (HTTP {})",
                class_history_uuid,
                status.as_u16()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::OtfApi(format!("performance summary parse error: {}", e)))
    }
}

/// Flatten one upstream row plus its performance summary into the typed
/// [`Workout`] record.
fn normalize_workout(row: InStudioWorkout, summary: PerformanceSummary) -> Result<Workout> {
    let start_time = parse_class_date(&row.class_date)?;

    // Studio zone order: red, orange, green, blue, black.
    let zone_times = vec![
        ZoneTime {
            zone: "red".to_string(),
            seconds: row.red_zone_time_second.unwrap_or(0),
        },
        ZoneTime {
            zone: "orange".to_string(),
            seconds: row.orange_zone_time_second.unwrap_or(0),
        },
        ZoneTime {
            zone: "green".to_string(),
            seconds: row.green_zone_time_second.unwrap_or(0),
        },
        ZoneTime {
            zone: "blue".to_string(),
            seconds: row.blue_zone_time_second.unwrap_or(0),
        },
        ZoneTime {
            zone: "black".to_string(),
            seconds: row.black_zone_time_second.unwrap_or(0),
        },
    ];

    let total_distance = summary
        .treadmill_data
        .and_then(|t| t.total_distance)
        .and_then(|d| {
            let unit = parse_distance_unit(d.unit.as_deref())?;
            Some(Distance {
                value: d.value,
                unit,
            })
        });

    Ok(Workout {
        activity_name: row.class_type.clone(),
        class_type: row.class_type,
        start_time,
        zone_times,
        total_distance,
        calories: row.total_calories,
        heart_rate_samples: parse_hr_series(row.minute_by_minute_hr.as_ref()),
        max_heart_rate: row.max_hr,
    })
}

/// Parse a class date, keeping the wall-clock time as written (the
/// source already normalized the zone).
fn parse_class_date(raw: &str) -> Result<NaiveDateTime> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.naive_local());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .map_err(|e| AppError::OtfApi(format!("unparseable class date {:?}: {}", raw, e)))
}

/// Map the upstream unit string. Absent means miles (OTF reports
/// imperial treadmill distance); an unrecognized unit drops the
/// distance rather than guessing.
fn parse_distance_unit(raw: Option<&str>) -> Option<DistanceUnit> {
    match raw {
        None => Some(DistanceUnit::Miles),
        Some(s) => match s.to_lowercase().as_str() {
            "miles" | "mi" => Some(DistanceUnit::Miles),
            "meters" | "m" => Some(DistanceUnit::Meters),
            "kilometers" | "km" => Some(DistanceUnit::Kilometers),
            other => {
                tracing::warn!(unit = other, "Unrecognized distance unit, dropping distance");
                None
            }
        },
    }
}

/// The minute-by-minute series arrives either as a JSON array or as a
/// JSON-encoded string, depending on API vintage.
fn parse_hr_series(raw: Option<&serde_json::Value>) -> Vec<HeartRateSample> {
    let values: Vec<i64> = match raw {
        Some(serde_json::Value::Array(items)) => {
            items.iter().filter_map(|v| v.as_i64()).collect()
        }
        Some(serde_json::Value::String(s)) => serde_json::from_str(s).unwrap_or_default(),
        _ => Vec::new(),
    };

    values
        .into_iter()
        .enumerate()
        .map(|(i, v)| HeartRateSample {
            value: v as i32,
            offset_seconds: i as i64 * HR_SAMPLE_INTERVAL_SECS,
        })
        .collect()
}

// ── Wire models ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct CognitoAuthResponse {
    #[serde(rename = "AuthenticationResult")]
    authentication_result: CognitoAuthResult,
}

#[derive(Debug, Deserialize)]
struct CognitoAuthResult {
    #[serde(rename = "IdToken")]
    id_token: String,
}

#[derive(Debug, Deserialize)]
struct InStudioResponse {
    data: Vec<InStudioWorkout>,
}

/// One row of the in-studio workout history.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InStudioWorkout {
    class_type: String,
    class_date: String,
    member_uu_id: String,
    class_history_uu_id: String,
    #[serde(default)]
    total_calories: Option<u32>,
    #[serde(default)]
    max_hr: Option<u32>,
    #[serde(default)]
    red_zone_time_second: Option<i64>,
    #[serde(default)]
    orange_zone_time_second: Option<i64>,
    #[serde(default)]
    green_zone_time_second: Option<i64>,
    #[serde(default)]
    blue_zone_time_second: Option<i64>,
    #[serde(default)]
    black_zone_time_second: Option<i64>,
    #[serde(default)]
    minute_by_minute_hr: Option<serde_json::Value>,
}

/// Per-class performance summary (treadmill slice only; the rower block
/// is not used by the translation rules).
#[derive(Debug, Default, Deserialize)]
struct PerformanceSummary {
    #[serde(rename = "TreadmillData", default)]
    treadmill_data: Option<TreadmillData>,
}

#[derive(Debug, Deserialize)]
struct TreadmillData {
    #[serde(rename = "TotalDistance", default)]
    total_distance: Option<RawDistance>,
}

#[derive(Debug, Deserialize)]
struct RawDistance {
    #[serde(rename = "Value")]
    value: f64,
    #[serde(rename = "Unit", default)]
    unit: Option<String>,
}
