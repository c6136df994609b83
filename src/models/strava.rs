// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Destination-normalized Strava activity model.

use serde::{Deserialize, Serialize};

/// Body for `POST /api/v3/activities`.
///
/// `start_date_local` carries the fixed `YYYY-MM-DDTHH:MM:SS.ffffffZ`
/// profile produced by `time_utils::format_activity_start`; `elapsed_time`
/// is always non-negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub name: String,
    /// Legacy activity type field ("Run", "Workout", "Strength Training")
    #[serde(rename = "type")]
    pub activity_type: String,
    /// Sport type ("Run", "Workout", ...)
    pub sport_type: String,
    pub start_date_local: String,
    /// Total duration in seconds
    pub elapsed_time: u64,
    /// Original studio class name, preserved verbatim
    pub description: String,
    /// Distance in meters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_heartrate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_heartrate: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_fields_are_not_serialized() {
        let activity = Activity {
            name: "Orange 60".to_string(),
            activity_type: "Workout".to_string(),
            sport_type: "Workout".to_string(),
            start_date_local: "2024-03-09T17:30:05.000000Z".to_string(),
            elapsed_time: 3600,
            description: "Orange 60".to_string(),
            distance: None,
            calories: Some(512),
            max_heartrate: None,
            avg_heartrate: None,
        };

        let json = serde_json::to_value(&activity).unwrap();
        assert!(json.get("distance").is_none());
        assert!(json.get("max_heartrate").is_none());
        assert_eq!(json["calories"], 512);
        assert_eq!(json["type"], "Workout");
    }
}
