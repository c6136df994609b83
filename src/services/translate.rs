// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout to Strava activity translation.
//!
//! Pure transformation, no I/O: one source-normalized [`Workout`] in, one
//! destination-normalized [`Activity`] out. Heterogeneous telemetry is
//! reduced to the target schema under fixed fallback rules:
//!
//! - distance is only trusted when reported in miles (a known source
//!   limitation is carried forward, not silently fixed)
//! - duration comes from the zone-time buckets, which unlike wall-clock
//!   deltas are not skewed by pauses
//! - zero/negative heart-rate samples are sensor dropouts and never
//!   enter the average

use crate::error::{AppError, Result};
use crate::models::{Activity, DistanceUnit, Workout};
use crate::time_utils::format_activity_start;

/// Meters per statute mile.
const METERS_PER_MILE: f64 = 1609.344;

/// Class names that map to a timed run. Matched case-sensitively.
const TIMED_RUN_CLASSES: &[&str] = &["Tread 50"];

/// Translate one workout into a ready-to-submit activity.
pub fn translate(workout: &Workout) -> Result<Activity> {
    let (activity_type, sport_type) = classify(&workout.class_type);

    Ok(Activity {
        name: workout.activity_name.clone(),
        activity_type: activity_type.to_string(),
        sport_type: sport_type.to_string(),
        start_date_local: format_activity_start(workout.start_time),
        elapsed_time: total_duration_seconds(workout)?,
        // Original studio class name, even after reclassification.
        description: workout.class_type.clone(),
        distance: distance_meters(workout),
        calories: workout.calories,
        max_heartrate: workout.max_heart_rate,
        avg_heartrate: Some(average_heart_rate(workout)?),
    })
}

/// Classify a studio class name into `(activity_type, sport_type)`.
/// Ordered rules, first match wins.
fn classify(class_type: &str) -> (&'static str, &'static str) {
    if TIMED_RUN_CLASSES.contains(&class_type) {
        ("Run", "Run")
    } else if class_type.to_lowercase().contains("strength") {
        ("Strength Training", "Workout")
    } else {
        ("Workout", "Workout")
    }
}

/// Distance in meters, or `None` when the source value is unusable.
///
/// Only mile-denominated distances are converted; anything else
/// (including already-metric values) is treated as absent.
fn distance_meters(workout: &Workout) -> Option<f64> {
    workout.total_distance.and_then(|d| match d.unit {
        DistanceUnit::Miles => Some(d.value * METERS_PER_MILE),
        _ => None,
    })
}

/// Total duration as the sum of the per-zone buckets.
fn total_duration_seconds(workout: &Workout) -> Result<u64> {
    let total: i64 = workout.zone_times.iter().map(|z| z.seconds).sum();
    u64::try_from(total).map_err(|_| {
        AppError::InvalidTelemetry(format!("negative total duration: {}s", total))
    })
}

/// Mean of the non-dropout heart-rate samples.
fn average_heart_rate(workout: &Workout) -> Result<f64> {
    let readings: Vec<i32> = workout
        .heart_rate_samples
        .iter()
        .map(|s| s.value)
        .filter(|&v| v > 0)
        .collect();

    if readings.is_empty() {
        return Err(AppError::IncompleteTelemetry(
            "no usable heart-rate samples".to_string(),
        ));
    }

    let sum: i64 = readings.iter().map(|&v| i64::from(v)).sum();
    Ok(sum as f64 / readings.len() as f64)
}
