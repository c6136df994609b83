// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Source-normalized OTF workout model.
//!
//! The OTF backend returns loosely-structured nested JSON; the client in
//! `services::otf` flattens it into the typed [`Workout`] record below so
//! that a missing field is a typed `None` instead of a runtime lookup
//! failure.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Unit of a reported distance value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    Miles,
    Meters,
    Kilometers,
}

/// A distance value as reported by the source, unit attached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Distance {
    pub value: f64,
    pub unit: DistanceUnit,
}

/// Time spent in one heart-rate intensity zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneTime {
    /// Studio zone label ("red", "orange", ...)
    pub zone: String,
    pub seconds: i64,
}

/// A single timestamped heart-rate reading.
///
/// Zero or negative values are sensor dropouts; the translator filters
/// them out rather than letting them skew the average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartRateSample {
    pub value: i32,
    /// Offset from the workout start, in seconds
    pub offset_seconds: i64,
}

/// One workout as normalized from the OTF in-studio history plus its
/// performance summary. Read-only input to the translator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    /// Display name for the resulting activity
    pub activity_name: String,
    /// Free-text studio class name, drives sport classification
    pub class_type: String,
    /// Class start, already normalized to the desired zone upstream
    pub start_time: NaiveDateTime,
    /// Per-zone durations in studio order
    pub zone_times: Vec<ZoneTime>,
    pub total_distance: Option<Distance>,
    pub calories: Option<u32>,
    pub heart_rate_samples: Vec<HeartRateSample>,
    pub max_heart_rate: Option<u32>,
}
