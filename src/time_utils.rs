// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::NaiveDateTime;

/// Format a workout start time in the exact profile Strava's activity
/// creation endpoint expects: `YYYY-MM-DDTHH:MM:SS.ffffffZ` with
/// fixed-width microseconds and a literal trailing `Z`.
///
/// The input is assumed already normalized to the desired zone by the
/// workout source; no timezone conversion happens here.
pub fn format_activity_start(start: NaiveDateTime) -> String {
    start.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}
