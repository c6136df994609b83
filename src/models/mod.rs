// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod otf;
pub mod strava;
pub mod token;

pub use otf::{Distance, DistanceUnit, HeartRateSample, Workout, ZoneTime};
pub use strava::Activity;
pub use token::Token;
