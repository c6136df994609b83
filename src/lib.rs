// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! otf2strava: publish Orangetheory Fitness workouts to Strava.
//!
//! Two core subsystems: the OAuth token lifecycle manager (acquire,
//! persist, refresh, interactive consent) and the pure workout-to-activity
//! translation engine, plus thin clients for the OTF and Strava APIs.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod time_utils;
