// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod auth;
pub mod callback;
pub mod otf;
pub mod strava;
pub mod token_store;
pub mod translate;

pub use auth::{ConsentBrowser, SystemBrowser, TokenLifecycleManager};
pub use otf::OtfClient;
pub use strava::{StravaClient, SubmissionOutcome};
pub use token_store::TokenStore;
