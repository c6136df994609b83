// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! otf2strava CLI
//!
//! Pulls the member's recent Orangetheory workouts, lets the user pick
//! one, translates it, and publishes it as a Strava activity.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use otf2strava::{
    config::Config,
    error::AppError,
    services::{
        translate::translate, OtfClient, StravaClient, SubmissionOutcome, SystemBrowser,
        TokenLifecycleManager, TokenStore,
    },
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How many recent workouts to offer for selection.
const WORKOUT_LIST_LIMIT: usize = 20;

#[tokio::main]
async fn main() {
    init_logging();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "Run failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    let config = Config::from_env()?;

    let store = TokenStore::new(config.token_path.clone());
    let manager = TokenLifecycleManager::new(config.clone(), store, Arc::new(SystemBrowser))?;
    let token = manager.get_valid_token().await?;

    let otf = OtfClient::new(config.otf_email.clone(), config.otf_password.clone())?;
    println!("Fetching your recent OTF workouts...");
    let workouts = otf.list_recent_workouts(WORKOUT_LIST_LIMIT).await?;

    if workouts.is_empty() {
        println!("No recent workouts found.");
        return Ok(());
    }

    println!("Select a workout to post to Strava:");
    for (ix, workout) in workouts.iter().enumerate() {
        println!(
            "Workout #{}, Date: {}, Type: {}",
            ix + 1,
            workout.start_time,
            workout.class_type
        );
    }

    let activity = loop {
        let choice = prompt_selection(workouts.len())?;
        // A workout with unusable telemetry is reported and the user
        // re-prompted; it never aborts the rest of the batch.
        match translate(&workouts[choice - 1]) {
            Ok(activity) => break activity,
            Err(e @ (AppError::IncompleteTelemetry(_) | AppError::InvalidTelemetry(_))) => {
                println!("Cannot post workout #{}: {}", choice, e);
            }
            Err(e) => return Err(e),
        }
    };

    println!("Posting workout to Strava...");
    let strava = StravaClient::new(config.strava_api_base_url.clone())?;
    match strava.create_activity(&token.access_token, &activity).await? {
        SubmissionOutcome::Created { .. } => println!("Workout posted successfully!"),
        SubmissionOutcome::Duplicate => {
            println!("This workout is already on Strava, nothing to do.")
        }
    }

    Ok(())
}

/// Read a validated 1-based workout selection from stdin.
fn prompt_selection(count: usize) -> Result<usize, AppError> {
    let stdin = io::stdin();
    loop {
        print!("Please enter a workout number (1-{count}): ");
        io::stdout()
            .flush()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("stdout flush: {}", e)))?;

        let mut line = String::new();
        let read = stdin
            .lock()
            .read_line(&mut line)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("stdin read: {}", e)))?;
        if read == 0 {
            return Err(AppError::Internal(anyhow::anyhow!(
                "stdin closed before a selection was made"
            )));
        }

        match line.trim().parse::<usize>() {
            Ok(n) if (1..=count).contains(&n) => return Ok(n),
            Ok(_) => println!("Invalid workout #, must be between 1 and {count}"),
            Err(_) => println!("Input must be an integer"),
        }
    }
}

/// Initialize logging to stderr, keeping stdout for the interactive UI.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(io::stderr);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("otf2strava=info".parse().expect("valid directive")),
        )
        .with(format)
        .init();
}
