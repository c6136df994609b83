// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity submission tests: 201/409/other discrimination.

use otf2strava::error::AppError;
use otf2strava::models::Activity;
use otf2strava::services::{StravaClient, SubmissionOutcome};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sample_activity() -> Activity {
    Activity {
        name: "Tread 50".to_string(),
        activity_type: "Run".to_string(),
        sport_type: "Run".to_string(),
        start_date_local: "2024-03-09T17:30:00.000000Z".to_string(),
        elapsed_time: 1020,
        description: "Tread 50".to_string(),
        distance: Some(3218.688),
        calories: Some(480),
        max_heartrate: Some(181),
        avg_heartrate: Some(150.0),
    }
}

#[tokio::test]
async fn test_created_on_201() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/activities"))
        .and(header("authorization", "Bearer access-token"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(serde_json::json!({ "id": 4242 })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = StravaClient::new(server.uri()).unwrap();
    let outcome = client
        .create_activity("access-token", &sample_activity())
        .await
        .unwrap();

    assert_eq!(outcome, SubmissionOutcome::Created { id: Some(4242) });
}

#[tokio::test]
async fn test_duplicate_on_409_is_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/activities"))
        .respond_with(ResponseTemplate::new(409).set_body_string(
            r#"{"message":"conflict","errors":[{"code":"duplicate"}]}"#,
        ))
        .mount(&server)
        .await;

    let client = StravaClient::new(server.uri()).unwrap();
    let outcome = client
        .create_activity("access-token", &sample_activity())
        .await
        .unwrap();

    assert_eq!(outcome, SubmissionOutcome::Duplicate);
}

#[tokio::test]
async fn test_other_status_rejected_with_verbatim_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/activities"))
        .respond_with(
            ResponseTemplate::new(422).set_body_string(r#"{"message":"Unprocessable Entity"}"#),
        )
        .mount(&server)
        .await;

    let client = StravaClient::new(server.uri()).unwrap();
    match client
        .create_activity("access-token", &sample_activity())
        .await
    {
        Err(AppError::SubmissionRejected { status, body }) => {
            assert_eq!(status, 422);
            assert_eq!(body, r#"{"message":"Unprocessable Entity"}"#);
        }
        other => panic!("expected SubmissionRejected, got {:?}", other),
    }
}

#[tokio::test]
async fn test_request_body_matches_destination_schema() {
    let server = MockServer::start().await;
    let expected = serde_json::json!({
        "name": "Tread 50",
        "type": "Run",
        "sport_type": "Run",
        "start_date_local": "2024-03-09T17:30:00.000000Z",
        "elapsed_time": 1020,
        "description": "Tread 50",
        "distance": 3218.688,
        "calories": 480,
        "max_heartrate": 181,
        "avg_heartrate": 150.0,
    });
    Mock::given(method("POST"))
        .and(path("/activities"))
        .and(body_json(&expected))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({ "id": 1 })))
        .expect(1)
        .mount(&server)
        .await;

    let client = StravaClient::new(server.uri()).unwrap();
    client
        .create_activity("access-token", &sample_activity())
        .await
        .unwrap();
}
