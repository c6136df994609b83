// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Token persistence tests: atomic replace semantics and corruption
//! handling.

use otf2strava::error::AppError;
use otf2strava::models::Token;
use otf2strava::services::TokenStore;

fn sample_token(expires_at: i64) -> Token {
    Token {
        access_token: format!("access-{expires_at}"),
        refresh_token: "refresh".to_string(),
        expires_at,
        scope: vec![
            "activity:read_all".to_string(),
            "activity:write".to_string(),
        ],
    }
}

#[test]
fn test_load_absent_is_none() {
    let dir = tempfile::tempdir().unwrap();
    let store = TokenStore::new(dir.path().join("token.json"));

    assert_eq!(store.load().unwrap(), None);
}

#[test]
fn test_save_then_load_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let store = TokenStore::new(dir.path().join("token.json"));

    let token = sample_token(1_900_000_000);
    store.save(&token).unwrap();

    assert_eq!(store.load().unwrap(), Some(token));
}

#[test]
fn test_save_replaces_wholesale() {
    let dir = tempfile::tempdir().unwrap();
    let store = TokenStore::new(dir.path().join("token.json"));

    store.save(&sample_token(1_000)).unwrap();
    let newer = sample_token(2_000);
    store.save(&newer).unwrap();

    assert_eq!(store.load().unwrap(), Some(newer));
}

#[test]
fn test_no_temp_file_left_behind() {
    let dir = tempfile::tempdir().unwrap();
    let store = TokenStore::new(dir.path().join("token.json"));
    store.save(&sample_token(1_000)).unwrap();

    let entries: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries, vec!["token.json".to_string()]);
}

#[test]
fn test_corrupt_file_is_an_error_not_none() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("token.json");
    std::fs::write(&path, b"{ not json").unwrap();

    let store = TokenStore::new(path);
    match store.load() {
        Err(AppError::TokenStore(_)) => {}
        other => panic!("expected TokenStore error, got {:?}", other),
    }
}

#[test]
fn test_save_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let store = TokenStore::new(dir.path().join("nested/dir/token.json"));

    store.save(&sample_token(1_000)).unwrap();
    assert!(store.load().unwrap().is_some());
}
