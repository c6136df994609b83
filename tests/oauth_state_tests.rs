// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! OAuth state parameter tests.
//!
//! The state value correlates one authorization redirect with its
//! callback; it must be unpredictable, URL-safe, and never repeat
//! across login attempts.

use otf2strava::services::auth::generate_state;

#[test]
fn test_state_is_url_safe_base64() {
    let state = generate_state().unwrap();
    assert!(!state.contains('+'), "State should not contain '+'");
    assert!(!state.contains('/'), "State should not contain '/'");
    assert!(!state.contains('='), "State should not contain '=' padding");
}

#[test]
fn test_state_has_enough_entropy() {
    // 24 random bytes encode to 32 base64 characters.
    let state = generate_state().unwrap();
    assert_eq!(state.len(), 32);
}

#[test]
fn test_states_never_repeat_across_attempts() {
    let mut seen = std::collections::HashSet::new();
    for _ in 0..1000 {
        assert!(
            seen.insert(generate_state().unwrap()),
            "state value repeated across attempts"
        );
    }
}
