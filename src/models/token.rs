// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persisted OAuth token record.

use serde::{Deserialize, Serialize};

/// A Strava OAuth token set as persisted between runs.
///
/// `expires_at` is always absolute epoch seconds, never a relative TTL.
/// A token is replaced wholesale on refresh, never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    /// Expiry as epoch seconds (UTC)
    pub expires_at: i64,
    /// Granted OAuth scopes
    pub scope: Vec<String>,
}

impl Token {
    /// Whether the access token is still usable at `now` (epoch seconds).
    ///
    /// Strictly greater-than: a token valid for one more second is still
    /// valid. This check exists to avoid redundant logins, not to
    /// guarantee freshness for any particular duration.
    pub fn is_valid_at(&self, now: i64) -> bool {
        self.expires_at > now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_expiring_at(expires_at: i64) -> Token {
        Token {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            expires_at,
            scope: vec!["activity:write".to_string()],
        }
    }

    #[test]
    fn test_validity_is_strict() {
        let t = token_expiring_at(1_000);
        assert!(t.is_valid_at(999));
        assert!(!t.is_valid_at(1_000));
        assert!(!t.is_valid_at(1_001));
    }

    #[test]
    fn test_serde_roundtrip() {
        let t = token_expiring_at(1_700_000_000);
        let json = serde_json::to_string(&t).unwrap();
        let back: Token = serde_json::from_str(&json).unwrap();
        assert_eq!(t, back);
    }
}
