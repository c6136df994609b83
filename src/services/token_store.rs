// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! File-backed token persistence with atomic replace.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::models::Token;

/// Durable token storage at a fixed path.
///
/// Writes go to a sibling temp file which is then renamed over the
/// target, so a crash mid-write can never leave a half-written token
/// file behind.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted token, if any.
    ///
    /// A missing file is `Ok(None)`; an unreadable or corrupt file is an
    /// error (the caller decides whether to re-login).
    pub fn load(&self) -> Result<Option<Token>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AppError::TokenStore(format!(
                    "failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let token = serde_json::from_slice(&bytes).map_err(|e| {
            AppError::TokenStore(format!("corrupt token file {}: {}", self.path.display(), e))
        })?;
        Ok(Some(token))
    }

    /// Persist a token, replacing any previous one atomically.
    pub fn save(&self, token: &Token) -> Result<()> {
        let json = serde_json::to_vec_pretty(token)
            .map_err(|e| AppError::TokenStore(format!("failed to serialize token: {}", e)))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    AppError::TokenStore(format!(
                        "failed to create {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &json).map_err(|e| {
            AppError::TokenStore(format!("failed to write {}: {}", tmp.display(), e))
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            AppError::TokenStore(format!(
                "failed to replace {}: {}",
                self.path.display(),
                e
            ))
        })?;

        tracing::debug!(path = %self.path.display(), "Token persisted");
        Ok(())
    }
}
