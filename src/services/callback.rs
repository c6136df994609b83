// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Loopback HTTP listener for the OAuth consent callback.
//!
//! Binds `127.0.0.1:<port>` *before* the browser is opened (avoids the
//! race where Strava redirects before we listen), serves exactly one
//! callback request, and hands its query parameters back to the login
//! flow. The wait is bounded; a user who closes the browser without
//! completing consent gets a `ConsentTimeout`, not a hang.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Query, State},
    response::Html,
    routing::get,
    Router,
};
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use crate::error::{AppError, Result};

const SUCCESS_PAGE: &str =
    "<html><body><h1>Login complete</h1><p>You may close this tab and return to the terminal.</p></body></html>";

/// Query parameters Strava appends to the redirect.
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    /// Set when the user denied consent (e.g. "access_denied")
    #[serde(default)]
    pub error: Option<String>,
}

type CallbackSlot = Arc<Mutex<Option<oneshot::Sender<CallbackParams>>>>;

/// A bound, not-yet-serving callback listener.
pub struct CallbackListener {
    listener: TcpListener,
    addr: SocketAddr,
}

impl CallbackListener {
    /// Bind the loopback callback port. Port 0 picks an ephemeral port;
    /// use [`redirect_uri`](Self::redirect_uri) for the actual address.
    pub async fn bind(port: u16) -> Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", port)).await.map_err(|e| {
            AppError::Internal(anyhow::anyhow!(
                "failed to bind callback port {}: {}",
                port,
                e
            ))
        })?;
        let addr = listener
            .local_addr()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("callback local_addr: {}", e)))?;
        Ok(Self { listener, addr })
    }

    /// Redirect URI to register in the authorization URL.
    pub fn redirect_uri(&self) -> String {
        format!("http://{}/callback", self.addr)
    }

    /// Serve until one callback arrives or the bound expires.
    pub async fn wait(self, bound: Duration) -> Result<CallbackParams> {
        let (tx, rx) = oneshot::channel();
        let slot: CallbackSlot = Arc::new(Mutex::new(Some(tx)));

        let app = Router::new()
            .route("/callback", get(capture_callback))
            .with_state(slot);

        let server = tokio::spawn(async move {
            if let Err(e) = axum::serve(self.listener, app).await {
                tracing::warn!(error = %e, "Callback listener exited");
            }
        });

        let outcome = tokio::time::timeout(bound, rx).await;

        // Let the success page flush to the browser before tearing down.
        if outcome.is_ok() {
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        server.abort();

        match outcome {
            Err(_) => Err(AppError::ConsentTimeout),
            Ok(Err(_)) => Err(AppError::Internal(anyhow::anyhow!(
                "callback channel closed before a redirect arrived"
            ))),
            Ok(Ok(params)) => Ok(params),
        }
    }
}

async fn capture_callback(
    State(slot): State<CallbackSlot>,
    Query(params): Query<CallbackParams>,
) -> Html<&'static str> {
    if let Ok(mut guard) = slot.lock() {
        if let Some(tx) = guard.take() {
            let _ = tx.send(params);
        }
    }
    Html(SUCCESS_PAGE)
}
