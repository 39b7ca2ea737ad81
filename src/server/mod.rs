//! HTTP server for the sign-off checker.
//!
//! # Endpoints
//!
//! - `POST /webhook` - Accepts GitHub webhook deliveries and runs the
//!   sign-off policy synchronously for pull request events
//! - `GET /health` - Returns 200 if the server is running

use std::sync::Arc;

use tower_http::trace::TraceLayer;

use crate::github::GitHubClient;

pub mod health;
pub mod webhook;

pub use health::health_handler;
pub use webhook::webhook_handler;

/// Shared application state.
///
/// Passed to handlers via Axum's `State` extractor. Holds the webhook secret
/// and the API client as explicit values; handlers never read ambient process
/// state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Webhook secret for HMAC-SHA256 signature verification.
    webhook_secret: Vec<u8>,

    /// Authenticated API client used to fetch commits and publish statuses.
    github: GitHubClient,
}

impl AppState {
    /// Creates a new `AppState` with the given secret and client.
    pub fn new(webhook_secret: impl Into<Vec<u8>>, github: GitHubClient) -> Self {
        AppState {
            inner: Arc::new(AppStateInner {
                webhook_secret: webhook_secret.into(),
                github,
            }),
        }
    }

    /// Returns the webhook secret.
    pub fn webhook_secret(&self) -> &[u8] {
        &self.inner.webhook_secret
    }

    /// Returns the API client.
    pub fn github(&self) -> &GitHubClient {
        &self.inner.github
    }
}

/// Builds the axum Router with all endpoints.
pub fn build_router(app_state: AppState) -> axum::Router {
    use axum::routing::{get, post};

    axum::Router::new()
        .route("/webhook", post(webhook_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
