//! API route definitions
//!
//! The dashboard is server-rendered HTML. JSON mirrors of the same data live
//! under /api for scripting.

pub mod dashboard;
pub mod health;
pub mod libraries;
pub mod views;

use axum::Router;
use axum::http::StatusCode;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::AppState;
use crate::error::DedupeError;

/// Build the full application router
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .merge(health::router())
        // HTML dashboard
        .merge(dashboard::router())
        // JSON endpoints
        .nest("/api", libraries::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Log a failed request, server-side failures at error level, and return its status
pub(crate) fn log_failure(err: &DedupeError) -> StatusCode {
    let status = err.status();
    if status.is_server_error() {
        error!(error = %err, status = %status, "Request failed");
    } else {
        warn!(error = %err, status = %status, "Request rejected");
    }
    status
}
