//! Health check endpoints

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde::Serialize;
use tracing::warn;

use crate::AppState;
use crate::config::DashboardSettings;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct ReadyResponse {
    pub ready: bool,
    pub config: bool,
    pub media_server: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Health check - always returns OK if the server is running
async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Readiness check - the settings document loads and Plex answers
async fn readyz(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    let settings = DashboardSettings::load(&state.config.settings_path)
        .await
        .and_then(|settings| settings.session(&state.config));

    let session = match settings {
        Ok(session) => session,
        Err(e) => {
            warn!(error = %e, "Readiness check failed to load settings");
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadyResponse {
                    ready: false,
                    config: false,
                    media_server: false,
                    error: Some(e.to_string()),
                }),
            );
        }
    };

    match state.connector.connect(session).await {
        Ok(_) => (
            StatusCode::OK,
            Json(ReadyResponse {
                ready: true,
                config: true,
                media_server: true,
                error: None,
            }),
        ),
        Err(e) => {
            warn!(error = %e, "Readiness check could not reach media server");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadyResponse {
                    ready: false,
                    config: true,
                    media_server: false,
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
}
