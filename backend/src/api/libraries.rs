//! JSON library endpoints

use axum::{
    Json, Router,
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::{delete, get},
};
use serde::Serialize;
use tracing::info;

use crate::AppState;
use crate::dedupe::{LibraryReport, LibrarySection, Media, build_report};
use crate::error::DedupeError;

/// JSON rendering of [DedupeError]
#[derive(Debug)]
pub struct ApiError(pub DedupeError);

impl From<DedupeError> for ApiError {
    fn from(err: DedupeError) -> Self {
        Self(err)
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = super::log_failure(&self.0);
        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: Media,
}

/// List all library sections
async fn list_libraries(State(state): State<AppState>) -> Result<Json<Vec<LibrarySection>>, ApiError> {
    let ctx = state.open().await?;
    Ok(Json(ctx.server.sections().await?))
}

/// Ranked duplicate groups of one library
async fn library_duplicates(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<LibraryReport>, ApiError> {
    let ctx = state.open().await?;
    let report = build_report(ctx.server.as_ref(), &ctx.settings.scoring, index).await?;
    Ok(Json(report))
}

/// Delete one media version of an item
async fn delete_media(
    State(state): State<AppState>,
    Path((item_id, media_id)): Path<(String, String)>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let ctx = state.open().await?;
    let media = ctx.server.resolve_media(&item_id, &media_id).await?;
    ctx.server.delete_media(&media).await?;

    info!(item = %item_id, media = %media_id, "Duplicate removed via API");
    Ok(Json(DeleteResponse { deleted: media }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/libraries", get(list_libraries))
        .route("/libraries/{index}/duplicates", get(library_duplicates))
        .route("/items/{item_id}/media/{media_id}", delete(delete_media))
}
