//! HTML dashboard routes: library list, duplicate report, delete action

use axum::{
    Form, Router,
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::info;

use super::views;
use crate::AppState;
use crate::dedupe::build_report;
use crate::error::{DedupeError, Result};

impl IntoResponse for DedupeError {
    fn into_response(self) -> Response {
        let status = super::log_failure(&self);
        (status, Html(views::error_page(status, &self.to_string()))).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    pub item_id: String,
    pub media_id: String,
    /// Library page to return to
    #[serde(default)]
    pub library: Option<usize>,
}

/// List the server's library sections
async fn index(State(state): State<AppState>) -> Result<Html<String>> {
    let ctx = state.open().await?;
    let sections = ctx.server.sections().await?;
    Ok(Html(views::index_page(&sections)))
}

/// Ranked duplicates of one library
async fn library(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Html<String>> {
    let ctx = state.open().await?;
    let report = build_report(ctx.server.as_ref(), &ctx.settings.scoring, index).await?;
    Ok(Html(views::library_page(&report)))
}

/// Delete one media version, then go back to where the user came from
async fn delete(State(state): State<AppState>, Form(form): Form<DeleteForm>) -> Result<Redirect> {
    let ctx = state.open().await?;
    let media = ctx
        .server
        .resolve_media(&form.item_id, &form.media_id)
        .await?;
    ctx.server.delete_media(&media).await?;

    info!(
        item = %form.item_id,
        media = %form.media_id,
        title = %media.identity(),
        "Duplicate removed"
    );

    let target = match form.library {
        Some(index) => format!("/library/{index}"),
        None => "/".to_string(),
    };
    Ok(Redirect::to(&target))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/library/{index}", get(library))
        .route("/delete", post(delete))
}
