//! Error types shared by the config loader, the Plex adapter and the dashboard routes

use std::path::PathBuf;

use axum::http::StatusCode;
use thiserror::Error;

pub type Result<T, E = DedupeError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum DedupeError {
    /// Configuration document absent or invalid
    #[error("Configuration error in {path}: {reason}")]
    ConfigMissingOrMalformed { path: PathBuf, reason: String },

    /// Connection, timeout, auth or protocol failure talking to the media server
    #[error("Media server unreachable at {url}: {reason}")]
    MediaServiceUnreachable { url: String, reason: String },

    #[error("Media {media_id} is missing its {attribute}")]
    MediaAttributeMissing {
        media_id: String,
        attribute: &'static str,
    },

    #[error("Failed to delete media {media_id} of item {item_id}: {reason}")]
    DeleteFailure {
        item_id: String,
        media_id: String,
        reason: String,
    },

    #[error("Library {0} not found")]
    LibraryNotFound(usize),

    #[error("Item {0} not found")]
    ItemNotFound(String),

    #[error("Media {media_id} not found on item {item_id}")]
    MediaNotFound { item_id: String, media_id: String },
}

impl DedupeError {
    pub fn config(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::ConfigMissingOrMalformed {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn unreachable(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::MediaServiceUnreachable {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// HTTP status the dashboard answers with for this error
    pub fn status(&self) -> StatusCode {
        match self {
            Self::ConfigMissingOrMalformed { .. } | Self::MediaAttributeMissing { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::MediaServiceUnreachable { .. } | Self::DeleteFailure { .. } => {
                StatusCode::BAD_GATEWAY
            }
            Self::LibraryNotFound(_) | Self::ItemNotFound(_) | Self::MediaNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
        }
    }
}
