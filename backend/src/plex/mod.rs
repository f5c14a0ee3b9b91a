//! Plex media server adapter
//!
//! Handlers never share a connection: each request resolves a [PlexSession]
//! from the freshly loaded settings and asks a [MediaServerConnector] for a
//! connected [MediaServer].

pub mod client;
pub mod models;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::dedupe::{Item, LibrarySection, Media};
use crate::error::{DedupeError, Result};

pub use client::PlexClient;

/// Request-scoped credentials for one Plex server
#[derive(Clone)]
pub struct PlexSession {
    base_url: Url,
    token: String,
    timeout: Duration,
}

impl PlexSession {
    pub fn new(mut base_url: Url, token: String, timeout: Duration) -> Self {
        // Url::join replaces the last segment unless the base ends with a slash
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            base_url,
            token,
            timeout,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl fmt::Debug for PlexSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlexSession")
            .field("base_url", &self.base_url.as_str())
            .field("token", &"...")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Operations the dashboard needs from a media server
#[async_trait]
pub trait MediaServer: Send + Sync {
    async fn sections(&self) -> Result<Vec<LibrarySection>>;

    /// Every item of a section with its media versions
    async fn items(&self, section: &LibrarySection) -> Result<Vec<Item>>;

    async fn fetch_item(&self, rating_key: &str) -> Result<Item>;

    /// Remove one media version (and its files) from the server
    async fn delete_media(&self, media: &Media) -> Result<()>;

    async fn section(&self, index: usize) -> Result<LibrarySection> {
        self.sections()
            .await?
            .into_iter()
            .find(|section| section.index == index)
            .ok_or(DedupeError::LibraryNotFound(index))
    }

    /// Look up a media version through its owning item
    async fn resolve_media(&self, item_id: &str, media_id: &str) -> Result<Media> {
        self.fetch_item(item_id)
            .await?
            .media
            .into_iter()
            .find(|media| media.id == media_id)
            .ok_or_else(|| DedupeError::MediaNotFound {
                item_id: item_id.to_string(),
                media_id: media_id.to_string(),
            })
    }
}

/// Produces a connected [MediaServer] for one request
#[async_trait]
pub trait MediaServerConnector: Send + Sync {
    async fn connect(&self, session: PlexSession) -> Result<Box<dyn MediaServer>>;
}

/// Connects to a real Plex server over HTTP
#[derive(Debug, Clone, Copy, Default)]
pub struct PlexConnector;

#[async_trait]
impl MediaServerConnector for PlexConnector {
    async fn connect(&self, session: PlexSession) -> Result<Box<dyn MediaServer>> {
        Ok(Box::new(PlexClient::connect(session).await?))
    }
}
