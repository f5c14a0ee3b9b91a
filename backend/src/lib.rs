//! Plex Dedupe - find, rank and remove duplicate media on a Plex server

pub mod api;
pub mod cli;
pub mod config;
pub mod dedupe;
pub mod error;
pub mod plex;

use std::sync::Arc;

use crate::config::{Config, DashboardSettings};
use crate::plex::{MediaServer, MediaServerConnector};

pub use error::{DedupeError, Result};

/// Application state shared across all handlers. Immutable; anything that
/// depends on the settings document is rebuilt per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub connector: Arc<dyn MediaServerConnector>,
}

/// Settings and server connection for a single request
pub struct RequestContext {
    pub settings: DashboardSettings,
    pub server: Box<dyn MediaServer>,
}

impl AppState {
    pub fn new(config: Config, connector: impl MediaServerConnector + 'static) -> Self {
        Self {
            config: Arc::new(config),
            connector: Arc::new(connector),
        }
    }

    /// Reload the settings document and connect to the media server
    pub async fn open(&self) -> Result<RequestContext> {
        let settings = DashboardSettings::load(&self.config.settings_path).await?;
        let session = settings.session(&self.config)?;
        let server = self.connector.connect(session).await?;
        Ok(RequestContext { settings, server })
    }
}
