//! HTTP client for the Plex Media Server API

use std::fmt;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use url::Url;

use super::models::{Envelope, IdentityContainer, MetadataContainer, PlexMetadata, SectionContainer};
use super::{MediaServer, PlexSession};
use crate::dedupe::{Item, LibrarySection, Media};
use crate::error::{DedupeError, Result};

const TOKEN_HEADER: &str = "X-Plex-Token";

/// Ids are sent as single path segments. URL normalization drops `.` and `..`.
fn is_path_id(id: &str) -> bool {
    !id.is_empty() && id != "." && id != ".."
}

/// Plex API client bound to one session
pub struct PlexClient {
    client: Client,
    session: PlexSession,
}

impl fmt::Debug for PlexClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlexClient")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl PlexClient {
    pub fn new(session: PlexSession) -> Result<Self> {
        let client = Client::builder()
            .timeout(session.timeout())
            .build()
            .map_err(|e| DedupeError::unreachable(session.base_url().as_str(), e))?;

        Ok(Self { client, session })
    }

    /// Build a client and verify the server answers with this token
    pub async fn connect(session: PlexSession) -> Result<Self> {
        let client = Self::new(session)?;
        let identity: IdentityContainer = client.get(&["identity"]).await?;

        info!(
            server = %client.session.base_url(),
            machine_identifier = identity.machine_identifier.as_deref().unwrap_or("unknown"),
            version = identity.version.as_deref().unwrap_or("unknown"),
            "Connected to Plex"
        );
        Ok(client)
    }

    /// Append `segments` to the base URL, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.session.base_url().clone();
        url.path_segments_mut()
            .map_err(|_| self.unreachable("server URL cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn unreachable(&self, reason: impl ToString) -> DedupeError {
        DedupeError::unreachable(self.session.base_url().as_str(), reason)
    }

    async fn send(&self, method: Method, segments: &[&str]) -> Result<Response> {
        let url = self.endpoint(segments)?;
        debug!(method = %method, url = %url, "Plex request");

        self.client
            .request(method, url)
            .header(TOKEN_HEADER, self.session.token())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.unreachable(e))
    }

    fn check_status(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            Err(self.unreachable(format!("token rejected ({status})")))
        } else {
            Err(self.unreachable(format!("unexpected status {status}")))
        }
    }

    async fn decode<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let url = response.url().clone();
        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| self.unreachable(format!("invalid response from {}: {e}", url.path())))?;
        Ok(envelope.container)
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let response = self.send(Method::GET, segments).await?;
        let response = self.check_status(response)?;
        self.decode(response).await
    }
}

#[async_trait]
impl MediaServer for PlexClient {
    async fn sections(&self) -> Result<Vec<LibrarySection>> {
        let container: SectionContainer = self.get(&["library", "sections"]).await?;
        let sections = container.into_sections();
        debug!(count = sections.len(), "Fetched library sections");
        Ok(sections)
    }

    async fn items(&self, section: &LibrarySection) -> Result<Vec<Item>> {
        let container: MetadataContainer = self
            .get(&["library", "sections", section.key.as_str(), "all"])
            .await?;

        let items: Vec<Item> = container
            .metadata
            .into_iter()
            .map(PlexMetadata::into_item)
            .collect();
        debug!(section = %section.key, count = items.len(), "Fetched library items");
        Ok(items)
    }

    async fn fetch_item(&self, rating_key: &str) -> Result<Item> {
        if !is_path_id(rating_key) {
            return Err(DedupeError::ItemNotFound(rating_key.to_string()));
        }
        let response = self
            .send(Method::GET, &["library", "metadata", rating_key])
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(DedupeError::ItemNotFound(rating_key.to_string()));
        }
        let response = self.check_status(response)?;
        let container: MetadataContainer = self.decode(response).await?;

        container
            .metadata
            .into_iter()
            .next()
            .map(PlexMetadata::into_item)
            .ok_or_else(|| DedupeError::ItemNotFound(rating_key.to_string()))
    }

    async fn delete_media(&self, media: &Media) -> Result<()> {
        let failure = |reason: String| DedupeError::DeleteFailure {
            item_id: media.item_key.clone(),
            media_id: media.id.clone(),
            reason,
        };

        if !is_path_id(&media.item_key) || !is_path_id(&media.id) {
            return Err(failure("invalid media id".to_string()));
        }

        let response = self
            .send(
                Method::DELETE,
                &[
                    "library",
                    "metadata",
                    media.item_key.as_str(),
                    "media",
                    media.id.as_str(),
                ],
            )
            .await
            .map_err(|e| failure(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(item = %media.item_key, media = %media.id, status = %status, "Plex refused delete");
            let reason = if status == StatusCode::FORBIDDEN || status == StatusCode::UNAUTHORIZED {
                format!("server refused ({status}); check that media deletion is allowed")
            } else {
                format!("unexpected status {status}")
            };
            return Err(failure(reason));
        }

        info!(
            item = %media.item_key,
            media = %media.id,
            file = media.file.as_deref().unwrap_or("unknown"),
            "Deleted media"
        );
        Ok(())
    }
}
