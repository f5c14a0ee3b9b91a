//! Plex JSON response shapes and their conversion into library snapshots
//!
//! Plex wraps every response in a `MediaContainer` object. Attributes the
//! server leaves out are resolved here, once, into explicit defaults.

use serde::{Deserialize, Deserializer};

use crate::dedupe::{Item, LibrarySection, Media, UNKNOWN};

#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(rename = "MediaContainer")]
    pub container: T,
}

/// `GET /identity`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityContainer {
    #[serde(default)]
    pub machine_identifier: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

/// `GET /library/sections`
#[derive(Debug, Default, Deserialize)]
pub struct SectionContainer {
    #[serde(rename = "Directory", default)]
    pub directories: Vec<PlexDirectory>,
}

#[derive(Debug, Deserialize)]
pub struct PlexDirectory {
    #[serde(deserialize_with = "id_string")]
    pub key: String,
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// `GET /library/sections/{key}/all` and `GET /library/metadata/{id}`
#[derive(Debug, Default, Deserialize)]
pub struct MetadataContainer {
    #[serde(rename = "Metadata", default)]
    pub metadata: Vec<PlexMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlexMetadata {
    #[serde(deserialize_with = "id_string")]
    pub rating_key: String,
    pub title: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(rename = "Media", default)]
    pub media: Vec<PlexMedia>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlexMedia {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub audio_codec: Option<String>,
    #[serde(default)]
    pub video_codec: Option<String>,
    #[serde(default)]
    pub video_resolution: Option<String>,
    #[serde(rename = "Part", default)]
    pub parts: Vec<PlexPart>,
}

#[derive(Debug, Deserialize)]
pub struct PlexPart {
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

/// Plex sends ids as numbers in some responses and strings in others
fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Number(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}

fn or_unknown(value: Option<String>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

impl SectionContainer {
    pub fn into_sections(self) -> Vec<LibrarySection> {
        self.directories
            .into_iter()
            .enumerate()
            .map(|(index, dir)| LibrarySection {
                index,
                key: dir.key,
                title: dir.title,
                kind: dir.kind,
            })
            .collect()
    }
}

impl PlexMetadata {
    pub fn into_item(self) -> Item {
        let media = self
            .media
            .into_iter()
            .map(|m| m.into_media(&self.rating_key, &self.title, self.year))
            .collect();

        Item {
            rating_key: self.rating_key,
            title: self.title,
            year: self.year,
            media,
        }
    }
}

impl PlexMedia {
    fn into_media(self, item_key: &str, title: &str, year: Option<i32>) -> Media {
        let part_count = self.parts.len();
        let first = self.parts.into_iter().next();

        Media {
            id: self.id,
            item_key: item_key.to_string(),
            title: title.to_string(),
            year,
            file: first
                .as_ref()
                .and_then(|p| p.file.clone())
                .filter(|f| !f.is_empty()),
            audio_codec: or_unknown(self.audio_codec),
            video_codec: or_unknown(self.video_codec),
            video_resolution: or_unknown(self.video_resolution),
            size: first.and_then(|p| p.size).unwrap_or(0),
            part_count,
        }
    }
}
