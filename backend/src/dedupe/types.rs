//! Read-only snapshots of library data, resolved once when fetched from Plex

use std::fmt;

use serde::Serialize;

/// Placeholder for codec/resolution attributes the server did not report
pub const UNKNOWN: &str = "Unknown";

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LibrarySection {
    /// Position in the server's section list, used in dashboard URLs
    pub index: usize,
    /// Server-side section id
    pub key: String,
    pub title: String,
    /// Section type reported by the server (movie, show, artist, ...)
    pub kind: String,
}

/// Logical identity of a work. A missing year is its own bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct IdentityKey {
    pub title: String,
    pub year: Option<i32>,
}

impl IdentityKey {
    pub fn new(title: impl Into<String>, year: Option<i32>) -> Self {
        Self {
            title: title.into(),
            year,
        }
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.year {
            Some(year) => write!(f, "{} ({})", self.title, year),
            None => write!(f, "{}", self.title),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub rating_key: String,
    pub title: String,
    pub year: Option<i32>,
    pub media: Vec<Media>,
}

impl Item {
    pub fn identity(&self) -> IdentityKey {
        IdentityKey::new(self.title.clone(), self.year)
    }
}

/// One encoded version of an [Item]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Media {
    pub id: String,
    /// Rating key of the owning item
    pub item_key: String,
    pub title: String,
    pub year: Option<i32>,
    /// Path of the first part
    pub file: Option<String>,
    pub audio_codec: String,
    pub video_codec: String,
    pub video_resolution: String,
    /// Size of the first part in bytes
    pub size: u64,
    pub part_count: usize,
}

impl Media {
    pub fn identity(&self) -> IdentityKey {
        IdentityKey::new(self.title.clone(), self.year)
    }

    /// Base filename of the file path. Handles both Unix and Windows separators.
    /// A path ending in a separator has an empty base name.
    pub fn filename(&self) -> Option<&str> {
        self.file.as_deref().map(|path| {
            path.rsplit(|c: char| c == '/' || c == '\\')
                .next()
                .unwrap_or_default()
        })
    }

    pub fn size_mb(&self) -> f64 {
        self.size as f64 / BYTES_PER_MB
    }
}

/// Media sharing one identity key, in discovery order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateGroup {
    pub key: IdentityKey,
    pub media: Vec<Media>,
}
