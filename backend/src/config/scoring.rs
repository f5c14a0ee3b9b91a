//! Score tables and Plex credentials loaded from the JSON settings document
//!
//! The document is read on every request:
//!
//! ```json
//! {
//!   "PLEX_SERVER": "http://localhost:32400",
//!   "PLEX_TOKEN": "xxxx",
//!   "FILENAME_SCORES": { "remux": 10 },
//!   "AUDIO_CODEC_SCORES": { "truehd": 5 },
//!   "VIDEO_CODEC_SCORES": { "hevc": 3 },
//!   "VIDEO_RESOLUTION_SCORES": { "1080": 3 },
//!   "SCORE_FILESIZE": false
//! }
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use regex::{Regex, RegexBuilder};
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::error::{DedupeError, Result};
use crate::plex::PlexSession;

/// A compiled FILENAME_SCORES entry. Matching is case-insensitive and unanchored.
#[derive(Debug, Clone)]
pub struct FilenamePattern {
    pub pattern: String,
    pub weight: i64,
    regex: Regex,
}

impl FilenamePattern {
    pub fn new(pattern: &str, weight: i64) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        Ok(Self {
            pattern: pattern.to_string(),
            weight,
            regex,
        })
    }

    pub fn is_match(&self, filename: &str) -> bool {
        self.regex.is_match(filename)
    }
}

/// Weights used by the [Scorer](crate::dedupe::Scorer)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoreConfig {
    /// Evaluated in document order
    #[serde(
        rename = "FILENAME_SCORES",
        default,
        deserialize_with = "ordered_patterns"
    )]
    pub filename_scores: Vec<FilenamePattern>,

    #[serde(rename = "AUDIO_CODEC_SCORES", default)]
    pub audio_codec_scores: HashMap<String, i64>,

    #[serde(rename = "VIDEO_CODEC_SCORES", default)]
    pub video_codec_scores: HashMap<String, i64>,

    #[serde(rename = "VIDEO_RESOLUTION_SCORES", default)]
    pub video_resolution_scores: HashMap<String, i64>,

    #[serde(rename = "SCORE_FILESIZE", default)]
    pub score_filesize: bool,
}

/// Compile FILENAME_SCORES while keeping the object's key order
fn ordered_patterns<'de, D>(deserializer: D) -> Result<Vec<FilenamePattern>, D::Error>
where
    D: Deserializer<'de>,
{
    struct PatternsVisitor;

    impl<'de> Visitor<'de> for PatternsVisitor {
        type Value = Vec<FilenamePattern>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of regex pattern to integer weight")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut patterns: Vec<FilenamePattern> = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((pattern, weight)) = map.next_entry::<String, i64>()? {
                // A repeated key keeps its first position and takes the last weight
                if let Some(existing) = patterns.iter_mut().find(|p| p.pattern == pattern) {
                    existing.weight = weight;
                    continue;
                }
                let compiled = FilenamePattern::new(&pattern, weight).map_err(|e| {
                    de::Error::custom(format!("invalid FILENAME_SCORES pattern {pattern:?}: {e}"))
                })?;
                patterns.push(compiled);
            }
            Ok(patterns)
        }
    }

    deserializer.deserialize_map(PatternsVisitor)
}

/// The whole settings document
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardSettings {
    #[serde(rename = "PLEX_SERVER", default)]
    pub plex_server: Option<String>,

    #[serde(rename = "PLEX_TOKEN", default)]
    pub plex_token: Option<String>,

    #[serde(flatten)]
    pub scoring: ScoreConfig,

    /// Where the document was read from, for error messages
    #[serde(skip)]
    pub source: PathBuf,
}

impl DashboardSettings {
    pub async fn load(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| DedupeError::config(path, e))?;
        Self::parse(path, &raw)
    }

    pub fn parse(path: &Path, raw: &str) -> Result<Self> {
        let mut settings: Self =
            serde_json::from_str(raw).map_err(|e| DedupeError::config(path, e))?;
        settings.source = path.to_path_buf();

        debug!(
            path = %path.display(),
            filename_patterns = settings.scoring.filename_scores.len(),
            score_filesize = settings.scoring.score_filesize,
            "Loaded dashboard settings"
        );
        Ok(settings)
    }

    /// Resolve the Plex connection for this request, environment values first
    pub fn session(&self, config: &Config) -> Result<PlexSession> {
        let server = config
            .plex_server
            .as_deref()
            .or(self.plex_server.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| DedupeError::config(&self.source, "PLEX_SERVER is required"))?;

        let token = config
            .plex_token
            .as_deref()
            .or(self.plex_token.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| DedupeError::config(&self.source, "PLEX_TOKEN is required"))?;

        let base_url = Url::parse(server).map_err(|e| {
            DedupeError::config(&self.source, format!("invalid PLEX_SERVER {server:?}: {e}"))
        })?;

        Ok(PlexSession::new(base_url, token.to_string(), config.plex_timeout))
    }
}
