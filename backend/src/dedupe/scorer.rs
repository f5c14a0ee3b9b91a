//! Quality scoring for duplicate media versions
//!
//! A score is the sum of:
//! - the weight of every FILENAME_SCORES pattern found in the base filename
//! - the audio codec, video codec and resolution weights (0 when not listed)
//! - the size in megabytes, when SCORE_FILESIZE is set
//!
//! Higher scores are preferred to keep.

use std::collections::HashMap;

use serde::Serialize;

use super::types::Media;
use crate::config::ScoreConfig;
use crate::error::{DedupeError, Result};

/// Per-step contributions to a score
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub filename: f64,
    /// Patterns that matched, in configured order
    pub matched_patterns: Vec<String>,
    pub audio_codec: f64,
    pub video_codec: f64,
    pub video_resolution: f64,
    pub file_size: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.filename + self.audio_codec + self.video_codec + self.video_resolution + self.file_size
    }
}

/// Scores media against one request's [ScoreConfig]
#[derive(Debug, Clone, Copy)]
pub struct Scorer<'a> {
    config: &'a ScoreConfig,
}

impl<'a> Scorer<'a> {
    pub fn new(config: &'a ScoreConfig) -> Self {
        Self { config }
    }

    pub fn score(&self, media: &Media) -> Result<f64> {
        Ok(self.breakdown(media)?.total())
    }

    /// Fails only when the media has no file path to match patterns against
    pub fn breakdown(&self, media: &Media) -> Result<ScoreBreakdown> {
        let filename = media
            .filename()
            .ok_or_else(|| DedupeError::MediaAttributeMissing {
                media_id: media.id.clone(),
                attribute: "file path",
            })?;

        let mut breakdown = ScoreBreakdown::default();

        for pattern in &self.config.filename_scores {
            if pattern.is_match(filename) {
                breakdown.filename += pattern.weight as f64;
                breakdown.matched_patterns.push(pattern.pattern.clone());
            }
        }

        let weight = |table: &HashMap<String, i64>, key: &str| {
            table.get(key).copied().unwrap_or(0) as f64
        };
        breakdown.audio_codec = weight(&self.config.audio_codec_scores, &media.audio_codec);
        breakdown.video_codec = weight(&self.config.video_codec_scores, &media.video_codec);
        breakdown.video_resolution =
            weight(&self.config.video_resolution_scores, &media.video_resolution);

        if self.config.score_filesize {
            breakdown.file_size = media.size_mb();
        }

        Ok(breakdown)
    }
}
