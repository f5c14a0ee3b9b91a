//! Orders each duplicate group from best to worst score

use serde::Serialize;

use super::scorer::{ScoreBreakdown, Scorer};
use super::types::{DuplicateGroup, IdentityKey, Media};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredMedia {
    pub media: Media,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

/// A duplicate group sorted by descending score. The first entry is the one to keep.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedGroup {
    pub key: IdentityKey,
    pub label: String,
    pub entries: Vec<ScoredMedia>,
}

impl RankedGroup {
    pub fn keep(&self) -> Option<&ScoredMedia> {
        self.entries.first()
    }

    /// Every entry except the best one
    pub fn removable(&self) -> &[ScoredMedia] {
        self.entries.get(1..).unwrap_or_default()
    }
}

/// Score and sort every group. Groups keep their discovery order and ties keep
/// their original relative order.
pub fn rank_duplicates(groups: &[DuplicateGroup], scorer: &Scorer<'_>) -> Result<Vec<RankedGroup>> {
    groups.iter().map(|group| rank_group(group, scorer)).collect()
}

pub fn rank_group(group: &DuplicateGroup, scorer: &Scorer<'_>) -> Result<RankedGroup> {
    let mut entries = group
        .media
        .iter()
        .map(|media| {
            let breakdown = scorer.breakdown(media)?;
            Ok(ScoredMedia {
                media: media.clone(),
                score: breakdown.total(),
                breakdown,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    // sort_by is stable
    entries.sort_by(|a, b| b.score.total_cmp(&a.score));

    Ok(RankedGroup {
        key: group.key.clone(),
        label: group.key.to_string(),
        entries,
    })
}
