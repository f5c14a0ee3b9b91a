//! Duplicate report for one library section

use serde::Serialize;
use tracing::info;

use super::finder::find_duplicates;
use super::ranking::{RankedGroup, rank_duplicates};
use super::scorer::Scorer;
use super::types::LibrarySection;
use crate::config::ScoreConfig;
use crate::error::Result;
use crate::plex::MediaServer;

#[derive(Debug, Clone, Serialize)]
pub struct LibraryReport {
    pub section: LibrarySection,
    pub item_count: usize,
    pub groups: Vec<RankedGroup>,
}

impl LibraryReport {
    /// Number of versions ranked below the best of their group
    pub fn removable_count(&self) -> usize {
        self.groups.iter().map(|g| g.removable().len()).sum()
    }

    /// Bytes freed by deleting every removable version
    pub fn reclaimable_bytes(&self) -> u64 {
        self.groups
            .iter()
            .flat_map(|g| g.removable())
            .map(|entry| entry.media.size)
            .sum()
    }
}

/// Fetch section `index`, then find, score and rank its duplicates
pub async fn build_report(
    server: &dyn MediaServer,
    scoring: &ScoreConfig,
    index: usize,
) -> Result<LibraryReport> {
    let section = server.section(index).await?;
    let items = server.items(&section).await?;

    let groups = find_duplicates(&items);
    let ranked = rank_duplicates(&groups, &Scorer::new(scoring))?;

    info!(
        library = %section.title,
        items = items.len(),
        duplicate_groups = ranked.len(),
        "Built duplicate report"
    );

    Ok(LibraryReport {
        section,
        item_count: items.len(),
        groups: ranked,
    })
}
