//! Duplicate detection pipeline: find groups, score versions, rank them
//!
//! Everything here works on read-only snapshots fetched for a single request.

pub mod finder;
pub mod ranking;
pub mod report;
pub mod scorer;
pub mod types;

pub use finder::find_duplicates;
pub use ranking::{RankedGroup, ScoredMedia, rank_duplicates, rank_group};
pub use report::{LibraryReport, build_report};
pub use scorer::{ScoreBreakdown, Scorer};
pub use types::{DuplicateGroup, IdentityKey, Item, LibrarySection, Media, UNKNOWN};
