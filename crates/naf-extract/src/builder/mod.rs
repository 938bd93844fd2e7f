//! Tree builders
//!
//! - [`primary`]: authors the sector > division > group > class shape
//! - [`merge`]: refreshes or extends classes from an independently ordered source
//! - [`liberal`]: builds the separate liberal sector > class taxonomy

pub mod liberal;
pub mod merge;
pub mod primary;

use serde::Serialize;

pub use liberal::{build_liberal, LiberalStats};
pub use merge::{merge_classes, merge_row, MergeOutcome, MergeStats};
pub use primary::{build_primary, PrimaryBuilder, PrimaryStats};

/// Statistics of a complete build
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    pub primary: PrimaryStats,
    pub merge: MergeStats,
    pub liberal: LiberalStats,
}
