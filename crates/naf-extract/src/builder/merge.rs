//! Merge of a secondary class source into the primary tree
//!
//! Each row names a class by code. The owning group is reached through the
//! sector/division index and exact lookups down the tree; inside the group a
//! class is matched on its 5-character prefix so variant suffixes collide.

use naf_common::Nomenclature;
use serde::Serialize;
use tracing::{info, instrument, trace, warn};

use crate::code::{normalize_code, same_class, ClassCode, CLASS_PREFIX_LEN};
use crate::index::SectorDivisionIndex;
use crate::sources::CodeRow;
use crate::tree::{find_root_mut, ClassificationNode};

/// What happened to one merge row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// An existing class got the row's title and code
    Updated,
    /// A new class was appended to the group
    Appended,
    /// No sector, division or group owns the code
    NoGroup,
    /// The row does not carry a class code
    Skipped,
}

/// Counters for one merge pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeStats {
    pub updated: usize,
    pub appended: usize,
    pub no_group: usize,
    pub skipped: usize,
}

impl MergeStats {
    fn record(&mut self, outcome: MergeOutcome) {
        match outcome {
            MergeOutcome::Updated => self.updated += 1,
            MergeOutcome::Appended => self.appended += 1,
            MergeOutcome::NoGroup => self.no_group += 1,
            MergeOutcome::Skipped => self.skipped += 1,
        }
    }
}

/// Group node owning `code`: sector via the index, then division, then group
fn locate_group<'t>(
    roots: &'t mut [ClassificationNode],
    index: &SectorDivisionIndex,
    code: &ClassCode,
) -> Option<&'t mut ClassificationNode> {
    let sector = index.sector_of(code.division())?;

    find_root_mut(roots, sector)?
        .find_child_mut(code.division())?
        .find_child_mut(code.group()?)
}

/// Merge one row into the tree
///
/// A class whose first 5 characters match the row's gets the row's title and
/// code (last writer wins, provenance unchanged). Otherwise the row becomes a
/// new class tagged with `source`.
pub fn merge_row(
    roots: &mut [ClassificationNode],
    index: &SectorDivisionIndex,
    row: &CodeRow,
    source: Nomenclature,
) -> MergeOutcome {
    let Some(code) = normalize_code(&row.code) else {
        trace!(code = %row.code, "not a NAF code");
        return MergeOutcome::Skipped;
    };
    if code.len() < CLASS_PREFIX_LEN {
        trace!(%code, "not a class code");
        return MergeOutcome::Skipped;
    }

    let Some(group) = locate_group(roots, index, &code) else {
        warn!(%code, name = %row.name, "no group found for this code");
        return MergeOutcome::NoGroup;
    };

    let title = row.name.trim();
    let existing = group
        .children()
        .iter()
        .position(|class| same_class(&class.code, code.as_str()));

    match existing {
        Some(position) => {
            let class = &mut group.children_mut()[position];
            trace!(from = %class.code, to = %code, "class refreshed");
            class.title = title.to_string();
            class.code = code.into_string();
            MergeOutcome::Updated
        },
        None => {
            group.add_child(code.into_string(), title, source);
            MergeOutcome::Appended
        },
    }
}

/// Merge every row of a secondary source, in order
#[instrument(skip_all, fields(source = %source))]
pub fn merge_classes<I>(
    roots: &mut [ClassificationNode],
    index: &SectorDivisionIndex,
    rows: I,
    source: Nomenclature,
) -> MergeStats
where
    I: IntoIterator<Item = CodeRow>,
{
    let mut stats = MergeStats::default();
    for row in rows {
        stats.record(merge_row(roots, index, &row, source));
    }

    info!(
        updated = stats.updated,
        appended = stats.appended,
        no_group = stats.no_group,
        skipped = stats.skipped,
        "classes merged"
    );
    stats
}
