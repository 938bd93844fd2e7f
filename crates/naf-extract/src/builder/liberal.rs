//! Liberal-profession taxonomy builder
//!
//! Rows come grouped in runs sharing a sector name. Sectors are found by
//! title (or created) when the name changes, and every row becomes a class of
//! the current sector. Nothing is merged.

use naf_common::Nomenclature;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::sources::LiberalRow;
use crate::tree::{ClassExtras, ClassificationNode};

/// Counters for one liberal ingestion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LiberalStats {
    pub sectors: usize,
    pub classes: usize,
    pub skipped: usize,
}

/// Code given to the n-th liberal sector created (0-based)
fn sector_code(ordinal: usize) -> String {
    format!("L{:02}", ordinal + 1)
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Build the liberal taxonomy into `roots`
#[instrument(skip_all)]
pub fn build_liberal<I>(roots: &mut Vec<ClassificationNode>, rows: I) -> LiberalStats
where
    I: IntoIterator<Item = LiberalRow>,
{
    let mut stats = LiberalStats::default();
    let mut last_sector: Option<String> = None;
    let mut current: Option<usize> = None;

    for row in rows {
        let sector_name = row.sector.trim();
        let code = row.code.trim();
        if sector_name.is_empty() || code.is_empty() {
            debug!(label = %row.label, "liberal row without sector or code");
            stats.skipped += 1;
            continue;
        }

        if last_sector.as_deref() != Some(sector_name) {
            let position = match roots.iter().position(|sector| sector.title == sector_name) {
                Some(position) => position,
                None => {
                    roots.push(ClassificationNode::liberal_sector(
                        sector_code(roots.len()),
                        sector_name,
                    ));
                    stats.sectors += 1;
                    roots.len() - 1
                },
            };
            current = Some(position);
            last_sector = Some(sector_name.to_string());
        }

        let Some(position) = current else {
            continue;
        };
        if let Some(class) = roots[position].add_child(code, row.label.trim(), Nomenclature::Liberal)
        {
            class.set_extras(ClassExtras {
                regulated: row.regulated,
                registration: non_empty(&row.registration),
                registration_alt: row.registration_alt.as_deref().and_then(non_empty),
            });
            stats.classes += 1;
        }
    }

    info!(
        sectors = stats.sectors,
        classes = stats.classes,
        skipped = stats.skipped,
        "liberal taxonomy built"
    );
    stats
}
