//! Roots of both taxonomies for one run

use naf_common::{Nomenclature, Result};

use crate::builder::{self, LiberalStats, MergeStats, PrimaryStats};
use crate::index::SectorDivisionIndex;
use crate::sources::{CodeRow, LiberalRow};
use crate::tree::ClassificationNode;

/// Owns the primary hierarchy, the liberal taxonomy and the division index
///
/// The index is only written by [`RootRegistry::ingest_primary`]; the merge
/// step borrows it immutably.
#[derive(Debug, Default)]
pub struct RootRegistry {
    primary: Vec<ClassificationNode>,
    liberal: Vec<ClassificationNode>,
    index: SectorDivisionIndex,
}

impl RootRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sector roots of the primary hierarchy
    pub fn primary(&self) -> &[ClassificationNode] {
        &self.primary
    }

    /// Liberal-sector roots of the parallel taxonomy
    pub fn liberal(&self) -> &[ClassificationNode] {
        &self.liberal
    }

    pub fn index(&self) -> &SectorDivisionIndex {
        &self.index
    }

    /// Grow the primary hierarchy from spreadsheet rows
    pub fn ingest_primary<I>(&mut self, rows: I) -> Result<PrimaryStats>
    where
        I: IntoIterator<Item = CodeRow>,
    {
        builder::build_primary(&mut self.primary, &mut self.index, rows)
    }

    /// Merge secondary class rows into the primary hierarchy
    pub fn merge<I>(&mut self, rows: I, source: Nomenclature) -> MergeStats
    where
        I: IntoIterator<Item = CodeRow>,
    {
        builder::merge_classes(&mut self.primary, &self.index, rows, source)
    }

    /// Build the liberal-profession taxonomy
    pub fn ingest_liberal<I>(&mut self, rows: I) -> LiberalStats
    where
        I: IntoIterator<Item = LiberalRow>,
    {
        builder::build_liberal(&mut self.liberal, rows)
    }

    /// Whether both trees respect the kind nesting
    pub fn is_well_formed(&self) -> bool {
        self.primary
            .iter()
            .chain(&self.liberal)
            .all(ClassificationNode::is_well_formed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_uses_index_built_by_primary() {
        let mut registry = RootRegistry::new();
        registry
            .ingest_primary(vec![
                CodeRow::new("SECTION A", "Agriculture"),
                CodeRow::new("01", "Culture"),
                CodeRow::new("01.1", "Cultures non permanentes"),
            ])
            .unwrap();

        let stats = registry.merge(vec![CodeRow::new("0111ZA", "Céréales")], Nomenclature::Nafa);

        assert_eq!(stats.appended, 1);
        assert_eq!(registry.index().sector_of("01"), Some("A"));
        assert!(registry.is_well_formed());
        assert!(registry.liberal().is_empty());
    }
}
