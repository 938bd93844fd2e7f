//! Division to sector side index
//!
//! NAF division codes do not encode their sector (`01` belongs to `A`, `05` to
//! `B`), so the merge step cannot find a division's sector from the code
//! alone. The primary builder records every division it creates here.

use std::collections::HashMap;
use tracing::warn;

/// A sector and the divisions registered under it, in discovery order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectorEntry {
    pub sector: String,
    pub divisions: Vec<String>,
}

/// Append-only mapping from a 2-character division code to its sector code
#[derive(Debug, Clone, Default)]
pub struct SectorDivisionIndex {
    entries: Vec<SectorEntry>,
    by_division: HashMap<String, usize>,
}

impl SectorDivisionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an entry for a newly created sector
    pub fn register_sector(&mut self, sector: impl Into<String>) {
        self.entries.push(SectorEntry {
            sector: sector.into(),
            divisions: Vec::new(),
        });
    }

    /// Record that `division` belongs to the most recently registered sector
    ///
    /// Returns `false` when no sector has been registered yet. A division seen
    /// twice is re-pointed to the latest sector.
    pub fn record_division(&mut self, division: impl Into<String>) -> bool {
        let Some(position) = self.entries.len().checked_sub(1) else {
            return false;
        };

        let division = division.into();
        if let Some(previous) = self.by_division.insert(division.clone(), position) {
            warn!(
                %division,
                previous = %self.entries[previous].sector,
                current = %self.entries[position].sector,
                "division registered twice"
            );
        }
        self.entries[position].divisions.push(division);
        true
    }

    /// Sector code owning `division`
    pub fn sector_of(&self, division: &str) -> Option<&str> {
        self.by_division
            .get(division)
            .map(|&position| self.entries[position].sector.as_str())
    }

    pub fn entries(&self) -> &[SectorEntry] {
        &self.entries
    }

    /// Number of divisions recorded
    pub fn len(&self) -> usize {
        self.by_division.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_division.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_divisions_map_to_latest_sector() {
        let mut index = SectorDivisionIndex::new();
        index.register_sector("A");
        assert!(index.record_division("01"));
        assert!(index.record_division("02"));
        index.register_sector("B");
        assert!(index.record_division("05"));

        assert_eq!(index.sector_of("01"), Some("A"));
        assert_eq!(index.sector_of("02"), Some("A"));
        assert_eq!(index.sector_of("05"), Some("B"));
        assert_eq!(index.sector_of("99"), None);
        assert_eq!(index.len(), 3);
        assert_eq!(index.entries()[0].divisions, vec!["01", "02"]);
    }

    #[test]
    fn test_division_without_sector_is_refused() {
        let mut index = SectorDivisionIndex::new();

        assert!(!index.record_division("01"));
        assert!(index.is_empty());
    }

    #[test]
    fn test_empty_sector_still_has_an_entry() {
        let mut index = SectorDivisionIndex::new();
        index.register_sector("U");

        assert_eq!(index.entries().len(), 1);
        assert!(index.entries()[0].divisions.is_empty());
    }
}
