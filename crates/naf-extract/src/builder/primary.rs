//! Primary hierarchy builder
//!
//! Streams the NAF spreadsheet rows in file order. Section headers open a new
//! sector; every other row is normalized and placed by code length under the
//! most recent sector, division or group.

use naf_common::{NafError, Nomenclature, Result};
use serde::Serialize;
use tracing::{debug, info, instrument, trace};

use crate::code::normalize_code;
use crate::index::SectorDivisionIndex;
use crate::sources::CodeRow;
use crate::tree::ClassificationNode;

/// Literal that starts a sector header code, e.g. `SECTION A`
pub const SECTION_MARKER: &str = "SECTION";

/// Counters for one primary ingestion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PrimaryStats {
    pub sectors: usize,
    pub divisions: usize,
    pub groups: usize,
    pub classes: usize,
    /// Blank, malformed or non-code rows
    pub skipped: usize,
    /// Valid codes of a length that is not a tree level (4 or 6)
    pub ignored: usize,
}

/// Positions of the active sector, division and group
///
/// Each index points into the children of the level above; opening a level
/// closes everything below it.
#[derive(Debug, Clone, Copy, Default)]
struct Cursor {
    sector: Option<usize>,
    division: Option<usize>,
    group: Option<usize>,
}

/// Sector code carried by a section header, if `raw` is one
///
/// The marker must be followed by a delimiter; delimiters and whitespace
/// before the code are dropped, so `SECTION A` and `SECTION / A` both give `A`.
pub fn sector_code(raw: &str) -> Option<&str> {
    let rest = raw.trim_start().strip_prefix(SECTION_MARKER)?;
    if rest.chars().next()?.is_alphanumeric() {
        return None;
    }

    let code = rest
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .trim_end();
    (!code.is_empty()).then_some(code)
}

/// Grows the primary tree and the sector/division index row by row
pub struct PrimaryBuilder<'a> {
    roots: &'a mut Vec<ClassificationNode>,
    index: &'a mut SectorDivisionIndex,
    cursor: Cursor,
    stats: PrimaryStats,
}

impl<'a> PrimaryBuilder<'a> {
    pub fn new(roots: &'a mut Vec<ClassificationNode>, index: &'a mut SectorDivisionIndex) -> Self {
        Self {
            roots,
            index,
            cursor: Cursor::default(),
            stats: PrimaryStats::default(),
        }
    }

    /// Place one row; `row` is its 1-based position in the source
    ///
    /// Fails when a division, group or class arrives before the level that
    /// should own it.
    pub fn push(&mut self, row: usize, input: &CodeRow) -> Result<()> {
        if input.code.trim().is_empty() {
            self.stats.skipped += 1;
            return Ok(());
        }

        if let Some(code) = sector_code(&input.code) {
            self.open_sector(code, &input.name);
            return Ok(());
        }

        let Some(code) = normalize_code(&input.code) else {
            trace!(row, code = %input.code, "not a NAF code");
            self.stats.skipped += 1;
            return Ok(());
        };

        match code.len() {
            2 => self.open_division(row, code.into_string(), &input.name),
            3 => self.open_group(row, code.into_string(), &input.name),
            5 => self.add_class(row, code.into_string(), &input.name),
            other => {
                debug!(row, %code, len = other, "code length is not a tree level");
                self.stats.ignored += 1;
                Ok(())
            },
        }
    }

    pub fn finish(self) -> PrimaryStats {
        self.stats
    }

    fn open_sector(&mut self, code: &str, name: &str) {
        self.roots.push(ClassificationNode::sector(code, name.trim()));
        self.index.register_sector(code);
        self.cursor = Cursor {
            sector: Some(self.roots.len() - 1),
            division: None,
            group: None,
        };
        self.stats.sectors += 1;
    }

    fn open_division(&mut self, row: usize, code: String, name: &str) -> Result<()> {
        let sector_pos = self
            .cursor
            .sector
            .ok_or_else(|| orphan(row, &code, "division", "sector"))?;
        let sector = &mut self.roots[sector_pos];

        sector.add_child(code.as_str(), name.trim(), Nomenclature::All);
        self.cursor.division = Some(sector.children().len() - 1);
        self.cursor.group = None;
        self.index.record_division(code);
        self.stats.divisions += 1;
        Ok(())
    }

    fn open_group(&mut self, row: usize, code: String, name: &str) -> Result<()> {
        let (Some(sector_pos), Some(division_pos)) = (self.cursor.sector, self.cursor.division)
        else {
            return Err(orphan(row, &code, "group", "division"));
        };
        let division = &mut self.roots[sector_pos].children_mut()[division_pos];

        division.add_child(code, name.trim(), Nomenclature::All);
        self.cursor.group = Some(division.children().len() - 1);
        self.stats.groups += 1;
        Ok(())
    }

    fn add_class(&mut self, row: usize, code: String, name: &str) -> Result<()> {
        let (Some(sector_pos), Some(division_pos), Some(group_pos)) =
            (self.cursor.sector, self.cursor.division, self.cursor.group)
        else {
            return Err(orphan(row, &code, "class", "group"));
        };
        let group =
            &mut self.roots[sector_pos].children_mut()[division_pos].children_mut()[group_pos];

        group.add_child(code, name.trim(), Nomenclature::Naf);
        self.stats.classes += 1;
        Ok(())
    }
}

fn orphan(row: usize, code: &str, level: &'static str, missing: &'static str) -> NafError {
    NafError::Ordering {
        row,
        code: code.to_string(),
        level,
        missing,
    }
}

/// Build the primary tree from spreadsheet rows in file order
#[instrument(skip_all)]
pub fn build_primary<I>(
    roots: &mut Vec<ClassificationNode>,
    index: &mut SectorDivisionIndex,
    rows: I,
) -> Result<PrimaryStats>
where
    I: IntoIterator<Item = CodeRow>,
{
    let mut builder = PrimaryBuilder::new(roots, index);
    for (position, row) in rows.into_iter().enumerate() {
        builder.push(position + 1, &row)?;
    }

    let stats = builder.finish();
    info!(
        sectors = stats.sectors,
        divisions = stats.divisions,
        groups = stats.groups,
        classes = stats.classes,
        skipped = stats.skipped,
        ignored = stats.ignored,
        "primary hierarchy built"
    );
    Ok(stats)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use naf_common::NodeKind;

    fn rows(codes: &[(&str, &str)]) -> Vec<CodeRow> {
        codes.iter().map(|(code, name)| CodeRow::new(*code, *name)).collect()
    }

    fn build(codes: &[(&str, &str)]) -> Result<(Vec<ClassificationNode>, SectorDivisionIndex, PrimaryStats)> {
        let mut roots = Vec::new();
        let mut index = SectorDivisionIndex::new();
        let stats = build_primary(&mut roots, &mut index, rows(codes))?;
        Ok((roots, index, stats))
    }

    #[test]
    fn test_sector_code_extraction() {
        assert_eq!(sector_code("SECTION A"), Some("A"));
        assert_eq!(sector_code("SECTION / A"), Some("A"));
        assert_eq!(sector_code("SECTION-U "), Some("U"));
        assert_eq!(sector_code("SECTIONS"), None);
        assert_eq!(sector_code("SECTION "), None);
        assert_eq!(sector_code("01.11Z"), None);
    }

    #[test]
    fn test_one_of_each_level() {
        let (roots, index, stats) = build(&[
            ("SECTION / A", "AGRICULTURE, SYLVICULTURE ET PÊCHE"),
            ("01", "Culture et production animale"),
            ("01.1", "Cultures non permanentes"),
            ("01.11Z", "Culture de céréales"),
        ])
        .unwrap();

        assert_eq!(roots.len(), 1);
        let sector = &roots[0];
        assert_eq!(sector.code, "A");
        assert_eq!(sector.kind, NodeKind::Sector);

        let division = &sector.children()[0];
        let group = &division.children()[0];
        let class = &group.children()[0];
        assert_eq!(division.code, "01");
        assert_eq!(group.code, "011");
        assert_eq!(class.code, "0111Z");
        assert_eq!(class.source, Nomenclature::Naf);
        assert_eq!(group.source, Nomenclature::All);

        assert_eq!(index.sector_of("01"), Some("A"));
        assert_eq!(
            stats,
            PrimaryStats {
                sectors: 1,
                divisions: 1,
                groups: 1,
                classes: 1,
                skipped: 0,
                ignored: 0,
            }
        );
    }

    #[test]
    fn test_noise_rows_are_skipped() {
        let (roots, _, stats) = build(&[
            ("Code", "Intitulé"),
            ("", ""),
            ("SECTION A", "Agriculture"),
            ("01", "Culture"),
            ("Source : Insee", ""),
            ("0111", "four digits"),
            ("01.1", "Cultures non permanentes"),
            ("01.11ZA", "too long raw"),
        ])
        .unwrap();

        assert_eq!(roots[0].children()[0].children().len(), 1);
        assert_eq!(stats.skipped, 4);
        assert_eq!(stats.ignored, 1);
    }

    /// Collects formatted log output for assertions
    #[derive(Clone, Default)]
    struct LogBuffer(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, bytes: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(bytes);
            Ok(bytes.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_summary_logs_ignored_rows() {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            build(&[("SECTION A", "Agriculture"), ("0111", "four digits"), ("", "")]).unwrap();
        });

        let logs = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        let summary = logs
            .lines()
            .find(|line| line.contains("primary hierarchy built"))
            .unwrap();
        assert!(summary.contains("skipped=1"), "{}", summary);
        assert!(summary.contains("ignored=1"), "{}", summary);
    }

    #[test]
    fn test_new_sector_closes_previous_levels() {
        let (roots, index, _) = build(&[
            ("SECTION A", "Agriculture"),
            ("01", "Culture"),
            ("01.1", "Cultures non permanentes"),
            ("SECTION B", "Industries extractives"),
            ("05", "Extraction de houille"),
            ("05.1", "Extraction de houille"),
            ("05.10Z", "Extraction de houille"),
        ])
        .unwrap();

        assert_eq!(roots.len(), 2);
        assert!(roots[0].children()[0].children()[0].is_leaf());
        assert_eq!(roots[1].children()[0].children()[0].children()[0].code, "0510Z");
        assert_eq!(index.sector_of("05"), Some("B"));
        assert!(roots.iter().all(ClassificationNode::is_well_formed));
    }

    #[test]
    fn test_division_before_sector_fails_fast() {
        let err = build(&[("01", "Culture")]).unwrap_err();

        assert!(matches!(
            err,
            NafError::Ordering {
                row: 1,
                level: "division",
                missing: "sector",
                ..
            }
        ));
    }

    #[test]
    fn test_group_after_new_sector_without_division_fails() {
        let err = build(&[
            ("SECTION A", "Agriculture"),
            ("01", "Culture"),
            ("SECTION B", "Industries extractives"),
            ("05.1", "Extraction de houille"),
        ])
        .unwrap_err();

        assert!(matches!(
            err,
            NafError::Ordering { row: 4, level: "group", .. }
        ));
    }

    #[test]
    fn test_class_before_group_fails() {
        let err = build(&[
            ("SECTION A", "Agriculture"),
            ("01", "Culture"),
            ("01.11Z", "Culture de céréales"),
        ])
        .unwrap_err();

        assert!(err.to_string().contains("0111Z"));
    }
}
