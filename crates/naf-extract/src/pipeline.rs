//! Run orchestration
//!
//! Sources are fetched first (async), then the build and the serialization run
//! synchronously in a fixed order: primary, merge, liberal, fragments,
//! manifest.

use naf_common::{NodeKind, Nomenclature, Result};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::builder::BuildReport;
use crate::config::ExtractConfig;
use crate::manifest::{Manifest, MANIFEST_FILE};
use crate::registry::RootRegistry;
use crate::render::FragmentWriter;
use crate::sources::{
    read_liberal_table, read_naf_workbook, read_nafa_table, CodeRow, Fetcher, LiberalRow,
};

/// Decoded rows of every source
#[derive(Debug, Clone, Default)]
pub struct SourceRows {
    pub naf: Vec<CodeRow>,
    pub nafa: Vec<CodeRow>,
    pub liberal: Vec<LiberalRow>,
}

/// Result of a complete run
#[derive(Debug)]
pub struct RunSummary {
    pub report: BuildReport,
    pub fragments: Vec<PathBuf>,
    pub manifest: PathBuf,
}

/// Fetch, build and write everything described by `config`
#[instrument(skip_all, fields(output = %config.output_dir.display()))]
pub async fn run(config: &ExtractConfig) -> anyhow::Result<RunSummary> {
    config.validate()?;

    let rows = fetch_sources(config).await?;
    let (registry, report) = build_registry(rows)?;
    let summary = render(&registry, report, &config.output_dir)?;

    info!(
        sectors = report.primary.sectors,
        divisions = report.primary.divisions,
        groups = report.primary.groups,
        classes = report.primary.classes,
        updated = report.merge.updated,
        appended = report.merge.appended,
        no_group = report.merge.no_group,
        liberal_sectors = report.liberal.sectors,
        liberal_classes = report.liberal.classes,
        fragments = summary.fragments.len(),
        "extraction complete"
    );

    Ok(summary)
}

/// Load and decode all sources, one after the other
pub async fn fetch_sources(config: &ExtractConfig) -> anyhow::Result<SourceRows> {
    let fetcher = Fetcher::new(config.download_timeout(), config.show_progress)?;

    let naf_bytes = fetcher.load(&config.naf_location()?).await?;
    let naf = read_naf_workbook(naf_bytes)?;
    info!(rows = naf.len(), "read NAF workbook");

    let nafa_bytes = fetcher.load(&config.nafa_location()?).await?;
    let nafa = read_nafa_table(&nafa_bytes)?;
    info!(rows = nafa.len(), "read NAFA table");

    let liberal = match config.liberal_location()? {
        Some(location) => {
            let bytes = fetcher.load(&location).await?;
            let rows = read_liberal_table(&bytes)?;
            info!(rows = rows.len(), "read liberal-profession table");
            rows
        },
        None => {
            info!("no liberal-profession source configured");
            Vec::new()
        },
    };

    Ok(SourceRows { naf, nafa, liberal })
}

/// Build both trees from decoded rows
pub fn build_registry(rows: SourceRows) -> Result<(RootRegistry, BuildReport)> {
    let mut registry = RootRegistry::new();

    let primary = registry.ingest_primary(rows.naf)?;
    let merge = registry.merge(rows.nafa, Nomenclature::Nafa);
    let liberal = registry.ingest_liberal(rows.liberal);

    debug_assert!(registry.is_well_formed());

    Ok((
        registry,
        BuildReport {
            primary,
            merge,
            liberal,
        },
    ))
}

/// Replace the previous output under `output_dir` with fragments and a manifest
pub fn render(registry: &RootRegistry, report: BuildReport, output_dir: &Path) -> Result<RunSummary> {
    let writer = FragmentWriter::new(output_dir);
    writer.prepare(&[MANIFEST_FILE])?;

    let mut fragments = writer.write_tree(registry.primary(), NodeKind::Sector)?;
    fragments.extend(writer.write_tree(registry.liberal(), NodeKind::LiberalSector)?);

    let manifest = Manifest::collect(writer.root(), &fragments, registry, report)?.write(writer.root())?;

    Ok(RunSummary {
        report,
        fragments,
        manifest,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn rows() -> SourceRows {
        SourceRows {
            naf: vec![
                CodeRow::new("SECTION A", "AGRICULTURE"),
                CodeRow::new("01", "CULTURE"),
                CodeRow::new("01.1", "CULTURES NON PERMANENTES"),
                CodeRow::new("01.11Z", "CÉRÉALES"),
            ],
            nafa: vec![CodeRow::new("01.11Z", "Céréales bio")],
            liberal: Vec::new(),
        }
    }

    #[test]
    fn test_build_registry_reports_each_step() {
        let (registry, report) = build_registry(rows()).unwrap();

        assert_eq!(report.primary.classes, 1);
        assert_eq!(report.merge.updated, 1);
        assert_eq!(report.liberal.sectors, 0);
        assert_eq!(registry.primary().len(), 1);
    }

    #[test]
    fn test_render_writes_fragments_and_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let (registry, report) = build_registry(rows()).unwrap();

        let summary = render(&registry, report, dir.path()).unwrap();

        // secteurs, divisions/A, groupes/01, classes/011, secteurs-liberaux
        assert_eq!(summary.fragments.len(), 5);
        assert_eq!(summary.manifest, dir.path().join(MANIFEST_FILE));
        assert!(dir.path().join("secteurs-liberaux.htm").exists());
    }
}
