//! Output manifest
//!
//! `manifest.json` lists every fragment of a run with its size and SHA-256
//! digest, plus node counts and build statistics. It carries no timestamp, so
//! two runs over identical sources produce identical manifests.

use naf_common::checksum::file_digest;
use naf_common::{NafError, NodeKind, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::builder::BuildReport;
use crate::registry::RootRegistry;
use crate::tree::count_by_kind;

/// File name of the manifest inside the output directory
pub const MANIFEST_FILE: &str = "manifest.json";

/// Size and digest of one fragment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FragmentEntry {
    pub bytes: u64,
    pub sha256: String,
}

/// Node counts per kind for both trees
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeCounts {
    pub primary: BTreeMap<NodeKind, usize>,
    pub liberal: BTreeMap<NodeKind, usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Manifest {
    pub generator: String,
    /// Keyed by path relative to the output directory, `/`-separated
    pub fragments: BTreeMap<String, FragmentEntry>,
    pub counts: TreeCounts,
    pub report: BuildReport,
}

impl Manifest {
    /// Digest the written fragments and summarize the trees
    pub fn collect(
        root: &Path,
        fragments: &[PathBuf],
        registry: &RootRegistry,
        report: BuildReport,
    ) -> Result<Self> {
        let mut entries = BTreeMap::new();
        for path in fragments {
            let digest = file_digest(path)?;
            entries.insert(
                relative_key(root, path),
                FragmentEntry {
                    bytes: digest.bytes,
                    sha256: digest.sha256,
                },
            );
        }

        Ok(Self {
            generator: concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION")).to_string(),
            fragments: entries,
            counts: TreeCounts {
                primary: count_by_kind(registry.primary()),
                liberal: count_by_kind(registry.liberal()),
            },
            report,
        })
    }

    /// Write `manifest.json` under `root`
    pub fn write(&self, root: &Path) -> Result<PathBuf> {
        let path = root.join(MANIFEST_FILE);
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        std::fs::write(&path, json).map_err(|e| NafError::output_path(&path, e))?;
        Ok(path)
    }
}

fn relative_key(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
