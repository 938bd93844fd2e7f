//! Fragment serialization
//!
//! Every set of siblings becomes one fragment file. Roots go to a top-level
//! file named after their kind; any other sibling set goes to a directory named
//! after its kind, in a file named after the parent's code:
//!
//! ```text
//! out/
//! ├── secteurs.htm            sectors
//! ├── secteurs-liberaux.htm   liberal sectors
//! ├── divisions/A.htm         divisions of sector A
//! ├── groupes/01.htm          groups of division 01
//! └── classes/011.htm         classes of group 011 (and classes/L01.htm ...)
//! ```

pub mod option;

use naf_common::{NafError, NodeKind, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

use crate::tree::ClassificationNode;

pub use option::{option_entry, placeholder, title_case};

/// Extension of fragment files
pub const FRAGMENT_EXTENSION: &str = "htm";

/// Kinds whose fragments live in subdirectories, cleared before each run
const FRAGMENT_DIRS: [NodeKind; 3] = [NodeKind::Division, NodeKind::Group, NodeKind::Class];

/// Top-level fragments, cleared before each run
const ROOT_KINDS: [NodeKind; 2] = [NodeKind::Sector, NodeKind::LiberalSector];

/// Writes the fragments of classification trees under an output directory
#[derive(Debug, Clone)]
pub struct FragmentWriter {
    root: PathBuf,
}

impl FragmentWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Remove the fragments of a previous run and make sure the root exists
    ///
    /// Entries that do not exist are not an error.
    pub fn prepare(&self, extra_files: &[&str]) -> Result<()> {
        let root_files = ROOT_KINDS
            .iter()
            .map(|kind| format!("{}.{}", kind.dir_name(), FRAGMENT_EXTENSION))
            .chain(extra_files.iter().map(|name| name.to_string()));

        for name in root_files {
            let path = self.root.join(name);
            match std::fs::remove_file(&path) {
                Ok(()) => debug!(path = %path.display(), "removed previous output"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {},
                Err(e) => return Err(NafError::output_path(path, e)),
            }
        }

        for kind in FRAGMENT_DIRS {
            let path = self.root.join(kind.dir_name());
            match std::fs::remove_dir_all(&path) {
                Ok(()) => debug!(path = %path.display(), "removed previous output"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {},
                Err(e) => return Err(NafError::output_path(path, e)),
            }
        }

        std::fs::create_dir_all(&self.root).map_err(|e| NafError::output_path(&self.root, e))
    }

    /// Write one fragment per sibling set of the tree, depth first
    ///
    /// Returns the fragment paths in the order they were written. An empty
    /// tree still gets its (placeholder only) root fragment.
    #[instrument(skip_all, fields(root_kind = %root_kind))]
    pub fn write_tree(
        &self,
        roots: &[ClassificationNode],
        root_kind: NodeKind,
    ) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        self.write_siblings(roots, root_kind, None, &mut written)?;
        info!(fragments = written.len(), "fragments written");
        Ok(written)
    }

    fn write_siblings(
        &self,
        nodes: &[ClassificationNode],
        kind: NodeKind,
        parent: Option<&str>,
        written: &mut Vec<PathBuf>,
    ) -> Result<()> {
        let path = self.fragment_path(kind, parent)?;
        write_fragment(&path, kind, nodes)?;
        written.push(path);

        for node in nodes.iter().filter(|node| !node.is_leaf()) {
            if let Some(child_kind) = node.kind.child_kind() {
                self.write_siblings(node.children(), child_kind, Some(&node.code), written)?;
            }
        }

        Ok(())
    }

    /// Path of the fragment for `kind` siblings under `parent`, creating its directory
    fn fragment_path(&self, kind: NodeKind, parent: Option<&str>) -> Result<PathBuf> {
        match parent {
            None => Ok(self
                .root
                .join(format!("{}.{}", kind.dir_name(), FRAGMENT_EXTENSION))),
            Some(code) => {
                let dir = self.root.join(kind.dir_name());
                std::fs::create_dir_all(&dir).map_err(|e| NafError::output_path(&dir, e))?;
                Ok(dir.join(format!("{}.{}", file_stem(code), FRAGMENT_EXTENSION)))
            },
        }
    }
}

/// File-name-safe form of a node code
fn file_stem(code: &str) -> String {
    code.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn write_fragment(path: &Path, kind: NodeKind, nodes: &[ClassificationNode]) -> Result<()> {
    let file = File::create(path).map_err(|e| NafError::output_path(path, e))?;
    let mut out = BufWriter::new(file);

    let write = |out: &mut BufWriter<File>, line: &str| -> Result<()> {
        out.write_all(line.as_bytes())
            .and_then(|()| out.write_all(b"\n"))
            .map_err(|e| NafError::output_path(path, e))
    };

    write(&mut out, &placeholder(kind))?;
    for node in nodes {
        write(&mut out, &option_entry(node))?;
    }

    out.flush().map_err(|e| NafError::output_path(path, e))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use naf_common::Nomenclature;

    fn read(path: &Path) -> String {
        std::fs::read_to_string(path).unwrap()
    }

    #[test]
    fn test_division_without_groups_stops_the_recursion() {
        let dir = tempfile::tempdir().unwrap();
        let mut sector = ClassificationNode::sector("A", "Agriculture");
        sector.add_child("01", "Culture", Nomenclature::All);

        let writer = FragmentWriter::new(dir.path());
        let written = writer.write_tree(&[sector], NodeKind::Sector).unwrap();

        assert_eq!(
            written,
            vec![dir.path().join("secteurs.htm"), dir.path().join("divisions/A.htm")]
        );
        assert!(!dir.path().join("groupes").exists());

        let divisions = read(&dir.path().join("divisions/A.htm"));
        assert_eq!(
            divisions,
            "<option disabled selected>Sélectionnez votre Division</option>\n\
             <option value=\"01\" data-nomenclature=\"all\" data-type=\"division\">Culture</option>\n"
        );
    }

    #[test]
    fn test_one_fragment_per_internal_node() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = ClassificationNode::sector("A", "Agriculture");
        {
            let division = a.add_child("01", "Culture", Nomenclature::All).unwrap();
            let group = division.add_child("011", "Non permanentes", Nomenclature::All).unwrap();
            group.add_child("0111Z", "Céréales", Nomenclature::Naf);
            group.add_child("0112Z", "Riz", Nomenclature::Naf);
            division.add_child("012", "Permanentes", Nomenclature::All);
        }
        let b = ClassificationNode::sector("B", "Extraction");
        let roots = vec![a, b];

        let written = FragmentWriter::new(dir.path())
            .write_tree(&roots, NodeKind::Sector)
            .unwrap();

        assert_eq!(written.len(), 1 + crate::tree::internal_count(&roots));
        assert!(dir.path().join("classes/011.htm").exists());
        assert!(!dir.path().join("classes/012.htm").exists());
        assert!(!dir.path().join("divisions/B.htm").exists());

        let classes = read(&dir.path().join("classes/011.htm"));
        assert_eq!(classes.lines().count(), 3);
        assert!(classes.lines().nth(2).unwrap().contains("0112Z"));
    }

    #[test]
    fn test_empty_tree_gets_a_placeholder_root() {
        let dir = tempfile::tempdir().unwrap();

        FragmentWriter::new(dir.path())
            .write_tree(&[], NodeKind::LiberalSector)
            .unwrap();

        assert_eq!(
            read(&dir.path().join("secteurs-liberaux.htm")),
            "<option disabled selected>Sélectionnez votre Secteur</option>\n"
        );
    }

    #[test]
    fn test_prepare_clears_previous_run() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("data");
        std::fs::create_dir_all(out.join("classes")).unwrap();
        std::fs::write(out.join("classes/999.htm"), "stale").unwrap();
        std::fs::write(out.join("secteurs.htm"), "stale").unwrap();
        std::fs::write(out.join("manifest.json"), "{}").unwrap();
        std::fs::write(out.join("keep.txt"), "mine").unwrap();

        FragmentWriter::new(&out).prepare(&["manifest.json"]).unwrap();

        assert!(!out.join("classes").exists());
        assert!(!out.join("secteurs.htm").exists());
        assert!(!out.join("manifest.json").exists());
        assert!(out.join("keep.txt").exists());
    }

    #[test]
    fn test_prepare_creates_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/data");

        FragmentWriter::new(&out).prepare(&[]).unwrap();

        assert!(out.is_dir());
    }

    #[test]
    fn test_codes_are_made_file_safe() {
        assert_eq!(file_stem("L01"), "L01");
        assert_eq!(file_stem("../A"), "___A");
    }
}
