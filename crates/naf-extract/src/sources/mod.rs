//! Source readers
//!
//! Each reader turns raw source bytes into rows for the builders:
//!
//! - [`spreadsheet`]: INSEE NAF workbook, `(code, name)` by column index
//! - [`nafa`]: NAFA table, code and name packed in one cell
//! - [`liberal`]: local liberal-profession table
//!
//! Bytes come from [`download::Fetcher`], which reads either a URL or a local
//! path.

pub mod download;
pub mod liberal;
pub mod nafa;
pub mod spreadsheet;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use url::Url;

pub use download::Fetcher;
pub use liberal::read_liberal_table;
pub use nafa::read_nafa_table;
pub use spreadsheet::read_naf_workbook;

/// A raw `(code, name)` pair, before normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeRow {
    pub code: String,
    pub name: String,
}

impl CodeRow {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// A row of the liberal-profession table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiberalRow {
    pub sector: String,
    pub label: String,
    pub regulated: bool,
    pub code: String,
    pub registration: String,
    pub registration_alt: Option<String>,
}

/// Where a source is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    Remote(Url),
    Local(PathBuf),
}

impl FromStr for SourceLocation {
    type Err = url::ParseError;

    /// `http://` and `https://` values are URLs, anything else is a path
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Ok(SourceLocation::Remote(Url::parse(trimmed)?))
        } else {
            Ok(SourceLocation::Local(PathBuf::from(trimmed)))
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLocation::Remote(url) => write!(f, "{}", url),
            SourceLocation::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Semicolon-delimited reader that skips the header row
fn semicolon_reader(bytes: &[u8]) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes)
}
