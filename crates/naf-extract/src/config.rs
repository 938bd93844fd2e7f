//! Extraction configuration
//!
//! Defaults come from the constants below, `.env` / environment variables
//! override them, and command-line flags override both.

use anyhow::Context;
use naf_common::NafError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::sources::SourceLocation;

// ============================================================================
// Configuration Constants
// ============================================================================

/// INSEE NAF rev. 2 workbook (short labels)
pub const DEFAULT_NAF_SOURCE: &str =
    "https://www.insee.fr/fr/statistiques/fichier/2120875/int_courts_naf_rev_2.xls";

/// NAFA export of the Hauts-de-Seine open-data portal
pub const DEFAULT_NAFA_SOURCE: &str = "https://opendata.hauts-de-seine.fr/explore/dataset/entreprises-artisanales-par-code-nafa/download/?format=csv&timezone=Europe/Berlin&lang=fr&use_labels_for_header=true&csv_separator=%3B";

/// Output directory for fragments
pub const DEFAULT_OUTPUT_DIR: &str = "./data";

/// Per-download timeout in seconds
pub const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 10;

/// Extraction settings for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Directory receiving fragments and the manifest
    pub output_dir: PathBuf,

    /// NAF workbook, URL or path
    pub naf_source: String,

    /// NAFA table, URL or path
    pub nafa_source: String,

    /// Liberal-profession table; the taxonomy is skipped when unset
    pub liberal_source: Option<String>,

    pub download_timeout_secs: u64,

    /// Draw download progress bars
    pub show_progress: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            naf_source: DEFAULT_NAF_SOURCE.to_string(),
            nafa_source: DEFAULT_NAFA_SOURCE.to_string(),
            liberal_source: None,
            download_timeout_secs: DEFAULT_DOWNLOAD_TIMEOUT_SECS,
            show_progress: true,
        }
    }
}

impl ExtractConfig {
    /// Load configuration from `.env`, environment variables and defaults
    ///
    /// Environment variables:
    /// - `NAF_OUTPUT_DIR`
    /// - `NAF_SOURCE`, `NAFA_SOURCE`, `NAF_LIBERAL_SOURCE`
    /// - `NAF_DOWNLOAD_TIMEOUT` (seconds)
    /// - `NAF_SHOW_PROGRESS` (true/false)
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        let config = Self {
            output_dir: std::env::var("NAF_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            naf_source: std::env::var("NAF_SOURCE").unwrap_or(defaults.naf_source),
            nafa_source: std::env::var("NAFA_SOURCE").unwrap_or(defaults.nafa_source),
            liberal_source: std::env::var("NAF_LIBERAL_SOURCE")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            download_timeout_secs: match std::env::var("NAF_DOWNLOAD_TIMEOUT") {
                Ok(value) => value
                    .trim()
                    .parse()
                    .with_context(|| format!("NAF_DOWNLOAD_TIMEOUT is not a number: {}", value))?,
                Err(_) => defaults.download_timeout_secs,
            },
            show_progress: std::env::var("NAF_SHOW_PROGRESS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.show_progress),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.output_dir.as_os_str().is_empty() {
            anyhow::bail!("Output directory cannot be empty");
        }

        if self.download_timeout_secs == 0 {
            anyhow::bail!("Download timeout must be greater than 0");
        }

        self.naf_location()?;
        self.nafa_location()?;
        self.liberal_location()?;

        Ok(())
    }

    pub fn naf_location(&self) -> anyhow::Result<SourceLocation> {
        parse_location("NAF source", &self.naf_source)
    }

    pub fn nafa_location(&self) -> anyhow::Result<SourceLocation> {
        parse_location("NAFA source", &self.nafa_source)
    }

    pub fn liberal_location(&self) -> anyhow::Result<Option<SourceLocation>> {
        self.liberal_source
            .as_deref()
            .map(|source| parse_location("liberal source", source))
            .transpose()
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}

fn parse_location(name: &str, value: &str) -> anyhow::Result<SourceLocation> {
    if value.trim().is_empty() {
        return Err(NafError::Config(format!("{} cannot be empty", name)).into());
    }
    value
        .parse()
        .map_err(|e| NafError::Config(format!("invalid {} '{}': {}", name, value, e)).into())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 6] = [
        "NAF_OUTPUT_DIR",
        "NAF_SOURCE",
        "NAFA_SOURCE",
        "NAF_LIBERAL_SOURCE",
        "NAF_DOWNLOAD_TIMEOUT",
        "NAF_SHOW_PROGRESS",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = ExtractConfig::default();

        assert!(config.validate().is_ok());
        assert!(matches!(config.naf_location().unwrap(), SourceLocation::Remote(_)));
        assert!(config.liberal_location().unwrap().is_none());
        assert_eq!(config.download_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let config = ExtractConfig {
            download_timeout_secs: 0,
            ..ExtractConfig::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_source_is_rejected() {
        let config = ExtractConfig {
            nafa_source: "  ".to_string(),
            ..ExtractConfig::default()
        };

        let err = config.validate().unwrap_err();
        assert!(matches!(err.downcast_ref::<NafError>(), Some(NafError::Config(_))));
    }

    #[test]
    #[serial]
    fn test_environment_overrides_defaults() {
        clear_env();
        std::env::set_var("NAF_OUTPUT_DIR", "/srv/www/data");
        std::env::set_var("NAF_LIBERAL_SOURCE", "liberal.csv");
        std::env::set_var("NAF_DOWNLOAD_TIMEOUT", "30");
        std::env::set_var("NAF_SHOW_PROGRESS", "false");

        let config = ExtractConfig::from_env().unwrap();
        clear_env();

        assert_eq!(config.output_dir, PathBuf::from("/srv/www/data"));
        assert_eq!(config.download_timeout_secs, 30);
        assert!(!config.show_progress);
        assert_eq!(
            config.liberal_location().unwrap(),
            Some(SourceLocation::Local(PathBuf::from("liberal.csv")))
        );
    }

    #[test]
    #[serial]
    fn test_bad_timeout_in_environment_fails() {
        clear_env();
        std::env::set_var("NAF_DOWNLOAD_TIMEOUT", "soon");

        let result = ExtractConfig::from_env();
        clear_env();

        assert!(result.is_err());
    }
}
