//! NAF Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, utilities, and error handling for the NAF extraction workspace.
//!
//! # Overview
//!
//! - **Error Handling**: the [`NafError`] enum and the [`Result`] alias
//! - **Logging**: tracing subscriber setup driven by [`logging::LogConfig`]
//! - **Checksums**: SHA-256 digests of generated fragments
//! - **Types**: node kinds and nomenclature tags shared by builders and renderers
//!
//! # Example
//!
//! ```no_run
//! use naf_common::checksum::file_digest;
//! use naf_common::Result;
//!
//! fn digest_fragment(path: &str) -> Result<()> {
//!     let digest = file_digest(path)?;
//!     tracing::info!(sha256 = %digest.sha256, bytes = digest.bytes, "fragment digest");
//!     Ok(())
//! }
//! ```

pub mod checksum;
pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{NafError, Result};
pub use types::{Nomenclature, NodeKind};
