//! NAF Extract Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Builds the French activity classification (NAF rev. 2, extended with NAFA
//! artisan codes) and a parallel liberal-profession taxonomy, then writes both
//! as `<option>` fragments for cascading selection lists.
//!
//! # Pipeline
//!
//! 1. [`sources`]: fetch and decode the NAF workbook, the NAFA table and the
//!    liberal-profession table
//! 2. [`builder::primary`]: sector > division > group > class hierarchy
//! 3. [`builder::merge`]: NAFA classes merged into that hierarchy
//! 4. [`builder::liberal`]: liberal sector > class taxonomy
//! 5. [`render`]: one fragment per sibling set
//! 6. [`manifest`]: fragment digests and build statistics
//!
//! # Example
//!
//! ```no_run
//! use naf_extract::config::ExtractConfig;
//! use naf_extract::pipeline;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ExtractConfig::from_env()?;
//!     let summary = pipeline::run(&config).await?;
//!     println!("{} fragments", summary.fragments.len());
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod code;
pub mod config;
pub mod index;
pub mod manifest;
pub mod pipeline;
pub mod registry;
pub mod render;
pub mod sources;
pub mod tree;

pub use code::{normalize_code, same_class, ClassCode};
pub use registry::RootRegistry;
pub use tree::ClassificationNode;
