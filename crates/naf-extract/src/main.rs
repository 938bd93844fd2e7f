//! NAF Extract - classification fragment generator

use anyhow::Result;
use clap::Parser;
use naf_common::logging::{init_logging, LogConfig, LogLevel};
use naf_extract::config::ExtractConfig;
use naf_extract::pipeline;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "naf-extract")]
#[command(author, version, about = "Generate NAF / NAFA / liberal-profession selection fragments")]
struct Cli {
    /// Output directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// NAF workbook (URL or path)
    #[arg(long)]
    naf: Option<String>,

    /// NAFA table (URL or path)
    #[arg(long)]
    nafa: Option<String>,

    /// Liberal-profession table (URL or path)
    #[arg(long)]
    liberal: Option<String>,

    /// Download timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Hide download progress bars
    #[arg(long)]
    no_progress: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Flags take precedence over the environment
    fn apply(self, mut config: ExtractConfig) -> Result<ExtractConfig> {
        if let Some(output) = self.output {
            config.output_dir = output;
        }
        if let Some(naf) = self.naf {
            config.naf_source = naf;
        }
        if let Some(nafa) = self.nafa {
            config.nafa_source = nafa;
        }
        if let Some(liberal) = self.liberal {
            config.liberal_source = Some(liberal);
        }
        if let Some(timeout) = self.timeout {
            config.download_timeout_secs = timeout;
        }
        if self.no_progress {
            config.show_progress = false;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    // Environment variables take precedence over the flag
    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("naf-extract")
        .build()
        .merge_env()?;

    let _guard = init_logging(&log_config)?;

    let config = cli.apply(ExtractConfig::from_env()?)?;
    info!(output = %config.output_dir.display(), "starting extraction");

    if let Err(e) = pipeline::run(&config).await {
        error!(error = %e, "extraction failed");
        return Err(e);
    }

    Ok(())
}
