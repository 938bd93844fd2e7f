//! Source retrieval
//!
//! Remote sources are fetched with a single timed GET; local sources are read
//! from disk. Any failure aborts the run.

use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use naf_common::{NafError, Result};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use super::SourceLocation;

/// Reads source bytes from URLs or local paths
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    timeout: Duration,
    show_progress: bool,
}

impl Fetcher {
    /// Create a fetcher whose requests time out after `timeout`
    pub fn new(timeout: Duration, show_progress: bool) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| NafError::Network(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            timeout,
            show_progress,
        })
    }

    /// Read the whole source into memory
    pub async fn load(&self, location: &SourceLocation) -> Result<Vec<u8>> {
        match location {
            SourceLocation::Remote(url) => self.download(url).await,
            SourceLocation::Local(path) => {
                debug!(path = %path.display(), "reading local source");
                tokio::fs::read(path).await.map_err(|e| {
                    NafError::Io(std::io::Error::new(
                        e.kind(),
                        format!("{}: {}", path.display(), e),
                    ))
                })
            },
        }
    }

    async fn download(&self, url: &Url) -> Result<Vec<u8>> {
        info!(%url, "downloading source");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.request_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NafError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let total = response.content_length().unwrap_or(0);
        let progress = self.progress_bar(total, url);
        let mut body = Vec::with_capacity(usize::try_from(total).unwrap_or(0));
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| self.request_error(url, e))?;
            body.extend_from_slice(&chunk);
            progress.set_position(body.len() as u64);
        }

        progress.finish_and_clear();
        info!(%url, bytes = body.len(), "downloaded source");
        Ok(body)
    }

    fn request_error(&self, url: &Url, err: reqwest::Error) -> NafError {
        if err.is_timeout() {
            NafError::Timeout {
                url: url.to_string(),
                secs: self.timeout.as_secs(),
            }
        } else {
            NafError::Network(format!("{}: {}", url, err))
        }
    }

    fn progress_bar(&self, total: u64, url: &Url) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let progress = ProgressBar::new(total);
        if let Ok(style) = ProgressStyle::default_bar().template(
            "{msg}\n{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({eta})",
        ) {
            progress.set_style(style.progress_chars("#>-"));
        }
        progress.set_message(format!(
            "Downloading {}",
            url.path_segments()
                .and_then(|mut segments| segments.next_back())
                .unwrap_or(url.as_str())
        ));
        progress
    }
}
