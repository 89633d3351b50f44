// Re-export modules
pub mod browser;
pub mod capture;
pub mod client;
pub mod config;
pub mod error;
pub mod filter;
pub mod messages;
pub mod parsers;
pub mod results;
pub mod snapshot;
pub mod utils;

// Re-export commonly used types for convenience
pub use capture::{CaptureOptions, CapturePayload};
pub use config::CaptureConfig;
pub use error::{CaptureError, Result};
pub use results::{ContentRecord, LinkEntry};
pub use snapshot::PageSnapshot;

use client::{ConnectionState, IngestClient, IngestOutcome};
use parsers::Extractor;
use std::path::PathBuf;
use url::Url;

/// Where the document to capture comes from
#[derive(Debug, Clone)]
pub enum SourceType {
    /// A page opened in a WebDriver-controlled browser
    Live(String),
    /// An HTML file on disk, optionally with the URL it was saved from
    File { path: PathBuf, url: Option<String> },
    /// Markup already in memory
    Html { url: String, html: String },
}

/// Main builder for extracting and submitting a page
pub struct Capture {
    source: SourceType,
    config: CaptureConfig,
    selection: Option<String>,
}

impl Capture {
    /// Create a new Capture builder for the given source
    pub fn new(source: SourceType) -> Self {
        Self {
            source,
            config: CaptureConfig::default(),
            selection: None,
        }
    }

    /// Use the given configuration
    pub fn with_config(mut self, config: CaptureConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the text selection reported by the source
    pub fn with_selection(mut self, selection: impl Into<String>) -> Self {
        self.selection = Some(selection.into());
        self
    }

    /// Take a snapshot of the source document
    pub async fn snapshot(&self) -> Result<PageSnapshot> {
        let snapshot = match &self.source {
            SourceType::Live(target) => {
                browser::snapshot_page(&self.config.webdriver_url, Some(target.as_str())).await?
            }
            SourceType::File { path, url } => {
                let html = tokio::fs::read_to_string(path).await.map_err(|e| {
                    CaptureError::Extraction(format!("Failed to read {}: {}", path.display(), e))
                })?;
                let url = match url {
                    Some(url) => url.clone(),
                    None => file_url(path),
                };
                PageSnapshot::from_html(url, html)
            }
            SourceType::Html { url, html } => PageSnapshot::from_html(url.clone(), html.clone()),
        };

        Ok(match &self.selection {
            Some(selection) => snapshot.with_selection(selection.clone()),
            None => snapshot,
        })
    }

    /// Build an extractor from the configuration
    pub fn extractor(&self) -> Result<Extractor> {
        Extractor::new(self.config.extractor.clone())
            .map_err(|e| CaptureError::Config(format!("Invalid link filter pattern: {}", e)))
    }

    /// Snapshot the source and extract its content
    pub async fn extract(&self) -> Result<ContentRecord> {
        let extractor = self.extractor()?;
        let snapshot = self.snapshot().await?;
        Ok(extractor.extract(&snapshot))
    }

    /// Extract the page and submit it to the ingestion server.
    ///
    /// Refuses to submit unless the server is reachable and idle.
    pub async fn submit(&self, options: &CaptureOptions) -> Result<IngestOutcome> {
        let client = IngestClient::new(&self.config.server)?;

        match client.check_connection().await {
            ConnectionState::Ready => {}
            ConnectionState::Busy => {
                return Err(CaptureError::Rejected(
                    "The ingestion server is processing; try again shortly".to_string(),
                ));
            }
            ConnectionState::Disconnected(reason) => return Err(CaptureError::Connection(reason)),
        }

        let record = self.extract().await?;
        let payload = CapturePayload::build(record, options, chrono::Utc::now());
        client.ingest(&payload).await
    }
}

fn file_url(path: &std::path::Path) -> String {
    std::fs::canonicalize(path)
        .ok()
        .and_then(|abs| Url::from_file_path(abs).ok())
        .map(|url| url.to_string())
        .unwrap_or_else(|| path.display().to_string())
}
