use crate::capture::CapturePayload;
use crate::config::ServerSettings;
use crate::error::{CaptureError, Result};
use reqwest::RequestBuilder;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_SUCCESS_MESSAGE: &str = "Content captured successfully!";
const DEFAULT_FAILURE_MESSAGE: &str = "Failed to capture content";

/// Body of `GET /api/status`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerStatus {
    /// The server is busy processing an earlier capture
    #[serde(default, alias = "busy")]
    pub ingesting: bool,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub version: Option<String>,
}

/// Whether a capture can be submitted right now
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Ready,
    /// Reachable but processing; captures should wait
    Busy,
    Disconnected(String),
}

impl ConnectionState {
    pub fn can_capture(&self) -> bool {
        matches!(self, ConnectionState::Ready)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestStats {
    #[serde(default)]
    pub entities: u64,
    #[serde(default)]
    pub links: u64,
}

/// Raw body of `POST /api/ingest`
#[derive(Debug, Clone, Default, Deserialize)]
struct IngestResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    stats: Option<IngestStats>,
    #[serde(default)]
    extracted_entities: Option<u64>,
    #[serde(default)]
    extracted_links: Option<u64>,
}

impl IngestResponse {
    fn stats(&self) -> Option<IngestStats> {
        self.stats.or_else(|| {
            if self.extracted_entities.is_none() && self.extracted_links.is_none() {
                return None;
            }
            Some(IngestStats {
                entities: self.extracted_entities.unwrap_or(0),
                links: self.extracted_links.unwrap_or(0),
            })
        })
    }
}

/// Result of an accepted capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOutcome {
    pub message: String,
    pub stats: Option<IngestStats>,
}

/// HTTP client for the ingestion server
#[derive(Debug, Clone)]
pub struct IngestClient {
    client: reqwest::Client,
    base_url: String,
    auth_token: String,
}

impl IngestClient {
    /// Create a client for the configured server
    pub fn new(settings: &ServerSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.server_url.trim_end_matches('/').to_string(),
            auth_token: settings.auth_token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        if self.auth_token.is_empty() {
            request
        } else {
            request.bearer_auth(&self.auth_token)
        }
    }

    /// Fetch the server status
    pub async fn status(&self) -> Result<ServerStatus> {
        let url = format!("{}/api/status", self.base_url);
        let resp = self
            .authorized(self.client.get(&url))
            .send()
            .await
            .map_err(|e| CaptureError::Connection(format!("{}: {}", url, e)))?;

        if !resp.status().is_success() {
            return Err(CaptureError::Connection(format!(
                "Server returned {}",
                resp.status()
            )));
        }

        let status = resp
            .json::<ServerStatus>()
            .await
            .map_err(|e| CaptureError::Connection(format!("Invalid status response: {}", e)))?;
        Ok(status)
    }

    /// Check whether the server is reachable and idle.
    ///
    /// Never fails; an unreachable server is reported as
    /// [`ConnectionState::Disconnected`].
    pub async fn check_connection(&self) -> ConnectionState {
        match self.status().await {
            Ok(status) if status.ingesting => {
                ::log::info!("Server at {} is processing", self.base_url);
                ConnectionState::Busy
            }
            Ok(_) => {
                ::log::info!("Connected to {}", self.base_url);
                ConnectionState::Ready
            }
            Err(e) => {
                ::log::warn!("Cannot connect to {}: {}", self.base_url, e);
                ConnectionState::Disconnected(e.to_string())
            }
        }
    }

    /// Submit a capture
    pub async fn ingest(&self, payload: &CapturePayload) -> Result<IngestOutcome> {
        let url = format!("{}/api/ingest", self.base_url);
        ::log::info!(
            "Submitting {} ({} links, mode {})",
            payload.url,
            payload.links.len(),
            payload.mode().unwrap_or("full")
        );

        let resp = self
            .authorized(self.client.post(&url))
            .json(payload)
            .send()
            .await
            .map_err(|e| CaptureError::Connection(format!("{}: {}", url, e)))?;

        let http_status = resp.status();
        let body = resp.text().await?;

        let parsed = match serde_json::from_str::<IngestResponse>(&body) {
            Ok(parsed) => parsed,
            Err(_) if !http_status.is_success() => {
                // Plain-text error bodies, e.g. "Server busy"
                let reason = body.trim();
                let reason = if reason.is_empty() {
                    format!("Server returned {}", http_status)
                } else {
                    reason.to_string()
                };
                return Err(CaptureError::Rejected(reason));
            }
            Err(e) => {
                ::log::warn!("Unreadable ingest response from {}: {}", url, e);
                return Err(CaptureError::Rejected(DEFAULT_FAILURE_MESSAGE.to_string()));
            }
        };

        if http_status.is_success() && parsed.success {
            let stats = parsed.stats();
            Ok(IngestOutcome {
                message: parsed
                    .message
                    .unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string()),
                stats,
            })
        } else {
            Err(CaptureError::Rejected(
                parsed
                    .error
                    .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string()),
            ))
        }
    }
}
