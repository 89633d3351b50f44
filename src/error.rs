/// Errors surfaced by the capture workflow.
///
/// Extraction itself never fails; these cover the steps around it: reaching
/// the browser, talking to the ingestion server, and loading settings.
#[derive(thiserror::Error, Debug)]
pub enum CaptureError {
    /// The ingestion server could not be reached or answered with a failure status.
    #[error("Connection error: {0}")]
    Connection(String),

    /// No content could be pulled from the page.
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// The ingestion server refused the submission.
    #[error("Capture rejected: {0}")]
    Rejected(String),

    /// Invalid or unreadable configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// WebDriver session failures.
    #[error("WebDriver error: {0}")]
    WebDriver(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CaptureError>;

impl CaptureError {
    /// Short message suitable for showing to the person who triggered the action.
    pub fn user_message(&self) -> String {
        match self {
            CaptureError::Connection(_) | CaptureError::Http(_) => {
                "Cannot connect to the ingestion server. Make sure it is running.".to_string()
            }
            CaptureError::Extraction(_) | CaptureError::WebDriver(_) => {
                "Failed to extract content from page".to_string()
            }
            CaptureError::Rejected(reason) => reason.clone(),
            CaptureError::Config(reason) => format!("Invalid settings: {}", reason),
            CaptureError::Io(e) => e.to_string(),
            CaptureError::Json(e) => e.to_string(),
        }
    }
}
