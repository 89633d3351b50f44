use crate::error::{CaptureError, Result};
use crate::snapshot::PageSnapshot;
use fantoccini::{Client, ClientBuilder};
use std::time::Duration;
use tokio::time::timeout;

const SELECTION_SCRIPT: &str = "return window.getSelection ? window.getSelection().toString() : '';";

/// Upper bound for navigating and reading one page
const SNAPSHOT_TIMEOUT: Duration = Duration::from_secs(45);

/// Connects to the WebDriver instance, trying well-known local ports if the
/// configured URL does not answer
pub async fn connect(webdriver_url: &str) -> Result<Client> {
    match ClientBuilder::native().connect(webdriver_url).await {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", webdriver_url);
            return Ok(client);
        }
        Err(e) => {
            ::log::error!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
        }
    }

    let fallback_urls = [
        "http://localhost:9515", // ChromeDriver default
        "http://localhost:4723", // Appium default
        "http://localhost:9222", // Chrome debug port default
        "http://127.0.0.1:4444", // Try with IP instead of localhost
    ];

    for url in fallback_urls.iter().filter(|url| **url != webdriver_url) {
        ::log::info!("Trying fallback WebDriver URL: {}", url);
        if let Ok(client) = ClientBuilder::native().connect(url).await {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Ok(client);
        }
    }

    Err(CaptureError::WebDriver(format!(
        "no WebDriver server answered at {}; start one or set WEBDRIVER_URL",
        webdriver_url
    )))
}

/// Reads the current document of a session.
///
/// Navigates to `target` first when given. A selection that cannot be read
/// is reported as empty.
pub async fn take_snapshot(client: &Client, target: Option<&str>) -> Result<PageSnapshot> {
    let read = async {
        if let Some(url) = target {
            client
                .goto(url)
                .await
                .map_err(|e| CaptureError::WebDriver(format!("Failed to open {}: {}", url, e)))?;
        }

        let url = client
            .current_url()
            .await
            .map_err(|e| CaptureError::WebDriver(format!("Failed to read location: {}", e)))?;
        let html = client
            .source()
            .await
            .map_err(|e| CaptureError::Extraction(format!("Failed to read source of {}: {}", url, e)))?;
        let selection = read_selection(client).await;

        Ok::<_, CaptureError>(PageSnapshot {
            url: url.to_string(),
            html,
            selection,
        })
    };

    match timeout(SNAPSHOT_TIMEOUT, read).await {
        Ok(result) => result,
        Err(_) => Err(CaptureError::Extraction(format!(
            "Timed out reading {}",
            target.unwrap_or("current page")
        ))),
    }
}

async fn read_selection(client: &Client) -> String {
    match client.execute(SELECTION_SCRIPT, Vec::new()).await {
        Ok(value) => value.as_str().unwrap_or_default().to_string(),
        Err(e) => {
            ::log::debug!("Could not read selection: {}", e);
            String::new()
        }
    }
}

/// Opens a session, snapshots `target` (or the session's current page), and
/// closes the session again
pub async fn snapshot_page(webdriver_url: &str, target: Option<&str>) -> Result<PageSnapshot> {
    let client = connect(webdriver_url).await?;
    let result = take_snapshot(&client, target).await;

    if let Err(e) = client.close().await {
        ::log::warn!("Failed to close WebDriver session: {}", e);
    }

    result
}
