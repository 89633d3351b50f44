use crate::error::{CaptureError, Result};
use crate::filter::LinkFilterConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Connection settings for the ingestion server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerSettings {
    /// Base URL of the ingestion server
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Bearer token; empty means no Authorization header
    #[serde(default)]
    pub auth_token: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            auth_token: String::new(),
        }
    }
}

/// A metadata key filled from the first non-empty of several source keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedField {
    pub key: String,
    pub sources: Vec<String>,
}

impl DerivedField {
    fn new(key: &str, sources: &[&str]) -> Self {
        Self {
            key: key.to_string(),
            sources: sources.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Host-based platform tagging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformRule {
    /// Value written to `metadata.platform`
    pub name: String,

    /// Substrings matched against the document host
    pub hosts: Vec<String>,

    /// Selector for a profile display name on this platform
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name_selector: Option<String>,

    /// Metadata key the display name is stored under
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name_key: Option<String>,
}

impl PlatformRule {
    /// Whether this rule applies to the given host
    pub fn matches_host(&self, host: &str) -> bool {
        self.hosts.iter().any(|h| host.contains(h.as_str()))
    }
}

/// Heuristics used by the page extractor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractorConfig {
    /// Characters of parent text kept on each side of a link
    #[serde(default = "default_context_window")]
    pub context_window: usize,

    /// Metadata keys derived by fallback, applied in order
    #[serde(default = "default_derived_fields")]
    pub derived_fields: Vec<DerivedField>,

    /// Platform rules, applied in order; later matches overwrite earlier ones
    #[serde(default = "default_platforms")]
    pub platforms: Vec<PlatformRule>,

    /// Anchor exclusion rules
    #[serde(default)]
    pub link_filter: LinkFilterConfig,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            context_window: default_context_window(),
            derived_fields: default_derived_fields(),
            platforms: default_platforms(),
            link_filter: LinkFilterConfig::default(),
        }
    }
}

/// Complete configuration for the capture tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureConfig {
    #[serde(default)]
    pub server: ServerSettings,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    #[serde(default)]
    pub extractor: ExtractorConfig,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            webdriver_url: default_webdriver_url(),
            extractor: ExtractorConfig::default(),
        }
    }
}

impl CaptureConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| CaptureError::Config(e.to_string()))
    }

    /// Load configuration from a file, using defaults when the file does not exist.
    ///
    /// Returns exactly what is stored; environment overrides are applied
    /// separately with [`CaptureConfig::with_env_overrides`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            ::log::debug!("Loading settings from {}", path.display());
            Self::from_file(path)
        } else {
            ::log::debug!("No settings at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Runtime copy with the `WEBDRIVER_URL` environment variable applied
    pub fn with_env_overrides(self) -> Self {
        self.with_webdriver_override(std::env::var("WEBDRIVER_URL").ok())
    }

    /// Replace the WebDriver URL when `url` is set and non-empty
    pub fn with_webdriver_override(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|url| !url.is_empty()) {
            ::log::debug!("Overriding WebDriver URL with {}", url);
            self.webdriver_url = url;
        }
        self
    }

    /// Persist configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        ::log::info!("Saved settings to {}", path.as_ref().display());
        Ok(())
    }
}

/// Default value for server_url
fn default_server_url() -> String {
    "http://localhost:8765".to_string()
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_context_window() -> usize {
    100
}

fn default_derived_fields() -> Vec<DerivedField> {
    vec![
        DerivedField::new("author", &["author", "article:author", "twitter:creator"]),
        DerivedField::new("date", &["article:published_time", "datePublished", "date"]),
        DerivedField::new("publication", &["og:site_name", "publisher", "twitter:site"]),
    ]
}

fn default_platforms() -> Vec<PlatformRule> {
    vec![
        PlatformRule {
            name: "bluesky".to_string(),
            hosts: vec!["bsky.app".to_string(), "bsky.social".to_string()],
            display_name_selector: Some(r#"[data-testid="profileHeaderDisplayName"]"#.to_string()),
            display_name_key: Some("bsky_author".to_string()),
        },
        PlatformRule {
            name: "twitter".to_string(),
            hosts: vec!["twitter.com".to_string(), "x.com".to_string()],
            display_name_selector: None,
            display_name_key: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CaptureConfig::default();
        assert_eq!(config.server.server_url, "http://localhost:8765");
        assert_eq!(config.server.auth_token, "");
        assert_eq!(config.extractor.context_window, 100);
        assert_eq!(config.extractor.derived_fields.len(), 3);
        assert_eq!(config.extractor.platforms[0].name, "bluesky");
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config =
            CaptureConfig::from_json(r#"{"server":{"authToken":"secret"},"extractor":{"contextWindow":20}}"#)
                .unwrap();
        assert_eq!(config.server.server_url, "http://localhost:8765");
        assert_eq!(config.server.auth_token, "secret");
        assert_eq!(config.extractor.context_window, 20);
        assert_eq!(config.extractor.platforms.len(), 2);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let err = CaptureConfig::from_json("{ nope").unwrap_err();
        assert!(matches!(err, CaptureError::Config(_)));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut config = CaptureConfig::default();
        config.server.server_url = "http://127.0.0.1:9000".to_string();
        config.server.auth_token = "t0ken".to_string();
        config.save(&path).unwrap();

        let loaded = CaptureConfig::from_file(&path).unwrap();
        assert_eq!(loaded.server, config.server);
        assert_eq!(loaded.extractor, config.extractor);
    }

    #[test]
    fn test_webdriver_override_is_not_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        CaptureConfig::default().save(&path).unwrap();

        let stored = CaptureConfig::load(&path).unwrap();
        let runtime = stored
            .clone()
            .with_webdriver_override(Some("http://ephemeral:1".to_string()));
        assert_eq!(runtime.webdriver_url, "http://ephemeral:1");

        let mut edited = stored;
        edited.server.auth_token = "new".to_string();
        edited.save(&path).unwrap();

        let reloaded = CaptureConfig::load(&path).unwrap();
        assert_eq!(reloaded.webdriver_url, "http://localhost:4444");
        assert_eq!(reloaded.server.auth_token, "new");
    }

    #[test]
    fn test_empty_webdriver_override_is_ignored() {
        let config = CaptureConfig::default().with_webdriver_override(Some(String::new()));
        assert_eq!(config.webdriver_url, "http://localhost:4444");
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = CaptureConfig::load(dir.path().join("absent.json")).unwrap();
        assert_eq!(config.server, ServerSettings::default());
    }

    #[test]
    fn test_platform_host_matching() {
        let rules = default_platforms();
        assert!(rules[0].matches_host("bsky.app"));
        assert!(rules[0].matches_host("staging.bsky.social"));
        assert!(rules[1].matches_host("mobile.twitter.com"));
        assert!(!rules[1].matches_host("example.com"));
    }
}
