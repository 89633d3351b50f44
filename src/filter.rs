use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

/// Configuration for deciding which anchors become link entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkFilterConfig {
    /// Regex patterns matched against the raw `href` attribute
    #[serde(default = "default_href_excludes")]
    pub exclude_href_patterns: Vec<String>,

    /// Regex patterns matched against the resolved URL
    #[serde(default = "default_url_excludes")]
    pub exclude_url_patterns: Vec<String>,
}

/// In-page fragment links
fn default_href_excludes() -> Vec<String> {
    vec![r"^\s*#".to_string()]
}

/// Script and mail targets
fn default_url_excludes() -> Vec<String> {
    vec![r"(?i)^(javascript|mailto):".to_string()]
}

impl Default for LinkFilterConfig {
    fn default() -> Self {
        Self {
            exclude_href_patterns: default_href_excludes(),
            exclude_url_patterns: default_url_excludes(),
        }
    }
}

/// Link filter compiled from a [`LinkFilterConfig`]
#[derive(Debug)]
pub struct LinkFilter {
    href_excludes: Vec<Regex>,
    url_excludes: Vec<Regex>,
}

impl Default for LinkFilter {
    fn default() -> Self {
        Self::new(&LinkFilterConfig::default()).expect("Default regex patterns should be valid")
    }
}

impl LinkFilter {
    /// Create a new link filter from configuration
    pub fn new(config: &LinkFilterConfig) -> Result<Self, regex::Error> {
        Ok(Self {
            href_excludes: compile(&config.exclude_href_patterns)?,
            url_excludes: compile(&config.exclude_url_patterns)?,
        })
    }

    /// Determine if an anchor should be kept, given its raw `href` and resolved URL
    pub fn accepts(&self, raw_href: &str, resolved: &str) -> bool {
        if self.href_excludes.iter().any(|re| re.is_match(raw_href)) {
            return false;
        }
        !self.url_excludes.iter().any(|re| re.is_match(resolved))
    }
}

fn compile(patterns: &[String]) -> Result<Vec<Regex>, regex::Error> {
    patterns.iter().map(|p| Regex::new(p)).collect()
}

/// Resolve an `href` against the document base.
///
/// Falls back to the trimmed raw value when there is no usable base or the
/// join fails.
pub fn resolve_href(base: Option<&Url>, href: &str) -> String {
    let href = href.trim();
    match base.map(|b| b.join(href)) {
        Some(Ok(resolved)) => resolved.to_string(),
        _ => href.to_string(),
    }
}
