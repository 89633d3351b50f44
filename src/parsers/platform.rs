use crate::config::PlatformRule;
use crate::parsers::html::{selector, text_content};
use scraper::Html;
use std::collections::BTreeMap;
use url::Url;

/// Tags `metadata.platform` for every rule matching the page host.
///
/// Rules run in order so a later match overwrites an earlier one. When a rule
/// names a display-name selector, the first matching element's text is
/// stored under its key; nothing is stored if the element is missing.
pub fn apply(doc: &Html, page_url: &str, rules: &[PlatformRule], metadata: &mut BTreeMap<String, String>) {
    let Some(host) = host_of(page_url) else {
        return;
    };

    for rule in rules.iter().filter(|rule| rule.matches_host(&host)) {
        ::log::debug!("Page host {} matches platform {}", host, rule.name);
        metadata.insert("platform".to_string(), rule.name.clone());

        if let (Some(css), Some(key)) = (&rule.display_name_selector, &rule.display_name_key) {
            if let Some(name) = display_name(doc, css) {
                metadata.insert(key.clone(), name);
            }
        }
    }
}

fn host_of(page_url: &str) -> Option<String> {
    Url::parse(page_url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
}

fn display_name(doc: &Html, css: &str) -> Option<String> {
    let sel = selector(css)?;
    let element = doc.select(&sel).next()?;
    let name = text_content(element).trim().to_string();
    if name.is_empty() { None } else { Some(name) }
}
