use crate::filter::{LinkFilter, resolve_href};
use crate::parsers::html::{selector, text_content};
use crate::results::LinkEntry;
use crate::utils::{first_chars, last_chars};
use scraper::{ElementRef, Html};
use std::collections::HashSet;
use url::Url;

/// Collects outbound links in document order.
///
/// Anchors rejected by `filter` are dropped, as is any anchor whose resolved
/// URL was already seen.
pub fn collect(doc: &Html, base: Option<&Url>, filter: &LinkFilter, window: usize) -> Vec<LinkEntry> {
    let Some(anchor_selector) = selector("a[href]") else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for anchor in doc.select(&anchor_selector) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let url = resolve_href(base, href);

        if !filter.accepts(href, &url) {
            ::log::trace!("Link filter rejected: {}", href);
            continue;
        }
        if !seen.insert(url.clone()) {
            continue;
        }

        links.push(entry(anchor, url, window));
    }

    ::log::debug!("Found {} unique links", links.len());
    links
}

fn entry(anchor: ElementRef<'_>, url: String, window: usize) -> LinkEntry {
    let link_text = text_content(anchor).trim().to_string();
    let text = if link_text.is_empty() {
        url.clone()
    } else {
        link_text.clone()
    };

    let context = anchor
        .parent()
        .and_then(ElementRef::wrap)
        .and_then(|parent| link_context(&text_content(parent), &link_text, window))
        .unwrap_or_else(|| text.clone());

    LinkEntry { url, text, context }
}

/// Text around `link_text` within `parent_text`.
///
/// Takes up to `window` characters before and after the first occurrence,
/// trims each side, and joins them around the link text. Returns `None` if
/// the link text does not occur in the parent text or the result is empty.
pub fn link_context(parent_text: &str, link_text: &str, window: usize) -> Option<String> {
    let start = parent_text.find(link_text)?;
    let end = start + link_text.len();

    let before = last_chars(&parent_text[..start], window).trim();
    let after = first_chars(&parent_text[end..], window).trim();

    let context = format!("{} {} {}", before, link_text, after).trim().to_string();
    if context.is_empty() { None } else { Some(context) }
}
