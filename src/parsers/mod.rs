pub mod html;
pub mod links;
pub mod meta;
pub mod platform;
pub mod text;

#[cfg(test)]
mod tests;

use crate::config::ExtractorConfig;
use crate::filter::LinkFilter;
use crate::results::ContentRecord;
use crate::snapshot::PageSnapshot;
use scraper::Html;

/// Page content extractor.
///
/// Holds the compiled link filter and the heuristics from
/// [`ExtractorConfig`]. Extraction only reads the snapshot and never fails:
/// any missing piece of the document yields an empty value.
#[derive(Debug)]
pub struct Extractor {
    config: ExtractorConfig,
    filter: LinkFilter,
}

impl Extractor {
    /// Create an extractor, compiling the link filter patterns
    pub fn new(config: ExtractorConfig) -> Result<Self, regex::Error> {
        let filter = LinkFilter::new(&config.link_filter)?;
        Ok(Self { config, filter })
    }

    /// Create an extractor, falling back to the built-in link filter when the
    /// configured patterns do not compile
    pub fn lenient(config: ExtractorConfig) -> Self {
        let filter = LinkFilter::new(&config.link_filter).unwrap_or_else(|e| {
            ::log::warn!("Invalid link filter pattern, using defaults: {}", e);
            LinkFilter::default()
        });
        Self { config, filter }
    }

    /// Build a [`ContentRecord`] from a document snapshot
    pub fn extract(&self, snapshot: &PageSnapshot) -> ContentRecord {
        let doc = Html::parse_document(&snapshot.html);

        let mut metadata = meta::collect(&doc);
        meta::apply_derived(&mut metadata, &self.config.derived_fields);

        let base = html::base_url(&doc, &snapshot.url);
        let links = links::collect(&doc, base.as_ref(), &self.filter, self.config.context_window);

        platform::apply(&doc, &snapshot.url, &self.config.platforms, &mut metadata);

        ::log::info!(
            "Extracted {} ({} metadata entries, {} links)",
            snapshot.url,
            metadata.len(),
            links.len()
        );

        ContentRecord {
            url: snapshot.url.clone(),
            title: html::document_title(&doc),
            html: html::serialize(&doc),
            text: html::visible_text(&doc),
            metadata,
            links,
            selection: snapshot.selection.clone(),
        }
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::lenient(ExtractorConfig::default())
    }
}

/// Extract a snapshot with the given configuration
pub fn extract(snapshot: &PageSnapshot, config: &ExtractorConfig) -> ContentRecord {
    Extractor::lenient(config.clone()).extract(snapshot)
}
