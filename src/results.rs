use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outbound link found on a page, with the text around it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkEntry {
    /// Resolved target URL
    pub url: String,

    /// Visible anchor text, or the URL when the anchor has none
    pub text: String,

    /// Text window around the anchor inside its parent element
    pub context: String,
}

/// Normalized snapshot of a page's content
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRecord {
    /// Location of the document
    pub url: String,

    /// Document title, empty if absent
    pub title: String,

    /// Serialized document markup
    pub html: String,

    /// Visible text of the body
    pub text: String,

    /// Meta tag values plus derived fields; one value per key
    pub metadata: BTreeMap<String, String>,

    /// Outbound links in document order, unique by URL
    pub links: Vec<LinkEntry>,

    /// Current text selection, possibly empty
    pub selection: String,
}

impl ContentRecord {
    /// Create an empty record for the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Whether the page had a non-empty text selection
    pub fn has_selection(&self) -> bool {
        !self.selection.is_empty()
    }
}
