use serde::{Deserialize, Serialize};

/// Read-only copy of a document as it was at one moment.
///
/// Taken from a live WebDriver session or built from static HTML. Extraction
/// parses `html` each time and never writes back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSnapshot {
    /// Location of the document
    pub url: String,

    /// Markup of the document
    pub html: String,

    /// Text selected in the page when the snapshot was taken
    #[serde(default)]
    pub selection: String,
}

impl PageSnapshot {
    /// Build a snapshot from markup with no selection
    pub fn from_html(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
            selection: String::new(),
        }
    }

    /// Attach a text selection to the snapshot
    pub fn with_selection(mut self, selection: impl Into<String>) -> Self {
        self.selection = selection.into();
        self
    }
}
