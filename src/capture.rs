use crate::results::{ContentRecord, LinkEntry};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What to include when submitting a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureOptions {
    /// Send outbound links along with a full capture
    pub capture_links: bool,
    /// Send only the selected text when there is a selection
    pub capture_selection: bool,
    /// Ask the server to re-process a page it has already seen
    pub force_update: bool,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            capture_links: true,
            capture_selection: false,
            force_update: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureMode {
    Selection,
    Full,
}

impl CaptureMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaptureMode::Selection => "selection",
            CaptureMode::Full => "full",
        }
    }
}

/// Body of `POST /api/ingest`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturePayload {
    pub url: String,
    pub title: String,
    pub text: String,
    pub html: String,
    pub links: Vec<LinkEntry>,
    pub metadata: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub force: bool,
}

impl CapturePayload {
    /// Build the outbound payload for a record.
    ///
    /// `capture_mode` records the requested mode. Only the selection text is
    /// sent when selection mode was requested and the record has a selection;
    /// otherwise the full record goes out.
    pub fn build(record: ContentRecord, options: &CaptureOptions, captured_at: DateTime<Utc>) -> Self {
        let mode = if options.capture_selection {
            CaptureMode::Selection
        } else {
            CaptureMode::Full
        };
        let selection_only = options.capture_selection && record.has_selection();

        let mut metadata = record.metadata;
        metadata.insert(
            "captured_at".to_string(),
            captured_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        );
        metadata.insert("capture_mode".to_string(), mode.as_str().to_string());

        let (text, html, links) = if selection_only {
            (record.selection, String::new(), Vec::new())
        } else {
            let links = if options.capture_links {
                record.links
            } else {
                Vec::new()
            };
            (record.text, record.html, links)
        };

        Self {
            url: record.url,
            title: record.title,
            text,
            html,
            links,
            metadata,
            force: options.force_update,
        }
    }

    /// The mode stamped into the metadata
    pub fn mode(&self) -> Option<&str> {
        self.metadata.get("capture_mode").map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record() -> ContentRecord {
        let mut record = ContentRecord::new("https://example.com/post");
        record.title = "Post".to_string();
        record.html = "<html></html>".to_string();
        record.text = "Full text".to_string();
        record.metadata.insert("author".to_string(), "A".to_string());
        record.links.push(LinkEntry {
            url: "https://example.com/x".to_string(),
            text: "x".to_string(),
            context: "see x".to_string(),
        });
        record
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap()
    }

    #[test]
    fn test_selection_mode() {
        let mut rec = record();
        rec.selection = "chosen".to_string();
        let options = CaptureOptions {
            capture_selection: true,
            ..CaptureOptions::default()
        };
        let payload = CapturePayload::build(rec, &options, at());

        assert_eq!(payload.text, "chosen");
        assert_eq!(payload.html, "");
        assert!(payload.links.is_empty());
        assert_eq!(payload.title, "Post");
        assert_eq!(payload.mode(), Some("selection"));
        assert_eq!(payload.metadata["author"], "A");
    }

    #[test]
    fn test_selection_requested_without_selection_sends_full_page() {
        let options = CaptureOptions {
            capture_selection: true,
            ..CaptureOptions::default()
        };
        let payload = CapturePayload::build(record(), &options, at());

        assert_eq!(payload.text, "Full text");
        assert_eq!(payload.html, "<html></html>");
        assert_eq!(payload.links.len(), 1);
        assert_eq!(payload.mode(), Some("selection"));
    }

    #[test]
    fn test_links_only_when_requested() {
        let options = CaptureOptions {
            capture_links: false,
            ..CaptureOptions::default()
        };
        let payload = CapturePayload::build(record(), &options, at());
        assert!(payload.links.is_empty());
        assert_eq!(payload.text, "Full text");
        assert_eq!(payload.mode(), Some("full"));
    }

    #[test]
    fn test_timestamp_and_force_flag() {
        let payload = CapturePayload::build(record(), &CaptureOptions::default(), at());
        assert_eq!(payload.metadata["captured_at"], "2024-05-06T07:08:09.000Z");

        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("force").is_none());

        let options = CaptureOptions {
            force_update: true,
            ..CaptureOptions::default()
        };
        let json = serde_json::to_value(CapturePayload::build(record(), &options, at())).unwrap();
        assert_eq!(json["force"], serde_json::json!(true));
    }
}
