use crate::parsers::Extractor;
use crate::results::ContentRecord;
use crate::snapshot::PageSnapshot;
use serde::{Deserialize, Serialize};

/// Request sent to the page context, keyed by its `action` tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    /// Produce a full [`ContentRecord`]
    ExtractContent,
    /// Report only the current selection
    GetSelection,
}

/// Reply from the page context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    Content(ContentRecord),
    Selection { selection: String },
}

/// Answer a request against a snapshot
pub fn handle(request: Request, snapshot: &PageSnapshot, extractor: &Extractor) -> Response {
    ::log::debug!("Handling {:?} for {}", request, snapshot.url);
    match request {
        Request::ExtractContent => Response::Content(extractor.extract(snapshot)),
        Request::GetSelection => Response::Selection {
            selection: snapshot.selection.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_format() {
        let req: Request = serde_json::from_str(r#"{"action":"extractContent"}"#).unwrap();
        assert_eq!(req, Request::ExtractContent);
        let req: Request = serde_json::from_str(r#"{"action":"getSelection"}"#).unwrap();
        assert_eq!(req, Request::GetSelection);
        assert!(serde_json::from_str::<Request>(r#"{"action":"reload"}"#).is_err());
    }

    #[test]
    fn test_get_selection() {
        let snapshot = PageSnapshot::from_html("https://example.com/", "<p>hi</p>").with_selection("hi");
        let response = handle(Request::GetSelection, &snapshot, &Extractor::default());
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            serde_json::json!({ "selection": "hi" })
        );
    }

    #[test]
    fn test_extract_content() {
        let snapshot = PageSnapshot::from_html(
            "https://example.com/",
            "<title>Hello</title><body><a href=\"/x\">x</a></body>",
        );
        let Response::Content(record) = handle(Request::ExtractContent, &snapshot, &Extractor::default())
        else {
            panic!("expected content");
        };
        assert_eq!(record.title, "Hello");
        assert_eq!(record.links.len(), 1);
    }
}
