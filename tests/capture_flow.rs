use page_capture::client::IngestStats;
use page_capture::{Capture, CaptureConfig, CaptureError, CaptureOptions, SourceType};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE: &str = r#"<html><head><title>Notes</title>
<meta name="author" content="Sam"></head>
<body><p>Read <a href="/next">the next part</a> soon.</p></body></html>"#;

fn capture(server: &MockServer) -> Capture {
    let mut config = CaptureConfig::default();
    config.server.server_url = server.uri();
    Capture::new(SourceType::Html {
        url: "https://example.com/notes".to_string(),
        html: PAGE.to_string(),
    })
    .with_config(config)
}

async fn mount_status(server: &MockServer, ingesting: bool) {
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ingesting": ingesting })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn full_capture_is_submitted() {
    let server = MockServer::start().await;
    mount_status(&server, false).await;
    Mock::given(method("POST"))
        .and(path("/api/ingest"))
        .and(body_partial_json(json!({
            "url": "https://example.com/notes",
            "title": "Notes",
            "text": "Read the next part soon.",
            "links": [{
                "url": "https://example.com/next",
                "text": "the next part",
                "context": "Read the next part soon."
            }],
            "metadata": { "author": "Sam", "capture_mode": "full" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "stats": { "entities": 1, "links": 1 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = capture(&server)
        .submit(&CaptureOptions::default())
        .await
        .unwrap();
    assert_eq!(outcome.stats, Some(IngestStats { entities: 1, links: 1 }));
}

#[tokio::test]
async fn selection_capture_drops_markup_and_links() {
    let server = MockServer::start().await;
    mount_status(&server, false).await;
    Mock::given(method("POST"))
        .and(path("/api/ingest"))
        .and(body_partial_json(json!({
            "text": "next part",
            "html": "",
            "links": [],
            "force": true,
            "metadata": { "capture_mode": "selection" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let options = CaptureOptions {
        capture_links: true,
        capture_selection: true,
        force_update: true,
    };
    capture(&server)
        .with_selection("next part")
        .submit(&options)
        .await
        .unwrap();
}

#[tokio::test]
async fn busy_server_refuses_capture() {
    let server = MockServer::start().await;
    mount_status(&server, true).await;
    Mock::given(method("POST"))
        .and(path("/api/ingest"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = capture(&server)
        .submit(&CaptureOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, CaptureError::Rejected(_)));
}

#[tokio::test]
async fn html_file_source() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("saved.html");
    std::fs::write(&file, PAGE).unwrap();

    let record = Capture::new(SourceType::File {
        path: file,
        url: Some("https://example.com/notes".to_string()),
    })
    .extract()
    .await
    .unwrap();

    assert_eq!(record.title, "Notes");
    assert_eq!(record.links[0].url, "https://example.com/next");
}

#[tokio::test]
async fn missing_html_file_is_extraction_error() {
    let record = Capture::new(SourceType::File {
        path: "/definitely/not/here.html".into(),
        url: None,
    })
    .extract()
    .await;
    assert!(matches!(record, Err(CaptureError::Extraction(_))));
}
