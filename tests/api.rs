// Transport integration tests against a local mock server. These pin the
// normalization contract: fast-fail auth, JSON content-type validation,
// API-rejection decoding, and the exact request bodies put on the wire.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use atlas_cli::api::types::{FunnelOptions, GenerateOptions, ImportOptions};
use atlas_cli::api::AtlasClient;
use atlas_cli::config::Settings;
use atlas_cli::error::AtlasError;
use atlas_cli::poll::{self, JobState, PollOptions};

fn client_for(server: &MockServer) -> AtlasClient {
    AtlasClient::new(Settings {
        api_key: Some("atlas_test_key_0123456789".into()),
        api_base: server.uri(),
    })
    .expect("client")
}

#[tokio::test]
async fn missing_api_key_fails_before_any_network_call() {
    let server = MockServer::start().await;
    let client = AtlasClient::new(Settings {
        api_key: None,
        api_base: server.uri(),
    })
    .expect("client");

    let err = client.store_status("job-1").await.unwrap_err();
    assert!(matches!(err, AtlasError::Unauthenticated));
    assert_eq!(err.code(), 401);

    let requests = server.received_requests().await.unwrap();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn submission_sends_auth_header_and_decodes_ack() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/stores/generate"))
        .and(header("X-Atlas-Api-Key", "atlas_test_key_0123456789"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "job_id": "gen-42",
            "status": "pending",
            "type": "single_product_shop",
            "poll_url": "/stores/gen-42/status"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client
        .generate_store(GenerateOptions {
            url: Some("https://amazon.com/dp/B08N5WRWNW".into()),
            ..GenerateOptions::default()
        })
        .await
        .expect("submission");

    assert_eq!(response.job_id, "gen-42");
    assert_eq!(response.status, "pending");
}

#[tokio::test]
async fn generate_body_omits_unset_optional_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/stores/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "job_id": "gen-1",
            "status": "pending"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .generate_store(GenerateOptions {
            url: Some("https://example.com/product".into()),
            ..GenerateOptions::default()
        })
        .await
        .expect("submission");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let object = body.as_object().unwrap();
    assert_eq!(object["url"], "https://example.com/product");
    assert_eq!(object["region"], "us");
    assert_eq!(object["language"], "en");
    assert_eq!(object["type"], "single_product_shop");
    for absent in [
        "shopify_product_id",
        "template_source",
        "template_id",
        "theme_id",
        "page_template_source",
        "product_page_template",
        "research_context_id",
    ] {
        assert!(!object.contains_key(absent), "unexpected key {absent}");
    }
}

#[tokio::test]
async fn import_body_is_empty_without_flags() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/stores/gen-1/import"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "import_job_id": "imp-1",
            "status": "pending"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .import_store("gen-1", ImportOptions::default())
        .await
        .expect("submission");

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn html_error_page_becomes_protocol_mismatch_with_bounded_snippet() {
    let server = MockServer::start().await;
    let page = format!("<html><body>{}</body></html>", "x".repeat(2000));
    Mock::given(method("GET"))
        .and(path("/stores/job-1/status"))
        .respond_with(ResponseTemplate::new(500).set_body_raw(page.clone(), "text/html"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.store_status("job-1").await.unwrap_err();
    match err {
        AtlasError::ProtocolMismatch {
            status,
            content_type,
            snippet,
        } => {
            assert_eq!(status, 500);
            assert!(content_type.contains("text/html"));
            assert!(snippet.chars().count() <= 500);
            assert!(snippet.starts_with("<html>"));
        }
        other => panic!("expected ProtocolMismatch, got {other:?}"),
    }
}

#[tokio::test]
async fn json_rejection_carries_error_field_and_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/stores/generate"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({ "error": "invalid url" })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .generate_store(GenerateOptions {
            url: Some("not-a-url".into()),
            ..GenerateOptions::default()
        })
        .await
        .unwrap_err();
    match err {
        AtlasError::ApiRejected {
            status,
            message,
            details,
        } => {
            assert_eq!(status, 422);
            assert_eq!(message, "invalid url");
            assert_eq!(details["error"], "invalid url");
        }
        other => panic!("expected ApiRejected, got {other:?}"),
    }
}

#[tokio::test]
async fn rejection_message_falls_back_to_message_field_then_generic() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/themes"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "message": "forbidden" })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.list_themes().await.unwrap_err();
    assert!(matches!(
        err,
        AtlasError::ApiRejected { status: 403, ref message, .. } if message == "forbidden"
    ));

    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/themes"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "detail": "???" })))
        .mount(&server)
        .await;

    let err = client.list_themes().await.unwrap_err();
    assert!(matches!(
        err,
        AtlasError::ApiRejected { status: 500, ref message, .. } if message == "API request failed"
    ));
}

#[tokio::test]
async fn repeated_status_reads_are_idempotent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stores/job-1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "job_id": "job-1",
            "status": "processing",
            "percentage_complete": 40,
            "history_id": 7
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let first = client.store_status("job-1").await.unwrap();
    let second = client.store_status("job-1").await.unwrap();
    assert_eq!(
        serde_json::to_value(&first).unwrap(),
        serde_json::to_value(&second).unwrap()
    );
}

#[tokio::test]
async fn product_listing_puts_pagination_in_the_query_string() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("limit", "10"))
        .and(query_param("cursor", "abc"))
        .and(query_param("query", "mug"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": [],
            "page_info": { "has_next_page": false }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client
        .list_products(10, Some("abc"), Some("mug"))
        .await
        .expect("listing");
    assert!(response.products.is_empty());
}

#[tokio::test]
async fn funnel_submission_omits_unset_fields_and_defaults_language() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/funnels/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "job_id": "fun-1",
            "status": "pending",
            "funnel_type": "listicle"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .generate_funnel(FunnelOptions {
            funnel_type: "listicle".into(),
            theme_id: "123".into(),
            url: Some("https://example.com/p".into()),
            ..FunnelOptions::default()
        })
        .await
        .expect("submission");

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let object = body.as_object().unwrap();
    assert_eq!(object["funnel_type"], "listicle");
    assert_eq!(object["theme_id"], "123");
    assert_eq!(object["language"], "en");
    for absent in ["headline", "angle", "tone", "shopify_product_id"] {
        assert!(!object.contains_key(absent), "unexpected key {absent}");
    }
}

// End-to-end: the generic engine driving the real transport through the
// documented pending → processing → completed progression.
#[tokio::test]
async fn polling_drives_a_generation_job_to_completion() {
    let server = MockServer::start().await;
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_in = hits.clone();
    Mock::given(method("GET"))
        .and(path("/stores/gen-9/status"))
        .respond_with(move |_req: &Request| -> ResponseTemplate {
            let step = hits_in.fetch_add(1, Ordering::SeqCst);
            let body = match step {
                0 => json!({ "job_id": "gen-9", "status": "pending", "percentage_complete": 0 }),
                1 => json!({ "job_id": "gen-9", "status": "processing", "percentage_complete": 40 }),
                2 => json!({ "job_id": "gen-9", "status": "processing", "percentage_complete": 90 }),
                _ => json!({
                    "job_id": "gen-9",
                    "status": "completed",
                    "percentage_complete": 100,
                    "result": { "product_name": "Widget" }
                }),
            };
            ResponseTemplate::new(200).set_body_json(body)
        })
        .expect(4)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let options = PollOptions {
        max_wait: Duration::from_secs(10),
        poll_interval: Duration::from_millis(10),
        retry_on_transport_error: false,
    };
    let cancel = CancellationToken::new();
    let mut progress = Vec::new();
    let mut on_progress = |status: &atlas_cli::api::types::StoreStatus| {
        progress.push(status.percentage_complete);
    };

    let final_status = poll::wait_for_completion(
        || client.store_status("gen-9"),
        &options,
        &cancel,
        Some(&mut on_progress),
    )
    .await
    .expect("wait");

    assert_eq!(final_status.status, JobState::Completed);
    assert_eq!(
        final_status
            .result
            .as_ref()
            .and_then(|r| r.product_name.as_deref()),
        Some("Widget")
    );
    assert_eq!(progress, vec![0.0, 40.0, 90.0, 100.0]);
    assert_eq!(server.received_requests().await.unwrap().len(), 4);
}
