use canine_intake_server::{
    Document, DocumentRef, DocumentStore, FirestoreBackend, RetryPolicy,
};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend(server: &MockServer, token: Option<&str>) -> FirestoreBackend {
    FirestoreBackend::new(
        format!("{}/v1", server.uri()),
        "canine-demo".to_string(),
        token.map(str::to_string),
        RetryPolicy {
            max_attempts: 3,
            base_backoff_ms: 1,
        },
    )
}

#[tokio::test]
async fn add_commits_document_with_server_timestamp_transform() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex(r"/v1/projects/canine-demo/databases/\(default\)/documents:commit$"))
        .and(header("authorization", "Bearer ya29.test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "writeResults": [{}] })))
        .expect(1)
        .mount(&server)
        .await;

    let store = backend(&server, Some("ya29.test"));
    let created = store
        .add(
            "bookings_discovery_calls",
            Document::new()
                .with("dogName", "Pixel")
                .with("highPriority", true)
                .with_server_timestamp("createdAt"),
        )
        .await
        .expect("add");
    assert_eq!(created.collection, "bookings_discovery_calls");

    let received = server.received_requests().await.expect("recording enabled");
    let body: Value = serde_json::from_slice(&received[0].body).expect("commit json");
    let write = &body["writes"][0];
    assert!(write["update"]["name"]
        .as_str()
        .is_some_and(|n| n.ends_with(&format!("/bookings_discovery_calls/{}", created.id))));
    assert_eq!(
        write["update"]["fields"]["dogName"],
        json!({ "stringValue": "Pixel" })
    );
    assert_eq!(
        write["update"]["fields"]["highPriority"],
        json!({ "booleanValue": true })
    );
    assert_eq!(write["currentDocument"]["exists"], false);
    assert_eq!(
        write["updateTransforms"][0],
        json!({ "fieldPath": "createdAt", "setToServerValue": "REQUEST_TIME" })
    );
}

#[tokio::test]
async fn find_by_field_runs_equality_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex(r"documents:runQuery$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "document": {
                    "name": "projects/canine-demo/databases/(default)/documents/program_signups/sig42",
                    "fields": {}
                },
                "readTime": "2026-01-01T00:00:00Z"
            }
        ])))
        .mount(&server)
        .await;

    let store = backend(&server, None);
    let found = store
        .find_by_field("program_signups", "paymentIntentId", "pi_9")
        .await
        .expect("query");
    assert_eq!(
        found,
        Some(DocumentRef {
            collection: "program_signups".to_string(),
            id: "sig42".to_string(),
        })
    );

    let received = server.received_requests().await.expect("recording enabled");
    assert!(received[0].headers.get("authorization").is_none());
    let body: Value = serde_json::from_slice(&received[0].body).expect("query json");
    let query = &body["structuredQuery"];
    assert_eq!(query["from"][0]["collectionId"], "program_signups");
    assert_eq!(query["where"]["fieldFilter"]["op"], "EQUAL");
    assert_eq!(
        query["where"]["fieldFilter"]["value"],
        json!({ "stringValue": "pi_9" })
    );
    assert_eq!(query["limit"], 1);
}

#[tokio::test]
async fn empty_query_result_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex(r"documents:runQuery$"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "readTime": "2026-01-01T00:00:00Z" }])),
        )
        .mount(&server)
        .await;
    let found = backend(&server, None)
        .find_by_field("bookings_discovery_calls", "paymentIntentId", "pi_none")
        .await
        .expect("query");
    assert_eq!(found, None);
}

#[tokio::test]
async fn unavailable_is_retried_and_conflict_after_retry_counts_as_created() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex(r"documents:commit$"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex(r"documents:commit$"))
        .respond_with(ResponseTemplate::new(409))
        .mount(&server)
        .await;

    backend(&server, None)
        .add("program_signups", Document::new().with("dogName", "Nova"))
        .await
        .expect("add after retry");
    let received = server.received_requests().await.expect("recording enabled");
    assert_eq!(received.len(), 2);
}

#[tokio::test]
async fn update_sends_mask_and_fails_on_missing_document() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex(r"documents:commit$"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let target = DocumentRef {
        collection: "bookings_in_person_evaluations".to_string(),
        id: "gone".to_string(),
    };
    let err = backend(&server, None)
        .update(&target, Document::new().with("paymentStatus", "succeeded"))
        .await
        .expect_err("missing document");
    assert!(err.0.contains("404"));

    let received = server.received_requests().await.expect("recording enabled");
    let body: Value = serde_json::from_slice(&received[0].body).expect("commit json");
    assert_eq!(
        body["writes"][0]["updateMask"]["fieldPaths"],
        json!(["paymentStatus"])
    );
}
