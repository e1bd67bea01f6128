//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises every client
//! operation over real HTTP through the default `ureq` transport.

use std::time::Duration;

use search_client_core::{ApiError, ClientConfig, HttpMethod, SearchClient, UploadFile};

/// Start the mock server on a random port and return its API base URL.
fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}/api")
}

fn file(name: &str, content: &str) -> UploadFile {
    UploadFile {
        name: name.to_string(),
        content: content.to_string(),
    }
}

#[test]
fn document_lifecycle() {
    let config = ClientConfig::new(&start_server()).with_timeout(Duration::from_secs(10));
    let client = SearchClient::new(config);

    // Step 1: health check.
    let greeting = client.hello().unwrap();
    assert!(!greeting.is_empty());

    // Step 2: list: should be empty.
    assert!(client.list_documents().unwrap().is_empty(), "expected empty list");

    // Step 3: upload two documents.
    let uploaded = client
        .upload_documents(&[
            file("rust.txt", "Rust is fast. Rust is safe."),
            file("go.txt", "Go is simple, and fast"),
        ])
        .unwrap();
    assert_eq!(uploaded.doc_ids.len(), 2);
    assert_eq!(uploaded.total_files, 2);

    // Step 4: list: both documents, in upload order.
    let docs = client.list_documents().unwrap();
    let names: Vec<&str> = docs.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["rust.txt", "go.txt"]);

    // Step 5: search: ranked matches per word.
    let results = client.search(&["fast", " rust ", ""]).unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].word, "fast");
    assert_eq!(results[0].total_count, 2);
    assert_eq!(results[1].word, "rust");
    assert_eq!(results[1].total_count, 2);
    assert_eq!(results[1].per_doc.len(), 1);
    assert_eq!(results[1].per_doc[0].doc_name, "rust.txt");

    // Step 6: stats.
    let stats = client.stats().unwrap();
    assert_eq!(stats.total_documents, 2);
    assert_eq!(stats.total_words, 11);

    // Step 7: delete the first document.
    let ack = client.delete_document(uploaded.doc_ids[0]).unwrap();
    assert!(ack.success);
    assert_eq!(ack.remaining, 1);

    // Step 8: delete it again: failure names the id.
    let err = client.delete_document(uploaded.doc_ids[0]).unwrap_err();
    assert!(err.is_not_found());
    let ApiError::Http { message, .. } = &err else {
        panic!("expected HTTP failure, got {err:?}");
    };
    assert!(message.contains(&uploaded.doc_ids[0].to_string()), "message: {message}");

    // Step 9: delete all, twice: both acknowledged.
    for _ in 0..2 {
        let ack = client.delete_all_documents().unwrap();
        assert!(ack.success);
        assert_eq!(ack.remaining, 0);
    }

    // Step 10: search on an empty index yields empty per-doc matches.
    let results = client.search(&["rust"]).unwrap();
    assert!(results[0].per_doc.is_empty());
    assert!(client.search::<&str>(&[]).unwrap().is_empty());
}

#[test]
fn generic_request_helper_round_trips() {
    let client = SearchClient::new(ClientConfig::new(&start_server()));

    let text = client.request_text(HttpMethod::Get, "/hello", None).unwrap();
    assert_eq!(text, mock_server::GREETING);

    let body = serde_json::json!([{"name": "a.txt", "content": "alpha beta"}]);
    let value: serde_json::Value = client
        .request(HttpMethod::Post, "upload", Some(&body))
        .unwrap();
    assert_eq!(value["doc_ids"], serde_json::json!([0]));
}

#[test]
fn unknown_route_is_http_failure_with_message() {
    let client = SearchClient::new(ClientConfig::new(&start_server()));

    let err = client
        .request::<serde_json::Value>(HttpMethod::Get, "/missing", None)
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert!(matches!(err, ApiError::Http { ref message, .. } if !message.is_empty()));
}

#[test]
fn malformed_body_is_http_failure() {
    let client = SearchClient::new(ClientConfig::new(&start_server()));

    let body = serde_json::json!({"query": "hello"});
    let err = client
        .request::<serde_json::Value>(HttpMethod::Post, "/search", Some(&body))
        .unwrap_err();
    assert_eq!(err.status(), Some(422));
}

#[test]
fn refused_connection_is_transport_failure() {
    // Bind then drop to obtain a port nothing listens on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let client = SearchClient::new(ClientConfig::new(&format!("http://{addr}/api")));

    let err = client.list_documents().unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)), "got {err:?}");
    assert_eq!(err.status(), None);
}
