//! In-process tests for the operation registry and the HTTP server.

mod common;

use context_sources::config::load_config;
use context_sources::server::router;
use context_sources::traits::OperationRegistry;
use serde_json::{json, Value};
use std::sync::Arc;

async fn registry() -> (tempfile::TempDir, Arc<OperationRegistry>) {
    let (tmp, config_path) = common::setup_env().await;
    let cfg = load_config(&config_path).unwrap();
    (tmp, Arc::new(OperationRegistry::from_config(&cfg).unwrap()))
}

async fn serve(registry: Arc<OperationRegistry>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(registry)).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn all_records_alias_holds_through_registry() {
    let (_tmp, reg) = registry().await;
    let all = reg.invoke("Sqlite.ReadAllLedgerRecords", json!({})).await.unwrap();
    let empty = reg
        .invoke("Sqlite.ReadUserLedgerRecords", json!({"userName": ""}))
        .await
        .unwrap();
    assert_eq!(all, empty);
}

#[tokio::test]
async fn concurrent_invocations_agree() {
    let (_tmp, reg) = registry().await;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let reg = reg.clone();
            tokio::spawn(async move { reg.invoke("Sqlite.ReadScores", Value::Null).await.unwrap() })
        })
        .collect();

    for h in handles {
        assert_eq!(
            h.await.unwrap(),
            r#"[{"studentName":"Alice","score":90},{"studentName":"Bob","score":85}]"#
        );
    }
}

#[tokio::test]
async fn http_lists_and_invokes_operations() {
    let (_tmp, reg) = registry().await;
    let base = serve(reg).await;
    let client = reqwest::Client::new();

    let health: Value = client
        .get(format!("{}/health", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");

    let list: Value = client
        .get(format!("{}/operations", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list["operations"].as_array().unwrap().len(), 5);

    let resp = client
        .post(format!("{}/operations/TextFile.ReadAll", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["result"], common::DEMO_TEXT);

    let resp = client
        .post(format!("{}/operations/Sqlite.ReadUserLedgerRecords", base))
        .json(&json!({"userName": "Alice"}))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let records: Value = serde_json::from_str(body["result"].as_str().unwrap()).unwrap();
    assert_eq!(records.as_array().unwrap().len(), 1);
    assert_eq!(records[0]["amount"], 30000);
}

#[tokio::test]
async fn http_maps_dispatch_errors() {
    let (_tmp, reg) = registry().await;
    let base = serve(reg).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/operations/Nope.Nothing", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "not_found");

    let resp = client
        .post(format!("{}/operations/Sqlite.ReadUserLedgerRecords", base))
        .json(&json!({"userName": 7}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "bad_request");

    let resp = client
        .post(format!("{}/operations/Sqlite.ReadScores", base))
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn http_source_faults_are_results() {
    let (_tmp, reg) = registry().await;
    let base = serve(reg).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/operations/PdfReader.ReadDocumentText", base))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert!(body["result"].as_str().unwrap().starts_with("File not found"));
}
