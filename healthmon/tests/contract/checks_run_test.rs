//! Contract Test: POST /api/checks/run

use crate::support::http::spawn_server;
use crate::support::monitor::{create_test_state, test_config};
use healthmon::api::create_app;
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn test_run_checks_returns_processed_field() {
    let state = create_test_state(test_config()).await;
    let server = spawn_server(create_app(state)).await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/checks/run", server.base_url()))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "processed": 0 }));

    server.stop().await;
}
