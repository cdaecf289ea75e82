//! Contract Test: POST /api/endpoints/:id/probe

use crate::support::http::{spawn_server, unreachable_base_url};
use crate::support::monitor::{create_test_state, seed_endpoint, seed_service, test_config};
use healthmon::api::create_app;
use healthmon::db::check_results;
use healthmon::types::NewEndpoint;
use reqwest::StatusCode;
use serde_json::Value;
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_probe_success_contract() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&upstream)
        .await;

    let state = create_test_state(test_config()).await;
    let service = seed_service(&state.db_pool, "probe-ok", &upstream.uri()).await;
    let endpoint = seed_endpoint(
        &state.db_pool,
        &service,
        NewEndpoint::new(format!("{}/health", upstream.uri())),
    )
    .await;
    let pool = state.db_pool.clone();
    let server = spawn_server(create_app(state)).await;

    let response = reqwest::Client::new()
        .post(format!(
            "{}/api/endpoints/{}/probe",
            server.base_url(),
            endpoint.id
        ))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["ok"], true);
    assert_eq!(body["status_code"], 200);
    assert_eq!(body["expected"], 200);
    assert!(body["response_time_ms"].is_u64());
    assert!(body.get("error").is_none());

    // 手動プローブは結果を記録しない
    let count = check_results::count_results_for_endpoint(&pool, endpoint.id)
        .await
        .unwrap();
    assert_eq!(count, 0);

    server.stop().await;
}

#[tokio::test]
async fn test_probe_unreachable_returns_424() {
    let base = unreachable_base_url().await;
    let state = create_test_state(test_config()).await;
    let service = seed_service(&state.db_pool, "probe-down", &base).await;
    let endpoint = seed_endpoint(
        &state.db_pool,
        &service,
        NewEndpoint::new(format!("{}/health", base)),
    )
    .await;
    let server = spawn_server(create_app(state)).await;

    let response = reqwest::Client::new()
        .post(format!(
            "{}/api/endpoints/{}/probe",
            server.base_url(),
            endpoint.id
        ))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FAILED_DEPENDENCY);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["ok"], false);
    assert_eq!(body["status_code"], 0);
    assert_eq!(body["expected"], 200);
    assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));

    server.stop().await;
}

#[tokio::test]
async fn test_probe_unknown_endpoint_returns_404() {
    let state = create_test_state(test_config()).await;
    let server = spawn_server(create_app(state)).await;

    let response = reqwest::Client::new()
        .post(format!(
            "{}/api/endpoints/{}/probe",
            server.base_url(),
            Uuid::new_v4()
        ))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "ENDPOINT_NOT_FOUND");
    assert_eq!(body["error"], "Endpoint not found");

    server.stop().await;
}
