//! Contract Test: GET /metrics

use crate::support::http::spawn_server;
use crate::support::monitor::{create_test_state, seed_endpoint, seed_service, test_config};
use healthmon::api::create_app;
use healthmon::types::NewEndpoint;
use reqwest::StatusCode;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_metrics_exposes_three_families_after_cycle() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&upstream)
        .await;

    let state = create_test_state(test_config()).await;
    let service = seed_service(&state.db_pool, "catalog", &upstream.uri()).await;
    let mut input = NewEndpoint::new(format!("{}/health", upstream.uri()));
    input.expected_status = 204;
    let endpoint = seed_endpoint(&state.db_pool, &service, input).await;

    let server = spawn_server(create_app(state)).await;
    let client = reqwest::Client::new();

    let run = client
        .post(format!("{}/api/checks/run", server.base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(run.status(), StatusCode::OK);

    let response = client
        .get(format!("{}/metrics", server.base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("text/plain; version=0.0.4"));

    let body = response.text().await.unwrap();
    let endpoint_label = format!("endpoint_id=\"{}\"", endpoint.id);
    assert!(body.contains("# TYPE monitor_checks_total counter"));
    assert!(body.contains("# TYPE monitor_check_latency_ms histogram"));
    assert!(body.contains("# TYPE monitor_check_response_status counter"));
    assert!(body.contains(&endpoint_label));
    assert!(body.contains("service=\"catalog\""));
    assert!(body.contains("status_code=\"204\""));
    assert!(body.contains("success=\"true\""));

    server.stop().await;
}
