//! Integration Test: サイクル後のサービス状態

use crate::support::monitor::{create_test_state, seed_endpoint, seed_service, test_config};
use healthmon::db::{endpoints, services};
use healthmon::types::{NewEndpoint, ServiceStatus};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_one_failing_endpoint_makes_service_unhealthy() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let state = create_test_state(test_config()).await;
    let healthy = seed_service(&state.db_pool, "healthy", &server.uri()).await;
    seed_endpoint(
        &state.db_pool,
        &healthy,
        NewEndpoint::new(format!("{}/ok", server.uri())),
    )
    .await;

    let degraded = seed_service(&state.db_pool, "degraded", &server.uri()).await;
    seed_endpoint(
        &state.db_pool,
        &degraded,
        NewEndpoint::new(format!("{}/ok", server.uri())),
    )
    .await;
    seed_endpoint(
        &state.db_pool,
        &degraded,
        NewEndpoint::new(format!("{}/broken", server.uri())),
    )
    .await;

    assert_eq!(state.runner.run_due_checks().await.unwrap(), 3);

    let healthy = services::get_service(&state.db_pool, healthy.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(healthy.status, ServiceStatus::Healthy);
    let degraded = services::get_service(&state.db_pool, degraded.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(degraded.status, ServiceStatus::Unhealthy);
}

#[tokio::test]
async fn test_service_without_due_endpoints_keeps_status() {
    let state = create_test_state(test_config()).await;
    let service = seed_service(&state.db_pool, "idle", "http://idle").await;
    let endpoint = seed_endpoint(
        &state.db_pool,
        &service,
        NewEndpoint::new("http://idle/health"),
    )
    .await;
    endpoints::set_enabled(&state.db_pool, endpoint.id, false)
        .await
        .unwrap();

    assert_eq!(state.runner.run_due_checks().await.unwrap(), 0);

    let stored = services::get_service(&state.db_pool, service.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, ServiceStatus::Unknown);
    assert!(stored.last_checked.is_none());
}
