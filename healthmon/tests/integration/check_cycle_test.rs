//! Integration Test: 期限到来チェックの1サイクル
//!
//! 期限到来 → プローブ → 結果記録 → 次回実行日時の更新

use crate::support::http::unreachable_base_url;
use crate::support::monitor::{create_test_state, seed_endpoint, seed_service, test_config};
use chrono::Utc;
use healthmon::config::MonitorConfig;
use healthmon::db::{check_results, endpoints};
use healthmon::types::NewEndpoint;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_503_twice_records_failure_and_reschedules() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(503).set_delay(Duration::from_millis(10)))
        .expect(2)
        .mount(&server)
        .await;

    let state = create_test_state(test_config()).await;
    let service = seed_service(&state.db_pool, "twitter", &server.uri()).await;
    let endpoint = seed_endpoint(
        &state.db_pool,
        &service,
        NewEndpoint::new(format!("{}/health", server.uri())),
    )
    .await;

    let processed = state.runner.run_due_checks().await.unwrap();
    let after = Utc::now();
    assert_eq!(processed, 1);

    let results = check_results::list_results_for_endpoint(&state.db_pool, endpoint.id, 10)
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    let result = &results[0];
    assert!(!result.success);
    assert_eq!(result.status_code, 503);
    assert!(result.response_time_ms > 0);
    assert_eq!(result.details.as_deref(), Some("Expected 200 got 503"));

    // interval_sec(60) + jitter[0, 0.5s]
    let stored = endpoints::get_endpoint(&state.db_pool, endpoint.id)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.next_run_at > after);
    assert!(stored.next_run_at >= after + chrono::Duration::seconds(59));
    assert!(stored.next_run_at <= after + chrono::Duration::milliseconds(60_500));
}

#[tokio::test]
async fn test_unreachable_target_records_status_zero() {
    let base = unreachable_base_url().await;
    let state = create_test_state(test_config()).await;
    let service = seed_service(&state.db_pool, "offline", &base).await;
    let endpoint = seed_endpoint(
        &state.db_pool,
        &service,
        NewEndpoint::new(format!("{}/health", base)),
    )
    .await;

    assert_eq!(state.runner.run_due_checks().await.unwrap(), 1);

    let results = check_results::list_results_for_endpoint(&state.db_pool, endpoint.id, 10)
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert!(!results[0].success);
    assert_eq!(results[0].status_code, 0);
    let details = results[0].details.as_deref().unwrap_or_default();
    assert!(!details.is_empty());
}

#[tokio::test]
async fn test_disabled_endpoint_is_never_probed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/disabled"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/enabled"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let state = create_test_state(test_config()).await;
    let service = seed_service(&state.db_pool, "mixed", &server.uri()).await;
    let mut disabled = NewEndpoint::new(format!("{}/disabled", server.uri()));
    disabled.enabled = false;
    let disabled = seed_endpoint(&state.db_pool, &service, disabled).await;
    seed_endpoint(
        &state.db_pool,
        &service,
        NewEndpoint::new(format!("{}/enabled", server.uri())),
    )
    .await;

    assert_eq!(state.runner.run_due_checks().await.unwrap(), 1);
    let count = check_results::count_results_for_endpoint(&state.db_pool, disabled.id)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_batch_cap_defers_remaining_endpoints() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let config = MonitorConfig {
        max_concurrency: 50,
        ..test_config()
    };
    let state = create_test_state(config).await;
    let service = seed_service(&state.db_pool, "bulk", &server.uri()).await;
    for i in 0..501 {
        seed_endpoint(
            &state.db_pool,
            &service,
            NewEndpoint::new(format!("{}/e/{}", server.uri(), i)),
        )
        .await;
    }

    assert_eq!(state.runner.run_due_checks().await.unwrap(), 500);
    assert_eq!(state.runner.run_due_checks().await.unwrap(), 1);
    assert_eq!(state.runner.run_due_checks().await.unwrap(), 0);
}

#[tokio::test]
async fn test_idle_cycle_mutates_nothing() {
    let state = create_test_state(test_config()).await;
    let service = seed_service(&state.db_pool, "future", "http://future").await;
    let endpoint = seed_endpoint(
        &state.db_pool,
        &service,
        NewEndpoint::new("http://future/health"),
    )
    .await;
    let later = Utc::now() + chrono::Duration::minutes(5);
    endpoints::set_next_run_at(&state.db_pool, endpoint.id, later)
        .await
        .unwrap();

    assert_eq!(state.runner.run_due_checks().await.unwrap(), 0);

    let stored = endpoints::get_endpoint(&state.db_pool, endpoint.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        stored.next_run_at.timestamp_micros(),
        later.timestamp_micros()
    );
    let count = check_results::count_results_for_endpoint(&state.db_pool, endpoint.id)
        .await
        .unwrap();
    assert_eq!(count, 0);
}
