//! Integration Test: 1回目失敗 → リトライ成功

use crate::support::monitor::{create_test_state, seed_endpoint, seed_service, test_config};
use healthmon::db::check_results;
use healthmon::types::NewEndpoint;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_retry_success_wins() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503).set_delay(Duration::from_millis(400)))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(5)))
        .mount(&server)
        .await;

    let state = create_test_state(test_config()).await;
    let service = seed_service(&state.db_pool, "flaky", &server.uri()).await;
    let endpoint = seed_endpoint(
        &state.db_pool,
        &service,
        NewEndpoint::new(format!("{}/flaky", server.uri())),
    )
    .await;

    assert_eq!(state.runner.run_due_checks().await.unwrap(), 1);

    let results = check_results::list_results_for_endpoint(&state.db_pool, endpoint.id, 10)
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert!(results[0].success);
    assert_eq!(results[0].status_code, 200);
    // 計測時間はリトライ側のもの
    assert!(results[0].response_time_ms >= 5);
    assert!(results[0].response_time_ms < 400);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}
