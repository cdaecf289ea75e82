//! Integration Test: 同時実行数の上限

use crate::support::http::spawn_server;
use crate::support::monitor::{create_test_state, seed_endpoint, seed_service, test_config};
use axum::{extract::State, routing::get, Router};
use healthmon::config::MonitorConfig;
use healthmon::types::NewEndpoint;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone, Default)]
struct InFlight {
    current: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

async fn slow_handler(State(counter): State<InFlight>) -> &'static str {
    let now = counter.current.fetch_add(1, Ordering::SeqCst) + 1;
    counter.peak.fetch_max(now, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(50)).await;
    counter.current.fetch_sub(1, Ordering::SeqCst);
    "ok"
}

#[tokio::test]
async fn test_in_flight_probes_never_exceed_cap() {
    let counter = InFlight::default();
    let app = Router::new()
        .route("/slow/:n", get(slow_handler))
        .with_state(counter.clone());
    let upstream = spawn_server(app).await;

    let config = MonitorConfig {
        max_concurrency: 5,
        ..test_config()
    };
    let state = create_test_state(config).await;
    let service = seed_service(&state.db_pool, "slow", &upstream.base_url()).await;
    for i in 0..50 {
        seed_endpoint(
            &state.db_pool,
            &service,
            NewEndpoint::new(format!("{}/slow/{}", upstream.base_url(), i)),
        )
        .await;
    }

    assert_eq!(state.runner.run_due_checks().await.unwrap(), 50);

    let peak = counter.peak.load(Ordering::SeqCst);
    assert!(peak <= 5, "peak in-flight probes was {}", peak);
    assert!(peak >= 2, "probes did not run in parallel (peak {})", peak);

    upstream.stop().await;
}
