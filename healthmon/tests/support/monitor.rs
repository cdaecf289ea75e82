use std::time::Duration;

use healthmon::config::MonitorConfig;
use healthmon::db::migrations::initialize_database;
use healthmon::db::{endpoints, services};
use healthmon::types::{Endpoint, NewEndpoint, Service};
use healthmon::AppState;
use sqlx::SqlitePool;

/// テスト用のインメモリDBプール（マイグレーション済み）
pub async fn create_test_db_pool() -> SqlitePool {
    initialize_database("sqlite::memory:")
        .await
        .expect("Failed to create in-memory SQLite pool")
}

/// リトライ待機を短くしたテスト用設定
#[allow(dead_code)]
pub fn test_config() -> MonitorConfig {
    MonitorConfig {
        retry_backoff: Duration::from_millis(10),
        retry_jitter: Duration::from_millis(10),
        tick_interval: None,
        ..MonitorConfig::default()
    }
}

/// テスト用のアプリケーション状態
#[allow(dead_code)]
pub async fn create_test_state(config: MonitorConfig) -> AppState {
    let pool = create_test_db_pool().await;
    AppState::new(pool, reqwest::Client::new(), config).expect("Failed to build app state")
}

/// サービスを登録する
#[allow(dead_code)]
pub async fn seed_service(pool: &SqlitePool, name: &str, url: &str) -> Service {
    let service = Service::new(name, url);
    services::create_service(pool, &service)
        .await
        .expect("Failed to create service");
    service
}

/// 期限到来済みのエンドポイントを登録する
#[allow(dead_code)]
pub async fn seed_endpoint(pool: &SqlitePool, service: &Service, input: NewEndpoint) -> Endpoint {
    let endpoint = Endpoint::from_new(service.id, input.validated().expect("invalid endpoint"));
    endpoints::create_endpoint(pool, &endpoint)
        .await
        .expect("Failed to create endpoint");
    endpoint
}
