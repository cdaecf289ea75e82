//! 起動時の初期化ロジック
//!
//! データベース接続、マイグレーション、共有HTTPクライアント、メトリクスなど
//! serve / CLIコマンドが共通で使うコンポーネントの初期化を担当する。

use crate::common::error::MonitorError;
use crate::config::{self, MonitorConfig};
use crate::db::migrations::initialize_database;
use crate::AppState;
use std::time::Duration;
use tracing::info;

/// 共有HTTPクライアント（接続プーリング有効）を作成
///
/// リダイレクトはreqwestのデフォルト（最大10回）で追従する。
/// タイムアウトはエンドポイントごとにリクエスト単位で設定するため、ここでは設定しない。
pub fn build_http_client() -> Result<reqwest::Client, MonitorError> {
    reqwest::Client::builder()
        .pool_max_idle_per_host(32)
        .pool_idle_timeout(Duration::from_secs(60))
        .tcp_keepalive(Duration::from_secs(30))
        .user_agent(concat!("healthmon/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| MonitorError::Http(format!("Failed to create HTTP client: {}", e)))
}

/// 環境変数の設定で初期化する
pub async fn initialize() -> Result<AppState, MonitorError> {
    initialize_with(&config::database_url(), MonitorConfig::from_env()).await
}

/// 指定したDB URLと設定で初期化する
pub async fn initialize_with(
    database_url: &str,
    config: MonitorConfig,
) -> Result<AppState, MonitorError> {
    let db_pool = initialize_database(database_url).await?;
    let http_client = build_http_client()?;

    info!(
        batch_size = config.batch_size,
        max_concurrency = config.max_concurrency,
        health_window = config.health_window,
        "Monitor initialized"
    );

    AppState::new(db_pool, http_client, config)
}
