//! REST APIハンドラー
//!
//! チェックサイクルの起動、手動プローブ、状態再計算、結果参照、メトリクス公開。

/// チェックサイクル起動
pub mod checks;
/// 手動プローブ・結果履歴
pub mod endpoints;
/// エラーレスポンス
pub mod error;
/// Prometheusメトリクス
pub mod metrics;
/// サービス状態再計算
pub mod services;

use crate::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// APIルーターを作成
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/metrics", get(metrics::prometheus_metrics))
        .route("/api/checks/run", post(checks::run_checks))
        .route("/api/endpoints/:id/probe", post(endpoints::probe_endpoint))
        .route("/api/endpoints/:id/results", get(endpoints::list_results))
        .route("/api/services/:id/recompute", post(services::recompute))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
