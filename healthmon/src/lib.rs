//! healthmon - HTTPエンドポイント死活監視エンジン
//!
//! 登録されたサービスのエンドポイントを定期的にチェックし、結果を記録して
//! サービスごとの状態（HEALTHY / UNHEALTHY / UNKNOWN）を維持する。

#![warn(missing_docs)]

/// 共通型（エラー定義）
pub mod common;

/// 設定管理（環境変数ヘルパー）
pub mod config;

/// ロギング初期化
pub mod logging;

/// ドメイン型
pub mod types;

/// データベースアクセス
pub mod db;

/// Prometheusメトリクス
pub mod metrics;

/// プローブ・スケジューリング・状態集約
pub mod health;

/// インベントリ（YAML）インポート
pub mod inventory;

/// REST APIハンドラー
pub mod api;

/// 起動時の初期化処理
pub mod bootstrap;

/// CLIインターフェース
pub mod cli;

/// axumサーバー起動・シャットダウンハンドリング
pub mod server;

use common::error::MonitorError;
use config::MonitorConfig;
use health::{CheckRunner, HealthAggregator, Prober};
use metrics::MonitorMetrics;
use std::sync::Arc;

/// アプリケーション状態
#[derive(Clone)]
pub struct AppState {
    /// データベース接続プール
    pub db_pool: sqlx::SqlitePool,
    /// 共有HTTPクライアント（接続プーリング有効）
    pub http_client: reqwest::Client,
    /// プロセス共通のメトリクスレジストリ
    pub metrics: Arc<MonitorMetrics>,
    /// プローバー（同時実行数の上限を共有）
    pub prober: Prober,
    /// 期限到来チェックのランナー
    pub runner: CheckRunner,
    /// サービス状態のオンデマンド再計算
    pub aggregator: HealthAggregator,
    /// 監視設定
    pub config: MonitorConfig,
}

impl AppState {
    /// 共有リソースからアプリケーション状態を組み立てる
    ///
    /// プローバーはランナーと手動プローブで共有するため、同時実行数の上限も共通になる。
    pub fn new(
        db_pool: sqlx::SqlitePool,
        http_client: reqwest::Client,
        config: MonitorConfig,
    ) -> Result<Self, MonitorError> {
        let metrics = Arc::new(MonitorMetrics::new()?);
        let prober = Prober::new(http_client.clone(), &config);
        let runner = CheckRunner::new(db_pool.clone(), prober.clone(), metrics.clone(), &config);
        let aggregator = HealthAggregator::new(db_pool.clone(), config.health_window);

        Ok(Self {
            db_pool,
            http_client,
            metrics,
            prober,
            runner,
            aggregator,
            config,
        })
    }
}
