//! チェックランナー
//!
//! 1回の呼び出しで「期限到来チェック」サイクルを1回実行する。
//!
//! 1. 有効かつ`next_run_at <= now`のエンドポイントを古い順に最大`batch_size`件選ぶ
//! 2. 並列にプローブする（同時実行数はプローバーのセマフォで制限）
//! 3. 1トランザクションで結果の記録・次回実行日時の更新・サービス状態の再計算を行う
//!
//! ネットワーク処理中はDB接続を保持しない。永続化に失敗した場合は何もコミットしない。
//! 同一ランナー（とその`Clone`）のサイクルは直列に実行される。

use super::aggregator::recompute_service_status;
use super::prober::Prober;
use super::random_jitter;
use crate::common::error::MonitorError;
use crate::config::MonitorConfig;
use crate::db::{check_results, endpoints};
use crate::metrics::MetricsSink;
use crate::types::{DueEndpoint, Endpoint, NewCheckResult, ProbeOutcome};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use sqlx::SqlitePool;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// 期限到来エンドポイントを処理するランナー
#[derive(Clone)]
pub struct CheckRunner {
    pool: SqlitePool,
    prober: Prober,
    metrics: Arc<dyn MetricsSink>,
    batch_size: usize,
    schedule_jitter: Duration,
    health_window: usize,
    cycle_lock: Arc<Mutex<()>>,
}

impl CheckRunner {
    /// 新しいランナーを作成
    pub fn new(
        pool: SqlitePool,
        prober: Prober,
        metrics: Arc<dyn MetricsSink>,
        config: &MonitorConfig,
    ) -> Self {
        Self {
            pool,
            prober,
            metrics,
            batch_size: config.batch_size.max(1),
            schedule_jitter: config.schedule_jitter,
            health_window: config.health_window.max(1),
            cycle_lock: Arc::new(Mutex::new(())),
        }
    }

    /// 共有しているプローバー
    pub fn prober(&self) -> &Prober {
        &self.prober
    }

    /// 1サイクル実行し、処理したエンドポイント数を返す
    ///
    /// 期限到来がなければ何も変更せずに0を返す。
    /// 実行中のサイクルがあれば、その完了を待ってから期限到来を選び直す。
    pub async fn run_due_checks(&self) -> Result<usize, MonitorError> {
        let _cycle = self.cycle_lock.lock().await;
        let started = Instant::now();
        let now = Utc::now();

        let due = endpoints::list_due_endpoints(&self.pool, now, self.batch_size).await?;
        if due.is_empty() {
            debug!("No endpoints due");
            return Ok(0);
        }

        debug!(
            count = due.len(),
            max_concurrency = self.prober.max_concurrency(),
            "Probing due endpoints"
        );

        let outcomes = join_all(due.iter().map(|d| self.prober.probe(&d.endpoint))).await;

        for (item, outcome) in due.iter().zip(&outcomes) {
            self.metrics.record_check(
                &item.service_name,
                item.endpoint.id,
                item.endpoint.method,
                outcome,
            );
            log_outcome(item, outcome);
        }

        self.persist(&due, outcomes).await?;

        let processed = due.len();
        info!(
            processed = processed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Check cycle completed"
        );
        Ok(processed)
    }

    /// 次回実行日時は永続化開始時点を基準にする
    async fn persist(
        &self,
        due: &[DueEndpoint],
        outcomes: Vec<ProbeOutcome>,
    ) -> Result<(), MonitorError> {
        let persisted_at = Utc::now();
        let mut tx = self.pool.begin().await?;
        let mut touched = BTreeSet::new();

        for (item, outcome) in due.iter().zip(outcomes) {
            let endpoint = &item.endpoint;
            check_results::insert_check_result(
                &mut *tx,
                &NewCheckResult {
                    endpoint_id: endpoint.id,
                    timestamp: Utc::now(),
                    outcome,
                },
            )
            .await?;

            let next_run_at =
                next_run_at(persisted_at, endpoint, random_jitter(self.schedule_jitter));
            endpoints::set_next_run_at(&mut *tx, endpoint.id, next_run_at).await?;
            touched.insert(endpoint.service_id);
        }

        let checked_at = Utc::now();
        for service_id in touched {
            recompute_service_status(&mut tx, service_id, self.health_window, checked_at).await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

/// 次回実行日時 = 基準時刻 + max(1, interval_sec)秒 + jitter
pub fn next_run_at(now: DateTime<Utc>, endpoint: &Endpoint, jitter: Duration) -> DateTime<Utc> {
    let interval = Duration::from_secs(endpoint.interval_sec.max(1));
    let offset = chrono::Duration::from_std(interval + jitter)
        .unwrap_or_else(|_| chrono::Duration::seconds(endpoint.interval_sec.max(1) as i64));
    now + offset
}

fn log_outcome(item: &DueEndpoint, outcome: &ProbeOutcome) {
    if outcome.success {
        debug!(
            service = %item.service_name,
            endpoint_id = %item.endpoint.id,
            status_code = outcome.status_code,
            latency_ms = outcome.response_time_ms,
            "Endpoint check succeeded"
        );
    } else {
        warn!(
            service = %item.service_name,
            endpoint_id = %item.endpoint.id,
            url = %item.endpoint.url,
            status_code = outcome.status_code,
            latency_ms = outcome.response_time_ms,
            details = ?outcome.details,
            "Endpoint check failed"
        );
    }
}
