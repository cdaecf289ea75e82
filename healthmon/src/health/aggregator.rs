//! サービス状態の集約
//!
//! サービスの状態は、配下の全エンドポイントの直近N件の結果だけで決まる。
//! 1件でも失敗があれば`UNHEALTHY`、すべて成功なら`HEALTHY`。結果が1件もなければ
//! 判定せず、状態と`last_checked`は以前の値のままにする。

use crate::common::error::MonitorError;
use crate::db::{check_results, services};
use crate::types::{Service, ServiceStatus};
use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

/// 直近の成否列（新しい順）から状態を導出する
///
/// 空の場合は`None`（判定不能）。
pub fn derive_status(recent: &[bool]) -> Option<ServiceStatus> {
    if recent.is_empty() {
        return None;
    }
    if recent.iter().all(|success| *success) {
        Some(ServiceStatus::Healthy)
    } else {
        Some(ServiceStatus::Unhealthy)
    }
}

/// 接続（またはトランザクション）上でサービス状態を再計算して保存する
///
/// 判定できた場合は新しい状態を返す。
pub async fn recompute_service_status(
    conn: &mut SqliteConnection,
    service_id: Uuid,
    window: usize,
    checked_at: DateTime<Utc>,
) -> Result<Option<ServiceStatus>, sqlx::Error> {
    let recent =
        check_results::list_recent_outcomes_for_service(&mut *conn, service_id, window.max(1))
            .await?;

    let Some(status) = derive_status(&recent) else {
        debug!(service_id = %service_id, "No check results yet, keeping previous status");
        return Ok(None);
    };

    services::update_service_status(&mut *conn, service_id, status, checked_at).await?;
    Ok(Some(status))
}

/// オンデマンドの状態再計算
#[derive(Clone)]
pub struct HealthAggregator {
    pool: SqlitePool,
    window: usize,
}

impl HealthAggregator {
    /// 新しいアグリゲーターを作成
    pub fn new(pool: SqlitePool, window: usize) -> Self {
        Self {
            pool,
            window: window.max(1),
        }
    }

    /// 判定に使う直近結果数
    pub fn window(&self) -> usize {
        self.window
    }

    /// 1サービスの状態を独立したトランザクションで再計算し、更新後のサービスを返す
    ///
    /// 実行中のサイクルと競合した場合は後から書いた方が残る。
    pub async fn recompute(&self, service_id: Uuid) -> Result<Service, MonitorError> {
        let mut tx = self.pool.begin().await?;

        if services::get_service(&mut *tx, service_id).await?.is_none() {
            return Err(MonitorError::ServiceNotFound(service_id.to_string()));
        }

        let status = recompute_service_status(&mut tx, service_id, self.window, Utc::now()).await?;

        let service = services::get_service(&mut *tx, service_id)
            .await?
            .ok_or_else(|| MonitorError::ServiceNotFound(service_id.to_string()))?;
        tx.commit().await?;

        info!(
            service = %service.name,
            status = ?status,
            "Service status recomputed"
        );
        Ok(service)
    }

    /// 名前で指定したサービスの状態を再計算
    pub async fn recompute_by_name(&self, name: &str) -> Result<Service, MonitorError> {
        let service = services::get_service_by_name(&self.pool, name)
            .await?
            .ok_or_else(|| MonitorError::ServiceNotFound(name.to_string()))?;
        self.recompute(service.id).await
    }
}
