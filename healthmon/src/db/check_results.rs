//! チェック結果データベース操作
//!
//! 結果は追記専用で、作成後に更新しない。

use super::{format_ts, parse_ts};
use crate::types::{CheckResult, NewCheckResult};
use chrono::Utc;
use sqlx::{Executor, Sqlite};
use uuid::Uuid;

/// チェック結果を記録（挿入した行IDを返す）
pub async fn insert_check_result<'e, E>(
    executor: E,
    result: &NewCheckResult,
) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let done = sqlx::query(
        r#"
        INSERT INTO check_results (
            endpoint_id, timestamp, status_code, response_time_ms, success, details
        ) VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(result.endpoint_id.to_string())
    .bind(format_ts(result.timestamp))
    .bind(result.outcome.status_code as i64)
    .bind(result.outcome.response_time_ms as i64)
    .bind(result.outcome.success)
    .bind(&result.outcome.details)
    .execute(executor)
    .await?;

    Ok(done.last_insert_rowid())
}

/// サービス配下の全エンドポイントの直近結果の成功フラグを新しい順に取得
///
/// 同一タイムスタンプは後から挿入されたもの（ID降順）を新しいとみなす。
pub async fn list_recent_outcomes_for_service<'e, E>(
    executor: E,
    service_id: Uuid,
    limit: usize,
) -> Result<Vec<bool>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar::<_, bool>(
        r#"
        SELECT r.success
        FROM check_results r
        JOIN endpoints e ON e.id = r.endpoint_id
        WHERE e.service_id = ?
        ORDER BY r.timestamp DESC, r.id DESC
        LIMIT ?
        "#,
    )
    .bind(service_id.to_string())
    .bind(limit as i64)
    .fetch_all(executor)
    .await
}

/// エンドポイントの結果を新しい順に取得
pub async fn list_results_for_endpoint<'e, E>(
    executor: E,
    endpoint_id: Uuid,
    limit: usize,
) -> Result<Vec<CheckResult>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query_as::<_, CheckResultRow>(
        r#"
        SELECT id, endpoint_id, timestamp, status_code, response_time_ms, success, details
        FROM check_results
        WHERE endpoint_id = ?
        ORDER BY timestamp DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(endpoint_id.to_string())
    .bind(limit as i64)
    .fetch_all(executor)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// エンドポイントの結果件数を取得
pub async fn count_results_for_endpoint<'e, E>(
    executor: E,
    endpoint_id: Uuid,
) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar("SELECT COUNT(*) FROM check_results WHERE endpoint_id = ?")
        .bind(endpoint_id.to_string())
        .fetch_one(executor)
        .await
}

#[derive(sqlx::FromRow)]
struct CheckResultRow {
    id: i64,
    endpoint_id: String,
    timestamp: String,
    status_code: i64,
    response_time_ms: i64,
    success: bool,
    details: Option<String>,
}

impl From<CheckResultRow> for CheckResult {
    fn from(row: CheckResultRow) -> Self {
        CheckResult {
            id: row.id,
            endpoint_id: Uuid::parse_str(&row.endpoint_id).unwrap_or_default(),
            timestamp: parse_ts(&row.timestamp).unwrap_or_else(Utc::now),
            status_code: u16::try_from(row.status_code).unwrap_or(0),
            response_time_ms: row.response_time_ms.max(0) as u64,
            success: row.success,
            details: row.details,
        }
    }
}
