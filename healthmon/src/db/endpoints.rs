//! エンドポイントデータベース操作
//!
//! `next_run_at`はチェックランナーのみが更新する。それ以外の更新は
//! 管理操作（有効/無効、間隔変更、即時実行）に限られる。

use super::{format_ts, parse_ts};
use crate::types::{DueEndpoint, Endpoint, HttpMethod, NewEndpoint};
use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite};
use std::collections::BTreeMap;
use uuid::Uuid;

const ENDPOINT_COLUMNS: &str = r#"
    e.id, e.service_id, e.url, e.method, e.expected_status, e.timeout_ms,
    e.interval_sec, e.headers, e.enabled, e.next_run_at, e.created_at
"#;

/// エンドポイントを登録
pub async fn create_endpoint<'e, E>(executor: E, endpoint: &Endpoint) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let headers = encode_headers(&endpoint.headers);

    sqlx::query(
        r#"
        INSERT INTO endpoints (
            id, service_id, url, method, expected_status, timeout_ms,
            interval_sec, headers, enabled, next_run_at, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(endpoint.id.to_string())
    .bind(endpoint.service_id.to_string())
    .bind(&endpoint.url)
    .bind(endpoint.method.as_str())
    .bind(endpoint.expected_status as i64)
    .bind(endpoint.timeout_ms as i64)
    .bind(endpoint.interval_sec as i64)
    .bind(headers)
    .bind(endpoint.enabled)
    .bind(format_ts(endpoint.next_run_at))
    .bind(format_ts(endpoint.created_at))
    .execute(executor)
    .await?;

    Ok(())
}

/// IDでエンドポイントを取得
pub async fn get_endpoint<'e, E>(executor: E, id: Uuid) -> Result<Option<Endpoint>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("SELECT {} FROM endpoints e WHERE e.id = ?", ENDPOINT_COLUMNS);
    let row = sqlx::query_as::<_, EndpointRow>(&sql)
        .bind(id.to_string())
        .fetch_optional(executor)
        .await?;

    Ok(row.map(Into::into))
}

/// (service, url, method) でエンドポイントを取得
pub async fn find_endpoint<'e, E>(
    executor: E,
    service_id: Uuid,
    url: &str,
    method: HttpMethod,
) -> Result<Option<Endpoint>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        "SELECT {} FROM endpoints e WHERE e.service_id = ? AND e.url = ? AND e.method = ?",
        ENDPOINT_COLUMNS
    );
    let row = sqlx::query_as::<_, EndpointRow>(&sql)
        .bind(service_id.to_string())
        .bind(url)
        .bind(method.as_str())
        .fetch_optional(executor)
        .await?;

    Ok(row.map(Into::into))
}

/// サービス配下のエンドポイント一覧を取得
pub async fn list_endpoints_for_service<'e, E>(
    executor: E,
    service_id: Uuid,
) -> Result<Vec<Endpoint>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        "SELECT {} FROM endpoints e WHERE e.service_id = ? ORDER BY e.created_at ASC, e.url ASC",
        ENDPOINT_COLUMNS
    );
    let rows = sqlx::query_as::<_, EndpointRow>(&sql)
        .bind(service_id.to_string())
        .fetch_all(executor)
        .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// 実行期限が到来した有効なエンドポイントを取得
///
/// `next_run_at`昇順で最大`limit`件。メトリクス用にサービス名も結合して返す。
pub async fn list_due_endpoints<'e, E>(
    executor: E,
    now: DateTime<Utc>,
    limit: usize,
) -> Result<Vec<DueEndpoint>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        r#"
        SELECT {}, s.name AS service_name
        FROM endpoints e
        JOIN services s ON s.id = e.service_id
        WHERE e.enabled = 1 AND e.next_run_at <= ?
        ORDER BY e.next_run_at ASC
        LIMIT ?
        "#,
        ENDPOINT_COLUMNS
    );
    let rows = sqlx::query_as::<_, DueEndpointRow>(&sql)
        .bind(format_ts(now))
        .bind(limit as i64)
        .fetch_all(executor)
        .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// 次回実行日時を更新
pub async fn set_next_run_at<'e, E>(
    executor: E,
    id: Uuid,
    next_run_at: DateTime<Utc>,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("UPDATE endpoints SET next_run_at = ? WHERE id = ?")
        .bind(format_ts(next_run_at))
        .bind(id.to_string())
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// 有効/無効を切り替える
pub async fn set_enabled<'e, E>(executor: E, id: Uuid, enabled: bool) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("UPDATE endpoints SET enabled = ? WHERE id = ?")
        .bind(enabled)
        .bind(id.to_string())
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// 次回実行を即時にする（次のサイクルで拾われる）
pub async fn schedule_now<'e, E>(executor: E, id: Uuid) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    set_next_run_at(executor, id, Utc::now()).await
}

/// チェック間隔を変更（値の検証は呼び出し側で行う）
pub async fn update_interval<'e, E>(
    executor: E,
    id: Uuid,
    interval_sec: u64,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("UPDATE endpoints SET interval_sec = ? WHERE id = ?")
        .bind(interval_sec as i64)
        .bind(id.to_string())
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// 管理項目（期待値・タイムアウト・間隔・ヘッダー・有効フラグ）を更新
///
/// `next_run_at` は変更しない。
pub async fn update_endpoint_settings<'e, E>(
    executor: E,
    id: Uuid,
    input: &NewEndpoint,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        UPDATE endpoints SET
            expected_status = ?, timeout_ms = ?, interval_sec = ?, headers = ?, enabled = ?
        WHERE id = ?
        "#,
    )
    .bind(input.expected_status as i64)
    .bind(input.timeout_ms as i64)
    .bind(input.interval_sec as i64)
    .bind(encode_headers(&input.headers))
    .bind(input.enabled)
    .bind(id.to_string())
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

fn encode_headers(headers: &BTreeMap<String, String>) -> Option<String> {
    if headers.is_empty() {
        None
    } else {
        serde_json::to_string(headers).ok()
    }
}

#[derive(sqlx::FromRow)]
struct EndpointRow {
    id: String,
    service_id: String,
    url: String,
    method: String,
    expected_status: i64,
    timeout_ms: i64,
    interval_sec: i64,
    headers: Option<String>,
    enabled: bool,
    next_run_at: String,
    created_at: String,
}

impl From<EndpointRow> for Endpoint {
    fn from(row: EndpointRow) -> Self {
        Endpoint {
            id: Uuid::parse_str(&row.id).unwrap_or_default(),
            service_id: Uuid::parse_str(&row.service_id).unwrap_or_default(),
            url: row.url,
            method: row.method.parse().unwrap_or_default(),
            expected_status: u16::try_from(row.expected_status).unwrap_or(200),
            timeout_ms: row.timeout_ms.max(0) as u64,
            interval_sec: row.interval_sec.max(0) as u64,
            headers: row
                .headers
                .and_then(|s| serde_json::from_str(&s).ok())
                .unwrap_or_default(),
            enabled: row.enabled,
            next_run_at: parse_ts(&row.next_run_at).unwrap_or_else(Utc::now),
            created_at: parse_ts(&row.created_at).unwrap_or_else(Utc::now),
        }
    }
}

#[derive(sqlx::FromRow)]
struct DueEndpointRow {
    #[sqlx(flatten)]
    endpoint: EndpointRow,
    service_name: String,
}

impl From<DueEndpointRow> for DueEndpoint {
    fn from(row: DueEndpointRow) -> Self {
        DueEndpoint {
            endpoint: row.endpoint.into(),
            service_name: row.service_name,
        }
    }
}
