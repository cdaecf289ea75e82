//! サービスデータベース操作

use super::{format_ts, parse_ts};
use crate::types::{Service, ServiceStatus};
use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite, SqliteConnection};
use uuid::Uuid;

/// サービスを登録
pub async fn create_service<'e, E>(executor: E, service: &Service) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO services (id, name, url, status, last_checked, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(service.id.to_string())
    .bind(&service.name)
    .bind(&service.url)
    .bind(service.status.as_str())
    .bind(service.last_checked.map(format_ts))
    .bind(format_ts(service.created_at))
    .execute(executor)
    .await?;

    Ok(())
}

/// 名前でサービスを作成または更新（URLのみ更新、状態は保持）
pub async fn upsert_service(
    conn: &mut SqliteConnection,
    name: &str,
    url: &str,
) -> Result<Service, sqlx::Error> {
    let candidate = Service::new(name, url);
    sqlx::query(
        r#"
        INSERT INTO services (id, name, url, status, last_checked, created_at)
        VALUES (?, ?, ?, ?, NULL, ?)
        ON CONFLICT(name) DO UPDATE SET url = excluded.url
        "#,
    )
    .bind(candidate.id.to_string())
    .bind(&candidate.name)
    .bind(&candidate.url)
    .bind(candidate.status.as_str())
    .bind(format_ts(candidate.created_at))
    .execute(&mut *conn)
    .await?;

    get_service_by_name(&mut *conn, name)
        .await?
        .ok_or(sqlx::Error::RowNotFound)
}

/// IDでサービスを取得
pub async fn get_service<'e, E>(executor: E, id: Uuid) -> Result<Option<Service>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, ServiceRow>(
        r#"
        SELECT id, name, url, status, last_checked, created_at
        FROM services
        WHERE id = ?
        "#,
    )
    .bind(id.to_string())
    .fetch_optional(executor)
    .await?;

    Ok(row.map(Into::into))
}

/// 名前でサービスを取得
pub async fn get_service_by_name<'e, E>(
    executor: E,
    name: &str,
) -> Result<Option<Service>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, ServiceRow>(
        r#"
        SELECT id, name, url, status, last_checked, created_at
        FROM services
        WHERE name = ?
        "#,
    )
    .bind(name)
    .fetch_optional(executor)
    .await?;

    Ok(row.map(Into::into))
}

/// サービス一覧を取得
pub async fn list_services<'e, E>(executor: E) -> Result<Vec<Service>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query_as::<_, ServiceRow>(
        r#"
        SELECT id, name, url, status, last_checked, created_at
        FROM services
        ORDER BY name ASC
        "#,
    )
    .fetch_all(executor)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// 集約状態と最終判定日時を更新
pub async fn update_service_status<'e, E>(
    executor: E,
    id: Uuid,
    status: ServiceStatus,
    last_checked: DateTime<Utc>,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("UPDATE services SET status = ?, last_checked = ? WHERE id = ?")
        .bind(status.as_str())
        .bind(format_ts(last_checked))
        .bind(id.to_string())
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// サービスを削除（配下のエンドポイント・結果もカスケード削除）
pub async fn delete_service<'e, E>(executor: E, id: Uuid) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM services WHERE id = ?")
        .bind(id.to_string())
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[derive(sqlx::FromRow)]
struct ServiceRow {
    id: String,
    name: String,
    url: String,
    status: String,
    last_checked: Option<String>,
    created_at: String,
}

impl From<ServiceRow> for Service {
    fn from(row: ServiceRow) -> Self {
        Service {
            id: Uuid::parse_str(&row.id).unwrap_or_default(),
            name: row.name,
            url: row.url,
            status: row.status.parse().unwrap_or_default(),
            last_checked: row.last_checked.as_deref().and_then(parse_ts),
            created_at: parse_ts(&row.created_at).unwrap_or_else(Utc::now),
        }
    }
}
