//! インベントリ（監視対象一覧）のインポート
//!
//! YAMLで記述したサービスとエンドポイントをストアへ取り込む。
//!
//! ```yaml
//! services:
//!   - name: twitter
//!     url: http://twitter:8000
//!     endpoints:
//!       - url: http://twitter:8000/health
//!         method: GET
//!         interval_sec: 60
//! ```
//!
//! サービスは名前で作成/更新し、エンドポイントは (service, url, method) で
//! 取得または作成する。既存エンドポイントの`next_run_at`は変更しない。
//! エンドポイントを列挙しないサービスには既定の`{url}/health`を登録する。

use crate::common::error::MonitorError;
use crate::db::{endpoints, services};
use crate::types::endpoint::normalize_url;
use crate::types::{Endpoint, NewEndpoint};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;

/// インベントリ全体
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Inventory {
    /// サービス一覧
    #[serde(default)]
    pub services: Vec<ServiceEntry>,
}

/// インベントリ内のサービス定義
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceEntry {
    /// サービス名
    pub name: String,
    /// ベースURL
    pub url: String,
    /// エンドポイント定義（省略時は`{url}/health`）
    #[serde(default)]
    pub endpoints: Vec<NewEndpoint>,
}

/// インポート結果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// 作成または更新したサービス数
    pub services: usize,
    /// 新規作成したエンドポイント数
    pub endpoints_created: usize,
    /// 設定を更新した既存エンドポイント数
    pub endpoints_updated: usize,
}

impl Inventory {
    /// YAML文字列からインベントリを読み込む
    pub fn from_yaml(raw: &str) -> Result<Self, MonitorError> {
        serde_yaml::from_str(raw).map_err(|e| MonitorError::Inventory(e.to_string()))
    }

    /// ファイルからインベントリを読み込む
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, MonitorError> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            MonitorError::Inventory(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&raw)
    }

    /// 全エントリを検証し、正規化済みの定義を返す
    pub fn validated(&self) -> Result<Vec<ServiceEntry>, MonitorError> {
        self.services
            .iter()
            .map(|entry| {
                let name = entry.name.trim();
                if name.is_empty() {
                    return Err(MonitorError::Validation(
                        "service name must not be empty".to_string(),
                    ));
                }
                let url = normalize_url(&entry.url)?;
                let endpoints = if entry.endpoints.is_empty() {
                    vec![NewEndpoint::default_health(&url)]
                } else {
                    entry.endpoints.clone()
                };
                let endpoints = endpoints
                    .into_iter()
                    .map(NewEndpoint::validated)
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| match e {
                        MonitorError::Validation(msg) => {
                            MonitorError::Validation(format!("service '{}': {}", name, msg))
                        }
                        other => other,
                    })?;
                Ok(ServiceEntry {
                    name: name.to_string(),
                    url,
                    endpoints,
                })
            })
            .collect()
    }
}

/// インベントリを1トランザクションで取り込む
///
/// 1件でも検証に失敗した場合は何も書き込まない。
pub async fn import_inventory(
    pool: &SqlitePool,
    inventory: &Inventory,
) -> Result<ImportSummary, MonitorError> {
    let entries = inventory.validated()?;
    let mut summary = ImportSummary::default();
    let mut tx = pool.begin().await?;

    for entry in &entries {
        let service = services::upsert_service(&mut tx, &entry.name, &entry.url).await?;
        summary.services += 1;

        for input in &entry.endpoints {
            match endpoints::find_endpoint(&mut *tx, service.id, &input.url, input.method).await? {
                Some(existing) => {
                    endpoints::update_endpoint_settings(&mut *tx, existing.id, input).await?;
                    summary.endpoints_updated += 1;
                }
                None => {
                    let endpoint = Endpoint::from_new(service.id, input.clone());
                    endpoints::create_endpoint(&mut *tx, &endpoint).await?;
                    summary.endpoints_created += 1;
                }
            }
        }
    }

    tx.commit().await?;

    info!(
        services = summary.services,
        endpoints_created = summary.endpoints_created,
        endpoints_updated = summary.endpoints_updated,
        "Inventory imported"
    );
    Ok(summary)
}
