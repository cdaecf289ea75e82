//! サービス型定義

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// サービスの集約ヘルス状態
///
/// 直近のチェック結果ウィンドウから導出される。判定材料がない間は`Unknown`のまま。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceStatus {
    /// 直近ウィンドウがすべて成功
    Healthy,
    /// 直近ウィンドウに失敗が含まれる
    Unhealthy,
    /// 未判定
    #[default]
    Unknown,
}

impl ServiceStatus {
    /// ServiceStatusを文字列に変換
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy => "HEALTHY",
            Self::Unhealthy => "UNHEALTHY",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl FromStr for ServiceStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "HEALTHY" => Self::Healthy,
            "UNHEALTHY" => Self::Unhealthy,
            _ => Self::Unknown,
        })
    }
}

impl std::fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 監視対象サービス
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Service {
    /// 一意識別子
    pub id: Uuid,
    /// サービス名（一意）
    pub name: String,
    /// ベースURL
    pub url: String,
    /// 集約ヘルス状態
    pub status: ServiceStatus,
    /// 最後に状態が判定された日時
    pub last_checked: Option<DateTime<Utc>>,
    /// 登録日時
    pub created_at: DateTime<Utc>,
}

impl Service {
    /// 新しいサービスを作成（状態は未判定）
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            url: url.into(),
            status: ServiceStatus::Unknown,
            last_checked: None,
            created_at: Utc::now(),
        }
    }
}
