//! エンドポイント型定義
//!
//! サービス配下の個々のチェック対象（URL + メソッド）と、その入力検証。

use crate::common::error::MonitorError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use uuid::Uuid;

/// チェック間隔の下限（秒）
pub const MIN_INTERVAL_SEC: u64 = 15;
/// チェック間隔の上限（秒）
pub const MAX_INTERVAL_SEC: u64 = i32::MAX as u64;
/// タイムアウトの上限（ミリ秒）
pub const MAX_TIMEOUT_MS: u64 = i32::MAX as u64;
/// デフォルトのチェック間隔（秒）
pub const DEFAULT_INTERVAL_SEC: u64 = 60;
/// デフォルトのタイムアウト（ミリ秒）
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;
/// デフォルトの期待ステータスコード
pub const DEFAULT_EXPECTED_STATUS: u16 = 200;

/// チェックに使用するHTTPメソッド
///
/// 入力は大文字小文字を区別せず、保存・表示は大文字で統一する。
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// GET
    #[default]
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
    /// PATCH
    Patch,
    /// HEAD
    Head,
    /// OPTIONS
    Options,
}

impl HttpMethod {
    /// HttpMethodを文字列に変換
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }

    /// reqwestのメソッド型に変換
    pub fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
            Self::Patch => reqwest::Method::PATCH,
            Self::Head => reqwest::Method::HEAD,
            Self::Options => reqwest::Method::OPTIONS,
        }
    }
}

impl FromStr for HttpMethod {
    type Err = MonitorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "" | "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            "PATCH" => Ok(Self::Patch),
            "HEAD" => Ok(Self::Head),
            "OPTIONS" => Ok(Self::Options),
            other => Err(MonitorError::Validation(format!(
                "unsupported method: {}",
                other
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for HttpMethod {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 監視対象エンドポイント
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Endpoint {
    /// 一意識別子
    pub id: Uuid,
    /// 所属サービスID
    pub service_id: Uuid,
    /// チェック対象URL
    pub url: String,
    /// HTTPメソッド
    pub method: HttpMethod,
    /// 成功とみなすステータスコード
    pub expected_status: u16,
    /// リクエストタイムアウト（ミリ秒）
    pub timeout_ms: u64,
    /// チェック間隔（秒）
    pub interval_sec: u64,
    /// 付与するリクエストヘッダー
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// 有効フラグ
    pub enabled: bool,
    /// 次回チェック予定日時
    pub next_run_at: DateTime<Utc>,
    /// 登録日時
    pub created_at: DateTime<Utc>,
}

impl Endpoint {
    /// 入力からエンドポイントを作成（次回実行は即時）
    pub fn from_new(service_id: Uuid, input: NewEndpoint) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            service_id,
            url: input.url,
            method: input.method,
            expected_status: input.expected_status,
            timeout_ms: input.timeout_ms,
            interval_sec: input.interval_sec,
            headers: input.headers,
            enabled: input.enabled,
            next_run_at: now,
            created_at: now,
        }
    }
}

/// 期限到来エンドポイント（サービス名付き）
///
/// ランナーはメトリクスのラベルにサービス名を使うため、選択時に結合しておく。
#[derive(Debug, Clone, PartialEq)]
pub struct DueEndpoint {
    /// エンドポイント本体
    pub endpoint: Endpoint,
    /// 所属サービス名
    pub service_name: String,
}

/// エンドポイント登録入力
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewEndpoint {
    /// チェック対象URL
    pub url: String,
    /// HTTPメソッド
    #[serde(default)]
    pub method: HttpMethod,
    /// 成功とみなすステータスコード
    #[serde(default = "default_expected_status")]
    pub expected_status: u16,
    /// リクエストタイムアウト（ミリ秒）
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// チェック間隔（秒）
    #[serde(default = "default_interval_sec")]
    pub interval_sec: u64,
    /// 付与するリクエストヘッダー
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// 有効フラグ
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_expected_status() -> u16 {
    DEFAULT_EXPECTED_STATUS
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_interval_sec() -> u64 {
    DEFAULT_INTERVAL_SEC
}

fn default_enabled() -> bool {
    true
}

impl NewEndpoint {
    /// デフォルト値でエンドポイント入力を作成
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: HttpMethod::Get,
            expected_status: DEFAULT_EXPECTED_STATUS,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            interval_sec: DEFAULT_INTERVAL_SEC,
            headers: BTreeMap::new(),
            enabled: true,
        }
    }

    /// サービスのベースURLから既定の`/health`エンドポイントを作る
    pub fn default_health(base_url: &str) -> Self {
        Self {
            timeout_ms: 3000,
            ..Self::new(format!("{}/health", base_url.trim_end_matches('/')))
        }
    }

    /// 入力を検証し、URLを正規化した値を返す
    pub fn validated(mut self) -> Result<Self, MonitorError> {
        self.url = normalize_url(&self.url)?;
        if self.timeout_ms == 0 {
            return Err(MonitorError::Validation(
                "timeout_ms must be greater than 0".to_string(),
            ));
        }
        if self.timeout_ms > MAX_TIMEOUT_MS {
            return Err(MonitorError::Validation(format!(
                "timeout_ms must be at most {} (got {})",
                MAX_TIMEOUT_MS, self.timeout_ms
            )));
        }
        validate_interval(self.interval_sec)?;
        if !(100..=599).contains(&self.expected_status) {
            return Err(MonitorError::Validation(format!(
                "expected_status out of range: {}",
                self.expected_status
            )));
        }
        Ok(self)
    }
}

/// チェック間隔を検証
pub fn validate_interval(interval_sec: u64) -> Result<(), MonitorError> {
    if interval_sec < MIN_INTERVAL_SEC {
        return Err(MonitorError::Validation(format!(
            "interval_sec must be at least {} (got {})",
            MIN_INTERVAL_SEC, interval_sec
        )));
    }
    if interval_sec > MAX_INTERVAL_SEC {
        return Err(MonitorError::Validation(format!(
            "interval_sec must be at most {} (got {})",
            MAX_INTERVAL_SEC, interval_sec
        )));
    }
    Ok(())
}

/// URLを検証して末尾の`/`を取り除く
///
/// http/https かつホストを持つURLのみ受け付ける。
pub fn normalize_url(raw: &str) -> Result<String, MonitorError> {
    let trimmed = raw.trim();
    let parsed = reqwest::Url::parse(trimmed)
        .map_err(|e| MonitorError::Validation(format!("invalid url '{}': {}", trimmed, e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(MonitorError::Validation(format!(
            "url must use http or https: {}",
            trimmed
        )));
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(MonitorError::Validation(format!(
            "url must include a host: {}",
            trimmed
        )));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}
