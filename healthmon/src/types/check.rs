//! チェック結果型定義

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 1回のプローブ（またはリトライ後の最終結果）の判定
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProbeOutcome {
    /// 期待ステータスと一致したか
    pub success: bool,
    /// 観測したHTTPステータスコード（応答前に失敗した場合は0）
    pub status_code: u16,
    /// 経過時間（ミリ秒）
    pub response_time_ms: u64,
    /// 不一致・エラーの説明
    pub details: Option<String>,
}

impl ProbeOutcome {
    /// 応答を受け取れたプローブの判定を作る
    pub fn from_status(expected: u16, observed: u16, response_time_ms: u64) -> Self {
        let success = observed == expected;
        Self {
            success,
            status_code: observed,
            response_time_ms,
            details: (!success).then(|| format!("Expected {} got {}", expected, observed)),
        }
    }

    /// トランスポート層で失敗したプローブの判定を作る
    pub fn transport_failure(error: impl Into<String>, response_time_ms: u64) -> Self {
        Self {
            success: false,
            status_code: 0,
            response_time_ms,
            details: Some(error.into()),
        }
    }
}

/// 永続化済みのチェック結果（追記専用）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckResult {
    /// 連番ID
    pub id: i64,
    /// 対象エンドポイントID
    pub endpoint_id: Uuid,
    /// 記録日時
    pub timestamp: DateTime<Utc>,
    /// 観測したステータスコード
    pub status_code: u16,
    /// 経過時間（ミリ秒）
    pub response_time_ms: u64,
    /// 成功フラグ
    pub success: bool,
    /// 詳細
    pub details: Option<String>,
}

/// チェック結果の挿入入力
#[derive(Debug, Clone, PartialEq)]
pub struct NewCheckResult {
    /// 対象エンドポイントID
    pub endpoint_id: Uuid,
    /// 記録日時
    pub timestamp: DateTime<Utc>,
    /// 最終判定
    pub outcome: ProbeOutcome,
}

/// 詳細文字列を最大文字数で切り詰める（文字境界を保つ）
pub fn truncate_details(details: &str, max_chars: usize) -> String {
    match details.char_indices().nth(max_chars) {
        Some((idx, _)) => details[..idx].to_string(),
        None => details.to_string(),
    }
}
