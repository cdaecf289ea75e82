//! データベースアクセス層
//!
//! SQLiteベースのデータ永続化。
//!
//! 日時はすべてマイクロ秒精度・UTC固定幅のRFC3339文字列で保存する。
//! 文字列比較がそのまま時系列比較になるため、`next_run_at <= ?` や
//! `ORDER BY timestamp DESC` をインデックスで処理できる。

use chrono::{DateTime, SecondsFormat, Utc};

/// データベースマイグレーション
pub mod migrations;

/// サービス管理
pub mod services;

/// エンドポイント管理
pub mod endpoints;

/// チェック結果（追記専用）
pub mod check_results;

/// 日時を保存用の文字列に変換
pub fn format_ts(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// 保存された文字列を日時に戻す
pub(crate) fn parse_ts(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
