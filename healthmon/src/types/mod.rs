//! 型定義モジュール
//!
//! 監視対象（サービス・エンドポイント）とチェック結果の型定義を提供

/// サービス関連の型定義
pub mod service;

/// エンドポイント関連の型定義
pub mod endpoint;

/// チェック結果関連の型定義
pub mod check;

pub use check::{CheckResult, NewCheckResult, ProbeOutcome};
pub use endpoint::{DueEndpoint, Endpoint, HttpMethod, NewEndpoint};
pub use service::{Service, ServiceStatus};
