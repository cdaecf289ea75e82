//! Configuration management via environment variables
//!
//! Provides helper functions for reading environment variables with fallback
//! to deprecated variable names with warning logs, and the tuning knobs of the
//! check runner.

use std::time::Duration;

/// Get an environment variable with fallback to a deprecated name
///
/// If the new variable name is set, returns its value.
/// If only the old (deprecated) variable name is set, returns its value
/// and logs a deprecation warning.
///
/// # Example
/// ```
/// use healthmon::config::get_env_with_fallback;
///
/// let url = get_env_with_fallback("HEALTHMON_DATABASE_URL", "DATABASE_URL");
/// ```
pub fn get_env_with_fallback(new_name: &str, old_name: &str) -> Option<String> {
    if let Ok(val) = std::env::var(new_name) {
        return Some(val);
    }
    if let Ok(val) = std::env::var(old_name) {
        tracing::warn!(
            "Environment variable '{}' is deprecated, use '{}' instead",
            old_name,
            new_name
        );
        return Some(val);
    }
    None
}

/// Get an environment variable with fallback and default value
pub fn get_env_with_fallback_or(new_name: &str, old_name: &str, default: &str) -> String {
    get_env_with_fallback(new_name, old_name).unwrap_or_else(|| default.to_string())
}

/// Get an environment variable with fallback, parsing to a specific type
///
/// Returns `default` if neither variable is set or parsing fails.
pub fn get_env_with_fallback_parse<T: std::str::FromStr>(
    new_name: &str,
    old_name: &str,
    default: T,
) -> T {
    get_env_with_fallback(new_name, old_name)
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

/// デフォルトのデータベースURLを取得
///
/// `HEALTHMON_DATABASE_URL`（旧: `DATABASE_URL`）が未設定の場合は
/// `~/.healthmon/healthmon.db` を使う。
pub fn database_url() -> String {
    get_env_with_fallback("HEALTHMON_DATABASE_URL", "DATABASE_URL").unwrap_or_else(|| {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string());
        format!("sqlite:{}/.healthmon/healthmon.db", home)
    })
}

/// チェックランナーの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    /// 1サイクルで処理するエンドポイント数の上限
    pub batch_size: usize,
    /// 同時に実行するプローブ数の上限
    pub max_concurrency: usize,
    /// リトライ前の待機時間（基本値）
    pub retry_backoff: Duration,
    /// リトライ待機に加えるランダム幅の上限
    pub retry_jitter: Duration,
    /// 次回実行時刻に加えるランダム幅の上限
    pub schedule_jitter: Duration,
    /// サービス状態の判定に使う直近結果数
    pub health_window: usize,
    /// 詳細文字列の最大文字数
    pub details_max_chars: usize,
    /// serveモードでの定期実行間隔（Noneで無効）
    pub tick_interval: Option<Duration>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            batch_size: 500,
            max_concurrency: 20,
            retry_backoff: Duration::from_millis(200),
            retry_jitter: Duration::from_millis(300),
            schedule_jitter: Duration::from_millis(500),
            health_window: 10,
            details_max_chars: 2000,
            tick_interval: Some(Duration::from_secs(15)),
        }
    }
}

impl MonitorConfig {
    /// Load runner configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let batch_size =
            get_env_with_fallback_parse("HEALTHMON_BATCH_SIZE", "BATCH_SIZE", defaults.batch_size);
        let max_concurrency = get_env_with_fallback_parse(
            "HEALTHMON_MAX_CONCURRENCY",
            "MAX_CONCURRENCY",
            defaults.max_concurrency,
        );
        let retry_backoff_ms =
            get_env_with_fallback_parse("HEALTHMON_RETRY_BACKOFF_MS", "RETRY_BACKOFF_MS", 200u64);
        let retry_jitter_ms =
            get_env_with_fallback_parse("HEALTHMON_RETRY_JITTER_MS", "RETRY_JITTER_MS", 300u64);
        let schedule_jitter_ms = get_env_with_fallback_parse(
            "HEALTHMON_SCHEDULE_JITTER_MS",
            "SCHEDULE_JITTER_MS",
            500u64,
        );
        let health_window = get_env_with_fallback_parse(
            "HEALTHMON_HEALTH_WINDOW",
            "HEALTH_WINDOW",
            defaults.health_window,
        );
        let details_max_chars = get_env_with_fallback_parse(
            "HEALTHMON_DETAILS_MAX_CHARS",
            "DETAILS_MAX_CHARS",
            defaults.details_max_chars,
        );
        let tick_secs = get_env_with_fallback_parse(
            "HEALTHMON_TICK_INTERVAL_SECS",
            "TICK_INTERVAL_SECS",
            15u64,
        );

        Self {
            batch_size: batch_size.max(1),
            max_concurrency: max_concurrency.max(1),
            retry_backoff: Duration::from_millis(retry_backoff_ms),
            retry_jitter: Duration::from_millis(retry_jitter_ms),
            schedule_jitter: Duration::from_millis(schedule_jitter_ms),
            health_window: health_window.max(1),
            details_max_chars,
            tick_interval: (tick_secs > 0).then(|| Duration::from_secs(tick_secs)),
        }
    }
}
