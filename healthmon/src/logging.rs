//! ロギング初期化
//!
//! `HEALTHMON_LOG_LEVEL`（未設定時は`RUST_LOG`）でフィルタを、
//! `HEALTHMON_LOG_FORMAT=json` で出力形式を切り替える。

use crate::common::error::MonitorError;
use crate::config::get_env_with_fallback;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// グローバルなtracingサブスクライバを初期化する
pub fn init() -> Result<(), MonitorError> {
    let env_filter = build_filter(std::env::var("HEALTHMON_LOG_LEVEL").ok().as_deref());

    let log_format =
        get_env_with_fallback("HEALTHMON_LOG_FORMAT", "RUST_LOG_FORMAT").unwrap_or_default();

    let log_layer = match log_format.as_str() {
        "json" => tracing_subscriber::fmt::layer()
            .json()
            .with_filter(env_filter)
            .boxed(),
        _ => tracing_subscriber::fmt::layer()
            .compact()
            .with_filter(env_filter)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(log_layer)
        .try_init()
        .map_err(|e| MonitorError::Config(format!("failed to initialize logging: {}", e)))
}

fn build_filter(directive: Option<&str>) -> EnvFilter {
    match directive {
        Some(directive) if !directive.trim().is_empty() => {
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .parse_lossy(directive)
        }
        _ => EnvFilter::builder()
            .with_default_directive(LevelFilter::INFO.into())
            .from_env_lossy(),
    }
}
