//! エンドポイントプローバー
//!
//! 1エンドポイントに対して1回のHTTPチェックを行い、失敗時は1度だけリトライする。
//! 同時実行数は共有セマフォで制限し、許可はHTTP試行中だけ保持する
//! （リトライ前の待機中は他のエンドポイントに許可を譲る）。

use super::random_jitter;
use crate::config::MonitorConfig;
use crate::types::check::truncate_details;
use crate::types::{Endpoint, ProbeOutcome};
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::debug;

/// 1サイクル内の最大試行回数
pub const MAX_ATTEMPTS: usize = 2;

/// リトライ待機の設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 待機時間の基本値
    pub backoff_base: Duration,
    /// 基本値に加えるランダム幅の上限
    pub backoff_jitter: Duration,
}

impl RetryPolicy {
    /// 今回のリトライ前に待つ時間
    pub fn next_delay(&self) -> Duration {
        self.backoff_base + random_jitter(self.backoff_jitter)
    }
}

/// HTTPプローバー
///
/// `Clone`は内部の`Client`とセマフォを共有する。
#[derive(Clone)]
pub struct Prober {
    client: Client,
    limiter: Arc<Semaphore>,
    max_concurrency: usize,
    retry: RetryPolicy,
    details_max_chars: usize,
}

impl Prober {
    /// 設定からプローバーを作成
    ///
    /// `client`はリダイレクトを追従する設定（reqwestのデフォルト）であること。
    pub fn new(client: Client, config: &MonitorConfig) -> Self {
        let max_concurrency = config.max_concurrency.max(1);
        Self {
            client,
            limiter: Arc::new(Semaphore::new(max_concurrency)),
            max_concurrency,
            retry: RetryPolicy {
                backoff_base: config.retry_backoff,
                backoff_jitter: config.retry_jitter,
            },
            details_max_chars: config.details_max_chars,
        }
    }

    /// 同時実行数の上限
    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// 1回だけチェックする（リトライなし）
    pub async fn probe_once(&self, endpoint: &Endpoint) -> ProbeOutcome {
        let _permit = self.limiter.acquire().await.ok();
        self.attempt(endpoint).await
    }

    /// チェックし、失敗した場合は待機後に1度だけ再試行する
    pub async fn probe(&self, endpoint: &Endpoint) -> ProbeOutcome {
        let mut merged: Option<ProbeOutcome> = None;

        for attempt in 1..=MAX_ATTEMPTS {
            if attempt > 1 {
                let delay = self.retry.next_delay();
                debug!(
                    endpoint_id = %endpoint.id,
                    attempt = attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Retrying endpoint check"
                );
                tokio::time::sleep(delay).await;
            }

            let outcome = self.probe_once(endpoint).await;
            let success = outcome.success;
            merged = Some(match merged {
                None => outcome,
                Some(previous) => merge_attempts(previous, outcome),
            });

            if success {
                break;
            }
        }

        merged.unwrap_or_else(|| ProbeOutcome::transport_failure("no attempt made", 0))
    }

    async fn attempt(&self, endpoint: &Endpoint) -> ProbeOutcome {
        let timeout = Duration::from_millis(endpoint.timeout_ms.max(1));
        let mut request = self
            .client
            .request(endpoint.method.to_reqwest(), &endpoint.url)
            .timeout(timeout);
        for (name, value) in &endpoint.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let start = Instant::now();
        let outcome = match request.send().await {
            Ok(response) => ProbeOutcome::from_status(
                endpoint.expected_status,
                response.status().as_u16(),
                elapsed_ms(start),
            ),
            Err(e) => ProbeOutcome::transport_failure(describe_error(&e), elapsed_ms(start)),
        };

        ProbeOutcome {
            details: outcome
                .details
                .map(|d| truncate_details(&d, self.details_max_chars)),
            ..outcome
        }
    }
}

/// 2回目の試行結果を優先して1件にまとめる
///
/// 成否は2回目に従う。ステータス・経過時間・詳細は2回目が空（0/None）のとき
/// 1回目の値を使う。
pub fn merge_attempts(first: ProbeOutcome, second: ProbeOutcome) -> ProbeOutcome {
    ProbeOutcome {
        success: second.success,
        status_code: if second.status_code != 0 {
            second.status_code
        } else {
            first.status_code
        },
        response_time_ms: if second.response_time_ms != 0 {
            second.response_time_ms
        } else {
            first.response_time_ms
        },
        details: second
            .details
            .filter(|d| !d.is_empty())
            .or(first.details),
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// reqwestのエラーを原因チェーンごと文字列化する
fn describe_error(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
