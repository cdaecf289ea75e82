//! プローブ結果のメトリクス
//!
//! プロセス全体で1つのレジストリを起動時に作成し、ランナーとHTTP層で共有する。
//! 記録は副作用のみで、失敗してもプローブや永続化を止めない。

use crate::common::error::MonitorError;
use crate::types::{HttpMethod, ProbeOutcome};
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use uuid::Uuid;

/// レイテンシヒストグラムのバケット（ミリ秒）
pub const LATENCY_BUCKETS_MS: &[f64] = &[
    5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0,
];

/// プローブ結果の記録先
pub trait MetricsSink: Send + Sync {
    /// リトライ後の最終結果を1件記録する
    fn record_check(
        &self,
        service: &str,
        endpoint_id: Uuid,
        method: HttpMethod,
        outcome: &ProbeOutcome,
    );
}

/// Prometheusレジストリを持つメトリクス
#[derive(Clone)]
pub struct MonitorMetrics {
    registry: Registry,
    checks_total: IntCounterVec,
    check_latency_ms: HistogramVec,
    response_status: IntCounterVec,
}

impl MonitorMetrics {
    /// 専用レジストリを作成し、3系列を登録する
    pub fn new() -> Result<Self, MonitorError> {
        let registry = Registry::new();

        let checks_total = IntCounterVec::new(
            Opts::new("monitor_checks_total", "Total endpoint checks"),
            &["service", "endpoint_id", "method", "success"],
        )?;
        let check_latency_ms = HistogramVec::new(
            HistogramOpts::new("monitor_check_latency_ms", "Endpoint check latency in ms")
                .buckets(LATENCY_BUCKETS_MS.to_vec()),
            &["service", "endpoint_id", "method"],
        )?;
        let response_status = IntCounterVec::new(
            Opts::new(
                "monitor_check_response_status",
                "Observed response status codes (0 = transport failure)",
            ),
            &["service", "endpoint_id", "method", "status_code"],
        )?;

        registry.register(Box::new(checks_total.clone()))?;
        registry.register(Box::new(check_latency_ms.clone()))?;
        registry.register(Box::new(response_status.clone()))?;

        Ok(Self {
            registry,
            checks_total,
            check_latency_ms,
            response_status,
        })
    }

    /// テキスト形式のContent-Type
    pub fn content_type(&self) -> String {
        TextEncoder::new().format_type().to_string()
    }

    /// 現在の状態をテキスト形式で出力する
    pub fn render(&self) -> Result<String, MonitorError> {
        let encoder = TextEncoder::new();
        let families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| MonitorError::Metrics(e.to_string()))
    }

    fn try_record(
        &self,
        service: &str,
        endpoint_id: &str,
        method: &str,
        outcome: &ProbeOutcome,
    ) -> Result<(), prometheus::Error> {
        let success = if outcome.success { "true" } else { "false" };
        let status_code = outcome.status_code.to_string();

        self.checks_total
            .get_metric_with_label_values(&[service, endpoint_id, method, success])?
            .inc();
        self.check_latency_ms
            .get_metric_with_label_values(&[service, endpoint_id, method])?
            .observe(outcome.response_time_ms as f64);
        self.response_status
            .get_metric_with_label_values(&[service, endpoint_id, method, &status_code])?
            .inc();
        Ok(())
    }
}

impl MetricsSink for MonitorMetrics {
    fn record_check(
        &self,
        service: &str,
        endpoint_id: Uuid,
        method: HttpMethod,
        outcome: &ProbeOutcome,
    ) {
        let endpoint_id = endpoint_id.to_string();
        if let Err(e) = self.try_record(service, &endpoint_id, method.as_str(), outcome) {
            tracing::warn!(
                service = service,
                endpoint_id = %endpoint_id,
                error = %e,
                "Failed to record check metrics"
            );
        }
    }
}
