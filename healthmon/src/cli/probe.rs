//! probe サブコマンド
//!
//! エンドポイントを1回だけチェックして結果を表示します。結果は記録しません。

use crate::bootstrap;
use crate::common::error::MonitorError;
use crate::db::endpoints;
use crate::types::ProbeOutcome;
use crate::AppState;
use anyhow::bail;
use clap::Args;
use uuid::Uuid;

/// probe サブコマンドの引数
#[derive(Args, Debug, Clone)]
pub struct ProbeArgs {
    /// Endpoint ID
    pub endpoint_id: Uuid,
}

/// Execute the probe command
///
/// 失敗時は非0で終了させるためにエラーを返す。
pub async fn execute(args: &ProbeArgs) -> Result<(), anyhow::Error> {
    let state = bootstrap::initialize().await?;
    let outcome = run(&state, args).await?;
    println!("{}", format_outcome(&outcome));
    if !outcome.success {
        bail!("probe failed for endpoint {}", args.endpoint_id);
    }
    Ok(())
}

/// 1回だけプローブする
pub async fn run(state: &AppState, args: &ProbeArgs) -> Result<ProbeOutcome, anyhow::Error> {
    let endpoint = endpoints::get_endpoint(&state.db_pool, args.endpoint_id)
        .await
        .map_err(MonitorError::from)?
        .ok_or(MonitorError::EndpointNotFound(args.endpoint_id))?;
    Ok(state.prober.probe_once(&endpoint).await)
}

fn format_outcome(outcome: &ProbeOutcome) -> String {
    let verdict = if outcome.success { "OK" } else { "FAIL" };
    match &outcome.details {
        Some(details) => format!(
            "{}\t{}\t{}ms\t{}",
            verdict, outcome.status_code, outcome.response_time_ms, details
        ),
        None => format!(
            "{}\t{}\t{}ms",
            verdict, outcome.status_code, outcome.response_time_ms
        ),
    }
}
