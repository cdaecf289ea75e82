//! recompute サブコマンド

use crate::bootstrap;
use crate::health::HealthAggregator;
use crate::types::Service;
use clap::Args;

/// recompute サブコマンドの引数
#[derive(Args, Debug, Clone)]
pub struct RecomputeArgs {
    /// Service name
    pub service: String,
}

/// Execute the recompute command
pub async fn execute(args: &RecomputeArgs) -> Result<(), anyhow::Error> {
    let state = bootstrap::initialize().await?;
    let service = run(&state.aggregator, args).await?;
    println!("{}\t{}", service.name, service.status);
    Ok(())
}

/// 名前でサービスを引いて状態を再計算する
pub async fn run(
    aggregator: &HealthAggregator,
    args: &RecomputeArgs,
) -> Result<Service, anyhow::Error> {
    Ok(aggregator.recompute_by_name(args.service.trim()).await?)
}
