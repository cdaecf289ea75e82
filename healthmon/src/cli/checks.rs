//! run-checks サブコマンド
//!
//! 期限到来チェックを1サイクルだけ実行します（cron等の外部スケジューラ向け）。

use crate::bootstrap;
use crate::health::CheckRunner;
use clap::Args;

/// run-checks サブコマンドの引数
#[derive(Args, Debug, Clone, Default)]
pub struct RunChecksArgs {
    /// Print the result as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

/// Execute the run-checks command
pub async fn execute(args: &RunChecksArgs) -> Result<(), anyhow::Error> {
    let state = bootstrap::initialize().await?;
    println!("{}", run(&state.runner, args).await?);
    Ok(())
}

/// サイクルを実行し、出力する文字列を返す
pub async fn run(runner: &CheckRunner, args: &RunChecksArgs) -> Result<String, anyhow::Error> {
    let processed = runner.run_due_checks().await?;
    Ok(if args.json {
        serde_json::json!({ "processed": processed }).to_string()
    } else {
        processed.to_string()
    })
}
