//! import サブコマンド
//!
//! インベントリYAMLからサービスとエンドポイントを取り込みます。

use crate::bootstrap;
use crate::inventory::{import_inventory, Inventory};
use clap::Args;
use std::path::PathBuf;

/// import サブコマンドの引数
#[derive(Args, Debug, Clone)]
pub struct ImportArgs {
    /// Inventory YAML file
    pub file: PathBuf,
}

/// Execute the import command
pub async fn execute(args: &ImportArgs) -> Result<(), anyhow::Error> {
    // 不正なファイルではDBを作らない
    let inventory = Inventory::load(&args.file).await?;
    inventory.validated()?;

    let state = bootstrap::initialize().await?;
    let summary = import_inventory(&state.db_pool, &inventory).await?;
    println!(
        "services: {}, endpoints created: {}, endpoints updated: {}",
        summary.services, summary.endpoints_created, summary.endpoints_updated
    );
    Ok(())
}
