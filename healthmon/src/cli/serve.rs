//! serve サブコマンド
//!
//! HTTPサーバーと定期トリガーを起動します。

use crate::config::{get_env_with_fallback_or, get_env_with_fallback_parse};
use crate::inventory::{import_inventory, Inventory};
use crate::{bootstrap, server};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

/// serve サブコマンドの引数
#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Listen port
    #[arg(short, long, default_value = "8090", env = "HEALTHMON_PORT")]
    pub port: u16,

    /// Bind address
    #[arg(short = 'H', long, default_value = "0.0.0.0", env = "HEALTHMON_HOST")]
    pub host: String,

    /// Inventory YAML imported before the server starts
    #[arg(short, long, env = "HEALTHMON_INVENTORY")]
    pub inventory: Option<PathBuf>,
}

impl ServeArgs {
    /// サブコマンド省略時に環境変数から組み立てる
    pub fn from_env() -> Self {
        Self {
            port: get_env_with_fallback_parse("HEALTHMON_PORT", "PORT", 8090),
            host: get_env_with_fallback_or("HEALTHMON_HOST", "HOST", "0.0.0.0"),
            inventory: std::env::var_os("HEALTHMON_INVENTORY").map(PathBuf::from),
        }
    }

    /// バインドアドレス
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs) -> Result<(), anyhow::Error> {
    info!("healthmon v{}", env!("CARGO_PKG_VERSION"));

    let state = bootstrap::initialize().await?;

    if let Some(path) = &args.inventory {
        let inventory = Inventory::load(path).await?;
        let summary = import_inventory(&state.db_pool, &inventory).await?;
        info!(
            path = %path.display(),
            services = summary.services,
            "Inventory loaded on startup"
        );
    }

    server::run(state, &args.bind_addr()).await?;
    Ok(())
}
