//! endpoint サブコマンド
//!
//! エンドポイントの有効化/無効化、即時実行予約、チェック間隔の変更。

use crate::bootstrap;
use crate::common::error::MonitorError;
use crate::db::endpoints;
use crate::types::endpoint::validate_interval;
use clap::{Args, Subcommand};
use sqlx::SqlitePool;
use uuid::Uuid;

/// endpoint サブコマンドの引数
#[derive(Args, Debug, Clone)]
pub struct EndpointArgs {
    /// Endpoint action
    #[command(subcommand)]
    pub command: EndpointCommand,
}

/// endpoint の操作
#[derive(Subcommand, Debug, Clone)]
pub enum EndpointCommand {
    /// Enable scheduled checks
    Enable {
        /// Endpoint ID
        id: Uuid,
    },
    /// Disable scheduled checks
    Disable {
        /// Endpoint ID
        id: Uuid,
    },
    /// Make the endpoint due on the next cycle
    RunNow {
        /// Endpoint ID
        id: Uuid,
    },
    /// Change the check interval (seconds, at least 15)
    Interval {
        /// Endpoint ID
        id: Uuid,
        /// Interval in seconds
        seconds: u64,
    },
}

impl EndpointCommand {
    fn id(&self) -> Uuid {
        match self {
            Self::Enable { id }
            | Self::Disable { id }
            | Self::RunNow { id }
            | Self::Interval { id, .. } => *id,
        }
    }
}

/// Execute the endpoint command
pub async fn execute(args: &EndpointArgs) -> Result<(), anyhow::Error> {
    let state = bootstrap::initialize().await?;
    apply(&state.db_pool, &args.command).await?;
    println!("ok");
    Ok(())
}

/// 操作をストアに反映する
pub async fn apply(pool: &SqlitePool, command: &EndpointCommand) -> Result<(), MonitorError> {
    let updated = match command {
        EndpointCommand::Enable { id } => endpoints::set_enabled(pool, *id, true).await?,
        EndpointCommand::Disable { id } => endpoints::set_enabled(pool, *id, false).await?,
        EndpointCommand::RunNow { id } => endpoints::schedule_now(pool, *id).await?,
        EndpointCommand::Interval { id, seconds } => {
            validate_interval(*seconds)?;
            endpoints::update_interval(pool, *id, *seconds).await?
        }
    };

    if !updated {
        return Err(MonitorError::EndpointNotFound(command.id()));
    }
    tracing::info!(endpoint_id = %command.id(), command = ?command, "Endpoint updated");
    Ok(())
}
