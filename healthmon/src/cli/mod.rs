//! CLI module for healthmon
//!
//! Provides command-line interface for running the monitor and its one-shot operations.

/// run-checks subcommand
pub mod checks;
/// endpoint subcommand
pub mod endpoint;
/// import subcommand
pub mod import;
/// probe subcommand
pub mod probe;
/// recompute subcommand
pub mod recompute;
/// serve subcommand
pub mod serve;

use clap::{Parser, Subcommand};

/// healthmon - HTTP endpoint health monitor
#[derive(Parser, Debug)]
#[command(name = "healthmon")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"ENVIRONMENT VARIABLES:
    HEALTHMON_HOST                Bind address (default: 0.0.0.0)
    HEALTHMON_PORT                Listen port (default: 8090)
    HEALTHMON_LOG_LEVEL           Log level (default: info)
    HEALTHMON_LOG_FORMAT          Log format: json or text (default: text)
    HEALTHMON_DATABASE_URL        Database URL (default: sqlite:~/.healthmon/healthmon.db)
    HEALTHMON_INVENTORY           Inventory YAML imported on serve startup
    HEALTHMON_BATCH_SIZE          Max endpoints per cycle (default: 500)
    HEALTHMON_MAX_CONCURRENCY     Max in-flight probes (default: 20)
    HEALTHMON_RETRY_BACKOFF_MS    Retry backoff base (default: 200)
    HEALTHMON_RETRY_JITTER_MS     Retry backoff jitter (default: 300)
    HEALTHMON_SCHEDULE_JITTER_MS  Next-run jitter (default: 500)
    HEALTHMON_HEALTH_WINDOW       Results per service used for status (default: 10)
    HEALTHMON_DETAILS_MAX_CHARS   Max stored failure detail length (default: 2000)
    HEALTHMON_TICK_INTERVAL_SECS  Built-in trigger period, 0 disables (default: 15)
"#)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server and the built-in check trigger
    Serve(serve::ServeArgs),
    /// Run one check cycle and print the processed count
    RunChecks(checks::RunChecksArgs),
    /// Probe a single endpoint once without recording the result
    Probe(probe::ProbeArgs),
    /// Recompute the status of a service from its recent results
    Recompute(recompute::RecomputeArgs),
    /// Import services and endpoints from an inventory YAML file
    Import(import::ImportArgs),
    /// Endpoint administration
    Endpoint(endpoint::EndpointArgs),
}
