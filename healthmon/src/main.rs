//! healthmon Entry Point

use clap::Parser;
use healthmon::cli::{serve::ServeArgs, Cli, Commands};
use healthmon::{cli, logging};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // サブコマンドなしはserve
    let result = match cli.command {
        Some(Commands::Serve(args)) => cli::serve::execute(&args).await,
        Some(Commands::RunChecks(args)) => cli::checks::execute(&args).await,
        Some(Commands::Probe(args)) => cli::probe::execute(&args).await,
        Some(Commands::Recompute(args)) => cli::recompute::execute(&args).await,
        Some(Commands::Import(args)) => cli::import::execute(&args).await,
        Some(Commands::Endpoint(args)) => cli::endpoint::execute(&args).await,
        None => cli::serve::execute(&ServeArgs::from_env()).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
