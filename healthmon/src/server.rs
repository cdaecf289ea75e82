//! axumサーバー起動・シャットダウンハンドリング

use crate::common::error::MonitorError;
use crate::health::CheckTicker;
use crate::AppState;
use std::future::Future;
use tokio::sync::watch;
use tracing::{info, warn};

/// axumサーバーを起動し、シャットダウンシグナルを待機する
///
/// `tick_interval`が設定されていれば定期トリガーも起動し、サーバー停止後に止める。
pub async fn run(state: AppState, bind_addr: &str) -> Result<(), MonitorError> {
    run_until(state, bind_addr, shutdown_signal()).await
}

/// 任意のシャットダウン条件でサーバーを実行する
pub async fn run_until<F>(state: AppState, bind_addr: &str, shutdown: F) -> Result<(), MonitorError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .map_err(|e| MonitorError::Config(format!("Failed to bind to {}: {}", bind_addr, e)))?;

    info!("healthmon server listening on {}", bind_addr);

    let (stop_tx, stop_rx) = watch::channel(false);
    let ticker = state.config.tick_interval.map(|period| {
        CheckTicker::new(state.runner.clone(), period).start(stop_rx.clone())
    });
    if ticker.is_none() {
        info!("Check ticker disabled, waiting for external triggers");
    }

    let app = crate::api::create_app(state);
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await;

    let _ = stop_tx.send(true);
    if let Some(handle) = ticker {
        if let Err(e) = handle.await {
            warn!(error = %e, "Check ticker task failed");
        }
    }

    served.map_err(|e| MonitorError::Internal(format!("Server error: {}", e)))?;
    info!("Server shutdown complete");
    Ok(())
}

/// シャットダウンシグナルを待機
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down...");
        }
    }
}
