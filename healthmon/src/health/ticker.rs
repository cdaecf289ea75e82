//! serveモード用の定期トリガー
//!
//! 外部スケジューラ（cron等）の代わりに、一定間隔でサイクルを1回ずつ起動する。
//! 前のサイクルの完了を待ってから次のtickを待つため、同一プロセス内でサイクルが
//! 重なることはない。停止要求はサイクルの合間にのみ反映される。

use super::runner::CheckRunner;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

/// 定期トリガー
pub struct CheckTicker {
    runner: CheckRunner,
    period: Duration,
}

impl CheckTicker {
    /// 新しいトリガーを作成
    pub fn new(runner: CheckRunner, period: Duration) -> Self {
        Self {
            runner,
            period: period.max(Duration::from_millis(1)),
        }
    }

    /// バックグラウンドで開始する。`shutdown`が`true`になると停止する
    pub fn start(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(shutdown).await })
    }

    async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut timer = interval(self.period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            interval_secs = self.period.as_secs_f64(),
            "Check ticker started"
        );

        loop {
            tokio::select! {
                _ = timer.tick() => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                    continue;
                }
            }

            if let Err(e) = self.runner.run_due_checks().await {
                error!(error = %e, "Check cycle failed");
            }
        }

        info!("Check ticker stopped");
    }
}
