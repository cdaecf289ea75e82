//! エンドポイントヘルス監視
//!
//! - `prober`: 1エンドポイントへのHTTPチェック（リトライ・同時実行制限付き）
//! - `runner`: 期限到来エンドポイントを1サイクル分処理する
//! - `aggregator`: 直近結果からサービス状態を導出する
//! - `ticker`: serveモードでサイクルを定期起動する

pub mod aggregator;
pub mod prober;
pub mod runner;
pub mod ticker;

pub use aggregator::HealthAggregator;
pub use prober::Prober;
pub use runner::CheckRunner;
pub use ticker::CheckTicker;

use std::time::Duration;

/// `[0, max]` の一様乱数で待機時間のずれを作る
pub(crate) fn random_jitter(max: Duration) -> Duration {
    use rand::RngExt;

    let max_micros = u64::try_from(max.as_micros()).unwrap_or(u64::MAX);
    if max_micros == 0 {
        return Duration::ZERO;
    }
    let mut rng = rand::rng();
    Duration::from_micros(rng.random_range(0..=max_micros))
}
