//! チェックサイクル起動APIハンドラー

use super::error::AppError;
use crate::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

/// POST /api/checks/run のレスポンス
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunChecksResponse {
    /// 処理したエンドポイント数
    pub processed: usize,
}

/// POST /api/checks/run - 期限到来チェックを1サイクル実行
///
/// 外部スケジューラから呼ばれる想定。サイクル完了まで応答しない。
pub async fn run_checks(
    State(state): State<AppState>,
) -> Result<Json<RunChecksResponse>, AppError> {
    let processed = state.runner.run_due_checks().await?;
    Ok(Json(RunChecksResponse { processed }))
}
