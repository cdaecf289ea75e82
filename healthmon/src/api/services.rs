//! サービスAPIハンドラー

use super::error::AppError;
use crate::types::Service;
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

/// POST /api/services/:id/recompute - サービス状態を再計算
///
/// 直近の結果から状態を導出し、更新後のサービスを返す。
/// 結果が1件もない場合は状態を変えずにそのまま返す。
pub async fn recompute(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Service>, AppError> {
    let service = state.aggregator.recompute(id).await?;
    Ok(Json(service))
}
