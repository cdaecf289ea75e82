//! エンドポイントAPIハンドラー
//!
//! 手動プローブと結果履歴の参照。

use super::error::AppError;
use crate::common::error::MonitorError;
use crate::db::{check_results, endpoints};
use crate::types::CheckResult;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 結果履歴のデフォルト取得件数
pub const DEFAULT_RESULTS_LIMIT: usize = 50;
/// 結果履歴の最大取得件数
pub const MAX_RESULTS_LIMIT: usize = 500;

/// 手動プローブのレスポンス
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProbeResponse {
    /// 判定結果
    pub ok: bool,
    /// 観測したステータスコード（通信失敗時は0）
    pub status_code: u16,
    /// 期待ステータスコード
    pub expected: u16,
    /// 応答時間（ミリ秒）
    pub response_time_ms: u64,
    /// 失敗理由
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// POST /api/endpoints/:id/probe - 1回だけプローブする
///
/// リトライ・結果記録・メトリクス記録は行わない。
/// 成功なら200、失敗なら424 Failed Dependencyを返す。
pub async fn probe_endpoint(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let endpoint = endpoints::get_endpoint(&state.db_pool, id)
        .await?
        .ok_or(MonitorError::EndpointNotFound(id))?;

    let outcome = state.prober.probe_once(&endpoint).await;
    let status = if outcome.success {
        StatusCode::OK
    } else {
        StatusCode::FAILED_DEPENDENCY
    };

    Ok((
        status,
        Json(ProbeResponse {
            ok: outcome.success,
            status_code: outcome.status_code,
            expected: endpoint.expected_status,
            response_time_ms: outcome.response_time_ms,
            error: if outcome.success { None } else { outcome.details },
        }),
    ))
}

/// 結果履歴のクエリパラメータ
#[derive(Debug, Default, Deserialize)]
pub struct ResultsQuery {
    /// 取得件数（1〜500、省略時50）
    pub limit: Option<usize>,
}

/// GET /api/endpoints/:id/results - 結果を新しい順に返す
pub async fn list_results(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ResultsQuery>,
) -> Result<Json<Vec<CheckResult>>, AppError> {
    if endpoints::get_endpoint(&state.db_pool, id).await?.is_none() {
        return Err(MonitorError::EndpointNotFound(id).into());
    }

    let limit = query
        .limit
        .unwrap_or(DEFAULT_RESULTS_LIMIT)
        .clamp(1, MAX_RESULTS_LIMIT);
    let results = check_results::list_results_for_endpoint(&state.db_pool, id, limit).await?;
    Ok(Json(results))
}
