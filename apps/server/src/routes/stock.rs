use acai_core::{NewStockMovement, StockBalance, StockMovement};
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::auth::CurrentOperator;
use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiQuery};
use crate::routes::LimitQuery;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MovementCreated {
    pub movement_id: i64,
}

/// `POST /stock/movements`
pub async fn record(
    State(state): State<AppState>,
    _operator: CurrentOperator,
    ApiJson(movement): ApiJson<NewStockMovement>,
) -> ApiResult<(StatusCode, Json<MovementCreated>)> {
    let movement_id = state.db.stock().record_movement(movement).await?;
    Ok((StatusCode::CREATED, Json(MovementCreated { movement_id })))
}

/// `GET /stock`
pub async fn balances(
    State(state): State<AppState>,
    _operator: CurrentOperator,
) -> ApiResult<Json<Vec<StockBalance>>> {
    Ok(Json(state.db.stock().balances().await?))
}

/// `GET /stock/history?limit`
pub async fn history(
    State(state): State<AppState>,
    _operator: CurrentOperator,
    ApiQuery(query): ApiQuery<LimitQuery>,
) -> ApiResult<Json<Vec<StockMovement>>> {
    Ok(Json(state.db.stock().history(query.limit).await?))
}
