use acai_core::{NewPurchase, Purchase, PurchaseReceipt};
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::auth::CurrentOperator;
use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiQuery};
use crate::routes::LimitQuery;
use crate::state::AppState;

/// `POST /purchases`. Also writes the mirrored inbound stock movement.
pub async fn create(
    State(state): State<AppState>,
    _operator: CurrentOperator,
    ApiJson(purchase): ApiJson<NewPurchase>,
) -> ApiResult<(StatusCode, Json<PurchaseReceipt>)> {
    let receipt = state.db.purchases().record_purchase(purchase).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// `GET /purchases?limit`
pub async fn list(
    State(state): State<AppState>,
    _operator: CurrentOperator,
    ApiQuery(query): ApiQuery<LimitQuery>,
) -> ApiResult<Json<Vec<Purchase>>> {
    Ok(Json(state.db.purchases().list(query.limit).await?))
}
