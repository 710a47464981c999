use acai_core::{Expense, NewExpense};
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
pub struct ExpenseCreated {
    pub expense_id: i64,
}

/// `POST /expenses`
pub async fn create(
    State(state): State<AppState>,
    _operator: CurrentOperator,
    ApiJson(expense): ApiJson<NewExpense>,
) -> ApiResult<(StatusCode, Json<ExpenseCreated>)> {
    let expense_id = state.db.expenses().record(expense).await?;
    Ok((StatusCode::CREATED, Json(ExpenseCreated { expense_id })))
}

/// `GET /expenses?limit`
pub async fn list(
    State(state): State<AppState>,
    _operator: CurrentOperator,
    ApiQuery(query): ApiQuery<LimitQuery>,
) -> ApiResult<Json<Vec<Expense>>> {
    Ok(Json(state.db.expenses().list(query.limit).await?))
}
