//! Aggregate reports. Every request recomputes from the sale tables.

use acai_core::{DailyRevenue, RankingEntry};
use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::auth::CurrentOperator;
use crate::error::ApiResult;
use crate::extract::ApiQuery;
use crate::routes::RangeQuery;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct RankingQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<i64>,
}

impl RankingQuery {
    fn split(self) -> (RangeQuery, Option<i64>) {
        (
            RangeQuery {
                from: self.from,
                to: self.to,
            },
            self.limit,
        )
    }
}

/// `GET /reports/top-products?from&to&limit`
pub async fn top_products(
    State(state): State<AppState>,
    _operator: CurrentOperator,
    ApiQuery(query): ApiQuery<RankingQuery>,
) -> ApiResult<Json<Vec<RankingEntry>>> {
    let (range, limit) = query.split();
    let ranking = state.db.reports().top_products(&range.range()?, limit).await?;
    Ok(Json(ranking))
}

/// `GET /reports/top-addons?from&to&limit`
pub async fn top_addons(
    State(state): State<AppState>,
    _operator: CurrentOperator,
    ApiQuery(query): ApiQuery<RankingQuery>,
) -> ApiResult<Json<Vec<RankingEntry>>> {
    let (range, limit) = query.split();
    let ranking = state.db.reports().top_addons(&range.range()?, limit).await?;
    Ok(Json(ranking))
}

/// `GET /reports/revenue?from&to`
pub async fn revenue(
    State(state): State<AppState>,
    _operator: CurrentOperator,
    ApiQuery(query): ApiQuery<RangeQuery>,
) -> ApiResult<Json<Vec<DailyRevenue>>> {
    Ok(Json(state.db.reports().revenue_by_day(&query.range()?).await?))
}
