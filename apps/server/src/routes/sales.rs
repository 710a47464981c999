//! Sale endpoints. The request body is the client cart as a [`SaleDraft`];
//! the server prices it and persists it in one transaction.

use acai_core::{SaleDetail, SaleDraft, SaleFilter, SaleReceipt, SaleSummary};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::auth::CurrentOperator;
use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiQuery};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SalesQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub channel: Option<i64>,
    pub payment: Option<i64>,
}

/// `POST /sales`
pub async fn create(
    State(state): State<AppState>,
    operator: CurrentOperator,
    ApiJson(draft): ApiJson<SaleDraft>,
) -> ApiResult<(StatusCode, Json<SaleReceipt>)> {
    let receipt = state.db.sales().record_sale(draft, operator.id).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// `GET /sales?from&to&channel&payment`
pub async fn list(
    State(state): State<AppState>,
    _operator: CurrentOperator,
    ApiQuery(query): ApiQuery<SalesQuery>,
) -> ApiResult<Json<Vec<SaleSummary>>> {
    let range = super::RangeQuery {
        from: query.from,
        to: query.to,
    }
    .range()?;

    let filter = SaleFilter {
        range,
        channel_id: query.channel,
        payment_method_id: query.payment,
    };
    Ok(Json(state.db.sales().list_sales(&filter).await?))
}

/// `GET /sales/{id}`
pub async fn detail(
    State(state): State<AppState>,
    _operator: CurrentOperator,
    Path(id): Path<i64>,
) -> ApiResult<Json<SaleDetail>> {
    Ok(Json(state.db.sales().get_sale(id).await?))
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::TestApp;
    use axum::http::StatusCode;
    use serde_json::json;

    fn cart() -> serde_json::Value {
        json!({
            "items": [{
                "product_id": 1,
                "quantity": 1,
                "unit_price_cents": 1800,
                "addons": [{"addon_id": 1, "quantity": 2, "unit_price_cents": 300}]
            }],
            "delivery_fee_cents": 500,
            "channel_id": 1,
            "payment_method_id": 1,
            "note": "sem granola"
        })
    }

    #[tokio::test]
    async fn test_create_and_read_sale() {
        let app = TestApp::new().await;
        let token = app.token().await;

        let (status, receipt) = app.post("/sales", &token, cart()).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(receipt["total_cents"], 2900);
        let sale_id = receipt["sale_id"].as_i64().unwrap();

        let (status, detail) = app.get(&format!("/sales/{}", sale_id), &token).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(detail["total_cents"], 2900);
        assert_eq!(detail["operator_name"], "Administrador");
        assert_eq!(detail["channel_name"], "iFood");
        assert_eq!(detail["items"][0]["subtotal_cents"], 1800);
        assert_eq!(detail["items"][0]["addons"][0]["subtotal_cents"], 600);

        let (_, listed) = app.get("/sales?channel=1", &token).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
        let (_, listed) = app.get("/sales?channel=2", &token).await;
        assert!(listed.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_sales_write_nothing() {
        let app = TestApp::new().await;
        let token = app.token().await;

        let (status, body) = app.post("/sales", &token, json!({"items": []})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let unknown_product = json!({"items": [
            {"product_id": 1, "unit_price_cents": 1800},
            {"product_id": 9999, "unit_price_cents": 1800}
        ]});
        let (status, body) = app.post("/sales", &token, unknown_product).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "CONFLICT");

        let overflowing = json!({
            "items": [{"product_id": 1, "unit_price_cents": i64::MAX}],
            "delivery_fee_cents": 1
        });
        let (status, body) = app.post("/sales", &token, overflowing).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let (_, listed) = app.get("/sales", &token).await;
        assert!(listed.as_array().unwrap().is_empty());
        let ranked = app.db.reports().top_products(&Default::default(), None).await.unwrap();
        assert!(ranked.is_empty());
    }

    #[tokio::test]
    async fn test_missing_sale_and_bad_dates() {
        let app = TestApp::new().await;
        let token = app.token().await;

        let (status, body) = app.get("/sales/424242", &token).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");

        let (status, _) = app.get("/sales?from=2024-13-01", &token).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
