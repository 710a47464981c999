//! Catalog and reference lists for the POS screens.

use acai_core::{AddOn, Channel, PaymentMethod, Product};
use axum::extract::State;
use axum::Json;

use crate::error::ApiResult;
use crate::state::AppState;

pub async fn products(State(state): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    Ok(Json(state.db.catalog().list_active_products().await?))
}

pub async fn add_ons(State(state): State<AppState>) -> ApiResult<Json<Vec<AddOn>>> {
    Ok(Json(state.db.catalog().list_active_addons().await?))
}

pub async fn channels(State(state): State<AppState>) -> ApiResult<Json<Vec<Channel>>> {
    Ok(Json(state.db.reference().channels().await?))
}

pub async fn payment_methods(State(state): State<AppState>) -> ApiResult<Json<Vec<PaymentMethod>>> {
    Ok(Json(state.db.reference().payment_methods().await?))
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::TestApp;
    use axum::http::{Method, StatusCode};

    #[tokio::test]
    async fn test_reference_lists_are_public() {
        let app = TestApp::new().await;

        let (status, products) = app.send(Method::GET, "/products", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(products
            .as_array()
            .unwrap()
            .iter()
            .any(|p| p["name"] == "Copo 500ml" && p["price_cents"] == 1800));

        let (_, channels) = app.send(Method::GET, "/channels", None, None).await;
        assert_eq!(channels.as_array().unwrap().len(), 5);

        let (_, methods) = app.send(Method::GET, "/payment-methods", None, None).await;
        assert!(methods.as_array().unwrap().iter().any(|m| m["name"] == "Pix"));

        let (status, add_ons) = app.send(Method::GET, "/add-ons", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(!add_ons.as_array().unwrap().is_empty());
    }
}
