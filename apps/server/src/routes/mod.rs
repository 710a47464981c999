//! # HTTP Routes
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Public                          Bearer token (CurrentOperator)         │
//! │  ──────                          ──────────────────────────────         │
//! │  GET  /health                    POST /sales         GET /sales         │
//! │  POST /auth/login                GET  /sales/{id}                       │
//! │  GET  /products                  POST /stock/movements                  │
//! │  GET  /add-ons                   GET  /stock         GET /stock/history │
//! │  GET  /channels                  POST /purchases     GET /purchases     │
//! │  GET  /payment-methods           POST /expenses      GET /expenses      │
//! │                                  GET  /reports/{top-products,           │
//! │                                        top-addons,revenue}              │
//! │                                                                         │
//! │  Anything else → ACAI_STATIC_DIR (browser front end), if configured     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use acai_core::DateRange;

use crate::error::ApiResult;
use crate::state::AppState;

pub mod auth;
pub mod catalog;
pub mod expenses;
pub mod health;
pub mod purchases;
pub mod reports;
pub mod sales;
pub mod stock;

/// Builds the application router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/health", get(health::health))
        .route("/auth/login", post(auth::login))
        .route("/products", get(catalog::products))
        .route("/add-ons", get(catalog::add_ons))
        .route("/channels", get(catalog::channels))
        .route("/payment-methods", get(catalog::payment_methods))
        .route("/sales", post(sales::create).get(sales::list))
        .route("/sales/{id}", get(sales::detail))
        .route("/stock", get(stock::balances))
        .route("/stock/movements", post(stock::record))
        .route("/stock/history", get(stock::history))
        .route("/purchases", post(purchases::create).get(purchases::list))
        .route("/expenses", post(expenses::create).get(expenses::list))
        .route("/reports/top-products", get(reports::top_products))
        .route("/reports/top-addons", get(reports::top_addons))
        .route("/reports/revenue", get(reports::revenue));

    if let Some(dir) = &state.config.static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

// =============================================================================
// Shared query parameters
// =============================================================================

/// `?from=YYYY-MM-DD&to=YYYY-MM-DD`, both optional and inclusive.
#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl RangeQuery {
    pub fn range(&self) -> ApiResult<DateRange> {
        Ok(DateRange::parse(self.from.as_deref(), self.to.as_deref())?)
    }
}

/// `?limit=N`
#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

// =============================================================================
// Router Tests
// =============================================================================
