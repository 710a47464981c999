//! # Mega Açaí Server
//!
//! HTTP API for the single-shop açaí POS: sales, stock, purchases, expenses
//! and reports over one SQLite file.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Server Components                               │
//! │                                                                         │
//! │  Browser POS ──► axum Router ──► CurrentOperator (JWT) ──► handler      │
//! │                      │                                       │          │
//! │                      │ CORS, TraceLayer                      ▼          │
//! │                      │                                 acai-db repos    │
//! │                      ▼                                       │          │
//! │               static front end                               ▼          │
//! │               (ACAI_STATIC_DIR)                           SQLite        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `ACAI_BIND_ADDR` - Interface to bind (default: 0.0.0.0)
//! - `PORT` - HTTP port (default: 10000)
//! - `ACAI_DB_PATH` - SQLite file (default: ./data/acai.db)
//! - `ACAI_DB_MAX_CONNECTIONS` - Pool size (default: 5)
//! - `JWT_SECRET` - Secret for JWT signing
//! - `JWT_LIFETIME_SECS` - Token lifetime (default: 43200)
//! - `ACAI_STATIC_DIR` - Front end directory (optional)

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

// Re-exports
pub use config::ServerConfig;
pub use error::{ApiError, ErrorCode};
pub use routes::build_router;
pub use state::AppState;
