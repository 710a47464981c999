//! # acai-db: Database Layer for the Mega Açaí Ledger
//!
//! SQLite persistence for sales, stock, purchases, expenses and the
//! reference catalog, using sqlx for async access.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Mega Açaí Data Flow                              │
//! │                                                                         │
//! │  HTTP handler (POST /sales)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     acai-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │   │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │   │   │
//! │  │   │               │    │ SaleRepo      │    │              │   │   │
//! │  │   │ SqlitePool    │◄───│ StockRepo     │    │ 001_schema   │   │   │
//! │  │   │ WAL + FKs on  │    │ PurchaseRepo  │    │ 002_seed     │   │   │
//! │  │   │               │    │ ReportRepo …  │    │              │   │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘   │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   ./data/acai.db (ACAI_DB_PATH)                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded schema and reference data
//! - [`error`] - Database error types
//! - [`password`] - Argon2 hashing for operator accounts
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use acai_core::{DraftLine, Money, SaleDraft};
//! use acai_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./data/acai.db")).await?;
//!
//! let draft = SaleDraft::new().line(DraftLine::new(1, Money::from_cents(1800)));
//! let receipt = db.sales().record_sale(draft, operator_id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod password;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::catalog::CatalogRepository;
pub use repository::expense::ExpenseRepository;
pub use repository::operator::{NewOperator, OperatorRepository};
pub use repository::purchase::PurchaseRepository;
pub use repository::reference::ReferenceRepository;
pub use repository::report::ReportRepository;
pub use repository::sale::SaleRepository;
pub use repository::stock::StockRepository;
