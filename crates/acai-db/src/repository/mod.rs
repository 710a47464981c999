//! # Repository Module
//!
//! Database repository implementations for the ledger.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  db.sales().record_sale(draft, operator_id)                    │
//! │       ▼                                                                 │
//! │  SaleRepository                                                        │
//! │  ├── record_sale(&self, draft, operator_id)   ← one transaction        │
//! │  ├── get_sale(&self, id)                                               │
//! │  └── list_sales(&self, filter)                                         │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CatalogRepository`](catalog::CatalogRepository) - Products and add-ons
//! - [`ReferenceRepository`](reference::ReferenceRepository) - Channels, payment methods
//! - [`OperatorRepository`](operator::OperatorRepository) - Operator accounts
//! - [`SaleRepository`](sale::SaleRepository) - The sale ledger
//! - [`StockRepository`](stock::StockRepository) - The stock ledger
//! - [`PurchaseRepository`](purchase::PurchaseRepository) - Purchases + mirrored movements
//! - [`ExpenseRepository`](expense::ExpenseRepository) - Expense book
//! - [`ReportRepository`](report::ReportRepository) - Read-only aggregates

use acai_core::DateRange;
use sqlx::{QueryBuilder, Sqlite};

pub mod catalog;
pub mod expense;
pub mod operator;
pub mod purchase;
pub mod reference;
pub mod report;
pub mod sale;
pub mod stock;

/// Appends inclusive `date(column)` bounds to a query that already has a
/// `WHERE` clause.
pub(crate) fn push_date_range(qb: &mut QueryBuilder<'_, Sqlite>, column: &str, range: &DateRange) {
    if let Some(from) = range.from {
        qb.push(" AND date(").push(column).push(") >= ").push_bind(from);
    }
    if let Some(to) = range.to {
        qb.push(" AND date(").push(column).push(") <= ").push_bind(to);
    }
}
