//! # acai-core: Pure Business Logic for the Mega Açaí Ledger
//!
//! This crate contains the ledger rules as pure functions with zero I/O
//! dependencies: cart pricing, fixed-point money and quantities, validation
//! and the stock balance fold.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Mega Açaí Ledger Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Browser front end (cashier UI)                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP / JSON                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    acai-server (axum routes)                    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                ★ acai-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │ validation│  │   │
//! │  │   │   Sale    │  │   Money   │  │ SaleDraft │  │   rules   │  │   │
//! │  │   │ Movement  │  │ Quantity  │  │PricedSale │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    acai-db (Database Layer)                     │   │
//! │  │           SQLite transactions, migrations, repositories         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Sale, StockMovement, Purchase, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`quantity`] - Stock quantities in thousandths
//! - [`cart`] - `SaleDraft` builder and sale pricing
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use acai_core::cart::{DraftAddOn, DraftLine, SaleDraft};
//! use acai_core::money::Money;
//!
//! let priced = SaleDraft::new()
//!     .line(DraftLine::new(1, Money::from_cents(1800)).addon(DraftAddOn::new(1, Money::from_cents(300)).quantity(2)))
//!     .delivery_fee(Money::from_cents(500))
//!     .price()
//!     .unwrap();
//!
//! assert_eq!(priced.total.cents(), 2900);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod quantity;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{DraftAddOn, DraftLine, PricedAddOn, PricedLine, PricedSale, SaleDraft};
pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use quantity::Quantity;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed in a single sale.
///
/// ## Business Reason
/// Prevents runaway carts; a counter sale never comes close.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line or add-on.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Maximum rows returned by a sale listing.
pub const SALES_PAGE_SIZE: i64 = 1000;

/// Default number of rows for history listings (stock, purchases, expenses).
pub const DEFAULT_HISTORY_LIMIT: i64 = 500;

/// Upper bound a caller may request for history listings.
pub const MAX_HISTORY_LIMIT: i64 = 1000;

/// Default number of rows in top-N reports.
pub const DEFAULT_REPORT_LIMIT: i64 = 10;

/// Upper bound for top-N reports.
pub const MAX_REPORT_LIMIT: i64 = 100;

/// Reason recorded on the inbound movement that mirrors a purchase.
pub const PURCHASE_MOVEMENT_REASON: &str = "purchase";
