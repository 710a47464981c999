//! # Domain Types
//!
//! Core data structures for the Mega Açaí ledger.
//!
//! ## Entity Relationships
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Entity Relationship Diagram                          │
//! │                                                                         │
//! │  ┌──────────┐   ┌───────────────┐   ┌──────────┐                       │
//! │  │ Channel  │◄──┤     Sale      ├──►│ Payment  │                       │
//! │  │ (iFood)  │   │ total (frozen)│   │ Method   │                       │
//! │  └──────────┘   └──────┬────────┘   └──────────┘                       │
//! │                        │ 1:N            ▲ Operator                      │
//! │                 ┌──────▼──────┐                                         │
//! │  ┌─────────┐    │  SaleItem   │                                         │
//! │  │ Product │◄───┤ qty × price │                                         │
//! │  └─────────┘    └──────┬──────┘                                         │
//! │                        │ 1:N                                            │
//! │                 ┌──────▼────────┐    ┌────────┐                         │
//! │                 │ SaleItemAddOn ├───►│ AddOn  │                         │
//! │                 └───────────────┘    └────────┘                         │
//! │                                                                         │
//! │  ┌──────────┐ 1:1 ┌───────────────┐   (append-only, keyed by name)     │
//! │  │ Purchase ├────►│ StockMovement │                                     │
//! │  └──────────┘     └───────────────┘   ┌─────────┐ (standalone)          │
//! │                                       │ Expense │                       │
//! │                                       └─────────┘                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every persisted entity here is immutable once written. There are no
//! update or delete operations on sales, movements, purchases or expenses.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;
use crate::quantity::Quantity;
use crate::validation::{
    optional_text, parse_date, validate_positive_amount, validate_price_cents, validate_total_cost,
    validate_required_text, validate_stock_quantity, ValidationResult,
};

// =============================================================================
// Catalog
// =============================================================================

/// A product on the menu (e.g., "Copo 500ml").
///
/// The price is copied into each sale line at sale time; history never
/// re-reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price_cents: Money,
    pub is_active: bool,
}

/// An add-on that can be attached to a sale line (e.g., "Banana").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct AddOn {
    pub id: i64,
    pub name: String,
    pub price_cents: Money,
    pub is_active: bool,
}

/// Input for creating a product or add-on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCatalogEntry {
    pub name: String,
    pub price_cents: Money,
}

impl NewCatalogEntry {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_required_text("name", &self.name)?;
        validate_price_cents("price", self.price_cents.cents())
    }
}

// =============================================================================
// Reference Data
// =============================================================================

/// A delivery channel ("app"): iFood, WhatsApp, counter, ...
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Channel {
    pub id: i64,
    pub name: String,
}

/// How the customer paid: Pix, cash, card, ...
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PaymentMethod {
    pub id: i64,
    pub name: String,
}

// =============================================================================
// Operators
// =============================================================================

/// Operator role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum OperatorRole {
    Admin,
    Operator,
}

impl OperatorRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperatorRole::Admin => "admin",
            OperatorRole::Operator => "operator",
        }
    }
}

/// A person who logs in and records sales.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Operator {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Argon2 PHC string. Never leaves the server.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: OperatorRole,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Sales
// =============================================================================

/// A completed sale header.
///
/// ## Invariant
/// `total_cents == delivery_fee_cents + Σ item.subtotal + Σ addon.subtotal`,
/// frozen at creation and never recomputed on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub total_cents: Money,
    pub delivery_fee_cents: Money,
    pub channel_id: Option<i64>,
    pub payment_method_id: Option<i64>,
    pub operator_id: i64,
    pub note: Option<String>,
}

/// A sale as it appears in listings, with reference names joined in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleSummary {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub total_cents: Money,
    pub delivery_fee_cents: Money,
    pub channel_id: Option<i64>,
    pub channel_name: Option<String>,
    pub payment_method_id: Option<i64>,
    pub payment_method_name: Option<String>,
    pub operator_id: i64,
    pub operator_name: String,
    pub note: Option<String>,
}

/// A persisted sale line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleItem {
    pub id: i64,
    pub sale_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price_cents: Money,
    pub subtotal_cents: Money,
}

/// A persisted add-on attached to a sale line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleItemAddOn {
    pub id: i64,
    pub sale_item_id: i64,
    pub addon_id: i64,
    pub addon_name: String,
    pub quantity: i64,
    pub unit_price_cents: Money,
    pub subtotal_cents: Money,
}

/// A sale line together with its add-ons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleLine {
    #[serde(flatten)]
    pub item: SaleItem,
    pub addons: Vec<SaleItemAddOn>,
}

/// Full sale tree returned by `get_sale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleDetail {
    #[serde(flatten)]
    pub sale: SaleSummary,
    pub items: Vec<SaleLine>,
}

/// Result of recording a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleReceipt {
    pub sale_id: i64,
    pub total_cents: Money,
}

// =============================================================================
// Date Filters
// =============================================================================

/// Inclusive calendar-date bounds, compared against the UTC date of a
/// timestamp. Either end may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        DateRange { from, to }
    }

    /// Parses optional `YYYY-MM-DD` strings; blank counts as absent.
    pub fn parse(from: Option<&str>, to: Option<&str>) -> ValidationResult<Self> {
        let parse = |field: &str, v: Option<&str>| -> ValidationResult<Option<NaiveDate>> {
            match v.map(str::trim) {
                None | Some("") => Ok(None),
                Some(s) => parse_date(field, s).map(Some),
            }
        };
        Ok(DateRange {
            from: parse("from", from)?,
            to: parse("to", to)?,
        })
    }
}

/// Filters for listing sales.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaleFilter {
    pub range: DateRange,
    pub channel_id: Option<i64>,
    pub payment_method_id: Option<i64>,
}

// =============================================================================
// Stock
// =============================================================================

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    Inbound,
    Outbound,
}

impl MovementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementKind::Inbound => "inbound",
            MovementKind::Outbound => "outbound",
        }
    }
}

/// One entry of the append-only stock log.
///
/// `product_name` is a free-text key, not a reference to [`Product`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockMovement {
    pub id: i64,
    pub product_name: String,
    pub kind: MovementKind,
    pub quantity: Quantity,
    pub unit_cost_cents: Option<Money>,
    pub total_cost_cents: Option<Money>,
    pub reason: Option<String>,
    /// Set only on the inbound movement that mirrors a purchase.
    pub purchase_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Input for a manual stock movement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStockMovement {
    pub product_name: String,
    pub kind: MovementKind,
    pub quantity: Quantity,
    #[serde(default)]
    pub unit_cost_cents: Option<Money>,
    #[serde(default)]
    pub reason: Option<String>,
}

impl NewStockMovement {
    pub fn new(product_name: impl Into<String>, kind: MovementKind, quantity: Quantity) -> Self {
        NewStockMovement {
            product_name: product_name.into(),
            kind,
            quantity,
            unit_cost_cents: None,
            reason: None,
        }
    }

    pub fn unit_cost(mut self, cost: Money) -> Self {
        self.unit_cost_cents = Some(cost);
        self
    }

    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Validates the input and normalizes the reason.
    pub fn validate(mut self) -> ValidationResult<Self> {
        validate_required_text("product_name", &self.product_name)?;
        validate_stock_quantity(self.quantity)?;
        if let Some(cost) = self.unit_cost_cents {
            validate_price_cents("unit_cost", cost.cents())?;
            validate_total_cost(cost, self.quantity)?;
        }
        self.reason = optional_text("reason", self.reason)?;
        Ok(self)
    }

    /// `unit_cost × quantity` when a unit cost was given.
    pub fn total_cost(&self) -> Option<Money> {
        self.unit_cost_cents.map(|c| c * self.quantity)
    }
}

/// Derived per-product stock position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockBalance {
    pub product_name: String,
    pub inbound_total: Quantity,
    pub outbound_total: Quantity,
    /// `inbound_total - outbound_total`. May be negative.
    pub balance: Quantity,
}

impl StockBalance {
    pub fn new(product_name: impl Into<String>, inbound_total: Quantity, outbound_total: Quantity) -> Self {
        StockBalance {
            product_name: product_name.into(),
            inbound_total,
            outbound_total,
            balance: inbound_total - outbound_total,
        }
    }
}

/// Folds a movement log into per-product balances, ordered by name.
///
/// This is the reference definition the SQL aggregation must agree with.
pub fn fold_balances<'a, I>(movements: I) -> Vec<StockBalance>
where
    I: IntoIterator<Item = &'a StockMovement>,
{
    use std::collections::BTreeMap;

    let mut totals: BTreeMap<&str, (Quantity, Quantity)> = BTreeMap::new();
    for m in movements {
        let entry = totals.entry(m.product_name.as_str()).or_default();
        match m.kind {
            MovementKind::Inbound => entry.0 += m.quantity,
            MovementKind::Outbound => entry.1 += m.quantity,
        }
    }

    totals
        .into_iter()
        .map(|(name, (inbound, outbound))| StockBalance::new(name, inbound, outbound))
        .collect()
}

// =============================================================================
// Purchases
// =============================================================================

/// A supply purchase. Always mirrored by one inbound [`StockMovement`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Purchase {
    pub id: i64,
    pub product_name: String,
    pub quantity: Quantity,
    pub unit_cost_cents: Option<Money>,
    pub total_cost_cents: Option<Money>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for recording a purchase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPurchase {
    pub product_name: String,
    pub quantity: Quantity,
    #[serde(default)]
    pub unit_cost_cents: Option<Money>,
    #[serde(default)]
    pub note: Option<String>,
}

impl NewPurchase {
    pub fn new(product_name: impl Into<String>, quantity: Quantity) -> Self {
        NewPurchase {
            product_name: product_name.into(),
            quantity,
            unit_cost_cents: None,
            note: None,
        }
    }

    pub fn unit_cost(mut self, cost: Money) -> Self {
        self.unit_cost_cents = Some(cost);
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn validate(mut self) -> ValidationResult<Self> {
        validate_required_text("product_name", &self.product_name)?;
        validate_stock_quantity(self.quantity)?;
        if let Some(cost) = self.unit_cost_cents {
            validate_price_cents("unit_cost", cost.cents())?;
            validate_total_cost(cost, self.quantity)?;
        }
        self.note = optional_text("note", self.note)?;
        Ok(self)
    }

    pub fn total_cost(&self) -> Option<Money> {
        self.unit_cost_cents.map(|c| c * self.quantity)
    }
}

/// Ids created by `record_purchase`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseReceipt {
    pub purchase_id: i64,
    pub movement_id: i64,
}

// =============================================================================
// Expenses
// =============================================================================

/// A standalone operating expense (rent, gas, packaging...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Expense {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub description: String,
    pub amount_cents: Money,
    pub category: Option<String>,
}

/// Input for recording an expense. `created_at` defaults to now.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExpense {
    pub description: String,
    pub amount_cents: Money,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl NewExpense {
    pub fn validate(mut self) -> ValidationResult<Self> {
        validate_required_text("description", &self.description)?;
        validate_positive_amount("amount", self.amount_cents.cents())?;
        self.category = optional_text("category", self.category)?;
        Ok(self)
    }
}

// =============================================================================
// Reports
// =============================================================================

/// One row of a top-products / top-add-ons ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct RankingEntry {
    pub name: String,
    pub quantity: i64,
}

/// Revenue for one UTC calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRevenue {
    pub day: NaiveDate,
    pub total_cents: Money,
}

impl DailyRevenue {
    /// Builds a row from the `YYYY-MM-DD` text SQLite's `date()` returns.
    pub fn from_sql_day(day: &str, total_cents: Money) -> Result<Self, ValidationError> {
        Ok(DailyRevenue {
            day: parse_date("day", day)?,
            total_cents,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
