//! # Sale Draft
//!
//! The client-side cart, expressed as an explicit value.
//!
//! A `SaleDraft` is assembled line by line (builder style, by value) and
//! submitted once. [`SaleDraft::price`] validates it and freezes every
//! subtotal and the sale total. The database layer persists exactly what
//! `price` returns.
//!
//! ## Pricing Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SaleDraft                                                              │
//! │  ├── DraftLine { product 1, 18,00 × 1 }                                 │
//! │  │   └── DraftAddOn { addon 1, 3,00 × 2 }                               │
//! │  └── delivery_fee 5,00                                                  │
//! │          │                                                              │
//! │          ▼  price()                                                     │
//! │  PricedSale                                                             │
//! │  ├── PricedLine    subtotal = 18,00                                     │
//! │  │   └── PricedAddOn subtotal = 6,00                                    │
//! │  └── total = 18,00 + 6,00 + 5,00 = 29,00                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Unit prices are trusted snapshots taken by the client from the catalog.
//! They are never re-read here.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::validation::{optional_text, validate_price_cents, validate_quantity};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

// =============================================================================
// Draft (input)
// =============================================================================

/// An add-on requested on a draft line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftAddOn {
    pub addon_id: i64,
    /// Absent or zero means one.
    #[serde(default)]
    pub quantity: Option<i64>,
    pub unit_price_cents: Money,
}

impl DraftAddOn {
    pub fn new(addon_id: i64, unit_price: Money) -> Self {
        DraftAddOn {
            addon_id,
            quantity: None,
            unit_price_cents: unit_price,
        }
    }

    pub fn quantity(mut self, qty: i64) -> Self {
        self.quantity = Some(qty);
        self
    }
}

/// A product line on a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftLine {
    pub product_id: i64,
    /// Absent or zero means one.
    #[serde(default)]
    pub quantity: Option<i64>,
    pub unit_price_cents: Money,
    #[serde(default)]
    pub addons: Vec<DraftAddOn>,
}

impl DraftLine {
    pub fn new(product_id: i64, unit_price: Money) -> Self {
        DraftLine {
            product_id,
            quantity: None,
            unit_price_cents: unit_price,
            addons: Vec::new(),
        }
    }

    pub fn quantity(mut self, qty: i64) -> Self {
        self.quantity = Some(qty);
        self
    }

    pub fn addon(mut self, addon: DraftAddOn) -> Self {
        self.addons.push(addon);
        self
    }
}

/// A cart ready to be submitted as a sale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleDraft {
    #[serde(default)]
    pub items: Vec<DraftLine>,
    #[serde(default)]
    pub delivery_fee_cents: Option<Money>,
    #[serde(default)]
    pub channel_id: Option<i64>,
    #[serde(default)]
    pub payment_method_id: Option<i64>,
    #[serde(default)]
    pub note: Option<String>,
}

impl SaleDraft {
    pub fn new() -> Self {
        SaleDraft::default()
    }

    pub fn line(mut self, line: DraftLine) -> Self {
        self.items.push(line);
        self
    }

    pub fn delivery_fee(mut self, fee: Money) -> Self {
        self.delivery_fee_cents = Some(fee);
        self
    }

    pub fn channel(mut self, channel_id: i64) -> Self {
        self.channel_id = Some(channel_id);
        self
    }

    pub fn payment_method(mut self, payment_method_id: i64) -> Self {
        self.payment_method_id = Some(payment_method_id);
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Validates the draft and computes every subtotal and the total.
    ///
    /// ## Errors
    /// - [`CoreError::EmptySale`] when there are no lines
    /// - [`CoreError::CartTooLarge`] above [`MAX_CART_ITEMS`] lines
    /// - [`CoreError::QuantityTooLarge`] above [`MAX_ITEM_QUANTITY`]
    /// - [`CoreError::AmountOverflow`] when a subtotal or the total does not fit in i64 cents
    /// - [`CoreError::Validation`] for negative quantities, prices or fee
    pub fn price(self) -> CoreResult<PricedSale> {
        if self.items.is_empty() {
            return Err(CoreError::EmptySale);
        }
        if self.items.len() > MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        let delivery_fee = self.delivery_fee_cents.unwrap_or_default();
        validate_price_cents("delivery_fee", delivery_fee.cents())?;

        let mut lines = Vec::with_capacity(self.items.len());
        for line in self.items {
            let quantity = effective_quantity(line.quantity)?;
            validate_price_cents("unit_price", line.unit_price_cents.cents())?;

            let mut addons = Vec::with_capacity(line.addons.len());
            for addon in line.addons {
                let addon_qty = effective_quantity(addon.quantity)?;
                validate_price_cents("unit_price", addon.unit_price_cents.cents())?;
                addons.push(PricedAddOn {
                    addon_id: addon.addon_id,
                    quantity: addon_qty,
                    unit_price: addon.unit_price_cents,
                    subtotal: subtotal(addon.unit_price_cents, addon_qty)?,
                });
            }

            lines.push(PricedLine {
                product_id: line.product_id,
                quantity,
                unit_price: line.unit_price_cents,
                subtotal: subtotal(line.unit_price_cents, quantity)?,
                addons,
            });
        }

        let parts = lines
            .iter()
            .flat_map(|l| std::iter::once(l.subtotal).chain(l.addons.iter().map(|a| a.subtotal)))
            .chain(std::iter::once(delivery_fee));
        let total = Money::checked_sum(parts).ok_or_else(|| CoreError::overflow("total"))?;

        Ok(PricedSale {
            total,
            delivery_fee,
            lines,
            channel_id: self.channel_id,
            payment_method_id: self.payment_method_id,
            note: optional_text("note", self.note)?,
        })
    }
}

/// Absent or zero → 1; negative → error; above the cap → error.
fn effective_quantity(qty: Option<i64>) -> CoreResult<i64> {
    let qty = match qty {
        None | Some(0) => return Ok(1),
        Some(q) => q,
    };
    validate_quantity(qty).map_err(|e| match e {
        ValidationError::OutOfRange { .. } => CoreError::QuantityTooLarge {
            requested: qty,
            max: MAX_ITEM_QUANTITY,
        },
        other => other.into(),
    })?;
    Ok(qty)
}

fn subtotal(unit_price: Money, qty: i64) -> CoreResult<Money> {
    unit_price
        .checked_multiply_quantity(qty)
        .ok_or_else(|| CoreError::overflow("subtotal"))
}

// =============================================================================
// Priced (output)
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricedAddOn {
    pub addon_id: i64,
    pub quantity: i64,
    pub unit_price: Money,
    pub subtotal: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricedLine {
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: Money,
    pub subtotal: Money,
    pub addons: Vec<PricedAddOn>,
}

/// A validated sale with every amount frozen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricedSale {
    pub lines: Vec<PricedLine>,
    pub delivery_fee: Money,
    pub total: Money,
    pub channel_id: Option<i64>,
    pub payment_method_id: Option<i64>,
    pub note: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn cup() -> DraftLine {
        DraftLine::new(1, Money::from_cents(1800))
    }

    #[test]
    fn test_counter_sale_with_delivery() {
        let priced = SaleDraft::new()
            .line(cup().addon(DraftAddOn::new(1, Money::from_cents(300)).quantity(2)))
            .delivery_fee(Money::from_cents(500))
            .price()
            .unwrap();

        assert_eq!(priced.total.cents(), 2900);
        assert_eq!(priced.lines[0].quantity, 1);
        assert_eq!(priced.lines[0].subtotal.cents(), 1800);
        assert_eq!(priced.lines[0].addons[0].subtotal.cents(), 600);
    }

    #[test]
    fn test_total_is_sum_of_parts() {
        let priced = SaleDraft::new()
            .line(cup().quantity(3).addon(DraftAddOn::new(2, Money::from_cents(600))))
            .line(DraftLine::new(2, Money::from_cents(2250)).quantity(2))
            .delivery_fee(Money::from_cents(350))
            .price()
            .unwrap();

        let parts: Money = priced
            .lines
            .iter()
            .map(|l| l.subtotal + l.addons.iter().map(|a| a.subtotal).sum::<Money>())
            .sum();
        assert_eq!(priced.total, parts + priced.delivery_fee);
        assert_eq!(priced.total.cents(), 5400 + 600 + 4500 + 350);

        for line in &priced.lines {
            assert_eq!(line.subtotal, line.unit_price * line.quantity);
        }
    }

    #[test]
    fn test_zero_quantity_defaults_to_one() {
        let priced = SaleDraft::new().line(cup().quantity(0)).price().unwrap();
        assert_eq!(priced.lines[0].quantity, 1);
        assert_eq!(priced.total.cents(), 1800);
    }

    #[test]
    fn test_delivery_fee_defaults_to_zero() {
        let priced = SaleDraft::new().line(cup()).price().unwrap();
        assert!(priced.delivery_fee.is_zero());
    }

    #[test]
    fn test_empty_sale_rejected() {
        let err = SaleDraft::new().delivery_fee(Money::from_cents(500)).price().unwrap_err();
        assert!(matches!(err, CoreError::EmptySale));
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let err = SaleDraft::new().line(cup().quantity(-2)).price().unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));

        let err = SaleDraft::new()
            .line(cup().addon(DraftAddOn::new(1, Money::from_cents(300)).quantity(-1)))
            .price()
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_quantity_cap() {
        let err = SaleDraft::new().line(cup().quantity(1000)).price().unwrap_err();
        assert!(matches!(err, CoreError::QuantityTooLarge { requested: 1000, .. }));
    }

    #[test]
    fn test_line_subtotal_overflow_rejected() {
        let err = SaleDraft::new()
            .line(DraftLine::new(1, Money::from_cents(i64::MAX / 2)).quantity(3))
            .price()
            .unwrap_err();
        assert!(matches!(err, CoreError::AmountOverflow { ref field } if field == "subtotal"));

        let err = SaleDraft::new()
            .line(cup().addon(DraftAddOn::new(1, Money::from_cents(i64::MAX)).quantity(2)))
            .price()
            .unwrap_err();
        assert!(matches!(err, CoreError::AmountOverflow { .. }));
    }

    #[test]
    fn test_total_overflow_rejected() {
        let err = SaleDraft::new()
            .line(DraftLine::new(1, Money::from_cents(i64::MAX)))
            .delivery_fee(Money::from_cents(1))
            .price()
            .unwrap_err();
        assert!(matches!(err, CoreError::AmountOverflow { ref field } if field == "total"));

        let err = SaleDraft::new()
            .line(DraftLine::new(1, Money::from_cents(i64::MAX - 100)))
            .line(DraftLine::new(2, Money::from_cents(101)))
            .price()
            .unwrap_err();
        assert!(matches!(err, CoreError::AmountOverflow { .. }));

        let priced = SaleDraft::new()
            .line(DraftLine::new(1, Money::from_cents(i64::MAX - 1)))
            .delivery_fee(Money::from_cents(1))
            .price()
            .unwrap();
        assert_eq!(priced.total, Money::from_cents(i64::MAX));
    }

    #[test]
    fn test_negative_prices_rejected() {
        assert!(SaleDraft::new()
            .line(DraftLine::new(1, Money::from_cents(-1)))
            .price()
            .is_err());
        assert!(SaleDraft::new()
            .line(cup())
            .delivery_fee(Money::from_cents(-500))
            .price()
            .is_err());
    }

    #[test]
    fn test_too_many_lines() {
        let mut draft = SaleDraft::new();
        for _ in 0..=MAX_CART_ITEMS {
            draft = draft.line(cup());
        }
        assert!(matches!(draft.price(), Err(CoreError::CartTooLarge { .. })));
    }

    #[test]
    fn test_blank_note_dropped() {
        let priced = SaleDraft::new().line(cup()).note("  ").price().unwrap();
        assert_eq!(priced.note, None);
    }

    #[test]
    fn test_deserialize_client_payload() {
        let json = r#"{
            "items": [
                {"product_id": 1, "unit_price_cents": 1800,
                 "addons": [{"addon_id": 1, "quantity": 2, "unit_price_cents": 300}]}
            ],
            "delivery_fee_cents": 500,
            "channel_id": 1,
            "payment_method_id": 2
        }"#;
        let draft: SaleDraft = serde_json::from_str(json).unwrap();
        assert_eq!(draft.items[0].quantity, None);
        assert_eq!(draft.price().unwrap().total.cents(), 2900);
    }
}
