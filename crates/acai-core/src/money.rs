//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    18.00 + 3.00 * 2 + 5.00 might not be exactly 29.00                   │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    1800 + 300 * 2 + 500 = 2900 cents, always                            │
//! │    Sale totals are exact sums of line subtotals                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use acai_core::money::Money;
//!
//! let cup = Money::from_cents(1800);        // R$ 18,00
//! let line = cup.multiply_quantity(2);       // R$ 36,00
//! let total = line + Money::from_cents(500); // R$ 41,00
//! assert_eq!(total.cents(), 4100);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::quantity::Quantity;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in centavos (the smallest BRL unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: Differences and balances may go negative
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Serialized as a bare integer**: `{"total_cents": 2900}`
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product.price ──► DraftLine.unit_price ──► SaleItem.subtotal          │
/// │                                                    │                    │
/// │  DraftAddOn.unit_price ──► SaleItemAddOn.subtotal ─┤                    │
/// │                                                    ▼                    │
/// │  delivery_fee ─────────────────────────────────► Sale.total            │
/// │                                                                         │
/// │  StockMovement.unit_cost × Quantity ──► StockMovement.total_cost       │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use acai_core::money::Money;
    ///
    /// let price = Money::from_cents(1800); // R$ 18,00
    /// assert_eq!(price.cents(), 1800);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from reais and centavos.
    ///
    /// For negative amounts, only the major unit should be negative.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole reais portion.
    #[inline]
    pub const fn reais(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the centavos portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a whole quantity (sale lines and add-ons).
    ///
    /// ## Example
    /// ```rust
    /// use acai_core::money::Money;
    ///
    /// let banana = Money::from_cents(300);
    /// assert_eq!(banana.multiply_quantity(2).cents(), 600);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Multiplies a unit cost by a fractional stock quantity.
    ///
    /// The result is rounded half away from zero to the nearest cent:
    /// `(cents × milli ± 500) / 1000`, computed in i128.
    ///
    /// ## Example
    /// ```rust
    /// use acai_core::money::Money;
    /// use acai_core::quantity::Quantity;
    ///
    /// let per_kg = Money::from_cents(250);           // R$ 2,50 / kg
    /// let weight = Quantity::from_milli(1_333);      // 1.333 kg
    /// assert_eq!(per_kg.times_quantity(weight).cents(), 333); // 3.3325 → 3.33
    /// ```
    ///
    /// Saturates at the `i64` bounds; use [`Money::checked_times_quantity`]
    /// where an overflow must be reported.
    pub fn times_quantity(&self, qty: Quantity) -> Money {
        let rounded = self.rounded_product(qty);
        match i64::try_from(rounded) {
            Ok(cents) => Money(cents),
            Err(_) if rounded < 0 => Money(i64::MIN),
            Err(_) => Money(i64::MAX),
        }
    }

    /// Like [`Money::times_quantity`], `None` when the cents do not fit in i64.
    pub fn checked_times_quantity(&self, qty: Quantity) -> Option<Money> {
        i64::try_from(self.rounded_product(qty)).ok().map(Money)
    }

    /// Like [`Money::multiply_quantity`], `None` on overflow.
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Checked addition, `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Sums an iterator of amounts, `None` as soon as the running total overflows.
    pub fn checked_sum<I>(iter: I) -> Option<Money>
    where
        I: IntoIterator<Item = Money>,
    {
        iter.into_iter()
            .try_fold(Money::zero(), |acc, m| acc.checked_add(m))
    }

    fn rounded_product(&self, qty: Quantity) -> i128 {
        let product = self.0 as i128 * qty.milli() as i128;
        if product >= 0 {
            (product + 500) / 1000
        } else {
            (product - 500) / 1000
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows money the way the shop prints it: `R$ 29,00`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}R$ {},{:02}",
            sign,
            self.reais().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by a whole quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Multiplication by a stock quantity (rounded to the cent).
impl Mul<Quantity> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: Quantity) -> Self {
        self.times_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
