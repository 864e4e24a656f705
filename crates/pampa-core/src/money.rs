//! # Money Type
//!
//! Fixed-point monetary values stored as integer cents.
//!
//! ## Why Integer Cents?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Floating Point Money = Bugs                          │
//! │                                                                         │
//! │  f64:  0.1 + 0.2 = 0.30000000000000004   ← drift accumulates            │
//! │  i64:  10  + 20  = 30                    ← exact, always                │
//! │                                                                         │
//! │  All arithmetic happens on i64 cents. Widening to i128 for              │
//! │  intermediate products keeps multiplication overflow-free.              │
//! │                                                                         │
//! │  Range: ±92,233,720,368,547,758.07 pesos — enough for any register.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rounding Policy
//! Every division in this module rounds half-up (0.5 cents rounds away from
//! zero). Splits are computed as `net = round(total / 1.21)` and
//! `iva = total - net`, so the parts always re-add to the original total.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

// =============================================================================
// Money
// =============================================================================

/// A monetary amount in Argentine pesos, stored as integer cents.
///
/// ## Examples
/// ```
/// use pampa_core::Money;
///
/// let price = Money::from_cents(150000); // $1500.00
/// let total = price * 3;
/// assert_eq!(total, Money::from_cents(450000));
/// assert_eq!(total.to_string(), "$4500.00");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero pesos.
    pub const ZERO: Money = Money(0);

    /// Creates a Money value from integer cents.
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole pesos.
    pub const fn from_pesos(pesos: i64) -> Self {
        Money(pesos * 100)
    }

    /// Returns the raw cent count.
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-peso part (truncated toward zero).
    pub const fn pesos(&self) -> i64 {
        self.0 / 100
    }

    /// True if the amount is exactly zero.
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// True if the amount is strictly negative.
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Absolute value.
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Parses operator-typed text into a non-negative amount.
    ///
    /// Accepts `"1234"`, `"1234.56"` and the comma form `"1234,56"` that
    /// Argentine keyboards produce. At most two decimal digits; anything
    /// else is rejected rather than silently rounded.
    ///
    /// ## Examples
    /// ```
    /// use pampa_core::Money;
    ///
    /// assert_eq!(Money::parse("1500").unwrap().cents(), 150000);
    /// assert_eq!(Money::parse("1500,50").unwrap().cents(), 150050);
    /// assert_eq!(Money::parse("1500.5").unwrap().cents(), 150050);
    /// assert!(Money::parse("-50").is_err());
    /// ```
    pub fn parse(input: &str) -> CoreResult<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(CoreError::invalid_amount(input, "must not be empty"));
        }
        if trimmed.starts_with('-') {
            return Err(CoreError::invalid_amount(input, "must not be negative"));
        }

        // Comma and dot are both decimal separators here; a value using
        // more than one separator is ambiguous and gets rejected.
        let normalized = trimmed.replace(',', ".");
        let mut parts = normalized.splitn(2, '.');
        let whole_part = parts.next().unwrap_or("");
        let frac_part = parts.next().unwrap_or("");

        if normalized.matches('.').count() > 1 {
            return Err(CoreError::invalid_amount(input, "too many separators"));
        }
        if whole_part.is_empty() && frac_part.is_empty() {
            return Err(CoreError::invalid_amount(input, "must contain digits"));
        }
        if !whole_part.chars().all(|c| c.is_ascii_digit())
            || !frac_part.chars().all(|c| c.is_ascii_digit())
        {
            return Err(CoreError::invalid_amount(input, "must be a number"));
        }
        if frac_part.len() > 2 {
            return Err(CoreError::invalid_amount(
                input,
                "at most two decimal places",
            ));
        }

        let whole: i64 = if whole_part.is_empty() {
            0
        } else {
            whole_part
                .parse()
                .map_err(|_| CoreError::invalid_amount(input, "amount too large"))?
        };
        let cents_frac: i64 = match frac_part.len() {
            0 => 0,
            1 => frac_part.parse::<i64>().unwrap_or(0) * 10,
            _ => frac_part.parse::<i64>().unwrap_or(0),
        };

        whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(cents_frac))
            .map(Money)
            .ok_or_else(|| CoreError::invalid_amount(input, "amount too large"))
    }

    /// Converts a float (e.g. deserialized from an external payload) into a
    /// non-negative amount, rounding half-up to the nearest cent.
    pub fn try_from_f64(value: f64) -> CoreResult<Self> {
        if !value.is_finite() {
            return Err(CoreError::invalid_amount(value, "must be a finite number"));
        }
        if value < 0.0 {
            return Err(CoreError::invalid_amount(value, "must not be negative"));
        }
        let cents = (value * 100.0).round();
        if cents > i64::MAX as f64 {
            return Err(CoreError::invalid_amount(value, "amount too large"));
        }
        Ok(Money(cents as i64))
    }

    /// Peso value as f64, for external payloads that expect decimal pesos.
    pub fn to_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Splits an IVA-inclusive total into `(net, iva)` at the 21% rate.
    ///
    /// The net is `round(total / 1.21)` with half-up rounding and the IVA is
    /// the remainder, so `net + iva == total` holds exactly.
    ///
    /// ## Examples
    /// ```
    /// use pampa_core::Money;
    ///
    /// let (net, iva) = Money::from_cents(12100).split_iva();
    /// assert_eq!(net, Money::from_cents(10000));
    /// assert_eq!(iva, Money::from_cents(2100));
    /// ```
    pub fn split_iva(&self) -> (Money, Money) {
        // net = round(cents * 100 / 121), computed as (cents*200 + 121) / 242
        // in i128 so the doubling never overflows.
        let net = ((self.0 as i128 * 200) + 121) / 242;
        let net = Money(net as i64);
        (net, *self - net)
    }

    /// Derives a sale price from a cost and a margin in basis points,
    /// rounding half-up to the nearest cent.
    ///
    /// A 30% margin is `margin_bps = 3000`.
    pub fn price_from_cost(cost: Money, margin_bps: i64) -> Money {
        let price = (cost.0 as i128 * (10_000 + margin_bps as i128) + 5_000) / 10_000;
        Money(price as i64)
    }
}

// =============================================================================
// Operators
// =============================================================================

impl Add for Money {
    type Output = Money;
    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;
    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Mul<i64> for Money {
    type Output = Money;
    fn mul(self, rhs: i64) -> Money {
        Money(self.0 * rhs)
    }
}

impl Mul<i32> for Money {
    type Output = Money;
    fn mul(self, rhs: i32) -> Money {
        Money(self.0 * rhs as i64)
    }
}

impl Neg for Money {
    type Output = Money;
    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        write!(f, "{}${}.{:02}", sign, abs / 100, abs % 100)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pesos() {
        assert_eq!(Money::from_pesos(15).cents(), 1500);
        assert_eq!(Money::from_pesos(0), Money::ZERO);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(123456).to_string(), "$1234.56");
        assert_eq!(Money::from_cents(5).to_string(), "$0.05");
        assert_eq!(Money::from_cents(-50).to_string(), "-$0.50");
        assert_eq!(Money::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(250);
        assert_eq!(a + b, Money::from_cents(1250));
        assert_eq!(a - b, Money::from_cents(750));
        assert_eq!(a * 3, Money::from_cents(3000));
        assert_eq!(-a, Money::from_cents(-1000));

        let mut acc = Money::ZERO;
        acc += a;
        acc -= b;
        assert_eq!(acc, Money::from_cents(750));
    }

    #[test]
    fn test_sum() {
        let total: Money = [100, 200, 300]
            .iter()
            .map(|&c| Money::from_cents(c))
            .sum();
        assert_eq!(total, Money::from_cents(600));
    }

    #[test]
    fn test_parse_plain_and_decimal() {
        assert_eq!(Money::parse("1500").unwrap().cents(), 150000);
        assert_eq!(Money::parse("1500.50").unwrap().cents(), 150050);
        assert_eq!(Money::parse("1500,50").unwrap().cents(), 150050);
        assert_eq!(Money::parse("0,5").unwrap().cents(), 50);
        assert_eq!(Money::parse(".75").unwrap().cents(), 75);
        assert_eq!(Money::parse(" 42 ").unwrap().cents(), 4200);
        assert_eq!(Money::parse("0").unwrap(), Money::ZERO);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(Money::parse("").is_err());
        assert!(Money::parse("   ").is_err());
        assert!(Money::parse("-50").is_err());
        assert!(Money::parse("abc").is_err());
        assert!(Money::parse("12.3.4").is_err());
        assert!(Money::parse("1.234,56").is_err());
        assert!(Money::parse("10.555").is_err());
        assert!(Money::parse("1e5").is_err());
    }

    #[test]
    fn test_try_from_f64() {
        assert_eq!(Money::try_from_f64(121.0).unwrap().cents(), 12100);
        assert_eq!(Money::try_from_f64(0.0).unwrap(), Money::ZERO);
        assert_eq!(Money::try_from_f64(99.99).unwrap().cents(), 9999);
        assert!(Money::try_from_f64(f64::NAN).is_err());
        assert!(Money::try_from_f64(f64::INFINITY).is_err());
        assert!(Money::try_from_f64(-1.0).is_err());
    }

    #[test]
    fn test_split_iva_canonical() {
        // $121.00 gross is exactly $100.00 net + $21.00 IVA.
        let (net, iva) = Money::from_cents(12100).split_iva();
        assert_eq!(net.cents(), 10000);
        assert_eq!(iva.cents(), 2100);
    }

    #[test]
    fn test_split_iva_rounds_half_up() {
        // 100 cents / 1.21 = 82.64... -> 83 net, 17 iva.
        let (net, iva) = Money::from_cents(100).split_iva();
        assert_eq!(net.cents(), 83);
        assert_eq!(iva.cents(), 17);

        // 60 cents / 1.21 = 49.58... -> 50 net, 10 iva.
        let (net, iva) = Money::from_cents(60).split_iva();
        assert_eq!(net.cents(), 50);
        assert_eq!(iva.cents(), 10);
    }

    #[test]
    fn test_split_iva_parts_rejoin() {
        for cents in [0, 1, 60, 99, 100, 121, 12100, 9_999_999, 123_456_789] {
            let total = Money::from_cents(cents);
            let (net, iva) = total.split_iva();
            assert_eq!(net + iva, total, "parts must re-add for {cents}");
            assert!(iva.cents() >= 0);
            assert!(net.cents() >= 0);
        }
    }

    #[test]
    fn test_price_from_cost() {
        // $10.00 cost at 30% margin -> $13.00.
        let price = Money::price_from_cost(Money::from_cents(1000), 3000);
        assert_eq!(price.cents(), 1300);

        // Half-cent boundary rounds up: 1 cent at 50% margin -> 2 cents.
        let price = Money::price_from_cost(Money::from_cents(1), 5000);
        assert_eq!(price.cents(), 2);

        // Zero margin keeps the cost.
        let price = Money::price_from_cost(Money::from_cents(999), 0);
        assert_eq!(price.cents(), 999);
    }
}
