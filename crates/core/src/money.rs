//! Fixed-point monetary and quantity values.
//!
//! Every amount crossing a domain boundary is a decimal with a fixed scale:
//! quantities carry 3 fractional digits, unit prices 4, and monetary totals 2.
//! Values are rounded half-up (away from zero) to their scale on construction,
//! so repeated additions never drift.

use core::iter::Sum;
use core::ops::{Add, Sub};
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Monetary total (2 fractional digits).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

/// Ordered or received quantity (3 fractional digits).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "Decimal", into = "Decimal")]
pub struct Quantity(Decimal);

/// Price of a single unit (4 fractional digits).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "Decimal", into = "Decimal")]
pub struct UnitPrice(Decimal);

macro_rules! impl_decimal_newtype {
    ($t:ident, $scale:expr, $name:literal) => {
        impl $t {
            /// Number of fractional digits this value is kept at.
            pub const SCALE: u32 = $scale;

            /// Round `value` half-up to [`Self::SCALE`] digits.
            pub fn new(value: Decimal) -> Self {
                let mut rounded =
                    value.round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointAwayFromZero);
                rounded.rescale(Self::SCALE);
                Self(rounded)
            }

            pub fn zero() -> Self {
                Self::new(Decimal::ZERO)
            }

            pub fn value(&self) -> Decimal {
                self.0
            }

            pub fn is_zero(&self) -> bool {
                self.0.is_zero()
            }

            /// Strictly greater than zero.
            pub fn is_positive(&self) -> bool {
                self.0 > Decimal::ZERO
            }
        }

        impl From<Decimal> for $t {
            fn from(value: Decimal) -> Self {
                Self::new(value)
            }
        }

        impl From<$t> for Decimal {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value = Decimal::from_str(s.trim()).map_err(|e| {
                    DomainError::business_rule(format!("{}: invalid decimal '{}': {}", $name, s, e))
                })?;
                Ok(Self::new(value))
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

impl_decimal_newtype!(Money, 2, "Money");
impl_decimal_newtype!(Quantity, 3, "Quantity");
impl_decimal_newtype!(UnitPrice, 4, "UnitPrice");

impl Money {
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money::new)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money::new(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money::new(self.0 - rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

impl Quantity {
    /// `self * price`, rounded to a monetary total. `None` on overflow.
    pub fn checked_total(self, price: UnitPrice) -> Option<Money> {
        self.0.checked_mul(price.0).map(Money::new)
    }
}

impl Sub for Quantity {
    type Output = Quantity;

    fn sub(self, rhs: Quantity) -> Quantity {
        Quantity::new(self.0 - rhs.0)
    }
}
