use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Quantity(Decimal);

impl Quantity {
    pub const ZERO: Quantity = Quantity(Decimal::ZERO);

    pub fn new(value: Decimal) -> Self {
        Quantity(value)
    }

    pub fn from_int(value: i64) -> Self {
        Quantity(Decimal::from(value))
    }

    pub fn inner(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(0.0)
    }

    pub fn min(self, other: Quantity) -> Quantity {
        if self <= other { self } else { other }
    }

    /// Subtraction that never goes below zero.
    pub fn saturating_sub(self, rhs: Quantity) -> Quantity {
        if rhs.0 >= self.0 {
            Quantity::ZERO
        } else {
            Quantity(self.0 - rhs.0)
        }
    }
}

impl From<Decimal> for Quantity {
    fn from(value: Decimal) -> Self {
        Quantity(value)
    }
}

impl From<Quantity> for Decimal {
    fn from(quantity: Quantity) -> Decimal {
        quantity.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Quantity {
    type Output = Quantity;
    fn add(self, rhs: Self) -> Self::Output {
        Quantity(self.0 + rhs.0)
    }
}

impl Sub for Quantity {
    type Output = Quantity;
    fn sub(self, rhs: Self) -> Self::Output {
        Quantity(self.0 - rhs.0)
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Quantity::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min() {
        let a = Quantity::from_int(10);
        let b = Quantity::from_int(4);
        assert_eq!(a.min(b), b);
        assert_eq!(b.min(a), b);
    }

    #[test]
    fn test_saturating_sub() {
        let a = Quantity::from_int(5);
        let b = Quantity::from_int(8);
        assert_eq!(b.saturating_sub(a), Quantity::from_int(3));
        assert_eq!(a.saturating_sub(b), Quantity::ZERO);
    }

    #[test]
    fn test_is_positive() {
        assert!(Quantity::from_int(1).is_positive());
        assert!(!Quantity::ZERO.is_positive());
        assert!(!Quantity::from_int(-1).is_positive());
    }
}
