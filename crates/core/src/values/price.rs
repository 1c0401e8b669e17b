use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Price(Decimal);

impl Price {
    pub const ZERO: Price = Price(Decimal::ZERO);

    pub fn new(value: Decimal) -> Self {
        Price(value)
    }

    /// Whole-currency-unit price (the simulator quotes in integer ticks)
    pub fn from_int(value: i64) -> Self {
        Price(Decimal::from(value))
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

    pub fn to_i64(&self) -> i64 {
        self.0.to_i64().unwrap_or(0)
    }

    /// Build a price from a float, rounded to the nearest whole tick.
    /// Falls back to zero on non-finite input.
    pub fn from_f64_rounded(value: f64) -> Self {
        Decimal::from_f64(value)
            .map(|d| Price(d.round()))
            .unwrap_or(Price::ZERO)
    }

    pub fn min(self, other: Price) -> Price {
        if self <= other { self } else { other }
    }

    pub fn max(self, other: Price) -> Price {
        if self >= other { self } else { other }
    }

    /// Clamp into the inclusive `[floor, ceiling]` band.
    pub fn clamp_to(self, floor: Price, ceiling: Price) -> Price {
        self.max(floor).min(ceiling)
    }
}

impl From<Decimal> for Price {
    fn from(value: Decimal) -> Self {
        Price(value)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Decimal {
        price.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Price {
    type Output = Price;
    fn add(self, rhs: Self) -> Self::Output {
        Price(self.0 + rhs.0)
    }
}

impl Sub for Price {
    type Output = Price;
    fn sub(self, rhs: Self) -> Self::Output {
        Price(self.0 - rhs.0)
    }
}

impl Mul<Decimal> for Price {
    type Output = Price;
    fn mul(self, rhs: Decimal) -> Self::Output {
        Price(self.0 * rhs)
    }
}

impl Div<Decimal> for Price {
    type Output = Price;
    fn div(self, rhs: Decimal) -> Self::Output {
        Price(self.0 / rhs)
    }
}

impl Default for Price {
    fn default() -> Self {
        Price::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_int() {
        assert_eq!(Price::from_int(105).inner(), dec!(105));
    }

    #[test]
    fn test_ordering() {
        assert!(Price::from_int(99) < Price::from_int(100));
        assert_eq!(
            Price::from_int(100).min(Price::from_int(95)),
            Price::from_int(95)
        );
        assert_eq!(
            Price::from_int(100).max(Price::from_int(95)),
            Price::from_int(100)
        );
    }

    #[test]
    fn test_clamp_to() {
        let floor = Price::from_int(1);
        let ceiling = Price::from_int(200);
        assert_eq!(Price::from_int(250).clamp_to(floor, ceiling), ceiling);
        assert_eq!(Price::from_int(0).clamp_to(floor, ceiling), floor);
        assert_eq!(
            Price::from_int(50).clamp_to(floor, ceiling),
            Price::from_int(50)
        );
    }

    #[test]
    fn test_from_f64_rounded() {
        assert_eq!(Price::from_f64_rounded(104.5001), Price::from_int(105));
        assert_eq!(Price::from_f64_rounded(104.2), Price::from_int(104));
        assert_eq!(Price::from_f64_rounded(f64::NAN), Price::ZERO);
    }

    #[test]
    fn test_arithmetic() {
        let a = Price::from_int(100);
        let b = Price::from_int(40);
        assert_eq!(a + b, Price::from_int(140));
        assert_eq!(a - b, Price::from_int(60));
        assert_eq!(a * dec!(2), Price::from_int(200));
        assert_eq!(a / dec!(2), Price::from_int(50));
    }
}
