use serde::{Deserialize, Serialize};

use crate::values::{Price, Quantity};

/// A single aggregated price level of one book side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price: Price,
    pub quantity: Quantity,
}

impl PriceLevel {
    pub fn new(price: Price, quantity: Quantity) -> Self {
        PriceLevel { price, quantity }
    }

    pub fn is_empty(&self) -> bool {
        self.quantity.is_zero()
    }
}

impl From<(Price, Quantity)> for PriceLevel {
    fn from((price, quantity): (Price, Quantity)) -> Self {
        PriceLevel { price, quantity }
    }
}
