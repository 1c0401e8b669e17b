use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entities::PriceLevel;
use crate::values::{Price, Tick};

/// Immutable snapshot of the aggregated book state at one instant.
///
/// Levels are best-first (bids descending, asks ascending) and truncated to
/// the publishing depth. `revision` is the book's mutation counter at capture
/// time, so two snapshots with equal revision describe the identical book.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSnapshot {
    pub tick: Tick,
    pub revision: u64,
    pub bids: Vec<PriceLevel>,
    pub asks: Vec<PriceLevel>,
}

impl BookSnapshot {
    pub fn empty(tick: Tick) -> Self {
        Self {
            tick,
            revision: 0,
            bids: Vec::new(),
            asks: Vec::new(),
        }
    }

    pub fn best_bid(&self) -> Option<&PriceLevel> {
        self.bids.first()
    }

    pub fn best_ask(&self) -> Option<&PriceLevel> {
        self.asks.first()
    }

    /// Mid price between best bid and ask, if both sides are quoted
    pub fn mid_price(&self) -> Option<Price> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => {
                let mid = (bid.price.inner() + ask.price.inner()) / Decimal::TWO;
                Some(Price::new(mid))
            }
            _ => None,
        }
    }
}
