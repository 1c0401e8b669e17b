use agora_core::{BookSnapshot, Price, PriceLevel, Tick};
use rust_decimal::Decimal;

/// Market state published to traders.
///
/// A read-only view of the book after the most recent event, with the
/// aggregated depth ladder truncated to the session's publishing depth and
/// the system price band traders must quote within.
#[derive(Debug, Clone)]
pub struct MarketView {
    pub tick: Tick,
    pub revision: u64,
    /// Top N bid levels, best first
    pub bids: Vec<PriceLevel>,
    /// Top N ask levels, best first
    pub asks: Vec<PriceLevel>,
    /// Price of the most recent trade, if any
    pub last_trade: Option<Price>,
    pub price_floor: Price,
    pub price_ceiling: Price,
}

impl MarketView {
    pub fn best_bid(&self) -> Option<&PriceLevel> {
        self.bids.first()
    }

    pub fn best_ask(&self) -> Option<&PriceLevel> {
        self.asks.first()
    }

    pub fn has_bids(&self) -> bool {
        !self.bids.is_empty()
    }

    pub fn has_asks(&self) -> bool {
        !self.asks.is_empty()
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

    /// The depth ladder as a book snapshot, the unit the imbalance signal
    /// consumes
    pub fn as_snapshot(&self) -> BookSnapshot {
        BookSnapshot {
            tick: self.tick,
            revision: self.revision,
            bids: self.bids.clone(),
            asks: self.asks.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_core::Quantity;

    fn view(bids: &[(i64, i64)], asks: &[(i64, i64)]) -> MarketView {
        MarketView {
            tick: 0,
            revision: 0,
            bids: bids
                .iter()
                .map(|(p, q)| PriceLevel::new(Price::from_int(*p), Quantity::from_int(*q)))
                .collect(),
            asks: asks
                .iter()
                .map(|(p, q)| PriceLevel::new(Price::from_int(*p), Quantity::from_int(*q)))
                .collect(),
            last_trade: None,
            price_floor: Price::from_int(1),
            price_ceiling: Price::from_int(200),
        }
    }

    #[test]
    fn test_mid_price_requires_both_sides() {
        assert_eq!(view(&[], &[]).mid_price(), None);
        assert_eq!(view(&[(99, 1)], &[]).mid_price(), None);
        assert_eq!(
            view(&[(99, 1)], &[(101, 1)]).mid_price(),
            Some(Price::from_int(100))
        );
    }

    #[test]
    fn test_as_snapshot_carries_ladder() {
        let v = view(&[(99, 1), (98, 2)], &[(101, 1)]);
        let snap = v.as_snapshot();
        assert_eq!(snap.bids.len(), 2);
        assert_eq!(snap.asks.len(), 1);
        assert_eq!(snap.tick, v.tick);
    }
}
