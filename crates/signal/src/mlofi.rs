use agora_core::{BookSnapshot, PriceLevel, Tick};

/// (price, quantity) at 1-based `level`, zero-filled past the end of the
/// ladder. Missing depth is treated as zero quantity, never as an error.
fn level_at(levels: &[PriceLevel], level: usize) -> (f64, f64) {
    match levels.get(level - 1) {
        Some(l) => (l.price.to_f64(), l.quantity.to_f64()),
        None => (0.0, 0.0),
    }
}

pub(crate) fn quantity_at(levels: &[PriceLevel], level: usize) -> f64 {
    level_at(levels, level).1
}

/// Signed order-flow contribution of one book level between two consecutive
/// snapshots of the same book.
///
/// Bid-side growth counts as positive pressure, ask-side growth as negative.
/// When the level's price moved, the whole resting quantity that appeared
/// (or disappeared) is attributed to the flow:
/// - bid price improved: the new resting quantity arrived
/// - bid price unchanged: the quantity delta
/// - bid price worsened: the old resting quantity was consumed or pulled
///
/// The ask side is symmetric with opposite sign.
pub fn level_flow(prev: &BookSnapshot, curr: &BookSnapshot, level: usize) -> f64 {
    let (bid_p, bid_q) = level_at(&curr.bids, level);
    let (prev_bid_p, prev_bid_q) = level_at(&prev.bids, level);
    let (ask_p, ask_q) = level_at(&curr.asks, level);
    let (prev_ask_p, prev_ask_q) = level_at(&prev.asks, level);

    let bid_flow = if bid_p > prev_bid_p {
        bid_q
    } else if bid_p == prev_bid_p {
        bid_q - prev_bid_q
    } else {
        -prev_bid_q
    };

    let ask_flow = if ask_p > prev_ask_p {
        -prev_ask_q
    } else if ask_p == prev_ask_p {
        ask_q - prev_ask_q
    } else {
        ask_q
    };

    bid_flow - ask_flow
}

/// Aggregate MLOFI across levels `1..=depth`.
///
/// Pure and deterministic: identical snapshot pairs and depth always produce
/// the same value. Larger `depth` broadens how deep into the book the
/// imbalance looks; levels beyond the resting ladder contribute zero.
pub fn imbalance_alter(prev: &BookSnapshot, curr: &BookSnapshot, depth: usize) -> f64 {
    (1..=depth).map(|n| level_flow(prev, curr, n)).sum()
}

/// Noise filter: an imbalance is significant when its magnitude strictly
/// clears `threshold`.
pub fn is_imbalance_significant(value: f64, threshold: f64) -> bool {
    value.abs() > threshold
}

/// Per-level flows and their aggregate for one snapshot transition
#[derive(Debug, Clone)]
pub struct ImbalanceSample {
    pub tick: Tick,
    pub per_level: Vec<f64>,
    pub value: f64,
}

impl ImbalanceSample {
    pub fn from_snapshots(prev: &BookSnapshot, curr: &BookSnapshot, depth: usize) -> Self {
        let per_level: Vec<f64> = (1..=depth).map(|n| level_flow(prev, curr, n)).collect();
        let value = per_level.iter().sum();
        Self {
            tick: curr.tick,
            per_level,
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_core::{Price, Quantity};
    use approx::assert_relative_eq;

    fn snapshot(tick: Tick, bids: &[(i64, i64)], asks: &[(i64, i64)]) -> BookSnapshot {
        BookSnapshot {
            tick,
            revision: tick,
            bids: bids
                .iter()
                .map(|(p, q)| PriceLevel::new(Price::from_int(*p), Quantity::from_int(*q)))
                .collect(),
            asks: asks
                .iter()
                .map(|(p, q)| PriceLevel::new(Price::from_int(*p), Quantity::from_int(*q)))
                .collect(),
        }
    }

    #[test]
    fn test_bid_growth_is_positive_pressure() {
        let prev = snapshot(0, &[(100, 5)], &[(105, 5)]);
        let curr = snapshot(1, &[(100, 8)], &[(105, 5)]);

        assert_relative_eq!(level_flow(&prev, &curr, 1), 3.0);
    }

    #[test]
    fn test_ask_growth_is_negative_pressure() {
        let prev = snapshot(0, &[(100, 5)], &[(105, 5)]);
        let curr = snapshot(1, &[(100, 5)], &[(105, 9)]);

        assert_relative_eq!(level_flow(&prev, &curr, 1), -4.0);
    }

    #[test]
    fn test_price_improvement_counts_full_quantity() {
        // a new best bid appears above the old one
        let prev = snapshot(0, &[(100, 5)], &[(105, 5)]);
        let curr = snapshot(1, &[(101, 2), (100, 5)], &[(105, 5)]);

        // level 1: improved bid contributes its resting quantity
        assert_relative_eq!(level_flow(&prev, &curr, 1), 2.0);
        // level 2: the old best slid down one level, price rose from nothing
        assert_relative_eq!(level_flow(&prev, &curr, 2), 5.0);
    }

    #[test]
    fn test_bid_consumed_counts_negative() {
        let prev = snapshot(0, &[(100, 5), (99, 3)], &[(105, 5)]);
        let curr = snapshot(1, &[(99, 3)], &[(105, 5)]);

        // best bid dropped from 100 to 99: the old resting quantity left
        assert_relative_eq!(level_flow(&prev, &curr, 1), -5.0);
    }

    #[test]
    fn test_imbalance_alter_is_deterministic() {
        let prev = snapshot(0, &[(100, 5), (99, 2)], &[(105, 4)]);
        let curr = snapshot(1, &[(100, 7), (99, 2)], &[(105, 1)]);

        let first = imbalance_alter(&prev, &curr, 3);
        let second = imbalance_alter(&prev, &curr, 3);
        assert_eq!(first, second);
        // bid +2 at level 1, ask -3 consumed at level 1
        assert_relative_eq!(first, 5.0);
    }

    #[test]
    fn test_depth_beyond_ladder_is_zero_filled() {
        // only 2 resting bid levels, depth 5 requested: no error, levels 3-5
        // contribute nothing
        let prev = snapshot(0, &[(100, 5), (99, 2)], &[]);
        let curr = snapshot(1, &[(100, 5), (99, 2)], &[]);

        assert_relative_eq!(imbalance_alter(&prev, &curr, 5), 0.0);
        assert_relative_eq!(level_flow(&prev, &curr, 4), 0.0);
    }

    #[test]
    fn test_sample_aggregates_per_level_flows() {
        let prev = snapshot(0, &[(100, 5), (99, 2)], &[(105, 4)]);
        let curr = snapshot(3, &[(100, 6), (99, 4)], &[(105, 4)]);

        let sample = ImbalanceSample::from_snapshots(&prev, &curr, 2);
        assert_eq!(sample.tick, 3);
        assert_eq!(sample.per_level.len(), 2);
        assert_relative_eq!(sample.per_level[0], 1.0);
        assert_relative_eq!(sample.per_level[1], 2.0);
        assert_relative_eq!(sample.value, 3.0);
    }

    #[test]
    fn test_significance_threshold() {
        assert!(is_imbalance_significant(0.7, 0.6));
        assert!(is_imbalance_significant(-0.7, 0.6));
        assert!(!is_imbalance_significant(0.5, 0.6));
        assert!(!is_imbalance_significant(-0.5, 0.6));
        // boundary is not significant
        assert!(!is_imbalance_significant(0.6, 0.6));
    }

    #[test]
    fn test_significance_monotone_in_threshold() {
        // below threshold stays insignificant for any smaller magnitude
        assert!(!is_imbalance_significant(0.2, 0.6));
        assert!(!is_imbalance_significant(0.1, 0.6));
        // raising the threshold above a significant value flips it
        assert!(is_imbalance_significant(0.7, 0.6));
        assert!(!is_imbalance_significant(0.7, 0.8));
    }
}
