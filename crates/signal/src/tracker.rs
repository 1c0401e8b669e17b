use std::collections::VecDeque;

use agora_core::BookSnapshot;

use crate::mlofi::{ImbalanceSample, quantity_at};

/// Tuning for the imbalance signal and the price offset derived from it.
///
/// The mapping from MLOFI magnitude to price shift has no canonical
/// functional form, so every constant here is configuration rather than a
/// built-in.
#[derive(Debug, Clone)]
pub struct SignalConfig {
    /// Number of book levels the signal looks into (m)
    pub depth: usize,
    /// Rolling window of snapshot transitions to accumulate
    pub window: usize,
    /// Per-level geometric decay applied to deeper levels
    pub level_decay: f64,
    /// Scale applied to the depth-normalised flow when quoting
    pub impact_coefficient: f64,
    /// Noise threshold for the significance filter
    pub significance_threshold: f64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            depth: 3,
            window: 10,
            level_decay: 0.8,
            impact_coefficient: 5.0,
            significance_threshold: 0.6,
        }
    }
}

/// Rolling MLOFI state built from consecutive book snapshots.
///
/// The tracker keeps the last `window` snapshot transitions: per-level
/// signed flows, per-level mean depths, and per-side resting volumes.
/// Until two snapshots have been observed every reading is zero.
#[derive(Debug)]
pub struct ImbalanceTracker {
    config: SignalConfig,
    last: Option<BookSnapshot>,
    samples: VecDeque<ImbalanceSample>,
    depths: VecDeque<Vec<f64>>,
    bid_volumes: VecDeque<Vec<f64>>,
    ask_volumes: VecDeque<Vec<f64>>,
}

impl ImbalanceTracker {
    pub fn new(config: SignalConfig) -> Self {
        Self {
            config,
            last: None,
            samples: VecDeque::new(),
            depths: VecDeque::new(),
            bid_volumes: VecDeque::new(),
            ask_volumes: VecDeque::new(),
        }
    }

    pub fn config(&self) -> &SignalConfig {
        &self.config
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Feed the next book snapshot. The first observation only seeds the
    /// baseline; readings start with the second.
    pub fn observe(&mut self, snapshot: &BookSnapshot) {
        let m = self.config.depth;

        if let Some(prev) = &self.last {
            let sample = ImbalanceSample::from_snapshots(prev, snapshot, m);
            push_bounded(&mut self.samples, sample, self.config.window);

            let depths = (1..=m)
                .map(|n| {
                    (quantity_at(&snapshot.bids, n) + quantity_at(&snapshot.asks, n)) / 2.0
                })
                .collect();
            push_bounded(&mut self.depths, depths, self.config.window);

            let bid_volumes = (1..=m).map(|n| quantity_at(&snapshot.bids, n)).collect();
            push_bounded(&mut self.bid_volumes, bid_volumes, self.config.window);

            let ask_volumes = (1..=m).map(|n| quantity_at(&snapshot.asks, n)).collect();
            push_bounded(&mut self.ask_volumes, ask_volumes, self.config.window);
        }

        self.last = Some(snapshot.clone());
    }

    /// Most recent aggregate MLOFI value; zero before two snapshots exist.
    pub fn latest(&self) -> f64 {
        self.samples.back().map(|s| s.value).unwrap_or(0.0)
    }

    /// Price offset implied by the accumulated imbalance.
    ///
    /// Per level: cumulative signed flow over the window, normalised by the
    /// mean resting depth at that level (plus one, so thin books do not
    /// explode the ratio), scaled by the impact coefficient and decayed
    /// geometrically with level.
    pub fn price_offset(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }

        let m = self.config.depth;
        let n = self.depths.len() as f64;
        let mut offset = 0.0;

        for i in 0..m {
            let flow: f64 = self.samples.iter().map(|s| s.per_level[i]).sum();
            let mean_depth = self.depths.iter().map(|d| d[i]).sum::<f64>() / n + 1.0;
            offset += flow * self.config.impact_coefficient * self.config.level_decay.powi(i as i32)
                / mean_depth;
        }

        offset
    }

    /// Exp-decay weighted bid/ask resting-volume imbalance in [-1, 1].
    ///
    /// This is the statistic fed to the significance filter: near zero the
    /// book is balanced and the offset is treated as noise.
    pub fn volume_ratio(&self) -> f64 {
        if self.bid_volumes.is_empty() {
            return 0.0;
        }

        let m = self.config.depth;
        let n = self.bid_volumes.len() as f64;
        let mut v_bid = 0.0;
        let mut v_ask = 0.0;

        for i in 0..m {
            let mean_bid = self.bid_volumes.iter().map(|v| v[i]).sum::<f64>() / n + 1.0;
            let mean_ask = self.ask_volumes.iter().map(|v| v[i]).sum::<f64>() / n + 1.0;
            let weight = (-0.5 * i as f64).exp();
            v_bid += weight * mean_bid;
            v_ask += weight * mean_ask;
        }

        (v_bid - v_ask) / (v_bid + v_ask)
    }
}

fn push_bounded<T>(buf: &mut VecDeque<T>, item: T, cap: usize) {
    buf.push_back(item);
    while buf.len() > cap {
        buf.pop_front();
    }
}
