//! Customer assignment schedules.
//!
//! Traders do not invent their own valuations: limit prices arrive as
//! customer assignments drawn from the configured supply/demand schedules,
//! spread over the replenishment interval by the configured time mode.

use agora_agents::Assignment;
use agora_core::{Price, Quantity, Side, Tick};
use rand::prelude::*;
use rand_distr::Exp;

use crate::config::{ScheduleConfig, SideSchedule, StepMode, TimeMode};

#[derive(Debug, Clone)]
struct Pending {
    slot: usize,
    side: Side,
    limit: i64,
    quantity: i64,
    issue_tick: Tick,
}

/// Generates and issues customer assignments for one session.
///
/// Buyer slots are `0..n_buyers`, seller slots follow. When the pending
/// queue drains, a fresh batch is generated for both sides.
pub(crate) struct AssignmentScheduler {
    config: ScheduleConfig,
    price_floor: i64,
    price_ceiling: i64,
    n_buyers: usize,
    n_sellers: usize,
    rng: StdRng,
    pending: Vec<Pending>,
    next_id: u64,
}

impl AssignmentScheduler {
    pub fn new(
        config: ScheduleConfig,
        price_floor: i64,
        price_ceiling: i64,
        n_buyers: usize,
        n_sellers: usize,
        seed: u64,
    ) -> Self {
        Self {
            config,
            price_floor,
            price_ceiling,
            n_buyers,
            n_sellers,
            rng: StdRng::seed_from_u64(seed),
            pending: Vec::new(),
            next_id: 0,
        }
    }

    /// Assignments due at `tick`, as (trader slot, assignment) pairs
    pub fn due(&mut self, tick: Tick) -> Vec<(usize, Assignment)> {
        if self.pending.is_empty() {
            self.generate_batch(tick);
        }

        let (due, rest): (Vec<Pending>, Vec<Pending>) = self
            .pending
            .drain(..)
            .partition(|p| p.issue_tick <= tick);
        self.pending = rest;

        due.into_iter()
            .map(|p| {
                let id = self.next_id;
                self.next_id += 1;
                (
                    p.slot,
                    Assignment {
                        id,
                        side: p.side,
                        limit: Price::from_int(p.limit),
                        quantity: Quantity::from_int(p.quantity),
                        issued_at: tick,
                    },
                )
            })
            .collect()
    }

    fn generate_batch(&mut self, tick: Tick) {
        let demand = self.config.demand.clone();
        let issue_times = self.issue_times(self.n_buyers, tick);
        for (i, issue_tick) in issue_times.into_iter().enumerate() {
            let limit = self.order_price(i, self.n_buyers, &demand);
            let quantity = self.rng.gen_range(1..=self.config.max_quantity);
            self.pending.push(Pending {
                slot: i,
                side: Side::Buy,
                limit,
                quantity,
                issue_tick,
            });
        }

        let supply = self.config.supply.clone();
        let issue_times = self.issue_times(self.n_sellers, tick);
        for (i, issue_tick) in issue_times.into_iter().enumerate() {
            let limit = self.order_price(i, self.n_sellers, &supply);
            let quantity = self.rng.gen_range(1..=self.config.max_quantity);
            self.pending.push(Pending {
                slot: self.n_buyers + i,
                side: Side::Sell,
                limit,
                quantity,
                issue_tick,
            });
        }
    }

    /// Limit price for the `i`-th of `n` traders on one side
    fn order_price(&mut self, i: usize, n: usize, side: &SideSchedule) -> i64 {
        let lo = side.price_low.clamp(self.price_floor, self.price_ceiling);
        let hi = side.price_high.clamp(self.price_floor, self.price_ceiling);
        let range = (hi - lo) as f64;
        let step = if n > 1 { range / (n as f64 - 1.0) } else { 0.0 };

        let price = match side.step_mode {
            StepMode::Fixed => lo + (i as f64 * step) as i64,
            StepMode::Jittered => {
                let base = lo + (i as f64 * step) as i64;
                let half = (step / 2.0).round() as i64;
                if half > 0 {
                    base + self.rng.gen_range(-half..=half)
                } else {
                    base
                }
            }
            StepMode::Random => self.rng.gen_range(lo..=hi),
        };

        price.clamp(self.price_floor, self.price_ceiling)
    }

    /// Issue ticks for a batch of `n` assignments starting at `tick`
    fn issue_times(&mut self, n: usize, tick: Tick) -> Vec<Tick> {
        let interval = self.config.interval_ticks as f64;
        let tstep = interval / (n.max(2) - 1) as f64;
        let exp = Exp::new(n as f64 / interval);

        let mut arrival = 0.0;
        let mut offsets: Vec<f64> = Vec::with_capacity(n);
        for t in 0..n {
            let offset = match self.config.time_mode {
                TimeMode::Periodic => interval,
                TimeMode::DripFixed => t as f64 * tstep,
                TimeMode::DripJitter => {
                    t as f64 * tstep + tstep * self.rng.gen_range(0.0..1.0)
                }
                TimeMode::DripPoisson => {
                    arrival += match &exp {
                        Ok(d) => d.sample(&mut self.rng),
                        Err(_) => tstep,
                    };
                    arrival
                }
            };
            offsets.push(offset);
        }

        // squish poisson arrivals so the batch still fits the interval
        if self.config.time_mode == TimeMode::DripPoisson && arrival > interval {
            for offset in &mut offsets {
                *offset *= interval / arrival;
            }
        }

        offsets.shuffle(&mut self.rng);
        offsets
            .into_iter()
            .map(|offset| tick + offset.round() as Tick)
            .collect()
    }
}
