//! Agora Signal
//!
//! Multi-Level Order-Flow Imbalance (MLOFI): a scalar signal summarising net
//! buy/sell pressure across several book depth levels between two points in
//! time, plus a significance filter that suppresses noise-level readings.

mod mlofi;
mod tracker;

pub use mlofi::{ImbalanceSample, imbalance_alter, is_imbalance_significant, level_flow};
pub use tracker::{ImbalanceTracker, SignalConfig};
