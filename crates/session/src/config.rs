//! Experiment and session configuration.
//!
//! Loaded once from JSON before a session starts; the core has no runtime
//! reconfiguration. Every field has a sensible default so a minimal file
//! (or none at all) produces a runnable experiment.

use std::path::Path;

use agora_agents::ImpactConfig;
use agora_signal::SignalConfig;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Root configuration: how many sessions to replicate and how each behaves
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Number of independent trading-day sessions to run
    #[serde(default = "default_sessions")]
    pub sessions: u32,

    #[serde(default)]
    pub session: SessionConfig,
}

fn default_sessions() -> u32 {
    1
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            sessions: default_sessions(),
            session: SessionConfig::default(),
        }
    }
}

impl ExperimentConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sessions == 0 {
            return Err(ConfigError::Invalid("sessions must be at least 1".into()));
        }
        self.session.validate()
    }
}

/// Configuration of one trading-day session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session length in ticks; the session closes when the counter reaches it
    #[serde(default = "default_session_ticks")]
    pub session_ticks: u64,

    /// Random seed for determinism; replications derive per-session seeds
    #[serde(default)]
    pub seed: Option<u64>,

    /// Lowest price the system accepts
    #[serde(default = "default_price_floor")]
    pub price_floor: i64,

    /// Highest price the system accepts
    #[serde(default = "default_price_ceiling")]
    pub price_ceiling: i64,

    /// Book levels published to traders each event
    #[serde(default = "default_published_depth")]
    pub published_depth: usize,

    #[serde(default)]
    pub signal: SignalSettings,

    /// Buyer population, counts per strategy variant
    #[serde(default = "default_buyers")]
    pub buyers: Vec<PopulationEntry>,

    /// Seller population, counts per strategy variant
    #[serde(default = "default_sellers")]
    pub sellers: Vec<PopulationEntry>,

    #[serde(default)]
    pub schedule: ScheduleConfig,
}

fn default_session_ticks() -> u64 {
    500
}

fn default_price_floor() -> i64 {
    1
}

fn default_price_ceiling() -> i64 {
    200
}

fn default_published_depth() -> usize {
    5
}

fn default_buyers() -> Vec<PopulationEntry> {
    vec![
        PopulationEntry {
            strategy: StrategyKind::Zic,
            count: 8,
        },
        PopulationEntry {
            strategy: StrategyKind::Shaver,
            count: 4,
        },
    ]
}

fn default_sellers() -> Vec<PopulationEntry> {
    vec![
        PopulationEntry {
            strategy: StrategyKind::Zic,
            count: 8,
        },
        PopulationEntry {
            strategy: StrategyKind::ImpactSensitiveFiltered,
            count: 4,
        },
    ]
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_ticks: default_session_ticks(),
            seed: None,
            price_floor: default_price_floor(),
            price_ceiling: default_price_ceiling(),
            published_depth: default_published_depth(),
            signal: SignalSettings::default(),
            buyers: default_buyers(),
            sellers: default_sellers(),
            schedule: ScheduleConfig::default(),
        }
    }
}

impl SessionConfig {
    pub fn n_buyers(&self) -> usize {
        self.buyers.iter().map(|e| e.count as usize).sum()
    }

    pub fn n_sellers(&self) -> usize {
        self.sellers.iter().map(|e| e.count as usize).sum()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session_ticks == 0 {
            return Err(ConfigError::Invalid("session_ticks must be positive".into()));
        }
        if self.signal.depth == 0 {
            return Err(ConfigError::Invalid("signal depth must be positive".into()));
        }
        if self.signal.window == 0 {
            return Err(ConfigError::Invalid("signal window must be positive".into()));
        }
        if self.published_depth == 0 {
            return Err(ConfigError::Invalid(
                "published_depth must be positive".into(),
            ));
        }
        if self.price_floor < 1 || self.price_ceiling <= self.price_floor {
            return Err(ConfigError::Invalid(format!(
                "price band [{}, {}] is not a valid range",
                self.price_floor, self.price_ceiling
            )));
        }
        if self.n_buyers() == 0 || self.n_sellers() == 0 {
            return Err(ConfigError::Invalid(
                "both buyer and seller populations must be non-empty".into(),
            ));
        }
        self.schedule
            .validate(self.price_floor, self.price_ceiling)
    }
}

/// Imbalance-signal tuning shared by all impact-sensitive traders.
///
/// The exact mapping from MLOFI magnitude to price shift is deliberately a
/// tunable surface rather than a fixed constant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalSettings {
    /// Depth parameter m for the MLOFI calculation
    #[serde(default = "default_depth")]
    pub depth: usize,

    /// Rolling window of snapshot transitions
    #[serde(default = "default_window")]
    pub window: usize,

    #[serde(default = "default_level_decay")]
    pub level_decay: f64,

    #[serde(default = "default_impact_coefficient")]
    pub impact_coefficient: f64,

    /// Noise threshold for the significance filter
    #[serde(default = "default_significance_threshold")]
    pub significance_threshold: f64,

    /// Weight pulling the baseline quote towards the imbalance target
    #[serde(default = "default_blend")]
    pub blend: f64,
}

fn default_depth() -> usize {
    3
}

fn default_window() -> usize {
    10
}

fn default_level_decay() -> f64 {
    0.8
}

fn default_impact_coefficient() -> f64 {
    5.0
}

fn default_significance_threshold() -> f64 {
    0.6
}

fn default_blend() -> f64 {
    0.8
}

impl Default for SignalSettings {
    fn default() -> Self {
        Self {
            depth: default_depth(),
            window: default_window(),
            level_decay: default_level_decay(),
            impact_coefficient: default_impact_coefficient(),
            significance_threshold: default_significance_threshold(),
            blend: default_blend(),
        }
    }
}

impl SignalSettings {
    pub fn signal_config(&self) -> SignalConfig {
        SignalConfig {
            depth: self.depth,
            window: self.window,
            level_decay: self.level_decay,
            impact_coefficient: self.impact_coefficient,
            significance_threshold: self.significance_threshold,
        }
    }

    pub fn impact_config(&self, filter_enabled: bool) -> ImpactConfig {
        ImpactConfig {
            signal: self.signal_config(),
            filter_enabled,
            blend: self.blend,
        }
    }
}

/// One block of the trader population
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationEntry {
    pub strategy: StrategyKind,
    pub count: u32,
}

/// Closed set of strategy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Giveaway,
    Zic,
    Shaver,
    ImpactSensitive,
    ImpactSensitiveFiltered,
}

/// How limit prices are laid out across a side's traders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepMode {
    /// Evenly spaced steps across the range
    #[default]
    Fixed,
    /// Evenly spaced with random jitter of up to half a step
    Jittered,
    /// Uniform random draws from the range
    Random,
}

/// How assignment issue times are spread over the replenishment interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeMode {
    /// Whole batch arrives together at the end of each interval
    Periodic,
    /// Evenly spread over the interval
    #[default]
    DripFixed,
    /// Evenly spread with uniform jitter
    DripJitter,
    /// Poisson arrivals, rescaled to fit the interval
    DripPoisson,
}

/// Limit-price range for one side of the market
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SideSchedule {
    pub price_low: i64,
    pub price_high: i64,
    #[serde(default)]
    pub step_mode: StepMode,
}

/// Customer-order schedule: where limit prices come from and when
/// assignments are issued
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Replenishment interval in ticks
    #[serde(default = "default_interval_ticks")]
    pub interval_ticks: u64,

    #[serde(default)]
    pub time_mode: TimeMode,

    /// Seller-side (supply) limit prices
    #[serde(default = "default_supply")]
    pub supply: SideSchedule,

    /// Buyer-side (demand) limit prices
    #[serde(default = "default_demand")]
    pub demand: SideSchedule,

    /// Assignment quantities are drawn uniformly from 1..=max_quantity
    #[serde(default = "default_max_quantity")]
    pub max_quantity: i64,
}

fn default_interval_ticks() -> u64 {
    100
}

fn default_supply() -> SideSchedule {
    SideSchedule {
        price_low: 50,
        price_high: 150,
        step_mode: StepMode::default(),
    }
}

fn default_demand() -> SideSchedule {
    SideSchedule {
        price_low: 50,
        price_high: 150,
        step_mode: StepMode::default(),
    }
}

fn default_max_quantity() -> i64 {
    1
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_ticks: default_interval_ticks(),
            time_mode: TimeMode::default(),
            supply: default_supply(),
            demand: default_demand(),
            max_quantity: default_max_quantity(),
        }
    }
}

impl ScheduleConfig {
    fn validate_side(side: &SideSchedule, name: &str, floor: i64, ceiling: i64) -> Result<(), ConfigError> {
        if side.price_low > side.price_high {
            return Err(ConfigError::Invalid(format!(
                "{name} range [{}, {}] is inverted",
                side.price_low, side.price_high
            )));
        }
        if side.price_low < floor || side.price_high > ceiling {
            return Err(ConfigError::Invalid(format!(
                "{name} range [{}, {}] outside price band [{floor}, {ceiling}]",
                side.price_low, side.price_high
            )));
        }
        Ok(())
    }

    pub fn validate(&self, floor: i64, ceiling: i64) -> Result<(), ConfigError> {
        if self.interval_ticks == 0 {
            return Err(ConfigError::Invalid(
                "schedule interval_ticks must be positive".into(),
            ));
        }
        if self.max_quantity < 1 {
            return Err(ConfigError::Invalid(
                "schedule max_quantity must be at least 1".into(),
            ));
        }
        Self::validate_side(&self.supply, "supply", floor, ceiling)?;
        Self::validate_side(&self.demand, "demand", floor, ceiling)
    }
}
