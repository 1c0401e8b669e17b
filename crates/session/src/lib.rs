//! Agora Session
//!
//! The discrete-event scheduler that ties the simulator together: it issues
//! customer assignments from supply/demand schedules, asks traders for
//! quotes one at a time, routes orders through the matching engine, and
//! logs everything to the session tape.
//!
//! A session is strictly single-threaded; replication for statistical
//! experiments runs whole sessions in parallel, each owning its book, tape,
//! RNG and trader population.

pub mod config;
pub mod error;
pub mod records;
mod replicate;
mod schedule;
mod session;

pub use config::{
    ExperimentConfig, PopulationEntry, ScheduleConfig, SessionConfig, SideSchedule,
    SignalSettings, StepMode, StrategyKind, TimeMode,
};
pub use error::{ConfigError, SessionError};
pub use replicate::run_replications;
pub use session::{MarketSession, SessionReport, SessionState, StrategyBalance};
