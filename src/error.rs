//! Error types for simulation runs.

use thiserror::Error;

use crate::config::ConfigError;
use crate::parser::ParseError;
use crate::types::{ModuleName, PressCount};

/// Errors that can occur while loading or simulating a network.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Duplicate module: {0}")]
    DuplicateModule(ModuleName),

    #[error("Broadcaster '{0}' is not a broadcaster module in the network")]
    MissingBroadcaster(ModuleName),

    #[error("Press {press} did not quiesce within {limit} signals")]
    RunawayPress { press: PressCount, limit: u64 },

    #[error("No module feeds the terminal sink '{0}'")]
    NoTerminalFeeder(ModuleName),

    #[error("Modules feeding the terminal sink '{0}' have no sources to track")]
    EmptyTrackedSet(ModuleName),

    #[error("Periods still unknown after {limit} presses: {unresolved:?}")]
    AnalysisLimitExceeded {
        limit: PressCount,
        unresolved: Vec<ModuleName>,
    },

    #[error("Least common multiple of {0:?} overflows u64")]
    LcmOverflow(Vec<PressCount>),

    #[error("Pulse product {low} * {high} overflows u64")]
    ProductOverflow { low: u64, high: u64 },
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;
