//! # Pulsegraph
//!
//! A deterministic discrete-event simulator for networks of pulse-driven
//! logic modules.
//!
//! ## Model
//!
//! - **Modules**: named state machines of three kinds. A *broadcaster*
//!   re-emits a low pulse for anything it receives, a *flip-flop* toggles on
//!   low pulses, and a *conjunction* remembers the last pulse from each of its
//!   sources and emits low only when all of them are high.
//! - **Presses**: a press injects one low pulse from the button into the
//!   broadcaster and drains the resulting signals in strict FIFO order until
//!   the network is quiet. State carries over from press to press.
//! - **Analyses**: the statistics driver totals low and high pulses over a
//!   fixed number of presses; the cycle analyzer finds the first press at
//!   which each module feeding the terminal sink's feeder emits high and
//!   combines those periods by least common multiple.
//!
//! ## Quick Start
//!
//! ```rust
//! use pulsegraph::{SimConfig, SimulationEngine};
//!
//! let description = "\
//! broadcaster -> a
//! %a -> inv, con
//! &inv -> b
//! %b -> con
//! &con -> output
//! ";
//!
//! let engine = SimulationEngine::from_description(description, SimConfig::default()).unwrap();
//! let stats = engine.pulse_statistics().unwrap();
//! assert_eq!(stats.product().unwrap(), 11_687_500);
//! ```
//!
//! ## Configuration-Driven Setup
//!
//! ```rust,ignore
//! use pulsegraph::config::SimConfig;
//!
//! let config = SimConfig::from_yaml_file("simulation.yaml")?;
//! ```

pub mod types;
pub mod signal;
pub mod module;
pub mod network;
pub mod parser;
pub mod propagation;
pub mod analyzer;
pub mod stats;
pub mod engine;
pub mod config;
pub mod error;

// Re-export commonly used types
pub use types::{ModuleName, PressCount, Pulse};
pub use signal::Signal;
pub use module::{Module, ModuleState, ModuleType};
pub use network::Network;
pub use parser::{parse_lines, parse_network, ParseError};
pub use propagation::{EngineStats, PressOutcome, PropagationEngine};
pub use analyzer::{tracked_modules, CycleAnalyzer, CycleReport};
pub use stats::{run_statistics, PulseStats, SimulationReport};
pub use engine::SimulationEngine;
pub use config::{ConfigError, SimConfig, SimConfigBuilder};
pub use error::{SimError, SimResult};

/// Initialize the tracing subscriber for logging.
///
/// `RUST_LOG` takes precedence over `level` when it is set.
///
/// # Example
///
/// ```rust,ignore
/// pulsegraph::init_logging("info");
/// ```
pub fn init_logging(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
