//! Top-level simulation engine.
//!
//! The `SimulationEngine` owns a pristine network and a configuration. Each
//! analysis it runs works on its own deep copy of the network, so the pulse
//! statistics never disturb the cycle analysis and repeated runs give the
//! same answers.

use crate::analyzer::{CycleAnalyzer, CycleReport};
use crate::config::SimConfig;
use crate::error::{SimError, SimResult};
use crate::module::ModuleType;
use crate::network::Network;
use crate::parser::parse_network;
use crate::propagation::PropagationEngine;
use crate::stats::{run_statistics, NetworkSummary, PulseStats, SimulationReport, Timer};

/// Coordinates the statistics driver and the cycle analyzer.
///
/// # Example
///
/// ```
/// use pulsegraph::{SimConfig, SimulationEngine};
///
/// let text = "broadcaster -> a, b, c\n%a -> b\n%b -> c\n%c -> inv\n&inv -> a";
/// let engine = SimulationEngine::from_description(text, SimConfig::default()).unwrap();
///
/// let stats = engine.pulse_statistics().unwrap();
/// assert_eq!(stats.product().unwrap(), 32_000_000);
/// ```
#[derive(Clone, Debug)]
pub struct SimulationEngine {
    /// Network in its initial state
    network: Network,
    /// Simulation parameters
    config: SimConfig,
}

impl SimulationEngine {
    /// Creates an engine over an already-built network.
    ///
    /// Fails if the configured broadcaster is not a broadcaster module of
    /// `network`.
    pub fn new(network: Network, config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        let name = &config.simulation.broadcaster;
        match network.get(name) {
            Some(module) if module.kind() == ModuleType::Broadcaster => {}
            _ => {
                tracing::error!(broadcaster = %name, "network has no such broadcaster");
                return Err(SimError::MissingBroadcaster(name.clone()));
            }
        }
        Ok(Self { network, config })
    }

    /// Parses a description and creates an engine over it.
    pub fn from_description(text: &str, config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        let network = parse_network(text)?;
        Self::new(network, config)
    }

    /// Returns the network in its initial state.
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Creates a propagation engine configured from this engine's parameters.
    pub fn propagation_engine(&self) -> PropagationEngine {
        PropagationEngine::from_params(&self.config.simulation)
    }

    /// Runs the configured number of presses on a fresh copy.
    pub fn pulse_statistics(&self) -> SimResult<PulseStats> {
        let mut engine = self.propagation_engine();
        run_statistics(&self.network, &mut engine, self.config.simulation.presses)
    }

    /// Runs cycle analysis on a fresh copy.
    pub fn analyze_cycles(&self) -> SimResult<CycleReport> {
        let mut engine = self.propagation_engine();
        self.analyze_with(&mut engine)
    }

    fn analyze_with(&self, engine: &mut PropagationEngine) -> SimResult<CycleReport> {
        let params = &self.config.simulation;
        let mut analyzer =
            CycleAnalyzer::for_sink(&self.network, &params.terminal_sink, params.max_analysis_presses)?;
        let mut working = self.network.clone();
        analyzer.run(&mut working, engine)
    }

    /// Runs both analyses and gathers a full report.
    pub fn run(&self) -> SimResult<SimulationReport> {
        let timer = Timer::start();
        let mut engine = self.propagation_engine();

        let pulses = run_statistics(&self.network, &mut engine, self.config.simulation.presses)?;
        let pulse_product = pulses.product()?;
        let cycles = self.analyze_with(&mut engine)?;

        Ok(SimulationReport {
            network: NetworkSummary::of(&self.network),
            pulses,
            pulse_product,
            cycles,
            engine: engine.stats().clone(),
            wall_time_ms: timer.elapsed_ms(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfigBuilder;

    const COUNTER: &str = "\
broadcaster -> a, b, c
%a -> b
%b -> c
%c -> inv
&inv -> a
";

    const RELAY: &str = "\
broadcaster -> a
%a -> inv, con
&inv -> b
%b -> con
&con -> output
";

    #[test]
    fn test_counter_example() {
        let engine = SimulationEngine::from_description(COUNTER, SimConfig::default()).unwrap();
        let stats = engine.pulse_statistics().unwrap();

        assert_eq!(stats.low, 8000);
        assert_eq!(stats.high, 4000);
        assert_eq!(stats.product().unwrap(), 32_000_000);
    }

    #[test]
    fn test_relay_example() {
        let engine = SimulationEngine::from_description(RELAY, SimConfig::default()).unwrap();
        let stats = engine.pulse_statistics().unwrap();

        assert_eq!(stats.low, 4250);
        assert_eq!(stats.high, 2750);
        assert_eq!(stats.product().unwrap(), 11_687_500);
    }

    #[test]
    fn test_runs_are_isolated() {
        let engine = SimulationEngine::from_description(RELAY, SimConfig::default()).unwrap();
        let before = engine.network().clone();

        let first = engine.pulse_statistics().unwrap();
        let second = engine.pulse_statistics().unwrap();

        assert_eq!(first, second);
        assert_eq!(engine.network(), &before);
    }

    #[test]
    fn test_missing_terminal_sink() {
        let engine = SimulationEngine::from_description(COUNTER, SimConfig::default()).unwrap();

        assert!(matches!(
            engine.analyze_cycles(),
            Err(SimError::NoTerminalFeeder(_))
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SimConfig {
            simulation: crate::config::SimulationParams {
                presses: 0,
                ..Default::default()
            },
        };

        assert!(matches!(
            SimulationEngine::from_description(COUNTER, config),
            Err(SimError::Config(_))
        ));
    }

    #[test]
    fn test_unknown_broadcaster_rejected() {
        let config = SimConfigBuilder::new().broadcaster("root").build().unwrap();

        assert!(matches!(
            SimulationEngine::from_description(COUNTER, config),
            Err(SimError::MissingBroadcaster(name)) if name == "root"
        ));
    }

    #[test]
    fn test_broadcaster_name_must_be_broadcaster_kind() {
        let config = SimConfigBuilder::new().broadcaster("inv").build().unwrap();

        assert!(matches!(
            SimulationEngine::from_description(COUNTER, config),
            Err(SimError::MissingBroadcaster(_))
        ));
    }

    #[test]
    fn test_description_without_broadcaster_rejected() {
        let result = SimulationEngine::from_description("%a -> b\n&b -> rx", SimConfig::default());
        assert!(matches!(result, Err(SimError::MissingBroadcaster(_))));
    }

    #[test]
    fn test_full_run_report() {
        let config = SimConfigBuilder::new()
            .presses(4)
            .terminal_sink("output")
            .build()
            .unwrap();
        let engine = SimulationEngine::from_description(RELAY, config).unwrap();

        let report = engine.run().unwrap();
        assert_eq!(report.pulses.presses, 4);
        assert_eq!(report.network.sinks, vec!["output"]);
        assert!(report.cycles.lcm >= 1);
        assert_eq!(
            report.engine.presses_run,
            report.pulses.presses + report.cycles.presses_simulated
        );
    }
}
