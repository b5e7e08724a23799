//! The propagation engine.
//!
//! A press seeds a FIFO queue with the button's low pulse and drains it.
//! Every dequeued signal is counted, then delivered; the receiving module
//! may append one signal per destination to the back of the queue. Signals
//! queued earlier are always delivered before signals queued later, across
//! the whole press and not merely wave by wave.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, VecDeque};

use crate::config::SimulationParams;
use crate::error::{SimError, SimResult};
use crate::network::Network;
use crate::signal::Signal;
use crate::types::{ModuleName, PressCount, Pulse};

/// Result of a single press.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PressOutcome {
    /// Low pulses dequeued during the press
    pub low: u64,
    /// High pulses dequeued during the press
    pub high: u64,
    /// Signals pushed onto the queue, the button's included
    pub enqueued: u64,
    /// Tracked modules that emitted at least one high pulse
    pub high_emitters: BTreeSet<ModuleName>,
}

impl PressOutcome {
    /// Total signals dequeued during the press.
    pub fn total(&self) -> u64 {
        self.low + self.high
    }
}

/// Counters accumulated across every press run by an engine.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineStats {
    /// Presses that ran to quiescence
    pub presses_run: PressCount,
    /// Signals enqueued over all presses
    pub signals_enqueued: u64,
    /// Signals dequeued over all presses
    pub signals_processed: u64,
    /// Signals whose destination had no module
    pub signals_to_sinks: u64,
    /// Largest queue length observed
    pub peak_queue_depth: usize,
}

/// Runs presses against a network.
///
/// The engine holds no network state of its own; it can drive any number
/// of networks, and its counters simply add up.
///
/// # Example
///
/// ```
/// use pulsegraph::parser::parse_network;
/// use pulsegraph::propagation::PropagationEngine;
///
/// let mut network = parse_network("broadcaster -> a\n%a -> output").unwrap();
/// let mut engine = PropagationEngine::new();
///
/// let outcome = engine.run_press(&mut network).unwrap();
/// assert_eq!((outcome.low, outcome.high), (2, 1));
/// ```
#[derive(Clone, Debug)]
pub struct PropagationEngine {
    button: ModuleName,
    broadcaster: ModuleName,
    max_signals_per_press: u64,
    stats: EngineStats,
}

impl Default for PropagationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PropagationEngine {
    /// Creates an engine with the default names and signal cap.
    pub fn new() -> Self {
        Self::from_params(&SimulationParams::default())
    }

    /// Creates an engine from simulation parameters.
    pub fn from_params(params: &SimulationParams) -> Self {
        Self {
            button: params.button.clone(),
            broadcaster: params.broadcaster.clone(),
            max_signals_per_press: params.max_signals_per_press,
            stats: EngineStats::default(),
        }
    }

    /// Overrides the per-press signal cap.
    pub fn with_signal_limit(mut self, limit: u64) -> Self {
        self.max_signals_per_press = limit;
        self
    }

    /// The synthetic signal that starts every press.
    pub fn button_signal(&self) -> Signal {
        Signal::new(self.button.clone(), Pulse::Low, self.broadcaster.clone())
    }

    /// Runs one press to quiescence.
    pub fn run_press(&mut self, network: &mut Network) -> SimResult<PressOutcome> {
        self.propagate(network, None)
    }

    /// Runs one press, reporting which of `tracked` emitted a high pulse.
    pub fn run_press_tracking(
        &mut self,
        network: &mut Network,
        tracked: &BTreeSet<ModuleName>,
    ) -> SimResult<PressOutcome> {
        self.propagate(network, Some(tracked))
    }

    fn propagate(
        &mut self,
        network: &mut Network,
        tracked: Option<&BTreeSet<ModuleName>>,
    ) -> SimResult<PressOutcome> {
        let press = self.stats.presses_run + 1;
        let mut outcome = PressOutcome::default();
        let mut queue = VecDeque::new();
        let mut to_sinks = 0u64;
        let mut peak = 1usize;

        queue.push_back(self.button_signal());
        outcome.enqueued += 1;

        while let Some(signal) = queue.pop_front() {
            if outcome.total() >= self.max_signals_per_press {
                tracing::error!(press, limit = self.max_signals_per_press, "press did not quiesce");
                return Err(SimError::RunawayPress {
                    press,
                    limit: self.max_signals_per_press,
                });
            }

            match signal.pulse {
                Pulse::Low => outcome.low += 1,
                Pulse::High => outcome.high += 1,
            }
            tracing::trace!(press, "{}", signal);

            let Some(module) = network.get_mut(&signal.destination) else {
                to_sinks += 1;
                continue;
            };
            let Some(pulse) = module.receive(&signal) else {
                continue;
            };

            if pulse.is_high() && tracked.is_some_and(|t| t.contains(&module.name)) {
                outcome.high_emitters.insert(module.name.clone());
            }

            outcome.enqueued += module.destinations.len() as u64;
            queue.extend(module.emit(pulse));
            peak = peak.max(queue.len());
        }

        self.stats.presses_run = press;
        self.stats.signals_enqueued += outcome.enqueued;
        self.stats.signals_processed += outcome.total();
        self.stats.signals_to_sinks += to_sinks;
        self.stats.peak_queue_depth = self.stats.peak_queue_depth.max(peak);

        tracing::debug!(
            press,
            low = outcome.low,
            high = outcome.high,
            emitters = outcome.high_emitters.len(),
            "press complete"
        );
        Ok(outcome)
    }

    /// Returns the per-press signal cap.
    pub fn signal_limit(&self) -> u64 {
        self.max_signals_per_press
    }

    /// Returns the accumulated counters.
    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    /// Clears the accumulated counters.
    pub fn reset_stats(&mut self) {
        self.stats = EngineStats::default();
    }

    /// Exports the counters as JSON.
    pub fn export_stats(&self) -> serde_json::Value {
        serde_json::json!({
            "presses_run": self.stats.presses_run,
            "signals_enqueued": self.stats.signals_enqueued,
            "signals_processed": self.stats.signals_processed,
            "signals_to_sinks": self.stats.signals_to_sinks,
            "peak_queue_depth": self.stats.peak_queue_depth,
            "max_signals_per_press": self.max_signals_per_press,
        })
    }
}
