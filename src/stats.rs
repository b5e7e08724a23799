//! Pulse statistics and report export.
//!
//! This module contains the statistics driver, which presses the button a
//! fixed number of times on a private copy of a network, and the report
//! types with their JSON, CSV and plain-text renderings.

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

use crate::analyzer::CycleReport;
use crate::error::{SimError, SimResult};
use crate::network::Network;
use crate::propagation::{EngineStats, PressOutcome, PropagationEngine};
use crate::types::PressCount;

/// Pulse totals accumulated over a number of presses.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PulseStats {
    /// Presses included in the totals
    pub presses: PressCount,
    /// Low pulses over all presses
    pub low: u64,
    /// High pulses over all presses
    pub high: u64,
}

impl PulseStats {
    /// Creates empty totals.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the counts of one press.
    pub fn record(&mut self, outcome: &PressOutcome) {
        self.presses += 1;
        self.low += outcome.low;
        self.high += outcome.high;
    }

    /// Total pulses over all presses.
    pub fn total(&self) -> u64 {
        self.low + self.high
    }

    /// Product of the low and high totals.
    pub fn product(&self) -> SimResult<u64> {
        self.low
            .checked_mul(self.high)
            .ok_or(SimError::ProductOverflow {
                low: self.low,
                high: self.high,
            })
    }
}

/// Runs the statistics driver.
///
/// Presses the button `presses` times on a deep copy of `network`, so the
/// caller's instance keeps its state.
pub fn run_statistics(
    network: &Network,
    engine: &mut PropagationEngine,
    presses: PressCount,
) -> SimResult<PulseStats> {
    let mut working = network.clone();
    let mut stats = PulseStats::new();

    for _ in 0..presses {
        let outcome = engine.run_press(&mut working)?;
        stats.record(&outcome);
    }

    tracing::info!(
        presses,
        low = stats.low,
        high = stats.high,
        "pulse statistics complete"
    );
    Ok(stats)
}

/// Shape of the simulated network.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSummary {
    /// Number of modules
    pub modules: usize,
    /// Destinations that resolve to no module
    pub sinks: Vec<String>,
}

impl NetworkSummary {
    /// Summarizes a network.
    pub fn of(network: &Network) -> Self {
        Self {
            modules: network.len(),
            sinks: network.sinks(),
        }
    }
}

/// Everything produced by a full simulation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Network shape
    pub network: NetworkSummary,
    /// Totals from the statistics driver
    pub pulses: PulseStats,
    /// Product of the pulse totals
    pub pulse_product: u64,
    /// Cycle analysis result
    pub cycles: CycleReport,
    /// Engine counters over both analyses
    pub engine: EngineStats,
    /// Wall-clock time in milliseconds
    pub wall_time_ms: f64,
}

impl SimulationReport {
    /// Exports the report to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Exports the report to a JSON file.
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let json = self.to_json().map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e)
        })?;
        std::fs::write(path, json)
    }

    /// Exports summary metrics to CSV.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();

        csv.push_str("metric,value\n");
        csv.push_str(&format!("modules,{}\n", self.network.modules));
        csv.push_str(&format!("presses,{}\n", self.pulses.presses));
        csv.push_str(&format!("low_pulses,{}\n", self.pulses.low));
        csv.push_str(&format!("high_pulses,{}\n", self.pulses.high));
        csv.push_str(&format!("pulse_product,{}\n", self.pulse_product));
        csv.push_str(&format!("cycle_presses,{}\n", self.cycles.presses_simulated));
        csv.push_str(&format!("cycle_lcm,{}\n", self.cycles.lcm));
        csv.push_str(&format!("signals_processed,{}\n", self.engine.signals_processed));
        csv.push_str(&format!("peak_queue_depth,{}\n", self.engine.peak_queue_depth));
        csv.push_str(&format!("wall_time_ms,{:.2}\n", self.wall_time_ms));

        csv
    }

    /// Exports tracked periods to CSV.
    pub fn periods_to_csv(&self) -> String {
        let mut csv = String::from("module,period\n");
        for (name, period) in &self.cycles.periods {
            csv.push_str(&format!("{},{}\n", name, period));
        }
        csv
    }

    /// Writes a human-readable summary to a writer.
    pub fn write_summary<W: Write>(&self, mut w: W) -> std::io::Result<()> {
        writeln!(w, "=== Pulse Simulation ===")?;
        writeln!(w, "Modules: {}", self.network.modules)?;
        if !self.network.sinks.is_empty() {
            writeln!(w, "Sinks: {}", self.network.sinks.join(", "))?;
        }
        writeln!(w)?;

        writeln!(w, "--- Pulses ---")?;
        writeln!(w, "Presses: {}", self.pulses.presses)?;
        writeln!(w, "Low: {}, High: {}", self.pulses.low, self.pulses.high)?;
        writeln!(w, "Product: {}", self.pulse_product)?;
        writeln!(w)?;

        writeln!(w, "--- Cycles ---")?;
        for (name, period) in &self.cycles.periods {
            writeln!(w, "  {}: {}", name, period)?;
        }
        writeln!(w, "Presses simulated: {}", self.cycles.presses_simulated)?;
        writeln!(w, "LCM: {}", self.cycles.lcm)?;
        writeln!(w)?;

        writeln!(w, "--- Engine ---")?;
        writeln!(w, "Signals processed: {}", self.engine.signals_processed)?;
        writeln!(w, "Peak queue depth: {}", self.engine.peak_queue_depth)?;
        writeln!(w, "Wall time: {:.2} ms", self.wall_time_ms)?;

        Ok(())
    }

    /// Returns the summary as a string.
    pub fn summary(&self) -> String {
        let mut buf = Vec::new();
        self.write_summary(&mut buf)
            .expect("writing to a Vec cannot fail");
        String::from_utf8_lossy(&buf).into_owned()
    }
}

/// A simple timer for measuring wall-clock time.
#[derive(Debug)]
pub struct Timer {
    start: std::time::Instant,
}

impl Timer {
    /// Starts a new timer.
    pub fn start() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }

    /// Returns elapsed time in milliseconds.
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::start()
    }
}
