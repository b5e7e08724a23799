//! Cycle analysis over repeated presses.
//!
//! The analyzer tracks the sources of the module that feeds the terminal
//! sink. It presses the button until every tracked module has emitted a
//! high pulse at least once, takes each first press number as that module's
//! period, and combines the periods by least common multiple.
//!
//! # Limitations
//!
//! This is a targeted heuristic, not general cycle detection. It assumes
//! every tracked module fires with a period equal to its first firing and
//! that the modules fire independently of each other, which holds for
//! networks built from counter-like conjunction chains. A network that
//! breaks the assumption may still produce a number; one whose tracked
//! modules never fire exhausts the press cap and fails.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{SimError, SimResult};
use crate::network::Network;
use crate::propagation::PropagationEngine;
use crate::types::{ModuleName, PressCount};

/// Result of a completed cycle analysis.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleReport {
    /// First high-emission press of each tracked module
    pub periods: BTreeMap<ModuleName, PressCount>,
    /// Presses simulated to resolve every period
    pub presses_simulated: PressCount,
    /// Least common multiple of all periods
    pub lcm: PressCount,
}

/// Returns the modules to track for `sink`.
///
/// These are the sources of every module whose destinations include `sink`,
/// in declaration order without repeats.
pub fn tracked_modules(network: &Network, sink: &str) -> SimResult<Vec<ModuleName>> {
    let feeders = network.feeders_of(sink);
    if feeders.is_empty() {
        return Err(SimError::NoTerminalFeeder(sink.to_string()));
    }
    if feeders.len() > 1 {
        tracing::warn!(
            sink,
            feeders = feeders.len(),
            "terminal sink has several feeders; tracking all of their sources"
        );
    }

    let mut tracked: Vec<ModuleName> = Vec::new();
    for feeder in feeders {
        for source in &feeder.sources {
            if !tracked.contains(source) {
                tracked.push(source.clone());
            }
        }
    }

    if tracked.is_empty() {
        return Err(SimError::EmptyTrackedSet(sink.to_string()));
    }
    Ok(tracked)
}

/// Greatest common divisor.
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Least common multiple, `None` on overflow.
pub fn lcm(a: u64, b: u64) -> Option<u64> {
    if a == 0 || b == 0 {
        return Some(0);
    }
    (a / gcd(a, b)).checked_mul(b)
}

/// Least common multiple of every value; 1 for an empty list.
pub fn lcm_all(values: &[u64]) -> SimResult<u64> {
    values
        .iter()
        .try_fold(1u64, |acc, &v| lcm(acc, v))
        .ok_or_else(|| SimError::LcmOverflow(values.to_vec()))
}

/// Records first high-emission presses for a set of tracked modules.
#[derive(Clone, Debug)]
pub struct CycleAnalyzer {
    periods: BTreeMap<ModuleName, Option<PressCount>>,
    max_presses: PressCount,
    presses_observed: PressCount,
}

impl CycleAnalyzer {
    /// Creates an analyzer for the given modules with every period unknown.
    pub fn new(tracked: impl IntoIterator<Item = ModuleName>, max_presses: PressCount) -> Self {
        Self {
            periods: tracked.into_iter().map(|name| (name, None)).collect(),
            max_presses,
            presses_observed: 0,
        }
    }

    /// Creates an analyzer tracking the sources of `sink`'s feeder.
    pub fn for_sink(network: &Network, sink: &str, max_presses: PressCount) -> SimResult<Self> {
        let tracked = tracked_modules(network, sink)?;
        tracing::info!(sink, ?tracked, "tracking modules for cycle analysis");
        Ok(Self::new(tracked, max_presses))
    }

    /// Names of the tracked modules.
    pub fn tracked(&self) -> BTreeSet<ModuleName> {
        self.periods.keys().cloned().collect()
    }

    /// Records the modules that emitted high during press number `press`.
    ///
    /// Only the first observation of each module is kept.
    pub fn observe(&mut self, press: PressCount, emitters: &BTreeSet<ModuleName>) {
        self.presses_observed = self.presses_observed.max(press);
        for name in emitters {
            if let Some(period) = self.periods.get_mut(name) {
                if period.is_none() {
                    tracing::info!(module = %name, press, "first high emission");
                    *period = Some(press);
                }
            }
        }
    }

    /// Returns true once every tracked module has a period.
    pub fn is_resolved(&self) -> bool {
        self.periods.values().all(Option::is_some)
    }

    /// Tracked modules whose period is still unknown.
    pub fn unresolved(&self) -> Vec<ModuleName> {
        self.periods
            .iter()
            .filter(|(_, p)| p.is_none())
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Periods recorded so far.
    pub fn periods(&self) -> BTreeMap<ModuleName, PressCount> {
        self.periods
            .iter()
            .filter_map(|(name, p)| p.map(|p| (name.clone(), p)))
            .collect()
    }

    /// Combined period, or `None` while some period is unknown.
    pub fn lcm(&self) -> SimResult<Option<PressCount>> {
        if !self.is_resolved() {
            return Ok(None);
        }
        let values: Vec<_> = self.periods.values().flatten().copied().collect();
        lcm_all(&values).map(Some)
    }

    /// Presses the button until every period is known.
    ///
    /// Press numbers continue from the last observed press, so an analyzer
    /// that was fed earlier observations picks up where they stopped.
    pub fn run(&mut self, network: &mut Network, engine: &mut PropagationEngine) -> SimResult<CycleReport> {
        let tracked = self.tracked();

        while !self.is_resolved() {
            let press = self.presses_observed + 1;
            if press > self.max_presses {
                let unresolved = self.unresolved();
                tracing::error!(limit = self.max_presses, ?unresolved, "cycle analysis gave up");
                return Err(SimError::AnalysisLimitExceeded {
                    limit: self.max_presses,
                    unresolved,
                });
            }

            let outcome = engine.run_press_tracking(network, &tracked)?;
            self.observe(press, &outcome.high_emitters);
        }

        self.report()
    }

    fn report(&self) -> SimResult<CycleReport> {
        let periods = self.periods();
        let values: Vec<_> = periods.values().copied().collect();
        let lcm = lcm_all(&values)?;
        tracing::info!(presses = self.presses_observed, lcm, "cycle analysis complete");

        Ok(CycleReport {
            periods,
            presses_simulated: self.presses_observed,
            lcm,
        })
    }
}
