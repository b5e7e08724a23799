//! Module definitions and their state machines.
//!
//! Modules are the units of computation in the network. Each module is a
//! local state machine that reacts to a delivered signal and decides whether
//! to emit a pulse to all of its destinations.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::signal::Signal;
use crate::types::{ModuleName, Pulse};

/// The kind of a module, without any state attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleType {
    /// Re-emits a low pulse for every pulse received
    Broadcaster,
    /// Toggles on low pulses, ignores high pulses
    FlipFlop,
    /// Remembers the last pulse from every source
    Conjunction,
}

impl ModuleType {
    /// Prefix used for this type in the textual description format.
    pub fn prefix(self) -> &'static str {
        match self {
            ModuleType::Broadcaster => "",
            ModuleType::FlipFlop => "%",
            ModuleType::Conjunction => "&",
        }
    }
}

impl fmt::Display for ModuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleType::Broadcaster => write!(f, "broadcaster"),
            ModuleType::FlipFlop => write!(f, "flip-flop"),
            ModuleType::Conjunction => write!(f, "conjunction"),
        }
    }
}

/// Per-type mutable state of a module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModuleState {
    Broadcaster,
    FlipFlop {
        on: bool,
    },
    /// Last level received from each source; absent entries read as low.
    Conjunction {
        memory: HashMap<ModuleName, Pulse>,
    },
}

impl ModuleState {
    /// Fresh state for the given module type.
    pub fn initial(kind: ModuleType) -> Self {
        match kind {
            ModuleType::Broadcaster => ModuleState::Broadcaster,
            ModuleType::FlipFlop => ModuleState::FlipFlop { on: false },
            ModuleType::Conjunction => ModuleState::Conjunction {
                memory: HashMap::new(),
            },
        }
    }

    /// The type tag of this state.
    pub fn kind(&self) -> ModuleType {
        match self {
            ModuleState::Broadcaster => ModuleType::Broadcaster,
            ModuleState::FlipFlop { .. } => ModuleType::FlipFlop,
            ModuleState::Conjunction { .. } => ModuleType::Conjunction,
        }
    }
}

/// A named module with its edges and state.
///
/// `destinations` is the declared outgoing edge list; its order is the order
/// in which emitted signals are queued. `sources` is derived by the network
/// when it links incoming edges.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Module {
    /// Unique name of this module
    pub name: ModuleName,
    /// Current state
    pub state: ModuleState,
    /// Outgoing edges in declaration order
    pub destinations: Vec<ModuleName>,
    /// Incoming edges in declaration order of the sources
    pub sources: Vec<ModuleName>,
}

impl Module {
    /// Creates a module of the given type with fresh state and no sources.
    pub fn new(name: impl Into<ModuleName>, kind: ModuleType, destinations: Vec<ModuleName>) -> Self {
        Self {
            name: name.into(),
            state: ModuleState::initial(kind),
            destinations,
            sources: Vec::new(),
        }
    }

    /// Creates a broadcaster.
    pub fn broadcaster(name: impl Into<ModuleName>, destinations: Vec<ModuleName>) -> Self {
        Self::new(name, ModuleType::Broadcaster, destinations)
    }

    /// Creates a flip-flop, initially off.
    pub fn flip_flop(name: impl Into<ModuleName>, destinations: Vec<ModuleName>) -> Self {
        Self::new(name, ModuleType::FlipFlop, destinations)
    }

    /// Creates a conjunction with empty memory.
    pub fn conjunction(name: impl Into<ModuleName>, destinations: Vec<ModuleName>) -> Self {
        Self::new(name, ModuleType::Conjunction, destinations)
    }

    /// Returns the type of this module.
    pub fn kind(&self) -> ModuleType {
        self.state.kind()
    }

    /// Returns the on flag of a flip-flop, `None` for other types.
    pub fn is_on(&self) -> Option<bool> {
        match &self.state {
            ModuleState::FlipFlop { on } => Some(*on),
            _ => None,
        }
    }

    /// Returns the remembered level for `source` if this is a conjunction.
    pub fn remembered(&self, source: &str) -> Option<Pulse> {
        match &self.state {
            ModuleState::Conjunction { memory } => {
                Some(memory.get(source).copied().unwrap_or(Pulse::Low))
            }
            _ => None,
        }
    }

    /// Applies the transition rule for a delivered signal.
    ///
    /// Returns the level to emit to every destination, or `None` if the
    /// module stays silent.
    pub fn receive(&mut self, signal: &Signal) -> Option<Pulse> {
        match &mut self.state {
            ModuleState::Broadcaster => Some(Pulse::Low),
            ModuleState::FlipFlop { on } => {
                if signal.pulse.is_high() {
                    return None;
                }
                *on = !*on;
                Some(Pulse::from(*on))
            }
            ModuleState::Conjunction { memory } => {
                memory.insert(signal.source.clone(), signal.pulse);
                // Low only when every source is high; vacuously true with no sources.
                let all_high = self
                    .sources
                    .iter()
                    .all(|s| memory.get(s).copied().unwrap_or(Pulse::Low).is_high());
                Some(Pulse::from(!all_high))
            }
        }
    }

    /// Builds the signals for one emission, in destination order.
    pub fn emit(&self, pulse: Pulse) -> impl Iterator<Item = Signal> + '_ {
        self.destinations
            .iter()
            .map(move |dst| Signal::new(self.name.clone(), pulse, dst.clone()))
    }

    /// Restores the initial state, keeping the edges.
    pub fn reset(&mut self) {
        self.state = ModuleState::initial(self.kind());
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} -> {}",
            self.kind().prefix(),
            self.name,
            self.destinations.join(", ")
        )
    }
}
