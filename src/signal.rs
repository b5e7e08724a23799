//! Signal definitions for the pulse simulator.
//!
//! Signals are the only mechanism for communication between modules.
//! A module never holds a reference to another; it names the destination
//! and the engine resolves that name when the signal is delivered.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{ModuleName, Pulse, BROADCASTER, BUTTON};

/// A pulse in flight from one module to another.
///
/// Signals are immutable once created and are consumed by the destination
/// module, or discarded if the destination name has no module.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    /// Name of the emitting module
    pub source: ModuleName,
    /// Pulse level carried by this signal
    pub pulse: Pulse,
    /// Name of the receiving module (or sink)
    pub destination: ModuleName,
}

impl Signal {
    /// Creates a new signal.
    pub fn new(source: impl Into<ModuleName>, pulse: Pulse, destination: impl Into<ModuleName>) -> Self {
        Self {
            source: source.into(),
            pulse,
            destination: destination.into(),
        }
    }

    /// The synthetic low pulse that starts a press, using the default names.
    pub fn button() -> Self {
        Self::new(BUTTON, Pulse::Low, BROADCASTER)
    }

    /// Returns true if this signal carries a high pulse.
    pub fn is_high(&self) -> bool {
        self.pulse.is_high()
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -{}-> {}", self.source, self.pulse, self.destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_creation() {
        let signal = Signal::new("a", Pulse::High, "b");

        assert_eq!(signal.source, "a");
        assert_eq!(signal.destination, "b");
        assert!(signal.is_high());
    }

    #[test]
    fn test_button_signal() {
        let signal = Signal::button();

        assert_eq!(signal.source, "button");
        assert_eq!(signal.destination, "broadcaster");
        assert_eq!(signal.pulse, Pulse::Low);
    }

    #[test]
    fn test_signal_display() {
        let signal = Signal::new("button", Pulse::Low, "broadcaster");
        assert_eq!(signal.to_string(), "button -low-> broadcaster");
    }

    #[test]
    fn test_signal_serialization() {
        let signal = Signal::new("inv", Pulse::High, "rx");
        let json = serde_json::to_string(&signal).unwrap();
        let deserialized: Signal = serde_json::from_str(&json).unwrap();

        assert_eq!(signal, deserialized);
    }
}
