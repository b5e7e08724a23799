//! Core type definitions for the pulse simulator.
//!
//! This module defines the fundamental types shared by the network model,
//! the propagation engine and the analyzers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of a module in the network.
///
/// Edges are stored as names and resolved through the owning
/// [`Network`](crate::network::Network) at delivery time.
pub type ModuleName = String;

/// Counter for button presses.
///
/// Presses are numbered from 1 by the cycle analyzer.
pub type PressCount = u64;

/// Name of the virtual module that originates every press.
pub const BUTTON: &str = "button";

/// Name of the module that receives the button's pulse.
pub const BROADCASTER: &str = "broadcaster";

/// Conventional name of the terminal sink.
pub const TERMINAL_SINK: &str = "rx";

/// Level of a pulse travelling along an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pulse {
    Low,
    High,
}

impl Pulse {
    /// Returns true for a high pulse.
    pub fn is_high(self) -> bool {
        matches!(self, Pulse::High)
    }

    /// Returns true for a low pulse.
    pub fn is_low(self) -> bool {
        matches!(self, Pulse::Low)
    }
}

impl From<bool> for Pulse {
    fn from(high: bool) -> Self {
        if high {
            Pulse::High
        } else {
            Pulse::Low
        }
    }
}

impl fmt::Display for Pulse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pulse::Low => write!(f, "low"),
            Pulse::High => write!(f, "high"),
        }
    }
}
