//! The network model.
//!
//! A `Network` owns every module by name. Edges are plain names: a
//! destination that resolves to no module is a sink, which is counted by the
//! engine but never activated.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use crate::error::{SimError, SimResult};
use crate::module::Module;
use crate::parser::{parse_network, ParseError};
use crate::types::ModuleName;

/// The directed graph of modules and all of their mutable state.
///
/// Cloning a network deep-copies every module state, which is how isolated
/// analyses obtain an independent instance.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Network {
    /// Modules indexed by name
    modules: HashMap<ModuleName, Module>,
    /// Module names in declaration order
    order: Vec<ModuleName>,
}

impl Network {
    /// Creates an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a linked network from modules in declaration order.
    pub fn from_modules(modules: impl IntoIterator<Item = Module>) -> SimResult<Self> {
        let mut network = Self::new();
        for module in modules {
            network.insert(module)?;
        }
        network.link_sources();
        Ok(network)
    }

    /// Adds a module. Call [`link_sources`](Self::link_sources) once all
    /// modules are present.
    pub fn insert(&mut self, module: Module) -> SimResult<()> {
        if self.modules.contains_key(&module.name) {
            return Err(SimError::DuplicateModule(module.name));
        }
        self.order.push(module.name.clone());
        self.modules.insert(module.name.clone(), module);
        Ok(())
    }

    /// Derives every module's incoming edges from the declared destinations.
    ///
    /// Sources are listed in declaration order of the emitting modules.
    /// Calling this again recomputes the lists from scratch.
    pub fn link_sources(&mut self) {
        for module in self.modules.values_mut() {
            module.sources.clear();
        }

        let mut edges = Vec::new();
        for name in &self.order {
            if let Some(module) = self.modules.get(name) {
                for dst in &module.destinations {
                    edges.push((name.clone(), dst.clone()));
                }
            }
        }

        for (src, dst) in edges {
            if let Some(target) = self.modules.get_mut(&dst) {
                if !target.sources.contains(&src) {
                    target.sources.push(src);
                }
            }
        }
    }

    /// Returns a module by name.
    pub fn get(&self, name: &str) -> Option<&Module> {
        self.modules.get(name)
    }

    /// Returns a mutable module by name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Module> {
        self.modules.get_mut(name)
    }

    /// Returns true if a module with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    /// Returns the number of modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Returns true if the network has no modules.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Iterates over modules in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Module> {
        self.order.iter().filter_map(|name| self.modules.get(name))
    }

    /// Modules whose destinations include `name`, in declaration order.
    pub fn feeders_of(&self, name: &str) -> Vec<&Module> {
        self.iter()
            .filter(|m| m.destinations.iter().any(|d| d == name))
            .collect()
    }

    /// Destination names that resolve to no module, in first-seen order.
    pub fn sinks(&self) -> Vec<ModuleName> {
        let mut seen = HashSet::new();
        let mut sinks = Vec::new();
        for module in self.iter() {
            for dst in &module.destinations {
                if !self.contains(dst) && seen.insert(dst.as_str()) {
                    sinks.push(dst.clone());
                }
            }
        }
        sinks
    }

    /// Puts every module back into its initial state.
    pub fn reset(&mut self) {
        for module in self.modules.values_mut() {
            module.reset();
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for module in self.iter() {
            writeln!(f, "{}", module)?;
        }
        Ok(())
    }
}

impl FromStr for Network {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_network(s)
    }
}
