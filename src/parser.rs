//! Parser for the textual network description.
//!
//! # Format
//!
//! One module per line:
//!
//! ```text
//! broadcaster -> a, b, c
//! %a -> b
//! %b -> c
//! %c -> inv
//! &inv -> a
//! ```
//!
//! `%` marks a flip-flop, `&` a conjunction, and the unprefixed name
//! `broadcaster` the broadcaster. Blank lines are ignored.

use thiserror::Error;

use crate::module::{Module, ModuleType};
use crate::network::Network;
use crate::types::{ModuleName, BROADCASTER};

/// Errors that can occur while parsing a network description.
///
/// Line numbers are 1-based.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: expected '<module> -> <destinations>'")]
    MissingArrow { line: usize },

    #[error("line {line}: empty module name")]
    EmptyName { line: usize },

    #[error("line {line}: unknown module '{name}' (expected '%', '&' or 'broadcaster')")]
    UnknownModule { line: usize, name: String },

    #[error("line {line}: empty destination")]
    EmptyDestination { line: usize },

    #[error("line {line}: duplicate module '{name}'")]
    DuplicateModule { line: usize, name: ModuleName },
}

/// Parses a full description into a linked network.
pub fn parse_network(text: &str) -> Result<Network, ParseError> {
    parse_lines(text.lines())
}

/// Parses description lines into a linked network.
pub fn parse_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Result<Network, ParseError> {
    let mut network = Network::new();

    for (idx, raw) in lines.into_iter().enumerate() {
        let line = idx + 1;
        let text = raw.trim();
        if text.is_empty() {
            continue;
        }

        let module = parse_module(line, text)?;
        let name = module.name.clone();
        network
            .insert(module)
            .map_err(|_| ParseError::DuplicateModule { line, name })?;
    }

    network.link_sources();
    tracing::debug!(modules = network.len(), "parsed network description");
    Ok(network)
}

/// Parses a single non-empty line.
pub fn parse_module(line: usize, text: &str) -> Result<Module, ParseError> {
    let (head, tail) = text
        .split_once("->")
        .ok_or(ParseError::MissingArrow { line })?;

    let head = head.trim();
    let (kind, name) = if let Some(name) = head.strip_prefix('%') {
        (ModuleType::FlipFlop, name)
    } else if let Some(name) = head.strip_prefix('&') {
        (ModuleType::Conjunction, name)
    } else if head == BROADCASTER {
        (ModuleType::Broadcaster, head)
    } else if head.is_empty() {
        return Err(ParseError::EmptyName { line });
    } else {
        return Err(ParseError::UnknownModule {
            line,
            name: head.to_string(),
        });
    };

    let name = name.trim();
    if name.is_empty() {
        return Err(ParseError::EmptyName { line });
    }

    let tail = tail.trim();
    let destinations = if tail.is_empty() {
        Vec::new()
    } else {
        tail.split(',')
            .map(|d| {
                let d = d.trim();
                if d.is_empty() {
                    Err(ParseError::EmptyDestination { line })
                } else {
                    Ok(d.to_string())
                }
            })
            .collect::<Result<Vec<_>, _>>()?
    };

    Ok(Module::new(name, kind, destinations))
}
