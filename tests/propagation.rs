//! Integration tests for the propagation engine.

use std::collections::BTreeSet;

use pulsegraph::module::Module;
use pulsegraph::network::Network;
use pulsegraph::parser::parse_network;
use pulsegraph::propagation::PropagationEngine;
use pulsegraph::types::{ModuleName, Pulse};
use pulsegraph::{SimError, Signal};

fn names(list: &[&str]) -> Vec<ModuleName> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_flip_flop_chain_counts() {
    // broadcaster -> %a -> sink
    let mut network = parse_network("broadcaster -> a\n%a -> sink").unwrap();
    let mut engine = PropagationEngine::new();

    let first = engine.run_press(&mut network).unwrap();
    assert_eq!(first.low, 2);
    assert_eq!(first.high, 1);

    let second = engine.run_press(&mut network).unwrap();
    assert_eq!(second.low, 3);
    assert_eq!(second.high, 0);
}

#[test]
fn test_state_persists_between_presses() {
    let mut network = parse_network("broadcaster -> a\n%a -> b\n%b -> sink").unwrap();
    let mut engine = PropagationEngine::new();

    // a and b form a two-bit counter.
    let expected = [(true, false), (false, true), (true, true), (false, false)];
    for (a_on, b_on) in expected {
        engine.run_press(&mut network).unwrap();
        assert_eq!(network.get("a").unwrap().is_on(), Some(a_on));
        assert_eq!(network.get("b").unwrap().is_on(), Some(b_on));
    }
}

#[test]
fn test_every_enqueued_signal_dequeued_once() {
    // Duplicate destinations fan out into separate signals.
    let mut network = parse_network("broadcaster -> a, a, sink\n%a -> b, b\n&b -> sink").unwrap();
    let mut engine = PropagationEngine::new();

    let first = engine.run_press(&mut network).unwrap();
    assert_eq!(first.enqueued, 12);
    assert_eq!((first.low, first.high), (8, 4));

    for _ in 0..9 {
        let outcome = engine.run_press(&mut network).unwrap();
        assert_eq!(outcome.enqueued, outcome.low + outcome.high);
    }

    let stats = engine.stats();
    assert_eq!(stats.presses_run, 10);
    assert_eq!(stats.signals_enqueued, stats.signals_processed);
}

#[test]
fn test_counter_enqueued_matches_dequeued() {
    let mut network = parse_network(
        "broadcaster -> a, b, c\n%a -> b\n%b -> c\n%c -> inv\n&inv -> a",
    )
    .unwrap();
    let mut engine = PropagationEngine::new();

    for _ in 0..10 {
        let outcome = engine.run_press(&mut network).unwrap();
        assert_eq!(outcome.enqueued, outcome.total());
    }
}

#[test]
fn test_counter_press_counts() {
    // Each press of this network sends 8 low and 4 high pulses.
    let mut network = parse_network(
        "broadcaster -> a, b, c\n%a -> b\n%b -> c\n%c -> inv\n&inv -> a",
    )
    .unwrap();
    let mut engine = PropagationEngine::new();

    let outcome = engine.run_press(&mut network).unwrap();
    assert_eq!((outcome.low, outcome.high), (8, 4));
}

#[test]
fn test_sink_signals_counted_but_inert() {
    let mut network = parse_network("broadcaster -> nowhere, a\n%a -> nowhere").unwrap();
    let mut engine = PropagationEngine::new();

    let outcome = engine.run_press(&mut network).unwrap();
    // button, broadcaster -> nowhere, broadcaster -> a, a -> nowhere
    assert_eq!(outcome.total(), 4);
    assert_eq!(engine.stats().signals_to_sinks, 2);
}

#[test]
fn test_conjunction_sees_mid_press_snapshot() {
    // `con` hears from `a` before `b` flips, so the first press produces a
    // high then a low from `con`.
    let mut network = parse_network(
        "broadcaster -> a\n%a -> inv, con\n&inv -> b\n%b -> con\n&con -> output",
    )
    .unwrap();
    let mut engine = PropagationEngine::new();
    let tracked: BTreeSet<_> = ["con".to_string()].into_iter().collect();

    let outcome = engine.run_press_tracking(&mut network, &tracked).unwrap();
    assert!(outcome.high_emitters.contains("con"));
    assert_eq!(network.get("con").unwrap().remembered("a"), Some(Pulse::High));
    assert_eq!(network.get("con").unwrap().remembered("b"), Some(Pulse::High));
    assert_eq!((outcome.low, outcome.high), (4, 4));
}

#[test]
fn test_degenerate_conjunction_emits_low() {
    // With its derived sources cleared, `solo` has nothing to wait for and
    // treats "all sources high" as vacuously true.
    let mut network = Network::from_modules(vec![
        Module::broadcaster("broadcaster", names(&["solo"])),
        Module::conjunction("solo", names(&["out"])),
    ])
    .unwrap();
    network.get_mut("solo").unwrap().sources.clear();
    let mut engine = PropagationEngine::new();

    let outcome = engine.run_press(&mut network).unwrap();
    assert_eq!((outcome.low, outcome.high), (3, 0));
}

#[test]
fn test_flip_flop_round_trip_through_engine() {
    let mut network = parse_network("broadcaster -> ff\n%ff -> out").unwrap();
    let original = network.clone();
    let mut engine = PropagationEngine::new();

    engine.run_press(&mut network).unwrap();
    engine.run_press(&mut network).unwrap();

    assert_eq!(network, original);
}

#[test]
fn test_runaway_loop_detected() {
    let mut network = parse_network("broadcaster -> a\n&a -> b\n&b -> a").unwrap();
    let mut engine = PropagationEngine::new().with_signal_limit(1000);

    let result = engine.run_press(&mut network);
    assert!(matches!(result, Err(SimError::RunawayPress { limit: 1000, .. })));
}

#[test]
fn test_button_signal_is_low_to_broadcaster() {
    let engine = PropagationEngine::new();
    assert_eq!(engine.button_signal(), Signal::new("button", Pulse::Low, "broadcaster"));
}
