//! Three-bit counter example.
//!
//! Builds a small network from its text description, runs the pulse
//! statistics and the cycle analysis, and prints both answers. The counter's
//! detector `inv` feeds `rx` through `hub`, so it is the one tracked module.
//!
//! Run with: `cargo run --example counter`

use pulsegraph::{SimConfigBuilder, SimResult, SimulationEngine};

const PRESSES: u64 = 1000;

// Bits 0 and 2 feed `c5`, which goes all-high once the counter reaches 5.
const DESCRIPTION: &str = "\
broadcaster -> bit0
%bit0 -> bit1, c5
%bit1 -> bit2
%bit2 -> c5
&c5 -> inv
&inv -> hub
&hub -> rx
";

fn main() -> SimResult<()> {
    pulsegraph::init_logging("info");

    let config = SimConfigBuilder::new().presses(PRESSES).build()?;
    let engine = SimulationEngine::from_description(DESCRIPTION, config)?;

    println!("Network:\n{}", engine.network());

    let report = engine.run()?;
    println!("{}", report.summary());
    println!("Part 1: {}", report.pulse_product);
    println!("Part 2: {}", report.cycles.lcm);

    Ok(())
}
