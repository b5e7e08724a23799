//! Performance benchmarks for the pulse simulator.
//!
//! Run with: `cargo bench`
//! Or for specific bench: `cargo bench --bench simulation_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use pulsegraph::analyzer::CycleAnalyzer;
use pulsegraph::parser::parse_network;
use pulsegraph::propagation::PropagationEngine;
use pulsegraph::{run_statistics, Network};

// ============================================================================
// Benchmark Networks
// ============================================================================

const COUNTER: &str = "\
broadcaster -> a, b, c
%a -> b
%b -> c
%c -> inv
&inv -> a
";

const RELAY: &str = "\
broadcaster -> a
%a -> inv, con
&inv -> b
%b -> con
&con -> output
";

/// Binary counters, one per period, whose detectors feed `rx` through a hub.
fn detector_network(periods: &[u64]) -> Network {
    let roots: Vec<_> = periods.iter().map(|p| format!("b{}_0", p)).collect();
    let mut lines = vec![format!("broadcaster -> {}", roots.join(", "))];

    for &p in periods {
        let bits = 64 - p.leading_zeros() as u64;
        for i in 0..bits {
            let mut dsts = Vec::new();
            if i + 1 < bits {
                dsts.push(format!("b{}_{}", p, i + 1));
            }
            if p & (1 << i) != 0 {
                dsts.push(format!("c{}", p));
            }
            lines.push(format!("%b{}_{} -> {}", p, i, dsts.join(", ")));
        }
        lines.push(format!("&c{p} -> inv{p}", p = p));
        lines.push(format!("&inv{} -> hub", p));
    }
    lines.push("&hub -> rx".to_string());

    parse_network(&lines.join("\n")).unwrap()
}

// ============================================================================
// Propagation Benchmarks
// ============================================================================

fn bench_single_press(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_press");

    for (name, text) in [("counter", COUNTER), ("relay", RELAY)] {
        let network = parse_network(text).unwrap();
        group.bench_function(name, |b| {
            let mut working = network.clone();
            let mut engine = PropagationEngine::new();
            b.iter(|| black_box(engine.run_press(&mut working).unwrap()));
        });
    }

    group.finish();
}

fn bench_press_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("press_throughput");
    let network = parse_network(COUNTER).unwrap();

    for presses in [100u64, 1000, 10000].iter() {
        group.throughput(Throughput::Elements(*presses));
        group.bench_with_input(BenchmarkId::new("presses", presses), presses, |b, &presses| {
            b.iter(|| {
                let mut engine = PropagationEngine::new();
                black_box(run_statistics(&network, &mut engine, presses).unwrap())
            });
        });
    }

    group.finish();
}

// ============================================================================
// Analysis Benchmarks
// ============================================================================

fn bench_cycle_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("cycle_analysis");

    let cases: [&[u64]; 3] = [&[3, 5, 7], &[37, 41, 43, 47], &[251, 241, 239, 233]];
    for periods in cases.iter() {
        let network = detector_network(periods);
        let longest = periods.iter().copied().max().unwrap_or(1);
        group.throughput(Throughput::Elements(longest));
        group.bench_with_input(
            BenchmarkId::new("periods", format!("{:?}", periods)),
            &network,
            |b, network| {
                b.iter(|| {
                    let mut working = network.clone();
                    let mut engine = PropagationEngine::new();
                    let mut analyzer = CycleAnalyzer::for_sink(&working, "rx", 10_000).unwrap();
                    black_box(analyzer.run(&mut working, &mut engine).unwrap())
                });
            },
        );
    }

    group.finish();
}

fn bench_network_clone(c: &mut Criterion) {
    let network = detector_network(&[251, 241, 239, 233]);

    c.bench_function("network_clone", |b| {
        b.iter(|| black_box(network.clone()));
    });
}

criterion_group!(
    benches,
    bench_single_press,
    bench_press_throughput,
    bench_cycle_analysis,
    bench_network_clone,
);
criterion_main!(benches);
