//! # Gesture Benchmarks
//!
//! Performance benchmarks for netsv-core gesture handling.
//!
//! Run with: `cargo bench -p netsv-core`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use netsv_core::{
    DeviceType, FixedPlacement, InteractionController, LabelRules, NodeId, RuleBook,
};
use std::hint::black_box;
use std::time::Duration;

/// Create a session with one switch and `size` PCs.
fn create_office(size: usize) -> (InteractionController, NodeId, Vec<NodeId>) {
    let mut c = InteractionController::virtual_clock(RuleBook::bundled(), FixedPlacement::default());
    let switch = c.place_device(DeviceType::Switch).id.clone();
    let pcs = (0..size)
        .map(|_| c.place_device(DeviceType::Pc).id.clone())
        .collect();
    (c, switch, pcs)
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_connect(c: &mut Criterion) {
    let mut group = c.benchmark_group("connect_star");

    for size in [10, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                let (mut session, switch, pcs) = create_office(size);
                for pc in &pcs {
                    session.connect(Some(&switch), Some(pc));
                }
                black_box(session.topology().link_count())
            });
        });
    }

    group.finish();
}

fn bench_duplicate_rejection(c: &mut Criterion) {
    let (mut session, switch, pcs) = create_office(1000);
    for pc in &pcs {
        session.connect(Some(&switch), Some(pc));
    }
    let last = pcs.last().cloned().unwrap_or_else(|| switch.clone());

    c.bench_function("duplicate_rejection_1000", |b| {
        b.iter(|| black_box(session.connect(Some(&switch), Some(&last))));
    });
}

fn bench_resolve_label(c: &mut Criterion) {
    let labels = LabelRules::bundled();

    c.bench_function("resolve_label_all_pairs", |b| {
        b.iter(|| {
            for a in DeviceType::ALL {
                for t in DeviceType::ALL {
                    black_box(labels.resolve_label(a, t));
                }
            }
        });
    });
}

fn bench_click_storm(c: &mut Criterion) {
    c.bench_function("click_storm_100", |b| {
        b.iter(|| {
            let (mut session, _, pcs) = create_office(100);
            for pc in &pcs {
                session.click(pc);
            }
            black_box(session.advance(Duration::from_secs(3)))
        });
    });
}

criterion_group!(
    benches,
    bench_connect,
    bench_duplicate_rejection,
    bench_resolve_label,
    bench_click_storm
);
criterion_main!(benches);
