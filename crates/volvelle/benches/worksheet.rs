//! Benchmarks for the worksheet engine.
//!
//! Measures:
//! - Field multiplication and the register step
//! - Pair lookups against direct register evaluation
//! - Filling a whole share symbol by symbol
//! - Snapshot round trips

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use volvelle::checksum::Residue;
use volvelle::{ChecksumVariant, Fe, Session, SessionParams};

const CODEX32_DATA: &str = "2NAMEA320ZYXWVUTSRQPNMLKJHGFEDCAXRPP870HKKQRM";
const BECH32_DATA: &str = "2TESTAZYXWVUTSRQPNMLKJHGFEDCA02388TKT0";

// =============================================================================
// Field and Register
// =============================================================================

fn bench_field(c: &mut Criterion) {
    let mut group = c.benchmark_group("field");
    group.throughput(Throughput::Elements(1));

    let a = Fe::from_u5(0b10110).unwrap_or_default();
    let b = Fe::from_u5(0b01101).unwrap_or_default();

    group.bench_function("mul", |bench| {
        bench.iter(|| black_box(black_box(a) * black_box(b)));
    });

    group.bench_function("inverse", |bench| {
        bench.iter(|| black_box(black_box(a).inverse()));
    });

    for variant in ChecksumVariant::ALL {
        let residue = Residue::of_hrp(variant, "ms");
        group.bench_with_input(BenchmarkId::new("step", variant), &residue, |bench, r| {
            bench.iter(|| black_box(black_box(*r).step(black_box(a))));
        });
    }

    group.finish();
}

fn bench_pair(c: &mut Criterion) {
    let mut group = c.benchmark_group("pair_residue");
    volvelle::init();

    let a = Fe::from_u5(7).unwrap_or_default();
    let b = Fe::from_u5(19).unwrap_or_default();
    for variant in ChecksumVariant::ALL {
        group.bench_function(BenchmarkId::new("table", variant), |bench| {
            bench.iter(|| black_box(Residue::of_pair(variant, black_box(a), black_box(b))));
        });
        let zeros = vec![Fe::ZERO; variant.residue_len()];
        group.bench_function(BenchmarkId::new("register", variant), |bench| {
            bench.iter(|| {
                let input = [a, b].into_iter().chain(zeros.iter().copied());
                black_box(Residue::polymod(variant, black_box(input)))
            });
        });
    }

    group.finish();
}

// =============================================================================
// Whole Shares
// =============================================================================

fn fill_share(params: &SessionParams, data: &str) -> Session {
    let mut session = Session::new(params.clone()).unwrap_or_else(|e| panic!("{e}"));
    let share = session.new_share();
    let mut cells: Vec<_> = session
        .worksheet_cells(share)
        .unwrap_or_default()
        .into_iter()
        .filter(|c| c.kind.is_editable())
        .collect();
    cells.sort_by_key(|c| c.x);
    for (cell, symbol) in cells.iter().zip(data.chars()) {
        let _ = session.handle_input_change(&cell.id.to_string(), &symbol.to_string());
    }
    session
}

fn bench_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("fill_share");
    volvelle::init();

    for (name, hrp, variant, data) in [
        ("codex32", "ms", ChecksumVariant::Codex32, CODEX32_DATA),
        ("bech32", "ex", ChecksumVariant::Bech32, BECH32_DATA),
    ] {
        let Ok(params) = SessionParams::new(hrp, 2, 128, variant) else {
            continue;
        };
        group.throughput(Throughput::Elements(data.len() as u64));
        group.bench_function(name, |bench| {
            bench.iter(|| black_box(fill_share(&params, data)));
        });
    }

    group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot");

    let Ok(params) = SessionParams::new("ms", 2, 128, ChecksumVariant::Codex32) else {
        return;
    };
    let session = fill_share(&params, CODEX32_DATA);
    let snapshot = session.serialize().unwrap_or_default();

    group.bench_function("serialize", |bench| {
        bench.iter(|| black_box(session.serialize()));
    });
    group.bench_function("deserialize", |bench| {
        bench.iter(|| black_box(Session::deserialize(black_box(&snapshot))));
    });

    group.finish();
}

criterion_group!(benches, bench_field, bench_pair, bench_fill, bench_snapshot);
criterion_main!(benches);
