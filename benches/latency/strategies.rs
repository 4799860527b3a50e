//! Join-strategy latency benchmarks.
//!
//! Criterion pass for statistically sampled comparisons, plus a fixed-sample
//! percentile pass through the crate's own recorder so the numbers match what
//! the `join-bench` runner reports.

use criterion::{criterion_group, BenchmarkId, Criterion, Throughput};

use join_benchmarks::report::print_cell_summary;
use join_benchmarks::seed::{seed_dataset, FastRng, SeedSpec};
use join_benchmarks::store::{DatasetTag, DocId};
use join_benchmarks::strategy::StrategyKind;
use join_benchmarks::{CellRecorder, MemoryStore};

const PERCENTILE_SAMPLES: usize = 500;
const DATASET_SIZES: &[usize] = &[100, 1000];

fn seeded_store(size: usize) -> (MemoryStore, DatasetTag, DocId) {
    let mut store = MemoryStore::connect().expect("connect");
    let mut rng = FastRng::new(0xABCD_2026);
    let spec = SeedSpec::sized(size);
    let anchor = seed_dataset(&mut store, &spec, &mut rng).expect("seeded anchor user");
    (store, spec.tag, anchor)
}

fn strategy_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("join/resolve");
    group.throughput(Throughput::Elements(1));

    eprintln!("\n--- Latency Percentiles: join/resolve ---");
    for &size in DATASET_SIZES {
        let (store, tag, user) = seeded_store(size);

        for kind in StrategyKind::ALL {
            let strategy = kind.strategy();
            group.bench_function(BenchmarkId::new(kind.label(), size), |b| {
                b.iter(|| strategy.resolve(&store, &tag, user).unwrap());
            });

            let mut recorder = CellRecorder::new();
            for _ in 0..PERCENTILE_SAMPLES {
                recorder
                    .time(|| strategy.resolve(&store, &tag, user))
                    .unwrap();
            }
            eprintln!("join/resolve/{}/{}", kind.label(), size);
            print_cell_summary(&recorder.finalize().unwrap());
        }
    }
    group.finish();
}

criterion_group!(benches, strategy_resolve);

fn main() {
    benches();
}
