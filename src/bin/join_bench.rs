//! Join-strategy benchmark runner.
//!
//! Seeds one in-memory dataset partition per configured size, then runs the
//! full {strategy × dataset × iteration-count} parameter space sequentially
//! and reports per-cell latency statistics.
//!
//! Run:     `cargo run --release --bin join-bench`
//! Quick:   `cargo run --release --bin join-bench -- --datasets 100 --iterations 50`
//! Single:  `cargo run --release --bin join-bench -- --strategies lookup-unwind`
//! CSV:     `cargo run --release --bin join-bench -- --csv`

use join_benchmarks::report::{duration_ms, print_summary_table, ResultRecorder};
use join_benchmarks::runner::{run_cells, CellOutcome, Progress, RunConfig};
use join_benchmarks::seed::{seed_dataset, FastRng, SeedSpec};
use join_benchmarks::store::DatasetTag;
use join_benchmarks::strategy::StrategyKind;
use join_benchmarks::MemoryStore;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

const DEFAULT_DATASET_SIZES: &[usize] = &[100, 1000, 10000];
const DEFAULT_ITERATIONS: &[usize] = &[50, 500, 5000];
const DEFAULT_RNG_SEED: u64 = 0xABCD_2026;

// ---------------------------------------------------------------------------
// CLI parsing
// ---------------------------------------------------------------------------

struct Config {
    strategies: Vec<StrategyKind>,
    dataset_sizes: Vec<usize>,
    iterations: Vec<usize>,
    dangling: usize,
    rng_seed: u64,
    csv: bool,
    quiet: bool,
}

fn parse_args() -> Config {
    let args: Vec<String> = std::env::args().collect();
    let mut config = Config {
        strategies: StrategyKind::ALL.to_vec(),
        dataset_sizes: DEFAULT_DATASET_SIZES.to_vec(),
        iterations: DEFAULT_ITERATIONS.to_vec(),
        dangling: 0,
        rng_seed: DEFAULT_RNG_SEED,
        csv: false,
        quiet: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--strategies" | "-s" => {
                i += 1;
                if i < args.len() {
                    config.strategies = args[i]
                        .split(',')
                        .map(|s| {
                            StrategyKind::from_label(s.trim()).unwrap_or_else(|| {
                                eprintln!("Unknown strategy: '{}'", s.trim());
                                eprintln!(
                                    "Known strategies: {}",
                                    StrategyKind::ALL
                                        .iter()
                                        .map(|k| k.label())
                                        .collect::<Vec<_>>()
                                        .join(", ")
                                );
                                std::process::exit(1);
                            })
                        })
                        .collect();
                }
            }
            "--datasets" | "-d" => {
                i += 1;
                if i < args.len() {
                    config.dataset_sizes = parse_usize_list(&args[i], "--datasets");
                }
            }
            "--iterations" | "-n" => {
                i += 1;
                if i < args.len() {
                    config.iterations = parse_usize_list(&args[i], "--iterations");
                }
            }
            "--dangling" => {
                i += 1;
                if i < args.len() {
                    config.dangling = args[i].parse().unwrap_or(0);
                }
            }
            "--seed" => {
                i += 1;
                if i < args.len() {
                    config.rng_seed = args[i].parse().unwrap_or(DEFAULT_RNG_SEED);
                }
            }
            "--csv" => config.csv = true,
            "-q" => config.quiet = true,
            other => {
                eprintln!("Unknown argument: '{}'", other);
                std::process::exit(1);
            }
        }
        i += 1;
    }

    config
}

fn parse_usize_list(arg: &str, flag: &str) -> Vec<usize> {
    arg.split(',')
        .map(|s| {
            s.trim().parse().unwrap_or_else(|_| {
                eprintln!("Invalid value for {}: '{}'", flag, s.trim());
                std::process::exit(1);
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// CSV output
// ---------------------------------------------------------------------------

fn print_csv_header() {
    println!("\"strategy\",\"dataset\",\"iterations\",\"samples\",\"min_ms\",\"mean_ms\",\"p95_ms\",\"max_ms\"");
}

fn print_csv_row(outcome: &CellOutcome) {
    println!(
        "\"{}\",\"{}\",{},{},{:.3},{:.3},{:.3},{:.3}",
        outcome.cell.strategy.label(),
        outcome.cell.dataset.label(),
        outcome.cell.iterations,
        outcome.stats.count,
        duration_ms(outcome.stats.min),
        duration_ms(outcome.stats.mean),
        duration_ms(outcome.stats.p95),
        duration_ms(outcome.stats.max),
    );
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() {
    let config = parse_args();

    // One-time store acquisition: a connect failure aborts before any cell.
    let mut store = MemoryStore::connect().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    if !config.quiet && !config.csv {
        eprintln!("=== Join-strategy benchmark ===");
        eprintln!(
            "Parameters: datasets={:?}, iterations={:?}, strategies=[{}], dangling={}",
            config.dataset_sizes,
            config.iterations,
            config
                .strategies
                .iter()
                .map(|k| k.label())
                .collect::<Vec<_>>()
                .join(", "),
            config.dangling,
        );
    }

    let mut rng = FastRng::new(config.rng_seed);
    let mut datasets = Vec::with_capacity(config.dataset_sizes.len());
    for &size in &config.dataset_sizes {
        let mut spec = SeedSpec::sized(size);
        spec.dangling_orders = config.dangling;
        if !config.quiet && !config.csv {
            eprintln!(
                "Seeding dataset '{}' ({} users, {} items, {} orders)...",
                spec.tag, spec.users, spec.items, spec.orders
            );
        }
        seed_dataset(&mut store, &spec, &mut rng);
        datasets.push(DatasetTag::new(size.to_string()));
    }

    let run = RunConfig {
        strategies: config.strategies,
        datasets,
        iteration_counts: config.iterations,
    };

    let progress = if config.quiet || config.csv {
        Progress::Silent
    } else {
        Progress::PerIteration
    };

    let outcomes = match run_cells(&store, &run, progress) {
        Ok(outcomes) => outcomes,
        Err(e) => {
            eprintln!("Run aborted: {}", e);
            std::process::exit(1);
        }
    };

    if config.csv {
        print_csv_header();
        for outcome in &outcomes {
            print_csv_row(outcome);
        }
    } else {
        eprintln!();
        print_summary_table(&outcomes);
    }

    let mut recorder = ResultRecorder::new("join");
    for outcome in &outcomes {
        recorder.record_cell(outcome);
    }
    if let Err(e) = recorder.save() {
        eprintln!("Failed to save report: {}", e);
        std::process::exit(1);
    }
}
