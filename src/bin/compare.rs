//! Benchmark comparison tool.
//!
//! Compares two JSON result files and prints a table showing per-cell deltas.
//!
//! Usage: `cargo run --bin bench-compare -- <baseline.json> <candidate.json>`

use join_benchmarks::schema::{BenchmarkMetrics, BenchmarkReport, BenchmarkResult};
use std::collections::HashMap;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <baseline.json> <candidate.json>", args[0]);
        std::process::exit(1);
    }

    let baseline = load_report(&args[1]);
    let candidate = load_report(&args[2]);

    // Build lookup by cell name
    let base_map: HashMap<&str, &BenchmarkResult> = baseline
        .results
        .iter()
        .map(|r| (r.benchmark.as_str(), r))
        .collect();

    let cand_map: HashMap<&str, &BenchmarkResult> = candidate
        .results
        .iter()
        .map(|r| (r.benchmark.as_str(), r))
        .collect();

    eprintln!("Baseline: {} ({})", args[1], baseline.metadata.timestamp);
    eprintln!("Candidate: {} ({})", args[2], candidate.metadata.timestamp);
    eprintln!();

    println!(
        "{:<46} | {:>12} | {:>12} | {:>12}",
        "Cell", "Base mean", "New mean", "Delta"
    );
    println!("{}", "-".repeat(92));

    let mut matched = 0u32;
    let mut only_base = 0u32;
    let mut only_cand = 0u32;

    for cand in &candidate.results {
        if let Some(base) = base_map.get(cand.benchmark.as_str()) {
            matched += 1;
            print_comparison(&cand.benchmark, &base.metrics, &cand.metrics);
        } else {
            only_cand += 1;
        }
    }

    for base in &baseline.results {
        if !cand_map.contains_key(base.benchmark.as_str()) {
            only_base += 1;
        }
    }

    println!("{}", "-".repeat(92));
    println!(
        "Compared: {} | Baseline only: {} | Candidate only: {}",
        matched, only_base, only_cand
    );
}

fn load_report(path: &str) -> BenchmarkReport {
    let contents = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {}", path, e);
        std::process::exit(1);
    });
    serde_json::from_str(&contents).unwrap_or_else(|e| {
        eprintln!("Error parsing {}: {}", path, e);
        std::process::exit(1);
    })
}

/// Compare mean latency; fall back to p95 when a file predates mean capture.
fn print_comparison(name: &str, base: &BenchmarkMetrics, cand: &BenchmarkMetrics) {
    let pair = match (base.mean_ns, cand.mean_ns) {
        (Some(b), Some(c)) => Some((b, c)),
        _ => match (base.p95_ns, cand.p95_ns) {
            (Some(b), Some(c)) => Some((b, c)),
            _ => None,
        },
    };

    if let Some((base_ns, cand_ns)) = pair {
        let delta_pct = if base_ns > 0 {
            ((cand_ns as f64 - base_ns as f64) / base_ns as f64) * 100.0
        } else {
            0.0
        };

        let hint = if delta_pct < -1.0 {
            "faster"
        } else if delta_pct > 1.0 {
            "slower"
        } else {
            "~same"
        };

        println!(
            "{:<46} | {:>12} | {:>12} | {:>+.1}% ({})",
            name,
            format_ns(base_ns),
            format_ns(cand_ns),
            delta_pct,
            hint,
        );
    }
}

fn format_ns(ns: u64) -> String {
    if ns < 1_000 {
        format!("{} ns", ns)
    } else if ns < 1_000_000 {
        format!("{:.2} us", ns as f64 / 1_000.0)
    } else if ns < 1_000_000_000 {
        format!("{:.2} ms", ns as f64 / 1_000_000.0)
    } else {
        format!("{:.2} s", ns as f64 / 1_000_000_000.0)
    }
}
