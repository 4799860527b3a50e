//! Report output: human-readable tables on stderr and JSON report files
//! under `results/` following [`crate::schema`].

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use crate::runner::CellOutcome;
use crate::schema::*;
use crate::stats::SummaryStats;

// ---------------------------------------------------------------------------
// Human-readable output
// ---------------------------------------------------------------------------

pub fn duration_ms(d: Duration) -> f64 {
    d.as_nanos() as f64 / 1_000_000.0
}

/// One-cell summary line, printed when a cell completes.
pub fn print_cell_summary(stats: &SummaryStats) {
    eprintln!(
        "  samples {:>8}  min {:>8.3}ms  mean {:>8.3}ms  p95 {:>8.3}ms  max {:>8.3}ms",
        stats.count,
        duration_ms(stats.min),
        duration_ms(stats.mean),
        duration_ms(stats.p95),
        duration_ms(stats.max),
    );
}

/// Full run table, one row per completed cell.
pub fn print_summary_table(outcomes: &[CellOutcome]) {
    eprintln!(
        "{:<46} {:>8}  {:>10}  {:>10}  {:>10}  {:>10}",
        "Cell", "samples", "min", "mean", "p95", "max"
    );
    eprintln!("{}", "-".repeat(102));
    for outcome in outcomes {
        eprintln!(
            "{:<46} {:>8}  {:>8.3}ms  {:>8.3}ms  {:>8.3}ms  {:>8.3}ms",
            outcome.cell.name(),
            outcome.stats.count,
            duration_ms(outcome.stats.min),
            duration_ms(outcome.stats.mean),
            duration_ms(outcome.stats.p95),
            duration_ms(outcome.stats.max),
        );
    }
    eprintln!("{}", "-".repeat(102));
}

// ---------------------------------------------------------------------------
// JSON recorder
// ---------------------------------------------------------------------------

/// Accumulates completed cells and writes them to a JSON report file.
pub struct ResultRecorder {
    category: String,
    metadata: RunMetadata,
    results: Vec<BenchmarkResult>,
}

impl ResultRecorder {
    /// Create a new recorder for the given category.
    ///
    /// Captures metadata (hardware, git, timestamp) at construction time.
    pub fn new(category: &str) -> Self {
        Self {
            category: category.to_string(),
            metadata: RunMetadata {
                timestamp: iso8601_now(),
                git_commit: git_short_commit(),
                git_branch: git_branch(),
                git_dirty: git_is_dirty(),
                harness_version: env!("CARGO_PKG_VERSION").to_string(),
                hardware: capture_hardware(),
            },
            results: Vec::new(),
        }
    }

    /// Record one completed cell.
    pub fn record_cell(&mut self, outcome: &CellOutcome) {
        let cell = &outcome.cell;
        let stats = &outcome.stats;

        let mut parameters = HashMap::new();
        parameters.insert(
            "strategy".to_string(),
            serde_json::json!(cell.strategy.label()),
        );
        parameters.insert(
            "dataset".to_string(),
            serde_json::json!(cell.dataset.label()),
        );
        parameters.insert("iterations".to_string(), serde_json::json!(cell.iterations));

        self.results.push(BenchmarkResult {
            benchmark: cell.name(),
            category: self.category.clone(),
            parameters,
            metrics: BenchmarkMetrics {
                samples: Some(stats.count as u64),
                min_ns: Some(stats.min.as_nanos() as u64),
                max_ns: Some(stats.max.as_nanos() as u64),
                mean_ns: Some(stats.mean.as_nanos() as u64),
                p95_ns: Some(stats.p95.as_nanos() as u64),
            },
        });
    }

    /// Write all accumulated results to a JSON file in `results/`.
    ///
    /// File naming: `<category>-<timestamp>-<commit>.json`
    pub fn save(self) -> io::Result<PathBuf> {
        let report = BenchmarkReport {
            schema_version: 1,
            metadata: self.metadata.clone(),
            results: self.results,
        };

        let commit = self.metadata.git_commit.as_deref().unwrap_or("unknown");
        // Sanitize timestamp for filename (replace colons)
        let ts = self.metadata.timestamp.replace(':', "-");
        let filename = format!("{}-{}-{}.json", self.category, ts, commit);

        let results_dir = PathBuf::from("results");
        std::fs::create_dir_all(&results_dir)?;
        let path = results_dir.join(&filename);

        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        std::fs::write(&path, json)?;

        eprintln!("Results saved to {}", path.display());
        Ok(path)
    }
}

// ---------------------------------------------------------------------------
// Metadata capture helpers
// ---------------------------------------------------------------------------

fn iso8601_now() -> String {
    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default();
    let secs = now.as_secs();

    // Manual UTC formatting (no chrono dependency)
    let days = secs / 86400;
    let time_of_day = secs % 86400;
    let hours = time_of_day / 3600;
    let minutes = (time_of_day % 3600) / 60;
    let seconds = time_of_day % 60;

    let (year, month, day) = days_to_ymd(days);

    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
        year, month, day, hours, minutes, seconds
    )
}

fn days_to_ymd(mut days: u64) -> (u64, u64, u64) {
    // Algorithm from Howard Hinnant's date library
    days += 719468;
    let era = days / 146097;
    let doe = days - era * 146097;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let y = if m <= 2 { y + 1 } else { y };
    (y, m, d)
}

fn git_short_commit() -> Option<String> {
    std::process::Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
}

fn git_branch() -> Option<String> {
    std::process::Command::new("git")
        .args(["rev-parse", "--abbrev-ref", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
}

fn git_is_dirty() -> Option<bool> {
    std::process::Command::new("git")
        .args(["status", "--porcelain"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| !o.stdout.is_empty())
}

fn capture_hardware() -> HardwareInfo {
    HardwareInfo {
        cpu: read_cpu_model(),
        cores: std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(0),
        ram_gb: read_total_ram_gb(),
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
    }
}

fn read_cpu_model() -> String {
    if let Ok(cpuinfo) = std::fs::read_to_string("/proc/cpuinfo") {
        for line in cpuinfo.lines() {
            if line.starts_with("model name") {
                if let Some((_, model)) = line.split_once(':') {
                    return model.trim().to_string();
                }
            }
        }
    }
    "unknown".to_string()
}

fn read_total_ram_gb() -> u64 {
    if let Ok(meminfo) = std::fs::read_to_string("/proc/meminfo") {
        for line in meminfo.lines() {
            if line.starts_with("MemTotal:") {
                let kb: u64 = line
                    .split_whitespace()
                    .nth(1)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(0);
                return kb / (1024 * 1024);
            }
        }
    }
    0
}
