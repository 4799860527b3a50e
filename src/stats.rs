//! Descriptive statistics over a cell's duration series.

use std::time::Duration;

use crate::error::BenchError;
use crate::timing::DurationSeries;

/// Read-only summary of one cell's latency samples.
///
/// Computed once per cell, serialized into the report, then discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryStats {
    pub count: usize,
    pub min: Duration,
    pub max: Duration,
    pub mean: Duration,
    pub p95: Duration,
}

/// Reduce a series to {count, min, max, mean, p95}.
///
/// The percentile is nearest-rank on the sorted series:
/// `sorted[(len * 95 / 100).min(len - 1)]`. A single-sample series returns
/// that sample for all four statistics. An empty series is a harness bug and
/// fails with [`BenchError::EmptySeries`].
pub fn summarize(series: &DurationSeries) -> Result<SummaryStats, BenchError> {
    if series.is_empty() {
        return Err(BenchError::EmptySeries);
    }

    let mut sorted = series.samples().to_vec();
    sorted.sort_unstable();
    let len = sorted.len();
    let sum: Duration = sorted.iter().sum();

    Ok(SummaryStats {
        count: len,
        min: sorted[0],
        max: sorted[len - 1],
        mean: sum / len as u32,
        p95: sorted[(len * 95 / 100).min(len - 1)],
    })
}
