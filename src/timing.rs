//! Scoped wall-clock measurement for one benchmark cell.

use std::time::{Duration, Instant};

use crate::error::BenchError;
use crate::stats::{summarize, SummaryStats};

/// Ordered per-iteration latency samples for one in-progress cell.
///
/// Append-only while the cell runs; consumed exactly once by
/// [`summarize`]; never retained across cells.
#[derive(Debug, Default, Clone)]
pub struct DurationSeries {
    samples: Vec<Duration>,
}

impl DurationSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sample: Duration) {
        self.samples.push(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Duration] {
        &self.samples
    }
}

impl FromIterator<Duration> for DurationSeries {
    fn from_iter<I: IntoIterator<Item = Duration>>(iter: I) -> Self {
        Self {
            samples: iter.into_iter().collect(),
        }
    }
}

/// Records one duration per successful strategy invocation.
#[derive(Debug, Default)]
pub struct CellRecorder {
    series: DurationSeries,
}

impl CellRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time one invocation. The clock is sampled immediately before the call
    /// and immediately after it returns. A failed invocation records nothing;
    /// the error propagates to the caller.
    pub fn time<T, E>(&mut self, f: impl FnOnce() -> Result<T, E>) -> Result<T, E> {
        let start = Instant::now();
        let out = f()?;
        self.series.push(start.elapsed());
        Ok(out)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Close the series and reduce it to summary statistics.
    pub fn finalize(self) -> Result<SummaryStats, BenchError> {
        summarize(&self.series)
    }
}
