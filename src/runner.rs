//! Parameter-space runner: enumerates {strategy × dataset × iteration-count}
//! cells and executes them strictly sequentially.
//!
//! One cell = one independent benchmark execution. Nothing runs concurrently,
//! by construction: concurrent strategy invocations would contend for the
//! store and invalidate latency comparisons.

use crate::error::BenchError;
use crate::report;
use crate::stats::SummaryStats;
use crate::store::{doc_id, CollectionKind, DatasetTag, DocId, Filter, Store};
use crate::strategy::StrategyKind;
use crate::timing::CellRecorder;

/// Explicit run configuration: three enumerated lists, no discovery.
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    pub strategies: Vec<StrategyKind>,
    pub datasets: Vec<DatasetTag>,
    pub iteration_counts: Vec<usize>,
}

/// One (strategy, dataset, iteration-count) combination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkCell {
    pub strategy: StrategyKind,
    pub dataset: DatasetTag,
    pub iterations: usize,
}

impl BenchmarkCell {
    /// Stable cell identity for reports, e.g.
    /// `join/multiple-queries/1000/x500`.
    pub fn name(&self) -> String {
        format!(
            "join/{}/{}/x{}",
            self.strategy.label(),
            self.dataset.label(),
            self.iterations
        )
    }
}

/// A completed cell and its summary statistics.
#[derive(Debug, Clone)]
pub struct CellOutcome {
    pub cell: BenchmarkCell,
    pub stats: SummaryStats,
}

/// Progress reporting mode for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Per-iteration progress line plus a per-cell summary on stderr.
    PerIteration,
    /// No output; callers consume the returned outcomes.
    Silent,
}

impl RunConfig {
    /// Materialize the Cartesian product in the fixed execution order:
    /// strategy outer, dataset middle, iteration count inner. The order is
    /// part of the harness contract — identical configurations always yield
    /// identical cell sequences.
    pub fn cells(&self) -> Vec<BenchmarkCell> {
        let mut cells =
            Vec::with_capacity(self.strategies.len() * self.datasets.len() * self.iteration_counts.len());
        for strategy in &self.strategies {
            for dataset in &self.datasets {
                for &iterations in &self.iteration_counts {
                    cells.push(BenchmarkCell {
                        strategy: *strategy,
                        dataset: dataset.clone(),
                        iterations,
                    });
                }
            }
        }
        cells
    }
}

/// Pick the reference id for a cell: the first available anchor user of the
/// cell's dataset. Deterministic because the store preserves insertion order,
/// so every cell of a dataset resolves against the same user and result-set
/// selectivity stays comparable across strategies.
fn resolve_reference(store: &dyn Store, tag: &DatasetTag) -> Result<DocId, BenchError> {
    let user = store
        .find_one(CollectionKind::Users, tag, &Filter::Any)?
        .and_then(|doc| doc_id(&doc));
    user.ok_or_else(|| BenchError::EmptyReferencePool(tag.clone()))
}

/// Execute every cell of the configuration, in order, returning one outcome
/// per completed cell.
///
/// Any strategy or store failure aborts the whole run; the in-flight cell's
/// partial series is dropped, never reported. Empty configuration lists yield
/// zero cells and success.
pub fn run_cells(
    store: &dyn Store,
    config: &RunConfig,
    progress: Progress,
) -> Result<Vec<CellOutcome>, BenchError> {
    let cells = config.cells();
    let mut outcomes = Vec::with_capacity(cells.len());

    for cell in cells {
        if progress == Progress::PerIteration {
            eprintln!("=== {} ===", cell.name());
        }

        let user = resolve_reference(store, &cell.dataset)?;
        let strategy = cell.strategy.strategy();
        let mut recorder = CellRecorder::new();

        for i in 1..=cell.iterations {
            recorder.time(|| strategy.resolve(store, &cell.dataset, user))?;
            if progress == Progress::PerIteration {
                eprint!("  iteration {}/{} \r", i, cell.iterations);
            }
        }

        let stats = recorder.finalize()?;
        if progress == Progress::PerIteration {
            eprintln!();
            report::print_cell_summary(&stats);
        }
        outcomes.push(CellOutcome { cell, stats });
    }

    Ok(outcomes)
}
