//! Benchmark harness comparing three strategies for resolving foreign-key
//! references (`order.user`, `order.item`) stored in a document store.
//!
//! The harness enumerates the Cartesian product of
//! {strategy × dataset size × iteration count}, executes each cell strictly
//! sequentially against a shared store, and reduces per-iteration latencies
//! to descriptive statistics (count/min/max/mean/p95).

pub mod error;
pub mod memory;
pub mod report;
pub mod runner;
pub mod schema;
pub mod seed;
pub mod stats;
pub mod store;
pub mod strategy;
pub mod timing;

pub use error::{BenchError, StoreError};
pub use memory::MemoryStore;
pub use runner::{run_cells, BenchmarkCell, CellOutcome, Progress, RunConfig};
pub use stats::{summarize, SummaryStats};
pub use store::{CollectionKind, DatasetTag, DocId, Document, Filter, Stage, Store, Value};
pub use strategy::{JoinStrategy, StrategyKind};
pub use timing::{CellRecorder, DurationSeries};
