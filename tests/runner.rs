//! Parameter-space runner behavior: ordering, empty configs, abort-on-error.

mod common;

use std::cell::Cell;

use common::{load_join_dataset, seed_fixture};
use join_benchmarks::store::{CollectionKind, DatasetTag, Document, Filter, Stage, Store};
use join_benchmarks::{
    run_cells, BenchError, MemoryStore, Progress, RunConfig, StoreError, StrategyKind,
};

fn fixture_config(iterations: Vec<usize>) -> RunConfig {
    RunConfig {
        strategies: StrategyKind::ALL.to_vec(),
        datasets: vec![DatasetTag::new("fixture")],
        iteration_counts: iterations,
    }
}

#[test]
fn cell_order_is_deterministic_and_documented() {
    let config = RunConfig {
        strategies: vec![StrategyKind::MultipleQueries, StrategyKind::LookupUnwind],
        datasets: vec![DatasetTag::new("a"), DatasetTag::new("b")],
        iteration_counts: vec![5, 10],
    };

    let names: Vec<String> = config.cells().iter().map(|c| c.name()).collect();
    // Strategy outer, dataset middle, iteration count inner.
    assert_eq!(
        names,
        vec![
            "join/multiple-queries/a/x5",
            "join/multiple-queries/a/x10",
            "join/multiple-queries/b/x5",
            "join/multiple-queries/b/x10",
            "join/lookup-unwind/a/x5",
            "join/lookup-unwind/a/x10",
            "join/lookup-unwind/b/x5",
            "join/lookup-unwind/b/x10",
        ]
    );

    // Identical configuration, identical sequence.
    assert_eq!(config.cells(), config.cells());
}

#[test]
fn empty_lists_complete_with_zero_cells() {
    let store = common::fresh_store();

    let no_strategies = RunConfig {
        strategies: vec![],
        datasets: vec![DatasetTag::new("x")],
        iteration_counts: vec![10],
    };
    assert!(run_cells(&store, &no_strategies, Progress::Silent)
        .unwrap()
        .is_empty());

    let no_iterations = RunConfig {
        strategies: StrategyKind::ALL.to_vec(),
        datasets: vec![DatasetTag::new("x")],
        iteration_counts: vec![],
    };
    assert!(run_cells(&store, &no_iterations, Progress::Silent)
        .unwrap()
        .is_empty());

    let no_datasets = RunConfig {
        strategies: StrategyKind::ALL.to_vec(),
        datasets: vec![],
        iteration_counts: vec![10],
    };
    assert!(run_cells(&store, &no_datasets, Progress::Silent)
        .unwrap()
        .is_empty());
}

#[test]
fn one_outcome_per_cell_with_one_sample_per_iteration() {
    let ds = load_join_dataset();
    let fixture = seed_fixture(&ds, false);

    let config = fixture_config(vec![3, 7]);
    let outcomes = run_cells(&fixture.store, &config, Progress::Silent).unwrap();

    assert_eq!(outcomes.len(), 3 * 1 * 2);
    for outcome in &outcomes {
        assert_eq!(outcome.stats.count, outcome.cell.iterations);
        assert!(outcome.stats.min <= outcome.stats.p95);
        assert!(outcome.stats.p95 <= outcome.stats.max);
    }

    // Outcomes come back in cell order.
    let names: Vec<String> = outcomes.iter().map(|o| o.cell.name()).collect();
    let expected: Vec<String> = config.cells().iter().map(|c| c.name()).collect();
    assert_eq!(names, expected);
}

#[test]
fn missing_anchor_user_is_fatal_for_the_dataset() {
    let mut store = MemoryStore::connect().unwrap();
    let tag = DatasetTag::new("empty");
    // Collections exist but hold no users.
    store.insert_many(CollectionKind::Users, &tag, vec![]);
    store.insert_many(CollectionKind::Items, &tag, vec![]);
    store.insert_many(CollectionKind::Orders, &tag, vec![]);

    let config = RunConfig {
        strategies: vec![StrategyKind::MultipleQueries],
        datasets: vec![tag.clone()],
        iteration_counts: vec![5],
    };

    let err = run_cells(&store, &config, Progress::Silent).unwrap_err();
    match err {
        BenchError::EmptyReferencePool(t) => assert_eq!(t, tag),
        other => panic!("expected EmptyReferencePool, got {other}"),
    }
}

#[test]
fn zero_iteration_cell_surfaces_empty_series() {
    let ds = load_join_dataset();
    let fixture = seed_fixture(&ds, false);

    let config = fixture_config(vec![0]);
    let err = run_cells(&fixture.store, &config, Progress::Silent).unwrap_err();
    assert!(matches!(err, BenchError::EmptySeries));
}

/// Delegates to a real store but fails every query after a budget is spent.
struct FailingStore {
    inner: MemoryStore,
    budget: Cell<usize>,
}

impl FailingStore {
    fn charge(&self, collection: &str) -> Result<(), StoreError> {
        let left = self.budget.get();
        if left == 0 {
            return Err(StoreError::Query {
                collection: collection.to_string(),
                reason: "injected failure".to_string(),
            });
        }
        self.budget.set(left - 1);
        Ok(())
    }
}

impl Store for FailingStore {
    fn find_one(
        &self,
        kind: CollectionKind,
        tag: &DatasetTag,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError> {
        self.charge(&kind.name(tag))?;
        self.inner.find_one(kind, tag, filter)
    }

    fn find(
        &self,
        kind: CollectionKind,
        tag: &DatasetTag,
        filter: &Filter,
    ) -> Result<Vec<Document>, StoreError> {
        self.charge(&kind.name(tag))?;
        self.inner.find(kind, tag, filter)
    }

    fn aggregate(
        &self,
        kind: CollectionKind,
        tag: &DatasetTag,
        pipeline: &[Stage],
    ) -> Result<Vec<Document>, StoreError> {
        self.charge(&kind.name(tag))?;
        self.inner.aggregate(kind, tag, pipeline)
    }
}

#[test]
fn mid_run_store_failure_aborts_without_partial_results() {
    let ds = load_join_dataset();
    let fixture = seed_fixture(&ds, false);

    // Enough budget for the first cell's reference lookup and one pipeline
    // call, then everything fails mid-iteration.
    let store = FailingStore {
        inner: fixture.store,
        budget: Cell::new(2),
    };

    let config = RunConfig {
        strategies: vec![StrategyKind::LookupUnwind],
        datasets: vec![DatasetTag::new("fixture")],
        iteration_counts: vec![10],
    };

    let err = run_cells(&store, &config, Progress::Silent).unwrap_err();
    assert!(matches!(
        err,
        BenchError::Store(StoreError::Query { .. })
    ));
}
