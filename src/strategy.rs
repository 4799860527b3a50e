//! The three reference-resolution strategies under comparison.
//!
//! Each strategy resolves one user's orders into documents with embedded
//! user/item records, against the same logical schema, via a different query
//! plan. The semantic asymmetry is deliberate and load-bearing for the
//! comparison:
//!
//! - `MultipleQueries` and `LookupFirstElement` keep orders whose user/item
//!   reference dangles (the field stays unresolved),
//! - `LookupUnwind` silently drops them (inner-join semantics).

use crate::error::StoreError;
use crate::store::{
    doc_id, CollectionKind, DatasetTag, DocId, Document, Filter, Stage, Store, Value,
};

// ---------------------------------------------------------------------------
// Contract
// ---------------------------------------------------------------------------

/// One pluggable join strategy: resolve the orders of `user` within the
/// dataset partition named by `tag`.
///
/// Blocking on store I/O, no retries; store errors propagate unchanged.
pub trait JoinStrategy {
    fn resolve(
        &self,
        store: &dyn Store,
        tag: &DatasetTag,
        user: DocId,
    ) -> Result<Vec<Document>, StoreError>;
}

/// Enumerated strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    MultipleQueries,
    LookupUnwind,
    LookupFirstElement,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] = [
        StrategyKind::MultipleQueries,
        StrategyKind::LookupUnwind,
        StrategyKind::LookupFirstElement,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::MultipleQueries => "multiple-queries",
            Self::LookupUnwind => "lookup-unwind",
            Self::LookupFirstElement => "lookup-first-element",
        }
    }

    pub fn from_label(label: &str) -> Option<StrategyKind> {
        Self::ALL.iter().find(|k| k.label() == label).copied()
    }

    /// The strategy implementation behind this tag.
    pub fn strategy(&self) -> &'static dyn JoinStrategy {
        match self {
            Self::MultipleQueries => &MultipleQueries,
            Self::LookupUnwind => &LookupUnwind,
            Self::LookupFirstElement => &LookupFirstElement,
        }
    }
}

// ---------------------------------------------------------------------------
// 1. Manual multi-query join
// ---------------------------------------------------------------------------

/// Fetch orders, batch-fetch the referenced items, fetch the anchor user,
/// then join in memory by linear scan. The O(orders × items) scan is the
/// intentional naive baseline.
pub struct MultipleQueries;

impl JoinStrategy for MultipleQueries {
    fn resolve(
        &self,
        store: &dyn Store,
        tag: &DatasetTag,
        user: DocId,
    ) -> Result<Vec<Document>, StoreError> {
        let mut orders = store.find(
            CollectionKind::Orders,
            tag,
            &Filter::Eq("user", Value::Id(user)),
        )?;

        let mut item_ids: Vec<Value> = Vec::new();
        for order in &orders {
            if let Some(id) = order.get("item").and_then(Value::as_id) {
                if !item_ids.contains(&Value::Id(id)) {
                    item_ids.push(Value::Id(id));
                }
            }
        }

        let items = store.find(CollectionKind::Items, tag, &Filter::In("_id", item_ids))?;
        let users = store.find(
            CollectionKind::Users,
            tag,
            &Filter::Eq("_id", Value::Id(user)),
        )?;

        for order in &mut orders {
            let item_ref = order.get("item").and_then(Value::as_id);
            if let Some(found) = items.iter().find(|item| doc_id(item) == item_ref) {
                order.insert("item".to_string(), Value::Object(found.clone()));
            }

            let user_ref = order.get("user").and_then(Value::as_id);
            if let Some(found) = users.iter().find(|u| doc_id(u) == user_ref) {
                order.insert("user".to_string(), Value::Object(found.clone()));
            }
        }

        Ok(orders)
    }
}

// ---------------------------------------------------------------------------
// 2. Pipeline join, list-then-flatten
// ---------------------------------------------------------------------------

/// Push the join into the store: lookup each relation into an array, then
/// unwind the one-element array into a scalar field. Unwind drops orders
/// whose joined array is empty, so dangling references disappear from the
/// result set.
pub struct LookupUnwind;

impl JoinStrategy for LookupUnwind {
    fn resolve(
        &self,
        store: &dyn Store,
        tag: &DatasetTag,
        user: DocId,
    ) -> Result<Vec<Document>, StoreError> {
        store.aggregate(
            CollectionKind::Orders,
            tag,
            &[
                Stage::Match {
                    field: "user",
                    value: Value::Id(user),
                },
                Stage::Lookup {
                    from: CollectionKind::Items,
                    local_field: "item",
                    as_field: "item",
                },
                Stage::Unwind { field: "item" },
                Stage::Lookup {
                    from: CollectionKind::Users,
                    local_field: "user",
                    as_field: "user",
                },
                Stage::Unwind { field: "user" },
            ],
        )
    }
}

// ---------------------------------------------------------------------------
// 3. Pipeline join, indexed-element extraction
// ---------------------------------------------------------------------------

/// Same lookups as [`LookupUnwind`], but the joined array is reduced by
/// taking its first element instead of unwinding, so orders with no match
/// survive with the field set to null.
pub struct LookupFirstElement;

impl JoinStrategy for LookupFirstElement {
    fn resolve(
        &self,
        store: &dyn Store,
        tag: &DatasetTag,
        user: DocId,
    ) -> Result<Vec<Document>, StoreError> {
        store.aggregate(
            CollectionKind::Orders,
            tag,
            &[
                Stage::Match {
                    field: "user",
                    value: Value::Id(user),
                },
                Stage::Lookup {
                    from: CollectionKind::Items,
                    local_field: "item",
                    as_field: "item",
                },
                Stage::Lookup {
                    from: CollectionKind::Users,
                    local_field: "user",
                    as_field: "user",
                },
                Stage::SetFirstElement { field: "item" },
                Stage::SetFirstElement { field: "user" },
            ],
        )
    }
}
