//! Document data model and the narrow store interface the harness needs.
//!
//! The store is an injected collaborator: the runner and the strategies only
//! see the [`Store`] trait. Queries come in two shapes — filtered finds for
//! the manual join strategy, and a small aggregation pipeline ([`Stage`]) for
//! the two pipeline strategies.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::StoreError;

// ---------------------------------------------------------------------------
// Identifiers and dataset tags
// ---------------------------------------------------------------------------

/// Opaque document identifier assigned by the store at insert time.
///
/// Join equality is native `DocId` equality; identifiers are never compared
/// through a stringified form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocId(pub u64);

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Label identifying one fixed-size dataset variant ("100", "1000", ...).
///
/// Immutable for a run's lifetime; maps to the `users_<tag>` / `items_<tag>` /
/// `orders_<tag>` collection partitions created by the seeder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatasetTag(pub String);

impl DatasetTag {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn label(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatasetTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The three logical collections of the benchmark schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    Users,
    Items,
    Orders,
}

impl CollectionKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Items => "items",
            Self::Orders => "orders",
        }
    }

    /// Physical collection name for a dataset tag, e.g. `orders_1000`.
    pub fn name(&self, tag: &DatasetTag) -> String {
        format!("{}_{}", self.prefix(), tag.label())
    }
}

// ---------------------------------------------------------------------------
// Values and documents
// ---------------------------------------------------------------------------

/// A document field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    String(String),
    Id(DocId),
    Array(Vec<Value>),
    Object(Document),
}

impl Value {
    pub fn as_id(&self) -> Option<DocId> {
        match self {
            Value::Id(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Document> {
        match self {
            Value::Object(doc) => Some(doc),
            _ => None,
        }
    }
}

/// A document: ordered field map with the id under `"_id"`.
pub type Document = BTreeMap<String, Value>;

/// Extract a document's id, if it carries one.
pub fn doc_id(doc: &Document) -> Option<DocId> {
    doc.get("_id").and_then(Value::as_id)
}

/// Build a document from field pairs.
pub fn document(fields: impl IntoIterator<Item = (&'static str, Value)>) -> Document {
    fields
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Filter for `find` / `find_one`.
#[derive(Debug, Clone)]
pub enum Filter {
    /// Matches every document. Used to pick the first available anchor.
    Any,
    /// Field equals the given value.
    Eq(&'static str, Value),
    /// Field value is one of the given values.
    In(&'static str, Vec<Value>),
}

impl Filter {
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Filter::Any => true,
            Filter::Eq(field, value) => doc.get(*field) == Some(value),
            Filter::In(field, values) => doc
                .get(*field)
                .map(|v| values.contains(v))
                .unwrap_or(false),
        }
    }
}

/// One stage of the aggregation pipeline used by the pipeline join strategies.
#[derive(Debug, Clone)]
pub enum Stage {
    /// Keep documents whose field equals the value.
    Match { field: &'static str, value: Value },
    /// Left-outer join: for each document, collect into `as_field` every
    /// document of `from` (same dataset tag) whose `_id` equals the local
    /// field's id. Documents with no match get an empty array.
    Lookup {
        from: CollectionKind,
        local_field: &'static str,
        as_field: &'static str,
    },
    /// Flatten a one-element array field into its element. Documents whose
    /// array is empty or missing are dropped (inner-join semantics).
    Unwind { field: &'static str },
    /// Replace an array field with its first element, or `Value::Null` when
    /// the array is empty (outer-join-preserving counterpart of `Unwind`).
    SetFirstElement { field: &'static str },
}

// ---------------------------------------------------------------------------
// Adapter trait
// ---------------------------------------------------------------------------

/// The narrow store interface the harness depends on.
///
/// All calls are blocking and read-only; the store value is shared by the
/// single-threaded runner for the run's duration.
pub trait Store {
    /// Return the first document matching the filter, in insertion order.
    fn find_one(
        &self,
        kind: CollectionKind,
        tag: &DatasetTag,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError>;

    /// Return every document matching the filter, in insertion order.
    fn find(
        &self,
        kind: CollectionKind,
        tag: &DatasetTag,
        filter: &Filter,
    ) -> Result<Vec<Document>, StoreError>;

    /// Execute an aggregation pipeline against one collection.
    fn aggregate(
        &self,
        kind: CollectionKind,
        tag: &DatasetTag,
        pipeline: &[Stage],
    ) -> Result<Vec<Document>, StoreError>;
}
