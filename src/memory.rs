//! In-process document store backing the benchmark harness.
//!
//! Collections are insertion-ordered vectors of documents keyed by their
//! physical name (`orders_1000`, ...). Ids are assigned from a store-wide
//! counter at insert time. The aggregation executor implements exactly the
//! stages the pipeline strategies emit.

use std::collections::HashMap;

use crate::error::StoreError;
use crate::store::{doc_id, CollectionKind, DatasetTag, DocId, Document, Filter, Stage, Store, Value};

/// An embedded, insertion-ordered document store.
pub struct MemoryStore {
    collections: HashMap<String, Vec<Document>>,
    next_id: u64,
}

impl MemoryStore {
    /// One-time connection point. Kept fallible so callers fail fast at
    /// startup the same way they would against an out-of-process store.
    pub fn connect() -> Result<Self, StoreError> {
        Ok(Self {
            collections: HashMap::new(),
            next_id: 1,
        })
    }

    /// Insert documents into a collection, assigning each a fresh `_id`.
    /// Returns the assigned ids in insertion order. Seeder/test entry point;
    /// the harness itself never writes.
    pub fn insert_many(
        &mut self,
        kind: CollectionKind,
        tag: &DatasetTag,
        docs: Vec<Document>,
    ) -> Vec<DocId> {
        let collection = self.collections.entry(kind.name(tag)).or_default();
        let mut ids = Vec::with_capacity(docs.len());
        for mut doc in docs {
            let id = DocId(self.next_id);
            self.next_id += 1;
            doc.insert("_id".to_string(), Value::Id(id));
            collection.push(doc);
            ids.push(id);
        }
        ids
    }

    /// Reserve an id that will never belong to any document. Used to seed
    /// dangling references.
    pub fn reserve_missing_id(&mut self) -> DocId {
        let id = DocId(self.next_id);
        self.next_id += 1;
        id
    }

    fn collection(&self, kind: CollectionKind, tag: &DatasetTag) -> Result<&[Document], StoreError> {
        let name = kind.name(tag);
        self.collections
            .get(&name)
            .map(Vec::as_slice)
            .ok_or(StoreError::UnknownCollection(name))
    }

    fn apply_stage(
        &self,
        docs: Vec<Document>,
        stage: &Stage,
        tag: &DatasetTag,
    ) -> Result<Vec<Document>, StoreError> {
        match stage {
            Stage::Match { field, value } => Ok(docs
                .into_iter()
                .filter(|doc| doc.get(*field) == Some(value))
                .collect()),

            Stage::Lookup {
                from,
                local_field,
                as_field,
            } => {
                let foreign = self.collection(*from, tag)?;
                Ok(docs
                    .into_iter()
                    .map(|mut doc| {
                        let local = doc.get(*local_field).and_then(Value::as_id);
                        let matches: Vec<Value> = foreign
                            .iter()
                            .filter(|f| doc_id(f) == local && local.is_some())
                            .map(|f| Value::Object(f.clone()))
                            .collect();
                        doc.insert(as_field.to_string(), Value::Array(matches));
                        doc
                    })
                    .collect())
            }

            Stage::Unwind { field } => {
                let mut out = Vec::with_capacity(docs.len());
                for doc in docs {
                    let elements = match doc.get(*field).and_then(Value::as_array) {
                        Some(arr) if !arr.is_empty() => arr.to_vec(),
                        // Empty or missing array: the document is dropped.
                        _ => continue,
                    };
                    for element in elements {
                        let mut copy = doc.clone();
                        copy.insert(field.to_string(), element);
                        out.push(copy);
                    }
                }
                Ok(out)
            }

            Stage::SetFirstElement { field } => Ok(docs
                .into_iter()
                .map(|mut doc| {
                    let first = doc
                        .get(*field)
                        .and_then(Value::as_array)
                        .and_then(|arr| arr.first().cloned())
                        .unwrap_or(Value::Null);
                    doc.insert(field.to_string(), first);
                    doc
                })
                .collect()),
        }
    }
}

impl Store for MemoryStore {
    fn find_one(
        &self,
        kind: CollectionKind,
        tag: &DatasetTag,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError> {
        Ok(self
            .collection(kind, tag)?
            .iter()
            .find(|doc| filter.matches(doc))
            .cloned())
    }

    fn find(
        &self,
        kind: CollectionKind,
        tag: &DatasetTag,
        filter: &Filter,
    ) -> Result<Vec<Document>, StoreError> {
        Ok(self
            .collection(kind, tag)?
            .iter()
            .filter(|doc| filter.matches(doc))
            .cloned()
            .collect())
    }

    fn aggregate(
        &self,
        kind: CollectionKind,
        tag: &DatasetTag,
        pipeline: &[Stage],
    ) -> Result<Vec<Document>, StoreError> {
        let mut docs = self.collection(kind, tag)?.to_vec();
        for stage in pipeline {
            docs = self.apply_stage(docs, stage, tag)?;
        }
        Ok(docs)
    }
}
