//! Shared test utilities for loading the join fixture dataset.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;

use join_benchmarks::store::{document, CollectionKind, DatasetTag, DocId, Document, Value};
use join_benchmarks::MemoryStore;

// =============================================================================
// Dataset root path
// =============================================================================

pub fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

// =============================================================================
// Join fixture
// =============================================================================

#[derive(Deserialize)]
pub struct JoinDataset {
    pub users: Vec<UserFixture>,
    pub items: Vec<ItemFixture>,
    pub orders: Vec<OrderFixture>,
    pub dangling_orders: Vec<OrderFixture>,
    pub expected: Expected,
}

#[derive(Deserialize)]
pub struct UserFixture {
    pub key: String,
    pub name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Deserialize)]
pub struct ItemFixture {
    pub key: String,
    pub name: String,
    pub stock: i64,
    pub price: i64,
}

#[derive(Deserialize)]
pub struct OrderFixture {
    pub user: String,
    /// Item key, or "missing" for a deliberately dangling reference.
    pub item: String,
    pub quantity: i64,
}

#[derive(Deserialize)]
pub struct Expected {
    pub anchor: String,
    pub valid_for_anchor: usize,
    pub dangling_for_anchor: usize,
}

pub fn load_join_dataset() -> JoinDataset {
    let path = data_dir().join("join_cases.json");
    let content = std::fs::read_to_string(&path).expect("failed to read join_cases.json");
    serde_json::from_str(&content).expect("failed to parse join_cases.json")
}

// =============================================================================
// Store seeding from the fixture
// =============================================================================

pub struct Fixture {
    pub store: MemoryStore,
    pub tag: DatasetTag,
    pub anchor: DocId,
    pub users: HashMap<String, DocId>,
    pub items: HashMap<String, DocId>,
}

pub fn fresh_store() -> MemoryStore {
    MemoryStore::connect().expect("failed to open memory store")
}

/// Seed a fresh store from the fixture. `include_dangling` controls whether
/// the dangling orders are inserted.
pub fn seed_fixture(ds: &JoinDataset, include_dangling: bool) -> Fixture {
    let mut store = fresh_store();
    let tag = DatasetTag::new("fixture");

    let user_docs: Vec<Document> = ds
        .users
        .iter()
        .map(|u| {
            document([
                ("name", Value::String(u.name.clone())),
                ("last_name", Value::String(u.last_name.clone())),
                ("email", Value::String(u.email.clone())),
            ])
        })
        .collect();
    let user_ids = store.insert_many(CollectionKind::Users, &tag, user_docs);
    let users: HashMap<String, DocId> = ds
        .users
        .iter()
        .map(|u| u.key.clone())
        .zip(user_ids)
        .collect();

    let item_docs: Vec<Document> = ds
        .items
        .iter()
        .map(|i| {
            document([
                ("name", Value::String(i.name.clone())),
                ("stock", Value::Int(i.stock)),
                ("price", Value::Int(i.price)),
            ])
        })
        .collect();
    let item_ids = store.insert_many(CollectionKind::Items, &tag, item_docs);
    let items: HashMap<String, DocId> = ds
        .items
        .iter()
        .map(|i| i.key.clone())
        .zip(item_ids)
        .collect();

    let mut order_fixtures: Vec<&OrderFixture> = ds.orders.iter().collect();
    if include_dangling {
        order_fixtures.extend(ds.dangling_orders.iter());
    }
    let order_docs: Vec<Document> = order_fixtures
        .iter()
        .map(|o| {
            let item_id = match items.get(&o.item) {
                Some(id) => *id,
                None => store.reserve_missing_id(),
            };
            document([
                ("user", Value::Id(users[&o.user])),
                ("item", Value::Id(item_id)),
                ("quantity", Value::Int(o.quantity)),
            ])
        })
        .collect();
    store.insert_many(CollectionKind::Orders, &tag, order_docs);

    let anchor = users[&ds.expected.anchor];
    Fixture {
        store,
        tag,
        anchor,
        users,
        items,
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// The id behind an order's `user`/`item` field, whether still a raw
/// reference or an embedded document.
pub fn embedded_id(doc: &Document, field: &str) -> Option<DocId> {
    match doc.get(field)? {
        Value::Id(id) => Some(*id),
        Value::Object(inner) => join_benchmarks::store::doc_id(inner),
        _ => None,
    }
}
