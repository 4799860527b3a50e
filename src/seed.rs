//! Synthetic dataset seeding.
//!
//! For a dataset tag sized `n`, creates `n` users, `n` items, and `n` orders,
//! each order referencing one existing user and one existing item. Optional
//! dangling orders reference the first user and an id that belongs to no
//! item, for studying the unwind-vs-first-element asymmetry.

use crate::memory::MemoryStore;
use crate::store::{document, CollectionKind, DatasetTag, DocId, Value};

/// What to seed for one dataset tag.
#[derive(Debug, Clone)]
pub struct SeedSpec {
    pub tag: DatasetTag,
    pub users: usize,
    pub items: usize,
    pub orders: usize,
    /// Extra orders attached to the first user whose item reference dangles.
    pub dangling_orders: usize,
}

impl SeedSpec {
    /// Equal-sized collections, tagged by their size.
    pub fn sized(size: usize) -> Self {
        Self {
            tag: DatasetTag::new(size.to_string()),
            users: size,
            items: size,
            orders: size,
            dangling_orders: 0,
        }
    }
}

/// Populate the store for one dataset tag. Returns the anchor (first) user id.
///
/// Deterministic for a given `SeedSpec` and RNG seed.
pub fn seed_dataset(store: &mut MemoryStore, spec: &SeedSpec, rng: &mut FastRng) -> Option<DocId> {
    let users: Vec<_> = (0..spec.users)
        .map(|_| {
            document([
                ("name", Value::String(format!("u_{}", random_string(rng, 10)))),
                ("last_name", Value::String(random_string(rng, 10))),
                (
                    "email",
                    Value::String(format!("{}@mail.com", random_string(rng, 10))),
                ),
            ])
        })
        .collect();
    let user_ids = store.insert_many(CollectionKind::Users, &spec.tag, users);

    let items: Vec<_> = (0..spec.items)
        .map(|_| {
            document([
                ("name", Value::String(format!("i_{}", random_string(rng, 10)))),
                ("stock", Value::Int(rng.next_range(1, 100))),
                ("price", Value::Int(rng.next_range(10, 1000))),
            ])
        })
        .collect();
    let item_ids = store.insert_many(CollectionKind::Items, &spec.tag, items);

    let mut orders = Vec::with_capacity(spec.orders + spec.dangling_orders);
    if !user_ids.is_empty() && !item_ids.is_empty() {
        for _ in 0..spec.orders {
            let user = user_ids[rng.next_usize(user_ids.len())];
            let item = item_ids[rng.next_usize(item_ids.len())];
            orders.push(document([
                ("user", Value::Id(user)),
                ("item", Value::Id(item)),
                ("quantity", Value::Int(rng.next_range(1, 100))),
            ]));
        }
    }
    if let Some(&anchor) = user_ids.first() {
        for _ in 0..spec.dangling_orders {
            let missing = store.reserve_missing_id();
            orders.push(document([
                ("user", Value::Id(anchor)),
                ("item", Value::Id(missing)),
                ("quantity", Value::Int(rng.next_range(1, 100))),
            ]));
        }
    }
    store.insert_many(CollectionKind::Orders, &spec.tag, orders);

    user_ids.first().copied()
}

// ---------------------------------------------------------------------------
// Fast LCG random number generator (no external crate needed)
// ---------------------------------------------------------------------------

pub struct FastRng {
    state: u64,
}

impl FastRng {
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed ^ 0x5DEECE66D,
        }
    }

    /// Returns a pseudo-random u64.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state
    }

    /// Returns a value in [0, n).
    #[inline]
    pub fn next_usize(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    /// Returns a value in [min, max].
    #[inline]
    pub fn next_range(&mut self, min: i64, max: i64) -> i64 {
        min + (self.next_u64() % (max - min + 1) as u64) as i64
    }
}

const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

fn random_string(rng: &mut FastRng, len: usize) -> String {
    (0..len)
        .map(|_| CHARSET[rng.next_usize(CHARSET.len())] as char)
        .collect()
}
