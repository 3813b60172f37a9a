//! Shared test helpers for `rollbook-core` unit tests.

use crate::record::Record;
use crate::store::RecordStore;

pub fn record(key: u32, name: &str, score: u8) -> Record {
    Record::new(key, name, score).expect("test record")
}

/// Build a store by inserting `rows` in order. The result is dirty.
pub fn store_with(rows: &[(u32, &str, u8)]) -> RecordStore {
    let mut store = RecordStore::new();
    for &(key, name, score) in rows {
        store.insert(record(key, name, score)).expect("test insert");
    }
    store
}

pub fn keys(store: &RecordStore) -> Vec<u32> {
    store.iter().map(|r| r.key).collect()
}
