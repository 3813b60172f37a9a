//! `RecordStore` — the in-memory roll of records.
//!
//! Records keep insertion order until an explicit [`RecordStore::sort`].
//! Roll numbers are unique across the store at all times; every mutation
//! goes through this type and either succeeds completely or leaves the
//! store as it was.
//!
//! The store also carries the persistence metadata the codec maintains:
//! a dirty flag set by every mutation, and the path of the last file the
//! store was saved to or loaded from.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::record::{normalize_name, Record};

/// Capacity of a freshly created store.
pub const INITIAL_CAPACITY: usize = 8;

// ==============================================================================
// Sort Orders
// ==============================================================================

/// The comparators a store can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    ScoreAscending,
    ScoreDescending,
    /// Byte-wise, case-sensitive.
    NameAscending,
}

impl SortOrder {
    pub fn compare(self, a: &Record, b: &Record) -> Ordering {
        match self {
            Self::ScoreAscending => a.score.cmp(&b.score),
            Self::ScoreDescending => Self::ScoreAscending.compare(a, b).reverse(),
            Self::NameAscending => a.name.as_bytes().cmp(b.name.as_bytes()),
        }
    }
}

// ==============================================================================
// Store
// ==============================================================================

#[derive(Debug)]
pub struct RecordStore {
    records: Vec<Record>,
    dirty: bool,
    last_path: Option<PathBuf>,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore {
    pub fn new() -> Self {
        Self {
            records: Vec::with_capacity(INITIAL_CAPACITY),
            dirty: false,
            last_path: None,
        }
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Append `record`, rejecting it if its roll number is already taken.
    pub fn insert(&mut self, record: Record) -> Result<(), StoreError> {
        if self.find_index_by_key(record.key).is_ok() {
            return Err(StoreError::DuplicateKey(record.key));
        }

        self.ensure_capacity()?;
        self.records.push(record);
        self.dirty = true;
        Ok(())
    }

    /// Remove the record at `index`, closing the gap, and hand it back.
    pub fn remove_at(&mut self, index: usize) -> Result<Record, StoreError> {
        self.check_index(index)?;
        let removed = self.records.remove(index);
        self.dirty = true;
        Ok(removed)
    }

    pub fn remove_by_key(&mut self, key: u32) -> Result<Record, StoreError> {
        let index = self.find_index_by_key(key)?;
        self.remove_at(index)
    }

    /// Replace every field of the record at `index`.
    ///
    /// The record keeps its own old key without conflicting with itself.
    /// The new name is prepared before anything is written, so any error
    /// leaves the record exactly as it was.
    pub fn update(
        &mut self,
        index: usize,
        new_key: u32,
        new_name: &str,
        new_score: u8,
    ) -> Result<(), StoreError> {
        self.check_index(index)?;

        if new_key != self.records[index].key {
            let taken = self
                .records
                .iter()
                .enumerate()
                .any(|(i, r)| i != index && r.key == new_key);
            if taken {
                return Err(StoreError::DuplicateKey(new_key));
            }
        }

        let name = normalize_name(new_name)?;
        let record = &mut self.records[index];
        record.key = new_key;
        record.name = name;
        record.score = new_score;
        self.dirty = true;
        Ok(())
    }

    /// Reorder the records. Fewer than two records is a no-op and leaves
    /// the dirty flag alone.
    pub fn sort(&mut self, order: SortOrder) {
        if self.records.len() < 2 {
            return;
        }
        self.records.sort_by(|a, b| order.compare(a, b));
        self.dirty = true;
    }

    /// Drop every record. Capacity, the dirty flag and the last-used path
    /// are kept.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    // ========================================================================
    // Query
    // ========================================================================

    pub fn find_index_by_key(&self, key: u32) -> Result<usize, StoreError> {
        self.records
            .iter()
            .position(|r| r.key == key)
            .ok_or(StoreError::NotFound(key))
    }

    pub fn find_by_key(&self, key: u32) -> Result<&Record, StoreError> {
        self.find_index_by_key(key).map(|idx| &self.records[idx])
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.records.capacity()
    }

    /// True when the records differ from the last successful save or load.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn last_path(&self) -> Option<&Path> {
        self.last_path.as_deref()
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    /// Called by the codec after a successful save or load.
    pub(crate) fn mark_persisted(&mut self, path: &Path) {
        self.last_path = Some(path.to_path_buf());
        self.dirty = false;
    }

    /// Double the capacity when the next push would overflow it.
    fn ensure_capacity(&mut self) -> Result<(), StoreError> {
        let capacity = self.records.capacity();
        if self.records.len() < capacity {
            return Ok(());
        }
        let additional = capacity.max(INITIAL_CAPACITY);
        self.records.try_reserve_exact(additional)?;
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<(), StoreError> {
        if index >= self.records.len() {
            return Err(StoreError::OutOfRange {
                index,
                len: self.records.len(),
            });
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a RecordStore {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{keys, record, store_with};

    #[test]
    fn new_store_is_empty_and_clean() {
        let store = RecordStore::new();
        assert!(store.is_empty());
        assert!(!store.is_dirty());
        assert!(store.last_path().is_none());
        assert!(store.capacity() >= INITIAL_CAPACITY);
    }

    #[test]
    fn insert_appends_and_marks_dirty() {
        let mut store = RecordStore::new();
        store.insert(record(1, "Alice", 85)).expect("insert");
        store.insert(record(2, "Bob", 30)).expect("insert");
        assert_eq!(keys(&store), vec![1, 2]);
        assert!(store.is_dirty());
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let mut store = RecordStore::new();
        store.insert(record(5, "First", 50)).expect("first insert");
        let result = store.insert(record(5, "Second", 60));
        assert!(matches!(result, Err(StoreError::DuplicateKey(5))));
        assert_eq!(store.len(), 1);
        assert_eq!(store.records()[0].name, "First");
    }

    #[test]
    fn rejected_mutations_leave_clean_store_unchanged() {
        let mut store = store_with(&[(1, "High", 90), (2, "Edge", 40), (3, "Low", 39)]);
        store.mark_persisted(Path::new("roll.txt"));
        let before = store.records().to_vec();

        assert!(matches!(
            store.insert(record(2, "Copy", 10)),
            Err(StoreError::DuplicateKey(2))
        ));
        assert!(matches!(
            store.update(2, 1, "Changed", 99),
            Err(StoreError::DuplicateKey(1))
        ));
        assert!(matches!(
            store.update(3, 4, "Nobody", 50),
            Err(StoreError::OutOfRange { index: 3, len: 3 })
        ));

        assert_eq!(store.records(), before.as_slice());
        assert!(!store.is_dirty());
        assert_eq!(store.last_path(), Some(Path::new("roll.txt")));
    }

    #[test]
    fn capacity_doubles_when_full() {
        let mut store = RecordStore::new();
        let start = store.capacity();
        for key in 1..=start as u32 {
            store.insert(record(key, "R", 50)).expect("insert");
        }
        assert_eq!(store.capacity(), start);

        store
            .insert(record(start as u32 + 1, "Overflow", 50))
            .expect("insert past capacity");
        assert!(store.capacity() >= start * 2);
        assert_eq!(store.len(), start + 1);
    }

    #[test]
    fn find_by_key_hits_and_misses() {
        let store = store_with(&[(10, "A", 1), (20, "B", 2), (30, "C", 3)]);
        assert_eq!(store.find_index_by_key(20).expect("present"), 1);
        assert_eq!(store.find_by_key(30).expect("present").name, "C");
        assert!(matches!(
            store.find_index_by_key(40),
            Err(StoreError::NotFound(40))
        ));
        assert!(matches!(store.find_by_key(40), Err(StoreError::NotFound(40))));
    }

    #[test]
    fn remove_at_closes_gap_in_order() {
        let mut store = store_with(&[(1, "A", 1), (2, "B", 2), (3, "C", 3), (4, "D", 4)]);
        let removed = store.remove_at(1).expect("remove");
        assert_eq!(removed.key, 2);
        assert_eq!(keys(&store), vec![1, 3, 4]);

        store.remove_at(2).expect("remove last");
        assert_eq!(keys(&store), vec![1, 3]);
        assert!(store.is_dirty());
    }

    #[test]
    fn remove_at_on_empty_store_is_out_of_range() {
        let mut store = RecordStore::new();
        assert!(matches!(
            store.remove_at(0),
            Err(StoreError::OutOfRange { index: 0, len: 0 })
        ));
        assert!(!store.is_dirty());
    }

    #[test]
    fn remove_by_key_missing_is_not_found() {
        let mut store = store_with(&[(1, "A", 1)]);
        assert!(matches!(
            store.remove_by_key(9),
            Err(StoreError::NotFound(9))
        ));
        assert_eq!(store.remove_by_key(1).expect("remove").name, "A");
        assert!(store.is_empty());
    }

    #[test]
    fn update_replaces_all_fields() {
        let mut store = store_with(&[(1, "A", 10), (2, "B", 20)]);
        store.update(1, 7, "Beatrice", 77).expect("update");
        assert_eq!(store.records()[1], record(7, "Beatrice", 77));
        assert!(store.is_dirty());
    }

    #[test]
    fn update_may_keep_own_key() {
        let mut store = store_with(&[(1, "A", 10), (2, "B", 20)]);
        store.update(0, 1, "Anna", 11).expect("same key is not a conflict");
        assert_eq!(store.records()[0], record(1, "Anna", 11));
    }

    #[test]
    fn update_to_taken_key_leaves_record_untouched() {
        let mut store = store_with(&[(1, "High", 90), (2, "Edge", 40), (3, "Low", 39)]);
        let before = store.records()[2].clone();

        let result = store.update(2, 1, "Changed", 99);
        assert!(matches!(result, Err(StoreError::DuplicateKey(1))));
        assert_eq!(store.records()[2], before);
        assert_eq!(keys(&store), vec![1, 2, 3]);
    }

    #[test]
    fn update_out_of_range() {
        let mut store = store_with(&[(1, "A", 10)]);
        assert!(matches!(
            store.update(1, 2, "B", 20),
            Err(StoreError::OutOfRange { index: 1, len: 1 })
        ));
    }

    #[test]
    fn update_normalizes_name() {
        let mut store = store_with(&[(1, "A", 10)]);
        store.update(0, 1, "", 10).expect("update");
        assert_eq!(store.records()[0].name, "Unnamed");
    }

    #[test]
    fn sort_by_score_and_name() {
        let mut store = store_with(&[(1, "carol", 70), (2, "Alice", 90), (3, "Bob", 50)]);

        store.sort(SortOrder::ScoreAscending);
        assert_eq!(keys(&store), vec![3, 1, 2]);

        store.sort(SortOrder::ScoreDescending);
        assert_eq!(keys(&store), vec![2, 1, 3]);

        // Uppercase sorts before lowercase byte-wise.
        store.sort(SortOrder::NameAscending);
        assert_eq!(keys(&store), vec![2, 3, 1]);
    }

    #[test]
    fn sort_is_idempotent() {
        let mut store = store_with(&[(1, "D", 40), (2, "B", 40), (3, "A", 10), (4, "C", 95)]);
        for order in [
            SortOrder::ScoreAscending,
            SortOrder::ScoreDescending,
            SortOrder::NameAscending,
        ] {
            store.sort(order);
            let once = store.records().to_vec();
            store.sort(order);
            assert_eq!(store.records(), once.as_slice());
        }
    }

    #[test]
    fn descending_is_reverse_of_ascending_for_distinct_scores() {
        let mut store = store_with(&[(1, "A", 55), (2, "B", 12), (3, "C", 99), (4, "D", 40)]);
        store.sort(SortOrder::ScoreAscending);
        let mut ascending = keys(&store);
        store.sort(SortOrder::ScoreDescending);
        ascending.reverse();
        assert_eq!(keys(&store), ascending);
    }

    #[test]
    fn descending_comparator_inverts_ties_too() {
        let a = record(1, "A", 50);
        let b = record(2, "B", 50);
        let c = record(3, "C", 60);
        for (x, y) in [(&a, &b), (&a, &c), (&c, &b)] {
            assert_eq!(
                SortOrder::ScoreDescending.compare(x, y),
                SortOrder::ScoreAscending.compare(x, y).reverse()
            );
        }
    }

    #[test]
    fn sorting_fewer_than_two_records_keeps_clean_flag() {
        let mut store = RecordStore::new();
        store.sort(SortOrder::NameAscending);
        assert!(!store.is_dirty());

        let mut store = store_with(&[(1, "A", 10)]);
        store.mark_persisted(Path::new("roll.txt"));
        store.sort(SortOrder::ScoreDescending);
        assert!(!store.is_dirty());
    }

    #[test]
    fn clear_drops_records_but_keeps_capacity() {
        let mut store = store_with(&[(1, "A", 1), (2, "B", 2), (3, "C", 3)]);
        let capacity = store.capacity();
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.capacity(), capacity);
    }

    #[test]
    fn mark_persisted_records_path_and_cleans() {
        let mut store = store_with(&[(1, "A", 1)]);
        assert!(store.is_dirty());
        store.mark_persisted(Path::new("data/roll.txt"));
        assert!(!store.is_dirty());
        assert_eq!(store.last_path(), Some(Path::new("data/roll.txt")));
    }

    #[test]
    fn keys_stay_unique_across_mixed_operations() {
        let mut store = RecordStore::new();
        for key in [3, 1, 4, 1, 5, 9, 2, 6, 5, 3] {
            let _ = store.insert(record(key, "N", 50));
        }
        let _ = store.update(0, 9, "N", 50);
        let _ = store.update(1, 8, "N", 50);
        let _ = store.remove_by_key(4);
        let _ = store.insert(record(4, "N", 50));

        let mut seen = keys(&store);
        let total = seen.len();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), total);
    }
}
