//! Counted aggregate storage.
//!
//! One entry per item type, keyed by [`CompositeKey`], holding a positive
//! count. Entries keep their insertion order so slot indices handed out by
//! [`SlotView`](crate::SlotView) stay put until the key set changes.

use indexmap::IndexMap;

use crate::{ChangeNotifier, CompositeKey, Revision};

/// Largest per-type capacity. Counts must fit the signed persisted format.
pub const MAX_TYPE_CAPACITY: u64 = i64::MAX as u64;

/// Per-type capacity used when the host does not configure one.
pub const DEFAULT_TYPE_CAPACITY: u64 = MAX_TYPE_CAPACITY;

/// Keyed counter with saturating per-type capacity.
#[derive(Debug, Clone)]
pub struct AggregateStore {
    /// Invariant: every value is > 0.
    entries: IndexMap<CompositeKey, u64>,
    capacity: u64,
    notifier: ChangeNotifier,
}

impl Default for AggregateStore {
    fn default() -> Self {
        Self::new(DEFAULT_TYPE_CAPACITY)
    }
}

impl PartialEq for AggregateStore {
    /// Stores are equal when they hold the same counts for the same keys.
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for AggregateStore {}

impl AggregateStore {
    /// Create an empty store. `capacity` is clamped to `1..=MAX_TYPE_CAPACITY`.
    pub fn new(capacity: u64) -> Self {
        Self {
            entries: IndexMap::new(),
            capacity: capacity.clamp(1, MAX_TYPE_CAPACITY),
            notifier: ChangeNotifier::new(),
        }
    }

    /// Rebuild a store from loaded entries without bumping the revision.
    ///
    /// Duplicate keys are merged by saturating addition and zero counts are
    /// skipped.
    pub(crate) fn restore(
        capacity: u64,
        revision: Revision,
        entries: impl IntoIterator<Item = (CompositeKey, u64)>,
    ) -> Self {
        let mut store = Self::new(capacity);
        for (key, count) in entries {
            if count == 0 {
                continue;
            }
            let slot = store.entries.entry(key).or_insert(0);
            *slot = slot.saturating_add(count).min(store.capacity);
        }
        store.notifier = ChangeNotifier::resume(revision);
        store
    }

    /// Per-type capacity.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Stored count for `key`, 0 if absent.
    pub fn get(&self, key: CompositeKey) -> u64 {
        self.entries.get(&key).copied().unwrap_or(0)
    }

    /// Whether `key` has a stored entry.
    pub fn contains(&self, key: CompositeKey) -> bool {
        self.entries.contains_key(&key)
    }

    /// Room left for `key` before it saturates.
    pub fn remaining(&self, key: CompositeKey) -> u64 {
        self.capacity.saturating_sub(self.get(key))
    }

    /// Add `amount` of `key`, returning how much was accepted.
    ///
    /// Anything beyond the capacity is discarded. The caller decides whether
    /// to report that as a remainder.
    pub fn insert(&mut self, key: CompositeKey, amount: u64) -> u64 {
        if amount == 0 {
            return 0;
        }
        let current = self.get(key);
        let target = current.saturating_add(amount).min(self.capacity);
        if target == current {
            return 0;
        }
        self.entries.insert(key, target);
        self.notifier.bump();
        target - current
    }

    /// Take up to `amount` of `key`, returning how much was removed.
    pub fn remove(&mut self, key: CompositeKey, amount: u64) -> u64 {
        let current = self.get(key);
        let removed = amount.min(current);
        if removed == 0 {
            return 0;
        }
        if current == removed {
            self.entries.shift_remove(&key);
        } else {
            self.entries.insert(key, current - removed);
        }
        self.notifier.bump();
        removed
    }

    /// Number of distinct stored types.
    pub fn distinct_type_count(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at an iteration position.
    pub fn entry_at(&self, index: usize) -> Option<(CompositeKey, u64)> {
        self.entries
            .get_index(index)
            .map(|(key, count)| (*key, *count))
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (CompositeKey, u64)> + '_ {
        self.entries.iter().map(|(key, count)| (*key, *count))
    }

    /// Sum of all counts, saturating.
    pub fn total_items(&self) -> u64 {
        self.entries
            .values()
            .fold(0u64, |acc, count| acc.saturating_add(*count))
    }

    /// Independent copy of the current contents.
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            revision: self.revision(),
            entries: self.iter().collect(),
        }
    }

    /// Current revision.
    pub fn revision(&self) -> Revision {
        self.notifier.current()
    }

    /// Change notifier for this store.
    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    /// Read and clear the changed flag.
    pub fn take_dirty(&mut self) -> bool {
        self.notifier.take_dirty()
    }
}

/// Read-only copy of an [`AggregateStore`] taken at one revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSnapshot {
    /// Revision the copy was taken at.
    pub revision: Revision,
    /// Entries in store order.
    pub entries: Vec<(CompositeKey, u64)>,
}

impl StoreSnapshot {
    /// Count for `key`, 0 if absent.
    pub fn get(&self, key: CompositeKey) -> u64 {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    /// Whether the snapshot holds `key`.
    pub fn contains(&self, key: CompositeKey) -> bool {
        self.entries.iter().any(|(k, _)| *k == key)
    }

    /// Number of distinct types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tomevault_core::{ItemId, ItemTypeDescriptor};

    fn key(base: u16, variant: u32) -> CompositeKey {
        CompositeKey::pack(&ItemTypeDescriptor::new(ItemId(base), variant))
    }

    #[test]
    fn insert_remove_walkthrough() {
        let mut store = AggregateStore::default();
        let k = key(1, 0);

        assert_eq!(store.insert(k, 3), 3);
        assert_eq!(store.get(k), 3);
        assert_eq!(store.revision(), Revision(1));

        assert_eq!(store.remove(k, 2), 2);
        assert_eq!(store.get(k), 1);
        assert_eq!(store.revision(), Revision(2));

        assert_eq!(store.remove(k, 1), 1);
        assert_eq!(store.get(k), 0);
        assert!(!store.snapshot().contains(k));
        assert_eq!(store.revision(), Revision(3));
    }

    #[test]
    fn insert_saturates_at_capacity() {
        let mut store = AggregateStore::new(10);
        let k = key(1, 0);

        assert_eq!(store.insert(k, 15), 10);
        assert_eq!(store.get(k), 10);
        assert_eq!(store.revision(), Revision(1));

        assert_eq!(store.insert(k, 1), 0);
        assert_eq!(store.get(k), 10);
        assert_eq!(store.revision(), Revision(1));
    }

    #[test]
    fn no_op_calls_do_not_bump() {
        let mut store = AggregateStore::default();
        let k = key(2, 4);
        assert_eq!(store.insert(k, 0), 0);
        assert_eq!(store.remove(k, 5), 0);
        assert_eq!(store.revision(), Revision::ZERO);
        assert!(!store.take_dirty());
    }

    #[test]
    fn remove_clamps_to_stored_count() {
        let mut store = AggregateStore::default();
        let k = key(1, 0);
        store.insert(k, 4);
        assert_eq!(store.remove(k, 100), 4);
        assert!(store.is_empty());
    }

    #[test]
    fn insertion_order_survives_removal() {
        let mut store = AggregateStore::default();
        let (a, b, c) = (key(3, 0), key(1, 0), key(2, 0));
        store.insert(a, 1);
        store.insert(b, 1);
        store.insert(c, 1);

        store.remove(b, 1);
        assert_eq!(store.entry_at(0), Some((a, 1)));
        assert_eq!(store.entry_at(1), Some((c, 1)));
        assert_eq!(store.entry_at(2), None);

        // Re-added keys go to the back.
        store.insert(b, 2);
        assert_eq!(store.entry_at(2), Some((b, 2)));
    }

    #[test]
    fn snapshot_is_independent() {
        let mut store = AggregateStore::default();
        let k = key(1, 0);
        store.insert(k, 5);
        let before = store.snapshot();
        store.insert(k, 5);
        assert_eq!(before.get(k), 5);
        assert_eq!(before.revision, Revision(1));
        assert_eq!(store.snapshot().get(k), 10);
    }

    #[test]
    fn restore_merges_duplicates_and_skips_zero() {
        let (a, b) = (key(1, 0), key(2, 0));
        let store = AggregateStore::restore(10, Revision(7), vec![(a, 6), (b, 0), (a, 6)]);
        assert_eq!(store.get(a), 10);
        assert!(!store.contains(b));
        assert_eq!(store.revision(), Revision(7));
        assert!(!store.notifier().is_dirty());
    }

    #[test]
    fn capacity_is_clamped() {
        assert_eq!(AggregateStore::new(0).capacity(), 1);
        assert_eq!(AggregateStore::new(u64::MAX).capacity(), MAX_TYPE_CAPACITY);
    }

    #[test]
    fn total_items_sums_counts() {
        let mut store = AggregateStore::default();
        store.insert(key(1, 0), 3);
        store.insert(key(1, 1), 4);
        assert_eq!(store.total_items(), 7);
        assert_eq!(store.distinct_type_count(), 2);
    }
}
