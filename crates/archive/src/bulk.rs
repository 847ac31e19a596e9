//! Slotless view over an [`AggregateStore`].

use tomevault_core::{BulkContainer, BulkEntry, ItemCatalog, ItemFilter, ItemTypeDescriptor};

use crate::{AggregateStore, CompositeKey, KeyCodec};

/// Bulk contract adapter borrowing an archive's store.
///
/// Unlike [`SlotView`](crate::SlotView), inserts past the per-type cap return
/// the true remainder so the mover can send it elsewhere, and extraction is
/// not limited by stack size.
pub struct BulkView<'a> {
    store: &'a mut AggregateStore,
    catalog: &'a dyn ItemCatalog,
}

impl<'a> BulkView<'a> {
    /// Wrap a store.
    pub fn new(store: &'a mut AggregateStore, catalog: &'a dyn ItemCatalog) -> Self {
        Self { store, catalog }
    }

    fn key_for(
        &self,
        descriptor: &ItemTypeDescriptor,
        filter: Option<ItemFilter<'_>>,
    ) -> Option<CompositeKey> {
        if filter.is_some_and(|accepts| !accepts(descriptor)) {
            return None;
        }
        KeyCodec::new(self.catalog).encode(descriptor).ok()
    }

    /// Stored count of one type.
    pub fn count(&self, descriptor: &ItemTypeDescriptor) -> u64 {
        self.key_for(descriptor, None)
            .map(|key| self.store.get(key))
            .unwrap_or(0)
    }
}

impl BulkContainer for BulkView<'_> {
    fn list_all(&self) -> Vec<BulkEntry> {
        let codec = KeyCodec::new(self.catalog);
        self.store
            .iter()
            .filter_map(|(key, count)| {
                codec
                    .prototype(key)
                    .map(|prototype| BulkEntry { prototype, count })
            })
            .collect()
    }

    fn insert(
        &mut self,
        descriptor: ItemTypeDescriptor,
        amount: u64,
        simulate: bool,
        filter: Option<ItemFilter<'_>>,
    ) -> u64 {
        if amount == 0 {
            return 0;
        }
        if !self.catalog.is_storable(&descriptor) {
            return amount;
        }
        let Some(key) = self.key_for(&descriptor, filter) else {
            return amount;
        };
        let accepted = amount.min(self.store.remaining(key));
        if !simulate && accepted > 0 {
            self.store.insert(key, accepted);
        }
        amount - accepted
    }

    fn extract(
        &mut self,
        descriptor: ItemTypeDescriptor,
        amount: u64,
        simulate: bool,
        filter: Option<ItemFilter<'_>>,
    ) -> u64 {
        let Some(key) = self.key_for(&descriptor, filter) else {
            return 0;
        };
        if simulate {
            return amount.min(self.store.get(key));
        }
        self.store.remove(key, amount)
    }
}
