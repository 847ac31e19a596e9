//! Slot-addressed view over an [`AggregateStore`].
//!
//! Slot `i < N` shows the `i`-th stored type, where `N` is the number of
//! distinct types. Slot `N` is always empty and accepts any storable type,
//! which is how brand-new types get in through slot-scanning movers.
//!
//! Inserts that hit the per-type cap are reported as fully accepted: the
//! overflow is voided, not returned. Only type mismatches and ineligible
//! items produce a remainder. [`BulkView`](crate::BulkView) reports overflow
//! instead; movers depend on the difference.

use tomevault_core::{ItemCatalog, ItemStack, ItemTypeDescriptor, SlotContainer, UNBOUNDED_CAPACITY};

use crate::{AggregateStore, CompositeKey, KeyCodec};

/// Slot contract adapter borrowing an archive's store.
pub struct SlotView<'a> {
    store: &'a mut AggregateStore,
    catalog: &'a dyn ItemCatalog,
}

impl<'a> SlotView<'a> {
    /// Wrap a store.
    pub fn new(store: &'a mut AggregateStore, catalog: &'a dyn ItemCatalog) -> Self {
        Self { store, catalog }
    }

    fn codec(&self) -> KeyCodec<'a> {
        KeyCodec::new(self.catalog)
    }

    /// Index of the always-empty insertion slot.
    pub fn insertion_slot(&self) -> usize {
        self.store.distinct_type_count()
    }

    /// Key bound to `slot` plus its descriptor and stored count.
    fn occupant(&self, slot: usize) -> Option<(CompositeKey, ItemTypeDescriptor, u64)> {
        let (key, count) = self.store.entry_at(slot)?;
        let descriptor = self.codec().decode(key)?;
        Some((key, descriptor, count))
    }

    fn stack_limit(&self, descriptor: &ItemTypeDescriptor) -> u64 {
        u64::from(self.catalog.max_stack_size(descriptor))
    }
}

impl SlotContainer for SlotView<'_> {
    fn slot_count(&self) -> usize {
        self.store.distinct_type_count() + 1
    }

    fn peek(&self, slot: usize) -> Option<ItemStack> {
        let (_, descriptor, count) = self.occupant(slot)?;
        descriptor
            .stack(count.min(self.stack_limit(&descriptor)))
            .non_empty()
    }

    fn insert(
        &mut self,
        slot: usize,
        descriptor: ItemTypeDescriptor,
        amount: u64,
        simulate: bool,
    ) -> u64 {
        if amount == 0 {
            return 0;
        }
        if !self.is_eligible(slot, &descriptor) {
            return amount;
        }
        let Ok(key) = self.codec().encode(&descriptor) else {
            return amount;
        };
        if !simulate {
            // Overflow past the cap is voided on purpose.
            self.store.insert(key, amount);
        }
        0
    }

    fn extract(&mut self, slot: usize, amount: u64, simulate: bool) -> Option<ItemStack> {
        let (key, descriptor, count) = self.occupant(slot)?;
        let take = amount.min(count).min(self.stack_limit(&descriptor));
        if take == 0 {
            return None;
        }
        if !simulate {
            self.store.remove(key, take);
        }
        Some(descriptor.stack(take))
    }

    fn capacity(&self, slot: usize) -> u64 {
        if slot < self.slot_count() {
            UNBOUNDED_CAPACITY
        } else {
            0
        }
    }

    fn is_eligible(&self, slot: usize, descriptor: &ItemTypeDescriptor) -> bool {
        let insertion_slot = self.insertion_slot();
        if slot > insertion_slot || !self.catalog.is_storable(descriptor) {
            return false;
        }
        if slot == insertion_slot {
            return true;
        }
        let Ok(key) = self.codec().encode(descriptor) else {
            return false;
        };
        self.store
            .entry_at(slot)
            .is_some_and(|(occupant, _)| occupant == key)
    }
}
