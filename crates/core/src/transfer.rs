//! Transfer contracts consumed by external item movers.
//!
//! Two shapes are supported. [`SlotContainer`] is the slot-scanning contract
//! used by generic transfer agents (pipes, hoppers): fixed slot indices, one
//! stack per slot, per-stack limits. [`BulkContainer`] is the slotless
//! contract used by systems that move whole-type quantities and filter by
//! predicate.
//!
//! Implementations are not synchronised. All calls must be made from the
//! thread that owns the container.

use crate::item::{ItemStack, ItemTypeDescriptor};

/// Capacity reported for slots that have no practical limit.
pub const UNBOUNDED_CAPACITY: u64 = u64::MAX;

/// Optional type filter for bulk transfers.
pub type ItemFilter<'f> = &'f dyn Fn(&ItemTypeDescriptor) -> bool;

/// Slot-addressed container.
pub trait SlotContainer {
    /// Number of addressable slots.
    fn slot_count(&self) -> usize;

    /// Stack shown in a slot, or `None` if the slot is empty or out of range.
    fn peek(&self, slot: usize) -> Option<ItemStack>;

    /// Insert `amount` of `descriptor` into `slot`.
    ///
    /// Returns the amount that was not accepted. With `simulate` set nothing
    /// is mutated.
    fn insert(
        &mut self,
        slot: usize,
        descriptor: ItemTypeDescriptor,
        amount: u64,
        simulate: bool,
    ) -> u64;

    /// Extract up to `amount` from `slot`, returning what was removed.
    fn extract(&mut self, slot: usize, amount: u64, simulate: bool) -> Option<ItemStack>;

    /// Maximum quantity the slot can hold.
    fn capacity(&self, slot: usize) -> u64;

    /// Whether `insert` would accept `descriptor` into `slot`.
    fn is_eligible(&self, slot: usize, descriptor: &ItemTypeDescriptor) -> bool;
}

/// One type held by a [`BulkContainer`].
///
/// `prototype` always carries a count of one; the real quantity is `count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkEntry {
    /// Unit-count stack of the stored type.
    pub prototype: ItemStack,
    /// Total stored quantity.
    pub count: u64,
}

/// Slotless container addressed by item type.
pub trait BulkContainer {
    /// One entry per stored type. The result is an independent copy.
    fn list_all(&self) -> Vec<BulkEntry>;

    /// Insert `amount` of `descriptor`, returning the amount not accepted.
    fn insert(
        &mut self,
        descriptor: ItemTypeDescriptor,
        amount: u64,
        simulate: bool,
        filter: Option<ItemFilter<'_>>,
    ) -> u64;

    /// Extract up to `amount` of `descriptor`, returning the amount removed.
    fn extract(
        &mut self,
        descriptor: ItemTypeDescriptor,
        amount: u64,
        simulate: bool,
        filter: Option<ItemFilter<'_>>,
    ) -> u64;
}
