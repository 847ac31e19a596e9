//! Item classification boundary.

use crate::item::{ItemId, ItemTypeDescriptor};
use crate::registry::StableName;

/// Read-only view of the item registry the archive is written against.
///
/// The archive never classifies or sizes items itself; every answer about
/// an item type comes through this trait.
pub trait ItemCatalog {
    /// Whether the item family is registered in the current run.
    fn is_registered(&self, base: ItemId) -> bool;

    /// Whether the item type may be stored in an archive at all.
    fn is_storable(&self, descriptor: &ItemTypeDescriptor) -> bool;

    /// Per-stack limit used by slot-based consumers.
    fn max_stack_size(&self, descriptor: &ItemTypeDescriptor) -> u32;

    /// Stable name of the item type, if it has one.
    fn stable_name(&self, descriptor: &ItemTypeDescriptor) -> Option<StableName>;

    /// Item type currently registered under a stable name.
    fn resolve_stable_name(&self, name: &StableName) -> Option<ItemTypeDescriptor>;

    /// Every item type registered in the current run, in registry order.
    fn descriptors(&self) -> Vec<ItemTypeDescriptor>;
}
