//! Item identity - descriptors and the stack prototypes handed across the transfer contracts

use serde::{Deserialize, Serialize};
use std::fmt;

/// Runtime item family identifier.
///
/// Assigned by the item registry in load order, so it is only meaningful
/// within one process run. Never persist it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(pub u16);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One storable item type: an item family plus the payload variant it carries
/// (e.g. a spell book and the spell bound into it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemTypeDescriptor {
    /// Item family.
    pub base: ItemId,
    /// Payload variant within the family (0 for families without variants).
    pub variant: u32,
}

impl ItemTypeDescriptor {
    /// Create a descriptor.
    pub const fn new(base: ItemId, variant: u32) -> Self {
        Self { base, variant }
    }

    /// Descriptor for a family without variants.
    pub const fn plain(base: ItemId) -> Self {
        Self { base, variant: 0 }
    }

    /// Build a stack of this type.
    pub fn stack(self, count: u64) -> ItemStack {
        ItemStack::new(self, count)
    }
}

impl fmt::Display for ItemTypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.variant)
    }
}

/// A quantity of one item type.
///
/// Empty stacks are not represented: APIs return `Option<ItemStack>` and use
/// `None` for "nothing".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Type of item
    pub descriptor: ItemTypeDescriptor,
    /// Quantity in stack
    pub count: u64,
}

impl ItemStack {
    /// Create a new item stack
    pub fn new(descriptor: ItemTypeDescriptor, count: u64) -> Self {
        Self { descriptor, count }
    }

    /// Unit-count prototype of the given type.
    pub fn prototype(descriptor: ItemTypeDescriptor) -> Self {
        Self::new(descriptor, 1)
    }

    /// Returns `None` for a zero count so callers can propagate "nothing".
    pub fn non_empty(self) -> Option<Self> {
        (self.count > 0).then_some(self)
    }
}
