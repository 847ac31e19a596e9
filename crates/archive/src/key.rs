//! Composite store keys.

use std::fmt;

use tomevault_core::{ItemCatalog, ItemId, ItemStack, ItemTypeDescriptor};

use crate::ArchiveError;

/// Map key of the aggregate store: one value per `(base, variant)` pair.
///
/// The layout is `base << 32 | variant`. Keys are only valid for the run that
/// produced them and are never written to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompositeKey(u64);

impl CompositeKey {
    pub(crate) fn pack(descriptor: &ItemTypeDescriptor) -> Self {
        Self((u64::from(descriptor.base.0) << 32) | u64::from(descriptor.variant))
    }

    pub(crate) fn unpack(self) -> ItemTypeDescriptor {
        ItemTypeDescriptor::new(ItemId((self.0 >> 32) as u16), self.0 as u32)
    }

    /// Canonical byte encoding (big-endian).
    pub fn to_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04x}:{:08x}", self.0 >> 32, self.0 as u32)
    }
}

/// Converts between item descriptors and [`CompositeKey`]s.
#[derive(Clone, Copy)]
pub struct KeyCodec<'c> {
    catalog: &'c dyn ItemCatalog,
}

impl<'c> KeyCodec<'c> {
    /// Codec backed by the given catalog.
    pub fn new(catalog: &'c dyn ItemCatalog) -> Self {
        Self { catalog }
    }

    /// Encode a descriptor. Fails only for unregistered item families.
    pub fn encode(&self, descriptor: &ItemTypeDescriptor) -> Result<CompositeKey, ArchiveError> {
        if !self.catalog.is_registered(descriptor.base) {
            return Err(ArchiveError::UnknownItem(*descriptor));
        }
        Ok(CompositeKey::pack(descriptor))
    }

    /// Decode a key back to its descriptor.
    ///
    /// Returns `None` when the family is no longer registered. Callers hide
    /// such entries from display but keep them in storage.
    pub fn decode(&self, key: CompositeKey) -> Option<ItemTypeDescriptor> {
        let descriptor = key.unpack();
        self.catalog
            .is_registered(descriptor.base)
            .then_some(descriptor)
    }

    /// Unit-count stack for a key.
    pub fn prototype(&self, key: CompositeKey) -> Option<ItemStack> {
        self.decode(key).map(ItemStack::prototype)
    }
}

impl fmt::Debug for KeyCodec<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyCodec").finish_non_exhaustive()
    }
}
