#![warn(missing_docs)]
//! Core primitives shared across the workspace.
//!
//! Nothing in here owns storage: these are the value types, the stable-name
//! key format, and the trait boundaries the archive crate is written against.

pub mod catalog;
pub mod item;
pub mod registry;
pub mod transfer;

// Re-export commonly used types
pub use catalog::ItemCatalog;
pub use item::{ItemId, ItemStack, ItemTypeDescriptor};
pub use registry::{StableName, StableNameError, DEFAULT_NAMESPACE};
pub use transfer::{BulkContainer, BulkEntry, ItemFilter, SlotContainer, UNBOUNDED_CAPACITY};
