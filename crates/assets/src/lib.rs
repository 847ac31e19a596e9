#![warn(missing_docs)]
//! Item pack schema + registry helpers.

mod loader;
mod registry;

pub use loader::{families_from_file, families_from_str, registry_from_str};
pub use registry::{ItemFamily, ItemRegistry};

use serde::Deserialize;
use thiserror::Error;
use tomevault_core::StableNameError;

/// Stack limit applied when a definition omits `max_stack`.
pub const DEFAULT_MAX_STACK: u32 = 64;

/// Item family definition as authored in `items.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemDefinition {
    /// Stable name of the family (e.g., "arcana:spell_book").
    pub key: String,
    /// Per-stack limit for slot-based consumers.
    #[serde(default = "default_max_stack")]
    pub max_stack: u32,
    /// Whether archives accept this item at all.
    #[serde(default = "default_storable")]
    pub storable: bool,
    /// Named payload variants. Empty means the family has a single, bare type.
    #[serde(default)]
    pub variants: Vec<String>,
}

fn default_max_stack() -> u32 {
    DEFAULT_MAX_STACK
}

fn default_storable() -> bool {
    true
}

/// Errors emitted during pack loading.
#[derive(Debug, Error)]
pub enum AssetError {
    /// Wrap IO errors when reading packs.
    #[error("failed to read item pack: {0}")]
    Io(#[from] std::io::Error),
    /// Wrap serde parsing issues.
    #[error("failed to parse item pack: {0}")]
    Parse(#[from] serde_json::Error),
    /// A key or variant did not form a valid stable name.
    #[error("invalid item name {name:?}: {source}")]
    InvalidName {
        /// Offending input.
        name: String,
        /// Validation failure.
        source: StableNameError,
    },
    /// A family declared a zero stack limit.
    #[error("item {0} declares max_stack = 0")]
    ZeroStack(String),
    /// More families than the numeric id space can address.
    #[error("item registry overflow: {0} families (max 65536)")]
    TooManyItems(usize),
}

/// Parse a JSON string into a list of item definitions.
pub fn load_items_from_str(input: &str) -> Result<Vec<ItemDefinition>, AssetError> {
    Ok(serde_json::from_str(input)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definitions_fill_defaults() {
        let defs = load_items_from_str(r#"[{ "key": "arcana:quill" }]"#).unwrap();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].max_stack, DEFAULT_MAX_STACK);
        assert!(defs[0].storable);
        assert!(defs[0].variants.is_empty());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = load_items_from_str("[{").unwrap_err();
        assert!(matches!(err, AssetError::Parse(_)));
    }
}
