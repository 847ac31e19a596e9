use std::fs;
use std::path::Path;

use crate::AssetError;
use crate::{ItemFamily, ItemRegistry};

/// Load item families from the provided JSON file path.
pub fn families_from_file(path: &Path) -> Result<Vec<ItemFamily>, AssetError> {
    let data = fs::read_to_string(path)?;
    families_from_str(&data)
}

/// Load item families from an in-memory JSON string.
pub fn families_from_str(input: &str) -> Result<Vec<ItemFamily>, AssetError> {
    crate::load_items_from_str(input)?
        .into_iter()
        .map(ItemFamily::try_from_definition)
        .collect()
}

/// Load an item registry from an in-memory JSON string.
pub fn registry_from_str(input: &str) -> Result<ItemRegistry, AssetError> {
    ItemRegistry::new(families_from_str(input)?)
}
