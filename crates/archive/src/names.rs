use std::collections::HashMap;

use tomevault_core::{ItemCatalog, StableName};
use tracing::{debug, warn};

use crate::{CompositeKey, KeyCodec};

/// Two-way table between run-local [`CompositeKey`]s and [`StableName`]s.
///
/// Built once from the item catalog after the registry is complete, then
/// shared by reference with every archive and codec. Rebuild it if the
/// registry changes.
#[derive(Debug, Clone, Default)]
pub struct StableNameMapper {
    names: HashMap<CompositeKey, StableName>,
    keys: HashMap<StableName, CompositeKey>,
}

impl StableNameMapper {
    /// Enumerate the catalog and index every named item type.
    pub fn build(catalog: &dyn ItemCatalog) -> Self {
        let codec = KeyCodec::new(catalog);
        let mut mapper = Self::default();

        for descriptor in catalog.descriptors() {
            let Some(name) = catalog.stable_name(&descriptor) else {
                continue;
            };
            let Ok(key) = codec.encode(&descriptor) else {
                continue;
            };
            // The catalog decides which type owns a shared name.
            if catalog.resolve_stable_name(&name) != Some(descriptor) {
                warn!("Stable name {name} is shadowed for item {descriptor}");
                continue;
            }
            mapper.names.insert(key, name.clone());
            mapper.keys.insert(name, key);
        }

        debug!("Built stable name table with {} entries", mapper.len());
        mapper
    }

    /// Stable name for a key.
    pub fn name_of(&self, key: CompositeKey) -> Option<&StableName> {
        self.names.get(&key)
    }

    /// Current key for a stable name.
    pub fn key_of(&self, name: &StableName) -> Option<CompositeKey> {
        self.keys.get(name).copied()
    }

    /// Number of mapped types.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true when nothing is mapped.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tomevault_assets::{ItemFamily, ItemRegistry};
    use tomevault_core::{ItemId, ItemTypeDescriptor};

    #[test]
    fn maps_both_directions() {
        let reg = ItemRegistry::new(vec![
            ItemFamily::simple("arcana:quill", 16, &[]).unwrap(),
            ItemFamily::simple("arcana:spell_book", 1, &["fireball", "frost"]).unwrap(),
        ])
        .unwrap();
        let mapper = StableNameMapper::build(&reg);
        assert_eq!(mapper.len(), 3);

        let frost = StableName::parse("arcana:spell_book/frost").unwrap();
        let key = mapper.key_of(&frost).unwrap();
        assert_eq!(
            KeyCodec::new(&reg).decode(key),
            Some(ItemTypeDescriptor::new(ItemId(1), 1))
        );
        assert_eq!(mapper.name_of(key), Some(&frost));
    }

    #[test]
    fn load_order_changes_keys_not_names() {
        let quill = || ItemFamily::simple("arcana:quill", 16, &[]).unwrap();
        let book = || ItemFamily::simple("arcana:spell_book", 1, &["fireball"]).unwrap();
        let first = StableNameMapper::build(&ItemRegistry::new(vec![quill(), book()]).unwrap());
        let second = StableNameMapper::build(&ItemRegistry::new(vec![book(), quill()]).unwrap());

        let name = StableName::parse("arcana:quill").unwrap();
        assert_ne!(first.key_of(&name), second.key_of(&name));
        assert!(second.key_of(&name).is_some());
    }

    #[test]
    fn shadowed_names_map_to_the_first_owner() {
        let reg = ItemRegistry::new(vec![
            ItemFamily::simple("arcana:book", 1, &["a"]).unwrap(),
            ItemFamily::simple("arcana:book/a", 1, &[]).unwrap(),
        ])
        .unwrap();
        let mapper = StableNameMapper::build(&reg);
        assert_eq!(mapper.len(), 1);
        let shadowed = CompositeKey::pack(&ItemTypeDescriptor::plain(ItemId(1)));
        assert_eq!(mapper.name_of(shadowed), None);
    }
}
