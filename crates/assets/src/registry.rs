use std::collections::HashMap;

use tomevault_core::{ItemCatalog, ItemId, ItemTypeDescriptor, StableName};

use crate::{AssetError, ItemDefinition};

/// Item family metadata loaded from packs.
#[derive(Debug, Clone)]
pub struct ItemFamily {
    /// Stable name of the family.
    pub key: StableName,
    /// Per-stack limit for slot-based consumers.
    pub max_stack: u32,
    /// Whether archives accept this item.
    pub storable: bool,
    /// Stable name of each variant, indexed by sub-variant number.
    variant_names: Vec<StableName>,
}

impl ItemFamily {
    /// Construct a family from the JSON definition.
    pub fn try_from_definition(def: ItemDefinition) -> Result<Self, AssetError> {
        let key = StableName::parse(&def.key).map_err(|source| AssetError::InvalidName {
            name: def.key.clone(),
            source,
        })?;
        if def.max_stack == 0 {
            return Err(AssetError::ZeroStack(def.key));
        }

        let variant_names = if def.variants.is_empty() {
            vec![key.clone()]
        } else {
            def.variants
                .iter()
                .map(|variant| {
                    key.variant(variant).map_err(|source| AssetError::InvalidName {
                        name: format!("{}/{}", def.key, variant),
                        source,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(Self {
            key,
            max_stack: def.max_stack,
            storable: def.storable,
            variant_names,
        })
    }

    /// Helper for tests that need a storable family.
    pub fn simple(key: &str, max_stack: u32, variants: &[&str]) -> Result<Self, AssetError> {
        Self::try_from_definition(ItemDefinition {
            key: key.to_string(),
            max_stack,
            storable: true,
            variants: variants.iter().map(|v| v.to_string()).collect(),
        })
    }

    /// Number of sub-variants (at least one).
    pub fn variant_count(&self) -> u32 {
        self.variant_names.len() as u32
    }

    /// Stable name of one sub-variant.
    pub fn variant_name(&self, variant: u32) -> Option<&StableName> {
        self.variant_names.get(variant as usize)
    }
}

/// Registry storing item families keyed by transient numeric id.
///
/// Ids follow load order, so the same pack set loaded in a different order
/// produces different ids but identical stable names.
#[derive(Debug, Clone)]
pub struct ItemRegistry {
    families: Vec<ItemFamily>,
    by_name: HashMap<StableName, ItemTypeDescriptor>,
}

impl ItemRegistry {
    /// Construct a registry from the supplied families.
    ///
    /// When two types share a stable name the first registration wins.
    pub fn new(families: Vec<ItemFamily>) -> Result<Self, AssetError> {
        if families.len() > usize::from(u16::MAX) + 1 {
            return Err(AssetError::TooManyItems(families.len()));
        }

        let mut by_name = HashMap::new();
        for (id, family) in families.iter().enumerate() {
            let base = ItemId(id as u16);
            for (variant, name) in family.variant_names.iter().enumerate() {
                by_name
                    .entry(name.clone())
                    .or_insert(ItemTypeDescriptor::new(base, variant as u32));
            }
        }

        Ok(Self { families, by_name })
    }

    /// Number of registered families.
    pub fn len(&self) -> usize {
        self.families.len()
    }

    /// Returns true when no families are registered.
    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    /// Look up a family by numeric id.
    pub fn family(&self, id: ItemId) -> Option<&ItemFamily> {
        self.families.get(id.0 as usize)
    }

    /// Resolve an item type by its stable name string.
    pub fn descriptor_by_name(&self, name: &str) -> Option<ItemTypeDescriptor> {
        let name = StableName::parse(name).ok()?;
        self.by_name.get(&name).copied()
    }

    fn family_of(&self, descriptor: &ItemTypeDescriptor) -> Option<&ItemFamily> {
        self.family(descriptor.base)
            .filter(|family| descriptor.variant < family.variant_count())
    }
}

impl ItemCatalog for ItemRegistry {
    fn is_registered(&self, base: ItemId) -> bool {
        self.family(base).is_some()
    }

    fn is_storable(&self, descriptor: &ItemTypeDescriptor) -> bool {
        self.family_of(descriptor)
            .map(|family| family.storable)
            .unwrap_or(false)
    }

    fn max_stack_size(&self, descriptor: &ItemTypeDescriptor) -> u32 {
        self.family_of(descriptor)
            .map(|family| family.max_stack)
            .unwrap_or(0)
    }

    fn stable_name(&self, descriptor: &ItemTypeDescriptor) -> Option<StableName> {
        self.family_of(descriptor)
            .and_then(|family| family.variant_name(descriptor.variant))
            .cloned()
    }

    fn resolve_stable_name(&self, name: &StableName) -> Option<ItemTypeDescriptor> {
        self.by_name.get(name).copied()
    }

    fn descriptors(&self) -> Vec<ItemTypeDescriptor> {
        self.families
            .iter()
            .enumerate()
            .flat_map(|(id, family)| {
                (0..family.variant_count())
                    .map(move |variant| ItemTypeDescriptor::new(ItemId(id as u16), variant))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ItemRegistry {
        ItemRegistry::new(vec![
            ItemFamily::simple("tomevault:quill", 16, &[]).unwrap(),
            ItemFamily::simple("arcana:spell_book", 1, &["fireball", "frost"]).unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn ids_follow_load_order() {
        let reg = registry();
        let quill = reg.descriptor_by_name("quill").unwrap();
        assert_eq!(quill, ItemTypeDescriptor::new(ItemId(0), 0));
        let frost = reg.descriptor_by_name("arcana:spell_book/frost").unwrap();
        assert_eq!(frost, ItemTypeDescriptor::new(ItemId(1), 1));
        assert!(reg.descriptor_by_name("arcana:spell_book").is_none());
    }

    #[test]
    fn catalog_answers_per_variant() {
        let reg = registry();
        let fire = ItemTypeDescriptor::new(ItemId(1), 0);
        assert_eq!(reg.max_stack_size(&fire), 1);
        assert!(reg.is_storable(&fire));
        assert_eq!(
            reg.stable_name(&fire).map(|n| n.to_string()),
            Some("arcana:spell_book/fireball".to_string())
        );

        let out_of_range = ItemTypeDescriptor::new(ItemId(1), 9);
        assert!(!reg.is_storable(&out_of_range));
        assert!(reg.stable_name(&out_of_range).is_none());
        assert!(reg.is_registered(ItemId(1)));
        assert!(!reg.is_registered(ItemId(2)));
        assert_eq!(reg.descriptors().len(), 3);
    }

    #[test]
    fn non_storable_families_are_reported() {
        let reg = ItemRegistry::new(vec![ItemFamily::try_from_definition(ItemDefinition {
            key: "arcana:cursed_tome".into(),
            max_stack: 1,
            storable: false,
            variants: Vec::new(),
        })
        .unwrap()])
        .unwrap();
        assert!(!reg.is_storable(&ItemTypeDescriptor::plain(ItemId(0))));
    }

    #[test]
    fn rejects_invalid_definitions() {
        assert!(matches!(
            ItemFamily::simple("Arcana:Book", 1, &[]),
            Err(AssetError::InvalidName { .. })
        ));
        assert!(matches!(
            ItemFamily::simple("arcana:book", 0, &[]),
            Err(AssetError::ZeroStack(_))
        ));
        assert!(matches!(
            ItemFamily::simple("arcana:book", 1, &["Bad"]),
            Err(AssetError::InvalidName { .. })
        ));
    }

    #[test]
    fn first_registration_of_a_name_wins() {
        let reg = ItemRegistry::new(vec![
            ItemFamily::simple("arcana:book", 1, &["a"]).unwrap(),
            ItemFamily::simple("arcana:book/a", 1, &[]).unwrap(),
        ])
        .unwrap();
        assert_eq!(
            reg.descriptor_by_name("arcana:book/a"),
            Some(ItemTypeDescriptor::new(ItemId(0), 0))
        );
    }
}
