use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
};
use tomevault_archive::{DEFAULT_TYPE_CAPACITY, MAX_TYPE_CAPACITY};
use tomevault_assets::{families_from_file, families_from_str, ItemFamily, ItemRegistry};
use tomevault_core::StableName;
use tracing::{info, warn};

use crate::content_packs;

pub const DEFAULT_CONFIG_PATH: &str = "config/tomevault.toml";
const DEFAULT_ITEMS_PATH: &str = "config/items.json";
const DEFAULT_SAVE_PATH: &str = "saves/archive.tva";

/// Items registered when the base definitions file is missing or broken.
const BUILTIN_ITEMS: &str = r#"
[
  { "key": "tomevault:quill", "max_stack": 64 },
  { "key": "tomevault:spell_book", "max_stack": 1, "variants": ["blank"] }
]
"#;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HostConfig {
    /// Per-type archive capacity; quantity beyond it is voided or returned.
    pub type_capacity: u64,
    /// Base item definitions.
    pub items_path: PathBuf,
    /// Directory scanned for content packs.
    pub content_packs_dir: PathBuf,
    /// Archive document location.
    pub save_path: PathBuf,
    /// Label written into the archive document.
    pub label: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            type_capacity: DEFAULT_TYPE_CAPACITY,
            items_path: PathBuf::from(DEFAULT_ITEMS_PATH),
            content_packs_dir: PathBuf::from(content_packs::CONTENT_PACKS_DIR),
            save_path: PathBuf::from(DEFAULT_SAVE_PATH),
            label: "archive".to_string(),
        }
    }
}

impl HostConfig {
    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        let mut config = match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<HostConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    HostConfig::default()
                }
            },
            Err(err) => {
                if err.kind() == std::io::ErrorKind::NotFound {
                    info!("No config at {}. Using defaults", path.display());
                } else {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                }
                HostConfig::default()
            }
        };

        if config.type_capacity == 0 || config.type_capacity > MAX_TYPE_CAPACITY {
            warn!(
                "type_capacity {} out of range 1..={}. Clamping",
                config.type_capacity, MAX_TYPE_CAPACITY
            );
            config.type_capacity = config.type_capacity.clamp(1, MAX_TYPE_CAPACITY);
        }
        config
    }

    /// Save configuration to an explicit path.
    #[cfg(test)]
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }
}

/// Build the item registry from the base definitions plus enabled content packs.
///
/// Broken pack files are skipped with a warning. Families keep the order in
/// which they were loaded, which fixes their numeric ids for this run.
pub fn load_item_registry(config: &HostConfig) -> Result<ItemRegistry> {
    let mut families = match load_families_from_file(&config.items_path) {
        Ok(families) => families,
        Err(err) => {
            warn!(
                "Failed to load items {}: {err:#}. Using built-in items",
                config.items_path.display()
            );
            families_from_str(BUILTIN_ITEMS).context("Built-in items are invalid")?
        }
    };

    let mut used_keys: BTreeSet<StableName> = BTreeSet::new();
    families.retain(|family| {
        let fresh = used_keys.insert(family.key.clone());
        if !fresh {
            warn!(
                "Duplicate item key {} while loading {}",
                family.key,
                config.items_path.display()
            );
        }
        fresh
    });

    for pack in content_packs::discover_packs(&config.content_packs_dir) {
        let items_path = pack.items_path();
        if !items_path.exists() {
            continue;
        }

        match load_families_from_file(&items_path) {
            Ok(pack_families) => {
                info!(
                    "Loading {} item families from pack {}",
                    pack_families.len(),
                    pack.manifest.name.as_deref().unwrap_or(&pack.id)
                );
                for family in pack_families {
                    if !used_keys.insert(family.key.clone()) {
                        warn!(
                            "Ignoring duplicate item key {} from {}",
                            family.key,
                            items_path.display()
                        );
                        continue;
                    }
                    families.push(family);
                }
            }
            Err(err) => {
                warn!(
                    "Failed to load content pack items {}: {err:#}",
                    items_path.display()
                );
            }
        }
    }

    Ok(ItemRegistry::new(families)?)
}

fn load_families_from_file(path: &Path) -> Result<Vec<ItemFamily>> {
    families_from_file(path).with_context(|| format!("Failed to load {}", path.display()))
}
