use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::warn;

/// Default directory containing content packs.
pub const CONTENT_PACKS_DIR: &str = "content_packs";

/// Content pack manifest file name.
pub const PACK_MANIFEST_FILE: &str = "pack.json";

/// Item definitions file inside a pack.
pub const PACK_ITEMS_FILE: &str = "items.json";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PackManifest {
    /// Human-friendly pack name (defaults to the directory name).
    pub name: Option<String>,
    /// If false, the pack is skipped and its items are not registered.
    pub enabled: bool,
    /// Load ordering (lower loads earlier, so gets lower item ids).
    pub priority: i32,
}

impl Default for PackManifest {
    fn default() -> Self {
        Self {
            name: None,
            enabled: true,
            priority: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ContentPack {
    pub id: String,
    pub dir: PathBuf,
    pub manifest: PackManifest,
}

impl ContentPack {
    /// Path of the pack's item definitions (may not exist).
    pub fn items_path(&self) -> PathBuf {
        self.dir.join(PACK_ITEMS_FILE)
    }
}

fn read_manifest(pack_dir: &Path, pack_id: &str) -> Result<PackManifest> {
    let manifest_path = pack_dir.join(PACK_MANIFEST_FILE);
    let mut manifest = if manifest_path.exists() {
        let contents = fs::read_to_string(&manifest_path)
            .with_context(|| format!("Failed to read {}", manifest_path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", manifest_path.display()))?
    } else {
        PackManifest::default()
    };

    if manifest.name.as_deref().unwrap_or("").is_empty() {
        manifest.name = Some(pack_id.to_string());
    }
    Ok(manifest)
}

fn pack_dirs(root: &Path) -> Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err).with_context(|| format!("Failed to read {}", root.display())),
    };

    let mut dirs = Vec::new();
    for entry in entries {
        let entry =
            entry.with_context(|| format!("Failed to read dir entry in {}", root.display()))?;
        let path = entry.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn pack_id(dir: &Path) -> String {
    dir.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| dir.display().to_string())
}

fn sort_packs(packs: &mut [ContentPack]) {
    packs.sort_by(|a, b| {
        a.manifest
            .priority
            .cmp(&b.manifest.priority)
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Enabled packs under `root` in load order, failing on any unreadable manifest.
#[cfg(test)]
pub fn discover_packs_strict(root: &Path) -> Result<Vec<ContentPack>> {
    let mut packs = Vec::new();
    for dir in pack_dirs(root)? {
        let id = pack_id(&dir);
        let manifest = read_manifest(&dir, &id)?;
        if manifest.enabled {
            packs.push(ContentPack { id, dir, manifest });
        }
    }
    sort_packs(&mut packs);
    Ok(packs)
}

/// Enabled packs under `root` in load order. Packs with broken manifests are
/// skipped with a warning.
pub fn discover_packs(root: &Path) -> Vec<ContentPack> {
    let dirs = match pack_dirs(root) {
        Ok(dirs) => dirs,
        Err(err) => {
            warn!("Failed to scan content packs dir {}: {err:#}", root.display());
            return Vec::new();
        }
    };

    let mut packs = Vec::with_capacity(dirs.len());
    for dir in dirs {
        let id = pack_id(&dir);
        match read_manifest(&dir, &id) {
            Ok(manifest) if manifest.enabled => packs.push(ContentPack { id, dir, manifest }),
            Ok(_) => {}
            Err(err) => warn!(
                "Skipping content pack {} due to invalid manifest: {err:#}",
                dir.display()
            ),
        }
    }
    sort_packs(&mut packs);
    packs
}
