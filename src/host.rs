//! Host-side ownership of one archive document.

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};
use tomevault_archive::{Archive, ArchiveDocument, ArchiveFile, LoadReport, StableNameMapper};
use tomevault_core::ItemCatalog;
use tracing::{info, warn};

use crate::config::HostConfig;

/// Loads and saves the archive document named by the host config.
pub struct ArchiveHost {
    file: ArchiveFile,
    label: String,
    capacity: u64,
}

impl ArchiveHost {
    pub fn new(config: &HostConfig) -> Self {
        Self {
            file: ArchiveFile::new(&config.save_path),
            label: config.label.clone(),
            capacity: config.type_capacity,
        }
    }

    /// Load the archive, or start empty when no document exists yet.
    ///
    /// An unreadable document is moved aside and counted as one corrupt
    /// record; the archive then starts empty.
    pub fn load<'r>(
        &self,
        catalog: &'r dyn ItemCatalog,
        names: &'r StableNameMapper,
    ) -> Result<(Archive<'r>, LoadReport)> {
        let document = match self.file.load() {
            Ok(document) => document,
            Err(err) => {
                warn!("{err:#}");
                let moved = self.quarantine()?;
                warn!(
                    "Moved unreadable archive to {}; starting empty",
                    moved.display()
                );
                let report = LoadReport {
                    corrupt: 1,
                    ..LoadReport::default()
                };
                return Ok((Archive::with_capacity(catalog, names, self.capacity), report));
            }
        };

        match document {
            Some(document) => Ok(Archive::load(
                catalog,
                names,
                &document.archive,
                self.capacity,
            )),
            None => {
                info!(
                    "Starting empty archive '{}' at {}",
                    self.label,
                    self.file.path().display()
                );
                Ok((
                    Archive::with_capacity(catalog, names, self.capacity),
                    LoadReport::default(),
                ))
            }
        }
    }

    fn quarantine(&self) -> Result<PathBuf> {
        let path = self.file.path();
        let mut bad = path.as_os_str().to_owned();
        bad.push(".bad");
        let bad = PathBuf::from(bad);
        fs::rename(path, &bad)
            .with_context(|| format!("Failed to move aside {}", path.display()))?;
        Ok(bad)
    }

    /// Write the archive unconditionally.
    pub fn save(&self, archive: &mut Archive<'_>) -> Result<()> {
        self.file
            .save(&ArchiveDocument::new(self.label.clone(), archive.save()))?;
        archive.take_dirty();
        Ok(())
    }

    /// Write the archive only if it changed since the last save.
    pub fn save_if_dirty(&self, archive: &mut Archive<'_>) -> Result<bool> {
        if !archive.take_dirty() {
            return Ok(false);
        }
        self.file
            .save(&ArchiveDocument::new(self.label.clone(), archive.save()))?;
        Ok(true)
    }
}
