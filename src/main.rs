//! tomevault - headless archive inspector
//!
//! Loads the item registry and the archive document named by the config,
//! reports anything that could not be restored and lists the contents. When
//! entries were dropped the document is written back without them.

mod config;
mod content_packs;
mod host;

use anyhow::Result;
use config::HostConfig;
use host::ArchiveHost;
use std::{env, path::PathBuf};
use tomevault_archive::StableNameMapper;
use tomevault_core::{BulkContainer, ItemCatalog};
use tracing::info;

fn main() -> Result<()> {
    // Initialize tracing with WARN level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    info!("Starting tomevault v{}", env!("CARGO_PKG_VERSION"));

    let config_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(config::DEFAULT_CONFIG_PATH));
    let config = HostConfig::load_from_path(&config_path);

    let registry = config::load_item_registry(&config)?;
    let names = StableNameMapper::build(&registry);
    info!(
        "Registered {} item families ({} named types)",
        registry.len(),
        names.len()
    );

    let host = ArchiveHost::new(&config);
    let (mut archive, report) = host.load(&registry, &names)?;

    println!(
        "{} (revision {}, {} types, {} items)",
        config.save_path.display(),
        archive.revision().0,
        archive.store().distinct_type_count(),
        archive.store().total_items()
    );
    for entry in archive.bulk().list_all() {
        let name = registry
            .stable_name(&entry.prototype.descriptor)
            .map(|name| name.to_string())
            .unwrap_or_else(|| entry.prototype.descriptor.to_string());
        println!("  {:>12}  {}", entry.count, name);
    }
    if !report.is_lossless() {
        println!(
            "  dropped {} entr{} that no longer map (see log)",
            report.dropped(),
            if report.dropped() == 1 { "y" } else { "ies" }
        );
    }

    // Rewriting drops unmappable entries from disk for good.
    if report.is_lossless() {
        host.save_if_dirty(&mut archive)?;
    } else {
        host.save(&mut archive)?;
    }
    Ok(())
}
