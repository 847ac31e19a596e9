//! Stable-name persistence for aggregate stores.
//!
//! Saved data never contains run-local keys. Each entry is written as its
//! stable name plus a count and mapped back to whatever key that name has in
//! the loading run.
//!
//! Loading is lossy by design: entries whose name no longer resolves (the
//! content pack that registered them is gone) or that are malformed are
//! dropped and tallied in a [`LoadReport`]. A load never fails outright.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tomevault_core::StableName;
use tracing::{debug, warn};

use crate::{AggregateStore, Revision, StableNameMapper};

/// One persisted entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEntry {
    /// Stable name of the item type.
    pub name: String,
    /// Stored quantity. Signed so damaged data can be detected on load.
    pub count: i64,
}

/// Persisted form of one archive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveRecord {
    /// Entries in store order.
    pub entries: Vec<StoredEntry>,
    /// Revision at save time.
    pub revision: u32,
}

/// Entries dropped from one origin group during a load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LostGroup {
    /// Number of dropped entries.
    pub entries: usize,
    /// Sum of their counts.
    pub items: u64,
}

/// Outcome of loading an [`ArchiveRecord`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Entries restored into the store.
    pub restored: usize,
    /// Entries whose stable name did not resolve, keyed by namespace.
    pub unresolved: BTreeMap<String, LostGroup>,
    /// Entries dropped as malformed (negative count, unparseable name).
    pub corrupt: usize,
}

impl LoadReport {
    /// True when every non-empty entry was restored.
    pub fn is_lossless(&self) -> bool {
        self.unresolved.is_empty() && self.corrupt == 0
    }

    /// Total number of dropped entries.
    pub fn dropped(&self) -> usize {
        self.corrupt + self.unresolved.values().map(|g| g.entries).sum::<usize>()
    }

    fn record_unresolved(&mut self, group: &str, count: u64) {
        let lost = self.unresolved.entry(group.to_string()).or_default();
        lost.entries += 1;
        lost.items = lost.items.saturating_add(count);
    }

    /// One line per origin group in namespace order, then malformed records.
    pub fn summary(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .unresolved
            .iter()
            .map(|(group, lost)| {
                format!(
                    "Dropped {} archived item type(s) ({} items) from '{}': no longer registered",
                    lost.entries, lost.items, group
                )
            })
            .collect();
        if self.corrupt > 0 {
            lines.push(format!(
                "Dropped {} malformed archive record(s)",
                self.corrupt
            ));
        }
        lines
    }

    /// Emit one warning per [`summary`](Self::summary) line.
    pub fn log(&self) {
        for line in self.summary() {
            warn!("{line}");
        }
    }
}

/// Converts stores to and from [`ArchiveRecord`]s.
#[derive(Debug, Clone, Copy)]
pub struct PersistenceCodec<'m> {
    mapper: &'m StableNameMapper,
}

impl<'m> PersistenceCodec<'m> {
    /// Codec backed by the given name table.
    pub fn new(mapper: &'m StableNameMapper) -> Self {
        Self { mapper }
    }

    /// Write every entry that has a stable name.
    ///
    /// Entries without one are left out; they stay in memory but will not
    /// survive this save.
    pub fn serialize(&self, store: &AggregateStore) -> ArchiveRecord {
        let mut entries = Vec::with_capacity(store.distinct_type_count());
        for (key, count) in store.iter() {
            let Some(name) = self.mapper.name_of(key) else {
                debug!("Skipping archive entry {key} ({count} items): no stable name");
                continue;
            };
            entries.push(StoredEntry {
                name: name.to_string(),
                count: i64::try_from(count).unwrap_or(i64::MAX),
            });
        }
        ArchiveRecord {
            entries,
            revision: store.revision().0,
        }
    }

    /// Rebuild a store, dropping entries that cannot be mapped.
    ///
    /// The revision is carried over unchanged. The report is returned for
    /// the caller to log or inspect.
    pub fn deserialize(
        &self,
        record: &ArchiveRecord,
        capacity: u64,
    ) -> (AggregateStore, LoadReport) {
        let mut report = LoadReport::default();
        let mut restored = Vec::with_capacity(record.entries.len());

        for entry in &record.entries {
            let name = match StableName::parse(&entry.name) {
                Ok(name) => name,
                Err(err) => {
                    debug!("Malformed archive entry name {:?}: {err}", entry.name);
                    report.corrupt += 1;
                    continue;
                }
            };
            let count = match u64::try_from(entry.count) {
                Ok(0) => continue,
                Ok(count) => count,
                Err(_) => {
                    debug!("Negative archive count {} for {name}", entry.count);
                    report.corrupt += 1;
                    continue;
                }
            };
            match self.mapper.key_of(&name) {
                Some(key) => restored.push((key, count)),
                None => report.record_unresolved(name.namespace(), count),
            }
        }

        report.restored = restored.len();
        let store = AggregateStore::restore(capacity, Revision(record.revision), restored);
        (store, report)
    }
}
