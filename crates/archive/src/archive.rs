use tomevault_core::{ItemCatalog, ItemTypeDescriptor};
use tracing::info;

use crate::{
    AggregateStore, ArchiveRecord, BulkView, KeyCodec, LoadReport, PersistenceCodec, Revision,
    SlotView, StableNameMapper, StoreSnapshot, DEFAULT_TYPE_CAPACITY,
};

/// One archive instance: an owned store plus the shared registry views it
/// is interpreted through.
///
/// `catalog` and `names` must describe the same registry; build the mapper
/// from the catalog once the registry is final.
pub struct Archive<'r> {
    catalog: &'r dyn ItemCatalog,
    names: &'r StableNameMapper,
    store: AggregateStore,
}

impl<'r> Archive<'r> {
    /// Empty archive with the default per-type capacity.
    pub fn new(catalog: &'r dyn ItemCatalog, names: &'r StableNameMapper) -> Self {
        Self::with_capacity(catalog, names, DEFAULT_TYPE_CAPACITY)
    }

    /// Empty archive with an explicit per-type capacity.
    pub fn with_capacity(
        catalog: &'r dyn ItemCatalog,
        names: &'r StableNameMapper,
        capacity: u64,
    ) -> Self {
        Self {
            catalog,
            names,
            store: AggregateStore::new(capacity),
        }
    }

    /// Archive restored from a persisted record.
    ///
    /// Unmappable entries are dropped and logged; the report is also returned.
    pub fn load(
        catalog: &'r dyn ItemCatalog,
        names: &'r StableNameMapper,
        record: &ArchiveRecord,
        capacity: u64,
    ) -> (Self, LoadReport) {
        let (store, report) = PersistenceCodec::new(names).deserialize(record, capacity);
        report.log();
        info!(
            "Loaded archive: {} type(s), revision {}",
            store.distinct_type_count(),
            store.revision().0
        );
        (
            Self {
                catalog,
                names,
                store,
            },
            report,
        )
    }

    /// Replace the contents from a persisted record.
    pub fn reload(&mut self, record: &ArchiveRecord) -> LoadReport {
        let (store, report) =
            PersistenceCodec::new(self.names).deserialize(record, self.store.capacity());
        report.log();
        self.store = store;
        report
    }

    /// Persisted form of the current contents.
    pub fn save(&self) -> ArchiveRecord {
        PersistenceCodec::new(self.names).serialize(&self.store)
    }

    /// Slot contract view.
    pub fn slots(&mut self) -> SlotView<'_> {
        SlotView::new(&mut self.store, self.catalog)
    }

    /// Bulk contract view.
    pub fn bulk(&mut self) -> BulkView<'_> {
        BulkView::new(&mut self.store, self.catalog)
    }

    /// Underlying store, read-only.
    pub fn store(&self) -> &AggregateStore {
        &self.store
    }

    /// Stored count of one type.
    pub fn count(&self, descriptor: &ItemTypeDescriptor) -> u64 {
        KeyCodec::new(self.catalog)
            .encode(descriptor)
            .map(|key| self.store.get(key))
            .unwrap_or(0)
    }

    /// Current revision.
    pub fn revision(&self) -> Revision {
        self.store.revision()
    }

    /// Read and clear the changed flag (save scheduling).
    pub fn take_dirty(&mut self) -> bool {
        self.store.take_dirty()
    }

    /// Independent copy of the contents.
    pub fn snapshot(&self) -> StoreSnapshot {
        self.store.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tomevault_assets::{ItemFamily, ItemRegistry};
    use tomevault_core::{BulkContainer, ItemId, SlotContainer};

    const QUILL: ItemTypeDescriptor = ItemTypeDescriptor::plain(ItemId(0));
    const FROST: ItemTypeDescriptor = ItemTypeDescriptor::new(ItemId(1), 1);

    fn registry() -> ItemRegistry {
        ItemRegistry::new(vec![
            ItemFamily::simple("arcana:quill", 16, &[]).unwrap(),
            ItemFamily::simple("arcana:spell_book", 1, &["fireball", "frost"]).unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn both_views_share_one_store() {
        let reg = registry();
        let names = StableNameMapper::build(&reg);
        let mut archive = Archive::new(&reg, &names);

        archive.slots().insert(0, QUILL, 20, false);
        archive.bulk().insert(FROST, 3, false, None);
        assert_eq!(archive.count(&QUILL), 20);
        assert_eq!(archive.slots().peek(1), Some(FROST.stack(1)));
        assert_eq!(archive.bulk().extract(QUILL, 5, false, None), 5);
        assert_eq!(archive.revision(), Revision(3));
        assert!(archive.take_dirty());
        assert!(!archive.take_dirty());
    }

    #[test]
    fn save_and_reload_keep_contents_and_revision() {
        let reg = registry();
        let names = StableNameMapper::build(&reg);
        let mut archive = Archive::new(&reg, &names);
        archive.bulk().insert(QUILL, 70, false, None);
        archive.bulk().insert(FROST, 2, false, None);

        let record = archive.save();
        let (loaded, report) = Archive::load(&reg, &names, &record, DEFAULT_TYPE_CAPACITY);
        assert!(report.is_lossless());
        assert_eq!(loaded.store(), archive.store());
        assert_eq!(loaded.revision(), archive.revision());

        let mut other = Archive::new(&reg, &names);
        other.bulk().insert(QUILL, 1, false, None);
        other.reload(&record);
        assert_eq!(other.snapshot().entries, archive.snapshot().entries);
    }
}
