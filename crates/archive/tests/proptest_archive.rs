//! Property-based tests for archive storage
//!
//! Validates archive invariants:
//! - Save/load round-trips reproduce the same store
//! - Saturated inserts never bump the revision
//! - Revision moves by exactly one per effective mutation
//! - Slot inserts void overflow while bulk inserts report it

use proptest::prelude::*;
use tomevault_archive::{Archive, Revision, StableNameMapper};
use tomevault_assets::{ItemFamily, ItemRegistry};
use tomevault_core::{BulkContainer, ItemId, ItemTypeDescriptor, SlotContainer};

fn registry() -> ItemRegistry {
    ItemRegistry::new(vec![
        ItemFamily::simple("arcana:quill", 16, &[]).unwrap(),
        ItemFamily::simple("arcana:ink", 64, &[]).unwrap(),
        ItemFamily::simple(
            "arcana:spell_book",
            1,
            &["fireball", "frost", "blink", "ward"],
        )
        .unwrap(),
    ])
    .unwrap()
}

fn descriptor() -> impl Strategy<Value = ItemTypeDescriptor> {
    prop_oneof![
        Just(ItemTypeDescriptor::plain(ItemId(0))),
        Just(ItemTypeDescriptor::plain(ItemId(1))),
        (0u32..4).prop_map(|v| ItemTypeDescriptor::new(ItemId(2), v)),
    ]
}

#[derive(Debug, Clone)]
enum Op {
    SlotInsert(usize, ItemTypeDescriptor, u64, bool),
    SlotExtract(usize, u64, bool),
    BulkInsert(ItemTypeDescriptor, u64, bool),
    BulkExtract(ItemTypeDescriptor, u64, bool),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..8, descriptor(), 0u64..200, any::<bool>())
            .prop_map(|(s, d, n, sim)| Op::SlotInsert(s, d, n, sim)),
        (0usize..8, 0u64..100, any::<bool>()).prop_map(|(s, n, sim)| Op::SlotExtract(s, n, sim)),
        (descriptor(), 0u64..200, any::<bool>()).prop_map(|(d, n, sim)| Op::BulkInsert(d, n, sim)),
        (descriptor(), 0u64..200, any::<bool>())
            .prop_map(|(d, n, sim)| Op::BulkExtract(d, n, sim)),
    ]
}

fn apply(archive: &mut Archive<'_>, op: &Op) {
    match *op {
        Op::SlotInsert(slot, d, n, sim) => {
            archive.slots().insert(slot, d, n, sim);
        }
        Op::SlotExtract(slot, n, sim) => {
            archive.slots().extract(slot, n, sim);
        }
        Op::BulkInsert(d, n, sim) => {
            archive.bulk().insert(d, n, sim, None);
        }
        Op::BulkExtract(d, n, sim) => {
            archive.bulk().extract(d, n, sim, None);
        }
    }
}

proptest! {
    /// Property: Save then load reproduces the same keys, counts and revision
    #[test]
    fn save_load_roundtrip(ops in prop::collection::vec(op(), 0..40)) {
        let reg = registry();
        let names = StableNameMapper::build(&reg);
        let mut archive = Archive::with_capacity(&reg, &names, 500);
        for op in &ops {
            apply(&mut archive, op);
        }

        let record = archive.save();
        let (loaded, report) = Archive::load(&reg, &names, &record, 500);

        prop_assert!(report.is_lossless());
        prop_assert_eq!(loaded.store(), archive.store());
        prop_assert_eq!(loaded.revision(), archive.revision());
        prop_assert_eq!(loaded.snapshot().entries, archive.snapshot().entries);
    }

    /// Property: Revision rises by exactly one per call that changed a count
    #[test]
    fn revision_tracks_effective_mutations(ops in prop::collection::vec(op(), 0..60)) {
        let reg = registry();
        let names = StableNameMapper::build(&reg);
        let mut archive = Archive::with_capacity(&reg, &names, 300);

        for op in &ops {
            let before = archive.snapshot();
            apply(&mut archive, op);
            let after = archive.snapshot();

            let expected = if before.entries == after.entries {
                before.revision
            } else {
                before.revision.next()
            };
            prop_assert_eq!(after.revision, expected);
            prop_assert!(after.revision >= before.revision);
            prop_assert!(after.entries.iter().all(|(_, count)| *count > 0));
        }
    }

    /// Property: Simulated calls never change contents or revision
    #[test]
    fn simulation_is_side_effect_free(
        seed in prop::collection::vec(op(), 0..20),
        d in descriptor(),
        n in 1u64..500,
        slot in 0usize..6,
    ) {
        let reg = registry();
        let names = StableNameMapper::build(&reg);
        let mut archive = Archive::with_capacity(&reg, &names, 250);
        for op in &seed {
            apply(&mut archive, op);
        }
        let before = archive.snapshot();

        archive.slots().insert(slot, d, n, true);
        archive.slots().extract(slot, n, true);
        archive.bulk().insert(d, n, true, None);
        archive.bulk().extract(d, n, true, None);

        prop_assert_eq!(archive.snapshot(), before);
    }

    /// Property: Inserting into a saturated type leaves count and revision alone
    #[test]
    fn saturated_inserts_are_idempotent(
        d in descriptor(),
        first in 1u64..1000,
        again in prop::collection::vec(1u64..1000, 1..10),
    ) {
        let reg = registry();
        let names = StableNameMapper::build(&reg);
        let mut archive = Archive::with_capacity(&reg, &names, 50);

        archive.bulk().insert(d, 50, false, None);
        archive.slots().insert(0, d, first, false);
        let saturated = archive.revision();
        prop_assert_eq!(saturated, Revision(1));

        for amount in again {
            prop_assert_eq!(archive.slots().insert(0, d, amount, false), 0);
            prop_assert_eq!(archive.bulk().insert(d, amount, false, None), amount);
            prop_assert_eq!(archive.count(&d), 50);
            prop_assert_eq!(archive.revision(), saturated);
        }
    }

    /// Property: Slot inserts void overflow, bulk inserts report it
    #[test]
    fn overflow_asymmetry(
        d in descriptor(),
        headroom in 0u64..20,
        extra in 1u64..20,
    ) {
        let reg = registry();
        let names = StableNameMapper::build(&reg);
        let cap = 100;
        let amount = headroom + extra;

        let mut slot_side = Archive::with_capacity(&reg, &names, cap);
        slot_side.bulk().insert(d, cap - headroom, false, None);
        prop_assert_eq!(slot_side.slots().insert(0, d, amount, false), 0);
        prop_assert_eq!(slot_side.count(&d), cap);

        let mut bulk_side = Archive::with_capacity(&reg, &names, cap);
        bulk_side.bulk().insert(d, cap - headroom, false, None);
        prop_assert_eq!(bulk_side.bulk().insert(d, amount, false, None), extra);
        prop_assert_eq!(bulk_side.count(&d), cap);
    }

    /// Property: Slot extraction never exceeds the stack size, bulk extraction may
    #[test]
    fn extraction_limits(d in descriptor(), stored in 1u64..300, ask in 1u64..300) {
        let reg = registry();
        let names = StableNameMapper::build(&reg);
        let limit = match d.base {
            ItemId(0) => 16,
            ItemId(1) => 64,
            _ => 1,
        };

        let mut archive = Archive::new(&reg, &names);
        archive.bulk().insert(d, stored, false, None);
        let taken = archive.slots().extract(0, ask, true).map(|s| s.count).unwrap_or(0);
        prop_assert_eq!(taken, ask.min(stored).min(limit));

        let bulk_taken = archive.bulk().extract(d, ask, true, None);
        prop_assert_eq!(bulk_taken, ask.min(stored));
    }
}

#[test]
fn voiding_asymmetry_example() {
    let reg = registry();
    let names = StableNameMapper::build(&reg);
    let ink = ItemTypeDescriptor::plain(ItemId(1));
    let cap = 1_000;

    let mut slot_side = Archive::with_capacity(&reg, &names, cap);
    slot_side.bulk().insert(ink, cap - 5, false, None);
    assert_eq!(slot_side.slots().insert(0, ink, 10, false), 0);

    let mut bulk_side = Archive::with_capacity(&reg, &names, cap);
    bulk_side.bulk().insert(ink, cap - 5, false, None);
    assert_eq!(bulk_side.bulk().insert(ink, 10, false, None), 5);

    assert_eq!(slot_side.count(&ink), cap);
    assert_eq!(bulk_side.count(&ink), cap);
}
