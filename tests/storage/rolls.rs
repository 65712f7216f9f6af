//! Integration tests for roll aggregation
//!
//! Tests the flat breakdown layout, subtotal arithmetic, and totals.

use dicebag_storage::{Collection, Die, Registry, RollEntry, RollOutcome};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Bag (+2) holds d4 and Sub (+1); Sub holds d6.
fn bag() -> Registry {
    let mut registry = Registry::new();
    registry.add(Die::numbered("d4", 0, 4).unwrap()).unwrap();
    registry.add(Die::numbered("d6", 0, 6).unwrap()).unwrap();
    registry.add(Collection::new("Bag", 2)).unwrap();
    registry.add(Collection::new("Sub", 1)).unwrap();
    registry.add_to_collection("Sub", "d6").unwrap();
    registry.add_to_collection("Bag", "d4").unwrap();
    registry.add_to_collection("Bag", "Sub").unwrap();
    registry
}

// =============================================================================
// Breakdown Layout
// =============================================================================

#[test]
fn nested_breakdown_matches_layout() {
    let registry = bag();
    let mut rng = ChaCha8Rng::seed_from_u64(99);

    for _ in 0..200 {
        let breakdown = registry.roll_detailed("Bag", &mut rng).unwrap();
        let entries = breakdown.entries();
        assert_eq!(entries.len(), 6);

        let r1 = entries[1].value;
        let r2 = entries[3].value;
        assert!((1..=4).contains(&r1));
        assert!((1..=6).contains(&r2));

        assert_eq!(
            entries,
            &[
                RollEntry::part("Bag", 2),
                RollEntry::part("d4", r1),
                RollEntry::part("Sub", 1),
                RollEntry::part("d6", r2),
                RollEntry::subtotal("Sub Subtotal", 1 + r2),
                RollEntry::subtotal("Bag Total", 2 + r1 + 1 + r2),
            ]
        );
    }
}

#[test]
fn inner_collection_rolled_alone_gets_total() {
    let registry = bag();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let breakdown = registry.roll_detailed("Sub", &mut rng).unwrap();
    assert_eq!(breakdown.entries().last().unwrap().label, "Sub Total");
}

#[test]
fn empty_collection_totals_its_modifier() {
    let mut registry = Registry::new();
    registry.add(Collection::new("Empty", -3)).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let breakdown = registry.roll_detailed("Empty", &mut rng).unwrap();
    assert_eq!(
        breakdown.entries(),
        &[
            RollEntry::part("Empty", -3),
            RollEntry::subtotal("Empty Total", -3)
        ]
    );
    assert_eq!(breakdown.total(), -3);
}

#[test]
fn shared_member_is_rolled_each_time() {
    let mut registry = Registry::new();
    registry.add(Die::new("one", 0, vec![1]).unwrap()).unwrap();
    registry.add(Collection::new("Inner", 0)).unwrap();
    registry.add(Collection::new("Outer", 0)).unwrap();
    registry.add_to_collection("Inner", "one").unwrap();
    registry.add_to_collection("Outer", "Inner").unwrap();
    registry.add_to_collection("Outer", "Inner").unwrap();
    registry.add_to_collection("Outer", "one").unwrap();

    let mut rng = ChaCha8Rng::seed_from_u64(1);
    // Two Inner subtotals are not double counted: 1 + 1 + 1.
    assert_eq!(registry.roll_detailed("Outer", &mut rng).unwrap().total(), 3);
}

// =============================================================================
// Outcomes
// =============================================================================

#[test]
fn die_outcome_is_single_value() {
    let mut registry = Registry::new();
    registry.add(Die::new("fixed", 4, vec![2]).unwrap()).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let outcome = registry.roll("fixed", &mut rng).unwrap();
    assert_eq!(
        outcome,
        RollOutcome::Die {
            name: "fixed".to_string(),
            value: 6
        }
    );
    assert_eq!(outcome.total(), 6);
}

#[test]
fn collection_roll_equals_breakdown_total() {
    let registry = bag();
    let collection = registry.collection("Bag").unwrap();

    let mut a = ChaCha8Rng::seed_from_u64(7);
    let mut b = ChaCha8Rng::seed_from_u64(7);
    let total = collection.roll(&registry, &mut a).unwrap();
    let breakdown = collection.roll_detailed(&registry, &mut b, true).unwrap();
    assert_eq!(total, breakdown.total());
}

#[test]
fn same_seed_same_rolls() {
    let registry = bag();
    let mut a = ChaCha8Rng::seed_from_u64(31);
    let mut b = ChaCha8Rng::seed_from_u64(31);
    for _ in 0..20 {
        assert_eq!(
            registry.roll("Bag", &mut a).unwrap(),
            registry.roll("Bag", &mut b).unwrap()
        );
    }
}
