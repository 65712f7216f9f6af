//! Integration tests for the registry
//!
//! Tests uniqueness, cascading removal, rename, and typed lookups.

use dicebag_foundation::ErrorKind;
use dicebag_storage::{Collection, Die, Registry, RollableKind};

fn die(name: &str, faces: i64) -> Die {
    Die::numbered(name, 0, faces).unwrap()
}

// =============================================================================
// Add / Lookup
// =============================================================================

#[test]
fn add_and_lookup() {
    let mut registry = Registry::new();
    registry.add(die("d6", 6)).unwrap();
    registry.add(Collection::new("Bag", 0)).unwrap();

    assert_eq!(registry.len(), 2);
    assert_eq!(registry.lookup("d6").unwrap().kind(), RollableKind::Die);
    assert_eq!(
        registry.lookup("Bag").unwrap().kind(),
        RollableKind::Collection
    );
    assert!(registry.lookup("bag").is_none());
}

#[test]
fn duplicate_add_leaves_registry_unchanged() {
    let mut registry = Registry::new();
    registry.add(die("x", 6)).unwrap();
    let before = registry.clone();

    let err = registry.add(Collection::new("x", 3)).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateName(_)));
    assert_eq!(registry, before);
}

#[test]
fn iteration_follows_creation_order() {
    let mut registry = Registry::new();
    for name in ["c", "a", "b"] {
        registry.add(die(name, 2)).unwrap();
    }
    assert_eq!(registry.names().collect::<Vec<_>>(), vec!["c", "a", "b"]);
}

#[test]
fn typed_lookup_checks_kind() {
    let mut registry = Registry::new();
    registry.add(die("d6", 6)).unwrap();
    assert!(matches!(
        registry.collection("d6").unwrap_err().kind,
        ErrorKind::InvalidArgument(_)
    ));
    assert!(matches!(
        registry.die("nope").unwrap_err().kind,
        ErrorKind::NotFound(_)
    ));
}

// =============================================================================
// Removal
// =============================================================================

#[test]
fn remove_missing_is_not_found() {
    let mut registry = Registry::new();
    assert!(matches!(
        registry.remove("ghost").unwrap_err().kind,
        ErrorKind::NotFound(_)
    ));
}

#[test]
fn remove_purges_duplicate_references() {
    let mut registry = Registry::new();
    registry.add(die("dieA", 4)).unwrap();
    registry.add(Collection::new("C", 0)).unwrap();
    registry.add_to_collection("C", "dieA").unwrap();
    registry.add_to_collection("C", "dieA").unwrap();

    registry.remove("dieA").unwrap();
    assert!(!registry.contains_name("dieA"));
    assert!(registry.collection("C").unwrap().contents().is_empty());
}

#[test]
fn remove_purges_every_collection() {
    let mut registry = Registry::new();
    registry.add(die("d20", 20)).unwrap();
    registry.add(die("d4", 4)).unwrap();
    for name in ["One", "Two"] {
        registry.add(Collection::new(name, 0)).unwrap();
        registry.add_to_collection(name, "d20").unwrap();
        registry.add_to_collection(name, "d4").unwrap();
        registry.add_to_collection(name, "d20").unwrap();
    }

    registry.remove("d20").unwrap();
    assert_eq!(registry.collection("One").unwrap().contents(), &["d4"]);
    assert_eq!(registry.collection("Two").unwrap().contents(), &["d4"]);
}

#[test]
fn remove_nested_collection_detaches_it() {
    let mut registry = Registry::new();
    registry.add(Collection::new("Outer", 0)).unwrap();
    registry.add(Collection::new("Inner", 0)).unwrap();
    registry.add_to_collection("Outer", "Inner").unwrap();

    let removed = registry.remove("Inner").unwrap();
    assert_eq!(removed.name(), "Inner");
    assert!(registry.collection("Outer").unwrap().is_empty());
}

// =============================================================================
// Rename
// =============================================================================

#[test]
fn rename_keeps_position_and_rewrites_references() {
    let mut registry = Registry::new();
    registry.add(die("d6", 6)).unwrap();
    registry.add(die("d8", 8)).unwrap();
    registry.add(Collection::new("Bag", 0)).unwrap();
    registry.add_to_collection("Bag", "d6").unwrap();
    registry.add_to_collection("Bag", "d8").unwrap();
    registry.add_to_collection("Bag", "d6").unwrap();

    registry.rename("d6", "six").unwrap();

    assert_eq!(
        registry.names().collect::<Vec<_>>(),
        vec!["six", "d8", "Bag"]
    );
    assert_eq!(registry.die("six").unwrap().name(), "six");
    assert_eq!(
        registry.collection("Bag").unwrap().contents(),
        &["six", "d8", "six"]
    );
}

#[test]
fn rename_onto_existing_fails() {
    let mut registry = Registry::new();
    registry.add(die("a", 2)).unwrap();
    registry.add(die("b", 2)).unwrap();
    assert!(matches!(
        registry.rename("a", "b").unwrap_err().kind,
        ErrorKind::DuplicateName(_)
    ));
    assert!(registry.contains_name("a"));
}

#[test]
fn rename_to_same_name_is_a_no_op() {
    let mut registry = Registry::new();
    registry.add(die("a", 2)).unwrap();
    registry.rename("a", "a").unwrap();
    assert!(registry.contains_name("a"));
}

// =============================================================================
// Mutators
// =============================================================================

#[test]
fn set_modifier_on_either_kind() {
    let mut registry = Registry::new();
    registry.add(die("d6", 6)).unwrap();
    registry.add(Collection::new("Bag", 0)).unwrap();
    registry.set_modifier("d6", -2).unwrap();
    registry.set_modifier("Bag", 5).unwrap();
    assert_eq!(registry.get("d6").unwrap().modifier(), -2);
    assert_eq!(registry.get("Bag").unwrap().modifier(), 5);
}

#[test]
fn face_edits_require_a_die() {
    let mut registry = Registry::new();
    registry.add(Collection::new("Bag", 0)).unwrap();
    assert!(matches!(
        registry.add_face("Bag", 3).unwrap_err().kind,
        ErrorKind::InvalidArgument(_)
    ));
}
