//! Integration tests for persistence
//!
//! Tests the MessagePack codec and file commands end to end.

use dicebag_foundation::ErrorKind;
use dicebag_runtime::{Config, FileStore, Session, from_bytes, snapshot_from_bytes, to_bytes};
use dicebag_storage::{Collection, Die, Registry};

fn sample() -> Registry {
    let mut registry = Registry::new();
    registry.add(Die::new("fudge", 0, vec![-1, 0, 1]).unwrap()).unwrap();
    registry.add(Collection::new("Outer", 1)).unwrap();
    registry.add(Collection::new("Inner", -2)).unwrap();
    registry.add_to_collection("Inner", "fudge").unwrap();
    registry.add_to_collection("Outer", "Inner").unwrap();
    registry.add_to_collection("Outer", "fudge").unwrap();
    registry.add_to_collection("Outer", "Inner").unwrap();
    registry
}

// =============================================================================
// Codec
// =============================================================================

#[test]
fn bytes_round_trip_structurally() {
    let registry = sample();
    let bytes = to_bytes(&registry).unwrap();
    let restored = from_bytes(&bytes).unwrap();
    assert_eq!(restored.snapshot(), registry.snapshot());
    assert_eq!(to_bytes(&restored).unwrap(), bytes);
}

#[test]
fn decoded_snapshot_lists_forward_reference() {
    let bytes = to_bytes(&sample()).unwrap();
    let snapshot = snapshot_from_bytes(&bytes).unwrap();
    // Outer is listed before Inner yet names it.
    assert_eq!(snapshot.collections[0].name, "Outer");
    assert_eq!(snapshot.collections[0].contents[0], "Inner");
}

#[test]
fn garbage_bytes_fail_to_decode() {
    let err = from_bytes(&[0xc1, 0x00, 0xff]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Serialization(_)));
}

// =============================================================================
// File Commands
// =============================================================================

fn session(dir: &tempfile::TempDir, file: Option<&str>) -> Session {
    let config = Config::new()
        .with_store_dir(dir.path().join("presets"))
        .with_seed(Some(3))
        .with_initial_file(file.map(String::from));
    Session::from_config(&config).unwrap()
}

#[test]
fn saved_file_reopens_in_new_session() {
    let dir = tempfile::tempdir().unwrap();
    let mut first = session(&dir, Some("party"));
    assert!(first.run_line("create d20 20 | create Attack +5 | add d20 | exit").is_ok());
    first.shutdown().unwrap();

    let second = session(&dir, Some("party"));
    assert_eq!(second.file(), Some("party"));
    assert!(second.registry().contains("Attack", "d20").unwrap());
    assert_eq!(second.registry().get("Attack").unwrap().modifier(), 5);
}

#[test]
fn store_path_uses_name_and_extension() {
    let dir = tempfile::tempdir().unwrap();
    let mut s = session(&dir, None);
    assert!(s.run_line("f_save goblins").is_ok());
    assert!(dir.path().join("presets").join("goblins.msgpack").is_file());
}

#[test]
fn invalid_file_names_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path(), "msgpack");
    let err = store.save("has-dash", &Registry::new()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidArgument(_)));
}

#[test]
fn renaming_onto_existing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut s = session(&dir, None);
    assert!(s.run_line("f_save a | f_save b").is_ok());
    let failure = s.run_line("f_rename a b").failure.unwrap();
    assert!(matches!(failure.error.kind, ErrorKind::DuplicateName(_)));
}

#[test]
fn corrupt_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path(), "msgpack");
    std::fs::write(store.path_for("broken"), [0xc1u8]).unwrap();

    let err = store.load("broken").unwrap_err();
    let message = format!("{err}");
    assert!(message.contains("broken.msgpack"), "{message}");
}
