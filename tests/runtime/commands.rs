//! Integration tests for command sequences
//!
//! Tests pipe-chained execution, the abort policy, and rendered output.

use dicebag_foundation::ErrorKind;
use dicebag_runtime::{Config, Response, Session, render};
use dicebag_storage::RollOutcome;

fn session(dir: &tempfile::TempDir) -> Session {
    let config = Config::new()
        .with_store_dir(dir.path())
        .with_seed(Some(8))
        .with_color(false);
    Session::from_config(&config).unwrap()
}

// =============================================================================
// Abort Policy
// =============================================================================

#[test]
fn earlier_steps_stay_applied_after_failure() {
    let dir = tempfile::tempdir().unwrap();
    let mut s = session(&dir);

    let report = s.run_line("create d6 6 | create Bag | add d6 | add Bag | modifier +3");
    let failure = report.failure.unwrap();

    assert_eq!(failure.step, "add Bag");
    assert!(matches!(failure.error.kind, ErrorKind::SelfContainment { .. }));
    assert_eq!(failure.skipped, 1);
    assert_eq!(s.registry().collection("Bag").unwrap().contents(), &["d6"]);
    // `modifier +3` never ran.
    assert_eq!(s.registry().get("Bag").unwrap().modifier(), 0);
}

#[test]
fn failure_in_last_step_skips_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut s = session(&dir);
    let failure = s.run_line("create a | select b").failure.unwrap();
    assert_eq!(failure.skipped, 0);
    assert!(matches!(failure.error.kind, ErrorKind::NotFound(_)));

    let text = render::failure(&failure, false);
    assert!(!text.contains("aborted"));
}

#[test]
fn abort_notice_names_failed_step() {
    let dir = tempfile::tempdir().unwrap();
    let mut s = session(&dir);
    let failure = s.run_line("modifier 3 | list").failure.unwrap();
    let text = render::failure(&failure, false);
    assert_eq!(
        text.lines().last(),
        Some("Remaining command sequence aborted - 'modifier 3' execution failed")
    );
}

// =============================================================================
// Cascading Delete Through Commands
// =============================================================================

#[test]
fn delete_purges_references_and_clears_cursor() {
    let dir = tempfile::tempdir().unwrap();
    let mut s = session(&dir);
    let report = s.run_line(
        "create d4 4 | create Bag | add d4 | add d4 | create Box | add d4 | select d4 | delete",
    );
    assert!(report.is_ok());
    assert_eq!(s.selected(), None);
    assert!(s.registry().collection("Bag").unwrap().is_empty());
    assert!(s.registry().collection("Box").unwrap().is_empty());
}

// =============================================================================
// Rolls
// =============================================================================

#[test]
fn detailed_roll_renders_breakdown() {
    let dir = tempfile::tempdir().unwrap();
    let mut s = session(&dir);
    let report = s.run_line("create one 1 | create Bag +2 | add one | roll");
    let Some(Response::Roll(RollOutcome::Collection(breakdown))) = report.responses.last() else {
        panic!("expected a collection roll, got {:?}", report.responses);
    };
    assert_eq!(breakdown.total(), 3);

    let text = render::response(report.responses.last().unwrap(), false).unwrap();
    assert_eq!(text, "\tBag: 2\n\tone: 1\nBag Total: 3");
}

#[test]
fn quick_roll_is_only_the_total() {
    let dir = tempfile::tempdir().unwrap();
    let mut s = session(&dir);
    let report = s.run_line("create two +1 1 | roll quick");
    assert_eq!(report.responses.last(), Some(&Response::Total(2)));
}

#[test]
fn custom_faces_with_modifier() {
    let dir = tempfile::tempdir().unwrap();
    let mut s = session(&dir);
    assert!(s.run_line("create odd +1 1 3 5").is_ok());
    let die = s.registry().die("odd").unwrap();
    assert_eq!(die.modifier(), 1);
    assert_eq!(die.faces(), &[1, 3, 5]);
}

// =============================================================================
// Listing
// =============================================================================

#[test]
fn list_renders_nested_collection() {
    let dir = tempfile::tempdir().unwrap();
    let mut s = session(&dir);
    let report = s.run_line(
        "create d2 2 | create Sub -1 | add d2 | create Bag +2 | add Sub | add d2 | list",
    );
    assert_eq!(
        report.responses.last(),
        Some(&Response::Text(
            "Bag (+2):\n\td2 (+0) 1 2\n\tSub (-1):\n\t\td2 (+0) 1 2".to_string()
        ))
    );
}

#[test]
fn help_lists_every_command() {
    let text = render::response(&Response::Help, false).unwrap();
    for keyword in dicebag_runtime::command::KEYWORDS {
        assert!(text.contains(keyword), "help is missing {keyword}");
    }
}
