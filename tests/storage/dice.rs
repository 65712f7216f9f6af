//! Integration tests for dice
//!
//! Tests construction, face editing, and the distribution of rolls.

use dicebag_foundation::ErrorKind;
use dicebag_storage::Die;
use dicebag_storage::rollable::MAX_NUMBERED_FACES;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// =============================================================================
// Construction
// =============================================================================

#[test]
fn numbered_die_has_sequential_faces() {
    let die = Die::numbered("d8", 0, 8).unwrap();
    assert_eq!(die.faces(), &[1, 2, 3, 4, 5, 6, 7, 8]);
}

#[test]
fn numbered_die_bounds() {
    assert!(Die::numbered("d0", 0, 0).is_err());
    assert!(Die::numbered("neg", 0, -3).is_err());
    assert!(Die::numbered("huge", 0, MAX_NUMBERED_FACES + 1).is_err());
}

#[test]
fn custom_faces_keep_order_and_duplicates() {
    let die = Die::new("loaded", 1, vec![6, 6, 1]).unwrap();
    assert_eq!(die.faces(), &[6, 6, 1]);
    assert_eq!(die.modifier(), 1);
}

#[test]
fn empty_faces_rejected() {
    let err = Die::new("blank", 0, vec![]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidArgument(_)));
}

// =============================================================================
// Face Editing
// =============================================================================

#[test]
fn add_face_appends_duplicates() {
    let mut die = Die::numbered("d2", 0, 2).unwrap();
    die.add_face(2);
    assert_eq!(die.faces(), &[1, 2, 2]);
}

#[test]
fn remove_face_takes_first_match() {
    let mut die = Die::new("d", 0, vec![3, 1, 3]).unwrap();
    die.remove_face(3).unwrap();
    assert_eq!(die.faces(), &[1, 3]);
}

#[test]
fn remove_missing_face_is_not_found() {
    let mut die = Die::numbered("d4", 0, 4).unwrap();
    let err = die.remove_face(9).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NotFound(_)));
    assert_eq!(die.faces(), &[1, 2, 3, 4]);
}

#[test]
fn last_face_cannot_be_removed() {
    let mut die = Die::new("coin", 0, vec![1]).unwrap();
    let err = die.remove_face(1).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::LastFace(_)));
    assert_eq!(die.faces(), &[1]);

    // The last-face check wins even for an absent value.
    let err = die.remove_face(7).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::LastFace(_)));
}

// =============================================================================
// Rolling
// =============================================================================

#[test]
fn roll_is_a_face_plus_modifier() {
    let die = Die::new("odd", -2, vec![1, 3, 5]).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    for _ in 0..500 {
        let value = die.roll(&mut rng);
        assert!([-1, 1, 3].contains(&value), "unexpected roll {value}");
    }
}

#[test]
fn face_frequencies_converge() {
    let die = Die::numbered("d6", 0, 6).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let trials = 60_000;
    let mut counts = [0u32; 6];
    for _ in 0..trials {
        let value = die.roll(&mut rng);
        counts[usize::try_from(value - 1).unwrap()] += 1;
    }

    let expected = f64::from(trials) / 6.0;
    for (face, &count) in counts.iter().enumerate() {
        let deviation = (f64::from(count) - expected).abs() / expected;
        assert!(
            deviation < 0.05,
            "face {} seen {count} times, expected about {expected}",
            face + 1
        );
    }
}

#[test]
fn duplicate_faces_weight_the_roll() {
    let die = Die::new("weighted", 0, vec![1, 2, 2, 2]).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let twos = (0..40_000).filter(|_| die.roll(&mut rng) == 2).count();
    // Three of four faces are 2.
    assert!((29_000..31_000).contains(&twos), "twos = {twos}");
}
