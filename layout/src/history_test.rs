use super::*;

fn filled(n: u32) -> History<u32> {
    let mut h = History::new(0);
    for i in 1..=n {
        h.push(i);
    }
    h
}

// =============================================================
// Construction
// =============================================================

#[test]
fn new_holds_only_the_baseline() {
    let h = History::new("base");
    assert_eq!(h.len(), 1);
    assert_eq!(h.cursor(), 0);
    assert_eq!(*h.current(), "base");
    assert!(!h.can_undo());
    assert!(!h.can_redo());
    assert!(!h.is_empty());
    assert!(h.limit().is_none());
}

#[test]
fn zero_limit_is_raised_to_one() {
    let h = History::with_limit(0, 0);
    assert_eq!(h.limit(), Some(1));
}

// =============================================================
// Push / undo / redo
// =============================================================

#[test]
fn push_moves_cursor_to_newest() {
    let h = filled(3);
    assert_eq!(h.len(), 4);
    assert_eq!(h.cursor(), 3);
    assert_eq!(*h.current(), 3);
}

#[test]
fn undo_walks_back_to_baseline() {
    let mut h = filled(3);
    assert_eq!(h.undo(), Some(&2));
    assert_eq!(h.undo(), Some(&1));
    assert_eq!(h.undo(), Some(&0));
    assert_eq!(h.undo(), None);
    assert_eq!(h.cursor(), 0);
}

#[test]
fn redo_walks_forward_to_newest() {
    let mut h = filled(2);
    h.undo();
    h.undo();
    assert_eq!(h.redo(), Some(&1));
    assert_eq!(h.redo(), Some(&2));
    assert_eq!(h.redo(), None);
    assert_eq!(h.cursor(), 2);
}

#[test]
fn push_after_undo_discards_redo_tail() {
    let mut h = filled(4);
    h.undo();
    h.undo();
    h.push(99);
    assert_eq!(h.len(), h.cursor() + 1);
    assert!(!h.can_redo());
    assert_eq!(h.redo(), None);
    assert_eq!(*h.current(), 99);
    assert_eq!(h.undo(), Some(&2));
}

#[test]
fn cursor_stays_in_range() {
    let mut h = filled(5);
    for _ in 0..10 {
        h.undo();
        assert!(h.cursor() < h.len());
    }
    for _ in 0..10 {
        h.redo();
        assert!(h.cursor() < h.len());
    }
}

// =============================================================
// Limit / reset
// =============================================================

#[test]
fn limit_drops_oldest_entries() {
    let mut h = History::with_limit(0, 3);
    for i in 1..=5 {
        h.push(i);
    }
    assert_eq!(h.len(), 3);
    assert_eq!(h.cursor(), 2);
    assert_eq!(h.undo(), Some(&4));
    assert_eq!(h.undo(), Some(&3));
    assert_eq!(h.undo(), None);
}

#[test]
fn limit_applies_after_truncation() {
    let mut h = History::with_limit(0, 3);
    h.push(1);
    h.push(2);
    h.undo();
    h.undo();
    h.push(7);
    assert_eq!(h.len(), 2);
    assert_eq!(*h.current(), 7);
}

#[test]
fn reset_restores_single_baseline() {
    let mut h = filled(4);
    h.undo();
    h.reset(42);
    assert_eq!(h.len(), 1);
    assert_eq!(h.cursor(), 0);
    assert_eq!(*h.current(), 42);
    assert!(!h.can_undo());
    assert!(!h.can_redo());
}
