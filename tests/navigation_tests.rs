mod common;

use common::RecordingStore;
use novella::{NavigationController, ReaderError, Store};
use std::{cell::RefCell, rc::Rc};

#[test]
fn test_starts_at_zero_without_persisted_chapter() {
    let nav = NavigationController::new(5, Store::in_memory()).unwrap();
    assert_eq!(nav.current(), 0);
    assert_eq!(nav.chapter_count(), 5);
}

#[test]
fn test_restores_persisted_chapter_in_range() {
    let store = Store::in_memory();
    store.set("chapter", "3");
    let nav = NavigationController::new(5, store).unwrap();
    assert_eq!(nav.current(), 3);
}

#[test]
fn test_ignores_out_of_range_or_malformed_chapter() {
    let store = Store::in_memory();
    store.set("chapter", "9");
    assert_eq!(NavigationController::new(5, store).unwrap().current(), 0);

    let store = Store::in_memory();
    store.set("chapter", "-1");
    assert_eq!(NavigationController::new(5, store).unwrap().current(), 0);

    let store = Store::in_memory();
    store.set("chapter", "abc");
    assert_eq!(NavigationController::new(5, store).unwrap().current(), 0);
}

#[test]
fn test_rejects_empty_book() {
    let result = NavigationController::new(0, Store::in_memory());
    assert_eq!(result.unwrap_err(), ReaderError::NoChapters);
}

#[test]
fn test_set_chapter_clamps_and_persists() {
    let recorder = RecordingStore::new();
    let mut nav = NavigationController::new(4, Store::new(recorder.clone())).unwrap();

    assert_eq!(nav.set_chapter(2), 2);
    assert_eq!(nav.set_chapter(99), 3);
    assert_eq!(nav.set_chapter(-7), 0);

    assert_eq!(recorder.writes_to("chapter"), vec!["2", "3", "0"]);
}

#[test]
fn test_step_always_stays_in_bounds() {
    let count = 7;
    for start in 0..count {
        for delta in [
            isize::MIN,
            -1000,
            -8,
            -7,
            -1,
            0,
            1,
            6,
            7,
            1000,
            isize::MAX,
        ] {
            let mut nav = NavigationController::new(count, Store::in_memory()).unwrap();
            nav.set_chapter(start as isize);
            let index = nav.step(delta);
            assert!(index < count, "start {} delta {} gave {}", start, delta, index);
            assert_eq!(index, nav.current());
        }
    }
}

#[test]
fn test_next_and_previous_stop_at_ends() {
    let mut nav = NavigationController::new(2, Store::in_memory()).unwrap();
    assert_eq!(nav.previous(), 0);
    assert_eq!(nav.next(), 1);
    assert!(nav.is_last());
    assert_eq!(nav.next(), 1);
}

#[test]
fn test_change_event_emitted_for_every_request() {
    let mut nav = NavigationController::new(3, Store::in_memory()).unwrap();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let id = nav.on_change(move |event| sink.borrow_mut().push(event.index));

    nav.step(1);
    nav.step(5);
    nav.set_chapter(2);
    assert_eq!(*seen.borrow(), vec![1, 2, 2]);

    assert!(nav.remove_listener(id));
    nav.step(-1);
    assert_eq!(seen.borrow().len(), 3);
}

#[test]
fn test_progress_counts_current_chapter() {
    let mut nav = NavigationController::new(4, Store::in_memory()).unwrap();
    assert!((nav.progress() - 0.25).abs() < f64::EPSILON);
    nav.set_chapter(3);
    assert!((nav.progress() - 1.0).abs() < f64::EPSILON);
}
