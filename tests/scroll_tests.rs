mod common;

use common::RecordingStore;
use novella::{ScrollMemory, Store};
use std::time::{Duration, Instant};

const WINDOW: Duration = Duration::from_millis(200);

#[test]
fn test_burst_collapses_into_single_write_of_last_offset() {
    let recorder = RecordingStore::new();
    let mut scroll = ScrollMemory::new(Store::new(recorder.clone()));
    let start = Instant::now();

    for step in 0..10u64 {
        let now = start + Duration::from_millis(step * 50);
        scroll.on_scroll(1, (step as usize) * 10, now);
        assert_eq!(scroll.poll(now), 0);
    }

    let last_call = start + Duration::from_millis(450);
    assert_eq!(scroll.poll(last_call + WINDOW - Duration::from_millis(1)), 0);
    assert!(recorder.writes_to("scroll1").is_empty());

    assert_eq!(scroll.poll(last_call + WINDOW), 1);
    assert_eq!(recorder.writes_to("scroll1"), vec!["90"]);
    assert_eq!(scroll.restore(1), Some(90));

    assert_eq!(scroll.poll(last_call + WINDOW * 5), 0);
    assert_eq!(recorder.write_count(), 1);
}

#[test]
fn test_no_write_before_quiet_window() {
    let recorder = RecordingStore::new();
    let mut scroll = ScrollMemory::new(Store::new(recorder.clone()));
    let start = Instant::now();

    scroll.on_scroll(0, 12, start);
    assert!(scroll.has_pending());
    assert_eq!(scroll.next_deadline(), Some(start + WINDOW));
    assert_eq!(scroll.poll(start + Duration::from_millis(199)), 0);
    assert!(recorder.writes_to("scroll0").is_empty());
}

#[test]
fn test_restore_prefers_pending_offset() {
    let recorder = RecordingStore::new();
    let store = Store::new(recorder.clone());
    store.set("scroll0", "3");
    let mut scroll = ScrollMemory::new(store);
    let start = Instant::now();

    scroll.on_scroll(0, 12, start);
    assert_eq!(scroll.restore(0), Some(12));
    assert_eq!(recorder.writes_to("scroll0"), vec!["3"]);

    assert_eq!(scroll.poll(start + WINDOW), 1);
    assert_eq!(scroll.restore(0), Some(12));
}

#[test]
fn test_chapters_debounce_independently() {
    let recorder = RecordingStore::new();
    let mut scroll = ScrollMemory::new(Store::new(recorder.clone()));
    let start = Instant::now();

    scroll.on_scroll(0, 5, start);
    scroll.on_scroll(1, 7, start + Duration::from_millis(100));

    assert_eq!(scroll.poll(start + WINDOW), 1);
    assert_eq!(recorder.writes_to("scroll0"), vec!["5"]);
    assert!(recorder.writes_to("scroll1").is_empty());

    assert_eq!(scroll.poll(start + Duration::from_millis(300)), 1);
    assert_eq!(recorder.writes_to("scroll1"), vec!["7"]);
}

#[test]
fn test_flush_writes_everything_pending() {
    let recorder = RecordingStore::new();
    let mut scroll = ScrollMemory::new(Store::new(recorder.clone()));
    let start = Instant::now();

    scroll.on_scroll(2, 30, start);
    scroll.on_scroll(3, 45, start);
    assert_eq!(scroll.flush(), 2);
    assert!(!scroll.has_pending());
    assert_eq!(scroll.next_deadline(), None);
    assert_eq!(scroll.restore(2), Some(30));
    assert_eq!(scroll.restore(3), Some(45));
}

#[test]
fn test_restore_treats_malformed_offset_as_absent() {
    let store = Store::in_memory();
    store.set("scroll4", "halfway");
    let scroll = ScrollMemory::new(store);
    assert_eq!(scroll.restore(4), None);
}

#[test]
fn test_custom_quiet_window() {
    let store = Store::in_memory();
    let mut scroll = ScrollMemory::with_quiet_window(store, Duration::from_millis(20));
    let start = Instant::now();

    scroll.on_scroll(0, 8, start);
    assert_eq!(scroll.poll(start + Duration::from_millis(20)), 1);
    assert_eq!(scroll.restore(0), Some(8));
}
