use novella::{
    Review, ReviewAggregationService, Store, ValidationError,
    reviews::{aggregate, best_review, best_review_index, top_rated_chapter, top_rated_chapter_held},
};
use std::{cell::RefCell, rc::Rc};

fn review(rating: u8, text: &str) -> Review {
    Review {
        rating,
        text: text.to_string(),
        timestamp: "2024-05-01".to_string(),
    }
}

#[test]
fn test_best_review_prefers_rating_then_length_then_first() {
    let log = vec![review(5, "a"), review(5, "ab"), review(5, "ab")];
    assert_eq!(best_review_index(&log), Some(1));

    let log = vec![review(3, "a long thoughtful review"), review(4, "ok")];
    assert_eq!(best_review_index(&log), Some(1));

    let log = vec![review(2, ""), review(2, "")];
    assert_eq!(best_review_index(&log), Some(0));

    assert_eq!(best_review_index(&[]), None);
    assert!(best_review(&[]).is_none());
}

#[test]
fn test_best_review_counts_characters_not_bytes() {
    let log = vec![review(4, "ééé"), review(4, "abcd")];
    assert_eq!(best_review(&log).map(|r| r.text.as_str()), Some("abcd"));
}

#[test]
fn test_missing_text_counts_as_empty() {
    let parsed: Review = serde_json::from_str(r#"{"rating":5,"time":"2024-01-01"}"#).unwrap();
    assert_eq!(parsed.text, "");
    assert_eq!(parsed.text_len(), 0);

    let log = vec![parsed, review(5, "x")];
    assert_eq!(best_review_index(&log), Some(1));
}

#[test]
fn test_aggregate_average_and_label() {
    assert!(aggregate(&[]).is_none());

    let summary = aggregate(&[review(5, ""), review(4, ""), review(4, "")]).unwrap();
    assert_eq!(summary.count, 3);
    assert!((summary.average - 13.0 / 3.0).abs() < 1e-9);
    assert_eq!(summary.label(), "⭐ 4.3 / 5 (3 reviews)");
    assert!(summary.is_acclaimed());

    let single = aggregate(&[review(3, "")]).unwrap();
    assert_eq!(single.label(), "⭐ 3.0 / 5 (1 review)");
    assert!(!single.is_acclaimed());
}

#[test]
fn test_top_rated_skips_empty_chapters() {
    let empty: Vec<Review> = Vec::new();
    let one = vec![review(4, "")];
    let top = top_rated_chapter([empty.as_slice(), one.as_slice()]).unwrap();
    assert_eq!(top.chapter, 1);

    let none: Option<_> = top_rated_chapter([empty.as_slice(), empty.as_slice()]);
    assert!(none.is_none());
}

#[test]
fn test_fresh_scan_prefers_first_chapter_on_tie() {
    let four = vec![review(4, "")];
    let top = top_rated_chapter([four.as_slice(), four.as_slice()]).unwrap();
    assert_eq!(top.chapter, 0);
}

#[test]
fn test_held_chapter_survives_equal_average() {
    let empty: Vec<Review> = Vec::new();
    let four = vec![review(4, "")];
    let top = top_rated_chapter_held([four.as_slice(), four.as_slice()], Some(1)).unwrap();
    assert_eq!(top.chapter, 1);

    let top = top_rated_chapter_held([four.as_slice(), empty.as_slice()], Some(1)).unwrap();
    assert_eq!(top.chapter, 0);
}

#[test]
fn test_top_rated_is_not_taken_by_equal_average() {
    let mut service = ReviewAggregationService::local(Store::in_memory());
    service.submit(1, 4, "").unwrap();
    assert_eq!(service.top_rated_chapter(2).map(|t| t.chapter), Some(1));

    service.submit(0, 4, "").unwrap();
    assert_eq!(service.top_rated_chapter(2).map(|t| t.chapter), Some(1));

    service.submit(0, 5, "").unwrap();
    assert_eq!(service.top_rated_chapter(2).map(|t| t.chapter), Some(0));
}

#[test]
fn test_later_chapter_stays_top_until_beaten() {
    let mut service = ReviewAggregationService::local(Store::in_memory());
    service.submit(1, 5, "").unwrap();
    service.submit(0, 4, "").unwrap();

    let top = service.top_rated_chapter(2).unwrap();
    assert_eq!(top.chapter, 1);
    assert!((top.average - 5.0).abs() < f64::EPSILON);
}

#[test]
fn test_submit_rejects_out_of_range_ratings() {
    let store = Store::in_memory();
    let mut service = ReviewAggregationService::local(store.clone());

    assert_eq!(service.submit(0, 0, "meh"), Err(ValidationError::InvalidRating(0)));
    assert_eq!(service.submit(0, 6, "wow"), Err(ValidationError::InvalidRating(6)));
    assert_eq!(store.get("reviews_chapter_0"), None);
    assert!(service.average(0).is_none());
}

#[test]
fn test_submit_persists_trimmed_review() {
    let store = Store::in_memory();
    let mut service = ReviewAggregationService::local(store.clone());
    let saved = service.submit(3, 5, "  Loved it  ").unwrap();

    assert_eq!(saved.text, "Loved it");
    assert_eq!(service.entries(3), vec![saved.clone()]);
    assert_eq!(service.best_review(3), Some(saved));

    let raw: Vec<serde_json::Value> =
        serde_json::from_str(&store.get("reviews_chapter_3").unwrap()).unwrap();
    assert_eq!(raw[0]["rating"], 5);
    assert_eq!(raw[0]["text"], "Loved it");
    assert!(raw[0]["time"].is_string());
}

#[test]
fn test_invalid_persisted_entries_are_skipped() {
    let store = Store::in_memory();
    store.set(
        "reviews_chapter_0",
        r#"[{"rating":9,"text":"bad"},{"rating":4},"junk",{"rating":2,"text":"fine"}]"#,
    );
    let service = ReviewAggregationService::local(store);

    let entries = service.entries(0);
    assert_eq!(entries.len(), 2);
    assert_eq!(service.average(0).map(|a| a.count), Some(2));
    assert!((service.average(0).unwrap().average - 3.0).abs() < f64::EPSILON);
}

#[test]
fn test_submit_leaves_earlier_entries_untouched() {
    let store = Store::in_memory();
    store.set(
        "reviews_chapter_0",
        r#"[{"rating":4},{"rating":2,"text":"fine","time":"t","chapterIndex":0},{"rating":9},"junk"]"#,
    );
    let before: Vec<serde_json::Value> =
        serde_json::from_str(&store.get("reviews_chapter_0").unwrap()).unwrap();

    let mut service = ReviewAggregationService::local(store.clone());
    service.submit(0, 5, "new").unwrap();

    let after: Vec<serde_json::Value> =
        serde_json::from_str(&store.get("reviews_chapter_0").unwrap()).unwrap();
    assert_eq!(after.len(), before.len() + 1);
    assert_eq!(after[..before.len()], before[..]);
    assert_eq!(after[4]["rating"], 5);
    assert_eq!(after[4]["text"], "new");

    // Readers still only see the well-formed entries.
    let ratings: Vec<u8> = service.entries(0).iter().map(|r| r.rating).collect();
    assert_eq!(ratings, vec![4, 2, 5]);
}

#[test]
fn test_subscription_receives_whole_log_on_every_change() {
    let mut service = ReviewAggregationService::local(Store::in_memory());
    service.submit(0, 3, "first").unwrap();

    let updates: Rc<RefCell<Vec<usize>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&updates);
    service.subscribe(0, move |reviews| sink.borrow_mut().push(reviews.len()));
    assert_eq!(*updates.borrow(), vec![1]);

    service.submit(0, 5, "second").unwrap();
    service.submit(1, 5, "elsewhere").unwrap();
    assert_eq!(*updates.borrow(), vec![1, 2]);

    let sink = Rc::clone(&updates);
    service.subscribe(0, move |reviews| sink.borrow_mut().push(reviews.len() * 10));
    assert_eq!(*updates.borrow(), vec![1, 2, 20]);

    assert!(service.unsubscribe());
    service.submit(0, 1, "").unwrap();
    assert_eq!(updates.borrow().len(), 3);
}
