use novella::{
    Comment, CommentThreadService, Delivery, LogBackend, RemoteLog, Review,
    ReviewAggregationService,
};
use std::{cell::RefCell, rc::Rc};

fn comment(name: &str, text: &str) -> Comment {
    Comment {
        name: name.to_string(),
        text: text.to_string(),
        timestamp: "2024-05-01 10:00:00".to_string(),
    }
}

fn review(rating: u8) -> Review {
    Review {
        rating,
        text: String::new(),
        timestamp: "2024-05-01".to_string(),
    }
}

fn added(key: &str, record: Comment) -> Delivery<Comment> {
    Delivery::Added {
        key: key.to_string(),
        record,
    }
}

#[test]
fn test_added_delivery_is_deduplicated_by_key() {
    let mut log: RemoteLog<Comment> = RemoteLog::new();

    assert!(log.ingest(0, added("-a", comment("Ada", "hi"))));
    assert!(!log.ingest(0, added("-a", comment("Ada", "hi"))));
    assert!(log.ingest(0, added("-b", comment("Brian", "yo"))));

    assert_eq!(log.keys(0), vec!["-a", "-b"]);
    assert_eq!(log.entries(0).len(), 2);
    assert!(log.entries(1).is_empty());
}

#[test]
fn test_value_delivery_replaces_snapshot() {
    let mut log: RemoteLog<Comment> = RemoteLog::new();
    log.ingest(0, added("-a", comment("Ada", "hi")));
    log.ingest(0, added("-b", comment("Brian", "yo")));

    let changed = log.ingest(
        0,
        Delivery::Value(vec![
            ("-a".to_string(), comment("Ada", "hi")),
            ("-c".to_string(), comment("Cleo", "hey")),
        ]),
    );
    assert!(changed);
    assert_eq!(log.keys(0), vec!["-a", "-c"]);

    let replay = Delivery::Value(vec![
        ("-a".to_string(), comment("Ada", "hi")),
        ("-c".to_string(), comment("Cleo", "hey")),
    ]);
    assert!(!log.ingest(0, replay));
}

#[test]
fn test_invalid_pushed_records_are_dropped() {
    let mut log: RemoteLog<Review> = RemoteLog::new();
    let changed = log.ingest(
        2,
        Delivery::Value(vec![
            ("-a".to_string(), review(0)),
            ("-b".to_string(), review(4)),
            ("-c".to_string(), review(7)),
        ]),
    );
    assert!(changed);
    assert_eq!(log.keys(2), vec!["-b"]);
}

#[test]
fn test_append_queues_outgoing_record() {
    let mut log: RemoteLog<Comment> = RemoteLog::new();
    let outbox = log.outbox();

    log.append(3, comment("Ada", "first"));
    log.append(3, comment("Brian", "second"));

    assert_eq!(outbox.len(), 2);
    let outgoing = outbox.drain();
    assert!(outbox.is_empty());
    assert_eq!(outgoing[0].path, "comments/chapter_3");
    assert_eq!(outgoing[1].record.name, "Brian");
    assert_ne!(outgoing[0].key, outgoing[1].key);
    assert_eq!(log.keys(3), vec![outgoing[0].key.clone(), outgoing[1].key.clone()]);

    // The transport echoing our own write back is a no-op.
    let echo = added(&outgoing[0].key, outgoing[0].record.clone());
    assert!(!log.ingest(3, echo));
}

#[test]
fn test_comment_service_streams_only_new_pushed_comments() {
    let mut service = CommentThreadService::new(RemoteLog::<Comment>::new());
    service.ingest(0, added("-a", comment("Ada", "hi")));

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    service.subscribe(0, move |c: &Comment| sink.borrow_mut().push(c.name.clone()));
    assert_eq!(*seen.borrow(), vec!["Ada"]);

    // Reconnect replays the whole collection plus one new item.
    service.ingest(
        0,
        Delivery::Value(vec![
            ("-a".to_string(), comment("Ada", "hi")),
            ("-b".to_string(), comment("Brian", "yo")),
        ]),
    );
    service.ingest(0, added("-b", comment("Brian", "yo")));

    assert_eq!(*seen.borrow(), vec!["Ada", "Brian"]);
}

#[test]
fn test_review_service_publishes_pushed_snapshot() {
    let log: RemoteLog<Review> = RemoteLog::new();
    let outbox = log.outbox();
    let mut service = ReviewAggregationService::new(log);

    let sizes = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&sizes);
    service.subscribe(1, move |reviews| sink.borrow_mut().push(reviews.len()));

    service.submit(1, 5, "great").unwrap();
    service.ingest(
        1,
        Delivery::Value(vec![
            ("-x".to_string(), review(3)),
            ("-y".to_string(), review(4)),
            ("-z".to_string(), review(5)),
        ]),
    );

    assert_eq!(*sizes.borrow(), vec![0, 1, 3]);
    assert_eq!(outbox.drain()[0].path, "reviews/chapter_1");
    assert!((service.average(1).unwrap().average - 4.0).abs() < f64::EPSILON);
}
