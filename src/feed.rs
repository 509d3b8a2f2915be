//! Normalization layer for a realtime push transport.
//!
//! A push backend addresses each chapter's collection by path
//! (`comments/chapter_<N>`, `reviews/chapter_<N>`) and reports changes either
//! as single "item added" events or as "value changed" events carrying the
//! whole collection. Delivery is at-least-once and ordered per chapter, so
//! [`RemoteLog`] folds both shapes into one rule: every delivery produces a
//! complete replacement snapshot for its chapter, and items are identified by
//! their push key so replays are harmless.

use crate::log::{LogBackend, LogRecord, log_path};
use std::{cell::RefCell, collections::HashMap, rc::Rc};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum Delivery<R> {
    Added { key: String, record: R },
    Value(Vec<(String, R)>),
}

/// A locally submitted record waiting to be pushed by the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct Outgoing<R> {
    pub path: String,
    pub key: String,
    pub record: R,
}

/// Shared queue between a [`RemoteLog`] and the transport that pushes its
/// records upstream.
#[derive(Debug)]
pub struct Outbox<R> {
    queue: Rc<RefCell<Vec<Outgoing<R>>>>,
}

impl<R> Clone for Outbox<R> {
    fn clone(&self) -> Self {
        Self {
            queue: Rc::clone(&self.queue),
        }
    }
}

impl<R> Default for Outbox<R> {
    fn default() -> Self {
        Self {
            queue: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl<R> Outbox<R> {
    /// Records queued since the last drain, oldest first.
    pub fn drain(&self) -> Vec<Outgoing<R>> {
        std::mem::take(&mut *self.queue.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    fn push(&self, outgoing: Outgoing<R>) {
        self.queue.borrow_mut().push(outgoing);
    }
}

#[derive(Debug)]
pub struct RemoteLog<R> {
    snapshots: HashMap<usize, Vec<(String, R)>>,
    outbox: Outbox<R>,
    sequence: u64,
}

impl<R> Default for RemoteLog<R> {
    fn default() -> Self {
        Self {
            snapshots: HashMap::new(),
            outbox: Outbox::default(),
            sequence: 0,
        }
    }
}

impl<R: LogRecord> RemoteLog<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outbox(&self) -> Outbox<R> {
        self.outbox.clone()
    }

    pub fn keys(&self, chapter: usize) -> Vec<String> {
        self.snapshots
            .get(&chapter)
            .map(|items| items.iter().map(|(key, _)| key.clone()).collect())
            .unwrap_or_default()
    }

    fn next_key(&mut self) -> String {
        self.sequence += 1;
        let millis = chrono::Utc::now().timestamp_millis().max(0) as u64;
        format!("-{:012x}{:06x}", millis, self.sequence)
    }

    fn replace(&mut self, chapter: usize, items: Vec<(String, R)>) -> bool {
        let path = log_path::<R>(chapter);
        let items: Vec<(String, R)> = items
            .into_iter()
            .filter(|(key, record)| {
                let valid = record.is_valid();
                if !valid {
                    warn!("Dropping invalid pushed record {} at {}", key, path);
                }
                valid
            })
            .collect();

        let changed = self
            .snapshots
            .get(&chapter)
            .map(|old| {
                old.len() != items.len()
                    || old.iter().zip(&items).any(|((a, _), (b, _))| a != b)
            })
            .unwrap_or(!items.is_empty());

        debug!("Snapshot for {} now holds {} items", path, items.len());
        self.snapshots.insert(chapter, items);
        changed
    }
}

impl<R: LogRecord> LogBackend<R> for RemoteLog<R> {
    fn entries(&self, chapter: usize) -> Vec<R> {
        self.snapshots
            .get(&chapter)
            .map(|items| items.iter().map(|(_, record)| record.clone()).collect())
            .unwrap_or_default()
    }

    fn append(&mut self, chapter: usize, record: R) {
        let key = self.next_key();
        self.outbox.push(Outgoing {
            path: log_path::<R>(chapter),
            key: key.clone(),
            record: record.clone(),
        });
        self.ingest(chapter, Delivery::Added { key, record });
    }

    fn ingest(&mut self, chapter: usize, delivery: Delivery<R>) -> bool {
        match delivery {
            Delivery::Value(items) => self.replace(chapter, items),
            Delivery::Added { key, record } => {
                let mut items = self.snapshots.get(&chapter).cloned().unwrap_or_default();
                if items.iter().any(|(known, _)| *known == key) {
                    debug!("Ignoring replayed item {} for chapter {}", key, chapter);
                    return false;
                }
                items.push((key, record));
                self.replace(chapter, items)
            }
        }
    }
}
