use crate::{feed::Delivery, store::Store};
use serde::{Serialize, de::DeserializeOwned};
use std::marker::PhantomData;
use tracing::{debug, warn};

/// A record kept in an append-only per-chapter log.
pub trait LogRecord: Clone + Serialize + DeserializeOwned + 'static {
    /// Local store key prefix; the chapter index is appended.
    const KEY_PREFIX: &'static str;
    /// Realtime transport path prefix; the chapter index is appended.
    const PATH_PREFIX: &'static str;

    fn is_valid(&self) -> bool {
        true
    }
}

pub fn log_key<R: LogRecord>(chapter: usize) -> String {
    format!("{}{}", R::KEY_PREFIX, chapter)
}

pub fn log_path<R: LogRecord>(chapter: usize) -> String {
    format!("{}{}", R::PATH_PREFIX, chapter)
}

/// Where a chapter log lives. Entries come back in arrival order.
pub trait LogBackend<R: LogRecord> {
    fn entries(&self, chapter: usize) -> Vec<R>;

    fn append(&mut self, chapter: usize, record: R);

    /// Applies a push delivery. Returns whether the chapter's snapshot changed.
    fn ingest(&mut self, chapter: usize, delivery: Delivery<R>) -> bool;
}

/// Log stored as a JSON array under `<prefix><chapter>` in the local store.
#[derive(Debug)]
pub struct LocalLog<R> {
    store: Store,
    _record: PhantomData<R>,
}

impl<R: LogRecord> LocalLog<R> {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }
}

impl<R: LogRecord> LogBackend<R> for LocalLog<R> {
    fn entries(&self, chapter: usize) -> Vec<R> {
        let key = log_key::<R>(chapter);
        let Some(raw) = self.store.get_json::<Vec<serde_json::Value>>(&key) else {
            return Vec::new();
        };

        raw.into_iter()
            .enumerate()
            .filter_map(|(position, value)| match serde_json::from_value::<R>(value) {
                Ok(record) if record.is_valid() => Some(record),
                Ok(_) => {
                    warn!("Skipping invalid entry {} in '{}'", position, key);
                    None
                }
                Err(e) => {
                    warn!("Skipping unreadable entry {} in '{}': {}", position, key, e);
                    None
                }
            })
            .collect()
    }

    /// Earlier entries are written back exactly as they were read, including
    /// ones the read path skips.
    fn append(&mut self, chapter: usize, record: R) {
        let key = log_key::<R>(chapter);
        let value = match serde_json::to_value(&record) {
            Ok(value) => value,
            Err(e) => {
                warn!("Dropped entry for '{}': {}", key, e);
                return;
            }
        };

        let mut raw = self
            .store
            .get_json::<Vec<serde_json::Value>>(&key)
            .unwrap_or_default();
        raw.push(value);
        debug!("Appending entry {} to '{}'", raw.len(), key);
        self.store.set_json(&key, &raw);
    }

    fn ingest(&mut self, chapter: usize, _delivery: Delivery<R>) -> bool {
        warn!(
            "Ignoring push delivery for chapter {}: log is stored locally",
            chapter
        );
        false
    }
}

pub fn comment_timestamp() -> String {
    chrono::Local::now()
        .format(crate::constants::COMMENT_TIME_FORMAT)
        .to_string()
}

pub fn review_timestamp() -> String {
    chrono::Local::now()
        .format(crate::constants::REVIEW_TIME_FORMAT)
        .to_string()
}
