use crate::{
    constants::{SCROLL_KEY_PREFIX, SCROLL_QUIET_WINDOW},
    store::Store,
};
use std::{
    collections::BTreeMap,
    time::{Duration, Instant},
};
use tracing::debug;

#[derive(Debug, Clone, Copy)]
struct PendingWrite {
    offset: usize,
    deadline: Instant,
}

/// Per-chapter scroll offsets with debounced persistence.
///
/// A burst of `on_scroll` calls for one chapter becomes a single write of the
/// latest offset once the chapter has been quiet for the whole window. The
/// owner drives time by calling [`ScrollMemory::poll`].
#[derive(Debug)]
pub struct ScrollMemory {
    store: Store,
    quiet_window: Duration,
    pending: BTreeMap<usize, PendingWrite>,
}

pub fn scroll_key(chapter: usize) -> String {
    format!("{}{}", SCROLL_KEY_PREFIX, chapter)
}

impl ScrollMemory {
    pub fn new(store: Store) -> Self {
        Self::with_quiet_window(store, SCROLL_QUIET_WINDOW)
    }

    pub fn with_quiet_window(store: Store, quiet_window: Duration) -> Self {
        Self {
            store,
            quiet_window,
            pending: BTreeMap::new(),
        }
    }

    pub fn on_scroll(&mut self, chapter: usize, offset: usize, now: Instant) {
        self.pending.insert(
            chapter,
            PendingWrite {
                offset,
                deadline: now + self.quiet_window,
            },
        );
    }

    pub fn poll(&mut self, now: Instant) -> usize {
        let due: Vec<usize> = self
            .pending
            .iter()
            .filter(|(_, write)| write.deadline <= now)
            .map(|(chapter, _)| *chapter)
            .collect();

        for chapter in &due {
            if let Some(write) = self.pending.remove(chapter) {
                self.persist(*chapter, write.offset);
            }
        }
        due.len()
    }

    pub fn flush(&mut self) -> usize {
        let pending = std::mem::take(&mut self.pending);
        for (chapter, write) in &pending {
            self.persist(*chapter, write.offset);
        }
        pending.len()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().map(|write| write.deadline).min()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Latest known offset: a write still waiting out its quiet window wins
    /// over the persisted value.
    pub fn restore(&self, chapter: usize) -> Option<usize> {
        if let Some(write) = self.pending.get(&chapter) {
            return Some(write.offset);
        }
        self.store.get_parsed(&scroll_key(chapter))
    }

    fn persist(&self, chapter: usize, offset: usize) {
        debug!("Persisting scroll offset {} for chapter {}", offset, chapter);
        self.store.set_display(&scroll_key(chapter), &offset);
    }
}
