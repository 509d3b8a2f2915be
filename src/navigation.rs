use crate::{
    constants::CHAPTER_KEY,
    error::ReaderError,
    events::{ListenerId, Observers},
    store::Store,
};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChapterChanged {
    pub index: usize,
}

/// Owns the current chapter index. Requests outside `[0, chapter_count)`
/// snap to the nearest bound.
#[derive(Debug)]
pub struct NavigationController {
    current: usize,
    chapter_count: usize,
    store: Store,
    observers: Observers<ChapterChanged>,
}

impl NavigationController {
    pub fn new(chapter_count: usize, store: Store) -> Result<Self, ReaderError> {
        if chapter_count == 0 {
            return Err(ReaderError::NoChapters);
        }

        let current = match store.get_parsed::<usize>(CHAPTER_KEY) {
            Some(index) if index < chapter_count => index,
            Some(index) => {
                debug!(
                    "Persisted chapter {} out of range for {} chapters, starting at 0",
                    index, chapter_count
                );
                0
            }
            None => 0,
        };

        info!("Navigation starts at chapter {} of {}", current, chapter_count);

        Ok(Self {
            current,
            chapter_count,
            store,
            observers: Observers::new(),
        })
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn chapter_count(&self) -> usize {
        self.chapter_count
    }

    pub fn clamp(&self, index: isize) -> usize {
        let last = self.chapter_count - 1;
        if index < 0 {
            0
        } else {
            (index as usize).min(last)
        }
    }

    pub fn set_chapter(&mut self, index: isize) -> usize {
        let clamped = self.clamp(index);
        if clamped as isize != index {
            debug!("Chapter request {} clamped to {}", index, clamped);
        }

        self.current = clamped;
        self.store.set_display(CHAPTER_KEY, &clamped);
        self.observers.emit(&ChapterChanged { index: clamped });
        clamped
    }

    pub fn step(&mut self, delta: isize) -> usize {
        let target = (self.current as isize).saturating_add(delta);
        self.set_chapter(target)
    }

    pub fn next(&mut self) -> usize {
        self.step(1)
    }

    pub fn previous(&mut self) -> usize {
        self.step(-1)
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 == self.chapter_count
    }

    /// Fraction of the book reached, counting the current chapter as read.
    pub fn progress(&self) -> f64 {
        (self.current + 1) as f64 / self.chapter_count as f64
    }

    pub fn on_change(&mut self, listener: impl FnMut(&ChapterChanged) + 'static) -> ListenerId {
        self.observers.subscribe(listener)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.observers.unsubscribe(id)
    }
}
