//! Per-chapter star reviews and the aggregates derived from them.
//!
//! Review logs are append-only. Every aggregate here (average, best review,
//! top-rated chapter) is recomputed from the log on each query, so it always
//! matches what the log holds.

use crate::{
    constants::{
        ACCLAIMED_AVERAGE, MAX_RATING, MIN_RATING, REVIEWS_KEY_PREFIX, REVIEWS_PATH_PREFIX,
    },
    error::ValidationError,
    events::SubscriptionId,
    feed::Delivery,
    log::{LocalLog, LogBackend, LogRecord, review_timestamp},
    store::Store,
};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub rating: u8,
    #[serde(default)]
    pub text: String,
    #[serde(rename = "time", default)]
    pub timestamp: String,
}

impl Review {
    /// Length used for tie-breaking, in characters. Missing text counts as 0.
    pub fn text_len(&self) -> usize {
        self.text.chars().count()
    }
}

impl LogRecord for Review {
    const KEY_PREFIX: &'static str = REVIEWS_KEY_PREFIX;
    const PATH_PREFIX: &'static str = REVIEWS_PATH_PREFIX;

    fn is_valid(&self) -> bool {
        is_valid_rating(self.rating)
    }
}

pub fn is_valid_rating(rating: u8) -> bool {
    (MIN_RATING..=MAX_RATING).contains(&rating)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateRating {
    pub count: usize,
    pub average: f64,
}

impl AggregateRating {
    pub fn label(&self) -> String {
        let noun = if self.count == 1 { "review" } else { "reviews" };
        format!("⭐ {:.1} / 5 ({} {})", self.average, self.count, noun)
    }

    pub fn is_acclaimed(&self) -> bool {
        self.average >= ACCLAIMED_AVERAGE
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopRated {
    pub chapter: usize,
    pub average: f64,
}

/// Count and mean rating of a log; `None` when the log is empty.
pub fn aggregate(reviews: &[Review]) -> Option<AggregateRating> {
    if reviews.is_empty() {
        return None;
    }
    let total: u64 = reviews.iter().map(|review| u64::from(review.rating)).sum();
    Some(AggregateRating {
        count: reviews.len(),
        average: total as f64 / reviews.len() as f64,
    })
}

/// Position of the best review: highest rating, then longest text. Both
/// comparisons are strict, so the earliest entry wins a full tie.
pub fn best_review_index(reviews: &[Review]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (index, current) in reviews.iter().enumerate() {
        best = match best {
            None => Some(index),
            Some(incumbent) => {
                let held = &reviews[incumbent];
                if current.rating > held.rating
                    || (current.rating == held.rating && current.text_len() > held.text_len())
                {
                    Some(index)
                } else {
                    Some(incumbent)
                }
            }
        };
    }
    best
}

pub fn best_review(reviews: &[Review]) -> Option<&Review> {
    best_review_index(reviews).map(|index| &reviews[index])
}

/// Scans chapter logs in index order. Empty logs are skipped, and a later
/// chapter only takes over with a strictly greater average.
pub fn top_rated_chapter<'a, I>(logs: I) -> Option<TopRated>
where
    I: IntoIterator<Item = &'a [Review]>,
{
    top_rated_chapter_held(logs, None)
}

/// Like [`top_rated_chapter`], but a chapter that already holds the title
/// keeps it until another chapter's average is strictly greater.
pub fn top_rated_chapter_held<'a, I>(logs: I, incumbent: Option<usize>) -> Option<TopRated>
where
    I: IntoIterator<Item = &'a [Review]>,
{
    let logs: Vec<&[Review]> = logs.into_iter().collect();
    let mut top: Option<TopRated> = incumbent.and_then(|chapter| {
        let summary = aggregate(logs.get(chapter)?)?;
        Some(TopRated {
            chapter,
            average: summary.average,
        })
    });

    for (chapter, log) in logs.iter().enumerate() {
        let Some(summary) = aggregate(log) else {
            continue;
        };
        if top.is_none_or(|held| summary.average > held.average) {
            top = Some(TopRated {
                chapter,
                average: summary.average,
            });
        }
    }
    top
}

struct ReviewSubscription {
    id: SubscriptionId,
    chapter: usize,
    on_update: Box<dyn FnMut(&[Review])>,
}

pub struct ReviewAggregationService {
    log: Box<dyn LogBackend<Review>>,
    active: Option<ReviewSubscription>,
    next_id: u64,
    top_rated: Cell<Option<usize>>,
}

impl ReviewAggregationService {
    pub fn new(log: impl LogBackend<Review> + 'static) -> Self {
        Self {
            log: Box::new(log),
            active: None,
            next_id: 0,
            top_rated: Cell::new(None),
        }
    }

    pub fn local(store: Store) -> Self {
        Self::new(LocalLog::<Review>::new(store))
    }

    pub fn entries(&self, chapter: usize) -> Vec<Review> {
        self.log.entries(chapter)
    }

    /// Replaces any live subscription. `on_update` receives the full log now
    /// and again after every change to it.
    pub fn subscribe(
        &mut self,
        chapter: usize,
        on_update: impl FnMut(&[Review]) + 'static,
    ) -> SubscriptionId {
        self.unsubscribe();

        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        debug!("Review subscription {:?} opened for chapter {}", id, chapter);

        self.active = Some(ReviewSubscription {
            id,
            chapter,
            on_update: Box::new(on_update),
        });
        self.publish();
        id
    }

    pub fn unsubscribe(&mut self) -> bool {
        match self.active.take() {
            Some(subscription) => {
                debug!(
                    "Review subscription {:?} closed for chapter {}",
                    subscription.id, subscription.chapter
                );
                true
            }
            None => false,
        }
    }

    pub fn active_chapter(&self) -> Option<usize> {
        self.active.as_ref().map(|subscription| subscription.chapter)
    }

    pub fn is_active(&self, id: SubscriptionId) -> bool {
        self.active
            .as_ref()
            .is_some_and(|subscription| subscription.id == id)
    }

    pub fn submit(&mut self, chapter: usize, rating: u8, text: &str) -> Result<Review, ValidationError> {
        if !is_valid_rating(rating) {
            warn!("Rejected review for chapter {}: rating {}", chapter, rating);
            return Err(ValidationError::InvalidRating(rating));
        }

        let review = Review {
            rating,
            text: text.trim().to_string(),
            timestamp: review_timestamp(),
        };
        self.log.append(chapter, review.clone());
        info!("{}-star review added to chapter {}", rating, chapter);

        if self.active_chapter() == Some(chapter) {
            self.publish();
        }
        Ok(review)
    }

    pub fn ingest(&mut self, chapter: usize, delivery: Delivery<Review>) -> bool {
        let changed = self.log.ingest(chapter, delivery);
        if changed && self.active_chapter() == Some(chapter) {
            self.publish();
        }
        changed
    }

    pub fn average(&self, chapter: usize) -> Option<AggregateRating> {
        aggregate(&self.log.entries(chapter))
    }

    pub fn best_review(&self, chapter: usize) -> Option<Review> {
        best_review(&self.log.entries(chapter)).cloned()
    }

    /// Recomputed from every chapter log on each call. The chapter returned
    /// last time is remembered so an equal average elsewhere cannot unseat it.
    pub fn top_rated_chapter(&self, chapter_count: usize) -> Option<TopRated> {
        let logs: Vec<Vec<Review>> = (0..chapter_count)
            .map(|chapter| self.log.entries(chapter))
            .collect();
        let top = top_rated_chapter_held(logs.iter().map(Vec::as_slice), self.top_rated.get());
        if top.map(|t| t.chapter) != self.top_rated.get() {
            debug!("Top-rated chapter is now {:?}", top.map(|t| t.chapter));
        }
        self.top_rated.set(top.map(|t| t.chapter));
        top
    }

    fn publish(&mut self) {
        let Some(subscription) = self.active.as_mut() else {
            return;
        };
        let entries = self.log.entries(subscription.chapter);
        (subscription.on_update)(&entries);
    }
}

impl std::fmt::Debug for ReviewAggregationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReviewAggregationService")
            .field("active_chapter", &self.active_chapter())
            .finish_non_exhaustive()
    }
}
