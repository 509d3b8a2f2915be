use crate::{
    constants::{COMMENTS_KEY_PREFIX, COMMENTS_PATH_PREFIX},
    error::{Field, ValidationError},
    events::SubscriptionId,
    feed::Delivery,
    log::{LocalLog, LogBackend, LogRecord, comment_timestamp},
    store::Store,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub name: String,
    pub text: String,
    #[serde(rename = "time", default)]
    pub timestamp: String,
}

impl LogRecord for Comment {
    const KEY_PREFIX: &'static str = COMMENTS_KEY_PREFIX;
    const PATH_PREFIX: &'static str = COMMENTS_PATH_PREFIX;

    fn is_valid(&self) -> bool {
        !self.name.trim().is_empty() && !self.text.trim().is_empty()
    }
}

struct CommentSubscription {
    id: SubscriptionId,
    chapter: usize,
    delivered: usize,
    on_comment: Box<dyn FnMut(&Comment)>,
}

/// Append-only comment threads, one per chapter, with a single live
/// subscription that replays the thread before streaming new comments.
pub struct CommentThreadService {
    log: Box<dyn LogBackend<Comment>>,
    active: Option<CommentSubscription>,
    next_id: u64,
}

impl CommentThreadService {
    pub fn new(log: impl LogBackend<Comment> + 'static) -> Self {
        Self {
            log: Box::new(log),
            active: None,
            next_id: 0,
        }
    }

    pub fn local(store: Store) -> Self {
        Self::new(LocalLog::<Comment>::new(store))
    }

    pub fn entries(&self, chapter: usize) -> Vec<Comment> {
        self.log.entries(chapter)
    }

    pub fn subscribe(
        &mut self,
        chapter: usize,
        on_comment: impl FnMut(&Comment) + 'static,
    ) -> SubscriptionId {
        self.unsubscribe();

        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        debug!("Comment subscription {:?} opened for chapter {}", id, chapter);

        self.active = Some(CommentSubscription {
            id,
            chapter,
            delivered: 0,
            on_comment: Box::new(on_comment),
        });
        self.deliver_pending();
        id
    }

    pub fn unsubscribe(&mut self) -> bool {
        match self.active.take() {
            Some(subscription) => {
                debug!(
                    "Comment subscription {:?} closed for chapter {}",
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

    pub fn post(&mut self, chapter: usize, name: &str, text: &str) -> Result<Comment, ValidationError> {
        let name = name.trim();
        let text = text.trim();

        if name.is_empty() {
            warn!("Rejected comment for chapter {}: empty name", chapter);
            return Err(ValidationError::EmptyField(Field::Name));
        }
        if text.is_empty() {
            warn!("Rejected comment for chapter {}: empty text", chapter);
            return Err(ValidationError::EmptyField(Field::Text));
        }

        let comment = Comment {
            name: name.to_string(),
            text: text.to_string(),
            timestamp: comment_timestamp(),
        };
        self.log.append(chapter, comment.clone());
        info!("Comment by '{}' added to chapter {}", comment.name, chapter);

        if self.active_chapter() == Some(chapter) {
            self.deliver_pending();
        }
        Ok(comment)
    }

    /// Applies a realtime delivery; the live subscription only sees comments
    /// it has not been handed before.
    pub fn ingest(&mut self, chapter: usize, delivery: Delivery<Comment>) -> bool {
        let changed = self.log.ingest(chapter, delivery);
        if changed && self.active_chapter() == Some(chapter) {
            self.deliver_pending();
        }
        changed
    }

    fn deliver_pending(&mut self) {
        let Some(subscription) = self.active.as_mut() else {
            return;
        };

        let entries = self.log.entries(subscription.chapter);
        if entries.len() < subscription.delivered {
            warn!(
                "Comment snapshot for chapter {} shrank from {} to {}",
                subscription.chapter,
                subscription.delivered,
                entries.len()
            );
            subscription.delivered = entries.len();
        }

        for comment in &entries[subscription.delivered..] {
            (subscription.on_comment)(comment);
        }
        subscription.delivered = entries.len();
    }
}

impl std::fmt::Debug for CommentThreadService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommentThreadService")
            .field("active_chapter", &self.active_chapter())
            .finish_non_exhaustive()
    }
}
