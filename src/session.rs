use crate::{
    comments::{Comment, CommentThreadService},
    constants::MAX_RATING,
    content::Chapter,
    error::{ReaderError, ValidationError},
    events::ListenerId,
    feed::Delivery,
    navigation::{ChapterChanged, NavigationController},
    reviews::{AggregateRating, Review, ReviewAggregationService, TopRated},
    scroll::ScrollMemory,
    settings::SettingsController,
    store::Store,
    view::{ChapterView, ReviewPanel, ViewNotifier},
};
use std::{cell::RefCell, rc::Rc, time::Instant};
use tracing::{debug, info};

/// Ties the reading state and both chapter services together.
///
/// Changing chapter runs the whole refresh cascade: persist the index,
/// restore the scroll offset, move both subscriptions to the new chapter and
/// hand the notifier a fresh view.
pub struct ReaderSession {
    chapters: Vec<Chapter>,
    store: Store,
    navigation: NavigationController,
    scroll: ScrollMemory,
    comments: CommentThreadService,
    reviews: ReviewAggregationService,
    settings: SettingsController,
    selected_rating: u8,
    restored_offset: Option<usize>,
    thread: Rc<RefCell<Vec<Comment>>>,
    review_log: Rc<RefCell<Vec<Review>>>,
    notifier: Box<dyn ViewNotifier>,
}

impl ReaderSession {
    /// Session whose comment and review logs live in `store`.
    pub fn open(
        chapters: Vec<Chapter>,
        store: Store,
        notifier: impl ViewNotifier + 'static,
    ) -> Result<Self, ReaderError> {
        let comments = CommentThreadService::local(store.clone());
        let reviews = ReviewAggregationService::local(store.clone());
        Self::with_services(chapters, store, comments, reviews, notifier)
    }

    pub fn with_services(
        chapters: Vec<Chapter>,
        store: Store,
        comments: CommentThreadService,
        reviews: ReviewAggregationService,
        notifier: impl ViewNotifier + 'static,
    ) -> Result<Self, ReaderError> {
        let navigation = NavigationController::new(chapters.len(), store.clone())?;

        let mut session = Self {
            scroll: ScrollMemory::new(store.clone()),
            settings: SettingsController::load(store.clone()),
            chapters,
            store,
            navigation,
            comments,
            reviews,
            selected_rating: 0,
            restored_offset: None,
            thread: Rc::new(RefCell::new(Vec::new())),
            review_log: Rc::new(RefCell::new(Vec::new())),
            notifier: Box::new(notifier),
        };

        let start = session.navigation.current() as isize;
        session.set_chapter(start);
        Ok(session)
    }

    pub fn set_chapter(&mut self, index: isize) -> usize {
        let index = self.navigation.set_chapter(index);
        self.show(index);
        index
    }

    pub fn step(&mut self, delta: isize) -> usize {
        let index = self.navigation.step(delta);
        self.show(index);
        index
    }

    pub fn next_chapter(&mut self) -> usize {
        self.step(1)
    }

    pub fn previous_chapter(&mut self) -> usize {
        self.step(-1)
    }

    fn show(&mut self, index: usize) {
        info!("Showing chapter {}", index);
        self.restored_offset = self.scroll.restore(index);

        self.thread.borrow_mut().clear();
        let thread = Rc::clone(&self.thread);
        self.comments.subscribe(index, move |comment| {
            thread.borrow_mut().push(comment.clone());
        });

        let review_log = Rc::clone(&self.review_log);
        self.reviews.subscribe(index, move |reviews| {
            *review_log.borrow_mut() = reviews.to_vec();
        });

        self.refresh();
    }

    fn refresh(&mut self) {
        let view = self.view();
        self.notifier.render(&view);
    }

    pub fn view(&self) -> ChapterView {
        let index = self.navigation.current();
        let top_rated = self
            .top_rated_chapter()
            .is_some_and(|top| top.chapter == index);

        ChapterView {
            index,
            title: self.chapters[index].title.clone(),
            chapter_count: self.chapters.len(),
            progress: self.navigation.progress(),
            scroll_offset: self.restored_offset,
            comments: self.thread.borrow().clone(),
            reviews: ReviewPanel::from_log(&self.review_log.borrow(), top_rated),
        }
    }

    pub fn current_chapter(&self) -> usize {
        self.navigation.current()
    }

    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn is_last_chapter(&self) -> bool {
        self.navigation.is_last()
    }

    pub fn on_chapter_change(
        &mut self,
        listener: impl FnMut(&ChapterChanged) + 'static,
    ) -> ListenerId {
        self.navigation.on_change(listener)
    }

    pub fn on_scroll(&mut self, offset: usize, now: Instant) {
        self.scroll.on_scroll(self.navigation.current(), offset, now);
    }

    /// Persists scroll offsets whose quiet window has elapsed by `now`.
    pub fn tick(&mut self, now: Instant) -> usize {
        self.scroll.poll(now)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.scroll.next_deadline()
    }

    pub fn flush(&mut self) -> usize {
        self.scroll.flush()
    }

    pub fn restored_offset(&self) -> Option<usize> {
        self.restored_offset
    }

    pub fn post_comment(&mut self, name: &str, text: &str) -> Result<Comment, ValidationError> {
        let comment = self.comments.post(self.navigation.current(), name, text)?;
        self.refresh();
        Ok(comment)
    }

    pub fn select_rating(&mut self, rating: u8) {
        self.selected_rating = rating.min(MAX_RATING);
        debug!("Selected rating {}", self.selected_rating);
    }

    pub fn selected_rating(&self) -> u8 {
        self.selected_rating
    }

    /// Submits a review with the selected star rating, then clears the
    /// selection. Nothing is selected means `InvalidRating(0)`.
    pub fn submit_review(&mut self, text: &str) -> Result<Review, ValidationError> {
        let review = self.submit_review_with(self.selected_rating, text)?;
        self.selected_rating = 0;
        Ok(review)
    }

    pub fn submit_review_with(&mut self, rating: u8, text: &str) -> Result<Review, ValidationError> {
        let review = self.reviews.submit(self.navigation.current(), rating, text)?;
        self.refresh();
        Ok(review)
    }

    pub fn average(&self, chapter: usize) -> Option<AggregateRating> {
        self.reviews.average(chapter)
    }

    pub fn best_review(&self, chapter: usize) -> Option<Review> {
        self.reviews.best_review(chapter)
    }

    pub fn top_rated_chapter(&self) -> Option<TopRated> {
        self.reviews.top_rated_chapter(self.chapters.len())
    }

    pub fn ingest_comments(
        &mut self,
        chapter: usize,
        delivery: Delivery<Comment>,
    ) -> Result<bool, ReaderError> {
        self.check_chapter(chapter)?;
        let changed = self.comments.ingest(chapter, delivery);
        if changed && chapter == self.navigation.current() {
            self.refresh();
        }
        Ok(changed)
    }

    /// Review changes in any chapter can move the top-rated flag, so every
    /// change refreshes the view.
    pub fn ingest_reviews(
        &mut self,
        chapter: usize,
        delivery: Delivery<Review>,
    ) -> Result<bool, ReaderError> {
        self.check_chapter(chapter)?;
        let changed = self.reviews.ingest(chapter, delivery);
        if changed {
            self.refresh();
        }
        Ok(changed)
    }

    fn check_chapter(&self, chapter: usize) -> Result<(), ReaderError> {
        if chapter >= self.chapters.len() {
            return Err(ReaderError::ChapterOutOfRange {
                index: chapter,
                count: self.chapters.len(),
            });
        }
        Ok(())
    }

    pub fn settings(&self) -> &SettingsController {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SettingsController {
        &mut self.settings
    }

    pub fn comments(&self) -> &CommentThreadService {
        &self.comments
    }

    pub fn reviews(&self) -> &ReviewAggregationService {
        &self.reviews
    }

    pub fn store(&self) -> &Store {
        &self.store
    }
}

impl std::fmt::Debug for ReaderSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReaderSession")
            .field("chapter", &self.navigation.current())
            .field("chapters", &self.chapters.len())
            .field("selected_rating", &self.selected_rating)
            .finish_non_exhaustive()
    }
}
