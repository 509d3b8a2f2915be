use crate::{
    comments::Comment,
    constants::EMPTY_REVIEW_TEXT,
    reviews::{AggregateRating, Review, aggregate, best_review_index},
};
use std::{cell::RefCell, rc::Rc};
use unicode_segmentation::UnicodeSegmentation;

/// Receives a freshly materialized view after every state change that affects
/// what the reader sees.
pub trait ViewNotifier {
    fn render(&mut self, view: &ChapterView);
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewPanel {
    pub best: Option<Review>,
    /// Every other review in arrival order.
    pub others: Vec<Review>,
    /// `None` means no rating line should be shown at all.
    pub summary: Option<AggregateRating>,
    pub top_rated: bool,
    pub acclaimed: bool,
}

impl ReviewPanel {
    pub fn from_log(reviews: &[Review], top_rated: bool) -> Self {
        let best_index = best_review_index(reviews);
        let summary = aggregate(reviews);
        Self {
            best: best_index.map(|index| reviews[index].clone()),
            others: reviews
                .iter()
                .enumerate()
                .filter(|(index, _)| Some(*index) != best_index)
                .map(|(_, review)| review.clone())
                .collect(),
            summary,
            top_rated,
            acclaimed: summary.is_some_and(|s| s.is_acclaimed()),
        }
    }

    pub fn rating_label(&self) -> Option<String> {
        self.summary.map(|summary| summary.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChapterView {
    pub index: usize,
    pub title: String,
    pub chapter_count: usize,
    pub progress: f64,
    pub scroll_offset: Option<usize>,
    pub comments: Vec<Comment>,
    pub reviews: ReviewPanel,
}

pub fn display_text(review: &Review) -> &str {
    if review.text.trim().is_empty() {
        EMPTY_REVIEW_TEXT
    } else {
        &review.text
    }
}

pub fn avatar_initial(name: &str) -> String {
    name.trim()
        .graphemes(true)
        .next()
        .map(|grapheme| grapheme.to_uppercase())
        .unwrap_or_else(|| "?".to_string())
}

pub fn stars(rating: u8) -> String {
    "★".repeat(usize::from(rating))
}

/// Notifier that keeps the latest view for whoever renders it next.
#[derive(Debug, Clone, Default)]
pub struct LatestView {
    slot: Rc<RefCell<Option<ChapterView>>>,
    renders: Rc<RefCell<usize>>,
}

impl LatestView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<ChapterView> {
        self.slot.borrow().clone()
    }

    pub fn render_count(&self) -> usize {
        *self.renders.borrow()
    }
}

impl ViewNotifier for LatestView {
    fn render(&mut self, view: &ChapterView) {
        *self.slot.borrow_mut() = Some(view.clone());
        *self.renders.borrow_mut() += 1;
    }
}
