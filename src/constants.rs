use std::time::Duration;

// Persisted keys
pub const CHAPTER_KEY: &str = "chapter";
pub const SCROLL_KEY_PREFIX: &str = "scroll";
pub const FONT_KEY: &str = "font";
pub const DARK_KEY: &str = "dark";
pub const INFINITE_KEY: &str = "infinite";
pub const PANEL_POSITION_KEY: &str = "floatingPos";
pub const COMMENTS_KEY_PREFIX: &str = "comments_chapter_";
pub const REVIEWS_KEY_PREFIX: &str = "reviews_chapter_";

// Realtime transport paths
pub const COMMENTS_PATH_PREFIX: &str = "comments/chapter_";
pub const REVIEWS_PATH_PREFIX: &str = "reviews/chapter_";

// Scroll memory
pub const SCROLL_QUIET_WINDOW: Duration = Duration::from_millis(200);

// Display settings
pub const MIN_FONT_SIZE: u8 = 14;
pub const MAX_FONT_SIZE: u8 = 22;
pub const DEFAULT_FONT_SIZE: u8 = 16;

// Reviews
pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;
pub const ACCLAIMED_AVERAGE: f64 = 4.0;
pub const EMPTY_REVIEW_TEXT: &str = "No written review";

// Timestamps
pub const COMMENT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const REVIEW_TIME_FORMAT: &str = "%Y-%m-%d";

// Host content parsing
pub const MIN_CONTENT_LENGTH: usize = 50;
pub const HTML_TEXT_WIDTH: usize = 80;
pub const MAX_BOOK_SIZE: u64 = 100 * 1024 * 1024; // 100MB
pub const MAX_CHAPTER_SIZE: usize = 5 * 1024 * 1024; // 5MB
pub const MAX_DECOMPRESSED_RATIO: usize = 100; // Max 100x compression ratio
pub const CHAPTER_CACHE_SIZE: usize = 5;

// UI
pub const HEADER_HEIGHT: u16 = 4;
pub const FOOTER_HEIGHT: u16 = 3;
// Header, footer and the content block's borders
pub const UI_RESERVED_HEIGHT: usize = (HEADER_HEIGHT + FOOTER_HEIGHT + 2) as usize;
pub const DEFAULT_TERMINAL_HEIGHT: usize = 24;
pub const SIDE_PANEL_PERCENT: u16 = 38;
pub const MAX_COMMENT_PREVIEW: usize = 240;
pub const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(250);

// Files
pub const DATA_DIR_NAME: &str = "novella";
pub const LOG_FILE_NAME: &str = "novella.log";
pub const STORE_FILE_EXTENSION: &str = "json";
