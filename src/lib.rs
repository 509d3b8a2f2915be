pub mod comments;
pub mod constants;
pub mod content;
pub mod error;
pub mod events;
pub mod feed;
pub mod log;
pub mod navigation;
pub mod reviews;
pub mod scroll;
pub mod session;
pub mod settings;
pub mod store;
pub mod ui;
pub mod view;

pub use comments::{Comment, CommentThreadService};
pub use content::{Book, Chapter};
pub use error::{ContentError, Field, ReaderError, StoreError, UiError, ValidationError};
pub use feed::{Delivery, Outbox, Outgoing, RemoteLog};
pub use log::{LocalLog, LogBackend, LogRecord};
pub use navigation::{ChapterChanged, NavigationController};
pub use reviews::{AggregateRating, Review, ReviewAggregationService, TopRated};
pub use scroll::ScrollMemory;
pub use session::ReaderSession;
pub use settings::{PanelPosition, Settings, SettingsController, SettingsEvent};
pub use store::{FileStore, MemoryStore, PersistentStore, Store};
pub use ui::App;
pub use view::{ChapterView, LatestView, ReviewPanel, ViewNotifier};
