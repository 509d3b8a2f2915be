use crate::{
    constants::{
        DARK_KEY, DEFAULT_FONT_SIZE, FONT_KEY, INFINITE_KEY, MAX_FONT_SIZE, MIN_FONT_SIZE,
        PANEL_POSITION_KEY,
    },
    events::{ListenerId, Observers},
    store::Store,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelPosition {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub font_size: u8,
    pub dark_mode: bool,
    pub comic_mode: bool,
    pub infinite_mode: bool,
    pub panel_position: Option<PanelPosition>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE,
            dark_mode: false,
            comic_mode: false,
            infinite_mode: false,
            panel_position: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsEvent {
    FontSize(u8),
    DarkMode(bool),
    ComicMode(bool),
    InfiniteMode(bool),
    PanelMoved(PanelPosition),
}

pub fn clamp_font_size(size: i64) -> u8 {
    size.clamp(i64::from(MIN_FONT_SIZE), i64::from(MAX_FONT_SIZE)) as u8
}

/// Process-wide display preferences. Every mutator persists its value and
/// then tells the subscribed listeners.
#[derive(Debug)]
pub struct SettingsController {
    settings: Settings,
    store: Store,
    observers: Observers<SettingsEvent>,
}

impl SettingsController {
    pub fn load(store: Store) -> Self {
        let defaults = Settings::default();
        let settings = Settings {
            font_size: store
                .get_parsed::<i64>(FONT_KEY)
                .map(clamp_font_size)
                .unwrap_or(defaults.font_size),
            dark_mode: store.get_bool(DARK_KEY).unwrap_or(defaults.dark_mode),
            // Comic mode lasts for the session only.
            comic_mode: defaults.comic_mode,
            infinite_mode: store.get_bool(INFINITE_KEY).unwrap_or(defaults.infinite_mode),
            panel_position: store.get_json(PANEL_POSITION_KEY),
        };
        debug!("Loaded settings: {:?}", settings);

        Self {
            settings,
            store,
            observers: Observers::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&SettingsEvent) + 'static) -> ListenerId {
        self.observers.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn adjust_font(&mut self, delta: i32) -> u8 {
        let size = clamp_font_size(i64::from(self.settings.font_size) + i64::from(delta));
        self.settings.font_size = size;
        self.store.set_display(FONT_KEY, &size);
        self.observers.emit(&SettingsEvent::FontSize(size));
        size
    }

    pub fn toggle_dark_mode(&mut self) -> bool {
        let enabled = !self.settings.dark_mode;
        self.settings.dark_mode = enabled;
        self.store.set_display(DARK_KEY, &enabled);
        self.observers.emit(&SettingsEvent::DarkMode(enabled));
        enabled
    }

    pub fn toggle_comic_mode(&mut self) -> bool {
        let enabled = !self.settings.comic_mode;
        self.settings.comic_mode = enabled;
        self.observers.emit(&SettingsEvent::ComicMode(enabled));
        enabled
    }

    pub fn toggle_infinite_mode(&mut self) -> bool {
        let enabled = !self.settings.infinite_mode;
        self.settings.infinite_mode = enabled;
        self.store.set_display(INFINITE_KEY, &enabled);
        self.observers.emit(&SettingsEvent::InfiniteMode(enabled));
        enabled
    }

    pub fn move_panel(&mut self, position: PanelPosition) {
        self.settings.panel_position = Some(position);
        self.store.set_json(PANEL_POSITION_KEY, &position);
        self.observers.emit(&SettingsEvent::PanelMoved(position));
    }
}
