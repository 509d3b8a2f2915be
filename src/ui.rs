use crate::constants::{
    DEFAULT_TERMINAL_HEIGHT, FOOTER_HEIGHT, HEADER_HEIGHT, IDLE_POLL_INTERVAL, MAX_COMMENT_PREVIEW, MAX_RATING, MIN_FONT_SIZE,
    SIDE_PANEL_PERCENT, UI_RESERVED_HEIGHT,
};
use crate::content::Book;
use crate::error::{ReaderError, UiError};
use crate::session::ReaderSession;
use crate::settings::{Settings, SettingsEvent};
use crate::store::Store;
use crate::view::{ChapterView, LatestView, avatar_initial, display_text, stars};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{cell::RefCell, io, rc::Rc, time::Instant};
use tracing::{debug, warn};
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormField {
    Name,
    Text,
}

#[derive(Debug)]
enum FloatingPane {
    None,
    Comment {
        name: String,
        text: String,
        field: FormField,
    },
    Review {
        text: String,
    },
    Contents {
        selected_index: usize,
    },
}

#[derive(Debug, Clone, Copy)]
struct Palette {
    text: Style,
    accent: Color,
    muted: Color,
}

impl Palette {
    fn for_settings(settings: &Settings) -> Self {
        let mut text = if settings.dark_mode {
            Style::default().fg(Color::Gray).bg(Color::Black)
        } else {
            Style::default().fg(Color::Black).bg(Color::White)
        };
        if settings.comic_mode {
            text = text.add_modifier(Modifier::ITALIC).fg(Color::Magenta);
        }
        Self {
            text,
            accent: if settings.dark_mode { Color::Cyan } else { Color::Blue },
            muted: Color::DarkGray,
        }
    }
}

pub struct App {
    book: Book,
    session: ReaderSession,
    view: LatestView,
    scroll_offset: usize,
    pane: FloatingPane,
    panel_collapsed: bool,
    status: Rc<RefCell<Option<String>>>,
    terminal_height: usize,
    terminal: Option<Terminal<CrosstermBackend<std::io::Stdout>>>,
}

impl App {
    pub fn new(book: Book, store: Store) -> Result<Self, ReaderError> {
        let view = LatestView::new();
        let mut session = ReaderSession::open(book.chapters().to_vec(), store, view.clone())?;

        let status = Rc::new(RefCell::new(None));
        let settings_status = Rc::clone(&status);
        session.settings_mut().subscribe(move |event| {
            let message = match event {
                SettingsEvent::FontSize(size) => format!("Font size {}", size),
                SettingsEvent::DarkMode(on) => format!("Dark mode {}", on_off(*on)),
                SettingsEvent::ComicMode(on) => format!("Comic mode {}", on_off(*on)),
                SettingsEvent::InfiniteMode(on) => format!("Infinite mode {}", on_off(*on)),
                SettingsEvent::PanelMoved(pos) => format!("Panel moved to {},{}", pos.x, pos.y),
            };
            *settings_status.borrow_mut() = Some(message);
        });

        let mut app = Self {
            book,
            session,
            view,
            scroll_offset: 0,
            pane: FloatingPane::None,
            panel_collapsed: false,
            status,
            terminal_height: DEFAULT_TERMINAL_HEIGHT,
            terminal: None,
        };
        app.sync_scroll_from_view();
        Ok(app)
    }

    // Public accessors for testing
    pub fn current_chapter(&self) -> usize {
        self.session.current_chapter()
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn session(&self) -> &ReaderSession {
        &self.session
    }

    pub fn status(&self) -> Option<String> {
        self.status.borrow().clone()
    }

    pub fn is_pane_open(&self) -> bool {
        !matches!(self.pane, FloatingPane::None)
    }

    pub fn is_panel_collapsed(&self) -> bool {
        self.panel_collapsed
    }

    pub fn run(&mut self) -> Result<(), UiError> {
        self.setup_terminal()?;

        loop {
            if let Some(terminal) = self.terminal.as_mut() {
                self.terminal_height = terminal.size()?.height as usize;
                let book = &self.book;
                let view = self.view.get();
                let settings = *self.session.settings().settings();
                let scroll_offset = self.scroll_offset;
                let pane = &self.pane;
                let panel_collapsed = self.panel_collapsed;
                let status = self.status.borrow().clone();
                let selected_rating = self.session.selected_rating();

                terminal.draw(|f| {
                    if let Some(view) = &view {
                        Self::draw_ui(
                            f,
                            book,
                            view,
                            &settings,
                            scroll_offset,
                            panel_collapsed,
                            status.as_deref(),
                        );
                        Self::render_floating_pane(f, pane, book, selected_rating);
                    }
                })?;
            }

            let now = Instant::now();
            let timeout = self
                .session
                .next_deadline()
                .map(|deadline| deadline.saturating_duration_since(now))
                .unwrap_or(IDLE_POLL_INTERVAL)
                .min(IDLE_POLL_INTERVAL);

            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press && !self.handle_key(key, Instant::now()) {
                        break;
                    }
                }
            }
            self.session.tick(Instant::now());
        }

        let flushed = self.session.flush();
        debug!("Flushed {} pending scroll writes on exit", flushed);
        self.cleanup_terminal()?;

        Ok(())
    }

    fn setup_terminal(&mut self) -> Result<(), UiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        self.terminal = Some(terminal);
        Ok(())
    }

    fn cleanup_terminal(&mut self) -> Result<(), UiError> {
        if let Some(mut terminal) = self.terminal.take() {
            disable_raw_mode()?;
            execute!(
                terminal.backend_mut(),
                LeaveAlternateScreen,
                DisableMouseCapture
            )?;
            terminal.show_cursor()?;
        }
        Ok(())
    }

    /// Applies one key press. Returns `false` when the reader should exit.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        if self.handle_floating_pane_input(key) {
            return true;
        }

        match key.code {
            KeyCode::Char('q') => return false,
            KeyCode::Down | KeyCode::Char('j') => self.scroll_by(1, now),
            KeyCode::Up | KeyCode::Char('k') => self.scroll_by(-1, now),
            KeyCode::PageDown | KeyCode::Char(' ') => {
                let page = self.page_size() as isize;
                self.scroll_by(page, now)
            }
            KeyCode::PageUp | KeyCode::Char('b') => {
                let page = self.page_size() as isize;
                self.scroll_by(-page, now)
            }
            KeyCode::Home | KeyCode::Char('g') => self.scroll_to(0, now),
            KeyCode::End | KeyCode::Char('G') => {
                let end = self.max_scroll();
                self.scroll_to(end, now)
            }
            KeyCode::Right | KeyCode::Char('l') => self.change_chapter(1),
            KeyCode::Left | KeyCode::Char('h') => self.change_chapter(-1),
            KeyCode::Char('c') => {
                self.pane = FloatingPane::Comment {
                    name: String::new(),
                    text: String::new(),
                    field: FormField::Name,
                }
            }
            KeyCode::Char('r') => self.pane = FloatingPane::Review { text: String::new() },
            KeyCode::Char('t') => {
                self.pane = FloatingPane::Contents {
                    selected_index: self.session.current_chapter(),
                }
            }
            KeyCode::Char('d') => {
                self.session.settings_mut().toggle_dark_mode();
            }
            KeyCode::Char('m') => {
                self.session.settings_mut().toggle_comic_mode();
            }
            KeyCode::Char('i') => {
                self.session.settings_mut().toggle_infinite_mode();
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.session.settings_mut().adjust_font(1);
            }
            KeyCode::Char('-') => {
                self.session.settings_mut().adjust_font(-1);
            }
            KeyCode::Tab => self.panel_collapsed = !self.panel_collapsed,
            _ => {}
        }
        true
    }

    fn set_status(&self, message: impl Into<String>) {
        *self.status.borrow_mut() = Some(message.into());
    }

    fn change_chapter(&mut self, delta: isize) {
        self.session.step(delta);
        self.sync_scroll_from_view();
    }

    fn sync_scroll_from_view(&mut self) {
        let restored = self
            .view
            .get()
            .and_then(|view| view.scroll_offset)
            .unwrap_or(0);
        self.scroll_offset = restored.min(self.max_scroll());
    }

    fn chapter_line_count(&self) -> usize {
        match self.book.chapter_text(self.session.current_chapter()) {
            Ok(text) => text.lines().count(),
            Err(e) => {
                warn!("Chapter {} unavailable: {}", self.session.current_chapter(), e);
                0
            }
        }
    }

    fn page_size(&self) -> usize {
        self.terminal_height.saturating_sub(UI_RESERVED_HEIGHT).max(1)
    }

    fn max_scroll(&self) -> usize {
        self.chapter_line_count().saturating_sub(self.page_size())
    }

    fn scroll_by(&mut self, delta: isize, now: Instant) {
        let max_scroll = self.max_scroll();
        let infinite = self.session.settings().settings().infinite_mode;

        if delta > 0 && self.scroll_offset >= max_scroll {
            if infinite && !self.session.is_last_chapter() {
                self.session.next_chapter();
                self.scroll_offset = 0;
                self.session.on_scroll(0, now);
            }
            return;
        }

        let target = (self.scroll_offset as isize).saturating_add(delta).max(0) as usize;
        self.scroll_to(target.min(max_scroll), now);
    }

    fn scroll_to(&mut self, offset: usize, now: Instant) {
        if offset != self.scroll_offset {
            self.scroll_offset = offset;
            self.session.on_scroll(offset, now);
        }
    }

    fn handle_floating_pane_input(&mut self, key: KeyEvent) -> bool {
        let pane = std::mem::replace(&mut self.pane, FloatingPane::None);

        match pane {
            FloatingPane::None => false,
            FloatingPane::Comment {
                mut name,
                mut text,
                field,
            } => {
                let active = match field {
                    FormField::Name => &mut name,
                    FormField::Text => &mut text,
                };
                match key.code {
                    KeyCode::Esc => return true,
                    KeyCode::Tab => {
                        let field = match field {
                            FormField::Name => FormField::Text,
                            FormField::Text => FormField::Name,
                        };
                        self.pane = FloatingPane::Comment { name, text, field };
                        return true;
                    }
                    KeyCode::Char(c) => active.push(c),
                    KeyCode::Backspace => {
                        active.pop();
                    }
                    KeyCode::Enter => match self.session.post_comment(&name, &text) {
                        Ok(_) => {
                            self.set_status("Comment posted");
                            return true;
                        }
                        Err(e) => self.set_status(e.to_string()),
                    },
                    _ => {}
                }
                self.pane = FloatingPane::Comment { name, text, field };
                true
            }
            FloatingPane::Review { mut text } => {
                match key.code {
                    KeyCode::Esc => {
                        self.session.select_rating(0);
                        return true;
                    }
                    KeyCode::Left => {
                        let rating = self.session.selected_rating().saturating_sub(1);
                        self.session.select_rating(rating);
                    }
                    KeyCode::Right => {
                        let rating = (self.session.selected_rating() + 1).min(MAX_RATING);
                        self.session.select_rating(rating);
                    }
                    KeyCode::Char(c) => text.push(c),
                    KeyCode::Backspace => {
                        text.pop();
                    }
                    KeyCode::Enter => match self.session.submit_review(&text) {
                        Ok(_) => {
                            self.set_status("✅ Review submitted!");
                            return true;
                        }
                        Err(e) => self.set_status(e.to_string()),
                    },
                    _ => {}
                }
                self.pane = FloatingPane::Review { text };
                true
            }
            FloatingPane::Contents { mut selected_index } => {
                match key.code {
                    KeyCode::Esc => return true,
                    KeyCode::Up => selected_index = selected_index.saturating_sub(1),
                    KeyCode::Down => {
                        selected_index = (selected_index + 1).min(self.book.chapter_count() - 1)
                    }
                    KeyCode::Enter => {
                        self.session.set_chapter(selected_index as isize);
                        self.sync_scroll_from_view();
                        return true;
                    }
                    _ => {}
                }
                self.pane = FloatingPane::Contents { selected_index };
                true
            }
        }
    }

    fn draw_ui(
        f: &mut Frame,
        book: &Book,
        view: &ChapterView,
        settings: &Settings,
        scroll_offset: usize,
        panel_collapsed: bool,
        status: Option<&str>,
    ) {
        let palette = Palette::for_settings(settings);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT), // progress and key help
            ])
            .split(f.area());

        let mut badges = vec![Span::styled(
            format!("📖 {}", book.title),
            Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
        )];
        if view.reviews.top_rated {
            badges.push(Span::styled(
                "  🏆 Top rated chapter",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ));
        }
        let header = Paragraph::new(vec![
            Line::from(badges),
            Line::from(vec![
                Span::styled("   by ", Style::default().fg(palette.muted)),
                Span::styled(
                    book.author.clone(),
                    Style::default().fg(Color::LightBlue).add_modifier(Modifier::ITALIC),
                ),
            ]),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(palette.accent))
                .padding(Padding::horizontal(1)),
        );
        f.render_widget(header, chunks[0]);

        let body = if panel_collapsed {
            vec![chunks[1]]
        } else {
            Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Percentage(100 - SIDE_PANEL_PERCENT),
                    Constraint::Percentage(SIDE_PANEL_PERCENT),
                ])
                .split(chunks[1])
                .to_vec()
        };

        let text = book
            .chapter_text(view.index)
            .map_err(UiError::from)
            .unwrap_or_else(|e| format!("⚠ {}", e));
        let visible = body[0].height.saturating_sub(2) as usize;
        let lines: Vec<Line> = text
            .lines()
            .skip(scroll_offset)
            .take(visible)
            .map(|line| Line::from(line.to_string()))
            .collect();

        // Larger font sizes read as a narrower column.
        let margin = 1 + u16::from(settings.font_size.saturating_sub(MIN_FONT_SIZE)) / 2;
        let content = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(palette.accent))
                    .title(format!("│ {} ", view.title))
                    .title_style(Style::default().fg(palette.accent).add_modifier(Modifier::BOLD))
                    .padding(Padding::new(margin, margin, 0, 0)),
            )
            .style(palette.text)
            .wrap(Wrap { trim: false });
        f.render_widget(content, body[0]);

        if let Some(area) = body.get(1) {
            Self::render_side_panel(f, *area, view, &palette);
        }

        let footer_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(2)])
            .split(chunks[2]);

        let percent = (view.progress * 100.0).round().clamp(0.0, 100.0) as u16;
        let progress = Gauge::default()
            .gauge_style(Style::default().fg(palette.accent).bg(Color::DarkGray))
            .percent(percent)
            .label(format!("Chapter {}/{}", view.index + 1, view.chapter_count));
        f.render_widget(progress, footer_chunks[0]);

        let help = match status {
            Some(message) => Line::from(Span::styled(
                format!(" {}", message),
                Style::default().fg(Color::Yellow),
            )),
            None => Line::from(vec![
                Span::styled(" q", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
                Span::styled(":quit ", Style::default().fg(palette.muted)),
                Span::styled("←→", Style::default().fg(Color::Green)),
                Span::styled(":chapter ", Style::default().fg(palette.muted)),
                Span::styled("c", Style::default().fg(Color::Magenta)),
                Span::styled(":comment ", Style::default().fg(palette.muted)),
                Span::styled("r", Style::default().fg(Color::Yellow)),
                Span::styled(":review ", Style::default().fg(palette.muted)),
                Span::styled("d/m/i", Style::default().fg(Color::Cyan)),
                Span::styled(":modes ", Style::default().fg(palette.muted)),
                Span::styled("+/-", Style::default().fg(Color::Blue)),
                Span::styled(":font ", Style::default().fg(palette.muted)),
                Span::styled("t", Style::default().fg(Color::Blue)),
                Span::styled(":contents", Style::default().fg(palette.muted)),
            ]),
        };
        let footer = Paragraph::new(help)
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(Style::default().fg(palette.muted)),
            )
            .alignment(Alignment::Center);
        f.render_widget(footer, footer_chunks[1]);
    }

    fn render_side_panel(f: &mut Frame, area: Rect, view: &ChapterView, palette: &Palette) {
        let sections = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(area);

        let panel = &view.reviews;
        let mut lines = Vec::new();
        if let Some(label) = panel.rating_label() {
            lines.push(Line::from(Span::styled(
                label,
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )));
        }
        if panel.acclaimed {
            lines.push(Line::from(Span::styled(
                "🔥 Readers love this chapter",
                Style::default().fg(Color::LightRed),
            )));
        }
        if let Some(best) = &panel.best {
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled("🏆 Best Review ", Style::default().fg(Color::Yellow)),
                Span::styled(stars(best.rating), Style::default().fg(Color::Yellow)),
            ]));
            lines.push(Line::from(display_text(best).to_string()));
            lines.push(Line::from(Span::styled(
                best.timestamp.clone(),
                Style::default().fg(palette.muted),
            )));
        }
        for review in &panel.others {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                stars(review.rating),
                Style::default().fg(Color::Yellow),
            )));
            lines.push(Line::from(display_text(review).to_string()));
            lines.push(Line::from(Span::styled(
                review.timestamp.clone(),
                Style::default().fg(palette.muted),
            )));
        }
        if lines.is_empty() {
            lines.push(Line::from(Span::styled(
                "No reviews yet. Press r to add one",
                Style::default().fg(palette.muted),
            )));
        }

        let reviews = Paragraph::new(lines)
            .block(Self::panel_block(" Reviews ", palette))
            .wrap(Wrap { trim: true });
        f.render_widget(reviews, sections[0]);

        let items: Vec<ListItem> = view
            .comments
            .iter()
            .map(|comment| {
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(
                            format!("({}) ", avatar_initial(&comment.name)),
                            Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(
                            comment.name.clone(),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(
                            format!("  {}", comment.timestamp),
                            Style::default().fg(palette.muted),
                        ),
                    ]),
                    Line::from(truncate_graphemes(&comment.text, MAX_COMMENT_PREVIEW)),
                ])
            })
            .collect();
        let comments = List::new(items).block(Self::panel_block(
            &format!(" Comments ({}) ", view.comments.len()),
            palette,
        ));
        f.render_widget(comments, sections[1]);
    }

    fn panel_block<'a>(title: &str, palette: &Palette) -> Block<'a> {
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(palette.muted))
            .title(title.to_string())
            .padding(Padding::horizontal(1))
    }

    fn render_floating_pane(f: &mut Frame, pane: &FloatingPane, book: &Book, selected_rating: u8) {
        let area = centered_rect(60, 50, f.area());
        match pane {
            FloatingPane::None => {}
            FloatingPane::Comment { name, text, field } => {
                let marker = |this: FormField| if *field == this { "▶ " } else { "  " };
                let form = Paragraph::new(vec![
                    Line::from(format!("{}Name: {}", marker(FormField::Name), name)),
                    Line::from(format!("{}Comment: {}", marker(FormField::Text), text)),
                    Line::from(""),
                    Line::from(Span::styled(
                        "Tab: switch field  Enter: post  Esc: cancel",
                        Style::default().fg(Color::DarkGray),
                    )),
                ])
                .block(Self::pane_block(" 💬 Add a comment "))
                .wrap(Wrap { trim: false });
                f.render_widget(Clear, area);
                f.render_widget(form, area);
            }
            FloatingPane::Review { text } => {
                let filled = usize::from(selected_rating);
                let empty = usize::from(MAX_RATING).saturating_sub(filled);
                let form = Paragraph::new(vec![
                    Line::from(vec![
                        Span::styled("★".repeat(filled), Style::default().fg(Color::Yellow)),
                        Span::styled("☆".repeat(empty), Style::default().fg(Color::DarkGray)),
                    ]),
                    Line::from(format!("Review: {}", text)),
                    Line::from(""),
                    Line::from(Span::styled(
                        "←→: stars  Enter: submit  Esc: cancel",
                        Style::default().fg(Color::DarkGray),
                    )),
                ])
                .block(Self::pane_block(" ⭐ Rate this chapter "))
                .wrap(Wrap { trim: false });
                f.render_widget(Clear, area);
                f.render_widget(form, area);
            }
            FloatingPane::Contents { selected_index } => {
                let items: Vec<ListItem> = book
                    .chapters()
                    .iter()
                    .map(|chapter| ListItem::new(format!("{:3}: {}", chapter.index + 1, chapter.title)))
                    .collect();
                let list = List::new(items)
                    .block(Self::pane_block(" 📚 Contents "))
                    .highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
                    .highlight_symbol("▶ ");
                let mut state = ListState::default();
                state.select(Some(*selected_index));
                f.render_widget(Clear, area);
                f.render_stateful_widget(list, area, &mut state);
            }
        }
    }

    fn pane_block(title: &str) -> Block<'_> {
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan))
            .title(title)
            .padding(Padding::uniform(1))
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}

pub fn truncate_graphemes(text: &str, max: usize) -> String {
    let graphemes: Vec<&str> = text.graphemes(true).collect();
    if graphemes.len() <= max {
        return text.to_string();
    }
    let mut truncated: String = graphemes[..max.saturating_sub(1)].concat();
    truncated.push('…');
    truncated
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
