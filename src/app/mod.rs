//! Application state types and entry glue.
//!
//! [`AppState`] wraps the pure [`dashboard::Dashboard`] with view state
//! (cursor, focus, input mode, theme, keymap) and turns key and mouse events
//! into dashboard operations. Anything that needs the network comes back as an
//! [`AppAction::Fetch`] for the event loop in [`update`] to execute.
//!
pub mod config;
pub mod dashboard;
pub mod fetcher;
pub mod keymap;
pub mod loader;
pub mod settings;
pub mod update;

use std::path::Path;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::Color;

use crate::search::SortKey;
use dashboard::{Dashboard, FetchOutcome, FetchRequest};
use keymap::{KeyAction, Keymap};

pub const THEME_FILE: &str = "theme.conf";

/// Which pane receives movement keys.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Focus {
    Users,
    Posts,
}

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Keys edit the search text; the list re-derives on every edit.
    Search,
}

/// Work for the event loop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppAction {
    Quit,
    Fetch(FetchRequest),
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub error_fg: Color,
}

const THEME_KEYS: [&str; 11] = [
    "text",
    "muted",
    "title",
    "border",
    "header_bg",
    "header_fg",
    "status_bg",
    "status_fg",
    "highlight_fg",
    "highlight_bg",
    "error_fg",
];

impl Theme {
    /// Plain ANSI palette for terminals without truecolor.
    pub fn dark() -> Self {
        Self {
            text: Color::Gray,
            muted: Color::DarkGray,
            title: Color::Cyan,
            border: Color::Gray,
            header_bg: Color::Black,
            header_fg: Color::Cyan,
            status_bg: Color::DarkGray,
            status_fg: Color::Black,
            highlight_fg: Color::Yellow,
            highlight_bg: Color::Reset,
            error_fg: Color::LightRed,
        }
    }

    /// Catppuccin Mocha, the default.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c),        // overlay1
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),    // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
            error_fg: Color::Rgb(0xf3, 0x8b, 0xa8),     // red
        }
    }

    fn slot(&mut self, key: &str) -> Option<&mut Color> {
        Some(match key {
            "text" => &mut self.text,
            "muted" => &mut self.muted,
            "title" => &mut self.title,
            "border" => &mut self.border,
            "header_bg" => &mut self.header_bg,
            "header_fg" => &mut self.header_fg,
            "status_bg" => &mut self.status_bg,
            "status_fg" => &mut self.status_fg,
            "highlight_fg" => &mut self.highlight_fg,
            "highlight_bg" => &mut self.highlight_bg,
            "error_fg" => &mut self.error_fg,
            _ => return None,
        })
    }

    /// Parse `key = color` lines on top of `mocha`. Bad lines are skipped.
    pub fn parse(contents: &str) -> Self {
        let mut theme = Self::mocha();
        for (key, value) in config::parse_kv_lines(contents) {
            if let (Some(color), Some(slot)) = (Self::parse_color(value), theme.slot(key)) {
                *slot = color;
            }
        }
        theme
    }

    pub fn from_file(path: &Path) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    /// Hex (`#RRGGBB` or `RRGGBB`) or `reset`.
    fn parse_color(s: &str) -> Option<Color> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "reset" {
            return Some(Color::Reset);
        }
        let hex = lower.strip_prefix('#').unwrap_or(&lower);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    fn color_to_str(c: Color) -> String {
        match c {
            Color::Rgb(r, g, b) => format!("#{r:02X}{g:02X}{b:02X}"),
            Color::Reset => "reset".to_string(),
            // Named colors are written as a hex approximation.
            Color::Black => "#000000".to_string(),
            Color::Red => "#800000".to_string(),
            Color::Green => "#008000".to_string(),
            Color::Yellow => "#808000".to_string(),
            Color::Blue => "#000080".to_string(),
            Color::Magenta => "#800080".to_string(),
            Color::Cyan => "#008080".to_string(),
            Color::Gray => "#C0C0C0".to_string(),
            Color::DarkGray => "#808080".to_string(),
            Color::LightRed => "#FF0000".to_string(),
            Color::LightGreen => "#00FF00".to_string(),
            Color::LightYellow => "#FFFF00".to_string(),
            Color::LightBlue => "#0000FF".to_string(),
            Color::LightMagenta => "#FF00FF".to_string(),
            Color::LightCyan => "#00FFFF".to_string(),
            Color::White => "#FFFFFF".to_string(),
            Color::Indexed(_) => "reset".to_string(),
        }
    }

    pub fn write_file(&self, path: &Path) -> std::io::Result<()> {
        let mut copy = *self;
        let mut buf = String::new();
        buf.push_str("# userposts-dashboard theme\n");
        buf.push_str("# Colors: #RRGGBB, RRGGBB or 'reset'\n\n");
        for key in THEME_KEYS {
            if let Some(color) = copy.slot(key) {
                buf.push_str(&format!("{key} = {}\n", Self::color_to_str(*color)));
            }
        }
        std::fs::write(path, buf)
    }

    /// Load `theme.conf` from `dir`, writing the
    /// default palette there if none exists.
    pub fn load_or_init(dir: &Path) -> Self {
        let own = dir.join(THEME_FILE);
        if own.is_file() {
            return Self::from_file(&own).unwrap_or_else(Self::mocha);
        }
        let theme = Self::mocha();
        let path = config::config_file_write_path(dir, THEME_FILE);
        if let Err(err) = theme.write_file(&path) {
            tracing::warn!(path = %path.display(), error = %err, "could not write default theme");
        }
        theme
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::mocha()
    }
}

pub struct AppState {
    pub dashboard: Dashboard,
    /// Cursor into `dashboard.displayed()`.
    pub selected_index: usize,
    pub rows_per_page: usize,
    pub posts_scroll: u16,
    pub input_mode: InputMode,
    pub focus: Focus,
    pub theme: Theme,
    pub keymap: Keymap,
    pub show_keybinds: bool,
    /// Where the users table was last drawn, for mouse hit-testing.
    pub users_area: Rect,
    /// Shown in the header.
    pub endpoint: String,
}

impl AppState {
    pub fn new(sort_key: SortKey, theme: Theme, keymap: Keymap, endpoint: impl Into<String>) -> Self {
        Self {
            dashboard: Dashboard::new(sort_key),
            selected_index: 0,
            rows_per_page: 10,
            posts_scroll: 0,
            input_mode: InputMode::Normal,
            focus: Focus::Users,
            theme,
            keymap,
            show_keybinds: false,
            users_area: Rect::default(),
            endpoint: endpoint.into(),
        }
    }

    /// Start the dashboard: the users request goes out exactly once.
    pub fn activate(&mut self) -> Vec<AppAction> {
        self.dashboard
            .activate()
            .map(AppAction::Fetch)
            .into_iter()
            .collect()
    }

    pub fn apply_outcome(&mut self, outcome: FetchOutcome) {
        if self.dashboard.apply(outcome) {
            self.clamp_selection();
        }
    }

    pub fn search_text(&self) -> &str {
        &self.dashboard.query().search
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<AppAction> {
        match self.input_mode {
            // Control chords are commands, never search text.
            InputMode::Search if key.modifiers.contains(KeyModifiers::CONTROL) => {
                match self.keymap.resolve(&key) {
                    Some(KeyAction::Quit) => vec![AppAction::Quit],
                    _ => Vec::new(),
                }
            }
            InputMode::Search => {
                self.handle_search_key(key);
                Vec::new()
            }
            InputMode::Normal => match self.keymap.resolve(&key) {
                Some(action) => self.handle_action(action),
                None => Vec::new(),
            },
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        let mut text = self.search_text().to_string();
        match key.code {
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                return;
            }
            KeyCode::Esc => {
                text.clear();
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Backspace => {
                text.pop();
            }
            KeyCode::Char(c) => text.push(c),
            _ => return,
        }
        self.update_search(text);
    }

    /// Replace the search text and reset the cursor to the top of the list.
    pub fn update_search(&mut self, text: String) {
        self.dashboard.set_search(text);
        self.selected_index = 0;
    }

    fn handle_action(&mut self, action: KeyAction) -> Vec<AppAction> {
        let rpp = self.rows_per_page.max(1);
        match action {
            KeyAction::Quit => return vec![AppAction::Quit],
            KeyAction::StartSearch => {
                self.input_mode = InputMode::Search;
                self.focus = Focus::Users;
            }
            KeyAction::SelectUser => return self.select_highlighted(),
            KeyAction::SwitchFocus => {
                self.focus = match self.focus {
                    Focus::Users => Focus::Posts,
                    Focus::Posts => Focus::Users,
                };
            }
            KeyAction::ToggleKeybindsPane => self.show_keybinds = !self.show_keybinds,
            KeyAction::MoveUp => self.move_by(-1),
            KeyAction::MoveDown => self.move_by(1),
            KeyAction::PageUp | KeyAction::MoveLeftPage => self.move_by(-(rpp as i64)),
            KeyAction::PageDown | KeyAction::MoveRightPage => self.move_by(rpp as i64),
            KeyAction::Ignore => {}
        }
        Vec::new()
    }

    fn move_by(&mut self, delta: i64) {
        match self.focus {
            Focus::Users => {
                let last = self.dashboard.displayed().len().saturating_sub(1);
                let next = (self.selected_index as i64 + delta).clamp(0, last as i64);
                self.selected_index = next as usize;
            }
            Focus::Posts => {
                let next = (i64::from(self.posts_scroll) + delta).clamp(0, i64::from(u16::MAX));
                self.posts_scroll = next as u16;
            }
        }
    }

    /// Select the user under the cursor; no-op on an empty list.
    pub fn select_highlighted(&mut self) -> Vec<AppAction> {
        let Some(user) = self.dashboard.displayed().get(self.selected_index).cloned() else {
            return Vec::new();
        };
        self.posts_scroll = 0;
        vec![AppAction::Fetch(self.dashboard.select_user(user))]
    }

    /// Left click on a users row moves the cursor there and selects it.
    pub fn handle_mouse(&mut self, event: MouseEvent) -> Vec<AppAction> {
        if event.kind != MouseEventKind::Down(MouseButton::Left) {
            return Vec::new();
        }
        match self.row_at(event.column, event.row) {
            Some(index) => {
                self.selected_index = index;
                self.focus = Focus::Users;
                self.select_highlighted()
            }
            None => Vec::new(),
        }
    }

    /// Map a terminal cell to an index in the displayed list.
    pub fn row_at(&self, column: u16, row: u16) -> Option<usize> {
        let area = self.users_area;
        // border + header row
        let first_row = area.y.saturating_add(2);
        let inside_x = column > area.x && column < area.x.saturating_add(area.width).saturating_sub(1);
        let inside_y = row >= first_row && row < area.y.saturating_add(area.height).saturating_sub(1);
        if !inside_x || !inside_y {
            return None;
        }
        let rpp = self.rows_per_page.max(1);
        let page_start = (self.selected_index / rpp) * rpp;
        let index = page_start + usize::from(row - first_row);
        (index < self.dashboard.displayed().len()).then_some(index)
    }

    fn clamp_selection(&mut self) {
        let len = self.dashboard.displayed().len();
        if self.selected_index >= len {
            self.selected_index = len.saturating_sub(1);
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(
            SortKey::Name,
            Theme::mocha(),
            Keymap::default(),
            crate::api::DEFAULT_BASE_URL,
        )
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
