//! Keybinding configuration: parse `keybinds.conf`, provide defaults, and map keys to actions.
//!
//! - Loading custom keybindings from `keybinds.conf` on top of the defaults
//! - Resolving key presses (with modifiers) to semantic actions
//! - Writing the default keymap out so users have something to edit

use std::collections::HashMap;
use std::path::Path;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::config::{config_file_write_path, parse_kv_lines};

pub const KEYBINDS_FILE: &str = "keybinds.conf";

/// Semantic keyboard actions in normal mode.
///
/// Several keys may map to the same action (`j` and Down both move down).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Exit the application.
    Quit,
    /// Enter search mode; typing edits the search text live.
    StartSearch,
    /// Select the highlighted user and load their posts.
    SelectUser,
    /// Move focus between the users list and the posts pane.
    SwitchFocus,
    /// Show or hide the keybindings panel.
    ToggleKeybindsPane,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    MoveLeftPage,
    MoveRightPage,
    /// Swallow the key.
    Ignore,
}

const ACTION_NAMES: [(KeyAction, &str); 12] = [
    (KeyAction::Quit, "Quit"),
    (KeyAction::StartSearch, "StartSearch"),
    (KeyAction::SelectUser, "SelectUser"),
    (KeyAction::SwitchFocus, "SwitchFocus"),
    (KeyAction::ToggleKeybindsPane, "ToggleKeybindsPane"),
    (KeyAction::MoveUp, "MoveUp"),
    (KeyAction::MoveDown, "MoveDown"),
    (KeyAction::PageUp, "PageUp"),
    (KeyAction::PageDown, "PageDown"),
    (KeyAction::MoveLeftPage, "MoveLeftPage"),
    (KeyAction::MoveRightPage, "MoveRightPage"),
    (KeyAction::Ignore, "Ignore"),
];

/// Maps `(KeyModifiers, KeyCode)` pairs to [`KeyAction`]s.
#[derive(Clone, Debug)]
pub struct Keymap {
    bindings: HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Keymap {
    /// Arrow keys plus vim-style hjkl, `/` search, Enter select, Tab focus.
    pub fn new_defaults() -> Self {
        use KeyCode::*;
        use KeyModifiers as M;
        let mut bindings = HashMap::new();
        bindings.insert((M::NONE, Char('q')), KeyAction::Quit);
        bindings.insert((M::CONTROL, Char('c')), KeyAction::Quit);
        bindings.insert((M::NONE, Esc), KeyAction::Ignore);
        bindings.insert((M::NONE, Char('/')), KeyAction::StartSearch);
        bindings.insert((M::NONE, Enter), KeyAction::SelectUser);
        bindings.insert((M::NONE, Tab), KeyAction::SwitchFocus);
        bindings.insert((M::NONE, BackTab), KeyAction::SwitchFocus);
        bindings.insert((M::SHIFT, BackTab), KeyAction::SwitchFocus);

        bindings.insert((M::NONE, Up), KeyAction::MoveUp);
        bindings.insert((M::NONE, Down), KeyAction::MoveDown);
        bindings.insert((M::NONE, Left), KeyAction::MoveLeftPage);
        bindings.insert((M::NONE, Right), KeyAction::MoveRightPage);
        bindings.insert((M::NONE, Char('k')), KeyAction::MoveUp);
        bindings.insert((M::NONE, Char('j')), KeyAction::MoveDown);
        bindings.insert((M::NONE, Char('h')), KeyAction::MoveLeftPage);
        bindings.insert((M::NONE, Char('l')), KeyAction::MoveRightPage);
        bindings.insert((M::NONE, PageUp), KeyAction::PageUp);
        bindings.insert((M::NONE, PageDown), KeyAction::PageDown);

        // Terminals disagree on whether Shift+k arrives as 'K' with or without SHIFT.
        bindings.insert((M::SHIFT, Char('K')), KeyAction::ToggleKeybindsPane);
        bindings.insert((M::NONE, Char('K')), KeyAction::ToggleKeybindsPane);

        Self { bindings }
    }

    /// Load `keybinds.conf` from `dir`, writing the
    /// defaults there if it does not exist.
    pub fn load_or_init(dir: &Path) -> Self {
        let own = dir.join(KEYBINDS_FILE);
        if own.is_file() {
            return Self::from_file(&own).unwrap_or_default();
        }
        let km = Self::default();
        let path = config_file_write_path(dir, KEYBINDS_FILE);
        if let Err(err) = km.write_file(&path) {
            tracing::warn!(path = %path.display(), error = %err, "could not write default keybinds");
        }
        km
    }

    /// Defaults overridden by `<Action> = <KeySpec>` lines. `<KeySpec> = <Action>`
    /// is accepted too.
    pub fn from_file(path: &Path) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    pub fn parse(contents: &str) -> Self {
        let mut map = Self::default();
        for (lhs, rhs) in parse_kv_lines(contents) {
            if let (Some(action), Some(key)) = (parse_action(lhs), parse_key(rhs)) {
                map.bindings.insert(key, action);
            } else if let (Some(key), Some(action)) = (parse_key(lhs), parse_action(rhs)) {
                map.bindings.insert(key, action);
            } else {
                tracing::debug!(lhs, rhs, "ignoring unparsable keybinding");
            }
        }
        map
    }

    pub fn write_file(&self, path: &Path) -> std::io::Result<()> {
        let mut buf = String::new();
        buf.push_str("# userposts-dashboard keybindings\n");
        buf.push_str("# Format: <Action> = <KeySpec>\n");
        buf.push_str("# KeySpec examples: q, Ctrl+c, Enter, Esc, Tab, BackTab, Up, Down, Left, Right, PageUp, PageDown, /, j, k\n");
        buf.push_str("# Actions: ");
        buf.push_str(
            &ACTION_NAMES
                .iter()
                .map(|(_, name)| *name)
                .collect::<Vec<_>>()
                .join(", "),
        );
        buf.push_str("\n\n");

        let mut lines: Vec<String> = self
            .bindings
            .iter()
            .filter(|(_, action)| **action != KeyAction::Ignore)
            .map(|((mods, code), action)| {
                format!("{} = {}", format_action(*action), Self::format_key(*mods, *code))
            })
            .collect();
        lines.sort();
        for line in lines {
            buf.push_str(&line);
            buf.push('\n');
        }
        std::fs::write(path, buf)
    }

    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&(key.modifiers, key.code)).copied()
    }

    pub fn all_bindings(&self) -> Vec<((KeyModifiers, KeyCode), KeyAction)> {
        self.bindings.iter().map(|(k, v)| (*k, *v)).collect()
    }

    /// Human-readable key spec such as `Ctrl+c` or `BackTab`.
    pub fn format_key(mods: KeyModifiers, code: KeyCode) -> String {
        use KeyCode::*;
        let base = match code {
            Enter => "Enter".to_string(),
            Esc => "Esc".to_string(),
            Tab => "Tab".to_string(),
            BackTab => "BackTab".to_string(),
            Up => "Up".to_string(),
            Down => "Down".to_string(),
            Left => "Left".to_string(),
            Right => "Right".to_string(),
            PageUp => "PageUp".to_string(),
            PageDown => "PageDown".to_string(),
            Char(c) => c.to_string(),
            _ => format!("{code:?}"),
        };
        if mods.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{base}")
        } else {
            base
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    use KeyCode::*;
    let (mods, rest) = match spec.trim().strip_prefix("Ctrl+") {
        Some(after) => (KeyModifiers::CONTROL, after),
        None => (KeyModifiers::NONE, spec.trim()),
    };
    let code = match rest {
        "Enter" => Enter,
        "Esc" | "Escape" => Esc,
        "Tab" => Tab,
        "BackTab" => BackTab,
        "Up" => Up,
        "Down" => Down,
        "Left" => Left,
        "Right" => Right,
        "PageUp" => PageUp,
        "PageDown" => PageDown,
        _ => {
            let mut chars = rest.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Char(c),
                _ => return None,
            }
        }
    };
    Some((mods, code))
}

fn parse_action(s: &str) -> Option<KeyAction> {
    let s = s.trim();
    ACTION_NAMES
        .iter()
        .find(|(_, name)| *name == s)
        .map(|(action, _)| *action)
}

pub fn format_action(a: KeyAction) -> &'static str {
    ACTION_NAMES
        .iter()
        .find(|(action, _)| *action == a)
        .map(|(_, name)| *name)
        .unwrap_or("Ignore")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn defaults_cover_vim_and_arrows() {
        let km = Keymap::default();
        assert_eq!(km.resolve(&key(KeyCode::Char('j'))), Some(KeyAction::MoveDown));
        assert_eq!(km.resolve(&key(KeyCode::Down)), Some(KeyAction::MoveDown));
        assert_eq!(km.resolve(&key(KeyCode::Enter)), Some(KeyAction::SelectUser));
        assert_eq!(km.resolve(&key(KeyCode::Char('z'))), None);
    }

    #[test]
    fn file_overrides_both_directions() {
        let km = Keymap::parse("Quit = x\nCtrl+s = StartSearch\nnonsense = here\n");
        assert_eq!(km.resolve(&key(KeyCode::Char('x'))), Some(KeyAction::Quit));
        let ctrl_s = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(km.resolve(&ctrl_s), Some(KeyAction::StartSearch));
        // defaults survive
        assert_eq!(km.resolve(&key(KeyCode::Char('q'))), Some(KeyAction::Quit));
    }

    #[test]
    fn written_file_parses_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(KEYBINDS_FILE);
        Keymap::default().write_file(&path).unwrap();
        let km = Keymap::from_file(&path).unwrap();
        assert_eq!(km.resolve(&key(KeyCode::Char('/'))), Some(KeyAction::StartSearch));
        assert_eq!(km.resolve(&key(KeyCode::Tab)), Some(KeyAction::SwitchFocus));
    }

    #[test]
    fn action_names_round_trip() {
        for (action, name) in ACTION_NAMES {
            assert_eq!(parse_action(name), Some(action));
            assert_eq!(format_action(action), name);
        }
    }
}
