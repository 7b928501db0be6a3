//! Shared UI components: status bar and keybindings panel.
//!
use std::collections::{BTreeMap, BTreeSet};

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::keymap::{KeyAction, Keymap};
use crate::app::loader::LoadStatus;
use crate::app::{AppState, Focus, InputMode};

fn status_label(status: &LoadStatus) -> &'static str {
    match status {
        LoadStatus::Idle => "idle",
        LoadStatus::Loading => "loading",
        LoadStatus::Loaded => "ok",
        LoadStatus::Failed(_) => "failed",
    }
}

/// Bottom line: mode, focus, counts and loader states.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Search => "SEARCH",
    };
    let focus = match app.focus {
        Focus::Users => "users",
        Focus::Posts => "posts",
    };
    let d = &app.dashboard;
    let posts_state = match d.pending_posts() {
        Some(ticket) => format!("{} {ticket}", status_label(d.posts_status())),
        None => status_label(d.posts_status()).to_string(),
    };
    let msg = format!(
        "mode: {mode}  focus: {focus}  users:{}/{} [{}]  posts:{} [{posts_state}]  K: keys  q: quit",
        d.displayed().len(),
        d.users().len(),
        status_label(d.users_status()),
        d.posts().len(),
    );
    let p = Paragraph::new(msg).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

fn action_label(action: KeyAction) -> Option<&'static str> {
    Some(match action {
        KeyAction::Quit => "Quit",
        KeyAction::StartSearch => "Search",
        KeyAction::SelectUser => "Select user",
        KeyAction::SwitchFocus => "Switch pane",
        KeyAction::ToggleKeybindsPane => "Toggle this panel",
        KeyAction::MoveUp => "Move up",
        KeyAction::MoveDown => "Move down",
        KeyAction::PageUp | KeyAction::MoveLeftPage => "Page up",
        KeyAction::PageDown | KeyAction::MoveRightPage => "Page down",
        KeyAction::Ignore => return None,
    })
}

fn display_key(mods: KeyModifiers, code: KeyCode) -> String {
    match code {
        KeyCode::BackTab => "Shift+Tab".to_string(),
        _ => Keymap::format_key(mods, code),
    }
}

/// Keybindings grouped by action, generated from the live keymap.
pub fn render_keybinds_panel(f: &mut Frame, area: Rect, app: &AppState) {
    let mut by_label: BTreeMap<&'static str, BTreeSet<String>> = BTreeMap::new();
    for ((mods, code), action) in app.keymap.all_bindings() {
        if let Some(label) = action_label(action) {
            by_label
                .entry(label)
                .or_default()
                .insert(display_key(mods, code));
        }
    }

    let mut lines = vec![Line::from(Span::styled(
        "Normal mode:",
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    for (label, keys) in &by_label {
        lines.push(Line::from(vec![
            Span::raw(format!("  {label}: ")),
            Span::styled(
                keys.iter().cloned().collect::<Vec<_>>().join(", "),
                Style::default().add_modifier(Modifier::ITALIC),
            ),
        ]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "Search mode:",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    for (label, value) in [
        ("Keep search", "Enter"),
        ("Clear search", "Esc"),
        ("Delete char", "Backspace"),
    ] {
        lines.push(Line::from(vec![
            Span::raw(format!("  {label}: ")),
            Span::styled(value, Style::default().add_modifier(Modifier::ITALIC)),
        ]));
    }

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(app.theme.text))
        .block(
            Block::default()
                .title("Keybindings")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(p, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_visible_action_has_a_label() {
        for ((_, _), action) in Keymap::default().all_bindings() {
            if action != KeyAction::Ignore {
                assert!(action_label(action).is_some(), "{action:?}");
            }
        }
    }

    #[test]
    fn back_tab_is_shown_as_shift_tab() {
        assert_eq!(display_key(KeyModifiers::SHIFT, KeyCode::BackTab), "Shift+Tab");
        assert_eq!(display_key(KeyModifiers::CONTROL, KeyCode::Char('c')), "Ctrl+c");
    }
}
