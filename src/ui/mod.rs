//! Rendering. Reads [`AppState`] and draws it; the only state written back
//! is layout feedback (rows per page, users table area).
pub mod components;
pub mod posts;
pub mod users;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, InputMode};

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(5), Constraint::Length(1)])
        .split(f.area());

    let body_constraints = if app.show_keybinds {
        vec![
            Constraint::Percentage(35),
            Constraint::Percentage(40),
            Constraint::Percentage(25),
        ]
    } else {
        vec![Constraint::Percentage(40), Constraint::Percentage(60)]
    };
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(body_constraints)
        .split(root[1]);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(3)])
        .split(body[1]);

    render_header(f, root[0], app);
    users::render_users_table(f, body[0], app);
    users::render_user_details(f, right[0], app);
    posts::render_posts(f, right[1], app);
    if app.show_keybinds {
        components::render_keybinds_panel(f, body[2], app);
    }
    components::render_status_bar(f, root[2], app);
}

fn render_header(f: &mut Frame, area: ratatui::layout::Rect, app: &AppState) {
    let search = match app.input_mode {
        InputMode::Search => format!("Search users: {}_", app.search_text()),
        InputMode::Normal if app.search_text().is_empty() => "Search users: (press / to type)".to_string(),
        InputMode::Normal => format!("Search users: {}", app.search_text()),
    };
    let mut lines = vec![Line::from(vec![
        Span::styled(search, Style::default().fg(app.theme.header_fg)),
        Span::styled(
            format!("   sort: {}", app.dashboard.query().sort_key),
            Style::default().fg(app.theme.muted),
        ),
    ])];

    // Each loader reports its own failure.
    let errors: Vec<&str> = [app.dashboard.users_error(), app.dashboard.posts_error()]
        .into_iter()
        .flatten()
        .collect();
    if !errors.is_empty() {
        lines.push(Line::from(Span::styled(
            errors.join("  |  "),
            Style::default()
                .fg(app.theme.error_fg)
                .add_modifier(Modifier::BOLD),
        )));
    }

    let p = Paragraph::new(lines)
        .block(
            Block::default()
                .title(format!("Dashboard ({})", app.endpoint))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .style(Style::default().bg(app.theme.header_bg));
    f.render_widget(p, area);
}
