use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::{AppState, Focus};

/// Posts of the selected user, title in bold above the body.
pub fn render_posts(f: &mut Frame, area: Rect, app: &AppState) {
    let border_color = if app.focus == Focus::Posts {
        app.theme.title
    } else {
        app.theme.border
    };
    let title = match app.dashboard.selected() {
        Some(u) => format!("Posts by {} ({})", u.name, app.dashboard.posts().len()),
        None => "User Posts".to_string(),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    if app.dashboard.posts_loading() {
        let p = Paragraph::new("Loading posts...")
            .style(Style::default().fg(app.theme.muted))
            .block(block);
        f.render_widget(p, area);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    for post in app.dashboard.posts() {
        lines.push(Line::from(Span::styled(
            post.title.clone(),
            Style::default()
                .fg(app.theme.highlight_fg)
                .add_modifier(Modifier::BOLD),
        )));
        for body_line in post.body.lines() {
            lines.push(Line::styled(
                body_line.to_string(),
                Style::default().fg(app.theme.text),
            ));
        }
        lines.push(Line::raw(""));
    }

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((app.posts_scroll, 0))
        .block(block);
    f.render_widget(p, area);
}
