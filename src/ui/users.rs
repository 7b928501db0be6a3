use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::app::{AppState, Focus};

pub fn render_users_table(f: &mut Frame, area: Rect, app: &mut AppState) {
    app.users_area = area;
    let border_color = if app.focus == Focus::Users {
        app.theme.title
    } else {
        app.theme.border
    };
    let shown = app.dashboard.displayed().len();
    let total = app.dashboard.users().len();
    let block = Block::default()
        .title(format!("Users {shown}/{total}"))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    if app.dashboard.users_loading() {
        let p = Paragraph::new("Loading users...")
            .style(Style::default().fg(app.theme.muted))
            .block(block);
        f.render_widget(p, area);
        return;
    }

    let body_height = area.height.saturating_sub(3) as usize;
    if body_height > 0 {
        app.rows_per_page = body_height;
    }

    let displayed = app.dashboard.displayed();
    let selected_id = app.dashboard.selected().map(|u| &u.id);
    let start = (app.selected_index / app.rows_per_page) * app.rows_per_page;
    let end = (start + app.rows_per_page).min(displayed.len());
    let slice = displayed.get(start..end).unwrap_or_default();

    let rows = slice.iter().enumerate().map(|(i, u)| {
        let style = if start + i == app.selected_index {
            Style::default()
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        let marker = if Some(&u.id) == selected_id { "▶" } else { " " };
        Row::new(vec![
            Cell::from(marker),
            Cell::from(u.name.clone()),
            Cell::from(u.email.clone()),
            Cell::from(format!("{}, {}", u.address.street, u.address.city)),
            Cell::from(u.company.name.clone()),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Length(1),
        Constraint::Percentage(26),
        Constraint::Percentage(26),
        Constraint::Percentage(26),
        Constraint::Percentage(22),
    ];
    let header = Row::new(vec!["", "NAME", "EMAIL", "ADDRESS", "COMPANY"]).style(
        Style::default()
            .fg(app.theme.title)
            .add_modifier(Modifier::BOLD),
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .column_spacing(1);
    f.render_widget(table, area);
}

pub fn render_user_details(f: &mut Frame, area: Rect, app: &AppState) {
    let text = match app.dashboard.selected() {
        Some(u) => format!(
            "Name: {}\nEmail: {}\nAddress: {}, {}\nCompany: {}\nPhone: {}  Web: {}",
            u.name, u.email, u.address.street, u.address.city, u.company.name, u.phone, u.website
        ),
        None => "Select a user with Enter or a mouse click.".to_string(),
    };
    let p = Paragraph::new(text)
        .style(Style::default().fg(app.theme.text))
        .block(
            Block::default()
                .title("Selected user")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(p, area);
}
