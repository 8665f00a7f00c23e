use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, AppState};

use super::{agenda, dialogs, styles};

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Day tabs
            Constraint::Min(10),   // Agenda
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_day_tabs(frame, app, chunks[1]);
    agenda::render(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::EditingSession => dialogs::render_form(frame, app),
        AppState::ConfirmingDelete => dialogs::render_delete(frame, app),
        AppState::SelectingCopyDays => dialogs::render_copy(frame, app),
        AppState::ConfirmingQuit => render_quit_overlay(frame),
        AppState::Normal | AppState::Quitting => {}
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!("  Campdesk · {}", app.camp_title());
    let help_hint = "[?] Help";

    let title_line = Line::from(vec![
        Span::styled(title.clone(), styles::title_style()),
        Span::raw(" ".repeat(
            (area.width as usize).saturating_sub(title.chars().count() + help_hint.len() + 4),
        )),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_day_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::raw(" ")];
    for (i, day) in app.days().iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        let label = if i < 9 {
            format!("[{}] {}", i + 1, day.tab_label())
        } else {
            day.tab_label()
        };
        spans.push(Span::styled(label, styles::tab_style(i == app.day_index)));
    }

    // View mode toggle on the right
    let modes = format!("[v] {}", app.view_mode.label());
    let used: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let padding = (area.width as usize).saturating_sub(used + modes.len() + 2);
    spans.push(Span::raw(" ".repeat(padding)));
    spans.push(Span::styled(modes, styles::highlight_style()));

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = "[a]dd [e]dit [d]elete [y] copy [x]port [r]efresh [q]uit";

    let left_text = if let Some(ref msg) = app.status_message {
        format!(" {} ", msg)
    } else {
        format!(
            " {} sessions | Updated {} ",
            app.store.total_sessions(),
            app.cache_ages.last_updated()
        )
    };
    let left_style = match app.status_message.as_deref() {
        Some(msg) if msg.starts_with("Error") => styles::error_style(),
        _ => styles::muted_style(),
    };

    let right_text = format!(" {} ", shortcuts);
    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.len());

    let status_line = Line::from(vec![
        Span::styled(left_text, left_style),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 26, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled(
            format!("  Campdesk agenda planner  v{}", version),
            styles::title_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        help_line("1-9", "Jump to day"),
        help_line("←/→", "Previous/next day"),
        help_line("↑/↓", "Select session"),
        help_line("PgUp/PgDn", "Scroll"),
        help_line("v", "Toggle timeline/list view"),
        Line::from(""),
        Line::from(Span::styled(" Filters", styles::highlight_style())),
        help_line("t / c / l", "Cycle type/clinician/location"),
        help_line("0", "Clear filters"),
        Line::from(""),
        Line::from(Span::styled(" Sessions", styles::highlight_style())),
        help_line("a", "Add session to this day"),
        help_line("e / Enter", "Edit selected session"),
        help_line("d", "Delete selected session"),
        help_line("y", "Copy selected session to days"),
        help_line("x", "Export agenda to CSV"),
        help_line("r", "Refresh from server"),
        help_line("q", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style())
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style())
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_fits_inside() {
        let outer = Rect::new(0, 0, 100, 40);
        let inner = centered_rect_fixed(52, 26, outer);
        assert_eq!(inner, Rect::new(24, 7, 52, 26));

        let small = Rect::new(0, 0, 30, 10);
        let clipped = centered_rect_fixed(52, 26, small);
        assert_eq!(clipped.width, 30);
        assert_eq!(clipped.height, 10);
    }
}
