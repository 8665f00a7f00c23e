use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use campdesk_core::agenda::{AgendaState, SessionRow, ViewMode};
use campdesk_core::utils::truncate;

use crate::app::App;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3)])
        .split(area);

    render_filter_bar(frame, app, chunks[0]);

    let rows = app.visible_rows();
    if rows.is_empty() {
        render_empty(frame, app, chunks[1]);
        return;
    }
    match app.view_mode {
        ViewMode::Timeline => render_timeline(frame, app, &rows, chunks[1]),
        ViewMode::List => render_list(frame, app, &rows, chunks[1]),
    }
}

fn render_filter_bar(frame: &mut Frame, app: &App, area: Rect) {
    let style = if app.filter.is_pass_through() {
        styles::muted_style()
    } else {
        styles::highlight_style()
    };
    let line = Line::from(vec![
        Span::styled(" Filter: ", styles::muted_style()),
        Span::styled(app.filter_summary(), style),
        Span::styled("   [t]ype [c]linician [l]ocation [0] clear", styles::muted_style()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn block_title(app: &App, count: usize) -> String {
    let day = app
        .current_day()
        .map(|d| d.title.clone())
        .unwrap_or_default();
    format!(" {} - {} ({}) ", day, app.view_mode.label(), count)
}

fn render_empty(frame: &mut Frame, app: &App, area: Rect) {
    let (message, style) = match app.store.state() {
        AgendaState::Idle | AgendaState::Loading => ("Loading agenda...", styles::muted_style()),
        AgendaState::Failed(message) => (message.as_str(), styles::error_style()),
        _ if app.current_day().is_none() => ("This camp has no days yet", styles::muted_style()),
        _ if !app.filter.is_pass_through() => {
            ("No sessions match the filter", styles::muted_style())
        }
        _ => ("No sessions yet. Press [a] to add one.", styles::muted_style()),
    };

    let block = Block::default()
        .title(block_title(app, 0))
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style());

    let paragraph = Paragraph::new(vec![Line::from(""), Line::from(Span::styled(message, style))])
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(paragraph, area);
}

fn render_timeline(frame: &mut Frame, app: &App, rows: &[SessionRow<'_>], area: Rect) {
    let header = Row::new(vec![
        Cell::from("Time"),
        Cell::from("Duration"),
        Cell::from("Session"),
        Cell::from("Location"),
        Cell::from("Clinician"),
    ])
    .style(styles::title_style())
    .height(1);

    let table_rows: Vec<Row> = rows
        .iter()
        .map(|row| {
            let bar = row.bar.clone().unwrap_or_default();
            Row::new(vec![
                Cell::from(row.time_range.clone()),
                Cell::from(Span::styled(bar, styles::session_type_style(row.item.session_type))),
                Cell::from(truncate(&row.item.title, 40)),
                Cell::from(row.location.clone()),
                Cell::from(row.clinician.clone()),
            ])
            .style(styles::list_item_style())
        })
        .collect();

    let widths = [
        Constraint::Length(14), // "08:00 - 09:30"
        Constraint::Length(17),
        Constraint::Fill(2),
        Constraint::Fill(1),
        Constraint::Fill(1),
    ];

    render_table(frame, app, table_rows, header, &widths, rows.len(), area);
}

fn render_list(frame: &mut Frame, app: &App, rows: &[SessionRow<'_>], area: Rect) {
    let header = Row::new(vec![
        Cell::from("Time"),
        Cell::from("Session"),
        Cell::from("Type"),
        Cell::from("Location"),
        Cell::from("Clinician"),
        Cell::from("Staff"),
        Cell::from("Status"),
    ])
    .style(styles::title_style())
    .height(1);

    let table_rows: Vec<Row> = rows
        .iter()
        .map(|row| {
            let status = match row.status {
                Some(status) => Cell::from(Span::styled(status.label(), styles::status_style(status))),
                None => Cell::from(""),
            };
            Row::new(vec![
                Cell::from(row.time_range.clone()),
                Cell::from(truncate(&row.item.title, 40)),
                Cell::from(row.item.session_type.label()),
                Cell::from(row.location.clone()),
                Cell::from(row.clinician.clone()),
                Cell::from(row.staff.clone()),
                status,
            ])
            .style(styles::list_item_style())
        })
        .collect();

    let widths = [
        Constraint::Length(14),
        Constraint::Fill(2),
        Constraint::Length(12),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Length(10),
    ];

    render_table(frame, app, table_rows, header, &widths, rows.len(), area);
}

fn render_table(
    frame: &mut Frame,
    app: &App,
    rows: Vec<Row>,
    header: Row,
    widths: &[Constraint],
    count: usize,
    area: Rect,
) {
    let table = Table::new(rows, widths.to_vec())
        .header(header)
        .block(
            Block::default()
                .title(block_title(app, count))
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style()),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.selection));

    frame.render_stateful_widget(table, area, &mut state);
}
