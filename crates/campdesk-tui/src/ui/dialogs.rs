use ratatui::{
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use campdesk_core::models::ReferenceData;

use crate::app::App;
use crate::form::{FormField, SessionForm};
use crate::ui::render::centered_rect_fixed;
use crate::ui::styles;

/// Width of the label column in the session form.
const LABEL_WIDTH: usize = 11;

fn dialog_block(title: String) -> Block<'static> {
    Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style())
        .style(Style::default())
}

fn field_value(form: &SessionForm, field: FormField, refs: &ReferenceData) -> String {
    match field {
        FormField::Title => form.title.clone(),
        FormField::StartTime => form.start_time.clone(),
        FormField::EndTime => form.end_time.clone(),
        FormField::Notes => form.notes.clone(),
        FormField::SessionType => form
            .session_type
            .map(|t| t.label().to_string())
            .unwrap_or_else(|| "(choose)".to_string()),
        FormField::Status => form.status.label().to_string(),
        FormField::Location => match refs.location(form.location_id) {
            Some(location) => location.name.clone(),
            None => "(none)".to_string(),
        },
        FormField::Clinician => match refs.clinician(form.clinician.first()) {
            Some(clinician) => clinician.name.clone(),
            None => "(none)".to_string(),
        },
        FormField::Staff => {
            let names: Vec<&str> = form
                .staff
                .selected_ids()
                .into_iter()
                .filter_map(|id| refs.staff_member(id).map(|s| s.name.as_str()))
                .collect();
            if names.is_empty() {
                "(none)".to_string()
            } else {
                names.join(", ")
            }
        }
    }
}

pub fn render_form(frame: &mut Frame, app: &App) {
    let Some(ref form) = app.form else {
        return;
    };

    let staff_rows = if form.focus == FormField::Staff {
        app.refs.staff.len().min(8)
    } else {
        0
    };
    let height = FormField::ALL.len() as u16 + staff_rows as u16 + 7;
    let area = centered_rect_fixed(64, height, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![Line::from("")];
    for field in FormField::ALL {
        let focused = form.focus == field;
        let value = field_value(form, field, &app.refs);
        let value_style = if focused {
            styles::selected_style()
        } else {
            styles::list_item_style()
        };
        let cursor = if focused && field.is_text() { "▌" } else { "" };
        let hint = if focused && !field.is_text() {
            if field == FormField::Staff {
                "  ←/→ move, Space toggle"
            } else {
                "  ←/→ change"
            }
        } else {
            ""
        };
        lines.push(Line::from(vec![
            Span::styled(format!(" {:<width$}", field.label(), width = LABEL_WIDTH), styles::muted_style()),
            Span::styled(format!("{}{}", value, cursor), value_style),
            Span::styled(hint, styles::muted_style()),
        ]));

        if focused && field == FormField::Staff {
            for (i, member) in app.refs.staff.iter().take(staff_rows).enumerate() {
                let mark = if form.staff.contains(member.id) { "[x]" } else { "[ ]" };
                let style = if i == form.staff_cursor {
                    styles::selected_style()
                } else {
                    styles::list_item_style()
                };
                lines.push(Line::from(vec![
                    Span::raw(" ".repeat(LABEL_WIDTH + 1)),
                    Span::styled(format!("{} {}", mark, member.display_name()), style),
                ]));
            }
        }
    }

    lines.push(Line::from(""));
    match (&form.error, app.pending) {
        (_, Some(mutation)) => {
            lines.push(Line::from(Span::styled(
                format!(" {}", mutation.status_text()),
                styles::highlight_style(),
            )));
        }
        (Some(error), None) => {
            lines.push(Line::from(Span::styled(format!(" {}", error), styles::error_style())));
        }
        (None, None) => {
            lines.push(Line::from(vec![
                Span::styled(" Tab", styles::help_key_style()),
                Span::styled(" next field  ", styles::muted_style()),
                Span::styled("Enter", styles::help_key_style()),
                Span::styled(" save  ", styles::muted_style()),
                Span::styled("Esc", styles::help_key_style()),
                Span::styled(" cancel", styles::muted_style()),
            ]));
        }
    }

    let paragraph = Paragraph::new(lines).block(dialog_block(form.title_text()));
    frame.render_widget(paragraph, area);
}

pub fn render_delete(frame: &mut Frame, app: &App) {
    let Some(ref prompt) = app.delete_prompt else {
        return;
    };
    let area = centered_rect_fixed(56, 8, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(format!(" {}", prompt.prompt()), styles::highlight_style())),
        Line::from(Span::styled(" This cannot be undone.", styles::muted_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled(" Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to delete, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let paragraph = Paragraph::new(lines).block(dialog_block(" Delete Session ".to_string()));
    frame.render_widget(paragraph, area);
}

pub fn render_copy(frame: &mut Frame, app: &App) {
    let Some(ref selection) = app.copy_selection else {
        return;
    };
    let candidates = selection.candidates();
    let height = candidates.len() as u16 + 8;
    let area = centered_rect_fixed(52, height, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!(" Copy \"{}\" to:", selection.session_title()),
            styles::highlight_style(),
        )),
        Line::from(""),
    ];

    for (i, &day) in candidates.iter().enumerate() {
        let mark = if selection.is_selected(day) { "[x]" } else { "[ ]" };
        let label = app
            .days()
            .iter()
            .find(|d| d.day == day)
            .map(|d| d.tab_label())
            .unwrap_or_else(|| format!("Day {}", day));
        let style = if i == app.copy_cursor {
            styles::selected_style()
        } else {
            styles::list_item_style()
        };
        lines.push(Line::from(Span::styled(format!("  {} {}", mark, label), style)));
    }

    lines.push(Line::from(""));
    if let Some(mutation) = app.pending {
        lines.push(Line::from(Span::styled(
            format!(" {}", mutation.status_text()),
            styles::highlight_style(),
        )));
    } else {
        lines.push(Line::from(vec![
            Span::styled(" Space", styles::help_key_style()),
            Span::styled(" toggle  ", styles::muted_style()),
            Span::styled("a", styles::help_key_style()),
            Span::styled(" all  ", styles::muted_style()),
            Span::styled("Enter", styles::help_key_style()),
            Span::styled(" copy  ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" cancel", styles::muted_style()),
        ]));
    }

    let title = format!(" Copy to Days (from Day {}) ", selection.source_day());
    let paragraph = Paragraph::new(lines).block(dialog_block(title));
    frame.render_widget(paragraph, area);
}
