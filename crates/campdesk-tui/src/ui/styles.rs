use ratatui::style::{Color, Modifier, Style};

use campdesk_core::models::{SessionStatus, SessionType};

// Rink palette
pub const ICE: Color = Color::Rgb(90, 150, 210);
pub const TURF: Color = Color::Rgb(88, 168, 104);
pub const AMBER: Color = Color::Rgb(214, 168, 72);
pub const SIREN: Color = Color::Rgb(200, 72, 72);
pub const SLATE: Color = Color::Rgb(120, 124, 132);
pub const BOARDS: Color = Color::Rgb(40, 44, 60);
pub const TEAL: Color = Color::Rgb(96, 176, 176);
pub const VIOLET: Color = Color::Rgb(160, 104, 196);

const TEXT: Color = Color::White;

pub fn title_style() -> Style {
    Style::default().fg(ICE).add_modifier(Modifier::BOLD)
}

/// Highlighted table row and focused form field.
pub fn selected_style() -> Style {
    Style::default().bg(BOARDS).add_modifier(Modifier::BOLD)
}

pub fn list_item_style() -> Style {
    Style::default().fg(TEXT)
}

pub fn muted_style() -> Style {
    Style::default().fg(SLATE)
}

pub fn highlight_style() -> Style {
    Style::default().fg(AMBER)
}

pub fn success_style() -> Style {
    Style::default().fg(TURF)
}

pub fn error_style() -> Style {
    Style::default().fg(SIREN)
}

pub fn tab_style(selected: bool) -> Style {
    if selected {
        title_style().add_modifier(Modifier::UNDERLINED)
    } else {
        muted_style()
    }
}

pub fn border_style() -> Style {
    Style::default().fg(ICE)
}

pub fn status_bar_style() -> Style {
    Style::default().bg(Color::Rgb(28, 30, 40)).fg(TEXT)
}

pub fn help_key_style() -> Style {
    highlight_style().add_modifier(Modifier::BOLD)
}

pub fn help_desc_style() -> Style {
    list_item_style()
}

/// Timeline bar color by session type.
pub fn session_type_style(session_type: SessionType) -> Style {
    let color = match session_type {
        SessionType::Opening => VIOLET,
        SessionType::Instruction | SessionType::Lecture => ICE,
        SessionType::Drill | SessionType::Scrimmage => TURF,
        SessionType::Evaluation => AMBER,
        SessionType::Break | SessionType::Meal => SLATE,
        SessionType::Activity | SessionType::Other => TEAL,
    };
    Style::default().fg(color)
}

pub fn status_style(status: SessionStatus) -> Style {
    match status {
        SessionStatus::Draft => muted_style(),
        SessionStatus::Scheduled => list_item_style(),
        SessionStatus::Completed => success_style(),
        SessionStatus::Cancelled => error_style(),
    }
}
