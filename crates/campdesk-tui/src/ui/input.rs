//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, AppState, PAGE_SCROLL_SIZE};
use crate::form::FormField;

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match app.state {
        AppState::ShowingHelp => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.state = AppState::Normal;
            }
            Ok(false)
        }
        AppState::ConfirmingQuit => handle_quit_input(app, key),
        AppState::EditingSession => {
            handle_form_input(app, key);
            Ok(false)
        }
        AppState::ConfirmingDelete => {
            handle_delete_input(app, key);
            Ok(false)
        }
        AppState::SelectingCopyDays => {
            handle_copy_input(app, key);
            Ok(false)
        }
        AppState::Quitting => Ok(true),
        AppState::Normal => handle_normal_input(app, key),
    }
}

fn handle_quit_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
            if let Some(mutation) = app.pending {
                app.status_message = Some(format!(
                    "Cannot quit while a change is in flight ({})",
                    mutation.status_text()
                ));
                app.state = AppState::Normal;
                return Ok(false);
            }
            app.state = AppState::Quitting;
            return Ok(true);
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.state = AppState::Normal;
        }
        _ => {}
    }
    Ok(false)
}

fn handle_normal_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
        }
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            app.select_day(index);
        }
        KeyCode::Left => app.prev_day(),
        KeyCode::Right => app.next_day(),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(1),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(1),
        KeyCode::PageUp => app.select_prev(PAGE_SCROLL_SIZE),
        KeyCode::PageDown => app.select_next(PAGE_SCROLL_SIZE),
        KeyCode::Home => app.selection = 0,
        KeyCode::Char('v') => app.toggle_view_mode(),

        // Filters
        KeyCode::Char('t') => app.cycle_type_filter(),
        KeyCode::Char('c') => app.cycle_clinician_filter(),
        KeyCode::Char('l') => app.cycle_location_filter(),
        KeyCode::Char('0') | KeyCode::Esc => app.clear_filters(),

        // Session actions
        KeyCode::Char('a') => app.start_add(),
        KeyCode::Char('e') | KeyCode::Enter => app.start_edit(),
        KeyCode::Char('d') | KeyCode::Delete => app.start_delete(),
        KeyCode::Char('y') => app.start_copy(),
        KeyCode::Char('x') => app.export(),
        KeyCode::Char('r') => {
            if !app.store.is_loading() {
                app.refresh();
            }
        }
        _ => {}
    }
    Ok(false)
}

fn handle_form_input(app: &mut App, key: KeyEvent) {
    if app.is_busy() {
        // Keys are ignored while the save is in flight; Esc still closes.
        if key.code == KeyCode::Esc {
            app.close_form();
        }
        return;
    }

    match key.code {
        KeyCode::Esc => {
            app.close_form();
            return;
        }
        KeyCode::Enter => {
            app.submit_form();
            return;
        }
        _ => {}
    }

    let refs = &app.refs;
    let Some(form) = app.form.as_mut() else {
        app.state = AppState::Normal;
        return;
    };

    match key.code {
        KeyCode::Tab | KeyCode::Down => {
            form.focus = form.focus.next();
        }
        KeyCode::BackTab | KeyCode::Up => {
            form.focus = form.focus.prev();
        }
        KeyCode::Left => form.cycle(refs, false),
        KeyCode::Right => form.cycle(refs, true),
        KeyCode::Backspace => {
            form.pop_char();
        }
        KeyCode::Char(' ') if form.focus == FormField::Staff => {
            form.toggle_staff(refs);
        }
        KeyCode::Char(' ') if !form.focus.is_text() => {
            form.cycle(refs, true);
        }
        KeyCode::Char(c) => {
            form.push_char(c);
            form.error = None;
        }
        _ => {}
    }
}

fn handle_delete_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_delete(),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_delete(),
        _ => {}
    }
}

fn handle_copy_input(app: &mut App, key: KeyEvent) {
    if app.is_busy() {
        return;
    }
    match key.code {
        KeyCode::Esc => app.cancel_copy(),
        KeyCode::Up | KeyCode::Char('k') => app.move_copy_cursor(false),
        KeyCode::Down | KeyCode::Char('j') => app.move_copy_cursor(true),
        KeyCode::Char(' ') => app.toggle_copy_day(),
        KeyCode::Char('a') => app.toggle_all_copy_days(),
        KeyCode::Enter => app.submit_copy(),
        _ => {}
    }
}
