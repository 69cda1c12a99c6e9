//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes. Overlay states take priority, then the
//! open view. Form views consume plain characters, so global shortcuts
//! only live on the list view (plus Ctrl-modified keys in forms).

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{can_add_field_char, App, AppState, FormField, Tab, PAGE_SCROLL_SIZE};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    // Handle remove-all confirmation
    if matches!(app.state, AppState::ConfirmingRemoveAll) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Normal;
                app.remove_all();
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    // Handle filter mode
    if matches!(app.state, AppState::Filtering) {
        return handle_filter_input(app, key);
    }

    // Route to the open view
    match app.current_tab {
        Tab::Tutorials => {
            if app.edit.is_some() {
                handle_edit_input(app, key)
            } else {
                handle_list_input(app, key)
            }
        }
        Tab::Add => handle_create_input(app, key),
    }
}

/// Filter mode: characters narrow the memoized client-side filter.
/// No key in here touches the network.
fn handle_filter_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            app.state = AppState::Normal;
            app.list.filter.clear();
        }
        KeyCode::Enter => {
            // Keep the filter active
            app.state = AppState::Normal;
        }
        KeyCode::Backspace => {
            app.list.filter.pop();
        }
        KeyCode::Char(c) => {
            if can_add_field_char(app.list.filter.len(), c) {
                app.list.filter.push(c);
            }
        }
        _ => {}
    }
    Ok(false)
}

fn handle_list_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
        }
        KeyCode::Char('1') => app.switch_tab(Tab::Tutorials),
        KeyCode::Char('2') => app.switch_tab(Tab::Add),
        KeyCode::Left | KeyCode::Right => {
            let tab = app.current_tab;
            app.switch_tab(if key.code == KeyCode::Left {
                tab.prev()
            } else {
                tab.next()
            });
        }
        KeyCode::Char('/') => {
            app.state = AppState::Filtering;
            app.list.filter.clear();
        }
        KeyCode::Char('p') => app.toggle_published_only(),
        KeyCode::Char('D') => {
            app.state = AppState::ConfirmingRemoveAll;
        }
        KeyCode::Char('u') => app.refresh_subscribed(),
        KeyCode::Up => app.list_move_up(1),
        KeyCode::Down => app.list_move_down(1),
        KeyCode::PageUp => app.list_move_up(PAGE_SCROLL_SIZE),
        KeyCode::PageDown => app.list_move_down(PAGE_SCROLL_SIZE),
        KeyCode::Enter => {
            if let Some(id) = app.selected_tutorial().map(|t| t.id) {
                app.open_edit(id);
            }
        }
        KeyCode::Esc => {
            app.list.filter.clear();
        }
        _ => {}
    }
    Ok(false)
}

fn handle_edit_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Ctrl-modified actions never collide with text entry
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('p') | KeyCode::Char('P') => app.toggle_publish(),
            KeyCode::Char('d') | KeyCode::Char('D') => app.delete_current(),
            KeyCode::Char('s') | KeyCode::Char('S') => app.submit_edit(),
            _ => {}
        }
        return Ok(false);
    }

    match key.code {
        KeyCode::Esc => app.back_to_list(),
        KeyCode::Tab | KeyCode::Down => {
            if let Some(edit) = app.edit.as_mut() {
                edit.field = edit.field.next();
            }
        }
        KeyCode::BackTab | KeyCode::Up => {
            if let Some(edit) = app.edit.as_mut() {
                edit.field = edit.field.prev();
            }
        }
        KeyCode::Enter => {
            let on_save = app
                .edit
                .as_ref()
                .is_some_and(|e| e.field == FormField::Save);
            if on_save {
                app.submit_edit();
            } else if let Some(edit) = app.edit.as_mut() {
                edit.field = edit.field.next();
            }
        }
        KeyCode::Backspace => {
            if let Some(edit) = app.edit.as_mut() {
                let buffer = match edit.field {
                    FormField::Title => &mut edit.draft.title,
                    FormField::Description => &mut edit.draft.description,
                    FormField::Save => return Ok(false),
                };
                if buffer.pop().is_some() {
                    edit.dirty = true;
                }
            }
        }
        KeyCode::Char(c) => {
            if let Some(edit) = app.edit.as_mut() {
                let buffer = match edit.field {
                    FormField::Title => &mut edit.draft.title,
                    FormField::Description => &mut edit.draft.description,
                    FormField::Save => return Ok(false),
                };
                if can_add_field_char(buffer.len(), c) {
                    buffer.push(c);
                    edit.dirty = true;
                }
            }
        }
        _ => {}
    }
    Ok(false)
}

fn handle_create_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if matches!(key.code, KeyCode::Char('s') | KeyCode::Char('S')) {
            app.submit_create();
        }
        return Ok(false);
    }

    match key.code {
        KeyCode::Esc | KeyCode::Left | KeyCode::Right => app.switch_tab(Tab::Tutorials),
        KeyCode::Tab | KeyCode::Down => {
            app.create.field = app.create.field.next();
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.create.field = app.create.field.prev();
        }
        KeyCode::Enter => {
            if app.create.field == FormField::Save {
                app.submit_create();
            } else {
                app.create.field = app.create.field.next();
            }
        }
        KeyCode::Backspace => {
            let buffer = match app.create.field {
                FormField::Title => &mut app.create.draft.title,
                FormField::Description => &mut app.create.draft.description,
                FormField::Save => return Ok(false),
            };
            buffer.pop();
        }
        KeyCode::Char(c) => {
            let buffer = match app.create.field {
                FormField::Title => &mut app.create.draft.title,
                FormField::Description => &mut app.create.draft.description,
                FormField::Save => return Ok(false),
            };
            if can_add_field_char(buffer.len(), c) {
                buffer.push(c);
            }
        }
        _ => {}
    }
    Ok(false)
}
