use anyhow::Result;
use ratatui::crossterm::event::{KeyCode, KeyEvent};

use crate::terminal::state::{AppState, Mode};

/// Returns `true` when the app should quit.
pub fn handle_key(key: KeyEvent, state: &mut AppState) -> Result<bool> {
    match state.mode {
        Mode::EditingNote(_) => handle_editing_keys(key, state),
        Mode::Browse => handle_browse_keys(key, state),
    }
}

fn handle_browse_keys(key: KeyEvent, state: &mut AppState) -> Result<bool> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
        KeyCode::Down | KeyCode::Char('j') => state.move_selection(1),
        KeyCode::Up | KeyCode::Char('k') => state.move_selection(-1),
        KeyCode::Enter => state.toggle_selected(),
        KeyCode::Char('e') => state.start_editing(),
        _ => {}
    }
    Ok(false)
}

fn handle_editing_keys(key: KeyEvent, state: &mut AppState) -> Result<bool> {
    match key.code {
        KeyCode::Esc => state.stop_editing(),
        KeyCode::Enter => state.edit_note(|t| t.push('\n')),
        KeyCode::Backspace => state.edit_note(|t| {
            t.pop();
        }),
        KeyCode::Char(c) => state.edit_note(|t| t.push(c)),
        _ => {}
    }
    Ok(false)
}
