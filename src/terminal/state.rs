use ratatui::widgets::ListState;

use crate::session::SessionContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Browse,
    /// Typing into the note of this meeting index.
    EditingNote(usize),
}

pub struct AppState {
    pub session: Option<SessionContext>,
    pub list_state: ListState,
    pub mode: Mode,
}

impl AppState {
    pub fn new(session: Option<SessionContext>) -> Self {
        let mut s = Self {
            session,
            list_state: ListState::default(),
            mode: Mode::Browse,
        };
        s.list_state.select(Some(0));
        s
    }

    fn meeting_count(&self) -> usize {
        self.session
            .as_ref()
            .map(|s| s.dashboard.read(|d| d.meetings().len()))
            .unwrap_or(0)
    }

    /// Bring selection and edit mode back in line after the dashboard changed
    /// underneath us (e.g. a cycle replaced the meeting list).
    pub fn reconcile(&mut self) {
        let len = self.meeting_count();
        match self.list_state.selected() {
            _ if len == 0 => self.list_state.select(None),
            Some(i) if i >= len => self.list_state.select(Some(len - 1)),
            None => self.list_state.select(Some(0)),
            _ => {}
        }

        if let Mode::EditingNote(idx) = self.mode {
            let still_open = self
                .session
                .as_ref()
                .is_some_and(|s| s.dashboard.read(|d| d.notes().expanded()) == Some(idx));
            if !still_open {
                self.mode = Mode::Browse;
            }
        }
    }

    pub fn move_selection(&mut self, delta: i32) {
        let len = self.meeting_count();
        if len == 0 {
            self.list_state.select(None);
            return;
        }
        let cur = self.list_state.selected().unwrap_or(0) as i32;
        let next = (cur + delta).clamp(0, len as i32 - 1) as usize;
        self.list_state.select(Some(next));
    }

    pub fn toggle_selected(&mut self) {
        let (Some(session), Some(idx)) = (&self.session, self.list_state.selected()) else {
            return;
        };
        session.dashboard.toggle(idx);
        self.mode = Mode::Browse;
    }

    /// Only the expanded meeting can be edited.
    pub fn start_editing(&mut self) {
        let Some(session) = &self.session else {
            return;
        };
        if let Some(idx) = session.dashboard.read(|d| d.notes().expanded()) {
            self.mode = Mode::EditingNote(idx);
        }
    }

    pub fn stop_editing(&mut self) {
        self.mode = Mode::Browse;
    }

    pub fn edit_note(&mut self, f: impl FnOnce(&mut String)) {
        let (Mode::EditingNote(idx), Some(session)) = (self.mode, &self.session) else {
            return;
        };
        let mut text = session.dashboard.read(|d| d.notes().note(idx).to_string());
        f(&mut text);
        session.dashboard.set_note(idx, text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Identity, SessionTracker};

    fn app() -> AppState {
        let session = SessionTracker::new().observe(Some(Identity::new("u")));
        AppState::new(session)
    }

    #[test]
    fn editing_requires_expanded_meeting() {
        let mut a = app();
        a.start_editing();
        assert_eq!(a.mode, Mode::Browse);

        a.session.as_ref().unwrap().dashboard.toggle(0);
        a.start_editing();
        assert_eq!(a.mode, Mode::EditingNote(0));

        a.edit_note(|t| t.push_str("hi"));
        a.edit_note(|t| {
            t.pop();
        });
        let note = a.session.as_ref().unwrap().dashboard.read(|d| d.notes().note(0).to_string());
        assert_eq!(note, "h");
    }

    #[test]
    fn collapsed_meeting_ends_editing() {
        let mut a = app();
        let dash = a.session.as_ref().unwrap().dashboard.clone();
        dash.toggle(0);
        a.start_editing();
        dash.toggle(0);
        a.reconcile();
        assert_eq!(a.mode, Mode::Browse);
    }

    #[test]
    fn no_session_is_inert() {
        let mut a = AppState::new(None);
        a.toggle_selected();
        a.start_editing();
        a.move_selection(1);
        assert_eq!(a.mode, Mode::Browse);
        assert_eq!(a.list_state.selected(), None);
    }
}
