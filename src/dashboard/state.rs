use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

use crate::dashboard::notes::NoteEditor;
use crate::domain::category::ClassificationResult;
use crate::domain::email::{EMAIL_PREVIEW_COUNT, EmailRecord};
use crate::domain::meeting::MeetingRecord;

/// Identifies one sync cycle. Updates carrying an outdated token are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleToken(u64);

/// Everything the dashboard shows. Read access is public; mutation goes
/// through the sync cycle entry points or the note editor.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardState {
    emails: Vec<EmailRecord>,
    meetings: Vec<MeetingRecord>,
    classification: ClassificationResult,
    loading: bool,
    last_error: Option<String>,

    #[serde(skip)]
    notes: NoteEditor,
    #[serde(skip)]
    cycles_started: u64,
    #[serde(skip)]
    in_flight: Option<u64>,
}

impl DashboardState {
    pub fn emails(&self) -> &[EmailRecord] {
        &self.emails
    }

    pub fn meetings(&self) -> &[MeetingRecord] {
        &self.meetings
    }

    pub fn classification(&self) -> &ClassificationResult {
        &self.classification
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn notes(&self) -> &NoteEditor {
        &self.notes
    }

    pub(crate) fn begin_cycle(&mut self) -> CycleToken {
        self.cycles_started += 1;
        self.in_flight = Some(self.cycles_started);
        self.loading = true;
        self.last_error = None;
        CycleToken(self.cycles_started)
    }

    fn is_current(&self, token: CycleToken) -> bool {
        if self.in_flight == Some(token.0) {
            true
        } else {
            log::debug!("discarding update from stale cycle {}", token.0);
            false
        }
    }

    /// Keeps only the newest [`EMAIL_PREVIEW_COUNT`] entries, in delivered order.
    pub(crate) fn replace_emails(&mut self, token: CycleToken, mut emails: Vec<EmailRecord>) -> bool {
        if !self.is_current(token) {
            return false;
        }
        emails.truncate(EMAIL_PREVIEW_COUNT);
        self.emails = emails;
        true
    }

    /// Note and expansion state are positional, so they are reset along with the list.
    pub(crate) fn replace_meetings(&mut self, token: CycleToken, meetings: Vec<MeetingRecord>) -> bool {
        if !self.is_current(token) {
            return false;
        }
        self.meetings = meetings;
        self.notes.reset();
        true
    }

    pub(crate) fn replace_classification(
        &mut self,
        token: CycleToken,
        classification: ClassificationResult,
    ) -> bool {
        if !self.is_current(token) {
            return false;
        }
        self.classification = classification;
        true
    }

    pub(crate) fn record_error(&mut self, token: CycleToken, message: String) {
        if self.is_current(token) {
            self.last_error = Some(message);
        }
    }

    pub(crate) fn finish_cycle(&mut self, token: CycleToken) {
        if self.is_current(token) {
            self.in_flight = None;
            self.loading = false;
        }
    }
}

/// Shared handle to a [`DashboardState`] for the single UI thread.
///
/// Borrows never outlive a call, so no borrow is held across an await.
#[derive(Debug, Clone, Default)]
pub struct Dashboard(Rc<RefCell<DashboardState>>);

impl Dashboard {
    /// Dashboard for a session whose first cycle is about to be scheduled.
    /// It shows as loading until that cycle finishes.
    pub fn awaiting_first_cycle() -> Self {
        Self(Rc::new(RefCell::new(DashboardState {
            loading: true,
            ..Default::default()
        })))
    }

    pub fn snapshot(&self) -> DashboardState {
        self.0.borrow().clone()
    }

    pub fn read<R>(&self, f: impl FnOnce(&DashboardState) -> R) -> R {
        f(&self.0.borrow())
    }

    pub fn is_loading(&self) -> bool {
        self.0.borrow().loading
    }

    pub fn toggle(&self, index: usize) {
        self.0.borrow_mut().notes.toggle(index);
    }

    pub fn set_note(&self, index: usize, text: impl Into<String>) {
        self.0.borrow_mut().notes.set_note(index, text);
    }

    pub(crate) fn apply<R>(&self, f: impl FnOnce(&mut DashboardState) -> R) -> R {
        f(&mut self.0.borrow_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email(subject: &str) -> EmailRecord {
        EmailRecord {
            subject: Some(subject.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn keeps_first_three_emails_in_order() {
        let mut s = DashboardState::default();
        let t = s.begin_cycle();
        let ten: Vec<_> = (0..10).map(|i| email(&format!("m{i}"))).collect();
        assert!(s.replace_emails(t, ten));

        let subjects: Vec<_> = s.emails().iter().map(|e| e.subject_or_placeholder()).collect();
        assert_eq!(subjects, ["m0", "m1", "m2"]);
    }

    #[test]
    fn replacing_meetings_resets_notes() {
        let d = Dashboard::default();
        d.toggle(1);
        d.set_note(1, "bring slides");

        let t = d.apply(|s| s.begin_cycle());
        d.apply(|s| s.replace_meetings(t, vec![MeetingRecord("Standup 9:00".into())]));

        assert!(d.read(|s| s.notes().is_empty()));
        assert_eq!(d.read(|s| s.meetings().len()), 1);
    }

    #[test]
    fn first_cycle_clears_initial_loading() {
        let d = Dashboard::awaiting_first_cycle();
        assert!(d.is_loading());
        let t = d.apply(|s| s.begin_cycle());
        assert!(d.is_loading());
        d.apply(|s| s.finish_cycle(t));
        assert!(!d.is_loading());
    }

    #[test]
    fn stale_cycle_cannot_write_or_clear_loading() {
        let mut s = DashboardState::default();
        let old = s.begin_cycle();
        let new = s.begin_cycle();

        assert!(!s.replace_emails(old, vec![email("stale")]));
        s.finish_cycle(old);
        assert!(s.is_loading());
        assert!(s.emails().is_empty());

        s.finish_cycle(new);
        assert!(!s.is_loading());
    }
}
