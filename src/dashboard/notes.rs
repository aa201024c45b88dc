use std::collections::HashMap;

/// Per-meeting scratch notes plus the single expanded meeting.
///
/// Keys are positions in the current meeting list, so the whole editor is
/// cleared whenever that list is replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteEditor {
    notes: HashMap<usize, String>,
    expanded: Option<usize>,
}

impl NoteEditor {
    /// Collapse `index` if it is the expanded one, otherwise expand it.
    pub fn toggle(&mut self, index: usize) {
        self.expanded = if self.expanded == Some(index) {
            None
        } else {
            Some(index)
        };
    }

    pub fn set_note(&mut self, index: usize, text: impl Into<String>) {
        self.notes.insert(index, text.into());
    }

    pub fn note(&self, index: usize) -> &str {
        self.notes.get(&index).map(String::as_str).unwrap_or("")
    }

    pub fn expanded(&self) -> Option<usize> {
        self.expanded
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty() && self.expanded.is_none()
    }

    pub fn reset(&mut self) {
        self.notes.clear();
        self.expanded = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_same_index_collapses() {
        let mut n = NoteEditor::default();
        n.toggle(2);
        assert_eq!(n.expanded(), Some(2));
        n.toggle(2);
        assert_eq!(n.expanded(), None);
    }

    #[test]
    fn only_one_meeting_is_expanded() {
        let mut n = NoteEditor::default();
        n.toggle(2);
        n.toggle(5);
        assert_eq!(n.expanded(), Some(5));
    }

    #[test]
    fn notes_upsert_by_index() {
        let mut n = NoteEditor::default();
        n.set_note(1, "draft");
        n.set_note(1, "final");
        assert_eq!(n.note(1), "final");
        assert_eq!(n.note(0), "");
        n.reset();
        assert!(n.is_empty());
    }
}
