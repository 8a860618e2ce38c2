//! Runtime UI state that is not part of the document.
//!
//! What cell is being edited, which styles are waiting to be pasted and which
//! cells a fill-handle drag covers. One `WorkbookState` is owned by the view
//! and passed by reference to the renderer and the input handlers.

use crate::types::{ActiveRange, CellStyle, EditingSession, ExtendToArea, Focus};

#[derive(Debug, Default, Clone)]
pub struct WorkbookState {
    editing: Option<EditingSession>,
    copy_styles: Option<Vec<Vec<CellStyle>>>,
    extend_to: Option<ExtendToArea>,
}

impl WorkbookState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn editing_cell(&self) -> Option<&EditingSession> {
        self.editing.as_ref()
    }

    pub fn editing_cell_mut(&mut self) -> Option<&mut EditingSession> {
        self.editing.as_mut()
    }

    pub fn set_editing_cell(&mut self, session: EditingSession) {
        self.editing = Some(session);
    }

    /// Ends the session and hands it back.
    pub fn clear_editing_cell(&mut self) -> Option<EditingSession> {
        self.editing.take()
    }

    /// Text plus pending reference, or empty when not editing.
    pub fn editing_text(&self) -> String {
        self.editing
            .as_ref()
            .map(EditingSession::editing_text)
            .unwrap_or_default()
    }

    pub fn active_ranges(&self) -> &[ActiveRange] {
        self.editing
            .as_ref()
            .map(|s| s.active_ranges.as_slice())
            .unwrap_or_default()
    }

    /// No-op when not editing.
    pub fn set_active_ranges(&mut self, ranges: Vec<ActiveRange>) {
        if let Some(session) = self.editing.as_mut() {
            session.active_ranges = ranges;
        }
    }

    pub fn is_cell_editor_active(&self) -> bool {
        self.editing.as_ref().is_some_and(|s| s.focus == Focus::Cell)
    }

    pub fn is_formula_editor_active(&self) -> bool {
        self.editing
            .as_ref()
            .is_some_and(|s| s.focus == Focus::FormulaBar)
    }

    pub fn copy_styles(&self) -> Option<&[Vec<CellStyle>]> {
        self.copy_styles.as_deref()
    }

    pub fn set_copy_styles(&mut self, styles: Option<Vec<Vec<CellStyle>>>) {
        self.copy_styles = styles;
    }

    pub fn extend_to_area(&self) -> Option<&ExtendToArea> {
        self.extend_to.as_ref()
    }

    pub fn set_extend_to_area(&mut self, area: ExtendToArea) {
        self.extend_to = Some(area);
    }

    pub fn clear_extend_to_area(&mut self) -> Option<ExtendToArea> {
        self.extend_to.take()
    }
}
