use serde::{Deserialize, Serialize};

use super::{Area, SheetArea};

/// Which editor surface owns the keyboard while editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Focus {
    #[default]
    Cell,
    FormulaBar,
}

/// How arrow keys behave while editing.
///
/// In `Accept` mode arrows commit (or steer a reference); in `Edit` mode they
/// move the caret inside the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EditorMode {
    #[default]
    Accept,
    Edit,
}

/// A range picked with the pointer or arrows while typing a formula, not yet
/// part of the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferencedRange {
    pub range: SheetArea,
    /// Text that will be appended on commit, e.g. `B3` or `Data!A1:A4`.
    pub str: String,
}

/// A formula reference highlighted on the grid while editing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveRange {
    pub sheet: u32,
    /// Always normalized.
    #[serde(flatten)]
    pub area: Area,
    pub color: String,
}

/// The in-progress edit of one cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditingSession {
    pub sheet: u32,
    pub row: u32,
    pub column: u32,
    /// Raw text of the input control, without the pending reference.
    pub text: String,
    /// Caret/selection in characters.
    pub cursor_start: usize,
    pub cursor_end: usize,
    pub focus: Focus,
    pub mode: EditorMode,
    pub referenced_range: Option<ReferencedRange>,
    pub active_ranges: Vec<ActiveRange>,
    /// Editor box size; starts at the cell size and grows with content.
    pub editor_width: f64,
    pub editor_height: f64,
}

impl EditingSession {
    /// New session with the caret at the end of `text`.
    pub fn new(
        sheet: u32,
        row: u32,
        column: u32,
        text: String,
        mode: EditorMode,
        editor_width: f64,
        editor_height: f64,
    ) -> Self {
        let len = text.chars().count();
        Self {
            sheet,
            row,
            column,
            text,
            cursor_start: len,
            cursor_end: len,
            focus: Focus::Cell,
            mode,
            referenced_range: None,
            active_ranges: Vec::new(),
            editor_width,
            editor_height,
        }
    }

    /// Text to commit: the raw text plus the pending reference, if any.
    pub fn editing_text(&self) -> String {
        match &self.referenced_range {
            Some(r) => format!("{}{}", self.text, r.str),
            None => self.text.clone(),
        }
    }

    pub fn is_at(&self, sheet: u32, row: u32, column: u32) -> bool {
        self.sheet == sheet && self.row == row && self.column == column
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editing_text_appends_reference() {
        let mut session =
            EditingSession::new(0, 1, 1, "=SUM(".to_string(), EditorMode::Accept, 100.0, 24.0);
        assert_eq!(session.cursor_start, 5);
        assert_eq!(session.editing_text(), "=SUM(");
        session.referenced_range = Some(ReferencedRange {
            range: SheetArea {
                sheet: 0,
                area: Area::new(2, 1, 4, 1),
            },
            str: "A2:A4".to_string(),
        });
        assert_eq!(session.editing_text(), "=SUM(A2:A4");
    }
}
