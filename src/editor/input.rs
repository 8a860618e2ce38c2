//! The native input control behind the editor overlay.
//!
//! The control owns caret, IME composition and native selection. The editor
//! only reads its value and caret back after a keystroke was applied, and
//! writes to it when it changes the text itself.

/// A text control holding the editing text.
///
/// Caret positions are in characters.
pub trait TextInput {
    fn value(&self) -> String;
    fn set_value(&mut self, value: &str);
    fn selection(&self) -> (usize, usize);
    fn set_selection(&mut self, start: usize, end: usize);
}

/// In-memory control, used off the browser.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    value: String,
    start: usize,
    end: usize,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Types `text` over the current selection, like a keystroke would.
    pub fn type_text(&mut self, text: &str) {
        let mut chars: Vec<char> = self.value.chars().collect();
        let start = self.start.min(chars.len());
        let end = self.end.clamp(start, chars.len());
        chars.splice(start..end, text.chars());
        self.value = chars.into_iter().collect();
        self.start = start + text.chars().count();
        self.end = self.start;
    }

    /// Deletes the selection, or the character before the caret.
    pub fn backspace(&mut self) {
        if self.start == self.end {
            if self.start == 0 {
                return;
            }
            self.start -= 1;
        }
        self.type_text("");
    }
}

impl TextInput for TextBuffer {
    fn value(&self) -> String {
        self.value.clone()
    }

    fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
        let len = self.value.chars().count();
        self.start = len;
        self.end = len;
    }

    fn selection(&self) -> (usize, usize) {
        (self.start, self.end)
    }

    fn set_selection(&mut self, start: usize, end: usize) {
        let len = self.value.chars().count();
        self.start = start.min(len);
        self.end = end.clamp(self.start, len);
    }
}

/// Replaces the selected characters of `text` with `insert`.
pub(crate) fn splice_chars(text: &str, start: usize, end: usize, insert: &str) -> String {
    let head: String = text.chars().take(start).collect();
    let tail: String = text.chars().skip(end.max(start)).collect();
    format!("{head}{insert}{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_replaces_selection() {
        let mut input = TextBuffer::new();
        input.type_text("=SUM(A1)");
        input.set_selection(5, 7);
        input.type_text("B2");
        assert_eq!(input.value(), "=SUM(B2)");
        assert_eq!(input.selection(), (7, 7));
        input.backspace();
        assert_eq!(input.value(), "=SUM(B)");
    }

    #[test]
    fn splice_handles_multibyte() {
        assert_eq!(splice_chars("día", 1, 2, "\n"), "d\na");
        assert_eq!(splice_chars("ab", 2, 2, "c"), "abc");
    }
}
