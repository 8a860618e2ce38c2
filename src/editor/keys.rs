//! Keyboard events as the grid sees them.

/// A keydown, reduced to the DOM `key` value and its modifiers.
///
/// `ctrl` is set for either Control or Meta so shortcuts work the same on
/// every platform.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyEvent {
    pub key: String,
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl KeyEvent {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ..Self::default()
        }
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn is_plain(&self) -> bool {
        !self.shift && !self.ctrl && !self.alt
    }
}

/// A single printable Latin-1 character, which starts editing when typed
/// on a selected cell.
pub fn is_editing_key(key: &str) -> bool {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => ('\u{1}'..'\u{ff}').contains(&c),
        _ => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn from_arrow(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(Self::Up),
            "ArrowDown" => Some(Self::Down),
            "ArrowLeft" => Some(Self::Left),
            "ArrowRight" => Some(Self::Right),
            _ => None,
        }
    }

    /// Row and column step.
    pub fn delta(self) -> (i64, i64) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("a", true)]
    #[test_case("=", true)]
    #[test_case("é", true)]
    #[test_case(" ", true)]
    #[test_case("Enter", false)]
    #[test_case("€", false ; "outside latin-1")]
    #[test_case("", false)]
    fn editing_keys(key: &str, expected: bool) {
        assert_eq!(is_editing_key(key), expected);
    }

    #[test]
    fn arrows() {
        assert_eq!(Direction::from_arrow("ArrowLeft"), Some(Direction::Left));
        assert_eq!(Direction::from_arrow("Left"), None);
        assert_eq!(Direction::Up.delta(), (-1, 0));
    }
}
