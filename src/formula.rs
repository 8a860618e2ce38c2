//! Reference highlighting for formula text being edited.
//!
//! [`tokenize`] splits the text into literal and reference tokens that cover
//! the input exactly; [`highlight`] resolves the references against the
//! workbook's sheets, gives every distinct target a palette color and collects
//! the ranges to outline on the grid. Both are pure functions of their input.
//!
//! Only enough of the formula grammar is recognized to find references:
//! string literals, quoted and plain sheet prefixes, `A1` / `$A$1:B2` ranges,
//! function names and numbers. Everything else is literal text.

use serde::Serialize;

use crate::cell_ref::parse_range;
use crate::render::colors::reference_color;
use crate::types::{ActiveRange, Area};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenKind {
    Literal,
    Reference,
}

/// Where a reference token points, as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenReference {
    /// Unquoted sheet prefix; `None` for references to the sheet being edited
    pub sheet_name: Option<String>,
    /// Range in the written corner order
    pub area: Area,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormulaToken {
    pub kind: TokenKind,
    pub text: String,
    pub reference: Option<TokenReference>,
    /// Palette color, set by [`highlight`] on reference tokens
    pub color: Option<String>,
}

impl FormulaToken {
    fn literal(text: String) -> Self {
        Self {
            kind: TokenKind::Literal,
            text,
            reference: None,
            color: None,
        }
    }

    fn reference(text: String, sheet_name: Option<String>, area: Area) -> Self {
        Self {
            kind: TokenKind::Reference,
            text,
            reference: Some(TokenReference { sheet_name, area }),
            color: None,
        }
    }

    pub fn is_reference(&self) -> bool {
        self.kind == TokenKind::Reference
    }
}

/// Tokens plus the ranges they highlight on the grid.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    pub tokens: Vec<FormulaToken>,
    /// One normalized range per distinct target on a known sheet
    pub active_ranges: Vec<ActiveRange>,
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '$')
}

fn is_ref_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '$'
}

/// Characters that may not follow a reference without making it something else.
fn continues_name(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '.' | '(' | '!')
}

fn collect(chars: &[char], start: usize, end: usize) -> String {
    chars.get(start..end).map(|s| s.iter().collect()).unwrap_or_default()
}

fn run_end(chars: &[char], start: usize, pred: fn(char) -> bool) -> usize {
    let mut end = start;
    while chars.get(end).is_some_and(|c| pred(*c)) {
        end += 1;
    }
    end
}

/// A range (`A1` or `A1:B2`) starting at `start`. Returns where it ends.
fn range_at(chars: &[char], start: usize) -> Option<(usize, Area)> {
    let first_end = run_end(chars, start, is_ref_char);
    if first_end == start {
        return None;
    }
    let bounded = |end: usize| !chars.get(end).is_some_and(|c| continues_name(*c));

    if chars.get(first_end) == Some(&':') {
        let second_end = run_end(chars, first_end + 1, is_ref_char);
        if second_end > first_end + 1 && bounded(second_end) {
            if let Some(area) = parse_range(&collect(chars, start, second_end)) {
                return Some((second_end, area));
            }
        }
    }
    if !bounded(first_end) {
        return None;
    }
    parse_range(&collect(chars, start, first_end)).map(|area| (first_end, area))
}

/// End of a delimited run opened at `start` by `quote`, where a doubled
/// quote is an escape. Unterminated runs end at the end of the text.
fn quoted_end(chars: &[char], start: usize, quote: char) -> usize {
    let mut i = start + 1;
    while let Some(c) = chars.get(i) {
        if *c == quote {
            if chars.get(i + 1) == Some(&quote) {
                i += 2;
                continue;
            }
            return i + 1;
        }
        i += 1;
    }
    chars.len()
}

fn number_end(chars: &[char], start: usize) -> usize {
    let mut end = run_end(chars, start, |c| c.is_ascii_digit() || c == '.');
    if matches!(chars.get(end), Some('e' | 'E')) {
        let mut exp = end + 1;
        if matches!(chars.get(exp), Some('+' | '-')) {
            exp += 1;
        }
        let digits = run_end(chars, exp, |c| c.is_ascii_digit());
        if digits > exp {
            end = digits;
        }
    }
    end
}

/// Appends literal text, merging it into a trailing literal.
fn push_literal(tokens: &mut Vec<FormulaToken>, text: String) {
    if text.is_empty() {
        return;
    }
    match tokens.last_mut() {
        Some(last) if last.kind == TokenKind::Literal => last.text.push_str(&text),
        _ => tokens.push(FormulaToken::literal(text)),
    }
}

/// Split `text` into literal and reference tokens.
///
/// Text that is not a formula (no leading `=`) is a single literal. The
/// concatenation of the token texts is always `text`.
pub fn tokenize(text: &str) -> Vec<FormulaToken> {
    if text.is_empty() {
        return Vec::new();
    }
    if !text.starts_with('=') {
        return vec![FormulaToken::literal(text.to_string())];
    }

    let chars: Vec<char> = text.chars().collect();
    let mut tokens: Vec<FormulaToken> = Vec::new();
    push_literal(&mut tokens, "=".to_string());
    let mut pos = 1;
    while let Some(&c) = chars.get(pos) {
        match c {
            '"' => {
                let end = quoted_end(&chars, pos, '"');
                push_literal(&mut tokens, collect(&chars, pos, end));
                pos = end;
            }
            '\'' => {
                let name_end = quoted_end(&chars, pos, '\'');
                let quoted = collect(&chars, pos, name_end);
                let range = (chars.get(name_end) == Some(&'!'))
                    .then(|| range_at(&chars, name_end + 1))
                    .flatten();
                match range {
                    Some((end, area)) => {
                        let name = crate::cell_ref::unquote_name(&quoted);
                        tokens.push(FormulaToken::reference(
                            collect(&chars, pos, end),
                            Some(name),
                            area,
                        ));
                        pos = end;
                    }
                    None => {
                        push_literal(&mut tokens, quoted);
                        pos = name_end;
                    }
                }
            }
            c if c.is_ascii_alphabetic() || c == '$' || c == '_' => {
                let word_end = run_end(&chars, pos, is_word_char);
                let word = collect(&chars, pos, word_end);
                match chars.get(word_end) {
                    Some('!') => match range_at(&chars, word_end + 1) {
                        Some((end, area)) => {
                            tokens.push(FormulaToken::reference(
                                collect(&chars, pos, end),
                                Some(word),
                                area,
                            ));
                            pos = end;
                        }
                        None => {
                            push_literal(&mut tokens, word);
                            pos = word_end;
                        }
                    },
                    Some('(') => {
                        push_literal(&mut tokens, word);
                        pos = word_end;
                    }
                    _ => match range_at(&chars, pos) {
                        Some((end, area)) => {
                            tokens.push(FormulaToken::reference(
                                collect(&chars, pos, end),
                                None,
                                area,
                            ));
                            pos = end;
                        }
                        None => {
                            push_literal(&mut tokens, word);
                            pos = word_end;
                        }
                    },
                }
            }
            c if c.is_ascii_digit() => {
                let end = number_end(&chars, pos);
                push_literal(&mut tokens, collect(&chars, pos, end));
                pos = end;
            }
            other => {
                push_literal(&mut tokens, other.to_string());
                pos += 1;
            }
        }
    }
    tokens
}

#[derive(PartialEq, Eq)]
enum Target {
    Sheet(u32),
    Unknown(String),
}

/// Tokenize `text` and color its references.
///
/// References without a sheet prefix point at `current_sheet`. Sheet names
/// match case-insensitively; a reference to a sheet that does not exist is
/// still colored but highlights nothing. The same target always gets the same
/// color, and colors are handed out in order of first appearance.
pub fn highlight(text: &str, current_sheet: u32, sheet_names: &[String]) -> Highlight {
    let mut tokens = tokenize(text);
    let mut targets: Vec<(Target, Area, String)> = Vec::new();
    let mut active_ranges = Vec::new();

    for token in &mut tokens {
        let Some(reference) = &token.reference else {
            continue;
        };
        let target = match &reference.sheet_name {
            None => Target::Sheet(current_sheet),
            Some(name) => sheet_index(sheet_names, name)
                .map_or_else(|| Target::Unknown(name.to_lowercase()), Target::Sheet),
        };
        let area = reference.area.normalized();

        if let Some((_, _, color)) = targets.iter().find(|(t, a, _)| *t == target && *a == area) {
            token.color = Some(color.clone());
            continue;
        }
        let color = reference_color(targets.len()).to_string();
        if let Target::Sheet(sheet) = target {
            active_ranges.push(ActiveRange {
                sheet,
                area,
                color: color.clone(),
            });
        }
        token.color = Some(color.clone());
        targets.push((target, area, color));
    }

    Highlight {
        tokens,
        active_ranges,
    }
}

/// Index of the sheet called `name`, ignoring case.
pub fn sheet_index(sheet_names: &[String], name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    sheet_names
        .iter()
        .position(|n| n.to_lowercase() == lower)
        .and_then(|i| u32::try_from(i).ok())
}

/// Whether a click on the grid should insert a reference at the caret.
///
/// True for a formula when the caret (a char index) sits at the end right
/// after an operator, a comma or an opening parenthesis. A lone `=` always is.
pub fn is_in_reference_mode(text: &str, cursor: usize) -> bool {
    if !text.starts_with('=') {
        return false;
    }
    if text == "=" {
        return true;
    }
    let len = text.chars().count();
    cursor == len
        && text
            .chars()
            .last()
            .is_some_and(|c| matches!(c, ',' | '(' | '+' | '*' | '-' | '/' | '<' | '>' | '=' | '&'))
}
