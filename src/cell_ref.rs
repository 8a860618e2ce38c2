//! Utilities for A1-style cell references, column letters and sheet names.
//!
//! Rows and columns are 1-based throughout.

use crate::config::{LAST_COLUMN, LAST_ROW};
use crate::types::Area;

/// Column letters for a 1-based column number (`1` -> `A`, `28` -> `AB`).
///
/// Returns an empty string for column 0.
pub fn column_name(column: u32) -> String {
    let mut n = column;
    let mut out = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        // rem < 26
        #[allow(clippy::cast_possible_truncation)]
        out.push(char::from(b'A' + rem as u8));
        n = (n - 1) / 26;
    }
    out.iter().rev().collect()
}

/// 1-based column number from letters (`A` -> `1`). Case-insensitive.
pub fn column_number(letters: &str) -> Option<u32> {
    if letters.is_empty() || letters.len() > 3 {
        return None;
    }
    let mut col: u32 = 0;
    for b in letters.bytes() {
        if !b.is_ascii_alphabetic() {
            return None;
        }
        col = col * 26 + u32::from(b.to_ascii_uppercase() - b'A') + 1;
    }
    if col > LAST_COLUMN {
        return None;
    }
    Some(col)
}

/// Parse a reference like `B3` or `$B$3` into `(row, column)`, 1-based.
pub fn parse_cell_ref(cell_ref: &str) -> Option<(u32, u32)> {
    let s = cell_ref.trim();
    let s = s.strip_prefix('$').unwrap_or(s);
    let split = s.find(|c: char| !c.is_ascii_alphabetic())?;
    let (letters, rest) = s.split_at(split);
    let digits = rest.strip_prefix('$').unwrap_or(rest);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let column = column_number(letters)?;
    let row: u32 = digits.parse().ok()?;
    if row == 0 || row > LAST_ROW {
        return None;
    }
    Some((row, column))
}

/// Parse `A1` or `A1:B10` into an [`Area`]. The area keeps the written order.
pub fn parse_range(range: &str) -> Option<Area> {
    if let Some((start, end)) = range.split_once(':') {
        let (r1, c1) = parse_cell_ref(start)?;
        let (r2, c2) = parse_cell_ref(end)?;
        Some(Area::new(r1, c1, r2, c2))
    } else {
        let (row, column) = parse_cell_ref(range)?;
        Some(Area::cell(row, column))
    }
}

fn name_needs_quoting(name: &str) -> bool {
    name.chars()
        .any(|c| matches!(c, ' ' | '(' | ')' | '\'' | '$' | ',' | ';' | '-' | '+' | '{' | '}'))
}

/// Quote a sheet name for use in a reference when it needs it.
pub fn quote_name(name: &str) -> String {
    if name_needs_quoting(name) {
        return format!("'{}'", name.replace('\'', "''"));
    }
    name.to_string()
}

/// Inverse of [`quote_name`] for the text before a `!`.
pub fn unquote_name(name: &str) -> String {
    match name.strip_prefix('\'').and_then(|n| n.strip_suffix('\'')) {
        Some(inner) => inner.replace("''", "'"),
        None => name.to_string(),
    }
}

/// Text of a referenced range as it is inserted into a formula.
///
/// The sheet prefix is only written when `sheet` differs from the sheet being
/// edited. Corners are written in the order given so a reversed drag reads
/// back the way it was made.
pub fn range_to_str(sheet: u32, area: &Area, editing_sheet: u32, sheet_name: &str) -> String {
    let prefix = if sheet == editing_sheet {
        String::new()
    } else {
        format!("{}!", quote_name(sheet_name))
    };
    if area.is_single_cell() {
        return format!(
            "{prefix}{}{}",
            column_name(area.column_start),
            area.row_start
        );
    }
    format!(
        "{prefix}{}{}:{}{}",
        column_name(area.column_start),
        area.row_start,
        column_name(area.column_end),
        area.row_end
    )
}

/// Name-box text for a selection: `B3`, `B:D`, `2:5` or `B2:D5`.
pub fn selection_address(range: &Area, row: u32, column: u32) -> String {
    let (r1, c1, r2, c2) = range.bounds();
    if range.is_single_cell() {
        return format!("{}{row}", column_name(column));
    }
    if r1 == 1 && r2 == LAST_ROW {
        return format!("{}:{}", column_name(c1), column_name(c2));
    }
    if c1 == 1 && c2 == LAST_COLUMN {
        return format!("{r1}:{r2}");
    }
    format!("{}{r1}:{}{r2}", column_name(c1), column_name(c2))
}
