//! Formula highlighting over whole formulas: tokens cover the text, colors
//! follow targets, and cross-sheet references land on the right sheet.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::collections::HashSet;

use test_case::test_case;
use xlgrid::formula::{highlight, tokenize, TokenKind};
use xlgrid::render::colors::REFERENCE_PALETTE;
use xlgrid::types::Area;

fn names() -> Vec<String> {
    ["Sheet1", "Data", "Q1 2024"].iter().map(|s| (*s).to_string()).collect()
}

fn references(text: &str) -> Vec<String> {
    tokenize(text)
        .into_iter()
        .filter(|t| t.kind == TokenKind::Reference)
        .map(|t| t.text)
        .collect()
}

// ============================================================================
// Coverage
// ============================================================================

#[test_case("" ; "empty")]
#[test_case("plain text" ; "not a formula")]
#[test_case("=" ; "lone equals")]
#[test_case("=SUM(A1:B10)/COUNT($C$2:$C$9)" ; "functions")]
#[test_case("=IF(A1>0,\"yes \"\"A2\"\"\",'Q1 2024'!B3)" ; "strings and quoted sheet")]
#[test_case("=Data!A:A+1" ; "column range")]
#[test_case("=ünïcödé(Ä1)+日本!B2" ; "unicode")]
#[test_case("=A1+😀+B2" ; "emoji")]
#[test_case("='never closed" ; "open quote")]
#[test_case("=1.5e-3*A1%" ; "exponent and percent")]
#[test_case("=   A1  +  B2   " ; "spacing")]
#[test_case("=A1\n+B2" ; "line break")]
fn tokens_concatenate_to_the_input(text: &str) {
    let h = highlight(text, 0, &names());
    let joined: String = h.tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(joined, text);
    for pair in h.tokens.windows(2) {
        assert!(
            pair[0].kind == TokenKind::Reference || pair[1].kind == TokenKind::Reference,
            "adjacent literals in {text:?}"
        );
    }
}

#[test]
fn highlighting_is_deterministic() {
    let text = "=SUM(A1:B2)+Data!C3*'Q1 2024'!D4-A1";
    assert_eq!(highlight(text, 0, &names()), highlight(text, 0, &names()));
}

#[test]
fn references_are_found_where_expected() {
    assert_eq!(
        references("=SUM(A1:B2,Data!$C$3)+'Q1 2024'!D4"),
        vec!["A1:B2", "Data!$C$3", "'Q1 2024'!D4"]
    );
    assert!(references("=LOG10(2)+SUM()").is_empty());
    assert!(references("A1+B2").is_empty());
}

// ============================================================================
// Colors
// ============================================================================

#[test]
fn distinct_targets_get_distinct_colors() {
    let text = "=A1+A2+A3+A4+A5+A6+A7+A8+A9+A10";
    let h = highlight(text, 0, &names());
    let colors: HashSet<&str> = h.active_ranges.iter().map(|r| r.color.as_str()).collect();
    assert_eq!(h.active_ranges.len(), 10);
    assert_eq!(colors.len(), 10);
    assert_eq!(h.active_ranges[0].color, REFERENCE_PALETTE[0]);
}

#[test]
fn palette_wraps_after_ten_targets() {
    let text = "=A1+A2+A3+A4+A5+A6+A7+A8+A9+A10+A11";
    let h = highlight(text, 0, &names());
    assert_eq!(h.active_ranges[10].color, h.active_ranges[0].color);
}

#[test]
fn repeated_target_reuses_its_color() {
    let h = highlight("=B2:A1+A1:B2+$a$1:b2", 0, &names());
    assert_eq!(h.active_ranges.len(), 1);
    assert_eq!(h.active_ranges[0].area, Area::new(1, 1, 2, 2));
    let colors: HashSet<Option<String>> = h
        .tokens
        .iter()
        .filter(|t| t.is_reference())
        .map(|t| t.color.clone())
        .collect();
    assert_eq!(colors.len(), 1);
}

// ============================================================================
// Sheets
// ============================================================================

#[test]
fn unprefixed_references_use_the_edited_sheet() {
    let h = highlight("=A1+Sheet1!A1", 2, &names());
    assert_eq!(h.active_ranges.len(), 2);
    assert_eq!(h.active_ranges[0].sheet, 2);
    assert_eq!(h.active_ranges[1].sheet, 0);
    assert_ne!(h.active_ranges[0].color, h.active_ranges[1].color);
}

#[test]
fn quoted_sheet_names_match_ignoring_case() {
    let h = highlight("='q1 2024'!B2:C3+DATA!A1", 0, &names());
    let sheets: Vec<u32> = h.active_ranges.iter().map(|r| r.sheet).collect();
    assert_eq!(sheets, vec![2, 1]);
}

#[test]
fn unknown_sheets_are_colored_only() {
    let h = highlight("=Missing!A1+A1", 0, &names());
    assert_eq!(h.active_ranges.len(), 1);
    let tokens: Vec<_> = h.tokens.iter().filter(|t| t.is_reference()).collect();
    assert_eq!(tokens.len(), 2);
    assert!(tokens.iter().all(|t| t.color.is_some()));
    assert_ne!(tokens[0].color, tokens[1].color);
}

#[test]
fn highlight_serializes_for_javascript() {
    let h = highlight("=Data!A1", 0, &names());
    let json = serde_json::to_value(&h).unwrap();
    assert_eq!(json["activeRanges"][0]["sheet"], 1);
    assert_eq!(json["tokens"][1]["kind"], "reference");
    assert_eq!(json["tokens"][1]["reference"]["sheetName"], "Data");
}
