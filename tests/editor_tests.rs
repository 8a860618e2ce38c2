//! Editor tests: starting, committing and cancelling edits, reference
//! steering with arrows, and grid navigation keys.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{grid, Call, MockEngine};
use xlgrid::types::{Area, CellBlock, EditorMode, Focus, SheetArea};
use xlgrid::{GridView, KeyEvent, KeyOutcome, TextBuffer, TextInput};

/// Types `text` key by key, letting the control apply what the grid hands
/// back to it.
fn type_keys(view: &mut GridView<MockEngine>, input: &mut TextBuffer, text: &str) {
    for c in text.chars() {
        let key = c.to_string();
        let outcome = view.on_key_down(&KeyEvent::new(&key), input).unwrap();
        if outcome == KeyOutcome::Native {
            input.type_text(&key);
            view.sync_input(input, Focus::Cell);
        }
    }
}

fn press(view: &mut GridView<MockEngine>, input: &mut TextBuffer, event: KeyEvent) -> KeyOutcome {
    view.on_key_down(&event, input).unwrap()
}

fn selected(view: &GridView<MockEngine>) -> (u32, u32) {
    let v = view.engine().view;
    (v.row, v.column)
}

// ============================================================================
// Commit and cancel
// ============================================================================

#[test]
fn f2_edits_the_content_and_enter_writes_it_back() {
    let mut view = grid(MockEngine::new().with_cell(1, 1, "=A1+1"));
    let mut input = TextBuffer::new();

    assert_eq!(press(&mut view, &mut input, KeyEvent::new("F2")), KeyOutcome::Handled);
    let session = view.state().editing_cell().unwrap();
    assert_eq!(session.mode, EditorMode::Edit);
    assert_eq!(session.text, "=A1+1");
    assert_eq!(session.active_ranges.len(), 1);
    assert_eq!(session.active_ranges[0].area, Area::cell(1, 1));
    assert_eq!(input.value(), "=A1+1");

    press(&mut view, &mut input, KeyEvent::new("Enter"));
    assert_eq!(
        view.engine().input_calls(),
        vec![&Call::SetUserInput(0, 1, 1, "=A1+1".to_string())]
    );
    assert_eq!(view.engine().content(1, 1), Some("=A1+1"));
    assert_eq!(selected(&view), (2, 1));
    assert!(view.state().editing_cell().is_none());
}

#[test]
fn typing_then_tab_commits_and_moves_right() {
    let mut view = grid(MockEngine::new());
    let mut input = TextBuffer::new();

    type_keys(&mut view, &mut input, "5");
    assert_eq!(view.state().editing_cell().unwrap().mode, EditorMode::Accept);
    press(&mut view, &mut input, KeyEvent::new("Tab"));

    assert_eq!(
        view.engine().calls,
        vec![
            Call::SetUserInput(0, 1, 1, "5".to_string()),
            Call::SetSelectedSheet(0),
            Call::SetSelectedCell(1, 2)
        ]
    );
    assert!(view.state().editing_cell().is_none());
    assert_eq!(input.value(), "");
}

#[test]
fn shift_enter_moves_up() {
    let mut view = grid(MockEngine::new());
    view.engine_mut().select(3, 3);
    let mut input = TextBuffer::new();
    type_keys(&mut view, &mut input, "x");
    press(&mut view, &mut input, KeyEvent::new("Enter").shift());
    assert_eq!(selected(&view), (2, 3));
    assert_eq!(view.engine().content(3, 3), Some("x"));
}

#[test]
fn blur_commits_the_staged_text() {
    let mut view = grid(MockEngine::new());
    let mut input = TextBuffer::new();
    type_keys(&mut view, &mut input, "42");
    assert_eq!(view.state().editing_text(), "42");

    view.on_blur(&mut input, Focus::Cell).unwrap();
    assert_eq!(view.engine().content(1, 1), Some("42"));
    assert!(view.state().editing_cell().is_none());
    assert_eq!(input.value(), "");
}

#[test]
fn rejected_blur_leaves_the_text_in_the_control() {
    let mut engine = MockEngine::new();
    engine.reject_input = true;
    let mut view = grid(engine);
    let mut input = TextBuffer::new();
    type_keys(&mut view, &mut input, "42");

    assert!(view.on_blur(&mut input, Focus::Cell).is_err());
    assert_eq!(input.value(), "42");
    type_keys(&mut view, &mut input, "3");
    assert_eq!(view.state().editing_text(), "423");

    view.engine_mut().reject_input = false;
    view.on_blur(&mut input, Focus::Cell).unwrap();
    assert_eq!(view.engine().content(1, 1), Some("423"));
    assert_eq!(input.value(), "");
}

#[test]
fn escape_discards_the_edit() {
    let mut view = grid(MockEngine::new().with_cell(1, 1, "old"));
    let mut input = TextBuffer::new();
    type_keys(&mut view, &mut input, "new");
    press(&mut view, &mut input, KeyEvent::new("Escape"));

    assert!(view.state().editing_cell().is_none());
    assert!(view.engine().input_calls().is_empty());
    assert_eq!(view.engine().content(1, 1), Some("old"));
    assert_eq!(view.engine().calls.last(), Some(&Call::SetSelectedSheet(0)));
}

#[test]
fn rejected_commit_keeps_the_session() {
    let mut engine = MockEngine::new();
    engine.reject_input = true;
    let mut view = grid(engine);
    let mut input = TextBuffer::new();
    type_keys(&mut view, &mut input, "=1+");

    assert!(view.on_key_down(&KeyEvent::new("Enter"), &mut input).is_err());
    assert_eq!(view.state().editing_text(), "=1+");
    assert_eq!(selected(&view), (1, 1));
    assert_eq!(view.engine().input_calls().len(), 1);
}

#[test]
fn alt_enter_inserts_a_line_break() {
    let mut view = grid(MockEngine::new());
    let mut input = TextBuffer::new();
    type_keys(&mut view, &mut input, "a");
    assert_eq!(press(&mut view, &mut input, KeyEvent::new("Enter").alt()), KeyOutcome::Handled);
    type_keys(&mut view, &mut input, "b");
    assert_eq!(view.state().editing_text(), "a\nb");

    press(&mut view, &mut input, KeyEvent::new("Enter"));
    assert_eq!(view.engine().content(1, 1), Some("a\nb"));
}

#[test]
fn backspace_on_a_cell_starts_an_empty_edit() {
    let mut view = grid(MockEngine::new().with_cell(1, 1, "x"));
    let mut input = TextBuffer::new();
    press(&mut view, &mut input, KeyEvent::new("Backspace"));
    let session = view.state().editing_cell().unwrap();
    assert_eq!(session.text, "");
    assert_eq!(session.mode, EditorMode::Accept);
}

// ============================================================================
// Arrows while editing
// ============================================================================

#[test]
fn accept_mode_arrow_commits_and_moves() {
    let mut view = grid(MockEngine::new());
    let mut input = TextBuffer::new();
    type_keys(&mut view, &mut input, "7");
    press(&mut view, &mut input, KeyEvent::new("ArrowRight"));

    assert_eq!(view.engine().content(1, 1), Some("7"));
    assert_eq!(selected(&view), (1, 2));
    assert!(view.state().editing_cell().is_none());
}

#[test]
fn accept_mode_arrows_steer_a_reference_in_a_formula() {
    let mut view = grid(MockEngine::new());
    let mut input = TextBuffer::new();
    type_keys(&mut view, &mut input, "=");

    press(&mut view, &mut input, KeyEvent::new("ArrowDown"));
    assert_eq!(view.state().editing_text(), "=A2");
    press(&mut view, &mut input, KeyEvent::new("ArrowDown"));
    assert_eq!(view.state().editing_text(), "=A3");
    press(&mut view, &mut input, KeyEvent::new("ArrowRight").shift());
    assert_eq!(view.state().editing_text(), "=A3:B3");
    assert!(view.engine().calls.is_empty());

    type_keys(&mut view, &mut input, "+1");
    let session = view.state().editing_cell().unwrap();
    assert!(session.referenced_range.is_none());
    assert_eq!(session.text, "=A3:B3+1");
    assert_eq!(input.value(), "=A3:B3+1");
    assert_eq!(session.active_ranges.len(), 1);
    assert_eq!(session.active_ranges[0].area, Area::new(3, 1, 3, 2));
}

#[test]
fn key_up_after_a_steering_arrow_keeps_the_reference() {
    let mut view = grid(MockEngine::new());
    let mut input = TextBuffer::new();
    type_keys(&mut view, &mut input, "=");

    assert_eq!(press(&mut view, &mut input, KeyEvent::new("ArrowDown")), KeyOutcome::Handled);
    view.sync_input(&input, Focus::Cell);
    assert_eq!(view.state().editing_text(), "=A2");

    press(&mut view, &mut input, KeyEvent::new("ArrowDown"));
    view.sync_input(&input, Focus::Cell);
    assert_eq!(view.state().editing_text(), "=A3");

    type_keys(&mut view, &mut input, "+1");
    assert_eq!(view.state().editing_text(), "=A3+1");
    assert!(view.state().editing_cell().unwrap().referenced_range.is_none());
}

#[test]
fn edit_mode_arrows_move_the_caret() {
    let mut view = grid(MockEngine::new().with_cell(1, 1, "abc"));
    let mut input = TextBuffer::new();
    press(&mut view, &mut input, KeyEvent::new("F2"));
    assert_eq!(press(&mut view, &mut input, KeyEvent::new("ArrowLeft")), KeyOutcome::Native);
    assert!(view.engine().calls.is_empty());
    assert!(view.state().editing_cell().is_some());
}

#[test]
fn emptying_the_cell_editor_returns_to_accept_mode() {
    let mut view = grid(MockEngine::new().with_cell(1, 1, "a"));
    let mut input = TextBuffer::new();
    press(&mut view, &mut input, KeyEvent::new("F2"));
    input.backspace();
    view.sync_input(&input, Focus::Cell);
    assert_eq!(view.state().editing_cell().unwrap().mode, EditorMode::Accept);
}

// ============================================================================
// Formula bar
// ============================================================================

#[test]
fn formula_bar_focus_starts_editing_the_content() {
    let mut view = grid(MockEngine::new().with_cell(1, 1, "=1+2"));
    let mut bar = TextBuffer::new();
    view.focus_formula_bar(&mut bar);

    let session = view.state().editing_cell().unwrap();
    assert_eq!(session.focus, Focus::FormulaBar);
    assert_eq!(session.mode, EditorMode::Edit);
    assert_eq!(bar.value(), "=1+2");
    assert!(view.state().is_formula_editor_active());

    // The cell editor losing focus does not end a formula bar session.
    let mut cell = TextBuffer::new();
    view.on_blur(&mut cell, Focus::Cell).unwrap();
    assert!(view.state().editing_cell().is_some());

    bar.type_text("+3");
    view.sync_input(&bar, Focus::FormulaBar);
    view.on_blur(&mut bar, Focus::FormulaBar).unwrap();
    assert_eq!(view.engine().content(1, 1), Some("=1+2+3"));
}

// ============================================================================
// Navigation
// ============================================================================

#[test]
fn arrows_and_enter_move_the_selection() {
    let mut view = grid(MockEngine::new());
    let mut input = TextBuffer::new();
    press(&mut view, &mut input, KeyEvent::new("ArrowRight"));
    press(&mut view, &mut input, KeyEvent::new("Enter"));
    press(&mut view, &mut input, KeyEvent::new("ArrowDown"));
    assert_eq!(selected(&view), (3, 2));
    press(&mut view, &mut input, KeyEvent::new("Tab").shift());
    assert_eq!(selected(&view), (3, 1));
    press(&mut view, &mut input, KeyEvent::new("ArrowLeft"));
    assert_eq!(selected(&view), (3, 1));
}

#[test]
fn ctrl_arrows_jump_between_blocks() {
    let engine = [1, 2, 3, 4, 5, 10]
        .into_iter()
        .fold(MockEngine::new(), |e, row| e.with_cell(row, 1, "v"));
    let mut view = grid(engine);
    let mut input = TextBuffer::new();

    press(&mut view, &mut input, KeyEvent::new("ArrowDown").ctrl());
    assert_eq!(selected(&view), (5, 1));
    press(&mut view, &mut input, KeyEvent::new("ArrowDown").ctrl());
    assert_eq!(selected(&view), (10, 1));
    press(&mut view, &mut input, KeyEvent::new("ArrowDown").ctrl());
    assert_eq!(selected(&view), (view.config().last_row, 1));
    assert!(matches!(
        view.engine().calls.last(),
        Some(Call::SetTopLeftVisibleCell(..))
    ));
}

#[test]
fn ctrl_home_and_end_go_to_the_corners() {
    let mut view = grid(MockEngine::new());
    let mut input = TextBuffer::new();
    press(&mut view, &mut input, KeyEvent::new("End").ctrl());
    let config = view.config().clone();
    assert_eq!(selected(&view), (config.last_row, config.last_column));
    press(&mut view, &mut input, KeyEvent::new("Home").ctrl());
    assert_eq!(selected(&view), (1, 1));
}

#[test]
fn shift_arrow_grows_the_range() {
    let mut view = grid(MockEngine::new());
    view.engine_mut().select(2, 2);
    let mut input = TextBuffer::new();
    press(&mut view, &mut input, KeyEvent::new("ArrowRight").shift());
    press(&mut view, &mut input, KeyEvent::new("ArrowDown").shift());
    assert_eq!(view.engine().view.range, Area::new(2, 2, 3, 3));
    press(&mut view, &mut input, KeyEvent::new("ArrowLeft").shift());
    assert_eq!(view.engine().view.range, Area::new(2, 2, 3, 2));
}

#[test]
fn delete_clears_the_selected_range() {
    let engine = MockEngine::new()
        .with_cell(1, 1, "a")
        .with_cell(2, 2, "b")
        .with_cell(3, 3, "c");
    let mut view = grid(engine);
    view.engine_mut().select_range(1, 1, 2, 2);
    let mut input = TextBuffer::new();
    press(&mut view, &mut input, KeyEvent::new("Delete"));

    assert_eq!(
        view.engine().calls,
        vec![Call::RangeClearContents(SheetArea {
            sheet: 0,
            area: Area::new(1, 1, 2, 2)
        })]
    );
    assert_eq!(view.engine().content(1, 1), None);
    assert_eq!(view.engine().content(3, 3), Some("c"));
}

#[test]
fn ctrl_b_toggles_bold() {
    let mut view = grid(MockEngine::new());
    let mut input = TextBuffer::new();
    let block = CellBlock {
        sheet: 0,
        row: 1,
        column: 1,
        width: 1,
        height: 1,
    };
    press(&mut view, &mut input, KeyEvent::new("b").ctrl());
    press(&mut view, &mut input, KeyEvent::new("B").ctrl());
    assert_eq!(
        view.engine().calls,
        vec![
            Call::UpdateRangeStyle(block, "font.b".to_string(), "true".to_string()),
            Call::UpdateRangeStyle(block, "font.b".to_string(), "false".to_string())
        ]
    );
}

#[test]
fn alt_arrows_cycle_sheets() {
    let mut view = grid(MockEngine::new());
    let mut input = TextBuffer::new();
    press(&mut view, &mut input, KeyEvent::new("ArrowDown").alt());
    assert_eq!(view.engine().view.sheet, 1);
    press(&mut view, &mut input, KeyEvent::new("ArrowDown").alt());
    assert_eq!(view.engine().view.sheet, 0);
    press(&mut view, &mut input, KeyEvent::new("ArrowUp").alt());
    assert_eq!(view.engine().view.sheet, 1);
}

#[test]
fn modifier_keys_are_not_for_the_grid() {
    let mut view = grid(MockEngine::new());
    let mut input = TextBuffer::new();
    assert_eq!(press(&mut view, &mut input, KeyEvent::new("Shift")), KeyOutcome::Ignored);
    assert_eq!(press(&mut view, &mut input, KeyEvent::new("c").ctrl()), KeyOutcome::Ignored);
    assert_eq!(press(&mut view, &mut input, KeyEvent::new("a").ctrl()), KeyOutcome::Handled);
    assert!(view.state().editing_cell().is_none());
}
