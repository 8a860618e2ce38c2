//! Pointer tests: selection drags, fill-handle extension, header clicks and
//! resizing, and clicks while editing.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{at, center, drag, grid, Call, MockEngine};
use xlgrid::render::fill_handle_rect;
use xlgrid::types::{Area, CellBlock, ExtendDirection};
use xlgrid::{DisplayList, Gesture, KeyEvent, PointerEvent, PointerType, TextBuffer};

fn block(row: u32, column: u32, width: u32, height: u32) -> CellBlock {
    CellBlock {
        sheet: 0,
        row,
        column,
        width,
        height,
    }
}

// ============================================================================
// Selecting
// ============================================================================

#[test]
fn click_selects_the_cell_and_captures() {
    let mut view = grid(MockEngine::new());
    let down = at(&view, 3, 2);
    view.on_pointer_down(&down).unwrap();

    assert_eq!(view.engine().calls, vec![Call::SetSelectedCell(3, 2)]);
    assert_eq!(view.pointer().gesture(), Gesture::Selecting);
    assert_eq!(view.pointer().captured_pointer(), Some(down.pointer_id));

    view.on_pointer_up(&down).unwrap();
    assert!(!view.pointer().is_capturing());
    assert_eq!(view.pointer().gesture(), Gesture::Idle);
}

#[test]
fn drag_direction_does_not_change_the_rectangle() {
    let mut forward = grid(MockEngine::new());
    drag(&mut forward, (2, 2), &[(3, 3), (5, 4)]);
    let mut backward = grid(MockEngine::new());
    drag(&mut backward, (5, 4), &[(4, 3), (2, 2)]);

    let a = forward.engine().view.range;
    let b = backward.engine().view.range;
    assert_ne!(a, b);
    assert_eq!(a.normalized(), b.normalized());
    assert_eq!(a.normalized(), Area::new(2, 2, 5, 4));
}

#[test]
fn moves_off_the_grid_are_ignored() {
    let mut view = grid(MockEngine::new());
    view.on_pointer_down(&at(&view, 2, 2)).unwrap();
    // Over the row headers.
    view.on_pointer_move(&PointerEvent::mouse(5.0, 100.0)).unwrap();
    assert_eq!(view.engine().calls, vec![Call::SetSelectedCell(2, 2)]);
}

#[test]
fn touch_moves_leave_the_selection_alone() {
    let mut view = grid(MockEngine::new());
    let mut down = at(&view, 2, 2);
    down.pointer_type = PointerType::Touch;
    view.on_pointer_down(&down).unwrap();

    let (x, y) = center(&view, 6, 4);
    let mv = PointerEvent { x, y, ..down };
    view.on_pointer_move(&mv).unwrap();
    view.on_pointer_up(&mv).unwrap();

    assert_eq!(view.engine().calls, vec![Call::SetSelectedCell(2, 2)]);
}

#[test]
fn stray_moves_and_ups_do_nothing() {
    let mut view = grid(MockEngine::new());
    let event = at(&view, 4, 4);
    view.on_pointer_move(&event).unwrap();
    view.on_pointer_up(&event).unwrap();
    assert!(view.engine().calls.is_empty());
}

#[test]
fn second_pointer_is_ignored_during_a_gesture() {
    let mut view = grid(MockEngine::new());
    view.on_pointer_down(&at(&view, 2, 2)).unwrap();

    let mut other = at(&view, 7, 7);
    other.pointer_id = 2;
    view.on_pointer_down(&other).unwrap();
    view.on_pointer_move(&other).unwrap();
    view.on_pointer_up(&other).unwrap();

    assert_eq!(view.engine().calls, vec![Call::SetSelectedCell(2, 2)]);
    assert!(view.pointer().is_capturing());
}

#[test]
fn shift_click_extends_the_selection() {
    let mut view = grid(MockEngine::new());
    view.engine_mut().select(2, 2);
    view.on_pointer_down(&at(&view, 4, 5).with_shift()).unwrap();

    assert_eq!(view.engine().calls, vec![Call::OnAreaSelecting(4, 5)]);
    assert_eq!(view.engine().view.range, Area::new(2, 2, 4, 5));
    assert!(!view.pointer().is_capturing());
}

#[test]
fn copied_styles_are_pasted_once_the_area_is_selected() {
    let mut view = grid(MockEngine::new());
    view.copy_styles();
    assert!(view.state().copy_styles().is_some());

    drag(&mut view, (3, 3), &[(4, 4)]);
    assert_eq!(view.engine().calls.last(), Some(&Call::PasteStyles(1, 1)));
    assert!(view.state().copy_styles().is_none());
}

// ============================================================================
// Fill handle
// ============================================================================

#[test]
fn fill_drag_issues_one_autofill_on_release() {
    let mut view = grid(MockEngine::new());
    view.engine_mut().select(2, 2);
    view.on_fill_handle_pointer_down(&at(&view, 2, 2)).unwrap();

    for row in 3..=5 {
        view.on_pointer_move(&at(&view, row, 2)).unwrap();
        assert!(view.engine().autofill_calls().is_empty());
    }
    let extend = view.state().extend_to_area().copied().unwrap();
    assert_eq!(extend.direction, ExtendDirection::RowsDown);
    assert_eq!(extend.area, Area::new(3, 2, 5, 2));

    view.on_pointer_up(&at(&view, 5, 2)).unwrap();
    assert_eq!(
        view.engine().autofill_calls(),
        vec![&Call::AutoFillRows(block(2, 2, 1, 1), 5)]
    );
    assert!(view.state().extend_to_area().is_none());
    assert_eq!(view.engine().view.range.normalized(), Area::new(2, 2, 5, 2));
}

#[test]
fn painted_fill_handle_starts_extending() {
    let mut view = grid(MockEngine::new());
    view.engine_mut().select(2, 2);
    let range = view.engine().view.range;
    let handle = fill_handle_rect(&range, view.layout(), view.viewport(), view.config()).unwrap();
    let down = PointerEvent::mouse(handle.x + handle.w / 2.0, handle.y + handle.h / 2.0);
    view.on_pointer_down(&down).unwrap();

    assert!(matches!(view.pointer().gesture(), Gesture::Extending { .. }));
    assert!(view.engine().calls.is_empty());
}

#[test]
fn diagonal_fill_with_equal_overshoot_fills_rows() {
    let mut view = grid(MockEngine::new());
    view.engine_mut().select_range(2, 2, 4, 4);
    view.on_fill_handle_pointer_down(&at(&view, 4, 4)).unwrap();
    view.on_pointer_move(&at(&view, 6, 6)).unwrap();
    view.on_pointer_up(&at(&view, 6, 6)).unwrap();

    assert_eq!(
        view.engine().autofill_calls(),
        vec![&Call::AutoFillRows(block(2, 2, 3, 3), 6)]
    );
}

#[test]
fn fill_left_targets_the_first_column() {
    let mut view = grid(MockEngine::new());
    view.engine_mut().select_range(3, 4, 3, 5);
    view.on_fill_handle_pointer_down(&at(&view, 3, 5)).unwrap();
    view.on_pointer_move(&at(&view, 3, 2)).unwrap();
    view.on_pointer_up(&at(&view, 3, 2)).unwrap();

    assert_eq!(
        view.engine().autofill_calls(),
        vec![&Call::AutoFillColumns(block(3, 4, 2, 1), 2)]
    );
}

#[test]
fn dragging_back_inside_cancels_the_fill() {
    let mut view = grid(MockEngine::new());
    view.engine_mut().select(2, 2);
    view.on_fill_handle_pointer_down(&at(&view, 2, 2)).unwrap();
    view.on_pointer_move(&at(&view, 5, 2)).unwrap();
    view.on_pointer_move(&at(&view, 2, 2)).unwrap();
    view.on_pointer_up(&at(&view, 2, 2)).unwrap();

    assert!(view.engine().autofill_calls().is_empty());
    assert!(view.state().extend_to_area().is_none());
}

#[test]
fn double_click_on_fill_handle_fills_to_the_end_of_the_data() {
    let engine = (2..=6).fold(MockEngine::new(), |e, row| e.with_cell(row, 1, &row.to_string()));
    let mut view = grid(engine);
    view.engine_mut().select(2, 2);
    let range = view.engine().view.range;
    let handle = fill_handle_rect(&range, view.layout(), view.viewport(), view.config()).unwrap();

    let mut surface = DisplayList::new(800.0, 600.0);
    let mut input = TextBuffer::new();
    view.on_double_click(handle.x + 1.0, handle.y + 1.0, &mut surface, &mut input)
        .unwrap();

    assert_eq!(
        view.engine().autofill_calls(),
        vec![&Call::AutoFillRows(block(2, 2, 1, 1), 6)]
    );
    assert!(view.state().editing_cell().is_none());
}

// ============================================================================
// Headers
// ============================================================================

#[test]
fn column_header_click_selects_the_column() {
    let mut view = grid(MockEngine::new());
    let (x, _) = center(&view, 1, 3);
    view.on_pointer_down(&PointerEvent::mouse(x, 10.0)).unwrap();

    let last_row = view.config().last_row;
    assert_eq!(
        view.engine().calls,
        vec![Call::SetSelectedCell(1, 3), Call::SetSelectedRange(1, 3, last_row, 3)]
    );
}

#[test]
fn corner_click_selects_everything() {
    let mut view = grid(MockEngine::new());
    view.on_pointer_down(&PointerEvent::mouse(5.0, 5.0)).unwrap();
    let config = view.config().clone();
    assert_eq!(
        view.engine().view.range,
        Area::new(1, 1, config.last_row, config.last_column)
    );
}

#[test]
fn header_edge_drag_resizes_the_column() {
    let mut view = grid(MockEngine::new());
    let edge = view.viewport().column_start_x(2, view.layout()) + view.layout().column_width(2);
    let down = PointerEvent::mouse(edge - 1.0, 10.0);
    view.on_pointer_down(&down).unwrap();
    assert!(matches!(view.pointer().gesture(), Gesture::Resizing(_)));

    let mv = PointerEvent::mouse(edge + 50.0, 10.0);
    view.on_pointer_move(&mv).unwrap();
    let guide = view.pointer().guide().unwrap();
    assert_eq!(guide.position, edge + 50.0);
    assert!(view.engine().calls.is_empty());

    view.on_pointer_up(&mv).unwrap();
    assert_eq!(view.engine().calls, vec![Call::SetColumnWidth(0, 2, 150)]);
    assert_eq!(view.layout().column_width(2), 150.0);
}

#[test]
fn resize_never_goes_below_the_minimum() {
    let mut view = grid(MockEngine::new());
    let edge = view.viewport().row_start_y(3, view.layout()) + view.layout().row_height(3);
    let down = PointerEvent::mouse(10.0, edge - 1.0);
    view.on_pointer_down(&down).unwrap();
    let mv = PointerEvent::mouse(10.0, edge - 200.0);
    view.on_pointer_move(&mv).unwrap();
    view.on_pointer_up(&mv).unwrap();

    let min = view.config().min_row_height;
    assert_eq!(view.engine().calls, vec![Call::SetRowHeight(0, 3, min)]);
}

// ============================================================================
// Clicks while editing
// ============================================================================

#[test]
fn clicking_away_commits_the_edit() {
    let mut view = grid(MockEngine::new());
    let mut input = TextBuffer::new();
    view.on_key_down(&KeyEvent::new("7"), &mut input).unwrap();
    assert!(view.state().editing_cell().is_some());

    view.on_pointer_down(&at(&view, 5, 3)).unwrap();
    assert!(view.state().editing_cell().is_none());
    assert_eq!(
        view.engine().calls,
        vec![
            Call::SetUserInput(0, 1, 1, "7".to_string()),
            Call::SetSelectedCell(5, 3)
        ]
    );
}

#[test]
fn rejected_click_commit_keeps_editing() {
    let mut engine = MockEngine::new();
    engine.reject_input = true;
    let mut view = grid(engine);
    let mut input = TextBuffer::new();
    view.on_key_down(&KeyEvent::new("x"), &mut input).unwrap();

    assert!(view.on_pointer_down(&at(&view, 5, 3)).is_err());
    assert_eq!(view.state().editing_text(), "x");
    assert!(!view.pointer().is_capturing());
}

#[test]
fn clicking_in_a_formula_inserts_a_reference() {
    let mut view = grid(MockEngine::new());
    let mut input = TextBuffer::new();
    view.on_key_down(&KeyEvent::new("="), &mut input).unwrap();

    drag(&mut view, (3, 3), &[(4, 4)]);
    let session = view.state().editing_cell().unwrap();
    assert_eq!(session.referenced_range.as_ref().unwrap().str, "C3:D4");
    assert_eq!(view.state().editing_text(), "=C3:D4");
    assert!(view.engine().input_calls().is_empty());

    view.on_key_down(&KeyEvent::new("Enter"), &mut input).unwrap();
    assert_eq!(
        view.engine().input_calls(),
        vec![&Call::SetUserInput(0, 1, 1, "=C3:D4".to_string())]
    );
    assert_eq!((view.engine().view.row, view.engine().view.column), (2, 1));
}
