//! The two-layer cell editor.
//!
//! A native text control (see [`TextInput`]) owns caret and IME; the grid
//! paints the visible text on top of it from the same [`EditingSession`]
//! (see [`view`]). Keys the editor does not handle itself go to the native
//! control first, after which the host calls [`sync`] so the session and the
//! highlighted references reflect the text after the keystroke.
//!
//! Editors differ in how arrows behave:
//! - `Accept` mode, entered by typing on a selected cell: arrows commit and
//!   move, or steer a reference while typing a formula
//! - `Edit` mode, entered by F2, double-click or clicking in the text:
//!   arrows move the caret

pub mod input;
pub mod keys;
pub mod navigation;
#[cfg(target_arch = "wasm32")]
pub(crate) mod textarea;
pub mod view;

pub use input::{TextBuffer, TextInput};
pub use keys::{is_editing_key, Direction, KeyEvent};

use crate::cell_ref::range_to_str;
use crate::config::GridConfig;
use crate::engine::CalcEngine;
use crate::error::Result;
use crate::formula::{highlight, is_in_reference_mode};
use crate::layout::{SheetLayout, Viewport};
use crate::state::WorkbookState;
use crate::types::{Area, EditingSession, EditorMode, Focus, ReferencedRange, SheetArea};

/// What the host should do with the keydown after the grid saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Consumed; prevent the default action.
    Handled,
    /// Let the native control apply the key, then call [`sync`].
    Native,
    /// Not for the grid.
    Ignored,
}

/// What keyboard handling may touch.
pub struct KeyContext<'a, E: ?Sized> {
    pub engine: &'a mut E,
    pub state: &'a mut WorkbookState,
    pub input: &'a mut dyn TextInput,
    pub layout: &'a SheetLayout,
    pub viewport: &'a mut Viewport,
    pub config: &'a GridConfig,
}

/// Keydown on the grid or on the editor control.
pub fn on_key_down<E: CalcEngine + ?Sized>(cx: &mut KeyContext<'_, E>, event: &KeyEvent) -> Result<KeyOutcome> {
    if cx.state.editing_cell().is_some() {
        editing_key_down(cx, event)
    } else {
        navigation::key_down(cx, event)
    }
}

/// Opens an editor on the selected cell with `text` and the caret at its end.
pub fn start_editing<E: CalcEngine + ?Sized>(
    engine: &E,
    state: &mut WorkbookState,
    input: &mut dyn TextInput,
    layout: &SheetLayout,
    text: String,
    mode: EditorMode,
) {
    let view = engine.selected_view();
    let mut session = EditingSession::new(
        view.sheet,
        view.row,
        view.column,
        text,
        mode,
        layout.column_width(view.column),
        layout.row_height(view.row),
    );
    session.active_ranges = highlight(&session.text, session.sheet, &engine.sheet_names()).active_ranges;
    input.set_value(&session.text);
    tracing::debug!(
        sheet = session.sheet,
        row = session.row,
        column = session.column,
        ?mode,
        "edit started"
    );
    state.set_editing_cell(session);
}

/// Reads the control back into the session after the control applied a
/// keystroke. `surface` is the editor the control belongs to.
pub fn sync<E: CalcEngine + ?Sized>(engine: &E, state: &mut WorkbookState, input: &dyn TextInput, surface: Focus) {
    let names = engine.sheet_names();
    let Some(session) = state.editing_cell_mut() else {
        return;
    };
    let value = input.value();
    let (start, end) = input.selection();
    if value.is_empty() && surface == Focus::Cell {
        session.mode = EditorMode::Accept;
    }
    session.cursor_start = start;
    session.cursor_end = end;
    // Keyups after handled keys land here too; the pending reference only
    // goes once the control text itself changed.
    if value != session.text {
        session.active_ranges = highlight(&value, session.sheet, &names).active_ranges;
        session.text = value;
        session.referenced_range = None;
    }
}

/// Focus left the control of `surface`. Commits the staged text unless focus
/// moved to the other editor of the same session.
pub fn blur<E: CalcEngine + ?Sized>(
    engine: &mut E,
    state: &mut WorkbookState,
    input: &mut dyn TextInput,
    surface: Focus,
) -> Result<()> {
    match state.editing_cell() {
        Some(session) if session.focus == surface => {}
        _ => return Ok(()),
    }
    let text = state.editing_text();
    commit(engine, state, &text)?;
    input.set_value("");
    Ok(())
}

/// Pointer-down inside the control of `surface`: the caret is being placed
/// by hand, so arrows move it from now on.
pub fn pointer_down_in_editor(state: &mut WorkbookState, surface: Focus) {
    if let Some(session) = state.editing_cell_mut() {
        session.mode = EditorMode::Edit;
        session.focus = surface;
    }
}

pub fn focus_formula_bar(state: &mut WorkbookState) {
    if let Some(session) = state.editing_cell_mut() {
        session.focus = Focus::FormulaBar;
    }
}

pub fn focus_cell_editor(state: &mut WorkbookState) {
    if let Some(session) = state.editing_cell_mut() {
        session.focus = Focus::Cell;
    }
}

/// Ends the session, writing `text` to its cell. A rejected write keeps the
/// session open.
fn commit<E: CalcEngine + ?Sized>(engine: &mut E, state: &mut WorkbookState, text: &str) -> Result<()> {
    let Some(session) = state.clear_editing_cell() else {
        return Ok(());
    };
    if let Err(e) = engine.set_user_input(session.sheet, session.row, session.column, text) {
        state.set_editing_cell(session);
        return Err(e);
    }
    tracing::debug!(
        sheet = session.sheet,
        row = session.row,
        column = session.column,
        "edit committed"
    );
    Ok(())
}

/// Commits and selects the neighbour of the edited cell in `direction`.
fn commit_and_move<E: CalcEngine + ?Sized>(
    cx: &mut KeyContext<'_, E>,
    text: &str,
    direction: Direction,
) -> Result<()> {
    let Some((sheet, row, column)) = cx.state.editing_cell().map(|s| (s.sheet, s.row, s.column)) else {
        return Ok(());
    };
    commit(cx.engine, cx.state, text)?;
    cx.input.set_value("");
    cx.engine.set_selected_sheet(sheet)?;
    let (row, column) = step(row, column, direction, cx.config);
    cx.engine.set_selected_cell(row, column)?;
    if cx.viewport.scroll_into_view(row, column, cx.layout) {
        let (top, left) = cx.viewport.top_left_cell(cx.layout);
        cx.engine.set_top_left_visible_cell(top, left)?;
    }
    Ok(())
}

/// Neighbour of a cell, staying on the sheet.
pub(crate) fn step(row: u32, column: u32, direction: Direction, config: &GridConfig) -> (u32, u32) {
    offset(row, column, direction, config).unwrap_or((row, column))
}

fn offset(row: u32, column: u32, direction: Direction, config: &GridConfig) -> Option<(u32, u32)> {
    let (dr, dc) = direction.delta();
    let r = u32::try_from(i64::from(row) + dr).ok()?;
    let c = u32::try_from(i64::from(column) + dc).ok()?;
    ((1..=config.last_row).contains(&r) && (1..=config.last_column).contains(&c)).then_some((r, c))
}

fn editing_key_down<E: CalcEngine + ?Sized>(cx: &mut KeyContext<'_, E>, event: &KeyEvent) -> Result<KeyOutcome> {
    let Some((sheet, focus, mode, text)) = cx
        .state
        .editing_cell()
        .map(|s| (s.sheet, s.focus, s.mode, s.editing_text()))
    else {
        return Ok(KeyOutcome::Ignored);
    };
    match event.key.as_str() {
        "Enter" if event.alt => {
            fold_reference(cx);
            let (start, end) = cx.input.selection();
            let value = input::splice_chars(&cx.input.value(), start, end, "\n");
            cx.input.set_value(&value);
            cx.input.set_selection(start + 1, start + 1);
            sync(&*cx.engine, cx.state, &*cx.input, focus);
            Ok(KeyOutcome::Handled)
        }
        "Enter" => {
            let direction = if event.shift { Direction::Up } else { Direction::Down };
            commit_and_move(cx, &text, direction)?;
            Ok(KeyOutcome::Handled)
        }
        "Tab" => {
            let direction = if event.shift { Direction::Left } else { Direction::Right };
            commit_and_move(cx, &text, direction)?;
            Ok(KeyOutcome::Handled)
        }
        "Escape" => {
            cx.state.clear_editing_cell();
            cx.input.set_value("");
            tracing::debug!(sheet, "edit cancelled");
            cx.engine.set_selected_sheet(sheet)?;
            Ok(KeyOutcome::Handled)
        }
        "PageUp" | "PageDown" => Ok(KeyOutcome::Handled),
        "Home" | "End" => {
            fold_reference(cx);
            if let Some(session) = cx.state.editing_cell_mut() {
                session.mode = EditorMode::Edit;
            }
            Ok(KeyOutcome::Native)
        }
        key => match Direction::from_arrow(key) {
            Some(direction) if mode == EditorMode::Accept => {
                accept_mode_arrow(cx, direction, event.shift)?;
                Ok(KeyOutcome::Handled)
            }
            _ => {
                fold_reference(cx);
                Ok(KeyOutcome::Native)
            }
        },
    }
}

/// Writes a pending reference into the control so the keystroke the control
/// is about to apply lands after it.
fn fold_reference<E: CalcEngine + ?Sized>(cx: &mut KeyContext<'_, E>) {
    let Some(session) = cx.state.editing_cell_mut() else {
        return;
    };
    if session.referenced_range.is_none() {
        return;
    }
    let text = session.editing_text();
    let len = text.chars().count();
    cx.input.set_value(&text);
    cx.input.set_selection(len, len);
    session.text = text;
    session.referenced_range = None;
    session.cursor_start = len;
    session.cursor_end = len;
}

/// Arrow in accept mode: steer the pending reference, start one next to the
/// edited cell, or commit and move.
fn accept_mode_arrow<E: CalcEngine + ?Sized>(
    cx: &mut KeyContext<'_, E>,
    direction: Direction,
    grow: bool,
) -> Result<()> {
    let names = cx.engine.sheet_names();
    let config = cx.config;
    let Some(session) = cx.state.editing_cell_mut() else {
        return Ok(());
    };

    if let Some(referenced) = &session.referenced_range {
        let sheet = referenced.range.sheet;
        let area = if grow {
            grow_reference(&referenced.range.area, direction, config)
        } else {
            let a = &referenced.range.area;
            offset(a.row_start, a.column_start, direction, config).map(|(r, c)| Area::cell(r, c))
        };
        if let Some(area) = area {
            session.referenced_range = Some(reference(sheet, area, session.sheet, &names));
        }
        return Ok(());
    }

    if is_in_reference_mode(&session.text, session.cursor_start) {
        if let Some((row, column)) = offset(session.row, session.column, direction, config) {
            let area = Area::cell(row, column);
            session.referenced_range = Some(reference(session.sheet, area, session.sheet, &names));
        }
        return Ok(());
    }

    let text = session.text.clone();
    commit_and_move(cx, &text, direction)
}

/// Moves the far edge of a reference; up shrinks a multi-row range before it
/// grows upwards.
fn grow_reference(area: &Area, direction: Direction, config: &GridConfig) -> Option<Area> {
    let mut area = *area;
    match direction {
        Direction::Right => area.column_end = area.column_end.checked_add(1)?,
        Direction::Left => area.column_end = area.column_end.checked_sub(1)?,
        Direction::Down => area.row_end = area.row_end.checked_add(1)?,
        Direction::Up if area.row_end > area.row_start => area.row_end -= 1,
        Direction::Up => area.row_start = area.row_start.checked_sub(1)?,
    }
    let (r1, c1, r2, c2) = area.bounds();
    (r1 >= 1 && c1 >= 1 && r2 <= config.last_row && c2 <= config.last_column).then_some(area)
}

fn reference(sheet: u32, area: Area, editing_sheet: u32, names: &[String]) -> ReferencedRange {
    let name = usize::try_from(sheet)
        .ok()
        .and_then(|i| names.get(i))
        .map_or("", String::as_str);
    ReferencedRange {
        range: SheetArea { sheet, area },
        str: range_to_str(sheet, &area, editing_sheet, name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grow_reference_shrinks_before_growing_up() {
        let config = GridConfig::default();
        let area = Area::new(2, 2, 4, 2);
        assert_eq!(
            grow_reference(&area, Direction::Up, &config),
            Some(Area::new(2, 2, 3, 2))
        );
        let single = Area::cell(2, 2);
        assert_eq!(
            grow_reference(&single, Direction::Up, &config),
            Some(Area::new(1, 2, 2, 2))
        );
        assert_eq!(grow_reference(&Area::cell(1, 1), Direction::Up, &config), None);
    }

    #[test]
    fn step_stays_on_sheet() {
        let config = GridConfig::default();
        assert_eq!(step(1, 1, Direction::Up, &config), (1, 1));
        assert_eq!(step(1, 1, Direction::Right, &config), (1, 2));
        assert_eq!(
            step(1, config.last_column, Direction::Right, &config),
            (1, config.last_column)
        );
    }
}
