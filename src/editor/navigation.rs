//! Keys on the grid while no cell is being edited.
//!
//! | key | action |
//! |---|---|
//! | arrows, Enter, Tab | move the selected cell (Shift+Tab moves left) |
//! | Shift+arrows | grow or shrink the selected range |
//! | Ctrl+arrows | jump to the edge of the data block |
//! | Ctrl+Home/End | first/last cell of the sheet |
//! | Home/End | first/last column |
//! | PageUp/PageDown | one screen of rows |
//! | Ctrl+B/I/U | toggle bold, italic, underline |
//! | Ctrl+Space / Shift+Space | select column / row |
//! | Alt+Up/Down | previous/next sheet |
//! | F2 | edit the cell content |
//! | printable key, Backspace | start editing with that key |
//! | Delete | clear the selected range |
//! | Escape | drop copied styles |

use super::keys::{is_editing_key, Direction, KeyEvent};
use super::{start_editing, step, KeyContext, KeyOutcome};
use crate::engine::CalcEngine;
use crate::error::Result;
use crate::types::{paths, CellBlock, CellStyle, EditorMode, SheetArea};

pub fn key_down<E: CalcEngine + ?Sized>(cx: &mut KeyContext<'_, E>, event: &KeyEvent) -> Result<KeyOutcome> {
    let key = event.key.as_str();

    if event.ctrl && !event.shift && !event.alt {
        match key.to_lowercase().as_str() {
            "b" => toggle_style(cx, paths::BOLD, |s| s.bold)?,
            "i" => toggle_style(cx, paths::ITALIC, |s| s.italic)?,
            "u" => toggle_style(cx, paths::UNDERLINE, |s| s.underline)?,
            " " => select_column(cx)?,
            "a" => {}
            _ => match key {
                "Home" => jump_to(cx, 1, 1)?,
                "End" => jump_to(cx, cx.config.last_row, cx.config.last_column)?,
                _ => match Direction::from_arrow(key) {
                    Some(direction) => jump_to_edge(cx, direction)?,
                    None => return Ok(KeyOutcome::Ignored),
                },
            },
        }
        return Ok(KeyOutcome::Handled);
    }
    if event.ctrl {
        return Ok(KeyOutcome::Ignored);
    }
    if event.alt {
        if event.shift {
            return Ok(KeyOutcome::Ignored);
        }
        return match key {
            "ArrowDown" => cycle_sheet(cx, true).map(|()| KeyOutcome::Handled),
            "ArrowUp" => cycle_sheet(cx, false).map(|()| KeyOutcome::Handled),
            _ => Ok(KeyOutcome::Ignored),
        };
    }
    if event.shift {
        match key {
            " " => return select_row(cx).map(|()| KeyOutcome::Handled),
            "Tab" => return move_by(cx, Direction::Left).map(|()| KeyOutcome::Handled),
            _ => {
                if let Some(direction) = Direction::from_arrow(key) {
                    return expand_selection(cx, direction).map(|()| KeyOutcome::Handled);
                }
            }
        }
    }

    if is_editing_key(key) || key == "Backspace" {
        let text = if key == "Backspace" { String::new() } else { key.to_string() };
        start_editing(&*cx.engine, cx.state, cx.input, cx.layout, text, EditorMode::Accept);
        return Ok(KeyOutcome::Handled);
    }
    if event.shift {
        return Ok(KeyOutcome::Ignored);
    }

    match key {
        "F2" => {
            let view = cx.engine.selected_view();
            let text = cx.engine.cell_content(view.sheet, view.row, view.column);
            start_editing(&*cx.engine, cx.state, cx.input, cx.layout, text, EditorMode::Edit);
        }
        "ArrowRight" | "Tab" => move_by(cx, Direction::Right)?,
        "ArrowLeft" => move_by(cx, Direction::Left)?,
        "ArrowDown" | "Enter" => move_by(cx, Direction::Down)?,
        "ArrowUp" => move_by(cx, Direction::Up)?,
        "Home" => {
            let row = cx.engine.selected_view().row;
            jump_to(cx, row, 1)?;
        }
        "End" => {
            let row = cx.engine.selected_view().row;
            jump_to(cx, row, cx.config.last_column)?;
        }
        "PageDown" => page(cx, true)?,
        "PageUp" => page(cx, false)?,
        "Delete" => {
            let view = cx.engine.selected_view();
            tracing::debug!(sheet = view.sheet, range = ?view.range, "clearing contents");
            cx.engine.range_clear_contents(&SheetArea {
                sheet: view.sheet,
                area: view.range,
            })?;
        }
        "Escape" => cx.state.set_copy_styles(None),
        _ => return Ok(KeyOutcome::Ignored),
    }
    Ok(KeyOutcome::Handled)
}

/// Scrolls `(row, column)` into view and reports a new top-left cell.
fn reveal<E: CalcEngine + ?Sized>(cx: &mut KeyContext<'_, E>, row: u32, column: u32) -> Result<()> {
    if cx.viewport.scroll_into_view(row, column, cx.layout) {
        let (top, left) = cx.viewport.top_left_cell(cx.layout);
        cx.engine.set_top_left_visible_cell(top, left)?;
    }
    Ok(())
}

fn jump_to<E: CalcEngine + ?Sized>(cx: &mut KeyContext<'_, E>, row: u32, column: u32) -> Result<()> {
    cx.engine.set_selected_cell(row, column)?;
    reveal(cx, row, column)
}

fn move_by<E: CalcEngine + ?Sized>(cx: &mut KeyContext<'_, E>, direction: Direction) -> Result<()> {
    let view = cx.engine.selected_view();
    let (row, column) = step(view.row, view.column, direction, cx.config);
    jump_to(cx, row, column)
}

fn jump_to_edge<E: CalcEngine + ?Sized>(cx: &mut KeyContext<'_, E>, direction: Direction) -> Result<()> {
    let view = cx.engine.selected_view();
    let (sheet, row, column) = (view.sheet, view.row, view.column);
    let (row, column) = match direction {
        Direction::Up | Direction::Down => {
            let filled = cx.engine.rows_with_data(sheet, column);
            let forward = direction == Direction::Down;
            (edge_in_direction(&filled, row, forward, cx.config.last_row), column)
        }
        Direction::Left | Direction::Right => {
            let filled = cx.engine.columns_with_data(sheet, row);
            let forward = direction == Direction::Right;
            (row, edge_in_direction(&filled, column, forward, cx.config.last_column))
        }
    };
    jump_to(cx, row, column)
}

/// Target of a Ctrl+arrow along one line of cells, `filled` holding the
/// ascending positions with data.
///
/// Inside a block of data the jump goes to the block's last cell; otherwise
/// to the next filled cell, or to the edge of the sheet when there is none.
pub fn edge_in_direction(filled: &[u32], position: u32, forward: bool, last: u32) -> u32 {
    let next = |i: u32| {
        if forward {
            (i < last).then(|| i + 1)
        } else {
            (i > 1).then(|| i - 1)
        }
    };
    let Some(neighbour) = next(position) else {
        return position;
    };
    let is_filled = |i: u32| filled.binary_search(&i).is_ok();

    if is_filled(position) && is_filled(neighbour) {
        let mut current = neighbour;
        while let Some(candidate) = next(current).filter(|c| is_filled(*c)) {
            current = candidate;
        }
        return current;
    }
    let found = if forward {
        filled.iter().copied().find(|&i| i > position)
    } else {
        filled.iter().rev().copied().find(|&i| i < position)
    };
    found.unwrap_or(if forward { last } else { 1 })
}

/// Shift+arrow: moves the range edge opposite the selected cell, or shrinks
/// the range from the selected cell's side once that edge reaches it.
fn expand_selection<E: CalcEngine + ?Sized>(cx: &mut KeyContext<'_, E>, direction: Direction) -> Result<()> {
    let view = cx.engine.selected_view();
    let (mut r1, mut c1, mut r2, mut c2) = view.range.bounds();
    let (last_row, last_column) = (cx.config.last_row, cx.config.last_column);

    let (row, column) = match direction {
        Direction::Right if view.column > c1 => {
            c1 += 1;
            (view.row, c1)
        }
        Direction::Right if c2 < last_column => {
            c2 += 1;
            (view.row, c2)
        }
        Direction::Left if view.column < c2 => {
            c2 -= 1;
            (view.row, c2)
        }
        Direction::Left if c1 > 1 => {
            c1 -= 1;
            (view.row, c1)
        }
        Direction::Down if view.row > r1 => {
            r1 += 1;
            (r1, view.column)
        }
        Direction::Down if r2 < last_row => {
            r2 += 1;
            (r2, view.column)
        }
        Direction::Up if view.row < r2 => {
            r2 -= 1;
            (r2, view.column)
        }
        Direction::Up if r1 > 1 => {
            r1 -= 1;
            (r1, view.column)
        }
        _ => return Ok(()),
    };
    cx.engine.set_selected_range(r1, c1, r2, c2)?;
    reveal(cx, row, column)
}

fn page<E: CalcEngine + ?Sized>(cx: &mut KeyContext<'_, E>, down: bool) -> Result<()> {
    let view = cx.engine.selected_view();
    let rows = cx.viewport.page_rows(cx.layout);
    let (top, left) = cx.viewport.top_left_cell(cx.layout);
    let last_row = cx.config.last_row;
    let shift = |r: u32| {
        if down {
            r.saturating_add(rows).min(last_row)
        } else {
            r.saturating_sub(rows).max(1)
        }
    };
    cx.viewport.scroll_to_cell(shift(top), left, cx.layout);
    let row = shift(view.row);
    cx.engine.set_selected_cell(row, view.column)?;
    cx.viewport.scroll_into_view(row, view.column, cx.layout);
    let (top, left) = cx.viewport.top_left_cell(cx.layout);
    cx.engine.set_top_left_visible_cell(top, left)
}

fn toggle_style<E, F>(cx: &mut KeyContext<'_, E>, path: &str, current: F) -> Result<()>
where
    E: CalcEngine + ?Sized,
    F: Fn(&CellStyle) -> bool,
{
    let view = cx.engine.selected_view();
    let value = !current(&cx.engine.cell_style(view.sheet, view.row, view.column));
    let block = CellBlock::from_range(view.sheet, &view.range);
    tracing::debug!(path, value, ?block, "style toggled");
    cx.engine.update_range_style(&block, path, if value { "true" } else { "false" })
}

fn select_column<E: CalcEngine + ?Sized>(cx: &mut KeyContext<'_, E>) -> Result<()> {
    let column = cx.engine.selected_view().column;
    cx.engine.set_selected_range(1, column, cx.config.last_row, column)
}

fn select_row<E: CalcEngine + ?Sized>(cx: &mut KeyContext<'_, E>) -> Result<()> {
    let row = cx.engine.selected_view().row;
    cx.engine.set_selected_range(row, 1, row, cx.config.last_column)
}

/// Alt+Down/Up, wrapping around.
fn cycle_sheet<E: CalcEngine + ?Sized>(cx: &mut KeyContext<'_, E>, next: bool) -> Result<()> {
    let count = u32::try_from(cx.engine.sheet_names().len()).unwrap_or(u32::MAX);
    if count == 0 {
        return Ok(());
    }
    let sheet = cx.engine.selected_view().sheet;
    let target = if next {
        if sheet + 1 >= count {
            0
        } else {
            sheet + 1
        }
    } else if sheet == 0 {
        count - 1
    } else {
        sheet - 1
    };
    cx.engine.set_selected_sheet(target)
}
