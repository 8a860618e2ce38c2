//! Pointer gestures over the grid: selecting, fill-handle extension,
//! reference insertion while editing a formula, and header resizing.
//!
//! One gesture is active at a time and it owns the pointer that started it.
//! A pointer-down while a gesture is active is ignored, as are moves and ups
//! from any other pointer.

mod extend;

pub use extend::extend_direction;

use crate::cell_ref::range_to_str;
use crate::config::GridConfig;
use crate::engine::CalcEngine;
use crate::error::Result;
use crate::formula::is_in_reference_mode;
use crate::layout::{Axis, SheetLayout, Viewport};
use crate::render::{hits_fill_handle, ResizeGuide};
use crate::state::WorkbookState;
use crate::types::{Area, CellBlock, ExtendDirection, ReferencedRange, SheetArea};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerType {
    #[default]
    Mouse,
    Pen,
    Touch,
}

impl PointerType {
    /// From a DOM `pointerType`. Unknown values are treated as touch.
    pub fn parse(s: &str) -> Self {
        match s {
            "mouse" => Self::Mouse,
            "pen" => Self::Pen,
            _ => Self::Touch,
        }
    }
}

/// A pointer event in canvas coordinates (CSS pixels, headers included).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub x: f64,
    pub y: f64,
    pub pointer_id: i32,
    pub pointer_type: PointerType,
    pub shift: bool,
}

impl PointerEvent {
    pub fn mouse(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            pointer_id: 1,
            pointer_type: PointerType::Mouse,
            shift: false,
        }
    }

    pub fn with_shift(self) -> Self {
        Self { shift: true, ..self }
    }
}

/// An in-progress header resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeDrag {
    pub axis: Axis,
    pub index: u32,
    /// Screen coordinate of the leading edge
    pub origin: f64,
    /// Size the pointer currently asks for
    pub size: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Selecting,
    /// Fill-handle drag from `source`, the selection when the drag started
    Extending { source: SheetArea },
    InsertingReference,
    Resizing(ResizeDrag),
}

/// What a pointer handler may touch.
pub struct PointerContext<'a, E: ?Sized> {
    pub engine: &'a mut E,
    pub state: &'a mut WorkbookState,
    pub layout: &'a mut SheetLayout,
    pub viewport: &'a Viewport,
    pub config: &'a GridConfig,
}

#[derive(Debug, Default)]
pub struct PointerEngine {
    gesture: Gesture,
    captured: Option<i32>,
}

impl PointerEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    /// Whether a gesture holds pointer capture; the host mirrors this with
    /// `setPointerCapture`/`releasePointerCapture`.
    pub fn is_capturing(&self) -> bool {
        self.captured.is_some()
    }

    pub fn captured_pointer(&self) -> Option<i32> {
        self.captured
    }

    /// Guide line for an active header resize.
    pub fn guide(&self) -> Option<ResizeGuide> {
        match self.gesture {
            Gesture::Resizing(drag) => Some(ResizeGuide {
                axis: drag.axis,
                position: drag.origin + drag.size,
            }),
            _ => None,
        }
    }

    fn begin(&mut self, gesture: Gesture, pointer_id: i32) {
        self.gesture = gesture;
        self.captured = Some(pointer_id);
    }

    fn end(&mut self) -> Gesture {
        self.captured = None;
        std::mem::take(&mut self.gesture)
    }

    pub fn pointer_down<E: CalcEngine + ?Sized>(
        &mut self,
        cx: &mut PointerContext<'_, E>,
        event: &PointerEvent,
    ) -> Result<()> {
        if self.captured.is_some() {
            tracing::trace!(pointer_id = event.pointer_id, "pointer down during a gesture ignored");
            return Ok(());
        }
        let (x, y) = (event.x, event.y);
        let layout = &*cx.layout;

        if let Some((axis, index)) = resize_target(x, y, layout, cx.viewport, cx.config) {
            let origin = match axis {
                Axis::Column => cx.viewport.column_start_x(index, layout),
                Axis::Row => cx.viewport.row_start_y(index, layout),
            };
            let size = match axis {
                Axis::Column => layout.column_width(index),
                Axis::Row => layout.row_height(index),
            };
            self.begin(
                Gesture::Resizing(ResizeDrag {
                    axis,
                    index,
                    origin,
                    size,
                }),
                event.pointer_id,
            );
            return Ok(());
        }

        let in_row_headers = x < layout.header_width;
        let in_column_headers = y < layout.header_height;
        if in_row_headers && in_column_headers {
            return select_all(cx.engine, cx.config);
        }
        if in_row_headers {
            if let Some(row) = cx.viewport.row_at(y, layout) {
                return select_row(cx.engine, cx.config, row, event.shift);
            }
            return Ok(());
        }
        if in_column_headers {
            if let Some(column) = cx.viewport.column_at(x, layout) {
                return select_column(cx.engine, cx.config, column, event.shift);
            }
            return Ok(());
        }

        if cx.state.editing_cell().is_none() {
            let range = cx.engine.selected_view().range;
            if hits_fill_handle(&range, layout, cx.viewport, cx.config, x, y) {
                return self.fill_handle_pointer_down(cx, event);
            }
        }

        let Some((row, column)) = cx.viewport.cell_at(x, y, layout) else {
            return Ok(());
        };
        let selected_sheet = cx.engine.selected_view().sheet;

        if let Some(session) = cx.state.editing_cell_mut() {
            if session.is_at(selected_sheet, row, column) {
                return Ok(());
            }
            if is_in_reference_mode(&session.text, session.cursor_end) {
                let area = Area::cell(row, column);
                let names = cx.engine.sheet_names();
                let name = sheet_name(&names, selected_sheet);
                session.referenced_range = Some(ReferencedRange {
                    range: SheetArea {
                        sheet: selected_sheet,
                        area,
                    },
                    str: range_to_str(selected_sheet, &area, session.sheet, name),
                });
                tracing::debug!(row, column, "reference inserted");
                self.begin(Gesture::InsertingReference, event.pointer_id);
                return Ok(());
            }
            if let Some(session) = cx.state.clear_editing_cell() {
                let text = session.editing_text();
                tracing::debug!(
                    sheet = session.sheet,
                    row = session.row,
                    column = session.column,
                    "edit committed by click"
                );
                if let Err(e) = cx
                    .engine
                    .set_user_input(session.sheet, session.row, session.column, &text)
                {
                    cx.state.set_editing_cell(session);
                    return Err(e);
                }
            }
        }

        if event.shift {
            cx.engine.on_area_selecting(row, column)?;
            return area_selected(cx.engine, cx.state);
        }
        tracing::debug!(row, column, "cell selected");
        // Capture first so a rejected selection does not leave a dangling gesture.
        self.begin(Gesture::Selecting, event.pointer_id);
        if let Err(e) = cx.engine.set_selected_cell(row, column) {
            self.end();
            return Err(e);
        }
        Ok(())
    }

    /// Pointer-down on the fill handle: starts extending the current selection.
    pub fn fill_handle_pointer_down<E: CalcEngine + ?Sized>(
        &mut self,
        cx: &mut PointerContext<'_, E>,
        event: &PointerEvent,
    ) -> Result<()> {
        if self.captured.is_some() {
            return Ok(());
        }
        let view = cx.engine.selected_view();
        self.begin(
            Gesture::Extending {
                source: SheetArea {
                    sheet: view.sheet,
                    area: view.range,
                },
            },
            event.pointer_id,
        );
        Ok(())
    }

    pub fn pointer_move<E: CalcEngine + ?Sized>(
        &mut self,
        cx: &mut PointerContext<'_, E>,
        event: &PointerEvent,
    ) -> Result<()> {
        if self.captured != Some(event.pointer_id) {
            return Ok(());
        }
        match self.gesture {
            Gesture::Idle => Ok(()),
            Gesture::Resizing(mut drag) => {
                let pointer = match drag.axis {
                    Axis::Column => event.x,
                    Axis::Row => event.y,
                };
                let min = match drag.axis {
                    Axis::Column => cx.config.min_column_width,
                    Axis::Row => cx.config.min_row_height,
                };
                drag.size = (pointer - drag.origin).max(f64::from(min));
                self.gesture = Gesture::Resizing(drag);
                Ok(())
            }
            Gesture::Extending { source } => {
                let Some((row, column)) = cx.viewport.cell_at(event.x, event.y, cx.layout) else {
                    return Ok(());
                };
                match extend_direction(&source.area, row, column) {
                    Some(extend) => cx.state.set_extend_to_area(extend),
                    None => {
                        cx.state.clear_extend_to_area();
                    }
                }
                Ok(())
            }
            // Touch moves scroll and pan instead.
            Gesture::Selecting | Gesture::InsertingReference
                if event.pointer_type != PointerType::Mouse =>
            {
                Ok(())
            }
            Gesture::Selecting => {
                let Some((row, column)) = cx.viewport.cell_at(event.x, event.y, cx.layout) else {
                    return Ok(());
                };
                cx.engine.on_area_selecting(row, column)
            }
            Gesture::InsertingReference => {
                let Some((row, column)) = cx.viewport.cell_at(event.x, event.y, cx.layout) else {
                    return Ok(());
                };
                let names = cx.engine.sheet_names();
                let Some(session) = cx.state.editing_cell_mut() else {
                    return Ok(());
                };
                let editing_sheet = session.sheet;
                let Some(referenced) = session.referenced_range.as_mut() else {
                    return Ok(());
                };
                referenced.range.area.row_end = row;
                referenced.range.area.column_end = column;
                let sheet = referenced.range.sheet;
                referenced.str = range_to_str(
                    sheet,
                    &referenced.range.area,
                    editing_sheet,
                    sheet_name(&names, sheet),
                );
                Ok(())
            }
        }
    }

    pub fn pointer_up<E: CalcEngine + ?Sized>(
        &mut self,
        cx: &mut PointerContext<'_, E>,
        event: &PointerEvent,
    ) -> Result<()> {
        if self.captured != Some(event.pointer_id) {
            return Ok(());
        }
        match self.end() {
            Gesture::Idle | Gesture::InsertingReference => Ok(()),
            Gesture::Selecting => area_selected(cx.engine, cx.state),
            Gesture::Extending { source } => match cx.state.clear_extend_to_area() {
                Some(extend) => {
                    let block = CellBlock::from_range(source.sheet, &source.area);
                    tracing::debug!(?extend.direction, ?block, "autofill");
                    match extend.direction {
                        ExtendDirection::RowsDown => {
                            cx.engine.auto_fill_rows(&block, extend.area.row_end)?;
                        }
                        ExtendDirection::RowsUp => {
                            cx.engine.auto_fill_rows(&block, extend.area.row_start)?;
                        }
                        ExtendDirection::ColumnsRight => {
                            cx.engine.auto_fill_columns(&block, extend.area.column_end)?;
                        }
                        ExtendDirection::ColumnsLeft => {
                            cx.engine.auto_fill_columns(&block, extend.area.column_start)?;
                        }
                    }
                    let (r1, c1, r2, c2) = source.area.union(&extend.area).bounds();
                    cx.engine.set_selected_range(r1, c1, r2, c2)
                }
                None => Ok(()),
            },
            Gesture::Resizing(drag) => commit_resize(cx, &drag),
        }
    }

    /// Double-click on the fill handle: fill the selected cell down as far as
    /// the neighbouring column has contiguous data.
    pub fn fill_handle_double_click<E: CalcEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        config: &GridConfig,
    ) -> Result<()> {
        let view = engine.selected_view();
        let (sheet, row, column) = (view.sheet, view.row, view.column);

        let left = column
            .checked_sub(1)
            .filter(|c| *c >= 1 && !engine.formatted_cell_value(sheet, row, *c).is_empty());
        let test_column = match left {
            Some(c) => c,
            None => {
                let right = column + 1;
                if right > config.last_column || engine.formatted_cell_value(sheet, row, right).is_empty() {
                    return Ok(());
                }
                right
            }
        };

        // End of the run of filled cells starting right below `row`.
        let mut last_used_row = row + 1;
        let mut next = row + 1;
        for r in engine.rows_with_data(sheet, test_column) {
            if r < next {
                continue;
            }
            if r > next || engine.formatted_cell_value(sheet, r, test_column).is_empty() {
                break;
            }
            last_used_row = r;
            next = r + 1;
        }

        let block = CellBlock {
            sheet,
            row,
            column,
            width: 1,
            height: 1,
        };
        tracing::debug!(?block, to_row = last_used_row, "autofill to end of data");
        engine.auto_fill_rows(&block, last_used_row)
    }
}

fn sheet_name(names: &[String], sheet: u32) -> &str {
    usize::try_from(sheet)
        .ok()
        .and_then(|i| names.get(i))
        .map_or("", String::as_str)
}

/// Header edge under the pointer that starts a resize drag.
pub fn resize_target(
    x: f64,
    y: f64,
    layout: &SheetLayout,
    viewport: &Viewport,
    config: &GridConfig,
) -> Option<(Axis, u32)> {
    let grab = config.resize_handle_width;
    if y < layout.header_height && x >= layout.header_width {
        let column = viewport.column_at(x, layout)?;
        let start = viewport.column_start_x(column, layout);
        if start + layout.column_width(column) - x <= grab {
            return Some((Axis::Column, column));
        }
        if x - start <= grab && column > 1 {
            return viewport
                .column_at(start - 1.0, layout)
                .map(|c| (Axis::Column, c));
        }
        return None;
    }
    if x < layout.header_width && y >= layout.header_height {
        let row = viewport.row_at(y, layout)?;
        let start = viewport.row_start_y(row, layout);
        if start + layout.row_height(row) - y <= grab {
            return Some((Axis::Row, row));
        }
        if y - start <= grab && row > 1 {
            return viewport.row_at(start - 1.0, layout).map(|r| (Axis::Row, r));
        }
    }
    None
}

/// Applies a finished resize. When the resized header is part of a selection
/// of whole columns (rows), every selected column (row) gets the new size.
fn commit_resize<E: CalcEngine + ?Sized>(cx: &mut PointerContext<'_, E>, drag: &ResizeDrag) -> Result<()> {
    let view = cx.engine.selected_view();
    let (r1, c1, r2, c2) = view.range.bounds();
    let full_columns = r1 == 1 && r2 == cx.config.last_row;
    let full_rows = c1 == 1 && c2 == cx.config.last_column;

    match drag.axis {
        Axis::Column => {
            let (first, last) = if full_columns && !full_rows && (c1..=c2).contains(&drag.index) {
                (c1, c2)
            } else {
                (drag.index, drag.index)
            };
            for column in first..=last {
                let width = cx
                    .layout
                    .resize(Axis::Column, column, drag.size, cx.config.min_column_width);
                tracing::debug!(column, width, "column resized");
                cx.engine.set_column_width(view.sheet, column, width)?;
            }
        }
        Axis::Row => {
            let (first, last) = if full_rows && !full_columns && (r1..=r2).contains(&drag.index) {
                (r1, r2)
            } else {
                (drag.index, drag.index)
            };
            for row in first..=last {
                let height = cx
                    .layout
                    .resize(Axis::Row, row, drag.size, cx.config.min_row_height);
                tracing::debug!(row, height, "row resized");
                cx.engine.set_row_height(view.sheet, row, height)?;
            }
        }
    }
    Ok(())
}

/// End of an area selection: pending copied styles are pasted onto it.
pub fn area_selected<E: CalcEngine + ?Sized>(engine: &mut E, state: &mut WorkbookState) -> Result<()> {
    let styles = state.copy_styles().map(<[_]>::to_vec);
    state.set_copy_styles(None);
    match styles {
        Some(styles) if !styles.is_empty() => {
            tracing::debug!(rows = styles.len(), "pasting copied styles");
            engine.on_paste_styles(&styles)
        }
        _ => Ok(()),
    }
}

pub fn select_all<E: CalcEngine + ?Sized>(engine: &mut E, config: &GridConfig) -> Result<()> {
    engine.set_selected_cell(1, 1)?;
    engine.set_selected_range(1, 1, config.last_row, config.last_column)
}

/// Selects whole rows; with `extend` from the current range to `row`.
pub fn select_row<E: CalcEngine + ?Sized>(
    engine: &mut E,
    config: &GridConfig,
    row: u32,
    extend: bool,
) -> Result<()> {
    let (first, last) = if extend {
        let range = engine.selected_view().range;
        (
            range.row_start.min(range.row_end).min(row),
            range.row_start.max(range.row_end).max(row),
        )
    } else {
        (row, row)
    };
    engine.set_selected_cell(first, 1)?;
    engine.set_selected_range(first, 1, last, config.last_column)
}

/// Selects whole columns; with `extend` from the current range to `column`.
pub fn select_column<E: CalcEngine + ?Sized>(
    engine: &mut E,
    config: &GridConfig,
    column: u32,
    extend: bool,
) -> Result<()> {
    let (first, last) = if extend {
        let range = engine.selected_view().range;
        (
            range.column_start.min(range.column_end).min(column),
            range.column_start.max(range.column_end).max(column),
        )
    } else {
        (column, column)
    };
    engine.set_selected_cell(1, first)?;
    engine.set_selected_range(1, first, config.last_row, last)
}
