//! The grid painter.
//!
//! One call to [`GridRenderer::render`] repaints the whole surface from the
//! current geometry, workbook state and engine contents. Nothing is cached
//! between frames, so identical inputs always produce identical output.
//!
//! Paint order, later passes on top:
//! 1. background
//! 2. per pane (frozen corner, frozen rows, frozen columns, scrollable):
//!    cell fills, gridlines, cell text
//! 3. frozen separator bands
//! 4. row and column headers
//! 5. highlighted formula references
//! 6. selection outline and fill handle
//! 7. fill-handle drag outline
//! 8. resize guide
//! 9. cell editor box

use super::backend::{crisp, Rect, Surface, TextAlign};
use super::colors::{parse_color, reference_color, tint};
use super::headers::{header_boxes, render_headers};
use super::selection::{area_rects, fill_handle_rect, pane_rect, SelectionRect};
use crate::config::GridConfig;
use crate::editor::view::{overlay_lines, LINE_HEIGHT, VERTICAL_PADDING};
use crate::engine::CalcEngine;
use crate::layout::{Axis, SheetLayout, Viewport};
use crate::state::WorkbookState;
use crate::types::{CellStyle, HAlign, SelectedView, VAlign};

/// Where a header resize drag would put the trailing edge, in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeGuide {
    pub axis: Axis,
    pub position: f64,
}

/// Everything one frame reads.
pub struct Frame<'a, E: ?Sized> {
    pub engine: &'a E,
    pub layout: &'a SheetLayout,
    pub viewport: &'a Viewport,
    pub state: &'a WorkbookState,
    pub guide: Option<ResizeGuide>,
}

struct Pane {
    rows: (u32, u32),
    columns: (u32, u32),
    clip: Rect,
}

/// A visible cell with what the text pass needs.
struct CellPaint {
    rect: Rect,
    style: CellStyle,
    value: String,
}

fn panes(layout: &SheetLayout, viewport: &Viewport) -> Vec<Pane> {
    let row_ranges = [
        (layout.frozen_rows > 0).then_some(((1, layout.frozen_rows), true)),
        Some((viewport.visible_rows(layout), false)),
    ];
    let column_ranges = [
        (layout.frozen_columns > 0).then_some(((1, layout.frozen_columns), true)),
        Some((viewport.visible_columns(layout), false)),
    ];
    let mut panes = Vec::with_capacity(4);
    for (rows, row_frozen) in row_ranges.into_iter().flatten() {
        for (columns, col_frozen) in column_ranges.into_iter().flatten() {
            let clip = pane_rect(row_frozen, col_frozen, layout, viewport);
            if !clip.is_empty() {
                panes.push(Pane {
                    rows,
                    columns,
                    clip,
                });
            }
        }
    }
    panes
}

pub struct GridRenderer {
    config: GridConfig,
}

impl GridRenderer {
    pub fn new(config: GridConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn render<S, E>(&self, surface: &mut S, frame: &Frame<'_, E>)
    where
        S: Surface + ?Sized,
        E: CalcEngine + ?Sized,
    {
        let view = frame.engine.selected_view();
        let full = Rect::new(0.0, 0.0, surface.width(), surface.height());
        surface.fill_rect(full, &self.config.colors.background);

        for pane in panes(frame.layout, frame.viewport) {
            self.render_pane(surface, frame, &view, &pane);
        }
        self.render_frozen_separators(surface, frame.layout, frame.viewport);

        let boxes = header_boxes(frame.layout, frame.viewport, &self.config, &view.range);
        render_headers(surface, &boxes, &self.config);

        self.render_active_ranges(surface, frame, &view);
        self.render_selection(surface, frame, &view);
        self.render_extend_to(surface, frame);
        self.render_guide(surface, frame);
        self.render_editor(surface, frame, &view);
    }

    fn render_pane<S, E>(&self, surface: &mut S, frame: &Frame<'_, E>, view: &SelectedView, pane: &Pane)
    where
        S: Surface + ?Sized,
        E: CalcEngine + ?Sized,
    {
        let (layout, viewport) = (frame.layout, frame.viewport);
        let sheet = view.sheet;
        let (r1, r2) = pane.rows;
        let (c1, c2) = pane.columns;

        surface.save();
        surface.clip_rect(pane.clip);

        let mut rows: Vec<Vec<CellPaint>> = Vec::new();
        for row in r1..=r2 {
            let height = layout.row_height(row);
            if height <= 0.0 {
                continue;
            }
            let y = viewport.row_start_y(row, layout);
            if y >= pane.clip.bottom() {
                break;
            }
            let mut cells = Vec::new();
            for column in c1..=c2 {
                let width = layout.column_width(column);
                let x = viewport.column_start_x(column, layout);
                if x >= pane.clip.right() {
                    break;
                }
                let rect = Rect::new(x, y, width, height);
                let style = frame.engine.cell_style(sheet, row, column);
                if width > 0.0 {
                    if let Some(fill) = style.fill_color.as_deref().and_then(parse_color) {
                        surface.fill_rect(rect, &fill);
                    }
                }
                let editing_here = frame
                    .state
                    .editing_cell()
                    .is_some_and(|s| s.is_at(sheet, row, column));
                let value = if editing_here {
                    String::new()
                } else {
                    frame.engine.formatted_cell_value(sheet, row, column)
                };
                let style = if matches!(style.align_h, HAlign::General) && !value.is_empty() {
                    let numeric = frame.engine.is_number(sheet, row, column);
                    CellStyle {
                        align_h: if numeric { HAlign::Right } else { HAlign::Left },
                        ..style
                    }
                } else {
                    style
                };
                cells.push(CellPaint {
                    rect,
                    style,
                    value,
                });
            }
            rows.push(cells);
        }

        self.render_gridlines(surface, &rows, pane);
        for cells in &rows {
            for (i, cell) in cells.iter().enumerate() {
                if cell.value.is_empty() || cell.rect.w <= 0.0 {
                    continue;
                }
                let clip = self.text_clip(surface, cells, i, pane).intersect(&pane.clip);
                self.render_cell_text(surface, cell, clip);
            }
        }

        surface.restore();
    }

    fn render_gridlines<S: Surface + ?Sized>(&self, surface: &mut S, rows: &[Vec<CellPaint>], pane: &Pane) {
        let color = &self.config.colors.gridline;
        let (Some(first), Some(last)) = (rows.first(), rows.last()) else {
            return;
        };
        let top = first.first().map_or(pane.clip.y, |c| c.rect.y);
        let bottom = last
            .first()
            .map_or(pane.clip.bottom(), |c| c.rect.bottom())
            .min(pane.clip.bottom());
        let left = first.first().map_or(pane.clip.x, |c| c.rect.x);
        let right = first
            .last()
            .map_or(pane.clip.right(), |c| c.rect.right())
            .min(pane.clip.right());

        for cell in first.iter().filter(|c| c.rect.w > 0.0) {
            let x = crisp(cell.rect.right() - 1.0);
            surface.line(x, top, x, bottom, color, 1.0, &[]);
        }
        for cells in rows {
            if let Some(cell) = cells.first() {
                let y = crisp(cell.rect.bottom() - 1.0);
                surface.line(left, y, right, y, color, 1.0, &[]);
            }
        }
    }

    /// Clip for the text of `cells[index]`: the cell itself, widened over
    /// empty neighbours when unwrapped left- or right-aligned text spills.
    fn text_clip<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        cells: &[CellPaint],
        index: usize,
        pane: &Pane,
    ) -> Rect {
        let Some(cell) = cells.get(index) else {
            return Rect::default();
        };
        let rect = cell.rect;
        if cell.style.wrap || cell.value.contains('\n') {
            return rect;
        }
        let font = self.font_for(&cell.style);
        let needed = surface.measure_text(&cell.value, &font) + 2.0 * self.config.cell_padding;
        if needed <= rect.w {
            return rect;
        }
        match cell.style.align_h {
            HAlign::Left | HAlign::General => {
                let mut right = rect.right();
                for next in cells.iter().skip(index + 1) {
                    if !next.value.is_empty() || right - rect.x >= needed {
                        break;
                    }
                    right = next.rect.right();
                }
                Rect::new(rect.x, rect.y, right.min(pane.clip.right()) - rect.x, rect.h)
            }
            HAlign::Right => {
                let mut left = rect.x;
                for prev in cells.iter().take(index).rev() {
                    if !prev.value.is_empty() || rect.right() - left >= needed {
                        break;
                    }
                    left = prev.rect.x;
                }
                Rect::new(left, rect.y, rect.right() - left, rect.h)
            }
            HAlign::Center => rect,
        }
    }

    fn font_for(&self, style: &CellStyle) -> String {
        let size = style.font_size.unwrap_or(self.config.font_size);
        self.config.cell_font(size, style.bold, style.italic)
    }

    #[allow(clippy::cast_precision_loss)]
    fn render_cell_text<S: Surface + ?Sized>(&self, surface: &mut S, cell: &CellPaint, clip: Rect) {
        let style = &cell.style;
        let rect = cell.rect;
        let padding = self.config.cell_padding;
        let font_size = style.font_size.unwrap_or(self.config.font_size);
        let font = self.font_for(style);
        let color = style
            .font_color
            .as_deref()
            .and_then(parse_color)
            .unwrap_or_else(|| self.config.colors.text.clone());

        let lines = if style.wrap {
            wrap_text(surface, &cell.value, rect.w - 2.0 * padding, &font)
        } else {
            cell.value.split('\n').map(str::to_string).collect()
        };

        let (x, align) = match style.align_h {
            HAlign::Center => (rect.x + rect.w / 2.0, TextAlign::Center),
            HAlign::Right => (rect.right() - padding, TextAlign::Right),
            HAlign::Left | HAlign::General => (rect.x + padding, TextAlign::Left),
        };
        let line_height = font_size * LINE_HEIGHT;
        let count = lines.len() as f64;

        surface.save();
        surface.clip_rect(clip);
        for (i, line) in lines.iter().enumerate() {
            let i = i as f64;
            let y = match style.align_v {
                VAlign::Bottom => {
                    rect.bottom() - font_size / 2.0 - VERTICAL_PADDING + (i - count + 1.0) * line_height
                }
                VAlign::Center => rect.y + rect.h / 2.0 + (i + (1.0 - count) / 2.0) * line_height,
                VAlign::Top => rect.y + font_size / 2.0 + VERTICAL_PADDING + i * line_height,
            };
            surface.fill_text(line, x, y, &font, &color, align);

            if style.underline || style.strikethrough {
                let width = surface.measure_text(line, &font);
                let start = match align {
                    TextAlign::Left => x,
                    TextAlign::Center => x - width / 2.0,
                    TextAlign::Right => x - width,
                };
                if style.underline {
                    let uy = y + font_size / 2.0;
                    surface.line(start, uy, start + width, uy, &color, 1.0, &[]);
                }
                if style.strikethrough {
                    surface.line(start, y, start + width, y, &color, 1.0, &[]);
                }
            }
        }
        surface.restore();
    }

    fn render_frozen_separators<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        layout: &SheetLayout,
        viewport: &Viewport,
    ) {
        let color = &self.config.colors.frozen_separator;
        let band = layout.separator_width;
        if layout.frozen_rows > 0 {
            let y = layout.header_height + layout.frozen_rows_height() - band;
            surface.fill_rect(Rect::new(0.0, y, viewport.width, band), color);
        }
        if layout.frozen_columns > 0 {
            let x = layout.header_width + layout.frozen_columns_width() - band;
            surface.fill_rect(Rect::new(x, 0.0, band, viewport.height), color);
        }
    }

    fn render_active_ranges<S, E>(&self, surface: &mut S, frame: &Frame<'_, E>, view: &SelectedView)
    where
        S: Surface + ?Sized,
        E: CalcEngine + ?Sized,
    {
        let Some(session) = frame.state.editing_cell() else {
            return;
        };
        for range in session.active_ranges.iter().filter(|r| r.sheet == view.sheet) {
            for piece in area_rects(&range.area, frame.layout, frame.viewport) {
                fill_piece(surface, &piece, &tint(&range.color, 0.1));
                outline(surface, &piece, &range.color, 1.0, &[2.0, 2.0]);
            }
        }
        if let Some(referenced) = &session.referenced_range {
            if referenced.range.sheet == view.sheet {
                let color = reference_color(session.active_ranges.len());
                for piece in area_rects(&referenced.range.area, frame.layout, frame.viewport) {
                    fill_piece(surface, &piece, &tint(color, 0.1));
                    outline(surface, &piece, color, 1.0, &[]);
                }
            }
        }
    }

    fn render_selection<S, E>(&self, surface: &mut S, frame: &Frame<'_, E>, view: &SelectedView)
    where
        S: Surface + ?Sized,
        E: CalcEngine + ?Sized,
    {
        let colors = &self.config.colors;
        let pieces = area_rects(&view.range, frame.layout, frame.viewport);
        if !view.range.is_single_cell() {
            let fill = tint(&colors.outline, 0.1);
            for piece in &pieces {
                fill_piece(surface, piece, &fill);
            }
        }
        for piece in &pieces {
            outline(surface, piece, &colors.outline, 2.0, &[]);
        }

        if frame.state.editing_cell().is_none() {
            if let Some(handle) =
                fill_handle_rect(&view.range, frame.layout, frame.viewport, &self.config)
            {
                surface.fill_rect(handle, &colors.outline);
                surface.stroke_rect(handle, &colors.background, 1.0, &[]);
            }
        }
    }

    fn render_extend_to<S, E>(&self, surface: &mut S, frame: &Frame<'_, E>)
    where
        S: Surface + ?Sized,
        E: CalcEngine + ?Sized,
    {
        let Some(extend) = frame.state.extend_to_area() else {
            return;
        };
        for piece in area_rects(&extend.area, frame.layout, frame.viewport) {
            outline(surface, &piece, &self.config.colors.outline, 1.0, &[4.0, 3.0]);
        }
    }

    fn render_guide<S, E>(&self, surface: &mut S, frame: &Frame<'_, E>)
    where
        S: Surface + ?Sized,
        E: CalcEngine + ?Sized,
    {
        let Some(guide) = frame.guide else {
            return;
        };
        let color = &self.config.colors.outline;
        let p = crisp(guide.position);
        match guide.axis {
            Axis::Column => surface.line(p, 0.0, p, frame.viewport.height, color, 1.0, &[]),
            Axis::Row => surface.line(0.0, p, frame.viewport.width, p, color, 1.0, &[]),
        }
    }

    fn render_editor<S, E>(&self, surface: &mut S, frame: &Frame<'_, E>, view: &SelectedView)
    where
        S: Surface + ?Sized,
        E: CalcEngine + ?Sized,
    {
        let Some(session) = frame.state.editing_cell() else {
            return;
        };
        if session.sheet != view.sheet {
            return;
        }
        let Some(rect) = editor_rect(session, frame.layout, frame.viewport) else {
            return;
        };
        let colors = &self.config.colors;
        surface.fill_rect(rect, &colors.editor_background);
        surface.stroke_rect(rect, &colors.outline, 2.0, &[]);

        let font_size = self.config.font_size;
        let font = self.config.cell_font(font_size, false, false);
        let line_height = font_size * LINE_HEIGHT;
        let padding = self.config.cell_padding;
        let names = frame.engine.sheet_names();

        surface.save();
        surface.clip_rect(rect);
        let mut y = rect.y + VERTICAL_PADDING + line_height / 2.0;
        for line in overlay_lines(session, &names) {
            let mut x = rect.x + padding;
            for run in line {
                let color = run.color.as_deref().unwrap_or(&colors.text);
                surface.fill_text(&run.text, x, y, &font, color, TextAlign::Left);
                x += surface.measure_text(&run.text, &font);
            }
            y += line_height;
        }
        surface.restore();
    }
}

/// Screen rectangle of the cell editor box, anchored at the editing cell.
pub fn editor_rect(
    session: &crate::types::EditingSession,
    layout: &SheetLayout,
    viewport: &Viewport,
) -> Option<Rect> {
    if layout.column_width(session.column) <= 0.0 || layout.row_height(session.row) <= 0.0 {
        return None;
    }
    Some(Rect::new(
        viewport.column_start_x(session.column, layout),
        viewport.row_start_y(session.row, layout),
        session.editor_width,
        session.editor_height,
    ))
}

fn fill_piece<S: Surface + ?Sized>(surface: &mut S, piece: &SelectionRect, color: &str) {
    surface.save();
    surface.clip_rect(piece.clip);
    surface.fill_rect(piece.rect(), color);
    surface.restore();
}

/// Strokes the edges a pane piece owns, inset so thick lines stay inside.
fn outline<S: Surface + ?Sized>(surface: &mut S, piece: &SelectionRect, color: &str, width: f64, dash: &[f64]) {
    let r = piece.rect();
    let half = width / 2.0;
    let (left, top) = (r.x + half, r.y + half);
    let (right, bottom) = (r.right() - half, r.bottom() - half);
    surface.save();
    surface.clip_rect(piece.clip);
    if piece.draw_top {
        surface.line(r.x, top, r.right(), top, color, width, dash);
    }
    if piece.draw_bottom {
        surface.line(r.x, bottom, r.right(), bottom, color, width, dash);
    }
    if piece.draw_left {
        surface.line(left, r.y, left, r.bottom(), color, width, dash);
    }
    if piece.draw_right {
        surface.line(right, r.y, right, r.bottom(), color, width, dash);
    }
    surface.restore();
}

/// Wrap text into lines that fit within `max_width`. Explicit newlines
/// always break; words longer than a line are split by character.
pub fn wrap_text<S: Surface + ?Sized>(surface: &mut S, text: &str, max_width: f64, font: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for paragraph in text.split('\n') {
        let mut current_line = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current_line.is_empty() {
                word.to_string()
            } else {
                format!("{current_line} {word}")
            };
            if surface.measure_text(&candidate, font) <= max_width {
                current_line = candidate;
                continue;
            }
            if !current_line.is_empty() {
                lines.push(std::mem::take(&mut current_line));
            }
            // Word is too long, need to break it
            for c in word.chars() {
                current_line.push(c);
                if surface.measure_text(&current_line, font) > max_width && current_line.chars().count() > 1 {
                    current_line.pop();
                    lines.push(std::mem::take(&mut current_line));
                    current_line.push(c);
                }
            }
        }
        lines.push(current_line);
    }
    lines
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::render::backend::DisplayList;

    #[test]
    fn wrap_breaks_on_words_and_newlines() {
        // 13px font: 7.8 px per character
        let mut list = DisplayList::new(10.0, 10.0);
        let lines = wrap_text(&mut list, "aaa bbb ccc\nd", 60.0, "13px Inter");
        assert_eq!(lines, vec!["aaa bbb", "ccc", "d"]);
    }

    #[test]
    fn wrap_splits_long_words() {
        let mut list = DisplayList::new(10.0, 10.0);
        let lines = wrap_text(&mut list, "abcdefghij", 40.0, "10px Inter");
        // 6 px per character: six fit in 40 px
        assert_eq!(lines, vec!["abcdef", "ghij"]);
    }
}
