//! Selection overlay helpers.
//!
//! These helpers keep selection math testable without depending on Canvas APIs.
//! An area that straddles a frozen boundary is split into up to four pieces,
//! one per pane, each flagged with the outer edges it owns.

use super::backend::Rect;
use crate::config::GridConfig;
use crate::layout::{SheetLayout, Viewport};
use crate::types::Area;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    /// Pane the piece must be clipped to
    pub clip: Rect,
    pub draw_top: bool,
    pub draw_bottom: bool,
    pub draw_left: bool,
    pub draw_right: bool,
}

impl SelectionRect {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }
}

/// Screen region of one pane: frozen or scrollable on each axis.
pub fn pane_rect(
    row_frozen: bool,
    col_frozen: bool,
    layout: &SheetLayout,
    viewport: &Viewport,
) -> Rect {
    let (x, w) = if col_frozen {
        (
            layout.header_width,
            layout.frozen_columns_width() - layout.separator_width,
        )
    } else {
        let x = viewport.scroll_origin_x(layout);
        (x, viewport.width - x)
    };
    let (y, h) = if row_frozen {
        (
            layout.header_height,
            layout.frozen_rows_height() - layout.separator_width,
        )
    } else {
        let y = viewport.scroll_origin_y(layout);
        (y, viewport.height - y)
    };
    Rect::new(x, y, w.max(0.0), h.max(0.0))
}

fn split(min: u32, max: u32, frozen: u32) -> (Option<(u32, u32)>, Option<(u32, u32)>) {
    let frozen_range = (frozen > 0 && min <= frozen).then(|| (min, max.min(frozen)));
    let scroll_range = (max > frozen).then(|| (min.max(frozen + 1), max));
    (frozen_range, scroll_range)
}

/// Screen pieces of `area`, one per pane it touches. Pieces that end up with
/// no size (hidden rows or columns) are dropped.
pub fn area_rects(area: &Area, layout: &SheetLayout, viewport: &Viewport) -> Vec<SelectionRect> {
    let (min_row, min_col, max_row, max_col) = area.bounds();
    let (frozen_rows, scroll_rows) = split(min_row, max_row, layout.frozen_rows);
    let (frozen_cols, scroll_cols) = split(min_col, max_col, layout.frozen_columns);

    let mut rects = Vec::new();
    let mut push_rect =
        |row_range: (u32, u32), col_range: (u32, u32), row_frozen: bool, col_frozen: bool| {
            let (row_start, row_end) = row_range;
            let (col_start, col_end) = col_range;
            let x1 = viewport.column_start_x(col_start, layout);
            let y1 = viewport.row_start_y(row_start, layout);
            let x2 = viewport.column_start_x(col_end, layout) + layout.column_width(col_end);
            let y2 = viewport.row_start_y(row_end, layout) + layout.row_height(row_end);
            let w = (x2 - x1).max(0.0);
            let h = (y2 - y1).max(0.0);
            if w <= 0.0 || h <= 0.0 {
                return;
            }

            rects.push(SelectionRect {
                x: x1,
                y: y1,
                w,
                h,
                clip: pane_rect(row_frozen, col_frozen, layout, viewport),
                draw_top: row_start == min_row,
                draw_bottom: row_end == max_row,
                draw_left: col_start == min_col,
                draw_right: col_end == max_col,
            });
        };

    if let (Some(row_range), Some(col_range)) = (frozen_rows, frozen_cols) {
        push_rect(row_range, col_range, true, true);
    }
    if let (Some(row_range), Some(col_range)) = (frozen_rows, scroll_cols) {
        push_rect(row_range, col_range, true, false);
    }
    if let (Some(row_range), Some(col_range)) = (scroll_rows, frozen_cols) {
        push_rect(row_range, col_range, false, true);
    }
    if let (Some(row_range), Some(col_range)) = (scroll_rows, scroll_cols) {
        push_rect(row_range, col_range, false, false);
    }

    rects
}

/// Bounding box of `area` on screen, ignoring pane splits.
pub fn area_bounds(area: &Area, layout: &SheetLayout, viewport: &Viewport) -> Option<Rect> {
    let rects = area_rects(area, layout, viewport);
    let first = rects.first()?.rect();
    Some(rects.iter().skip(1).fold(first, |acc, r| {
        let x = acc.x.min(r.x);
        let y = acc.y.min(r.y);
        Rect::new(
            x,
            y,
            acc.right().max(r.x + r.w) - x,
            acc.bottom().max(r.y + r.h) - y,
        )
    }))
}

/// The fill handle square at the bottom-right corner of the selection, when
/// that corner is on screen.
pub fn fill_handle_rect(
    area: &Area,
    layout: &SheetLayout,
    viewport: &Viewport,
    config: &GridConfig,
) -> Option<Rect> {
    let corner = area_rects(area, layout, viewport)
        .into_iter()
        .find(|r| r.draw_bottom && r.draw_right)?;
    let x = corner.x + corner.w;
    let y = corner.y + corner.h;
    if !corner.clip.contains(x - 1.0, y - 1.0) {
        return None;
    }
    let size = config.fill_handle_size;
    Some(Rect::new(x - size / 2.0, y - size / 2.0, size, size))
}

/// Whether a pointer at `(x, y)` grabs the fill handle.
pub fn hits_fill_handle(
    area: &Area,
    layout: &SheetLayout,
    viewport: &Viewport,
    config: &GridConfig,
    x: f64,
    y: f64,
) -> bool {
    fill_handle_rect(area, layout, viewport, config).is_some_and(|r| {
        let slack = config.fill_handle_slack;
        Rect::new(r.x - slack, r.y - slack, r.w + 2.0 * slack, r.h + 2.0 * slack).contains(x, y)
    })
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    fn layout_with_frozen(rows: u32, cols: u32) -> SheetLayout {
        let mut layout = SheetLayout::new(&GridConfig::default());
        layout.set_frozen(rows, cols);
        layout
    }

    #[test]
    fn selection_rects_split_frozen_rows() {
        let layout = layout_with_frozen(1, 0);
        let mut viewport = Viewport::new();
        viewport.scroll_y = 48.0;
        let rects = area_rects(&Area::new(1, 1, 4, 2), &layout, &viewport);
        assert_eq!(rects.len(), 2);

        let frozen = rects.iter().find(|r| r.draw_top).unwrap();
        let scroll = rects.iter().find(|r| r.draw_bottom).unwrap();
        assert_eq!(frozen.y, 28.0);
        assert_eq!(frozen.h, 24.0);
        // rows 2..=4 start 48 px above the scroll origin
        assert_eq!(scroll.y, 28.0 + 24.0 + 3.0 - 48.0);
        assert_eq!(scroll.clip.y, 55.0);
    }

    #[test]
    fn selection_rects_split_frozen_cols() {
        let layout = layout_with_frozen(0, 1);
        let mut viewport = Viewport::new();
        viewport.scroll_x = 200.0;
        let rects = area_rects(&Area::new(1, 3, 2, 1), &layout, &viewport);
        assert_eq!(rects.len(), 2);

        let frozen = rects.iter().find(|r| r.draw_left).unwrap();
        let scroll = rects.iter().find(|r| r.draw_right).unwrap();
        assert_eq!(frozen.x, 30.0);
        assert_eq!(scroll.x, 30.0 + 103.0 - 200.0);
        assert_eq!(scroll.w, 200.0);
    }

    #[test]
    fn fill_handle_sits_on_corner() {
        let layout = layout_with_frozen(0, 0);
        let viewport = Viewport::new();
        let config = GridConfig::default();
        let area = Area::cell(2, 2);
        let handle = fill_handle_rect(&area, &layout, &viewport, &config).unwrap();
        assert_eq!((handle.x, handle.y), (230.0 - 2.5, 76.0 - 2.5));
        assert!(hits_fill_handle(&area, &layout, &viewport, &config, 232.0, 78.0));
        assert!(!hits_fill_handle(&area, &layout, &viewport, &config, 220.0, 60.0));
    }

    #[test]
    fn off_screen_corner_has_no_handle() {
        let layout = layout_with_frozen(0, 0);
        let mut viewport = Viewport::new();
        viewport.scroll_y = 1000.0;
        let area = Area::cell(2, 2);
        assert!(fill_handle_rect(&area, &layout, &viewport, &GridConfig::default()).is_none());
    }
}
