//! Viewport state: scroll offset, pixel size, and the mapping between screen
//! coordinates and cells.
//!
//! Screen layout, left to right: the row-number band (`header_width`), the
//! frozen columns, the separator band, then the scrollable columns shifted by
//! `scroll_x`. Rows mirror this vertically.

use super::sheet_layout::u64_px;
use super::SheetLayout;

#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    /// Horizontal scroll of the scrollable pane, in pixels from its first column
    pub scroll_x: f64,
    /// Vertical scroll of the scrollable pane, in pixels from its first row
    pub scroll_y: f64,
    /// Viewport width in pixels, headers included
    pub width: f64,
    /// Viewport height in pixels, headers included
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_offset(px: f64) -> u64 {
    // Only called with non-negative, finite values.
    px.max(0.0).floor() as u64
}

impl Viewport {
    pub fn new() -> Self {
        Self {
            scroll_x: 0.0,
            scroll_y: 0.0,
            width: 800.0,
            height: 600.0,
        }
    }

    /// Left edge of the scrollable pane on screen.
    pub fn scroll_origin_x(&self, layout: &SheetLayout) -> f64 {
        layout.header_width + layout.frozen_columns_width()
    }

    /// Top edge of the scrollable pane on screen.
    pub fn scroll_origin_y(&self, layout: &SheetLayout) -> f64 {
        layout.header_height + layout.frozen_rows_height()
    }

    /// Screen x of the left edge of `column`.
    ///
    /// Frozen columns ignore the scroll offset. Scrolled-out columns get
    /// coordinates left of the scrollable pane.
    pub fn column_start_x(&self, column: u32, layout: &SheetLayout) -> f64 {
        if column <= layout.frozen_columns {
            return layout.header_width + u64_px(layout.columns.start(column));
        }
        let first = layout.frozen_columns + 1;
        self.scroll_origin_x(layout) + u64_px(layout.columns.start(column))
            - u64_px(layout.columns.start(first))
            - self.scroll_x
    }

    /// Screen y of the top edge of `row`.
    pub fn row_start_y(&self, row: u32, layout: &SheetLayout) -> f64 {
        if row <= layout.frozen_rows {
            return layout.header_height + u64_px(layout.rows.start(row));
        }
        let first = layout.frozen_rows + 1;
        self.scroll_origin_y(layout) + u64_px(layout.rows.start(row))
            - u64_px(layout.rows.start(first))
            - self.scroll_y
    }

    /// Column under screen `x`. `None` over the row headers, on the frozen
    /// separator, or past the last column. Points right of the viewport still
    /// resolve so a captured drag keeps tracking.
    pub fn column_at(&self, x: f64, layout: &SheetLayout) -> Option<u32> {
        if !x.is_finite() || x < layout.header_width {
            return None;
        }
        let bx = x - layout.header_width;
        let frozen_px = layout.frozen_columns_width();
        if layout.frozen_columns > 0 {
            if bx < frozen_px - layout.separator_width {
                return layout.columns.index_at(to_offset(bx));
            }
            if bx < frozen_px {
                return None;
            }
        }
        let first = layout.frozen_columns + 1;
        let offset = bx - frozen_px + self.scroll_x + u64_px(layout.columns.start(first));
        layout.columns.index_at(to_offset(offset))
    }

    /// Row under screen `y`; see [`Viewport::column_at`].
    pub fn row_at(&self, y: f64, layout: &SheetLayout) -> Option<u32> {
        if !y.is_finite() || y < layout.header_height {
            return None;
        }
        let by = y - layout.header_height;
        let frozen_px = layout.frozen_rows_height();
        if layout.frozen_rows > 0 {
            if by < frozen_px - layout.separator_width {
                return layout.rows.index_at(to_offset(by));
            }
            if by < frozen_px {
                return None;
            }
        }
        let first = layout.frozen_rows + 1;
        let offset = by - frozen_px + self.scroll_y + u64_px(layout.rows.start(first));
        layout.rows.index_at(to_offset(offset))
    }

    /// Cell `(row, column)` under a screen point.
    pub fn cell_at(&self, x: f64, y: f64, layout: &SheetLayout) -> Option<(u32, u32)> {
        let column = self.column_at(x, layout)?;
        let row = self.row_at(y, layout)?;
        Some((row, column))
    }

    fn scrollable_view_width(&self, layout: &SheetLayout) -> f64 {
        (self.width - self.scroll_origin_x(layout)).max(0.0)
    }

    fn scrollable_view_height(&self, layout: &SheetLayout) -> f64 {
        (self.height - self.scroll_origin_y(layout)).max(0.0)
    }

    /// Visible scrollable row range (inclusive).
    pub fn visible_rows(&self, layout: &SheetLayout) -> (u32, u32) {
        let first = layout.frozen_rows + 1;
        let base = layout.rows.start(first);
        let top = layout
            .rows
            .index_at(base + to_offset(self.scroll_y))
            .unwrap_or(layout.max_row())
            .max(first);
        let bottom_offset = base + to_offset(self.scroll_y + self.scrollable_view_height(layout));
        let bottom = layout
            .rows
            .index_at(bottom_offset)
            .unwrap_or(layout.max_row())
            .max(top);
        (top, bottom)
    }

    /// Visible scrollable column range (inclusive).
    pub fn visible_columns(&self, layout: &SheetLayout) -> (u32, u32) {
        let first = layout.frozen_columns + 1;
        let base = layout.columns.start(first);
        let left = layout
            .columns
            .index_at(base + to_offset(self.scroll_x))
            .unwrap_or(layout.max_column())
            .max(first);
        let right_offset = base + to_offset(self.scroll_x + self.scrollable_view_width(layout));
        let right = layout
            .columns
            .index_at(right_offset)
            .unwrap_or(layout.max_column())
            .max(left);
        (left, right)
    }

    /// Top-left and bottom-right visible cells of the scrollable pane.
    pub fn visible_cells(&self, layout: &SheetLayout) -> ((u32, u32), (u32, u32)) {
        let (top, bottom) = self.visible_rows(layout);
        let (left, right) = self.visible_columns(layout);
        ((top, left), (bottom, right))
    }

    /// First cell of the scrollable pane, as the engine records it.
    pub fn top_left_cell(&self, layout: &SheetLayout) -> (u32, u32) {
        self.visible_cells(layout).0
    }

    /// Clamp scroll position to the scrollable content.
    pub fn clamp_scroll(&mut self, layout: &SheetLayout) {
        let max_x = (layout.scrollable_width() - self.scrollable_view_width(layout)).max(0.0);
        let max_y = (layout.scrollable_height() - self.scrollable_view_height(layout)).max(0.0);
        self.scroll_x = self.scroll_x.clamp(0.0, max_x);
        self.scroll_y = self.scroll_y.clamp(0.0, max_y);
    }

    pub fn scroll_by(&mut self, delta_x: f64, delta_y: f64, layout: &SheetLayout) {
        self.scroll_x += delta_x;
        self.scroll_y += delta_y;
        self.clamp_scroll(layout);
    }

    pub fn set_scroll(&mut self, x: f64, y: f64, layout: &SheetLayout) {
        self.scroll_x = x;
        self.scroll_y = y;
        self.clamp_scroll(layout);
    }

    /// Scroll so that the top-left of the scrollable pane is `(row, column)`.
    pub fn scroll_to_cell(&mut self, row: u32, column: u32, layout: &SheetLayout) {
        let x = layout
            .columns
            .span(layout.frozen_columns + 1, column.saturating_sub(1));
        let y = layout.rows.span(layout.frozen_rows + 1, row.saturating_sub(1));
        self.set_scroll(u64_px(x), u64_px(y), layout);
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Minimal scroll that makes `(row, column)` fully visible. Frozen rows and
    /// columns never need scrolling. Returns whether the offset changed.
    pub fn scroll_into_view(&mut self, row: u32, column: u32, layout: &SheetLayout) -> bool {
        let before = (self.scroll_x, self.scroll_y);

        if column > layout.frozen_columns {
            let first = layout.frozen_columns + 1;
            let start = u64_px(layout.columns.span(first, column - 1));
            let end = start + layout.column_width(column);
            let view = self.scrollable_view_width(layout);
            if start < self.scroll_x {
                self.scroll_x = start;
            } else if end > self.scroll_x + view {
                self.scroll_x = (end - view).min(start);
            }
        }
        if row > layout.frozen_rows {
            let first = layout.frozen_rows + 1;
            let start = u64_px(layout.rows.span(first, row - 1));
            let end = start + layout.row_height(row);
            let view = self.scrollable_view_height(layout);
            if start < self.scroll_y {
                self.scroll_y = start;
            } else if end > self.scroll_y + view {
                self.scroll_y = (end - view).min(start);
            }
        }
        self.clamp_scroll(layout);
        #[allow(clippy::float_cmp)]
        let changed = before != (self.scroll_x, self.scroll_y);
        changed
    }

    /// Rows that fit in one screen of the scrollable pane, at least 1.
    pub fn page_rows(&self, layout: &SheetLayout) -> u32 {
        let (top, bottom) = self.visible_rows(layout);
        (bottom - top).max(1)
    }
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
    use crate::config::GridConfig;
    use crate::layout::Axis;

    fn layout() -> SheetLayout {
        SheetLayout::new(&GridConfig::default())
    }

    #[test]
    fn headers_resolve_to_no_cell() {
        let layout = layout();
        let vp = Viewport::new();
        assert_eq!(vp.cell_at(10.0, 100.0, &layout), None);
        assert_eq!(vp.cell_at(100.0, 10.0, &layout), None);
        assert_eq!(vp.cell_at(-5.0, -5.0, &layout), None);
        assert_eq!(vp.cell_at(30.0, 28.0, &layout), Some((1, 1)));
    }

    #[test]
    fn scrolled_hit_test_subtracts_offset() {
        let layout = layout();
        let mut vp = Viewport::new();
        vp.set_scroll(250.0, 48.0, &layout);
        // 250 px into the columns is inside C; 48 px into the rows is row 3.
        assert_eq!(vp.cell_at(30.0, 28.0, &layout), Some((3, 3)));
        assert_eq!(vp.column_start_x(3, &layout), 30.0 - 50.0);
    }

    #[test]
    fn frozen_panes_ignore_scroll() {
        let mut layout = layout();
        layout.set_frozen(1, 1);
        let mut vp = Viewport::new();
        vp.set_scroll(500.0, 240.0, &layout);
        assert_eq!(vp.cell_at(31.0, 29.0, &layout), Some((1, 1)));
        // separator band
        assert_eq!(vp.cell_at(131.0, 100.0, &layout), None);
        assert_eq!(vp.cell_at(100.0, 53.0, &layout), None);
        // first scrollable column after 500 px of scroll is column 7
        assert_eq!(vp.cell_at(133.0, 29.0, &layout), Some((1, 7)));
        assert_eq!(vp.column_start_x(7, &layout), 133.0);
        assert_eq!(vp.top_left_cell(&layout), (12, 7));
    }

    #[test]
    fn scroll_into_view_is_minimal() {
        let layout = layout();
        let mut vp = Viewport::new();
        vp.resize(430.0, 268.0); // 4 columns, 10 rows
        assert!(!vp.scroll_into_view(2, 4, &layout));
        assert!(vp.scroll_into_view(2, 5, &layout));
        assert_eq!(vp.scroll_x, 100.0);
        assert!(vp.scroll_into_view(12, 1, &layout));
        assert_eq!(vp.scroll_x, 0.0);
        assert_eq!(vp.scroll_y, 48.0);
    }

    #[test]
    fn visible_range_respects_resized_rows() {
        let mut layout = layout();
        layout.resize(Axis::Row, 1, 200.0, 5);
        let mut vp = Viewport::new();
        vp.resize(800.0, 28.0 + 300.0);
        let (top, bottom) = vp.visible_rows(&layout);
        assert_eq!(top, 1);
        // 200 + 4 * 24 = 296, so row 6 is cut at the bottom
        assert_eq!(bottom, 6);
    }
}
