//! Row and column headers.
//!
//! Header geometry is computed once as a list of [`HeaderBox`]es: the canvas
//! paints them, and a DOM header layer can position its own elements from the
//! same list so both stay in pixel sync with scroll.
//!
//! - Column headers: A, B, C, ... Z, AA, AB, ...
//! - Row headers: 1, 2, 3, ...
//! - Selected rows/columns get a tinted background and an accent line
//! - Frozen headers never scroll

use serde::Serialize;

use super::backend::{crisp, Rect, Surface, TextAlign};
use crate::cell_ref::column_name;
use crate::config::GridConfig;
use crate::layout::{SheetLayout, Viewport};
use crate::types::{Area, SelectionType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "index", rename_all = "camelCase")]
pub enum HeaderKind {
    Corner,
    Column(u32),
    Row(u32),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderBox {
    pub kind: HeaderKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub label: String,
    /// The column (row) intersects the selection
    pub selected: bool,
    /// The whole column (row) is selected
    pub fully_selected: bool,
}

impl HeaderBox {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

fn frozen_and_visible(frozen: u32, visible: (u32, u32)) -> impl Iterator<Item = u32> {
    (1..=frozen).chain(visible.0.max(frozen + 1)..=visible.1)
}

/// Header boxes for everything on screen: the corner, then column headers,
/// then row headers. Hidden rows and columns get no box.
pub fn header_boxes(
    layout: &SheetLayout,
    viewport: &Viewport,
    config: &GridConfig,
    selection: &Area,
) -> Vec<HeaderBox> {
    let (r1, c1, r2, c2) = selection.bounds();
    let selection_type = SelectionType::of(selection, config.last_row, config.last_column);
    let mut boxes = vec![HeaderBox {
        kind: HeaderKind::Corner,
        x: 0.0,
        y: 0.0,
        width: layout.header_width,
        height: layout.header_height,
        label: String::new(),
        selected: selection_type == SelectionType::All,
        fully_selected: selection_type == SelectionType::All,
    }];

    let scroll_left = viewport.scroll_origin_x(layout);
    for column in frozen_and_visible(layout.frozen_columns, viewport.visible_columns(layout)) {
        let width = layout.column_width(column);
        if width <= 0.0 {
            continue;
        }
        let mut x = viewport.column_start_x(column, layout);
        let mut w = width;
        // clip scrollable headers at the frozen edge
        if column > layout.frozen_columns && x < scroll_left {
            w -= scroll_left - x;
            x = scroll_left;
        }
        if w <= 0.0 || x >= viewport.width {
            continue;
        }
        boxes.push(HeaderBox {
            kind: HeaderKind::Column(column),
            x,
            y: 0.0,
            width: w,
            height: layout.header_height,
            label: column_name(column),
            selected: (c1..=c2).contains(&column),
            fully_selected: (c1..=c2).contains(&column)
                && matches!(selection_type, SelectionType::ColumnRange | SelectionType::All),
        });
    }

    let scroll_top = viewport.scroll_origin_y(layout);
    for row in frozen_and_visible(layout.frozen_rows, viewport.visible_rows(layout)) {
        let height = layout.row_height(row);
        if height <= 0.0 {
            continue;
        }
        let mut y = viewport.row_start_y(row, layout);
        let mut h = height;
        if row > layout.frozen_rows && y < scroll_top {
            h -= scroll_top - y;
            y = scroll_top;
        }
        if h <= 0.0 || y >= viewport.height {
            continue;
        }
        boxes.push(HeaderBox {
            kind: HeaderKind::Row(row),
            x: 0.0,
            y,
            width: layout.header_width,
            height: h,
            label: row.to_string(),
            selected: (r1..=r2).contains(&row),
            fully_selected: (r1..=r2).contains(&row)
                && matches!(selection_type, SelectionType::RowRange | SelectionType::All),
        });
    }
    boxes
}

/// Paint header boxes.
pub fn render_headers<S: Surface + ?Sized>(surface: &mut S, boxes: &[HeaderBox], config: &GridConfig) {
    let colors = &config.colors;
    let font = config.header_font();

    for header in boxes {
        let rect = header.rect();
        let background = if header.selected {
            &colors.header_selected_background
        } else {
            &colors.header_background
        };
        surface.fill_rect(rect, background);

        // trailing separators
        surface.line(
            crisp(rect.right() - 1.0),
            rect.y,
            crisp(rect.right() - 1.0),
            rect.bottom(),
            &colors.header_border,
            1.0,
            &[],
        );
        surface.line(
            rect.x,
            crisp(rect.bottom() - 1.0),
            rect.right(),
            crisp(rect.bottom() - 1.0),
            &colors.header_border,
            1.0,
            &[],
        );

        if header.selected {
            // accent on the edge facing the grid
            match header.kind {
                HeaderKind::Column(_) => surface.line(
                    rect.x,
                    crisp(rect.bottom() - 1.0),
                    rect.right(),
                    crisp(rect.bottom() - 1.0),
                    &colors.outline,
                    1.0,
                    &[],
                ),
                HeaderKind::Row(_) => surface.line(
                    crisp(rect.right() - 1.0),
                    rect.y,
                    crisp(rect.right() - 1.0),
                    rect.bottom(),
                    &colors.outline,
                    1.0,
                    &[],
                ),
                HeaderKind::Corner => {}
            }
        }

        // narrow headers skip the label
        if header.label.is_empty() || header.width < 12.0 || header.height < 8.0 {
            continue;
        }
        let text_color = if header.selected {
            &colors.header_selected_text
        } else {
            &colors.header_text
        };
        surface.save();
        surface.clip_rect(rect);
        surface.fill_text(
            &header.label,
            rect.x + rect.w / 2.0,
            rect.y + rect.h / 2.0,
            &font,
            text_color,
            TextAlign::Center,
        );
        surface.restore();
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
    use crate::config::LAST_ROW;

    fn boxes(selection: Area) -> Vec<HeaderBox> {
        let config = GridConfig::default();
        let layout = SheetLayout::new(&config);
        let mut viewport = Viewport::new();
        viewport.resize(430.0, 124.0);
        header_boxes(&layout, &viewport, &config, &selection)
    }

    #[test]
    fn labels_follow_visible_range() {
        let all = boxes(Area::cell(1, 1));
        let labels: Vec<&str> = all.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["", "A", "B", "C", "D", "1", "2", "3", "4"]);
    }

    #[test]
    fn column_selection_marks_headers() {
        let all = boxes(Area::new(1, 2, LAST_ROW, 3));
        let b = all.iter().find(|b| b.kind == HeaderKind::Column(2)).unwrap();
        assert!(b.selected && b.fully_selected);
        let row = all.iter().find(|b| b.kind == HeaderKind::Row(1)).unwrap();
        assert!(row.selected);
        assert!(!row.fully_selected);
    }
}
