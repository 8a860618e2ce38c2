//! Sizes that fit a column's or row's content, for double-clicks on a
//! header edge.

use crate::config::GridConfig;
use crate::editor::view::LINE_HEIGHT;
use crate::engine::CalcEngine;
use crate::render::Surface;

/// Room around the text so it sits the same under every alignment.
const FIT_PADDING: f64 = 8.0;

/// Widest line of text in `column`, plus padding. `None` for an empty column.
pub fn column_fit_width<E, S>(engine: &E, surface: &mut S, config: &GridConfig, sheet: u32, column: u32) -> Option<f64>
where
    E: CalcEngine + ?Sized,
    S: Surface + ?Sized,
{
    let mut width: f64 = 0.0;
    for row in engine.rows_with_data(sheet, column) {
        let text = engine.formatted_cell_value(sheet, row, column);
        if text.is_empty() {
            continue;
        }
        let style = engine.cell_style(sheet, row, column);
        let font = config.cell_font(style.font_size.unwrap_or(config.font_size), style.bold, style.italic);
        for line in text.split('\n') {
            width = width.max(surface.measure_text(line, &font));
        }
    }
    (width > 0.0).then_some(width + FIT_PADDING)
}

/// Height of the tallest cell in `row`, counting explicit line breaks.
pub fn row_fit_height<E>(engine: &E, config: &GridConfig, sheet: u32, row: u32) -> Option<f64>
where
    E: CalcEngine + ?Sized,
{
    let mut height: f64 = 0.0;
    for column in engine.columns_with_data(sheet, row) {
        let text = engine.formatted_cell_value(sheet, row, column);
        if text.is_empty() {
            continue;
        }
        let font_size = engine
            .cell_style(sheet, row, column)
            .font_size
            .unwrap_or(config.font_size);
        #[allow(clippy::cast_precision_loss)]
        let lines = text.split('\n').count() as f64;
        height = height.max(lines * LINE_HEIGHT * font_size);
    }
    (height > 0.0).then_some(height + FIT_PADDING)
}
