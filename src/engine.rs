//! The calculation engine the grid talks to.
//!
//! The engine owns selection, cell content and styles. The grid only reads
//! from it while painting and sends it intents in response to input. Intents
//! return the engine's verdict unchanged; the grid never retries or swallows
//! a rejection.

use crate::error::Result;
use crate::types::{CellBlock, CellStyle, SelectedView, SheetArea};

pub trait CalcEngine {
    // Selection
    fn selected_view(&self) -> SelectedView;
    fn set_selected_cell(&mut self, row: u32, column: u32) -> Result<()>;
    /// Moves the opposite corner of the selected range, keeping the anchor.
    fn on_area_selecting(&mut self, row: u32, column: u32) -> Result<()>;
    fn set_selected_range(
        &mut self,
        row_start: u32,
        column_start: u32,
        row_end: u32,
        column_end: u32,
    ) -> Result<()>;
    fn set_selected_sheet(&mut self, sheet: u32) -> Result<()>;
    fn sheet_names(&self) -> Vec<String>;

    // Content
    /// Raw content as typed, e.g. `=A1+1`.
    fn cell_content(&self, sheet: u32, row: u32, column: u32) -> String;
    /// Display text after number formatting.
    fn formatted_cell_value(&self, sheet: u32, row: u32, column: u32) -> String;
    /// Whether the value is numeric, which right-aligns it under general alignment.
    fn is_number(&self, sheet: u32, row: u32, column: u32) -> bool;
    fn set_user_input(&mut self, sheet: u32, row: u32, column: u32, text: &str) -> Result<()>;
    fn range_clear_contents(&mut self, range: &SheetArea) -> Result<()>;
    /// Rows in `column` holding a value, ascending.
    fn rows_with_data(&self, sheet: u32, column: u32) -> Vec<u32>;
    /// Columns in `row` holding a value, ascending.
    fn columns_with_data(&self, sheet: u32, row: u32) -> Vec<u32>;

    // Geometry persistence
    fn set_column_width(&mut self, sheet: u32, column: u32, width: u32) -> Result<()>;
    fn set_row_height(&mut self, sheet: u32, row: u32, height: u32) -> Result<()>;
    fn scroll_x(&self) -> f64;
    fn scroll_y(&self) -> f64;
    fn set_top_left_visible_cell(&mut self, row: u32, column: u32) -> Result<()>;

    // Styling
    fn cell_style(&self, sheet: u32, row: u32, column: u32) -> CellStyle;
    fn update_range_style(&mut self, range: &CellBlock, path: &str, value: &str) -> Result<()>;

    // Structural
    fn auto_fill_rows(&mut self, source: &CellBlock, to_row: u32) -> Result<()>;
    fn auto_fill_columns(&mut self, source: &CellBlock, to_column: u32) -> Result<()>;
    fn on_paste_styles(&mut self, styles: &[Vec<CellStyle>]) -> Result<()>;
}
