//! Common test utilities: an in-memory calculation engine that records every
//! intent it receives, and helpers to aim pointer events at cells.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::collections::{BTreeMap, HashMap};

use xlgrid::types::{Area, CellBlock, CellStyle, SelectedView, SheetArea};
use xlgrid::{CalcEngine, GridConfig, GridView, PointerEvent, Result, XlgridError};

// ============================================================================
// Recording engine
// ============================================================================

/// An intent the grid sent to the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SetSelectedCell(u32, u32),
    OnAreaSelecting(u32, u32),
    SetSelectedRange(u32, u32, u32, u32),
    SetSelectedSheet(u32),
    SetUserInput(u32, u32, u32, String),
    RangeClearContents(SheetArea),
    SetColumnWidth(u32, u32, u32),
    SetRowHeight(u32, u32, u32),
    SetTopLeftVisibleCell(u32, u32),
    UpdateRangeStyle(CellBlock, String, String),
    AutoFillRows(CellBlock, u32),
    AutoFillColumns(CellBlock, u32),
    PasteStyles(usize, usize),
}

/// A workbook with just enough behavior for the grid: selection follows the
/// selection intents, content is stored verbatim and styles are looked up
/// per cell.
#[derive(Debug, Clone)]
pub struct MockEngine {
    pub view: SelectedView,
    pub sheets: Vec<String>,
    /// `(sheet, row, column)` to content
    pub cells: BTreeMap<(u32, u32, u32), String>,
    pub styles: HashMap<(u32, u32, u32), CellStyle>,
    pub calls: Vec<Call>,
    /// `setUserInput` fails while set
    pub reject_input: bool,
    pub scroll: (f64, f64),
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEngine {
    pub fn new() -> Self {
        Self {
            view: SelectedView::single(0, 1, 1),
            sheets: vec!["Sheet1".to_string(), "Sheet2".to_string()],
            cells: BTreeMap::new(),
            styles: HashMap::new(),
            calls: Vec::new(),
            reject_input: false,
            scroll: (0.0, 0.0),
        }
    }

    pub fn with_cell(mut self, row: u32, column: u32, content: &str) -> Self {
        self.cells.insert((0, row, column), content.to_string());
        self
    }

    pub fn select(&mut self, row: u32, column: u32) {
        self.view = SelectedView::single(self.view.sheet, row, column);
    }

    pub fn select_range(&mut self, row_start: u32, column_start: u32, row_end: u32, column_end: u32) {
        self.view.row = row_start;
        self.view.column = column_start;
        self.view.range = Area::new(row_start, column_start, row_end, column_end);
    }

    pub fn content(&self, row: u32, column: u32) -> Option<&str> {
        self.cells.get(&(self.view.sheet, row, column)).map(String::as_str)
    }

    pub fn autofill_calls(&self) -> Vec<&Call> {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::AutoFillRows(..) | Call::AutoFillColumns(..)))
            .collect()
    }

    pub fn input_calls(&self) -> Vec<&Call> {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::SetUserInput(..)))
            .collect()
    }
}

impl CalcEngine for MockEngine {
    fn selected_view(&self) -> SelectedView {
        self.view
    }

    fn set_selected_cell(&mut self, row: u32, column: u32) -> Result<()> {
        self.calls.push(Call::SetSelectedCell(row, column));
        self.select(row, column);
        Ok(())
    }

    fn on_area_selecting(&mut self, row: u32, column: u32) -> Result<()> {
        self.calls.push(Call::OnAreaSelecting(row, column));
        self.view.range = Area::new(self.view.row, self.view.column, row, column);
        Ok(())
    }

    fn set_selected_range(&mut self, row_start: u32, column_start: u32, row_end: u32, column_end: u32) -> Result<()> {
        self.calls
            .push(Call::SetSelectedRange(row_start, column_start, row_end, column_end));
        self.view.range = Area::new(row_start, column_start, row_end, column_end);
        Ok(())
    }

    fn set_selected_sheet(&mut self, sheet: u32) -> Result<()> {
        self.calls.push(Call::SetSelectedSheet(sheet));
        if usize::try_from(sheet).map_or(true, |s| s >= self.sheets.len()) {
            return Err(XlgridError::Engine(format!("no sheet {sheet}")));
        }
        if sheet != self.view.sheet {
            self.view = SelectedView::single(sheet, 1, 1);
        }
        Ok(())
    }

    fn sheet_names(&self) -> Vec<String> {
        self.sheets.clone()
    }

    fn cell_content(&self, sheet: u32, row: u32, column: u32) -> String {
        self.cells.get(&(sheet, row, column)).cloned().unwrap_or_default()
    }

    fn formatted_cell_value(&self, sheet: u32, row: u32, column: u32) -> String {
        self.cell_content(sheet, row, column)
    }

    fn is_number(&self, sheet: u32, row: u32, column: u32) -> bool {
        self.cell_content(sheet, row, column).parse::<f64>().is_ok()
    }

    fn set_user_input(&mut self, sheet: u32, row: u32, column: u32, text: &str) -> Result<()> {
        self.calls
            .push(Call::SetUserInput(sheet, row, column, text.to_string()));
        if self.reject_input {
            return Err(XlgridError::Engine("invalid formula".to_string()));
        }
        if text.is_empty() {
            self.cells.remove(&(sheet, row, column));
        } else {
            self.cells.insert((sheet, row, column), text.to_string());
        }
        Ok(())
    }

    fn range_clear_contents(&mut self, range: &SheetArea) -> Result<()> {
        self.calls.push(Call::RangeClearContents(*range));
        let (r1, c1, r2, c2) = range.area.bounds();
        self.cells
            .retain(|&(s, r, c), _| !(s == range.sheet && (r1..=r2).contains(&r) && (c1..=c2).contains(&c)));
        Ok(())
    }

    fn rows_with_data(&self, sheet: u32, column: u32) -> Vec<u32> {
        self.cells
            .keys()
            .filter(|&&(s, _, c)| s == sheet && c == column)
            .map(|&(_, r, _)| r)
            .collect()
    }

    fn columns_with_data(&self, sheet: u32, row: u32) -> Vec<u32> {
        self.cells
            .keys()
            .filter(|&&(s, r, _)| s == sheet && r == row)
            .map(|&(_, _, c)| c)
            .collect()
    }

    fn set_column_width(&mut self, sheet: u32, column: u32, width: u32) -> Result<()> {
        self.calls.push(Call::SetColumnWidth(sheet, column, width));
        Ok(())
    }

    fn set_row_height(&mut self, sheet: u32, row: u32, height: u32) -> Result<()> {
        self.calls.push(Call::SetRowHeight(sheet, row, height));
        Ok(())
    }

    fn scroll_x(&self) -> f64 {
        self.scroll.0
    }

    fn scroll_y(&self) -> f64 {
        self.scroll.1
    }

    fn set_top_left_visible_cell(&mut self, row: u32, column: u32) -> Result<()> {
        self.calls.push(Call::SetTopLeftVisibleCell(row, column));
        Ok(())
    }

    fn cell_style(&self, sheet: u32, row: u32, column: u32) -> CellStyle {
        self.styles.get(&(sheet, row, column)).cloned().unwrap_or_default()
    }

    fn update_range_style(&mut self, range: &CellBlock, path: &str, value: &str) -> Result<()> {
        self.calls
            .push(Call::UpdateRangeStyle(*range, path.to_string(), value.to_string()));
        if path == "font.b" {
            for row in range.row..range.row + range.height {
                for column in range.column..range.column + range.width {
                    self.styles.entry((range.sheet, row, column)).or_default().bold = value == "true";
                }
            }
        }
        Ok(())
    }

    fn auto_fill_rows(&mut self, source: &CellBlock, to_row: u32) -> Result<()> {
        self.calls.push(Call::AutoFillRows(*source, to_row));
        Ok(())
    }

    fn auto_fill_columns(&mut self, source: &CellBlock, to_column: u32) -> Result<()> {
        self.calls.push(Call::AutoFillColumns(*source, to_column));
        Ok(())
    }

    fn on_paste_styles(&mut self, styles: &[Vec<CellStyle>]) -> Result<()> {
        let columns = styles.first().map_or(0, Vec::len);
        self.calls.push(Call::PasteStyles(styles.len(), columns));
        Ok(())
    }
}

// ============================================================================
// View helpers
// ============================================================================

pub fn grid(engine: MockEngine) -> GridView<MockEngine> {
    GridView::new(engine, GridConfig::default())
}

/// Screen point in the middle of a cell.
pub fn center(view: &GridView<MockEngine>, row: u32, column: u32) -> (f64, f64) {
    let layout = view.layout();
    let viewport = view.viewport();
    (
        viewport.column_start_x(column, layout) + layout.column_width(column) / 2.0,
        viewport.row_start_y(row, layout) + layout.row_height(row) / 2.0,
    )
}

pub fn at(view: &GridView<MockEngine>, row: u32, column: u32) -> PointerEvent {
    let (x, y) = center(view, row, column);
    PointerEvent::mouse(x, y)
}

/// Press on one cell, drag through `path` and release on its last cell.
pub fn drag(view: &mut GridView<MockEngine>, from: (u32, u32), path: &[(u32, u32)]) {
    let down = at(view, from.0, from.1);
    view.on_pointer_down(&down).unwrap();
    let mut last = down;
    for &(row, column) in path {
        last = at(view, row, column);
        view.on_pointer_move(&last).unwrap();
    }
    view.on_pointer_up(&last).unwrap();
}
