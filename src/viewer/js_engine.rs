//! [`CalcEngine`] over a JavaScript model object.
//!
//! Methods are looked up by their camelCase names on every call, so any
//! object with the right shape works. Styles cross the boundary in the
//! grid's own `CellStyle` shape; the host adapts its model if needed.
//! Reads fall back to empty values when the model throws; intents report the
//! exception unmodified as [`XlgridError::Engine`].

use js_sys::{Array, Function, Reflect};
use serde::Deserialize;
use wasm_bindgen::{JsCast, JsValue};

use crate::engine::CalcEngine;
use crate::error::{js_message, Result, XlgridError};
use crate::types::{Area, CellBlock, CellStyle, SelectedView, SheetArea};

/// IronCalc-style `getCellType` code for numbers.
const CELL_TYPE_NUMBER: i32 = 1;

pub struct JsEngine {
    model: JsValue,
}

#[derive(Deserialize)]
struct JsSelectedView {
    sheet: u32,
    row: u32,
    column: u32,
    range: [u32; 4],
}

#[derive(Deserialize)]
struct JsSheetProperties {
    name: String,
}

impl JsEngine {
    pub fn new(model: JsValue) -> Self {
        Self { model }
    }

    fn call(&self, name: &str, args: &[JsValue]) -> std::result::Result<JsValue, JsValue> {
        let method = Reflect::get(&self.model, &JsValue::from_str(name))?.dyn_into::<Function>()?;
        let args: Array = args.iter().collect();
        method.apply(&self.model, &args)
    }

    fn intent(&mut self, name: &str, args: &[JsValue]) -> Result<()> {
        self.call(name, args).map(|_| ()).map_err(|e| {
            let message = js_message(&e);
            tracing::debug!(method = name, %message, "engine rejected intent");
            XlgridError::Engine(message)
        })
    }

    fn read<T: for<'de> Deserialize<'de>>(&self, name: &str, args: &[JsValue]) -> Option<T> {
        let value = self.call(name, args).ok()?;
        serde_wasm_bindgen::from_value(value).ok()
    }

    fn to_js<T: serde::Serialize>(value: &T) -> JsValue {
        serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
    }
}

fn n(value: u32) -> JsValue {
    JsValue::from(value)
}

impl CalcEngine for JsEngine {
    fn selected_view(&self) -> SelectedView {
        match self.read::<JsSelectedView>("getSelectedView", &[]) {
            Some(v) => {
                let [r1, c1, r2, c2] = v.range;
                SelectedView {
                    sheet: v.sheet,
                    row: v.row,
                    column: v.column,
                    range: Area::new(r1, c1, r2, c2),
                }
            }
            None => SelectedView::single(0, 1, 1),
        }
    }

    fn set_selected_cell(&mut self, row: u32, column: u32) -> Result<()> {
        self.intent("setSelectedCell", &[n(row), n(column)])
    }

    fn on_area_selecting(&mut self, row: u32, column: u32) -> Result<()> {
        self.intent("onAreaSelecting", &[n(row), n(column)])
    }

    fn set_selected_range(&mut self, row_start: u32, column_start: u32, row_end: u32, column_end: u32) -> Result<()> {
        self.intent(
            "setSelectedRange",
            &[n(row_start), n(column_start), n(row_end), n(column_end)],
        )
    }

    fn set_selected_sheet(&mut self, sheet: u32) -> Result<()> {
        self.intent("setSelectedSheet", &[n(sheet)])
    }

    fn sheet_names(&self) -> Vec<String> {
        self.read::<Vec<JsSheetProperties>>("getWorksheetsProperties", &[])
            .map(|sheets| sheets.into_iter().map(|s| s.name).collect())
            .unwrap_or_default()
    }

    fn cell_content(&self, sheet: u32, row: u32, column: u32) -> String {
        self.read("getCellContent", &[n(sheet), n(row), n(column)])
            .unwrap_or_default()
    }

    fn formatted_cell_value(&self, sheet: u32, row: u32, column: u32) -> String {
        self.read("getFormattedCellValue", &[n(sheet), n(row), n(column)])
            .unwrap_or_default()
    }

    fn is_number(&self, sheet: u32, row: u32, column: u32) -> bool {
        self.read::<i32>("getCellType", &[n(sheet), n(row), n(column)]) == Some(CELL_TYPE_NUMBER)
    }

    fn set_user_input(&mut self, sheet: u32, row: u32, column: u32, text: &str) -> Result<()> {
        self.intent(
            "setUserInput",
            &[n(sheet), n(row), n(column), JsValue::from_str(text)],
        )
    }

    fn range_clear_contents(&mut self, range: &SheetArea) -> Result<()> {
        let (r1, c1, r2, c2) = range.area.bounds();
        self.intent(
            "rangeClearContents",
            &[n(range.sheet), n(r1), n(c1), n(r2), n(c2)],
        )
    }

    fn rows_with_data(&self, sheet: u32, column: u32) -> Vec<u32> {
        let mut rows: Vec<u32> = self
            .read("getRowsWithData", &[n(sheet), n(column)])
            .unwrap_or_default();
        rows.sort_unstable();
        rows
    }

    fn columns_with_data(&self, sheet: u32, row: u32) -> Vec<u32> {
        let mut columns: Vec<u32> = self
            .read("getColumnsWithData", &[n(sheet), n(row)])
            .unwrap_or_default();
        columns.sort_unstable();
        columns
    }

    fn set_column_width(&mut self, sheet: u32, column: u32, width: u32) -> Result<()> {
        self.intent("setColumnsWidth", &[n(sheet), n(column), n(column), n(width)])
    }

    fn set_row_height(&mut self, sheet: u32, row: u32, height: u32) -> Result<()> {
        self.intent("setRowsHeight", &[n(sheet), n(row), n(row), n(height)])
    }

    fn scroll_x(&self) -> f64 {
        self.read("getScrollX", &[]).unwrap_or(0.0)
    }

    fn scroll_y(&self) -> f64 {
        self.read("getScrollY", &[]).unwrap_or(0.0)
    }

    fn set_top_left_visible_cell(&mut self, row: u32, column: u32) -> Result<()> {
        self.intent("setTopLeftVisibleCell", &[n(row), n(column)])
    }

    fn cell_style(&self, sheet: u32, row: u32, column: u32) -> CellStyle {
        self.read("getCellStyle", &[n(sheet), n(row), n(column)])
            .unwrap_or_default()
    }

    fn update_range_style(&mut self, range: &CellBlock, path: &str, value: &str) -> Result<()> {
        let range = Self::to_js(range);
        self.intent(
            "updateRangeStyle",
            &[range, JsValue::from_str(path), JsValue::from_str(value)],
        )
    }

    fn auto_fill_rows(&mut self, source: &CellBlock, to_row: u32) -> Result<()> {
        let source = Self::to_js(source);
        self.intent("autoFillRows", &[source, n(to_row)])
    }

    fn auto_fill_columns(&mut self, source: &CellBlock, to_column: u32) -> Result<()> {
        let source = Self::to_js(source);
        self.intent("autoFillColumns", &[source, n(to_column)])
    }

    fn on_paste_styles(&mut self, styles: &[Vec<CellStyle>]) -> Result<()> {
        let styles = Self::to_js(&styles);
        self.intent("onPasteStyles", &[styles])
    }
}
