//! Browser tests for the wasm binding. Run with `wasm-pack test --headless --chrome`.
#![cfg(target_arch = "wasm32")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::HtmlCanvasElement;
use xlgrid::XlGrid;

wasm_bindgen_test_configure!(run_in_browser);

/// A model object with a selection on A1 that records intent names.
fn model() -> JsValue {
    js_sys::Function::new_no_args(
        "return {
            calls: [],
            getSelectedView() { return { sheet: 0, row: 1, column: 1, range: [1, 1, 1, 1] }; },
            getWorksheetsProperties() { return [{ name: 'Sheet1' }]; },
            getCellContent() { return ''; },
            getFormattedCellValue() { return ''; },
            setSelectedCell(row, column) { this.calls.push('setSelectedCell'); },
            setUserInput() { throw new Error('read only'); },
        };",
    )
    .call0(&JsValue::NULL)
    .unwrap()
}

fn canvas() -> HtmlCanvasElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let canvas: HtmlCanvasElement = document.create_element("canvas").unwrap().dyn_into().unwrap();
    canvas.set_width(800);
    canvas.set_height(600);
    document.body().unwrap().append_child(&canvas).unwrap();
    canvas
}

#[wasm_bindgen_test]
fn grid_renders_over_a_js_model() {
    let mut grid = XlGrid::new(model(), canvas(), None, JsValue::UNDEFINED).unwrap();
    grid.resize(800.0, 600.0, 1.0);
    grid.render();
    assert!(!grid.is_editing());
    assert_eq!(grid.editing_text(), "");
}

#[wasm_bindgen_test]
fn host_sizes_feed_the_content_size() {
    let mut grid = XlGrid::new(model(), canvas(), None, JsValue::UNDEFINED).unwrap();
    let before = grid.content_size();
    grid.set_column_width(1, 150);
    grid.set_row_hidden(2, true);
    let after = grid.content_size();
    assert_eq!(after[0], before[0] + 50.0);
    assert_eq!(after[1], before[1] - 24.0);
}

#[wasm_bindgen_test]
fn config_overrides_are_read_from_js() {
    let config = js_sys::JSON::parse(r#"{"default_column_width": 80}"#).unwrap();
    let grid = XlGrid::new(model(), canvas(), None, config).unwrap();
    let default = XlGrid::new(model(), canvas(), None, JsValue::UNDEFINED).unwrap();
    let columns = f64::from(xlgrid::config::LAST_COLUMN);
    assert_eq!(default.content_size()[0] - grid.content_size()[0], 20.0 * columns);
}

#[wasm_bindgen_test]
fn highlight_formula_returns_json() {
    let json = xlgrid::highlight_formula("=A1+Sheet1!B2", 0, vec!["Sheet1".to_string()]).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["activeRanges"].as_array().unwrap().len(), 2);
}
