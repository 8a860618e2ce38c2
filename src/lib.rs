//! xlgrid - spreadsheet grid for the web
//!
//! Renders a spreadsheet grid on a Canvas 2D surface and turns pointer and
//! keyboard input into intents on a calculation engine:
//! - Frozen panes, hidden rows and columns, sparse sizes over a million rows
//! - Selection, fill handle drags, header resizing and autofit
//! - In-cell and formula bar editing with colored formula references
//! - Reference insertion by clicking or dragging while typing a formula
//!
//! The engine owns the workbook; the grid owns only geometry and UI state.
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { XlGrid } from 'xlgrid';
//! await init();
//! const grid = new XlGrid(model, canvas, container);
//! grid.setRenderCallback(() => requestAnimationFrame(() => grid.render()));
//! ```
//!
//! # Usage (Rust)
//!
//! Any [`CalcEngine`] drives a [`GridView`]; paint into a [`DisplayList`]
//! off the browser.

pub mod cell_ref;
pub mod config;
pub mod editor;
pub mod engine;
pub mod error;
pub mod formula;
pub mod layout;
pub mod pointer;
pub mod render;
pub mod state;
pub mod types;
pub mod viewer;

use wasm_bindgen::prelude::*;

pub use config::{GridColors, GridConfig};
pub use editor::{KeyEvent, KeyOutcome, TextBuffer, TextInput};
pub use engine::CalcEngine;
pub use error::{Result, XlgridError};
pub use layout::{Axis, SheetLayout, Viewport};
pub use pointer::{Gesture, PointerEngine, PointerEvent, PointerType};
pub use render::{DisplayList, Surface};
pub use state::WorkbookState;
pub use viewer::GridView;
#[cfg(target_arch = "wasm32")]
pub use viewer::wasm::XlGrid;

/// Tokenize a formula and color its references, as JSON.
///
/// # Errors
/// Returns an error if the result cannot be serialized.
#[wasm_bindgen(js_name = "highlightFormula")]
pub fn highlight_formula(text: &str, sheet: u32, sheet_names: Vec<String>) -> std::result::Result<String, JsValue> {
    let highlight = formula::highlight(text, sheet, &sheet_names);
    serde_json::to_string(&highlight).map_err(|e| JsValue::from_str(&format!("JSON serialization error: {e}")))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
