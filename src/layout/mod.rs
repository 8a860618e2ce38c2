//! Geometry model: row/column size tables, frozen panes and the viewport.
//!
//! This module handles:
//! - Sparse size tables with cached cumulative offsets
//! - Frozen pane boundaries and the separator band
//! - Binary search for the cell at a screen coordinate
//! - Scroll state, visible range and scroll-into-view

mod sheet_layout;
mod viewport;

pub use sheet_layout::{Axis, SheetLayout, SizeTable};
pub use viewport::Viewport;
