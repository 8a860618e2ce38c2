//! Rendering of the grid onto a drawing surface.
//!
//! This module provides:
//! - The backend-agnostic [`Surface`] trait and a recording [`DisplayList`]
//! - The grid painter with its ordered passes
//! - Header geometry shared with a DOM header layer
//! - Selection and fill-handle geometry, also used for hit-testing
//! - Canvas 2D surface (wasm32 only)
//! - Color parsing utilities and the reference palette

pub mod backend;
#[cfg(target_arch = "wasm32")]
pub mod canvas2d;
pub mod colors;
pub mod grid;
pub mod headers;
pub mod selection;

// Re-export commonly used types
pub use backend::{DisplayList, DrawOp, Rect, Surface, TextAlign};
#[cfg(target_arch = "wasm32")]
pub use canvas2d::CanvasSurface;
pub use colors::{parse_color, reference_color, CssColor};
pub use grid::{editor_rect, Frame, GridRenderer, ResizeGuide};
pub use headers::{header_boxes, HeaderBox, HeaderKind};
pub use selection::{area_bounds, area_rects, fill_handle_rect, hits_fill_handle, SelectionRect};
