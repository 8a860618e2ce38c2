//! `GridView` - the grid with its input handling, independent of the browser.
//!
//! The view owns the geometry, the viewport, the UI state and the pointer
//! gesture, and borrows them out to the renderer, the pointer engine and the
//! editor per event. Every handler asks for a repaint through the render
//! callback once it has run, whether the engine accepted the intent or not.
//!
//! The wasm binding in [`wasm`] wraps this with DOM events, a canvas and a
//! `<textarea>`.

mod autofit;
#[cfg(target_arch = "wasm32")]
mod events;
#[cfg(target_arch = "wasm32")]
pub mod js_engine;
#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use autofit::{column_fit_width, row_fit_height};

use crate::config::GridConfig;
use crate::editor::view::fit_editor_box;
use crate::editor::{self, KeyContext, KeyEvent, KeyOutcome, TextInput};
use crate::engine::CalcEngine;
use crate::error::Result;
use crate::layout::{Axis, SheetLayout, Viewport};
use crate::pointer::{resize_target, PointerContext, PointerEngine, PointerEvent};
use crate::render::{editor_rect, header_boxes, hits_fill_handle, Frame, GridRenderer, HeaderBox, Rect, Surface};
use crate::state::WorkbookState;
use crate::types::{CellStyle, EditorMode, Focus};

/// Copying styles of a larger range is refused.
const COPY_STYLES_MAX_CELLS: u64 = 100_000;

pub type RenderCallback = Box<dyn FnMut()>;

pub struct GridView<E> {
    engine: E,
    state: WorkbookState,
    layout: SheetLayout,
    viewport: Viewport,
    pointer: PointerEngine,
    renderer: GridRenderer,
    render_callback: Option<RenderCallback>,
}

impl<E: CalcEngine> GridView<E> {
    pub fn new(engine: E, config: GridConfig) -> Self {
        let mut view = GridView {
            engine,
            state: WorkbookState::new(),
            layout: SheetLayout::new(&config),
            viewport: Viewport::new(),
            pointer: PointerEngine::new(),
            renderer: GridRenderer::new(config),
            render_callback: None,
        };
        view.load_scroll();
        view
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn state(&self) -> &WorkbookState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut WorkbookState {
        &mut self.state
    }

    /// Geometry of the selected sheet. The host keeps it in step with the
    /// engine's column widths, row heights and frozen panes.
    pub fn layout(&self) -> &SheetLayout {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut SheetLayout {
        &mut self.layout
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn pointer(&self) -> &PointerEngine {
        &self.pointer
    }

    pub fn config(&self) -> &GridConfig {
        self.renderer.config()
    }

    /// Applies a geometry change from the host (sizes, hidden bands, frozen
    /// panes) and repaints.
    pub fn update_layout<F: FnOnce(&mut SheetLayout)>(&mut self, f: F) {
        f(&mut self.layout);
        self.viewport.clamp_scroll(&self.layout);
        self.request_render();
    }

    pub fn set_render_callback(&mut self, callback: Option<RenderCallback>) {
        self.render_callback = callback;
    }

    fn request_render(&mut self) {
        if let Some(callback) = self.render_callback.as_mut() {
            callback();
        }
    }

    /// Takes over the scroll offset the engine remembers for the sheet.
    pub fn load_scroll(&mut self) {
        let (x, y) = (self.engine.scroll_x(), self.engine.scroll_y());
        self.viewport.set_scroll(x, y, &self.layout);
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport.resize(width, height);
        self.viewport.clamp_scroll(&self.layout);
        self.request_render();
    }

    /// Native scroll of the container, in pixels of the scrollable pane.
    pub fn on_scroll(&mut self, x: f64, y: f64) -> Result<()> {
        let before = self.viewport.top_left_cell(&self.layout);
        self.viewport.set_scroll(x, y, &self.layout);
        let (top, left) = self.viewport.top_left_cell(&self.layout);
        let result = if (top, left) == before {
            Ok(())
        } else {
            self.engine.set_top_left_visible_cell(top, left)
        };
        self.request_render();
        result
    }

    fn with_pointer<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut PointerEngine, &mut PointerContext<'_, E>) -> Result<()>,
    {
        let mut cx = PointerContext {
            engine: &mut self.engine,
            state: &mut self.state,
            layout: &mut self.layout,
            viewport: &self.viewport,
            config: self.renderer.config(),
        };
        let result = f(&mut self.pointer, &mut cx);
        self.request_render();
        result
    }

    pub fn on_pointer_down(&mut self, event: &PointerEvent) -> Result<()> {
        self.with_pointer(|pointer, cx| pointer.pointer_down(cx, event))
    }

    pub fn on_pointer_move(&mut self, event: &PointerEvent) -> Result<()> {
        if !self.pointer.is_capturing() {
            return Ok(());
        }
        self.with_pointer(|pointer, cx| pointer.pointer_move(cx, event))
    }

    pub fn on_pointer_up(&mut self, event: &PointerEvent) -> Result<()> {
        self.with_pointer(|pointer, cx| pointer.pointer_up(cx, event))
    }

    /// Pointer-down on a fill-handle element the host draws itself.
    pub fn on_fill_handle_pointer_down(&mut self, event: &PointerEvent) -> Result<()> {
        self.with_pointer(|pointer, cx| pointer.fill_handle_pointer_down(cx, event))
    }

    /// Double-click: autofit on a header edge, fill down on the fill handle,
    /// otherwise edit the selected cell.
    pub fn on_double_click<S: Surface + ?Sized>(
        &mut self,
        x: f64,
        y: f64,
        surface: &mut S,
        input: &mut dyn TextInput,
    ) -> Result<()> {
        let result = self.double_click(x, y, surface, input);
        self.request_render();
        result
    }

    fn double_click<S: Surface + ?Sized>(
        &mut self,
        x: f64,
        y: f64,
        surface: &mut S,
        input: &mut dyn TextInput,
    ) -> Result<()> {
        let config = self.renderer.config();
        if let Some((axis, index)) = resize_target(x, y, &self.layout, &self.viewport, config) {
            return self.autofit(axis, index, surface);
        }
        let view = self.engine.selected_view();
        if self.state.editing_cell().is_none()
            && hits_fill_handle(&view.range, &self.layout, &self.viewport, config, x, y)
        {
            return self.pointer.fill_handle_double_click(&mut self.engine, config);
        }
        if self.viewport.cell_at(x, y, &self.layout).is_none() {
            return Ok(());
        }
        if let Some(session) = self.state.editing_cell() {
            if session.is_at(view.sheet, view.row, view.column) {
                return Ok(());
            }
        }
        let text = self.engine.cell_content(view.sheet, view.row, view.column);
        editor::start_editing(&self.engine, &mut self.state, input, &self.layout, text, EditorMode::Edit);
        Ok(())
    }

    fn autofit<S: Surface + ?Sized>(&mut self, axis: Axis, index: u32, surface: &mut S) -> Result<()> {
        let config = self.renderer.config();
        let sheet = self.engine.selected_view().sheet;
        match axis {
            Axis::Column => {
                let Some(width) = column_fit_width(&self.engine, surface, config, sheet, index) else {
                    return Ok(());
                };
                let width = self
                    .layout
                    .resize(Axis::Column, index, width, config.min_column_width);
                tracing::debug!(column = index, width, "column autofit");
                self.engine.set_column_width(sheet, index, width)
            }
            Axis::Row => {
                let Some(height) = row_fit_height(&self.engine, config, sheet, index) else {
                    return Ok(());
                };
                let height = self.layout.resize(Axis::Row, index, height, config.min_row_height);
                tracing::debug!(row = index, height, "row autofit");
                self.engine.set_row_height(sheet, index, height)
            }
        }
    }

    /// Keydown on the grid or on the cell editor control.
    pub fn on_key_down(&mut self, event: &KeyEvent, input: &mut dyn TextInput) -> Result<KeyOutcome> {
        let mut cx = KeyContext {
            engine: &mut self.engine,
            state: &mut self.state,
            input,
            layout: &self.layout,
            viewport: &mut self.viewport,
            config: self.renderer.config(),
        };
        let result = editor::on_key_down(&mut cx, event);
        if !matches!(result, Ok(KeyOutcome::Ignored)) {
            self.request_render();
        }
        result
    }

    /// The control of `surface` applied a keystroke.
    pub fn sync_input(&mut self, input: &dyn TextInput, surface: Focus) {
        editor::sync(&self.engine, &mut self.state, input, surface);
        self.request_render();
    }

    pub fn on_blur(&mut self, input: &mut dyn TextInput, surface: Focus) -> Result<()> {
        let result = editor::blur(&mut self.engine, &mut self.state, input, surface);
        self.request_render();
        result
    }

    pub fn on_editor_pointer_down(&mut self, surface: Focus) {
        editor::pointer_down_in_editor(&mut self.state, surface);
    }

    /// The formula bar took focus. Without a session this starts editing
    /// the selected cell's content there.
    pub fn focus_formula_bar(&mut self, input: &mut dyn TextInput) {
        if self.state.editing_cell().is_none() {
            let view = self.engine.selected_view();
            let text = self.engine.cell_content(view.sheet, view.row, view.column);
            editor::start_editing(&self.engine, &mut self.state, input, &self.layout, text, EditorMode::Edit);
        }
        editor::focus_formula_bar(&mut self.state);
        self.request_render();
    }

    pub fn focus_cell_editor(&mut self) {
        editor::focus_cell_editor(&mut self.state);
        self.request_render();
    }

    /// Remembers the styles of the selected range; the next area selection
    /// pastes them.
    pub fn copy_styles(&mut self) {
        let view = self.engine.selected_view();
        let (r1, c1, r2, c2) = view.range.bounds();
        let cells = u64::from(r2 - r1 + 1) * u64::from(c2 - c1 + 1);
        if cells > COPY_STYLES_MAX_CELLS {
            tracing::warn!(cells, "range too large to copy styles from");
            return;
        }
        let styles: Vec<Vec<CellStyle>> = (r1..=r2)
            .map(|row| {
                (c1..=c2)
                    .map(|column| self.engine.cell_style(view.sheet, row, column))
                    .collect()
            })
            .collect();
        tracing::debug!(rows = styles.len(), "styles copied");
        self.state.set_copy_styles(Some(styles));
        self.request_render();
    }

    /// Screen rectangle for the editor control, `None` when not editing or
    /// when the edited cell is on another sheet.
    pub fn editor_rect(&self) -> Option<Rect> {
        let session = self.state.editing_cell()?;
        if session.sheet != self.engine.selected_view().sheet {
            return None;
        }
        editor_rect(session, &self.layout, &self.viewport)
    }

    pub fn header_boxes(&self) -> Vec<HeaderBox> {
        let range = self.engine.selected_view().range;
        header_boxes(&self.layout, &self.viewport, self.renderer.config(), &range)
    }

    /// Paints one frame.
    pub fn render<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        let names = self.engine.sheet_names();
        if let Some(session) = self.state.editing_cell_mut() {
            fit_editor_box(surface, session, &names, self.renderer.config());
        }
        let frame = Frame {
            engine: &self.engine,
            layout: &self.layout,
            viewport: &self.viewport,
            state: &self.state,
            guide: self.pointer.guide(),
        };
        self.renderer.render(surface, &frame);
    }
}
