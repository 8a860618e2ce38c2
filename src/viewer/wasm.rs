//! `XlGrid`: the grid in the browser.
//!
//! Wires DOM listeners on the canvas, the scroll container and the editor
//! `<textarea>` to a [`GridView`] over a JavaScript model. Repaints are not
//! done inline: handlers mark the grid dirty and the host's render callback
//! is invoked once the shared state is released, so the host may call
//! `render()` from it synchronously.
//!
//! ```javascript
//! const grid = new XlGrid(model, canvas, container);
//! grid.setRenderCallback(() => requestAnimationFrame(() => grid.render()));
//! grid.resize(container.clientWidth, container.clientHeight, devicePixelRatio);
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use js_sys::Function;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, EventTarget, HtmlCanvasElement, HtmlElement, HtmlTextAreaElement, KeyboardEvent, MouseEvent};

use super::events::{key_event, local_position, pointer_event};
use super::js_engine::JsEngine;
use super::GridView;
use crate::config::GridConfig;
use crate::editor::textarea::TextArea;
use crate::editor::{KeyOutcome, TextInput};
use crate::error::Result;
use crate::layout::{Axis, SheetLayout};
use crate::render::CanvasSurface;
use crate::types::Focus;

struct Shared {
    view: GridView<JsEngine>,
    surface: CanvasSurface,
    canvas: HtmlCanvasElement,
    container: Option<HtmlElement>,
    cell_input: TextArea,
    formula_input: Option<TextArea>,
}

impl Shared {
    /// Shows the cell editor control over the edited cell, or hides it.
    fn place_editor(&mut self) {
        match self.view.editor_rect() {
            Some(rect) => {
                let focus = self
                    .view
                    .state()
                    .editing_cell()
                    .is_some_and(|session| session.focus == Focus::Cell);
                let config = self.view.config();
                self.cell_input
                    .show(rect, focus, config, self.container.as_ref());
            }
            None => self.cell_input.hide(),
        }
    }

    /// Keyboard focus goes back to the grid once no session is open.
    fn restore_focus(&self) {
        if self.view.state().editing_cell().is_none() {
            let _ = self.canvas.focus();
        }
    }

    /// Copies the edited control's text into the other one.
    fn mirror(&mut self, from: Focus) {
        let text = self.view.state().editing_text();
        match from {
            Focus::Cell => {
                if let Some(input) = self.formula_input.as_mut() {
                    input.set_value(&text);
                }
            }
            Focus::FormulaBar => self.cell_input.set_value(&text),
        }
    }

    /// The view and the control of `surface`, borrowed together.
    fn split(&mut self, surface: Focus) -> Option<(&mut GridView<JsEngine>, &mut TextArea)> {
        let input = match surface {
            Focus::Cell => Some(&mut self.cell_input),
            Focus::FormulaBar => self.formula_input.as_mut(),
        }?;
        Some((&mut self.view, input))
    }

    fn clear_inputs(&mut self) {
        self.cell_input.set_value("");
        if let Some(input) = self.formula_input.as_mut() {
            input.set_value("");
        }
    }
}

/// Carries repaint requests out of the shared borrow.
#[derive(Clone)]
struct Notifier {
    dirty: Rc<Cell<bool>>,
    callback: Rc<RefCell<Option<Function>>>,
}

impl Notifier {
    fn flush(&self) {
        if !self.dirty.replace(false) {
            return;
        }
        let callback = self.callback.borrow().clone();
        if let Some(callback) = callback {
            let _ = callback.call0(&JsValue::NULL);
        }
    }
}

struct Listener {
    target: EventTarget,
    name: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.name, self.closure.as_ref().unchecked_ref());
    }
}

fn report(result: Result<()>) {
    if let Err(e) = result {
        tracing::warn!(error = %e, "grid intent failed");
        web_sys::console::warn_1(&JsValue::from_str(&e.to_string()));
    }
}

#[wasm_bindgen]
pub struct XlGrid {
    shared: Rc<RefCell<Shared>>,
    notifier: Notifier,
    listeners: Vec<Listener>,
    formula_listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl XlGrid {
    /// `model` is the calculation engine; `container` is the scrollable
    /// element the canvas sits in. `config` is an optional partial
    /// [`GridConfig`].
    #[wasm_bindgen(constructor)]
    pub fn new(
        model: JsValue,
        canvas: HtmlCanvasElement,
        container: Option<HtmlElement>,
        config: JsValue,
    ) -> std::result::Result<XlGrid, JsValue> {
        console_error_panic_hook::set_once();

        let config: GridConfig = if config.is_undefined() || config.is_null() {
            GridConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(|e| JsValue::from_str(&e.to_string()))?
        };

        let rect = canvas.get_bounding_client_rect();
        let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
        let mut surface = CanvasSurface::new(canvas.clone())?;
        surface.resize(rect.width(), rect.height(), dpr);
        canvas.set_tab_index(0);

        let mut cell_input = TextArea::new();
        cell_input.mount(&config, container.as_ref());

        let notifier = Notifier {
            dirty: Rc::new(Cell::new(true)),
            callback: Rc::new(RefCell::new(None)),
        };
        let mut view = GridView::new(JsEngine::new(model), config);
        view.resize(rect.width(), rect.height());
        let dirty = Rc::clone(&notifier.dirty);
        view.set_render_callback(Some(Box::new(move || dirty.set(true))));

        let shared = Rc::new(RefCell::new(Shared {
            view,
            surface,
            canvas,
            container,
            cell_input,
            formula_input: None,
        }));

        let mut grid = XlGrid {
            shared,
            notifier,
            listeners: Vec::new(),
            formula_listeners: Vec::new(),
        };
        grid.attach_grid_listeners();
        let editor_listeners = grid.editor_listeners(Focus::Cell);
        grid.listeners.extend(editor_listeners);
        Ok(grid)
    }

    /// Paints a frame and positions the editor control.
    pub fn render(&mut self) {
        let mut guard = self.shared.borrow_mut();
        let s = &mut *guard;
        s.view.render(&mut s.surface);
        s.place_editor();
        self.notifier.dirty.set(false);
    }

    /// New size in CSS pixels.
    pub fn resize(&mut self, width: f64, height: f64, dpr: f64) {
        {
            let mut s = self.shared.borrow_mut();
            s.surface.resize(width, height, dpr);
            s.view.resize(width, height);
        }
        self.notifier.flush();
    }

    #[wasm_bindgen(js_name = "setRenderCallback")]
    pub fn set_render_callback(&mut self, callback: Option<Function>) {
        *self.notifier.callback.borrow_mut() = callback;
    }

    /// Re-reads the scroll position the model keeps for the selected sheet,
    /// after the host switched sheets.
    #[wasm_bindgen(js_name = "loadScroll")]
    pub fn load_scroll(&mut self) {
        {
            let mut s = self.shared.borrow_mut();
            s.view.load_scroll();
            let (x, y) = (s.view.viewport().scroll_x, s.view.viewport().scroll_y);
            if let Some(container) = s.container.as_ref() {
                container.set_scroll_left(px(x));
                container.set_scroll_top(px(y));
            }
        }
        self.notifier.dirty.set(true);
        self.notifier.flush();
    }

    #[wasm_bindgen(js_name = "setColumnWidth")]
    pub fn set_column_width(&mut self, column: u32, width: u32) {
        self.update_layout(|layout| layout.columns.set_size(column, width));
    }

    #[wasm_bindgen(js_name = "setRowHeight")]
    pub fn set_row_height(&mut self, row: u32, height: u32) {
        self.update_layout(|layout| layout.rows.set_size(row, height));
    }

    #[wasm_bindgen(js_name = "setColumnHidden")]
    pub fn set_column_hidden(&mut self, column: u32, hidden: bool) {
        self.update_layout(|layout| layout.set_hidden(Axis::Column, column, hidden));
    }

    #[wasm_bindgen(js_name = "setRowHidden")]
    pub fn set_row_hidden(&mut self, row: u32, hidden: bool) {
        self.update_layout(|layout| layout.set_hidden(Axis::Row, row, hidden));
    }

    #[wasm_bindgen(js_name = "setFrozen")]
    pub fn set_frozen(&mut self, rows: u32, columns: u32) {
        self.update_layout(|layout| layout.set_frozen(rows, columns));
    }

    /// Size of the scrollable content, for the host's scroll spacer.
    #[wasm_bindgen(js_name = "contentSize")]
    pub fn content_size(&self) -> Vec<f64> {
        let s = self.shared.borrow();
        let layout = s.view.layout();
        vec![
            layout.header_width + layout.frozen_columns_width() + layout.scrollable_width(),
            layout.header_height + layout.frozen_rows_height() + layout.scrollable_height(),
        ]
    }

    #[wasm_bindgen(js_name = "copyStyles")]
    pub fn copy_styles(&mut self) {
        self.shared.borrow_mut().view.copy_styles();
        self.notifier.flush();
    }

    /// Header cells in view, for hosts that draw their own headers.
    #[wasm_bindgen(js_name = "headerBoxes")]
    pub fn header_boxes(&self) -> std::result::Result<JsValue, JsValue> {
        let boxes = self.shared.borrow().view.header_boxes();
        serde_wasm_bindgen::to_value(&boxes).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = "isEditing")]
    pub fn is_editing(&self) -> bool {
        self.shared.borrow().view.state().editing_cell().is_some()
    }

    /// The text the open session would commit; empty without a session.
    #[wasm_bindgen(js_name = "editingText")]
    pub fn editing_text(&self) -> String {
        self.shared.borrow().view.state().editing_text()
    }

    /// Routes a formula bar `<textarea>` through the same editing session
    /// as the cell editor.
    #[wasm_bindgen(js_name = "attachFormulaBar")]
    pub fn attach_formula_bar(&mut self, textarea: HtmlTextAreaElement) {
        self.formula_listeners.clear();
        self.shared.borrow_mut().formula_input = Some(TextArea::adopt(textarea));
        self.formula_listeners = self.editor_listeners(Focus::FormulaBar);
    }
}

impl XlGrid {
    fn update_layout<F: FnOnce(&mut SheetLayout)>(&mut self, f: F) {
        self.shared.borrow_mut().view.update_layout(f);
        self.notifier.flush();
    }

    fn attach_grid_listeners(&mut self) {
        let listeners = self.grid_listeners();
        self.listeners.extend(listeners);
    }

    fn grid_listeners(&self) -> Vec<Listener> {
        let mut listeners = Vec::new();
        let (canvas, container): (Element, Option<EventTarget>) = {
            let s = self.shared.borrow();
            (
                s.canvas.clone().into(),
                s.container.as_ref().map(|c| c.clone().into()),
            )
        };
        let target: EventTarget = canvas.clone().into();

        {
            let (shared, notifier, canvas) = (Rc::clone(&self.shared), self.notifier.clone(), canvas.clone());
            listeners.extend(listen(&target, "pointerdown", move |event| {
                let Some(event) = event.dyn_ref::<web_sys::PointerEvent>() else {
                    return;
                };
                {
                    let mut s = shared.borrow_mut();
                    let pointer = pointer_event(event, &canvas);
                    report(s.view.on_pointer_down(&pointer));
                    if s.view.pointer().captured_pointer() == Some(pointer.pointer_id) {
                        let _ = canvas.set_pointer_capture(pointer.pointer_id);
                    }
                    if s.view.state().editing_cell().is_none() {
                        s.clear_inputs();
                    }
                    s.place_editor();
                    s.restore_focus();
                }
                notifier.flush();
            }));
        }
        {
            let (shared, notifier, canvas) = (Rc::clone(&self.shared), self.notifier.clone(), canvas.clone());
            listeners.extend(listen(&target, "pointermove", move |event| {
                let Some(event) = event.dyn_ref::<web_sys::PointerEvent>() else {
                    return;
                };
                {
                    let mut s = shared.borrow_mut();
                    if !s.view.pointer().is_capturing() {
                        return;
                    }
                    report(s.view.on_pointer_move(&pointer_event(event, &canvas)));
                }
                notifier.flush();
            }));
        }
        for name in ["pointerup", "pointercancel"] {
            let (shared, notifier, canvas) = (Rc::clone(&self.shared), self.notifier.clone(), canvas.clone());
            listeners.extend(listen(&target, name, move |event| {
                let Some(event) = event.dyn_ref::<web_sys::PointerEvent>() else {
                    return;
                };
                {
                    let mut s = shared.borrow_mut();
                    let pointer = pointer_event(event, &canvas);
                    report(s.view.on_pointer_up(&pointer));
                    let _ = canvas.release_pointer_capture(pointer.pointer_id);
                }
                notifier.flush();
            }));
        }
        {
            // Keeps focus in the editor while clicking cells into a formula.
            let shared = Rc::clone(&self.shared);
            listeners.extend(listen(&target, "mousedown", move |event| {
                if shared.borrow().view.state().editing_cell().is_some() {
                    event.prevent_default();
                }
            }));
        }
        {
            let (shared, notifier, canvas) = (Rc::clone(&self.shared), self.notifier.clone(), canvas.clone());
            listeners.extend(listen(&target, "dblclick", move |event| {
                let Some(event) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                {
                    let mut guard = shared.borrow_mut();
                    let s = &mut *guard;
                    let (x, y) = local_position(event, &canvas);
                    report(s.view.on_double_click(x, y, &mut s.surface, &mut s.cell_input));
                    s.mirror(Focus::Cell);
                    s.place_editor();
                }
                notifier.flush();
            }));
        }
        {
            let (shared, notifier) = (Rc::clone(&self.shared), self.notifier.clone());
            listeners.extend(listen(&target, "keydown", move |event| {
                if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
                    on_key_down(&shared, &notifier, event, Focus::Cell);
                }
            }));
        }
        if let Some(container) = container {
            let (shared, notifier) = (Rc::clone(&self.shared), self.notifier.clone());
            listeners.extend(listen(&container, "scroll", move |_event| {
                {
                    let mut s = shared.borrow_mut();
                    let Some((x, y)) = s
                        .container
                        .as_ref()
                        .map(|c| (f64::from(c.scroll_left()), f64::from(c.scroll_top())))
                    else {
                        return;
                    };
                    report(s.view.on_scroll(x, y));
                    s.place_editor();
                }
                notifier.flush();
            }));
        }
        listeners
    }

    fn editor_listeners(&self, surface: Focus) -> Vec<Listener> {
        let mut listeners = Vec::new();
        let target: Option<EventTarget> = {
            let mut s = self.shared.borrow_mut();
            s.split(surface)
                .and_then(|(_, input)| input.element().map(|e| e.clone().into()))
        };
        let Some(target) = target else {
            return listeners;
        };

        {
            let (shared, notifier) = (Rc::clone(&self.shared), self.notifier.clone());
            listeners.extend(listen(&target, "keydown", move |event| {
                if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
                    on_key_down(&shared, &notifier, event, surface);
                }
            }));
        }
        // The control has applied the keystroke by now.
        for name in ["input", "keyup"] {
            let (shared, notifier) = (Rc::clone(&self.shared), self.notifier.clone());
            listeners.extend(listen(&target, name, move |_event| {
                {
                    let mut guard = shared.borrow_mut();
                    let s = &mut *guard;
                    let Some((view, input)) = s.split(surface) else {
                        return;
                    };
                    view.sync_input(&*input, surface);
                    s.mirror(surface);
                    s.place_editor();
                }
                notifier.flush();
            }));
        }
        let entries: &[&'static str] = match surface {
            Focus::Cell => &["pointerdown"],
            Focus::FormulaBar => &["pointerdown", "focus"],
        };
        for &name in entries {
            let (shared, notifier) = (Rc::clone(&self.shared), self.notifier.clone());
            listeners.extend(listen(&target, name, move |_event| {
                {
                    let mut guard = shared.borrow_mut();
                    let s = &mut *guard;
                    let Some((view, input)) = s.split(surface) else {
                        return;
                    };
                    if surface == Focus::FormulaBar {
                        view.focus_formula_bar(input);
                        s.mirror(Focus::FormulaBar);
                    }
                    s.view.on_editor_pointer_down(surface);
                    s.place_editor();
                }
                notifier.flush();
            }));
        }
        {
            let (shared, notifier) = (Rc::clone(&self.shared), self.notifier.clone());
            listeners.extend(listen(&target, "blur", move |_event| {
                {
                    let mut guard = shared.borrow_mut();
                    let s = &mut *guard;
                    let Some((view, input)) = s.split(surface) else {
                        return;
                    };
                    report(view.on_blur(input, surface));
                    if s.view.state().editing_cell().is_none() {
                        s.clear_inputs();
                    }
                    s.place_editor();
                }
                notifier.flush();
            }));
        }
        listeners
    }
}

fn listen<F>(target: &EventTarget, name: &'static str, handler: F) -> Option<Listener>
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target
        .add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())
        .ok()?;
    Some(Listener {
        target: target.clone(),
        name,
        closure,
    })
}

fn on_key_down(shared: &Rc<RefCell<Shared>>, notifier: &Notifier, event: &KeyboardEvent, surface: Focus) {
    {
        let mut guard = shared.borrow_mut();
        let s = &mut *guard;
        let Some((view, input)) = s.split(surface) else {
            return;
        };
        match view.on_key_down(&key_event(event), input) {
            Ok(KeyOutcome::Handled) => event.prevent_default(),
            Ok(KeyOutcome::Native | KeyOutcome::Ignored) => {}
            Err(e) => report(Err(e)),
        }
        if s.view.state().editing_cell().is_none() {
            s.clear_inputs();
        } else {
            s.mirror(surface);
        }
        s.place_editor();
        s.restore_focus();
    }
    notifier.flush();
}

/// Scroll offsets in whole pixels for the DOM.
#[allow(clippy::cast_possible_truncation)]
fn px(value: f64) -> i32 {
    // Clamped to the i32 range before the cast.
    value.round().clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}
