//! DOM events to the grid's input events.
//!
//! Coordinates are made relative to the element the listener is attached to,
//! so the canvas and the scroll container that overlays it agree.

use web_sys::{Element, KeyboardEvent, MouseEvent};

use crate::editor::KeyEvent;
use crate::pointer::{PointerEvent, PointerType};

/// Position of `event` relative to `target`'s top-left corner.
pub(crate) fn local_position(event: &MouseEvent, target: &Element) -> (f64, f64) {
    let rect = target.get_bounding_client_rect();
    (
        f64::from(event.client_x()) - rect.left(),
        f64::from(event.client_y()) - rect.top(),
    )
}

pub(crate) fn pointer_event(event: &web_sys::PointerEvent, target: &Element) -> PointerEvent {
    let (x, y) = local_position(event, target);
    PointerEvent {
        x,
        y,
        pointer_id: event.pointer_id(),
        pointer_type: PointerType::parse(&event.pointer_type()),
        shift: event.shift_key(),
    }
}

/// Cmd on macOS counts as Ctrl.
pub(crate) fn key_event(event: &KeyboardEvent) -> KeyEvent {
    KeyEvent {
        key: event.key(),
        shift: event.shift_key(),
        ctrl: event.ctrl_key() || event.meta_key(),
        alt: event.alt_key(),
    }
}
