//! Transparent `<textarea>` under the painted editor overlay.
//!
//! Only the caret is visible; the text itself is drawn by the grid on the
//! canvas at the same font, so the caret lands on the glyph it belongs to.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, FocusOptions, HtmlElement, HtmlTextAreaElement};

use super::input::TextInput;
use crate::config::GridConfig;
use crate::render::Rect;

pub(crate) struct TextArea {
    textarea: Option<HtmlTextAreaElement>,
    /// Created here, so removed from the DOM on drop.
    owned: bool,
}

impl TextArea {
    pub(crate) fn new() -> Self {
        TextArea {
            textarea: None,
            owned: true,
        }
    }

    /// Wrap a control the host placed itself, e.g. a formula bar.
    pub(crate) fn adopt(textarea: HtmlTextAreaElement) -> Self {
        TextArea {
            textarea: Some(textarea),
            owned: false,
        }
    }

    /// Create the hidden control so it can hold text before it is shown.
    pub(crate) fn mount(&mut self, config: &GridConfig, container: Option<&HtmlElement>) {
        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            let _ = self.get_or_create(&document, config, container);
        }
    }

    pub(crate) fn element(&self) -> Option<&HtmlTextAreaElement> {
        self.textarea.as_ref()
    }

    /// Place the control over `rect` (CSS pixels relative to `container`),
    /// optionally focusing it without scrolling the page.
    pub(crate) fn show(&mut self, rect: Rect, focus: bool, config: &GridConfig, container: Option<&HtmlElement>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Some(textarea) = self.get_or_create(&document, config, container) else {
            return;
        };
        let style = textarea.style();
        let _ = style.set_property("display", "block");
        let _ = style.set_property("left", &format!("{}px", rect.x));
        let _ = style.set_property("top", &format!("{}px", rect.y));
        let _ = style.set_property("width", &format!("{}px", rect.w));
        let _ = style.set_property("height", &format!("{}px", rect.h));
        if focus {
            focus_without_scroll(textarea);
        }
    }

    pub(crate) fn focus(&self) {
        if let Some(ref textarea) = self.textarea {
            focus_without_scroll(textarea);
        }
    }

    pub(crate) fn hide(&mut self) {
        if let Some(ref textarea) = self.textarea {
            let _ = textarea.style().set_property("display", "none");
        }
    }

    fn get_or_create(
        &mut self,
        document: &Document,
        config: &GridConfig,
        container: Option<&HtmlElement>,
    ) -> Option<&HtmlTextAreaElement> {
        if self.textarea.is_none() {
            let textarea = document
                .create_element("textarea")
                .ok()?
                .dyn_into::<HtmlTextAreaElement>()
                .ok()?;
            textarea.set_rows(1);
            let _ = textarea.set_attribute("spellcheck", "false");
            let style = textarea.style();
            let line_height = config.font_size * 1.5;
            for (name, value) in [
                ("position", "absolute"),
                ("z-index", "1000"),
                ("box-sizing", "border-box"),
                ("border", "none"),
                ("outline", "none"),
                ("resize", "none"),
                ("overflow", "hidden"),
                ("white-space", "pre"),
                ("color", "transparent"),
                ("background", "transparent"),
                ("display", "none"),
            ] {
                let _ = style.set_property(name, value);
            }
            let _ = style.set_property("caret-color", &config.colors.caret);
            let _ = style.set_property("font-family", &config.font_family);
            let _ = style.set_property("font-size", &format!("{}px", config.font_size));
            let _ = style.set_property("line-height", &format!("{line_height}px"));
            let _ = style.set_property("padding", &format!("4px {}px", config.cell_padding));

            if let Some(c) = container {
                let _ = c.append_child(&textarea);
            } else if let Some(body) = document.body() {
                let _ = body.append_child(&textarea);
            }
            self.textarea = Some(textarea);
        }
        self.textarea.as_ref()
    }
}

fn focus_without_scroll(textarea: &HtmlTextAreaElement) {
    let element: &Element = textarea.as_ref();
    let is_active = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.active_element())
        .is_some_and(|active| active == *element);
    if !is_active {
        let options = FocusOptions::new();
        options.set_prevent_scroll(true);
        let _ = textarea.focus_with_options(&options);
    }
}

/// UTF-16 offset (DOM selection) to a character offset.
fn utf16_to_chars(text: &str, offset: u32) -> usize {
    let mut units = 0;
    for (i, c) in text.chars().enumerate() {
        if units >= usize::try_from(offset).unwrap_or(usize::MAX) {
            return i;
        }
        units += c.len_utf16();
    }
    text.chars().count()
}

fn chars_to_utf16(text: &str, offset: usize) -> u32 {
    let units: usize = text.chars().take(offset).map(char::len_utf16).sum();
    u32::try_from(units).unwrap_or(u32::MAX)
}

impl TextInput for TextArea {
    fn value(&self) -> String {
        self.textarea.as_ref().map(HtmlTextAreaElement::value).unwrap_or_default()
    }

    fn set_value(&mut self, value: &str) {
        if let Some(ref textarea) = self.textarea {
            textarea.set_value(value);
        }
    }

    fn selection(&self) -> (usize, usize) {
        let Some(ref textarea) = self.textarea else {
            return (0, 0);
        };
        let value = textarea.value();
        let start = textarea.selection_start().ok().flatten().unwrap_or(0);
        let end = textarea.selection_end().ok().flatten().unwrap_or(start);
        (utf16_to_chars(&value, start), utf16_to_chars(&value, end))
    }

    fn set_selection(&mut self, start: usize, end: usize) {
        if let Some(ref textarea) = self.textarea {
            let value = textarea.value();
            let _ = textarea.set_selection_range(chars_to_utf16(&value, start), chars_to_utf16(&value, end));
        }
    }
}

impl Drop for TextArea {
    fn drop(&mut self) {
        if !self.owned {
            return;
        }
        if let Some(ref textarea) = self.textarea {
            if let Some(parent) = textarea.parent_node() {
                let _ = parent.remove_child(textarea);
            }
        }
    }
}
