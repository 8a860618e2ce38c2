//! Canvas 2D implementation of [`Surface`].
//!
//! Coordinates are CSS pixels; the device pixel ratio is applied once as a
//! context transform on resize.

use std::collections::HashMap;

use js_sys::Array;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::backend::{Rect, Surface, TextAlign};
use crate::error::{Result, XlgridError};

/// Measured text widths are cached per font, cleared when it grows too large.
const TEXT_MEASURE_CACHE_CAP: usize = 8192;

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
    dpr: f64,
    last_font: String,
    text_measure_cache: HashMap<(String, String), f64>,
}

impl CanvasSurface {
    /// Create a new surface from an HtmlCanvasElement
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|_| XlgridError::Render("Failed to get 2d context".into()))?
            .ok_or_else(|| XlgridError::Render("No 2d context available".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| XlgridError::Render("Failed to cast to CanvasRenderingContext2d".into()))?;
        ctx.set_text_baseline("middle");

        let width = f64::from(canvas.width());
        let height = f64::from(canvas.height());
        Ok(Self {
            canvas,
            ctx,
            width,
            height,
            dpr: 1.0,
            last_font: String::new(),
            text_measure_cache: HashMap::new(),
        })
    }

    /// Size the backing store for `width` x `height` CSS pixels.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn resize(&mut self, width: f64, height: f64, dpr: f64) {
        self.width = width;
        self.height = height;
        self.dpr = if dpr > 0.0 { dpr } else { 1.0 };
        // Rounded and non-negative before the cast.
        self.canvas.set_width((width * self.dpr).round().max(0.0) as u32);
        self.canvas.set_height((height * self.dpr).round().max(0.0) as u32);
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{width}px"));
        let _ = style.set_property("height", &format!("{height}px"));
        // Resizing resets the context state.
        let _ = self.ctx.set_transform(self.dpr, 0.0, 0.0, self.dpr, 0.0, 0.0);
        self.ctx.set_text_baseline("middle");
        self.last_font.clear();
    }

    fn set_font(&mut self, font: &str) {
        if self.last_font != font {
            self.ctx.set_font(font);
            self.last_font.clear();
            self.last_font.push_str(font);
        }
    }

    fn set_dash(&self, dash: &[f64]) {
        let segments: Array = dash.iter().map(|d| JsValue::from_f64(*d)).collect();
        let _ = self.ctx.set_line_dash(&segments);
    }
}

impl Surface for CanvasSurface {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
        // restore() may bring back an older font
        self.last_font.clear();
    }

    fn clip_rect(&mut self, rect: Rect) {
        self.ctx.begin_path();
        self.ctx.rect(rect.x, rect.y, rect.w, rect.h);
        self.ctx.clip();
    }

    fn fill_rect(&mut self, rect: Rect, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(rect.x, rect.y, rect.w, rect.h);
    }

    fn stroke_rect(&mut self, rect: Rect, color: &str, width: f64, dash: &[f64]) {
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(width);
        self.set_dash(dash);
        self.ctx.stroke_rect(rect.x, rect.y, rect.w, rect.h);
        self.set_dash(&[]);
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: &str, width: f64, dash: &[f64]) {
        self.ctx.begin_path();
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(width);
        self.set_dash(dash);
        self.ctx.move_to(x1, y1);
        self.ctx.line_to(x2, y2);
        self.ctx.stroke();
        if !dash.is_empty() {
            self.set_dash(&[]);
        }
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: &str, color: &str, align: TextAlign) {
        self.set_font(font);
        self.ctx.set_fill_style_str(color);
        self.ctx.set_text_align(align.as_css());
        let _ = self.ctx.fill_text(text, x, y);
    }

    fn measure_text(&mut self, text: &str, font: &str) -> f64 {
        let key = (font.to_string(), text.to_string());
        if let Some(width) = self.text_measure_cache.get(&key) {
            return *width;
        }
        self.set_font(font);
        let width = self.ctx.measure_text(text).map_or(0.0, |m| m.width());
        if self.text_measure_cache.len() >= TEXT_MEASURE_CACHE_CAP {
            self.text_measure_cache.clear();
        }
        self.text_measure_cache.insert(key, width);
        width
    }
}
