//! Drawing surface abstraction.
//!
//! The grid renderer only ever talks to a [`Surface`]. The browser build
//! implements it over a Canvas 2D context; [`DisplayList`] records the calls
//! instead, which is what tests and benches render into.

/// Axis-aligned rectangle in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }

    /// Half-open containment: the right and bottom edges are outside.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Intersection; empty rectangles come back with zero size.
    pub fn intersect(&self, other: &Rect) -> Rect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let w = (self.right().min(other.right()) - x).max(0.0);
        let h = (self.bottom().min(other.bottom()) - y).max(0.0);
        Rect::new(x, y, w, h)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

/// Immediate-mode 2D drawing target.
///
/// Text is drawn with a middle baseline: `y` is the vertical center of the line.
pub trait Surface {
    fn width(&self) -> f64;
    fn height(&self) -> f64;

    fn save(&mut self);
    fn restore(&mut self);
    /// Intersects the current clip with `rect` until the matching `restore`.
    fn clip_rect(&mut self, rect: Rect);

    fn fill_rect(&mut self, rect: Rect, color: &str);
    /// Strokes a rectangle outline; an empty `dash` is solid.
    fn stroke_rect(&mut self, rect: Rect, color: &str, width: f64, dash: &[f64]);
    #[allow(clippy::too_many_arguments)]
    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: &str, width: f64, dash: &[f64]);

    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: &str, color: &str, align: TextAlign);
    fn measure_text(&mut self, text: &str, font: &str) -> f64;
}

/// Helper to get crisp pixel position for 1px lines
pub fn crisp(x: f64) -> f64 {
    x.floor() + 0.5
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Save,
    Restore,
    Clip(Rect),
    FillRect {
        rect: Rect,
        color: String,
    },
    StrokeRect {
        rect: Rect,
        color: String,
        width: f64,
        dash: Vec<f64>,
    },
    Line {
        from: (f64, f64),
        to: (f64, f64),
        color: String,
        width: f64,
        dash: Vec<f64>,
    },
    Text {
        text: String,
        x: f64,
        y: f64,
        font: String,
        color: String,
        align: TextAlign,
    },
}

/// Recording surface. Text is measured with a fixed advance per character
/// derived from the font size, so layouts are reproducible without a browser.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayList {
    width: f64,
    height: f64,
    pub ops: Vec<DrawOp>,
}

impl DisplayList {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    /// Drawn strings, in paint order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn find_text(&self, needle: &str) -> Option<&DrawOp> {
        self.ops
            .iter()
            .find(|op| matches!(op, DrawOp::Text { text, .. } if text == needle))
    }
}

/// Pixel size out of a CSS font shorthand such as `bold 13px Inter`.
fn font_px(font: &str) -> f64 {
    font.split_whitespace()
        .find_map(|part| part.strip_suffix("px").and_then(|n| n.parse::<f64>().ok()))
        .unwrap_or(13.0)
}

impl Surface for DisplayList {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn save(&mut self) {
        self.ops.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        self.ops.push(DrawOp::Restore);
    }

    fn clip_rect(&mut self, rect: Rect) {
        self.ops.push(DrawOp::Clip(rect));
    }

    fn fill_rect(&mut self, rect: Rect, color: &str) {
        self.ops.push(DrawOp::FillRect {
            rect,
            color: color.to_string(),
        });
    }

    fn stroke_rect(&mut self, rect: Rect, color: &str, width: f64, dash: &[f64]) {
        self.ops.push(DrawOp::StrokeRect {
            rect,
            color: color.to_string(),
            width,
            dash: dash.to_vec(),
        });
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: &str, width: f64, dash: &[f64]) {
        self.ops.push(DrawOp::Line {
            from: (x1, y1),
            to: (x2, y2),
            color: color.to_string(),
            width,
            dash: dash.to_vec(),
        });
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: &str, color: &str, align: TextAlign) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
            font: font.to_string(),
            color: color.to_string(),
            align,
        });
    }

    #[allow(clippy::cast_precision_loss)]
    fn measure_text(&mut self, text: &str, font: &str) -> f64 {
        text.chars().count() as f64 * font_px(font) * 0.6
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn intersect_disjoint_is_empty() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 0.0, 10.0, 10.0);
        assert!(a.intersect(&b).is_empty());
        assert_eq!(a.intersect(&Rect::new(5.0, 5.0, 10.0, 10.0)), Rect::new(5.0, 5.0, 5.0, 5.0));
    }

    #[test]
    fn measure_uses_font_size() {
        let mut list = DisplayList::new(100.0, 100.0);
        assert_eq!(list.measure_text("abcd", "bold 10px Inter"), 24.0);
        assert_eq!(list.measure_text("", "10px Inter"), 0.0);
    }
}
