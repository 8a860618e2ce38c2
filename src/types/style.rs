use serde::{Deserialize, Serialize};

/// Horizontal alignment
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum HAlign {
    /// Numbers right, text left
    #[default]
    General,
    Left,
    Center,
    Right,
}

/// Vertical alignment
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum VAlign {
    Top,
    Center,
    #[default]
    Bottom,
}

/// Cell style as reported by the calculation engine.
///
/// Only what the grid needs to paint a cell. Missing fields fall back to the
/// grid defaults.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CellStyle {
    // Font
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,

    // Fill
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,

    // Alignment
    pub align_h: HAlign,
    pub align_v: VAlign,
    pub wrap: bool,
}

/// Style paths understood by the engine's range-style update.
pub mod paths {
    pub const BOLD: &str = "font.b";
    pub const ITALIC: &str = "font.i";
    pub const UNDERLINE: &str = "font.u";
    pub const STRIKE: &str = "font.strike";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn partial_style_deserializes() {
        let style: CellStyle =
            serde_json::from_str(r##"{ "bold": true, "alignH": "center", "fillColor": "#FF0000" }"##)
                .unwrap();
        assert!(style.bold);
        assert!(!style.italic);
        assert_eq!(style.align_h, HAlign::Center);
        assert_eq!(style.align_v, VAlign::Bottom);
        assert_eq!(style.fill_color.as_deref(), Some("#FF0000"));
    }
}
