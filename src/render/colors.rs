//! Color utilities for grid rendering.
//!
//! Colors travel as CSS strings, which Canvas 2D takes directly.

/// A CSS color string (e.g., "#FF0000", "rgba(255, 0, 0, 0.5)")
pub type CssColor = String;

/// Colors given to formula references, in order of first appearance.
pub const REFERENCE_PALETTE: [&str; 10] = [
    "#59B9BC", // cyan
    "#EC5753", // flamingo
    "#3358B7", // blue
    "#F8CD3C", // yellow
    "#3BB68A", // emerald
    "#523E93", // violet
    "#A23C52", // burgundy
    "#8CB354", // wasabi
    "#D03627", // red
    "#1B717E", // teal
];

/// Palette color for the `index`-th distinct reference. Wraps after ten.
pub fn reference_color(index: usize) -> &'static str {
    REFERENCE_PALETTE
        .get(index % REFERENCE_PALETTE.len())
        .copied()
        .unwrap_or("#59B9BC")
}

/// RGB color with u8 components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse from a hex string (with or without #).
    /// Returns None if the format is invalid.
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
        let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
        let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
        Some(Self { r, g, b })
    }

    /// Convert to CSS hex string (#RRGGBB).
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn to_rgba(self, alpha: f64) -> CssColor {
        format!("rgba({}, {}, {}, {alpha})", self.r, self.g, self.b)
    }
}

/// Translucent version of a hex color; used to fill highlighted ranges.
/// Non-hex input is returned unchanged.
pub fn tint(color: &str, alpha: f64) -> CssColor {
    Rgb::from_hex(color).map_or_else(|| color.to_string(), |rgb| rgb.to_rgba(alpha))
}

/// Normalize an engine color to CSS.
///
/// Supports formats:
/// - "#RRGGBB"
/// - "RRGGBB" (hex without # prefix)
/// - "#AARRGGBB" (alpha first)
/// - "rgb(...)" / "rgba(...)" (passed through)
pub fn parse_color(s: &str) -> Option<CssColor> {
    let s = s.trim();
    if s.starts_with("rgb") {
        return Some(s.to_string());
    }
    let hex = s.strip_prefix('#').unwrap_or(s);
    match hex.len() {
        6 => Rgb::from_hex(hex).map(Rgb::to_hex),
        8 => {
            let a = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
            let rgb = Rgb::from_hex(hex.get(2..8)?)?;
            if a == 255 {
                Some(rgb.to_hex())
            } else {
                Some(format!(
                    "rgba({}, {}, {}, {:.2})",
                    rgb.r,
                    rgb.g,
                    rgb.b,
                    f64::from(a) / 255.0
                ))
            }
        }
        _ => None,
    }
}
