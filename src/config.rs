//! Grid configuration: header band sizes, default geometry, hot-zone sizes
//! and the color palette.
//!
//! Every field has a default so hosts only override what they need:
//!
//! ```
//! use xlgrid::config::GridConfig;
//!
//! let config = GridConfig::from_json(r#"{ "default_row_height": 30 }"#).unwrap();
//! assert_eq!(config.default_row_height, 30);
//! assert_eq!(config.default_column_width, 100);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Last addressable row (1-based).
pub const LAST_ROW: u32 = 1_048_576;

/// Last addressable column (1-based, `XFD`).
pub const LAST_COLUMN: u32 = 16_384;

/// Colors used by the grid renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridColors {
    pub background: String,
    pub gridline: String,
    pub header_background: String,
    pub header_border: String,
    pub header_text: String,
    pub header_selected_background: String,
    pub header_selected_text: String,
    pub frozen_separator: String,
    pub outline: String,
    pub text: String,
    pub editor_background: String,
    pub caret: String,
}

impl Default for GridColors {
    fn default() -> Self {
        Self {
            background: "#FFFFFF".to_string(),
            gridline: "#E0E0E0".to_string(),
            header_background: "#FFFFFF".to_string(),
            header_border: "#E0E0E0".to_string(),
            header_text: "#757575".to_string(),
            header_selected_background: "#EEEEEE".to_string(),
            header_selected_text: "#424242".to_string(),
            frozen_separator: "#E0E0E0".to_string(),
            outline: "#F2994A".to_string(),
            text: "#333333".to_string(),
            editor_background: "#FFFFFF".to_string(),
            caret: "#F2994A".to_string(),
        }
    }
}

/// Grid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Width of the row-number band on the left (index 0 of the column table).
    pub header_column_width: f64,
    /// Height of the column-letter band on top (index 0 of the row table).
    pub header_row_height: f64,
    /// Column width used when the engine reports none.
    pub default_column_width: u32,
    /// Row height used when the engine reports none.
    pub default_row_height: u32,
    /// Smallest size a resize drag may produce.
    pub min_column_width: u32,
    pub min_row_height: u32,
    /// Thickness of the line drawn after frozen rows/columns.
    pub frozen_separator_width: f64,
    /// Side of the square fill handle drawn at the selection corner.
    pub fill_handle_size: f64,
    /// Extra slack around the fill handle that still counts as a hit.
    pub fill_handle_slack: f64,
    /// Grab width of the trailing edge of a header cell for resizing.
    pub resize_handle_width: f64,
    pub last_row: u32,
    pub last_column: u32,
    pub font_family: String,
    pub font_size: f64,
    pub header_font_size: f64,
    /// Horizontal padding inside a cell.
    pub cell_padding: f64,
    pub colors: GridColors,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            header_column_width: 30.0,
            header_row_height: 28.0,
            default_column_width: 100,
            default_row_height: 24,
            min_column_width: 5,
            min_row_height: 5,
            frozen_separator_width: 3.0,
            fill_handle_size: 5.0,
            fill_handle_slack: 3.0,
            resize_handle_width: 4.0,
            last_row: LAST_ROW,
            last_column: LAST_COLUMN,
            font_family: "Inter, \"Adjusted Arial Fallback\", sans-serif".to_string(),
            font_size: 13.0,
            header_font_size: 12.0,
            cell_padding: 4.0,
            colors: GridColors::default(),
        }
    }
}

impl GridConfig {
    /// Decode a (partial) JSON configuration. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// CSS font shorthand for cell text.
    pub fn cell_font(&self, size: f64, bold: bool, italic: bool) -> String {
        let style = if italic { "italic " } else { "" };
        let weight = if bold { "bold" } else { "400" };
        format!("{style}{weight} {size}px {}", self.font_family)
    }

    /// CSS font shorthand for header labels.
    pub fn header_font(&self) -> String {
        format!("500 {}px {}", self.header_font_size, self.font_family)
    }
}
