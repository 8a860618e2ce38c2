use serde::{Deserialize, Serialize};

/// A cell address. Rows and columns are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellAddress {
    pub sheet: u32,
    pub row: u32,
    pub column: u32,
}

impl CellAddress {
    pub fn new(sheet: u32, row: u32, column: u32) -> Self {
        Self { sheet, row, column }
    }
}

/// A rectangular range of cells.
///
/// Start and end are not normalized: `row_start > row_end` encodes a selection
/// dragged upwards. Use [`Area::normalized`] or [`Area::bounds`] before deriving
/// geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Area {
    pub row_start: u32,
    pub row_end: u32,
    pub column_start: u32,
    pub column_end: u32,
}

impl Area {
    pub fn new(row_start: u32, column_start: u32, row_end: u32, column_end: u32) -> Self {
        Self {
            row_start,
            row_end,
            column_start,
            column_end,
        }
    }

    /// A 1x1 area.
    pub fn cell(row: u32, column: u32) -> Self {
        Self::new(row, column, row, column)
    }

    /// Normalized bounds as `(min_row, min_col, max_row, max_col)`.
    pub fn bounds(&self) -> (u32, u32, u32, u32) {
        (
            self.row_start.min(self.row_end),
            self.column_start.min(self.column_end),
            self.row_start.max(self.row_end),
            self.column_start.max(self.column_end),
        )
    }

    /// Same rectangle with `start <= end` on both axes.
    pub fn normalized(&self) -> Self {
        let (r1, c1, r2, c2) = self.bounds();
        Self::new(r1, c1, r2, c2)
    }

    pub fn height(&self) -> u32 {
        self.row_start.abs_diff(self.row_end) + 1
    }

    pub fn width(&self) -> u32 {
        self.column_start.abs_diff(self.column_end) + 1
    }

    pub fn is_single_cell(&self) -> bool {
        self.row_start == self.row_end && self.column_start == self.column_end
    }

    pub fn contains(&self, row: u32, column: u32) -> bool {
        let (r1, c1, r2, c2) = self.bounds();
        (r1..=r2).contains(&row) && (c1..=c2).contains(&column)
    }

    /// Smallest area covering both.
    pub fn union(&self, other: &Area) -> Self {
        let (r1, c1, r2, c2) = self.bounds();
        let (o1, p1, o2, p2) = other.bounds();
        Self::new(r1.min(o1), c1.min(p1), r2.max(o2), c2.max(p2))
    }
}

/// An area on a specific sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetArea {
    pub sheet: u32,
    #[serde(flatten)]
    pub area: Area,
}

/// What the engine reports as the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedView {
    pub sheet: u32,
    /// Selection anchor.
    pub row: u32,
    pub column: u32,
    /// Selected range, not normalized.
    pub range: Area,
}

impl SelectedView {
    pub fn single(sheet: u32, row: u32, column: u32) -> Self {
        Self {
            sheet,
            row,
            column,
            range: Area::cell(row, column),
        }
    }
}

/// A block of cells as origin plus size, the shape the engine takes for
/// autofill and style updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellBlock {
    pub sheet: u32,
    pub row: u32,
    pub column: u32,
    pub width: u32,
    pub height: u32,
}

impl CellBlock {
    /// Bounding box of a (possibly reversed) selection range.
    pub fn from_range(sheet: u32, range: &Area) -> Self {
        let (row, column, _, _) = range.bounds();
        Self {
            sheet,
            row,
            column,
            width: range.width(),
            height: range.height(),
        }
    }
}

/// Direction of a fill-handle drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExtendDirection {
    RowsDown,
    RowsUp,
    ColumnsRight,
    ColumnsLeft,
}

/// The cells a fill-handle drag currently covers, outside the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendToArea {
    pub direction: ExtendDirection,
    pub area: Area,
}

/// Type of selection for row/column headers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionType {
    /// Standard cell selection (default)
    #[default]
    CellRange,
    /// Entire row(s) selected
    RowRange,
    /// Entire column(s) selected
    ColumnRange,
    /// All cells selected (corner click)
    All,
}

impl SelectionType {
    /// Classify a range against the sheet limits.
    pub fn of(range: &Area, last_row: u32, last_column: u32) -> Self {
        let (r1, c1, r2, c2) = range.bounds();
        let full_rows = r1 == 1 && r2 == last_row;
        let full_columns = c1 == 1 && c2 == last_column;
        match (full_rows, full_columns) {
            (true, true) => Self::All,
            (true, false) => Self::ColumnRange,
            (false, true) => Self::RowRange,
            (false, false) => Self::CellRange,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_order_independent() {
        let a = Area::new(2, 2, 5, 4);
        let b = Area::new(5, 4, 2, 2);
        assert_eq!(a.normalized(), b.normalized());
        assert_eq!(a.width(), 3);
        assert_eq!(b.height(), 4);
    }

    #[test]
    fn union_covers_both() {
        let a = Area::new(2, 2, 4, 4);
        let b = Area::new(5, 2, 7, 4);
        assert_eq!(a.union(&b), Area::new(2, 2, 7, 4));
    }

    #[test]
    fn cell_block_uses_bounding_box() {
        let area = CellBlock::from_range(0, &Area::new(4, 3, 2, 2));
        assert_eq!(
            area,
            CellBlock {
                sheet: 0,
                row: 2,
                column: 2,
                width: 2,
                height: 3
            }
        );
    }

    #[test]
    fn selection_type_classification() {
        assert_eq!(
            SelectionType::of(&Area::new(1, 3, 100, 3), 100, 50),
            SelectionType::ColumnRange
        );
        assert_eq!(
            SelectionType::of(&Area::new(4, 1, 4, 50), 100, 50),
            SelectionType::RowRange
        );
        assert_eq!(
            SelectionType::of(&Area::new(1, 1, 100, 50), 100, 50),
            SelectionType::All
        );
    }
}
