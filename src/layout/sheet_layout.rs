//! Row and column geometry for one sheet.
//!
//! Sizes are stored sparsely: a default size plus per-index overrides, so a
//! sheet with a million rows costs nothing until rows are resized. Start
//! offsets are answered from a cumulative table of deltas against the default,
//! built lazily and dropped on every mutation. Lookups are O(log k) in the
//! number of overridden indices.

use std::cell::OnceCell;
use std::collections::{BTreeMap, BTreeSet};

use crate::config::GridConfig;

/// Which table a resize or hide applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Row,
    Column,
}

/// Sizes of the rows (or columns) `1..=len` of a sheet.
#[derive(Debug, Clone)]
pub struct SizeTable {
    default_size: u32,
    len: u32,
    overrides: BTreeMap<u32, u32>,
    hidden: BTreeSet<u32>,
    /// `(index, sum of (size - default) over all special indices <= index)`
    cumulative: OnceCell<Vec<(u32, i64)>>,
}

impl SizeTable {
    pub fn new(default_size: u32, len: u32) -> Self {
        Self {
            default_size,
            len,
            overrides: BTreeMap::new(),
            hidden: BTreeSet::new(),
            cumulative: OnceCell::new(),
        }
    }

    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn default_size(&self) -> u32 {
        self.default_size
    }

    /// Size as drawn: 0 for hidden indices.
    pub fn size(&self, index: u32) -> u32 {
        if index == 0 || index > self.len || self.hidden.contains(&index) {
            return 0;
        }
        self.stored_size(index)
    }

    /// Size ignoring the hidden flag.
    pub fn stored_size(&self, index: u32) -> u32 {
        self.overrides
            .get(&index)
            .copied()
            .unwrap_or(self.default_size)
    }

    pub fn is_hidden(&self, index: u32) -> bool {
        self.hidden.contains(&index)
    }

    pub fn set_size(&mut self, index: u32, size: u32) {
        if index == 0 || index > self.len {
            return;
        }
        if size == self.default_size {
            self.overrides.remove(&index);
        } else {
            self.overrides.insert(index, size);
        }
        self.cumulative = OnceCell::new();
    }

    pub fn set_hidden(&mut self, index: u32, hidden: bool) {
        if index == 0 || index > self.len {
            return;
        }
        let changed = if hidden {
            self.hidden.insert(index)
        } else {
            self.hidden.remove(&index)
        };
        if changed {
            self.cumulative = OnceCell::new();
        }
    }

    fn deltas(&self) -> &[(u32, i64)] {
        self.cumulative.get_or_init(|| {
            let special: BTreeSet<u32> = self
                .overrides
                .keys()
                .chain(self.hidden.iter())
                .copied()
                .collect();
            let mut sum = 0i64;
            special
                .into_iter()
                .map(|index| {
                    sum += i64::from(self.size(index)) - i64::from(self.default_size);
                    (index, sum)
                })
                .collect()
        })
    }

    /// Offset of the leading edge of `index`, measured from the leading edge of
    /// index 1. `start(len + 1)` is the total extent.
    pub fn start(&self, index: u32) -> u64 {
        let index = index.clamp(1, self.len.saturating_add(1));
        let deltas = self.deltas();
        let before = deltas.partition_point(|(i, _)| *i < index);
        let delta = before
            .checked_sub(1)
            .and_then(|k| deltas.get(k))
            .map_or(0, |(_, d)| *d);
        let base = i64::from(index - 1) * i64::from(self.default_size);
        u64::try_from(base + delta).unwrap_or(0)
    }

    /// Total extent of `first..=last`.
    pub fn span(&self, first: u32, last: u32) -> u64 {
        if last < first {
            return 0;
        }
        self.start(last.saturating_add(1)) - self.start(first)
    }

    pub fn total(&self) -> u64 {
        self.start(self.len.saturating_add(1))
    }

    /// Index whose extent contains `offset`. Hidden indices are never
    /// returned; `None` past the end.
    pub fn index_at(&self, offset: u64) -> Option<u32> {
        if self.len == 0 || offset >= self.total() {
            return None;
        }
        // Largest index whose start is <= offset. Hidden indices share their
        // start with the next visible one, so this lands on a visible index.
        let (mut lo, mut hi) = (1u32, self.len);
        while lo < hi {
            let mid = lo + (hi - lo + 1) / 2;
            if self.start(mid) <= offset {
                lo = mid;
            } else {
                hi = mid - 1;
            }
        }
        (self.size(lo) > 0).then_some(lo)
    }
}

/// Geometry of the sheet currently shown.
#[derive(Debug, Clone)]
pub struct SheetLayout {
    pub columns: SizeTable,
    pub rows: SizeTable,
    /// Number of frozen rows (0 = none)
    pub frozen_rows: u32,
    /// Number of frozen columns (0 = none)
    pub frozen_columns: u32,
    /// Width of the row-number band (slot 0 of the column table)
    pub header_width: f64,
    /// Height of the column-letter band (slot 0 of the row table)
    pub header_height: f64,
    pub separator_width: f64,
}

impl SheetLayout {
    pub fn new(config: &GridConfig) -> Self {
        Self {
            columns: SizeTable::new(config.default_column_width, config.last_column),
            rows: SizeTable::new(config.default_row_height, config.last_row),
            frozen_rows: 0,
            frozen_columns: 0,
            header_width: config.header_column_width,
            header_height: config.header_row_height,
            separator_width: config.frozen_separator_width,
        }
    }

    pub fn table(&self, axis: Axis) -> &SizeTable {
        match axis {
            Axis::Row => &self.rows,
            Axis::Column => &self.columns,
        }
    }

    fn table_mut(&mut self, axis: Axis) -> &mut SizeTable {
        match axis {
            Axis::Row => &mut self.rows,
            Axis::Column => &mut self.columns,
        }
    }

    pub fn column_width(&self, column: u32) -> f64 {
        f64::from(self.columns.size(column))
    }

    pub fn row_height(&self, row: u32) -> f64 {
        f64::from(self.rows.size(row))
    }

    pub fn max_row(&self) -> u32 {
        self.rows.len()
    }

    pub fn max_column(&self) -> u32 {
        self.columns.len()
    }

    pub fn set_frozen(&mut self, rows: u32, columns: u32) {
        self.frozen_rows = rows.min(self.rows.len());
        self.frozen_columns = columns.min(self.columns.len());
    }

    /// Width of the frozen columns including the separator; 0 without frozen columns.
    pub fn frozen_columns_width(&self) -> f64 {
        if self.frozen_columns == 0 {
            return 0.0;
        }
        u64_px(self.columns.span(1, self.frozen_columns)) + self.separator_width
    }

    /// Height of the frozen rows including the separator; 0 without frozen rows.
    pub fn frozen_rows_height(&self) -> f64 {
        if self.frozen_rows == 0 {
            return 0.0;
        }
        u64_px(self.rows.span(1, self.frozen_rows)) + self.separator_width
    }

    /// Extent of the scrollable (non-frozen) columns.
    pub fn scrollable_width(&self) -> f64 {
        u64_px(self.columns.span(self.frozen_columns + 1, self.columns.len()))
    }

    /// Extent of the scrollable (non-frozen) rows.
    pub fn scrollable_height(&self) -> f64 {
        u64_px(self.rows.span(self.frozen_rows + 1, self.rows.len()))
    }

    /// Sets a row height or column width, clamped to `min` so the index stays
    /// clickable. Returns the size applied.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn resize(&mut self, axis: Axis, index: u32, new_size: f64, min: u32) -> u32 {
        // Rounded and clamped into [min, u32::MAX] before the cast.
        let size = new_size
            .round()
            .clamp(f64::from(min.max(1)), f64::from(u32::MAX)) as u32;
        self.table_mut(axis).set_size(index, size);
        size
    }

    pub fn set_hidden(&mut self, axis: Axis, index: u32, hidden: bool) {
        self.table_mut(axis).set_hidden(index, hidden);
    }
}

/// Pixel offsets fit comfortably in an f64 mantissa.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn u64_px(value: u64) -> f64 {
    value as f64
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn default_offsets() {
        let table = SizeTable::new(20, 100);
        assert_eq!(table.start(1), 0);
        assert_eq!(table.start(5), 80);
        assert_eq!(table.total(), 2000);
        assert_eq!(table.index_at(0), Some(1));
        assert_eq!(table.index_at(19), Some(1));
        assert_eq!(table.index_at(20), Some(2));
        assert_eq!(table.index_at(2000), None);
    }

    #[test]
    fn overrides_shift_later_offsets() {
        let mut table = SizeTable::new(20, 100);
        table.set_size(3, 50);
        assert_eq!(table.start(3), 40);
        assert_eq!(table.start(4), 90);
        assert_eq!(table.index_at(89), Some(3));
        assert_eq!(table.index_at(90), Some(4));

        // back to default drops the override
        table.set_size(3, 20);
        assert_eq!(table.start(4), 60);
    }

    #[test]
    fn hidden_indices_are_skipped() {
        let mut table = SizeTable::new(20, 10);
        table.set_hidden(2, true);
        assert_eq!(table.size(2), 0);
        assert_eq!(table.stored_size(2), 20);
        assert_eq!(table.start(2), 20);
        assert_eq!(table.start(3), 20);
        assert_eq!(table.index_at(20), Some(3));
        assert_eq!(table.index_at(19), Some(1));

        table.set_hidden(2, false);
        assert_eq!(table.index_at(20), Some(2));
    }

    #[test]
    fn trailing_hidden_index_is_not_hit() {
        let mut table = SizeTable::new(10, 3);
        table.set_hidden(3, true);
        assert_eq!(table.total(), 20);
        assert_eq!(table.index_at(20), None);
    }

    #[test]
    fn full_sheet_is_sparse() {
        let layout = SheetLayout::new(&GridConfig::default());
        assert_eq!(layout.max_row(), crate::config::LAST_ROW);
        assert_eq!(
            layout.rows.index_at(24 * 1_000_000 + 3),
            Some(1_000_001)
        );
    }

    #[test]
    fn resize_clamps_to_minimum() {
        let mut layout = SheetLayout::new(&GridConfig::default());
        assert_eq!(layout.resize(Axis::Column, 2, 1.2, 5), 5);
        assert_eq!(layout.column_width(2), 5.0);
        assert_eq!(layout.resize(Axis::Row, 4, -30.0, 5), 5);
        assert_eq!(layout.resize(Axis::Row, 4, 40.4, 5), 40);
        assert_eq!(layout.row_height(4), 40.0);
    }

    #[test]
    fn frozen_extent_includes_separator() {
        let mut layout = SheetLayout::new(&GridConfig::default());
        assert_eq!(layout.frozen_rows_height(), 0.0);
        layout.set_frozen(2, 1);
        assert_eq!(layout.frozen_rows_height(), 48.0 + 3.0);
        assert_eq!(layout.frozen_columns_width(), 100.0 + 3.0);
    }
}
