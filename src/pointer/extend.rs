//! Fill-handle direction.

use crate::types::{Area, ExtendDirection, ExtendToArea};

/// Distance of `value` outside `start..=end`, 0 inside.
fn overshoot(value: u32, start: u32, end: u32) -> u32 {
    if value < start {
        start - value
    } else {
        value.saturating_sub(end)
    }
}

/// Which cells a fill-handle drag from `selection` to `(row, column)` covers.
///
/// The pointer extends along the axis it has moved further past; when it is
/// equally far past on both, rows win. The returned area is the band outside
/// the selection only. `None` while the pointer is inside the selection.
pub fn extend_direction(selection: &Area, row: u32, column: u32) -> Option<ExtendToArea> {
    let (r1, c1, r2, c2) = selection.bounds();
    let row_over = overshoot(row, r1, r2);
    let col_over = overshoot(column, c1, c2);

    let (direction, area) = if row > r2 && col_over <= row_over {
        (ExtendDirection::RowsDown, Area::new(r2 + 1, c1, row, c2))
    } else if row < r1 && col_over <= row_over {
        (ExtendDirection::RowsUp, Area::new(row, c1, r1 - 1, c2))
    } else if column > c2 && row_over < col_over {
        (ExtendDirection::ColumnsRight, Area::new(r1, c2 + 1, r2, column))
    } else if column < c1 && row_over < col_over {
        (ExtendDirection::ColumnsLeft, Area::new(r1, column, r2, c1 - 1))
    } else {
        return None;
    };
    Some(ExtendToArea { direction, area })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    // rows 2..=4, columns B..=D
    fn selection() -> Area {
        Area::new(2, 2, 4, 4)
    }

    #[test_case(6, 6, ExtendDirection::RowsDown ; "equal overshoot goes down")]
    #[test_case(1, 1, ExtendDirection::RowsUp ; "equal overshoot goes up")]
    #[test_case(5, 3, ExtendDirection::RowsDown ; "straight down")]
    #[test_case(3, 9, ExtendDirection::ColumnsRight ; "straight right")]
    #[test_case(5, 7, ExtendDirection::ColumnsRight ; "diagonal mostly right")]
    #[test_case(8, 1, ExtendDirection::RowsDown ; "diagonal mostly down")]
    #[test_case(3, 1, ExtendDirection::ColumnsLeft ; "straight left")]
    fn picks_direction(row: u32, column: u32, expected: ExtendDirection) {
        let extend = extend_direction(&selection(), row, column);
        assert_eq!(extend.map(|e| e.direction), Some(expected));
    }

    #[test]
    fn areas_exclude_the_selection() {
        let down = extend_direction(&selection(), 6, 3).map(|e| e.area);
        assert_eq!(down, Some(Area::new(5, 2, 6, 4)));
        let up = extend_direction(&selection(), 1, 3).map(|e| e.area);
        assert_eq!(up, Some(Area::new(1, 2, 1, 4)));
        let left = extend_direction(&selection(), 2, 1).map(|e| e.area);
        assert_eq!(left, Some(Area::new(2, 1, 4, 1)));
    }

    #[test]
    fn inside_is_none() {
        assert_eq!(extend_direction(&selection(), 3, 3), None);
        // reversed selections behave the same
        assert_eq!(extend_direction(&Area::new(4, 4, 2, 2), 4, 2), None);
    }
}
