use crate::model::{Cell, Row, Sheet, Workbook};

use super::TWO_TABLE_SHEET;

/// Blank columns placed between the two merged tables.
pub const GAP_WIDTH: usize = 2;

/// Places the current and previous `2-table` sheets side by side.
///
/// `None` when either workbook lacks the sheet.
pub fn merge_two_table(current: &Workbook, previous: &Workbook) -> Option<Sheet> {
    let left = current.sheet(TWO_TABLE_SHEET)?;
    let right = previous.sheet(TWO_TABLE_SHEET)?;
    Some(merge_side_by_side(left, right))
}

/// Concatenates `left`, a blank gap and `right` row by row.
///
/// Rows are aligned by position only. When one table is shorter, its side of
/// the trailing rows stays empty; the gap is blank text only next to rows
/// that exist in `left`.
pub fn merge_side_by_side(left: &Sheet, right: &Sheet) -> Sheet {
    let left_width = left.width();
    let right_width = right.width();
    let height = left.len().max(right.len());

    let rows = (0..height)
        .map(|index| {
            let mut row: Row = Vec::with_capacity(left_width + GAP_WIDTH + right_width);
            if index < left.len() {
                row.extend(left.padded_row_to(index, left_width));
                row.extend(std::iter::repeat_n(Cell::text(""), GAP_WIDTH));
            } else {
                row.resize(left_width + GAP_WIDTH, Cell::Empty);
            }
            if index < right.len() {
                row.extend(right.padded_row_to(index, right_width));
            } else {
                row.resize(left_width + GAP_WIDTH + right_width, Cell::Empty);
            }
            row
        })
        .collect();

    Sheet::new(rows)
}
