//! Table comparators. Each one reads the two input workbooks independently and
//! produces a derived table plus a small count summary; none of them depends
//! on another's output.

pub mod markets;
pub mod merge;
pub mod periods;
pub mod scan;

use std::collections::HashMap;

use crate::model::{Cell, NOT_AVAILABLE, Sheet};

/// Sheet merged side by side into the `Fact` output.
pub const TWO_TABLE_SHEET: &str = "2-table";
/// Sheet holding market-keyed rows.
pub const THREE_TABLE_SHEET: &str = "3-table";
/// Sheet holding period-keyed rows.
pub const FOUR_TABLE_SHEET: &str = "4-table";

/// Metric columns compared by both keyed comparators (spreadsheet D, E, F).
pub const COMPARED_COLUMNS: [usize; 3] = [3, 4, 5];

/// Percentage change of `value` relative to `baseline`.
///
/// `None` when either side is not numeric or the baseline is zero.
pub fn percent_change(value: &Cell, baseline: &Cell) -> Option<f64> {
    let baseline = baseline.as_number()?;
    let value = value.as_number()?;
    if baseline == 0.0 {
        return None;
    }
    Some((value - baseline) / baseline * 100.0)
}

/// Formats a percentage with two decimals, e.g. `5.00%`.
pub fn format_percent(percent: f64) -> String {
    format!("{percent:.2}%")
}

/// Text cell for a computed percentage, or `N/A`.
pub(crate) fn percent_cell(percent: Option<f64>) -> Cell {
    match percent {
        Some(value) => Cell::Text(format_percent(value)),
        None => Cell::text(NOT_AVAILABLE),
    }
}

/// Maps the trimmed key in `key_col` to its row index. Blank keys are left
/// out and a repeated key keeps the last row carrying it.
pub(crate) fn key_index(sheet: &Sheet, key_col: usize) -> HashMap<String, usize> {
    let mut index = HashMap::new();
    for row in 0..sheet.len() {
        let key = sheet.cell(row, key_col).key();
        if !key.is_empty() {
            index.insert(key, row);
        }
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_change_uses_baseline_as_divisor() {
        let change = percent_change(&Cell::Number(105.0), &Cell::Number(100.0));
        assert_eq!(change.map(format_percent).as_deref(), Some("5.00%"));
        let change = percent_change(&Cell::Number(90.0), &Cell::text("100"));
        assert_eq!(change.map(format_percent).as_deref(), Some("-10.00%"));
    }

    #[test]
    fn percent_change_is_undefined_for_zero_or_text() {
        assert_eq!(percent_change(&Cell::Number(5.0), &Cell::Number(0.0)), None);
        assert_eq!(percent_change(&Cell::text("n/a"), &Cell::Number(1.0)), None);
        assert_eq!(percent_change(&Cell::Number(1.0), &Cell::Empty), None);
    }

    #[test]
    fn key_index_trims_skips_blanks_and_keeps_last() {
        let sheet = Sheet::new(vec![
            vec![Cell::text(" North ")],
            vec![Cell::text("   ")],
            vec![Cell::Empty],
            vec![Cell::text("North")],
            vec![Cell::Number(2023.0)],
        ]);
        let index = key_index(&sheet, 0);
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("North"), Some(&3));
        assert_eq!(index.get("2023"), Some(&4));
    }
}
