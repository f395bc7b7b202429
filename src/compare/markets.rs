use serde::Serialize;
use tracing::debug;

use crate::model::{Cell, NOT_AVAILABLE, Row, Sheet, Workbook};

use super::{COMPARED_COLUMNS, THREE_TABLE_SHEET, key_index, percent_cell, percent_change};

/// Key column holding the market name.
pub const MARKET_KEY_COLUMN: usize = 0;
/// Status written when every compared column is within the threshold.
pub const STATUS_OK: &str = "OK";
/// Status written when a compared column differs or cannot be compared.
pub const STATUS_NOT_OK: &str = "Not OK";
/// Trailing header labels appended after both tables' columns.
pub const RESULT_LABELS: [&str; 4] = ["Status", "% Diff D", "% Diff E", "% Diff F"];

/// Counts gathered while comparing markets.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MarketsSummary {
    pub matched: usize,
    pub unmatched: usize,
    pub not_ok: usize,
}

/// Market comparison table and its counts.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketsOutcome {
    pub table: Sheet,
    pub summary: MarketsSummary,
}

/// Compares the `3-table` sheets of both workbooks.
///
/// `None` when either workbook lacks the sheet.
pub fn compare_three_table(
    current: &Workbook,
    previous: &Workbook,
    threshold: f64,
) -> Option<MarketsOutcome> {
    let current = current.sheet(THREE_TABLE_SHEET)?;
    let previous = previous.sheet(THREE_TABLE_SHEET)?;
    Some(compare_markets(current, previous, threshold))
}

/// Matches each current row to the previous row with the same market name
/// and reports the change on columns D, E and F relative to the current
/// value.
///
/// Output keeps the current table's row order; markets found only in the
/// previous table are not reported.
pub fn compare_markets(current: &Sheet, previous: &Sheet, threshold: f64) -> MarketsOutcome {
    let previous_index = key_index(previous, MARKET_KEY_COLUMN);
    let current_width = current.width();
    let previous_width = previous.width();
    let mut summary = MarketsSummary::default();

    let mut header = current.column_labels();
    header.push(Cell::text(""));
    header.extend(previous.column_labels());
    header.extend(RESULT_LABELS.iter().map(|label| Cell::text(*label)));
    let mut rows: Vec<Row> = vec![header];

    for index in 0..current.len() {
        let market = current.cell(index, MARKET_KEY_COLUMN).key();
        if market.is_empty() {
            continue;
        }

        let mut row = current.padded_row_to(index, current_width);
        row.push(Cell::text(""));

        let (status, diffs) = match previous_index.get(&market) {
            Some(&previous_row) => {
                summary.matched += 1;
                row.extend(previous.padded_row_to(previous_row, previous_width));
                let mut differs = false;
                let diffs: Vec<Cell> = COMPARED_COLUMNS
                    .iter()
                    .map(|&col| {
                        let change = percent_change(
                            previous.cell(previous_row, col),
                            current.cell(index, col),
                        );
                        if change.is_none_or(|value| value.abs() > threshold) {
                            differs = true;
                        }
                        percent_cell(change)
                    })
                    .collect();
                let status = if differs { STATUS_NOT_OK } else { STATUS_OK };
                (status, diffs)
            }
            None => {
                summary.unmatched += 1;
                row.extend(std::iter::repeat_n(Cell::text(""), previous_width));
                let diffs = vec![Cell::text(NOT_AVAILABLE); COMPARED_COLUMNS.len()];
                (STATUS_NOT_OK, diffs)
            }
        };

        if status == STATUS_NOT_OK {
            summary.not_ok += 1;
        }
        debug!(%market, status, "market compared");
        row.push(Cell::text(status));
        row.extend(diffs);
        rows.push(row);
    }

    MarketsOutcome {
        table: Sheet::new(rows),
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn market(name: &str, d: f64, e: f64, f: f64) -> Row {
        vec![
            Cell::text(name),
            Cell::text("x"),
            Cell::text("y"),
            Cell::Number(d),
            Cell::Number(e),
            Cell::Number(f),
        ]
    }

    fn tail(row: &Row) -> Vec<String> {
        row[row.len() - 4..].iter().map(Cell::display).collect()
    }

    #[test]
    fn header_lists_both_tables_and_result_labels() {
        let current = Sheet::new(vec![market("A", 1.0, 1.0, 1.0)]);
        let previous = Sheet::new(vec![vec![Cell::text("A")]]);
        let outcome = compare_markets(&current, &previous, 5.0);
        let header: Vec<String> = outcome.table.rows[0].iter().map(Cell::display).collect();
        assert_eq!(
            header,
            vec![
                "0", "1", "2", "3", "4", "5", "", "0", "Status", "% Diff D", "% Diff E",
                "% Diff F"
            ]
        );
    }

    #[test]
    fn change_is_relative_to_current_value() {
        let current = Sheet::new(vec![market("North", 100.0, 200.0, 50.0)]);
        let previous = Sheet::new(vec![market(" North ", 105.0, 200.0, 49.0)]);
        let outcome = compare_markets(&current, &previous, 5.0);

        let row = &outcome.table.rows[1];
        assert_eq!(row.len(), 6 + 1 + 6 + 4);
        assert_eq!(row[6], Cell::text(""));
        assert_eq!(row[7], Cell::text(" North "));
        assert_eq!(tail(row), vec!["OK", "5.00%", "0.00%", "-2.00%"]);
        assert_eq!(outcome.summary.matched, 1);
        assert_eq!(outcome.summary.not_ok, 0);
    }

    #[test]
    fn zero_or_text_baseline_is_not_ok() {
        let current = Sheet::new(vec![market("South", 0.0, 10.0, 10.0)]);
        let previous = Sheet::new(vec![market("South", 5.0, 10.0, 10.0)]);
        let outcome = compare_markets(&current, &previous, 5.0);
        assert_eq!(tail(&outcome.table.rows[1]), vec!["Not OK", "N/A", "0.00%", "0.00%"]);

        let mut previous_row = market("South", 0.0, 10.0, 10.0);
        previous_row[4] = Cell::text("pending");
        let outcome = compare_markets(&current, &Sheet::new(vec![previous_row]), 5.0);
        assert_eq!(tail(&outcome.table.rows[1]), vec!["Not OK", "N/A", "N/A", "0.00%"]);
    }

    #[test]
    fn threshold_decides_status() {
        let current = Sheet::new(vec![market("East", 100.0, 100.0, 100.0)]);
        let previous = Sheet::new(vec![market("East", 110.0, 100.0, 100.0)]);
        assert_eq!(
            tail(&compare_markets(&current, &previous, 5.0).table.rows[1])[0],
            STATUS_NOT_OK
        );
        assert_eq!(
            tail(&compare_markets(&current, &previous, 15.0).table.rows[1])[0],
            STATUS_OK
        );
    }

    #[test]
    fn unmatched_market_gets_blank_previous_columns() {
        let current = Sheet::new(vec![market("West", 1.0, 1.0, 1.0)]);
        let previous = Sheet::new(vec![market("North", 1.0, 1.0, 1.0)]);
        let outcome = compare_markets(&current, &previous, 5.0);
        let row = &outcome.table.rows[1];
        assert!(row[7..13].iter().all(|cell| *cell == Cell::text("")));
        assert_eq!(tail(row), vec!["Not OK", "N/A", "N/A", "N/A"]);
        assert_eq!(outcome.summary.unmatched, 1);
    }

    #[test]
    fn duplicate_previous_market_uses_last_row_and_blank_keys_are_skipped() {
        let current = Sheet::new(vec![
            vec![Cell::text("  ")],
            market("Dup", 100.0, 100.0, 100.0),
        ]);
        let previous = Sheet::new(vec![
            market("Dup", 100.0, 100.0, 100.0),
            market("Dup", 150.0, 100.0, 100.0),
        ]);
        let outcome = compare_markets(&current, &previous, 5.0);
        assert_eq!(outcome.table.len(), 2);
        assert_eq!(tail(&outcome.table.rows[1])[1], "50.00%");
    }

    #[test]
    fn short_matched_row_reads_missing_columns_as_not_available() {
        let current = Sheet::new(vec![market("North", 1.0, 1.0, 1.0)]);
        let previous = Sheet::new(vec![vec![Cell::text("North"), Cell::text("brand")]]);
        let outcome = compare_markets(&current, &previous, 5.0);

        let row = &outcome.table.rows[1];
        assert_eq!(row.len(), 6 + 1 + 2 + 4);
        assert_eq!(row[7], Cell::text("North"));
        assert_eq!(tail(row), vec!["Not OK", "N/A", "N/A", "N/A"]);
        assert_eq!(outcome.summary.matched, 1);
        assert_eq!(outcome.summary.not_ok, 1);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let current = Sheet::new(vec![market("A", 3.0, 0.0, 7.0), market("B", 1.0, 2.0, 3.0)]);
        let previous = Sheet::new(vec![market("B", 2.0, 2.0, 2.0)]);
        assert_eq!(
            compare_markets(&current, &previous, 1.0),
            compare_markets(&current, &previous, 1.0)
        );
    }

    #[test]
    fn missing_sheet_gives_no_result() {
        let with = Workbook::new().with_sheet(THREE_TABLE_SHEET, Sheet::default());
        assert!(compare_three_table(&with, &Workbook::new(), 5.0).is_none());
        assert!(compare_three_table(&with, &with, 5.0).is_some());
    }
}
