use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use crate::model::{Cell, NOT_AVAILABLE, Row, Sheet, Workbook};

use super::{COMPARED_COLUMNS, FOUR_TABLE_SHEET, key_index, percent_cell, percent_change};

/// Key column holding the period.
pub const PERIOD_KEY_COLUMN: usize = 1;

/// Counts gathered while comparing periods. The threshold only feeds
/// `above_threshold`; it never changes the table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PeriodsSummary {
    pub periods: usize,
    pub in_both: usize,
    pub current_only: usize,
    pub previous_only: usize,
    pub above_threshold: usize,
    pub unavailable_diffs: usize,
}

/// Period comparison table and its counts.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodsOutcome {
    pub table: Sheet,
    pub summary: PeriodsSummary,
}

/// Compares the `4-table` sheets of both workbooks.
///
/// `None` when either workbook lacks the sheet.
pub fn compare_four_table(
    current: &Workbook,
    previous: &Workbook,
    threshold: f64,
) -> Option<PeriodsOutcome> {
    let current = current.sheet(FOUR_TABLE_SHEET)?;
    let previous = previous.sheet(FOUR_TABLE_SHEET)?;
    Some(compare_periods(current, previous, threshold))
}

/// Fixed header of the period table.
pub fn periods_header() -> Row {
    let mut header = vec![Cell::text("Period")];
    for group in 1..=COMPARED_COLUMNS.len() {
        header.push(Cell::text(format!("Curr {group}")));
        header.push(Cell::text(format!("Prev {group}")));
        header.push(Cell::text(format!("%Diff {group}")));
    }
    header
}

/// Lines up current and previous values per period for columns D, E and F.
///
/// Every period found in either table gets one row, in ascending key order.
/// A side missing the period reads `N/A`. The change is relative to the
/// previous value.
pub fn compare_periods(current: &Sheet, previous: &Sheet, threshold: f64) -> PeriodsOutcome {
    let current_index = key_index(current, PERIOD_KEY_COLUMN);
    let previous_index = key_index(previous, PERIOD_KEY_COLUMN);
    let periods: BTreeSet<&String> = current_index.keys().chain(previous_index.keys()).collect();

    let mut summary = PeriodsSummary {
        periods: periods.len(),
        ..PeriodsSummary::default()
    };
    let mut rows: Vec<Row> = vec![periods_header()];

    for period in periods {
        let current_row = current_index.get(period).copied();
        let previous_row = previous_index.get(period).copied();
        match (current_row, previous_row) {
            (Some(_), Some(_)) => summary.in_both += 1,
            (Some(_), None) => summary.current_only += 1,
            (None, _) => summary.previous_only += 1,
        }

        let mut row = vec![Cell::text(period.as_str())];
        let mut above = false;
        for &col in &COMPARED_COLUMNS {
            let current_value = lookup(current, current_row, col);
            let previous_value = lookup(previous, previous_row, col);
            let change = percent_change(&current_value, &previous_value);
            match change {
                Some(value) if value.abs() > threshold => above = true,
                Some(_) => {}
                None => summary.unavailable_diffs += 1,
            }
            row.push(current_value);
            row.push(previous_value);
            row.push(percent_cell(change));
        }

        if above {
            summary.above_threshold += 1;
        }
        debug!(%period, above_threshold = above, "period compared");
        rows.push(row);
    }

    PeriodsOutcome {
        table: Sheet::new(rows),
        summary,
    }
}

fn lookup(sheet: &Sheet, row: Option<usize>, col: usize) -> Cell {
    match row {
        Some(row) => sheet.cell(row, col).clone(),
        None => Cell::text(NOT_AVAILABLE),
    }
}
