use serde::Serialize;
use tracing::debug;

use crate::model::{Row, Sheet, Workbook};

/// Phrases that flag a row for review unless configured otherwise.
pub const DEFAULT_MARKERS: [&str; 2] = ["Bad value", "To be correct"];

/// Position of the row that provides header context for flagged rows
/// (spreadsheet row 9).
pub const HEADER_CONTEXT_ROW: usize = 8;

/// Counts gathered while scanning for flagged rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScanSummary {
    pub matched_rows: usize,
    pub sheets_with_matches: usize,
}

/// Flagged rows of both workbooks, each sheet's block led by one header row.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanOutcome {
    pub table: Sheet,
    pub summary: ScanSummary,
}

/// Collects every row of every sheet in both workbooks containing one of the
/// markers, case-insensitively, in any cell.
///
/// The current workbook's sheets come first, each in native order. The first
/// match of a sheet is preceded by that sheet's header context: row 9 when the
/// sheet reaches that far, otherwise its positional column labels. An empty
/// table means nothing matched.
pub fn scan_marked_rows(current: &Workbook, previous: &Workbook, markers: &[String]) -> ScanOutcome {
    let needles: Vec<String> = markers.iter().map(|marker| marker.to_lowercase()).collect();
    let mut rows: Vec<Row> = Vec::new();
    let mut summary = ScanSummary::default();

    for (label, workbook) in [("current", current), ("previous", previous)] {
        for (name, sheet) in workbook.iter() {
            let width = sheet.width();
            let mut header_emitted = false;
            for (index, row) in sheet.rows.iter().enumerate() {
                if !row_matches(row, &needles) {
                    continue;
                }
                if !header_emitted {
                    rows.push(header_context(sheet, width));
                    header_emitted = true;
                    summary.sheets_with_matches += 1;
                }
                rows.push(sheet.padded_row_to(index, width));
                summary.matched_rows += 1;
                debug!(workbook = label, sheet = name, row = index, "flagged row");
            }
        }
    }

    ScanOutcome {
        table: Sheet::new(rows),
        summary,
    }
}

fn row_matches(row: &Row, needles: &[String]) -> bool {
    row.iter().any(|cell| {
        let haystack = cell.display().to_lowercase();
        needles.iter().any(|needle| haystack.contains(needle.as_str()))
    })
}

fn header_context(sheet: &Sheet, width: usize) -> Row {
    if sheet.len() > HEADER_CONTEXT_ROW {
        sheet.padded_row_to(HEADER_CONTEXT_ROW, width)
    } else {
        sheet.column_labels()
    }
}
