use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::compare::markets::{MarketsSummary, compare_three_table};
use crate::compare::merge::merge_two_table;
use crate::compare::periods::{PeriodsSummary, compare_four_table};
use crate::compare::scan::{ScanSummary, scan_marked_rows};
use crate::compare::{FOUR_TABLE_SHEET, THREE_TABLE_SHEET, TWO_TABLE_SHEET};
use crate::config::CompareConfig;
use crate::error::Result;
use crate::io::{excel_read, excel_write};
use crate::model::Workbook;
use crate::report::{Report, assemble_report};

/// Counts describing one comparison run. Comparators without a result
/// report `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub threshold: f64,
    pub sheets: Vec<String>,
    pub flagged: ScanSummary,
    pub fact_rows: Option<usize>,
    pub markets: Option<MarketsSummary>,
    pub periods: Option<PeriodsSummary>,
}

/// Report produced by one run together with its summary.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub report: Report,
    pub summary: RunSummary,
}

/// Runs every comparator over two in-memory workbooks and assembles the
/// report. The comparators run one after another and only read their inputs.
#[instrument(level = "info", skip_all, fields(threshold = config.threshold))]
pub fn compare_workbooks(
    current: &Workbook,
    previous: &Workbook,
    config: &CompareConfig,
) -> Comparison {
    let scan = scan_marked_rows(current, previous, &config.markers);
    info!(
        matched_rows = scan.summary.matched_rows,
        sheets = scan.summary.sheets_with_matches,
        "scanned for flagged rows"
    );

    let fact = merge_two_table(current, previous);
    if fact.is_none() {
        warn!(sheet = TWO_TABLE_SHEET, "sheet missing in one workbook, skipping merge");
    }

    let markets = compare_three_table(current, previous, config.threshold);
    match &markets {
        Some(outcome) => info!(
            matched = outcome.summary.matched,
            unmatched = outcome.summary.unmatched,
            not_ok = outcome.summary.not_ok,
            "markets compared"
        ),
        None => warn!(sheet = THREE_TABLE_SHEET, "sheet missing in one workbook, skipping markets"),
    }

    let periods = compare_four_table(current, previous, config.threshold);
    match &periods {
        Some(outcome) => info!(
            periods = outcome.summary.periods,
            above_threshold = outcome.summary.above_threshold,
            "periods compared"
        ),
        None => warn!(sheet = FOUR_TABLE_SHEET, "sheet missing in one workbook, skipping periods"),
    }

    let (markets_table, markets_summary) = match markets {
        Some(outcome) => (Some(outcome.table), Some(outcome.summary)),
        None => (None, None),
    };
    let (periods_table, periods_summary) = match periods {
        Some(outcome) => (Some(outcome.table), Some(outcome.summary)),
        None => (None, None),
    };
    let fact_rows = fact.as_ref().map(|sheet| sheet.len());

    let report = assemble_report(scan.table, fact, markets_table, periods_table);
    debug!(sheets = ?report.sheet_names(), "report assembled");

    let summary = RunSummary {
        threshold: config.threshold,
        sheets: report.sheet_names().into_iter().map(String::from).collect(),
        flagged: scan.summary,
        fact_rows,
        markets: markets_summary,
        periods: periods_summary,
    };

    Comparison { report, summary }
}

/// Loads both workbooks, compares them and writes the report to `output`.
#[instrument(
    level = "info",
    skip_all,
    fields(
        current = %current.display(),
        previous = %previous.display(),
        output = %output.display()
    )
)]
pub fn compare_files(
    current: &Path,
    previous: &Path,
    output: &Path,
    config: &CompareConfig,
) -> Result<RunSummary> {
    config.validate()?;
    let current = excel_read::read_workbook(current)?;
    let previous = excel_read::read_workbook(previous)?;
    info!(
        current_sheets = current.sheets.len(),
        previous_sheets = previous.sheets.len(),
        "workbooks loaded"
    );

    let comparison = compare_workbooks(&current, &previous, config);
    excel_write::write_report(output, &comparison.report)?;
    info!("report written");
    Ok(comparison.summary)
}

/// Persists the run summary as pretty-printed JSON.
#[instrument(level = "debug", skip(summary), fields(output = %output.display()))]
pub fn write_summary(output: &Path, summary: &RunSummary) -> Result<()> {
    let json_string = serde_json::to_string_pretty(summary)?;
    fs::write(output, json_string)?;
    Ok(())
}
