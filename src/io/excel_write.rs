use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet};
use tracing::{debug, instrument};

use crate::error::Result;
use crate::model::{Cell, Sheet};
use crate::report::Report;

/// Number format applied to date cells in the report.
pub const DATETIME_NUMBER_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Writes the report to the given path, one worksheet per report entry.
#[instrument(level = "debug", skip(report), fields(path = %path.display()))]
pub fn write_report(path: &Path, report: &Report) -> Result<()> {
    let mut workbook = build_workbook(report)?;
    workbook.save(path)?;
    Ok(())
}

/// Serialises the report into an in-memory `.xlsx` container.
pub fn report_to_buffer(report: &Report) -> Result<Vec<u8>> {
    let mut workbook = build_workbook(report)?;
    Ok(workbook.save_to_buffer()?)
}

fn build_workbook(report: &Report) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format(DATETIME_NUMBER_FORMAT);

    for entry in &report.sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&entry.name)?;
        write_sheet(worksheet, &entry.sheet, &date_format)?;
        debug!(sheet = %entry.name, rows = entry.sheet.len(), "worksheet written");
    }

    Ok(workbook)
}

// Rows land exactly as given: no header row and no index column are added.
fn write_sheet(worksheet: &mut Worksheet, sheet: &Sheet, date_format: &Format) -> Result<()> {
    for (row_idx, row) in sheet.rows.iter().enumerate() {
        let row_idx = row_idx as u32;
        for (col_idx, cell) in row.iter().enumerate() {
            let col_idx = col_idx as u16;
            match cell {
                Cell::Empty => {}
                Cell::Text(value) => {
                    worksheet.write_string(row_idx, col_idx, value)?;
                }
                Cell::Number(value) => {
                    worksheet.write_number(row_idx, col_idx, *value)?;
                }
                Cell::Boolean(value) => {
                    worksheet.write_boolean(row_idx, col_idx, *value)?;
                }
                Cell::DateTime(value) => {
                    worksheet.write_datetime_with_format(row_idx, col_idx, value, date_format)?;
                }
            }
        }
    }
    Ok(())
}
