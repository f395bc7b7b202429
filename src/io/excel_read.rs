use std::path::Path;

use calamine::{DataType, Reader, Xlsx, open_workbook};
use tracing::{debug, instrument};

use crate::error::{Result, ToolError};
use crate::model::{Cell, Row, Sheet, Workbook};

/// File extensions the Excel reader can open.
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["xlsx", "xlsm"];

/// Reads every worksheet of an Excel workbook, in native sheet order.
///
/// No header row is inferred. Cells keep their absolute spreadsheet position:
/// when the used range does not start at `A1` the leading rows and columns are
/// padded with empty cells, so row index 8 is always spreadsheet row 9.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn read_workbook(path: &Path) -> Result<Workbook> {
    if !path.exists() {
        return Err(ToolError::MissingInput(path.to_path_buf()));
    }
    ensure_supported(path)?;

    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let sheet_names = workbook.sheet_names().to_owned();

    let mut result = Workbook::new();
    for name in sheet_names {
        let range = workbook
            .worksheet_range(&name)
            .ok_or_else(|| ToolError::InvalidWorkbook(format!("missing sheet '{name}'")))?
            .map_err(ToolError::from)?;
        let sheet = range_to_sheet(&range);
        debug!(sheet = %name, rows = sheet.len(), "sheet loaded");
        result.insert_sheet(name, sheet);
    }

    Ok(result)
}

fn ensure_supported(path: &Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(())
    } else {
        Err(ToolError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension,
        })
    }
}

fn range_to_sheet(range: &calamine::Range<DataType>) -> Sheet {
    let Some((start_row, start_col)) = range.start() else {
        return Sheet::default();
    };

    let mut rows: Vec<Row> = vec![Vec::new(); start_row as usize];
    for cells in range.rows() {
        let mut row: Row = vec![Cell::Empty; start_col as usize];
        row.extend(cells.iter().map(data_to_cell));
        rows.push(row);
    }

    Sheet::new(rows)
}

fn data_to_cell(data: &DataType) -> Cell {
    match data {
        DataType::Empty => Cell::Empty,
        DataType::String(value) => Cell::Text(value.clone()),
        DataType::Float(value) => Cell::Number(*value),
        DataType::Int(value) => Cell::Number(*value as f64),
        DataType::Bool(value) => Cell::Boolean(*value),
        DataType::DateTime(_) | DataType::DateTimeIso(_) => data
            .as_datetime()
            .map(Cell::DateTime)
            .unwrap_or_else(|| Cell::Text(data.to_string())),
        other => Cell::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn rejects_formats_without_a_reader() {
        let temp_dir = tempfile::tempdir().expect("temporary directory");
        let path = temp_dir.path().join("legacy.xls");
        std::fs::write(&path, b"not a workbook").expect("file written");

        let error = read_workbook(&path).expect_err("xls is unsupported");
        assert!(matches!(
            error,
            ToolError::UnsupportedFormat { ref extension, .. } if extension == "xls"
        ));
        assert!(error.to_string().contains(".xlsx"));
    }

    #[test]
    fn missing_file_is_reported() {
        let path = PathBuf::from("/definitely/not/here.xlsx");
        assert!(matches!(
            read_workbook(&path),
            Err(ToolError::MissingInput(missing)) if missing == path
        ));
    }

    #[test]
    fn converts_scalar_types() {
        assert_eq!(data_to_cell(&DataType::Int(4)), Cell::Number(4.0));
        assert_eq!(
            data_to_cell(&DataType::String("x".into())),
            Cell::from("x")
        );
        assert_eq!(data_to_cell(&DataType::Empty), Cell::Empty);
        assert_eq!(data_to_cell(&DataType::Bool(false)), Cell::Boolean(false));
    }

    #[test]
    fn date_cells_keep_their_type() {
        let expected = chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .expect("valid date");
        assert_eq!(
            data_to_cell(&DataType::DateTime(45292.0)),
            Cell::DateTime(expected)
        );
        assert_eq!(
            data_to_cell(&DataType::DateTimeIso("2024-01-01T00:00:00".into())),
            Cell::DateTime(expected)
        );
    }
}
