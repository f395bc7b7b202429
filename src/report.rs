use crate::model::{Cell, Sheet};

/// Output sheet holding flagged rows.
pub const PRODUCT_SHEET: &str = "Product";
/// Output sheet holding the side-by-side merge.
pub const FACT_SHEET: &str = "Fact";
/// Output sheet holding the market comparison.
pub const MARKETS_SHEET: &str = "Markets";
/// Output sheet holding the period comparison.
pub const PERIODS_SHEET: &str = "Periods";
/// Single cell written to `Product` when no row was flagged.
pub const NO_BAD_ROWS_MESSAGE: &str = "No bad rows found";

/// One named sheet of the report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSheet {
    pub name: String,
    pub sheet: Sheet,
}

/// Ordered sheets of the comparison report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    pub sheets: Vec<ReportSheet>,
}

impl Report {
    /// Looks up a report sheet by name.
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| &entry.sheet)
    }

    /// Sheet names in output order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|entry| entry.name.as_str()).collect()
    }

    fn push(&mut self, name: &str, sheet: Sheet) {
        self.sheets.push(ReportSheet {
            name: name.to_string(),
            sheet,
        });
    }
}

/// Lays the comparator results out as report sheets.
///
/// `Product` is always present and falls back to a placeholder message. The
/// other sheets are left out when their comparator had no result.
pub fn assemble_report(
    bad_rows: Sheet,
    fact: Option<Sheet>,
    markets: Option<Sheet>,
    periods: Option<Sheet>,
) -> Report {
    let mut report = Report::default();

    let product = if bad_rows.is_empty() {
        Sheet::new(vec![vec![Cell::text(NO_BAD_ROWS_MESSAGE)]])
    } else {
        bad_rows
    };
    report.push(PRODUCT_SHEET, product);

    for (name, sheet) in [(FACT_SHEET, fact), (MARKETS_SHEET, markets), (PERIODS_SHEET, periods)] {
        if let Some(sheet) = sheet {
            report.push(name, sheet);
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_scan_gets_placeholder_and_absent_results_are_omitted() {
        let report = assemble_report(Sheet::default(), None, Some(Sheet::default()), None);
        assert_eq!(report.sheet_names(), vec![PRODUCT_SHEET, MARKETS_SHEET]);
        assert_eq!(
            report.sheet(PRODUCT_SHEET).map(|sheet| sheet.rows.clone()),
            Some(vec![vec![Cell::text(NO_BAD_ROWS_MESSAGE)]])
        );
    }

    #[test]
    fn all_results_keep_fixed_order() {
        let one = Sheet::new(vec![vec![Cell::text("x")]]);
        let report = assemble_report(
            one.clone(),
            Some(one.clone()),
            Some(one.clone()),
            Some(one.clone()),
        );
        assert_eq!(
            report.sheet_names(),
            vec![PRODUCT_SHEET, FACT_SHEET, MARKETS_SHEET, PERIODS_SHEET]
        );
        assert_eq!(report.sheet(PRODUCT_SHEET), Some(&one));
    }
}
