use chrono::NaiveDateTime;

/// Marker written wherever a comparison cannot be computed.
pub const NOT_AVAILABLE: &str = "N/A";

/// Text form of date cells, used for matching and keys.
pub const DATETIME_DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single spreadsheet value. Columns carry no fixed type, so every cell is
/// one of these opaque scalars.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cell {
    /// Missing or blank cell.
    #[default]
    Empty,
    /// Text literal.
    Text(String),
    /// Numeric literal.
    Number(f64),
    /// Date or date-time value.
    DateTime(NaiveDateTime),
    /// Boolean literal.
    Boolean(bool),
}

impl Cell {
    /// Creates a text cell.
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// String representation used for marker matching and key lookups.
    pub fn display(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(value) => value.clone(),
            Cell::Number(value) => value.to_string(),
            Cell::Boolean(value) => value.to_string(),
            Cell::DateTime(value) => value.format(DATETIME_DISPLAY_FORMAT).to_string(),
        }
    }

    /// Trimmed string representation; the form in which keys are compared.
    pub fn key(&self) -> String {
        self.display().trim().to_string()
    }

    /// Lenient numeric reading of the cell.
    ///
    /// Text is trimmed before parsing and booleans count as 1/0. Empty,
    /// unparsable and non-finite values have no numeric reading, and neither
    /// do dates.
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            Cell::Empty | Cell::DateTime(_) => return None,
            Cell::Number(value) => *value,
            Cell::Boolean(value) => f64::from(u8::from(*value)),
            Cell::Text(value) => value.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

/// Ordered cells of one spreadsheet row.
pub type Row = Vec<Cell>;

static EMPTY_CELL: Cell = Cell::Empty;

/// Positionally addressed rows of one worksheet. Rows may be ragged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    pub rows: Vec<Row>,
}

impl Sheet {
    /// Creates a sheet from the provided rows.
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` when the sheet holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column count of the widest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Cell at the given position; anything out of range reads as empty.
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    /// Row at `index` padded with empty cells to the sheet width.
    ///
    /// Measures the sheet on every call; loops over rows should take the
    /// width once and use [`Sheet::padded_row_to`].
    pub fn padded_row(&self, index: usize) -> Row {
        self.padded_row_to(index, self.width())
    }

    /// Row at `index` padded with empty cells to `width` columns. Cells past
    /// `width` are kept.
    pub fn padded_row_to(&self, index: usize, width: usize) -> Row {
        let mut row = self.rows.get(index).cloned().unwrap_or_default();
        if row.len() < width {
            row.resize(width, Cell::Empty);
        }
        row
    }

    /// Positional column labels `0..width`, the only labels a sheet read
    /// without header inference has.
    pub fn column_labels(&self) -> Row {
        (0..self.width()).map(|col| Cell::Number(col as f64)).collect()
    }
}

/// Named worksheets of one workbook, in the workbook's native order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    pub sheets: Vec<(String, Sheet)>,
}

impl Workbook {
    /// Creates an empty workbook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a sheet, replacing any existing sheet with the same name.
    pub fn insert_sheet(&mut self, name: impl Into<String>, sheet: Sheet) {
        let name = name.into();
        match self.sheets.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = sheet,
            None => self.sheets.push((name, sheet)),
        }
    }

    /// Builder-style variant of [`Workbook::insert_sheet`].
    pub fn with_sheet(mut self, name: impl Into<String>, sheet: Sheet) -> Self {
        self.insert_sheet(name, sheet);
        self
    }

    /// Looks up a sheet by exact name.
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, sheet)| sheet)
    }

    /// Iterates sheets in native order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Sheet)> {
        self.sheets.iter().map(|(name, sheet)| (name.as_str(), sheet))
    }
}
