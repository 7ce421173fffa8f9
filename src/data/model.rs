use std::collections::BTreeMap;
use std::fmt;
use std::ops::Index;

use chrono::{DateTime, Local};

// ---------------------------------------------------------------------------
// CellValue – a single cell of the published sheet
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value, guessed from the CSV text.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    /// Guess the type of a raw CSV cell.
    ///
    /// Blank cells become [`CellValue::Null`]; anything that is not a finite
    /// number is kept verbatim, so sheet sentinels such as `#N/A` and names
    /// such as `Nan` or `Inf` survive as text.
    pub fn guess(raw: &str) -> Self {
        let s = raw.trim();
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        match parse_finite(s) {
            Some(f) => CellValue::Float(f),
            None => CellValue::String(raw.to_string()),
        }
    }

    /// Numeric view of the cell. Text is accepted when it parses as a finite
    /// number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::String(s) => parse_finite(s.trim()),
            CellValue::Null => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// `f64::from_str` also accepts `nan`, `inf` and `infinity` in any case.
fn parse_finite(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|f| f.is_finite())
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Row / Table
// ---------------------------------------------------------------------------

/// A cell as typed, plus the exact text it was read from.
#[derive(Debug, Clone, PartialEq)]
struct Cell {
    value: CellValue,
    text: String,
}

/// One sheet row: normalized column name → cell.
///
/// Typing is lossy (`01` reads as `1`), so the original text is kept for
/// columns compared or shown as text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: BTreeMap<String, Cell>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the raw text of `column`, typed with [`CellValue::guess`].
    pub fn insert(&mut self, column: impl Into<String>, raw: &str) {
        let cell = Cell {
            value: CellValue::guess(raw),
            text: raw.to_string(),
        };
        self.cells.insert(column.into(), cell);
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.get(column).map(|c| &c.value)
    }

    /// The cell exactly as it appeared in the sheet.
    pub fn text(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(|c| c.text.as_str())
    }
}

impl Index<&str> for Row {
    type Output = CellValue;

    fn index(&self, column: &str) -> &CellValue {
        match self.get(column) {
            Some(value) => value,
            None => panic!("no column '{column}' in row"),
        }
    }
}

/// A parsed sheet. Never mutated once built; filtering returns a new table.
#[derive(Debug, Clone)]
pub struct Table {
    /// Column names in sheet order, trimmed and unique.
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
    /// When the underlying sheet was fetched.
    pub fetched_at: DateTime<Local>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Table {
            columns,
            rows,
            fetched_at: Local::now(),
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Cell lookup; a column missing from a ragged row reads as `Null`.
    pub fn cell<'a>(&self, row: &'a Row, column: &str) -> &'a CellValue {
        static NULL: CellValue = CellValue::Null;
        row.get(column).unwrap_or(&NULL)
    }

    /// Original cell text; a column missing from a ragged row reads as `""`.
    pub fn text<'a>(&self, row: &'a Row, column: &str) -> &'a str {
        row.text(column).unwrap_or("")
    }
}
