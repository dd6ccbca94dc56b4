//! Typed tabular dataset with CSV decode/encode
//!
//! Every column carries a declared type fixed when the table is built:
//! numeric columns hold `Option<f64>`, text columns hold `Option<String>`.
//! CSV input is typed per column: a column is numeric iff every present cell
//! parses as a number. A column with no present cells is numeric.

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::io::Read;
use thiserror::Error;

/// Cell contents treated as missing when reading CSV
pub const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Table construction and CSV errors
#[derive(Debug, Error)]
pub enum TableError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No columns to parse from file")]
    NoColumns,

    #[error("Column '{column}' has {found} rows, expected {expected}")]
    RowCountMismatch {
        column: String,
        found: usize,
        expected: usize,
    },
}

/// Declared type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Numeric,
    Text,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Numeric => write!(f, "numeric"),
            ColumnType::Text => write!(f, "text"),
        }
    }
}

/// Cells of one column; `None` marks a missing cell
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(values) => values.len(),
            ColumnData::Text(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            ColumnData::Numeric(_) => ColumnType::Numeric,
            ColumnData::Text(_) => ColumnType::Text,
        }
    }

    pub fn is_missing(&self, row: usize) -> bool {
        match self {
            ColumnData::Numeric(values) => matches!(values.get(row), Some(None)),
            ColumnData::Text(values) => matches!(values.get(row), Some(None)),
        }
    }

    pub fn missing_count(&self) -> usize {
        match self {
            ColumnData::Numeric(values) => values.iter().filter(|v| v.is_none()).count(),
            ColumnData::Text(values) => values.iter().filter(|v| v.is_none()).count(),
        }
    }

    /// Rendered cell text, `None` for a missing cell or out-of-range row
    pub fn display(&self, row: usize) -> Option<String> {
        match self {
            ColumnData::Numeric(values) => values.get(row).copied().flatten().map(format_number),
            ColumnData::Text(values) => values.get(row).cloned().flatten(),
        }
    }
}

/// A named, typed column
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self::new(name, ColumnData::Numeric(values))
    }

    pub fn text<S: Into<String>>(name: impl Into<String>, values: Vec<Option<S>>) -> Self {
        let values = values.into_iter().map(|v| v.map(Into::into)).collect();
        Self::new(name, ColumnData::Text(values))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn column_type(&self) -> ColumnType {
        self.data.column_type()
    }

    pub fn missing_count(&self) -> usize {
        self.data.missing_count()
    }
}

/// Ordered collection of equally long columns
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Build a table, rejecting columns of unequal length
    pub fn new(columns: Vec<Column>) -> Result<Self, TableError> {
        let row_count = columns.first().map(|c| c.data.len()).unwrap_or(0);
        if let Some(bad) = columns.iter().find(|c| c.data.len() != row_count) {
            return Err(TableError::RowCountMismatch {
                column: bad.name.clone(),
                found: bad.data.len(),
                expected: row_count,
            });
        }
        Ok(Self { columns, row_count })
    }

    /// Internal constructor for callers that already hold equal-length columns
    pub(crate) fn from_columns_unchecked(columns: Vec<Column>, row_count: usize) -> Self {
        debug_assert!(columns.iter().all(|c| c.data.len() == row_count));
        Self { columns, row_count }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Total number of missing cells across all columns
    pub fn missing_count(&self) -> usize {
        self.columns.iter().map(Column::missing_count).sum()
    }

    /// Parse CSV bytes (header row required)
    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self, TableError> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        Self::from_csv_reader(bytes)
    }

    /// Parse CSV from any reader (header row required)
    ///
    /// Rows with a different field count than the header are an error.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, TableError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);

        let raw_headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        if raw_headers.is_empty() || (raw_headers.len() == 1 && raw_headers[0].is_empty()) {
            return Err(TableError::NoColumns);
        }
        let headers = normalize_headers(&raw_headers);

        let mut raw_columns: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
        for record in rdr.records() {
            let record = record?;
            for (j, field) in record.iter().enumerate() {
                raw_columns[j].push(parse_cell(field));
            }
        }

        let row_count = raw_columns.first().map(Vec::len).unwrap_or(0);
        let columns = headers
            .into_iter()
            .zip(raw_columns)
            .map(|(name, cells)| Column::new(name, infer_column(cells)))
            .collect();

        Ok(Self::from_columns_unchecked(columns, row_count))
    }

    /// Encode as UTF-8 CSV: header row, comma separated, no index column,
    /// missing cells as empty fields
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>, TableError> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record(self.columns.iter().map(|c| c.name.as_str()))?;

        for row in 0..self.row_count {
            wtr.write_record(
                self.columns
                    .iter()
                    .map(|c| c.data.display(row).unwrap_or_default()),
            )?;
        }

        wtr.into_inner().map_err(|e| TableError::Io(e.into_error()))
    }
}

/// The small dataset shown before anything is uploaded
pub fn example_dataset() -> Table {
    Table::from_columns_unchecked(
        vec![
            Column::text("Name", vec![Some("Bav1"), Some("Moena"), Some("Kumar")]),
            Column::numeric("Age", vec![Some(28.0), None, Some(30.0)]),
            Column::numeric("Salary", vec![None, Some(45000.0), Some(50000.0)]),
        ],
        3,
    )
}

/// Render a number for display and CSV output
///
/// Integral values print without a fractional part (`29`), everything else
/// in shortest round-trip form (`29.5`).
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// NA tokens match the raw field; a whitespace-only cell stays present text
fn parse_cell(field: &str) -> Option<String> {
    if NA_TOKENS.contains(&field) {
        None
    } else {
        Some(field.to_string())
    }
}

fn infer_column(cells: Vec<Option<String>>) -> ColumnData {
    // `f64::from_str` takes any spelling of nan (`NAN`, `+nan`); those are gaps too
    let parsed: Option<Vec<Option<f64>>> = cells
        .iter()
        .map(|cell| match cell {
            None => Some(None),
            Some(text) => text
                .trim()
                .parse::<f64>()
                .ok()
                .map(|v| if v.is_nan() { None } else { Some(v) }),
        })
        .collect();

    match parsed {
        Some(values) => ColumnData::Numeric(values),
        None => ColumnData::Text(cells),
    }
}

/// Blank headers become `Unnamed: {index}`; repeats get `.1`, `.2`, ...
fn normalize_headers(raw: &[String]) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();
    let mut counters: HashMap<String, usize> = HashMap::new();

    raw.iter()
        .enumerate()
        .map(|(i, header)| {
            let base = if header.trim().is_empty() {
                format!("Unnamed: {}", i)
            } else {
                header.clone()
            };

            let mut name = base.clone();
            while used.contains(&name) {
                let counter = counters.entry(base.clone()).or_insert(0);
                *counter += 1;
                name = format!("{}.{}", base, counter);
            }
            used.insert(name.clone());
            name
        })
        .collect()
}
