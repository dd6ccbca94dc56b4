//! Missing-value imputation engine
//!
//! Fills every missing cell of an in-scope column with one fill value
//! computed from that column's present values. The input table is never
//! modified; a new table is returned together with what was filled and
//! which columns were passed over.
//!
//! Ineligible columns are skipped, never an error:
//! - out of scope (text column while non-numeric columns are excluded)
//! - text column under Mean or Median
//! - no present values to derive a fill value from
//! - the statistic is undefined (NaN), e.g. the mean of `inf` and `-inf`

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use crate::table::{format_number, Column, ColumnData, ColumnType, Table};

/// Statistic used to derive a column's fill value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillMethod {
    #[default]
    Mean,
    Median,
    Mode,
}

impl FillMethod {
    pub const ALL: [FillMethod; 3] = [FillMethod::Mean, FillMethod::Median, FillMethod::Mode];

    /// Form / query value
    pub fn as_str(&self) -> &'static str {
        match self {
            FillMethod::Mean => "mean",
            FillMethod::Median => "median",
            FillMethod::Mode => "mode",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            FillMethod::Mean => "Mean",
            FillMethod::Median => "Median",
            FillMethod::Mode => "Mode",
        }
    }

    /// Mean and Median need numbers; Mode works on any column
    pub fn requires_numeric(&self) -> bool {
        !matches!(self, FillMethod::Mode)
    }
}

impl fmt::Display for FillMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FillMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mean" => Ok(FillMethod::Mean),
            "median" => Ok(FillMethod::Median),
            "mode" => Ok(FillMethod::Mode),
            other => Err(format!("Unknown fill method: {}", other)),
        }
    }
}

/// Which columns the engine may touch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    #[default]
    AllColumns,
    NumericOnly,
}

impl Scope {
    /// Scope for the "exclude non-numeric columns" option
    pub fn from_exclude_non_numeric(exclude: bool) -> Self {
        if exclude {
            Scope::NumericOnly
        } else {
            Scope::AllColumns
        }
    }

    pub fn includes(&self, column_type: ColumnType) -> bool {
        match self {
            Scope::AllColumns => true,
            Scope::NumericOnly => column_type == ColumnType::Numeric,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImputeOptions {
    pub method: FillMethod,
    pub scope: Scope,
}

impl ImputeOptions {
    pub fn new(method: FillMethod, scope: Scope) -> Self {
        Self { method, scope }
    }
}

/// Value written into a column's missing cells
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FillValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for FillValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FillValue::Number(v) => f.write_str(&format_number(*v)),
            FillValue::Text(s) => f.write_str(s),
        }
    }
}

/// One column that received a fill value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnFill {
    pub column: String,
    pub value: FillValue,
    pub cells_filled: usize,
}

/// Why a column with missing cells was left alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Text column while only numeric columns are in scope
    OutOfScope,
    /// Text column under a numeric-only method
    NonNumeric,
    /// Every cell is missing
    NoPresentValues,
    /// The statistic came out NaN
    UndefinedFill,
}

impl SkipReason {
    pub fn describe(&self) -> &'static str {
        match self {
            SkipReason::OutOfScope => "excluded (non-numeric column)",
            SkipReason::NonNumeric => "method needs a numeric column",
            SkipReason::NoPresentValues => "no values to compute a fill from",
            SkipReason::UndefinedFill => "fill value is not a number",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedColumn {
    pub column: String,
    pub reason: SkipReason,
    pub missing: usize,
}

/// Result of one imputation pass
#[derive(Debug, Clone, PartialEq)]
pub struct ImputationReport {
    pub table: Table,
    pub options: ImputeOptions,
    pub filled: Vec<ColumnFill>,
    pub skipped: Vec<SkippedColumn>,
    /// Missing cells left in `table`
    pub remaining_missing: usize,
}

impl ImputationReport {
    pub fn is_complete(&self) -> bool {
        self.remaining_missing == 0
    }

    pub fn cells_filled(&self) -> usize {
        self.filled.iter().map(|f| f.cells_filled).sum()
    }
}

/// Fill missing cells of `table` per `options`, returning a new table
pub fn impute(table: &Table, options: ImputeOptions) -> ImputationReport {
    let mut columns = Vec::with_capacity(table.column_count());
    let mut filled = Vec::new();
    let mut skipped = Vec::new();

    for column in table.columns() {
        let missing = column.missing_count();
        if missing == 0 {
            columns.push(column.clone());
            continue;
        }

        let outcome = if options.scope.includes(column.column_type()) {
            impute_column(column.data(), options.method)
        } else {
            Err(SkipReason::OutOfScope)
        };

        match outcome {
            Ok((data, value)) => {
                filled.push(ColumnFill {
                    column: column.name().to_string(),
                    value,
                    cells_filled: missing,
                });
                columns.push(Column::new(column.name(), data));
            }
            Err(reason) => {
                skipped.push(SkippedColumn {
                    column: column.name().to_string(),
                    reason,
                    missing,
                });
                columns.push(column.clone());
            }
        }
    }

    let table = Table::from_columns_unchecked(columns, table.row_count());
    let remaining_missing = table.missing_count();

    ImputationReport {
        table,
        options,
        filled,
        skipped,
        remaining_missing,
    }
}

fn impute_column(data: &ColumnData, method: FillMethod) -> Result<(ColumnData, FillValue), SkipReason> {
    match data {
        ColumnData::Numeric(values) => {
            let present: Vec<f64> = values.iter().flatten().copied().collect();
            let fill = match method {
                FillMethod::Mean => mean(&present),
                FillMethod::Median => median(&present),
                FillMethod::Mode => first_mode(present.iter().copied(), |v| number_key(*v)),
            }
            .ok_or(SkipReason::NoPresentValues)?;
            if fill.is_nan() {
                return Err(SkipReason::UndefinedFill);
            }

            let filled = values.iter().map(|v| Some(v.unwrap_or(fill))).collect();
            Ok((ColumnData::Numeric(filled), FillValue::Number(fill)))
        }
        ColumnData::Text(values) => {
            if method.requires_numeric() {
                return Err(SkipReason::NonNumeric);
            }
            let fill = first_mode(values.iter().flatten(), |s| *s)
                .cloned()
                .ok_or(SkipReason::NoPresentValues)?;

            let filled = values
                .iter()
                .map(|v| Some(v.clone().unwrap_or_else(|| fill.clone())))
                .collect();
            Ok((ColumnData::Text(filled), FillValue::Text(fill)))
        }
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Most frequent item; ties go to the item seen first
pub fn first_mode<T, K, F>(items: impl IntoIterator<Item = T>, key: F) -> Option<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut seen: Vec<(T, usize)> = Vec::new();
    let mut index: HashMap<K, usize> = HashMap::new();

    for item in items {
        let k = key(&item);
        match index.get(&k) {
            Some(&i) => seen[i].1 += 1,
            None => {
                index.insert(k, seen.len());
                seen.push((item, 1));
            }
        }
    }

    let mut best: Option<(T, usize)> = None;
    for (item, count) in seen {
        if best.as_ref().map_or(true, |(_, best_count)| count > *best_count) {
            best = Some((item, count));
        }
    }
    best.map(|(item, _)| item)
}

// -0.0 and 0.0 count as the same value
fn number_key(value: f64) -> u64 {
    if value == 0.0 {
        0.0f64.to_bits()
    } else {
        value.to_bits()
    }
}
