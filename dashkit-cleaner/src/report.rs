//! Missing-value report for an uploaded dataset

use serde::Serialize;

use crate::table::{ColumnType, Table};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub column_type: ColumnType,
    pub missing: usize,
    pub present: usize,
}

/// Shape and per-column missing counts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingReport {
    pub rows: usize,
    pub columns: usize,
    pub total_missing: usize,
    pub per_column: Vec<ColumnSummary>,
}

impl MissingReport {
    pub fn from_table(table: &Table) -> Self {
        let per_column: Vec<ColumnSummary> = table
            .columns()
            .iter()
            .map(|column| {
                let missing = column.missing_count();
                ColumnSummary {
                    name: column.name().to_string(),
                    column_type: column.column_type(),
                    missing,
                    present: table.row_count() - missing,
                }
            })
            .collect();

        Self {
            rows: table.row_count(),
            columns: table.column_count(),
            total_missing: per_column.iter().map(|c| c.missing).sum(),
            per_column,
        }
    }

    /// Columns with at least one missing cell, in table order
    pub fn columns_with_missing(&self) -> impl Iterator<Item = &ColumnSummary> {
        self.per_column.iter().filter(|c| c.missing > 0)
    }

    pub fn numeric_column_count(&self) -> usize {
        self.per_column
            .iter()
            .filter(|c| c.column_type == ColumnType::Numeric)
            .count()
    }
}
