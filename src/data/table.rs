//! Table Module
//! Ordered, typed, column-oriented tables with a row index.

use super::DataError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Element type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    Int64,
    Float64,
    Bool,
    Str,
    /// Milliseconds since the Unix epoch.
    Timestamp,
}

/// Typed values of a single column. Missing values are `None`.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Int(Vec<Option<i64>>),
    Float(Vec<Option<f64>>),
    Bool(Vec<Option<bool>>),
    Str(Vec<Option<String>>),
    Timestamp(Vec<Option<i64>>),
}

impl ColumnData {
    pub fn empty(dtype: DType) -> Self {
        match dtype {
            DType::Int64 => ColumnData::Int(Vec::new()),
            DType::Float64 => ColumnData::Float(Vec::new()),
            DType::Bool => ColumnData::Bool(Vec::new()),
            DType::Str => ColumnData::Str(Vec::new()),
            DType::Timestamp => ColumnData::Timestamp(Vec::new()),
        }
    }

    /// Default row labels `0..len`.
    pub fn range(len: usize) -> Self {
        ColumnData::Int((0..len as i64).map(Some).collect())
    }

    pub fn dtype(&self) -> DType {
        match self {
            ColumnData::Int(_) => DType::Int64,
            ColumnData::Float(_) => DType::Float64,
            ColumnData::Bool(_) => DType::Bool,
            ColumnData::Str(_) => DType::Str,
            ColumnData::Timestamp(_) => DType::Timestamp,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::Int(v) | ColumnData::Timestamp(v) => v.len(),
            ColumnData::Float(v) => v.len(),
            ColumnData::Bool(v) => v.len(),
            ColumnData::Str(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the column can be placed on a numeric plot axis.
    pub fn is_numeric(&self) -> bool {
        !matches!(self, ColumnData::Str(_))
    }

    /// Numeric view of a single value. Strings and nulls have none.
    pub fn get_f64(&self, row: usize) -> Option<f64> {
        match self {
            ColumnData::Int(v) | ColumnData::Timestamp(v) => {
                v.get(row).copied().flatten().map(|x| x as f64)
            }
            ColumnData::Float(v) => v.get(row).copied().flatten(),
            ColumnData::Bool(v) => v
                .get(row)
                .copied()
                .flatten()
                .map(|b| if b { 1.0 } else { 0.0 }),
            ColumnData::Str(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// Row labels of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct Index {
    pub name: Option<String>,
    pub data: ColumnData,
}

impl Index {
    pub fn range(len: usize) -> Self {
        Self {
            name: None,
            data: ColumnData::range(len),
        }
    }
}

/// A rectangular dataset: ordered named columns of equal length plus an index.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    index: Index,
    columns: Vec<Column>,
}

impl Table {
    /// Build a table with a default range index.
    pub fn new(columns: Vec<Column>) -> Result<Self, DataError> {
        let height = columns.first().map(|c| c.data.len()).unwrap_or(0);
        Self::with_index(Index::range(height), columns)
    }

    /// Build a table with explicit row labels.
    pub fn with_index(index: Index, columns: Vec<Column>) -> Result<Self, DataError> {
        let height = index.data.len();
        let mut seen = HashSet::new();

        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(DataError::FormatError(format!(
                    "duplicate column name '{}'",
                    column.name
                )));
            }
            if column.data.len() != height {
                return Err(DataError::FormatError(format!(
                    "column '{}' has {} values, expected {}",
                    column.name,
                    column.data.len(),
                    height
                )));
            }
        }

        Ok(Self { index, columns })
    }

    /// Zero-row table with the given column names. Repeated names are kept once.
    pub fn empty<S: AsRef<str>>(column_names: &[S]) -> Self {
        let mut seen = HashSet::new();
        let columns = column_names
            .iter()
            .map(|name| name.as_ref())
            .filter(|name| seen.insert(*name))
            .map(|name| Column::new(name, ColumnData::empty(DType::Str)))
            .collect();

        Self {
            index: Index::range(0),
            columns,
        }
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.index.data.len()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.height() == 0
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_table_has_requested_columns_and_no_rows() {
        let table = Table::empty(&["a", "b", "a"]);
        assert_eq!(table.column_names(), vec!["a", "b"]);
        assert_eq!(table.height(), 0);
        assert!(table.is_empty());
    }

    #[test]
    fn new_rejects_ragged_columns() {
        let result = Table::new(vec![
            Column::new("a", ColumnData::Int(vec![Some(1), Some(2)])),
            Column::new("b", ColumnData::Int(vec![Some(1)])),
        ]);
        assert!(matches!(result, Err(DataError::FormatError(_))));
    }

    #[test]
    fn new_rejects_duplicate_names() {
        let result = Table::new(vec![
            Column::new("a", ColumnData::Int(vec![Some(1)])),
            Column::new("a", ColumnData::Float(vec![Some(1.0)])),
        ]);
        assert!(matches!(result, Err(DataError::FormatError(_))));
    }

    #[test]
    fn numeric_view() {
        let ints = ColumnData::Int(vec![Some(3), None]);
        assert_eq!(ints.get_f64(0), Some(3.0));
        assert_eq!(ints.get_f64(1), None);
        assert_eq!(ints.get_f64(9), None);

        let strs = ColumnData::Str(vec![Some("x".to_string())]);
        assert!(!strs.is_numeric());
        assert_eq!(strs.get_f64(0), None);
    }

    #[test]
    fn default_index_is_range() {
        let table = Table::new(vec![Column::new(
            "v",
            ColumnData::Float(vec![Some(0.5), Some(1.5), None]),
        )])
        .unwrap();
        assert_eq!(
            table.index().data,
            ColumnData::Int(vec![Some(0), Some(1), Some(2)])
        );
        assert_eq!(table.index().name, None);
    }
}
