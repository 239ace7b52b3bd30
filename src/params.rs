//! Plot Parameter Table
//! Editable rows of plotting parameters (file, x/y columns, mode, color) plus
//! any columns the user adds.

use crate::data::TableStore;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Columns every parameter table starts with.
pub const DEFAULT_REQUIRED_COLUMNS: [&str; 5] = ["file", "x", "y", "mode", "color"];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamError {
    #[error("Column '{0}' already exists")]
    DuplicateColumn(String),
    #[error("Column name must not be empty")]
    EmptyColumnName,
    #[error("Column '{0}' is required and cannot be removed")]
    RequiredColumn(String),
    #[error("Unknown column '{0}'")]
    UnknownColumn(String),
    #[error("Row {0} out of range")]
    RowOutOfRange(usize),
}

/// How `add_column` treats a name that is already present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateColumnPolicy {
    /// Refuse the new column.
    #[default]
    Reject,
    /// Replace the existing column: values are cleared and it moves to the end.
    LastWriteWins,
}

/// How a series is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineMode {
    #[default]
    Lines,
    Markers,
    LinesMarkers,
}

impl LineMode {
    pub const ALL: [LineMode; 3] = [LineMode::Lines, LineMode::Markers, LineMode::LinesMarkers];

    /// Parse a mode cell; blank or unknown text falls back to lines.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "markers" => LineMode::Markers,
            "lines+markers" => LineMode::LinesMarkers,
            _ => LineMode::Lines,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LineMode::Lines => "lines",
            LineMode::Markers => "markers",
            LineMode::LinesMarkers => "lines+markers",
        }
    }

    pub fn draws_line(&self) -> bool {
        matches!(self, LineMode::Lines | LineMode::LinesMarkers)
    }

    pub fn draws_markers(&self) -> bool {
        matches!(self, LineMode::Markers | LineMode::LinesMarkers)
    }
}

/// Ordered list of parameter rows sharing one set of columns.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamTable {
    required: Vec<String>,
    columns: Vec<String>,
    rows: Vec<HashMap<String, String>>,
    policy: DuplicateColumnPolicy,
}

impl Default for ParamTable {
    fn default() -> Self {
        Self::new(&DEFAULT_REQUIRED_COLUMNS, DuplicateColumnPolicy::default())
    }
}

impl ParamTable {
    pub fn new<S: AsRef<str>>(required: &[S], policy: DuplicateColumnPolicy) -> Self {
        let mut columns: Vec<String> = Vec::with_capacity(required.len());
        for name in required {
            if !columns.iter().any(|c| c == name.as_ref()) {
                columns.push(name.as_ref().to_string());
            }
        }

        Self {
            required: columns.clone(),
            columns,
            rows: Vec::new(),
            policy,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn is_required(&self, column: &str) -> bool {
        self.required.iter().any(|c| c == column)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn policy(&self) -> DuplicateColumnPolicy {
        self.policy
    }

    /// Append a row with every field empty.
    pub fn add_row(&mut self) {
        let row = self
            .columns
            .iter()
            .map(|c| (c.clone(), String::new()))
            .collect();
        self.rows.push(row);
    }

    pub fn remove_row(&mut self, row: usize) -> Result<(), ParamError> {
        if row >= self.rows.len() {
            return Err(ParamError::RowOutOfRange(row));
        }
        self.rows.remove(row);
        Ok(())
    }

    /// Append a column, empty in every row.
    pub fn add_column(&mut self, name: &str) -> Result<(), ParamError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ParamError::EmptyColumnName);
        }

        if let Some(pos) = self.columns.iter().position(|c| c == name) {
            match self.policy {
                DuplicateColumnPolicy::Reject => {
                    return Err(ParamError::DuplicateColumn(name.to_string()))
                }
                DuplicateColumnPolicy::LastWriteWins => {
                    let existing = self.columns.remove(pos);
                    self.columns.push(existing);
                }
            }
        } else {
            self.columns.push(name.to_string());
        }

        for row in &mut self.rows {
            row.insert(name.to_string(), String::new());
        }
        Ok(())
    }

    pub fn remove_column(&mut self, name: &str) -> Result<(), ParamError> {
        if self.is_required(name) {
            return Err(ParamError::RequiredColumn(name.to_string()));
        }
        let pos = self
            .columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| ParamError::UnknownColumn(name.to_string()))?;

        self.columns.remove(pos);
        for row in &mut self.rows {
            row.remove(name);
        }
        Ok(())
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }

    pub fn set(
        &mut self,
        row: usize,
        column: &str,
        value: impl Into<String>,
    ) -> Result<(), ParamError> {
        if !self.columns.iter().any(|c| c == column) {
            return Err(ParamError::UnknownColumn(column.to_string()));
        }
        let fields = self
            .rows
            .get_mut(row)
            .ok_or(ParamError::RowOutOfRange(row))?;
        fields.insert(column.to_string(), value.into());
        Ok(())
    }

    /// Mutable access to a cell, for in-place editing widgets.
    pub fn cell_mut(&mut self, row: usize, column: &str) -> Option<&mut String> {
        if !self.columns.iter().any(|c| c == column) {
            return None;
        }
        let fields = self.rows.get_mut(row)?;
        Some(fields.entry(column.to_string()).or_default())
    }
}

/// Choices for the `file` column: every loaded table.
pub fn file_options(store: &TableStore) -> Vec<String> {
    store.names()
}

/// Choices for the `x`/`y` columns of a row pointing at `file`.
pub fn column_options(store: &TableStore, file: &str) -> Vec<String> {
    let none: [&str; 0] = [];
    store.get(file, &none).column_names()
}
