//! CSV Data Loader Module
//! Handles directory listing, CSV file loading and conversion to tables using Polars.

use super::table::{Column, ColumnData, Index, Table};
use super::DataError;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// CSV parsing options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct CsvOptions {
    pub separator: char,
    /// Position of the column used as row labels. `None` keeps a range index.
    pub index_col: Option<usize>,
    pub infer_schema_length: usize,
    pub try_parse_dates: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            separator: ',',
            index_col: None,
            infer_schema_length: 10000,
            try_parse_dates: true,
        }
    }
}

/// Source of tables keyed by file path.
pub trait TableLoader {
    fn load(&self, path: &Path) -> Result<Table, DataError>;
}

/// Loads tables from CSV files on disk.
#[derive(Debug, Clone, Default)]
pub struct CsvLoader {
    options: CsvOptions,
}

impl CsvLoader {
    pub fn new(options: CsvOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CsvOptions {
        &self.options
    }
}

impl TableLoader for CsvLoader {
    fn load(&self, path: &Path) -> Result<Table, DataError> {
        load_csv(path, &self.options)
    }
}

/// Store key for a source file: its name without directory or extension.
pub fn table_name(path: &Path) -> Option<String> {
    path.file_stem().map(|s| s.to_string_lossy().into_owned())
}

/// List the `*.csv` files of a directory, sorted by path.
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>, DataError> {
    if !dir.is_dir() {
        return Err(DataError::PathError(format!(
            "{} is not a directory",
            dir.display()
        )));
    }
    std::fs::read_dir(dir)
        .map_err(|e| DataError::PathError(format!("{}: {}", dir.display(), e)))?;

    let pattern = format!("{}/*.csv", glob::Pattern::escape(&dir.to_string_lossy()));
    let mut files: Vec<PathBuf> = glob::glob(&pattern)
        .map_err(|e| DataError::PathError(e.to_string()))?
        .filter_map(Result::ok)
        .filter(|p| p.is_file())
        .collect();

    files.sort();
    Ok(files)
}

/// Load a CSV file into a table.
pub fn load_csv(path: &Path, options: &CsvOptions) -> Result<Table, DataError> {
    if !path.exists() {
        return Err(DataError::NotFoundError(path.display().to_string()));
    }
    let separator = u8::try_from(options.separator).map_err(|_| {
        DataError::ParseError(format!(
            "separator {:?} is not a single byte",
            options.separator
        ))
    })?;

    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_separator(separator)
        .with_infer_schema_length(Some(options.infer_schema_length))
        .with_try_parse_dates(options.try_parse_dates)
        .finish()?
        .collect()?;

    table_from_frame(&df, options.index_col)
}

/// Convert a DataFrame into a table, optionally promoting one column to the index.
pub fn table_from_frame(df: &DataFrame, index_col: Option<usize>) -> Result<Table, DataError> {
    let mut columns = Vec::with_capacity(df.width());
    for col in df.get_columns() {
        let data = column_data(col.as_materialized_series())?;
        columns.push(Column::new(col.name().to_string(), data));
    }

    match index_col {
        Some(i) if i < columns.len() => {
            let labels = columns.remove(i);
            let index = Index {
                name: Some(labels.name),
                data: labels.data,
            };
            Table::with_index(index, columns)
        }
        Some(i) => Err(DataError::ParseError(format!(
            "index column {} out of range for {} columns",
            i,
            columns.len()
        ))),
        None => Table::with_index(Index::range(df.height()), columns),
    }
}

fn column_data(series: &Series) -> Result<ColumnData, DataError> {
    let data = match series.dtype() {
        DataType::Boolean => ColumnData::Bool(series.bool()?.into_iter().collect()),
        dtype if dtype.is_integer() => {
            let cast = series.cast(&DataType::Int64)?;
            let values = cast.i64()?.into_iter().collect();
            ColumnData::Int(values)
        }
        dtype if dtype.is_float() => {
            let cast = series.cast(&DataType::Float64)?;
            let values = cast
                .f64()?
                .into_iter()
                .map(|v| v.filter(|x| !x.is_nan()))
                .collect();
            ColumnData::Float(values)
        }
        DataType::Date | DataType::Datetime(_, _) => {
            let millis = series
                .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?
                .cast(&DataType::Int64)?;
            let values = millis.i64()?.into_iter().collect();
            ColumnData::Timestamp(values)
        }
        _ => {
            let cast = series.cast(&DataType::String)?;
            let values = cast
                .str()?
                .into_iter()
                .map(|v| v.map(str::to_string))
                .collect();
            ColumnData::Str(values)
        }
    };
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DType;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_typed_columns() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "mixed.csv",
            "Date,Count,Value,Name\n2020-01-01,1,1.5,a\n2020-01-02,2,2.5,b\n",
        );

        let table = load_csv(&path, &CsvOptions::default()).unwrap();

        assert_eq!(table.column_names(), vec!["Date", "Count", "Value", "Name"]);
        assert_eq!(table.height(), 2);
        assert_eq!(
            table.column("Date").unwrap().data,
            ColumnData::Timestamp(vec![Some(1_577_836_800_000), Some(1_577_923_200_000)])
        );
        assert_eq!(
            table.column("Count").unwrap().data,
            ColumnData::Int(vec![Some(1), Some(2)])
        );
        assert_eq!(
            table.column("Value").unwrap().data,
            ColumnData::Float(vec![Some(1.5), Some(2.5)])
        );
        assert_eq!(table.column("Name").unwrap().data.dtype(), DType::Str);
        assert_eq!(table.index().data, ColumnData::range(2));
    }

    #[test]
    fn first_column_as_index() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "indexed.csv", "key,v\n10,1\n20,2\n");
        let options = CsvOptions {
            index_col: Some(0),
            ..CsvOptions::default()
        };

        let table = load_csv(&path, &options).unwrap();

        assert_eq!(table.column_names(), vec!["v"]);
        assert_eq!(table.index().name.as_deref(), Some("key"));
        assert_eq!(table.index().data, ColumnData::Int(vec![Some(10), Some(20)]));
    }

    #[test]
    fn index_column_out_of_range() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "narrow.csv", "a\n1\n");
        let options = CsvOptions {
            index_col: Some(3),
            ..CsvOptions::default()
        };

        assert!(matches!(
            load_csv(&path, &options),
            Err(DataError::ParseError(_))
        ));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let result = load_csv(&dir.path().join("gone.csv"), &CsvOptions::default());
        assert!(matches!(result, Err(DataError::NotFoundError(_))));
    }

    #[test]
    fn multibyte_separator_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "x.csv", "a\n1\n");
        let options = CsvOptions {
            separator: '€',
            ..CsvOptions::default()
        };
        assert!(matches!(
            load_csv(&path, &options),
            Err(DataError::ParseError(_))
        ));
    }

    #[test]
    fn lists_only_csv_files() {
        let dir = TempDir::new().unwrap();
        write(&dir, "b.csv", "a\n1\n");
        write(&dir, "a.csv", "a\n1\n");
        write(&dir, "notes.txt", "hello");

        let files = list_csv_files(dir.path()).unwrap();
        let names: Vec<String> = files.iter().filter_map(|p| table_name(p)).collect();

        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn listing_a_file_is_a_path_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "a.csv", "a\n1\n");

        assert!(matches!(
            list_csv_files(&path),
            Err(DataError::PathError(_))
        ));
        assert!(matches!(
            list_csv_files(&dir.path().join("nowhere")),
            Err(DataError::PathError(_))
        ));
    }

    #[test]
    fn table_name_strips_directory_and_extension() {
        assert_eq!(
            table_name(Path::new("/data/sales.csv")).as_deref(),
            Some("sales")
        );
    }
}
