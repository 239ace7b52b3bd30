//! Data module - CSV loading, tables and the table store

mod codec;
mod error;
mod loader;
mod store;
mod table;

pub use codec::{decode_table, encode_table};
pub use error::DataError;
pub use loader::{
    list_csv_files, load_csv, table_from_frame, table_name, CsvLoader, CsvOptions, TableLoader,
};
pub use store::{EmptyPolicy, Reconciliation, TableStore, DEFAULT_TABLE_NAME};
pub use table::{Column, ColumnData, DType, Index, Table};
