//! Plotboard - CSV Directory Dashboard
//!
//! Loads the CSV files of a directory into a named table store that is carried
//! between interaction steps as one serialized blob.

pub mod conf;
pub mod core;
pub mod data;
pub mod params;
pub mod session;
