use crate::data::{CsvOptions, EmptyPolicy};
use crate::params::{DuplicateColumnPolicy, DEFAULT_REQUIRED_COLUMNS};
use config::Config as CConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Prefix of environment variables overriding the file, e.g. `PLOTBOARD__DATA__DIRECTORY`.
pub const ENV_PREFIX: &str = "PLOTBOARD";

#[derive(Debug, Error, PartialEq)]
pub enum ConfError {
    #[error("Cannot parse config: {0}")]
    ConfigParsingError(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    pub data: DataConfig,
    pub store: StoreConfig,
    pub params: ParamsConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct DataConfig {
    /// Directory listed on startup.
    pub directory: Option<PathBuf>,
    pub csv: CsvOptions,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct StoreConfig {
    pub empty_policy: EmptyPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct ParamsConfig {
    pub required_columns: Vec<String>,
    pub duplicate_columns: DuplicateColumnPolicy,
}

impl Default for ParamsConfig {
    fn default() -> Self {
        Self {
            required_columns: DEFAULT_REQUIRED_COLUMNS
                .iter()
                .map(|c| c.to_string())
                .collect(),
            duplicate_columns: DuplicateColumnPolicy::default(),
        }
    }
}

impl Config {
    pub fn from_str(toml_str: &str) -> Result<Config, ConfError> {
        let config = CConfig::builder()
            .add_source(config::File::from_str(toml_str, config::FileFormat::Toml))
            .build()
            .map_err(|e| ConfError::ConfigParsingError(e.to_string()))?
            .try_deserialize::<Config>()
            .map_err(|e| ConfError::ConfigParsingError(e.to_string()))?;
        Ok(config)
    }

    /// Layer an optional TOML file and `PLOTBOARD__*` environment variables
    /// over the defaults.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfError> {
        let mut builder = CConfig::builder();
        if let Some(path) = path {
            builder = builder
                .add_source(config::File::from(path).format(config::FileFormat::Toml));
        }

        builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ConfError::ConfigParsingError(e.to_string()))?
            .try_deserialize::<Config>()
            .map_err(|e| ConfError::ConfigParsingError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn load_empty_toml() {
        assert_eq!(Config::from_str(""), Ok(Config::default()));
    }

    #[test]
    fn defaults() {
        let conf = Config::default();
        assert_eq!(conf.data.directory, None);
        assert_eq!(conf.data.csv.separator, ',');
        assert_eq!(conf.data.csv.index_col, None);
        assert_eq!(conf.store.empty_policy, EmptyPolicy::Empty);
        assert_eq!(
            conf.params.required_columns,
            vec!["file", "x", "y", "mode", "color"]
        );
        assert_eq!(conf.params.duplicate_columns, DuplicateColumnPolicy::Reject);
    }

    #[test]
    fn load_correct_toml() {
        let toml = r#"
        [data]
        directory = "/data"

        [data.csv]
        separator = ";"
        index_col = 0

        [store.empty_policy]
        kind = "default_table"
        columns = ["x", "y"]

        [params]
        required_columns = ["x", "y"]
        duplicate_columns = "last_write_wins"
        "#;
        let conf = Config::from_str(toml).unwrap();

        assert_eq!(conf.data.directory, Some(PathBuf::from("/data")));
        assert_eq!(conf.data.csv.separator, ';');
        assert_eq!(conf.data.csv.index_col, Some(0));
        assert!(conf.data.csv.try_parse_dates);
        assert_eq!(
            conf.store.empty_policy,
            EmptyPolicy::DefaultTable {
                name: "df".to_string(),
                columns: vec!["x".to_string(), "y".to_string()],
            }
        );
        assert_eq!(conf.params.required_columns, vec!["x", "y"]);
        assert_eq!(
            conf.params.duplicate_columns,
            DuplicateColumnPolicy::LastWriteWins
        );
    }

    #[test]
    fn reject_unknown_fields() {
        let toml = r#"
        [data]
        folder = "/data"
        "#;
        assert!(matches!(
            Config::from_str(toml),
            Err(ConfError::ConfigParsingError(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[data.csv]\ninfer_schema_length = 50").unwrap();

        let conf = Config::load(Some(file.path())).unwrap();

        assert_eq!(conf.data.csv.infer_schema_length, 50);
    }

    #[test]
    fn load_missing_file_fails() {
        let result = Config::load(Some(Path::new("/nonexistent/plotboard.toml")));
        assert!(matches!(result, Err(ConfError::ConfigParsingError(_))));
    }
}
