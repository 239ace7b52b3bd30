mod config;

pub use config::{ConfError, Config, DataConfig, ParamsConfig, StoreConfig, ENV_PREFIX};
