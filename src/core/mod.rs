mod args;
mod logger;

pub use args::CliArgs;
pub use logger::setup_logging;
