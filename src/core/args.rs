use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, PartialEq)]
#[command(version, about)]
pub struct CliArgs {
    /// TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Directory to open on startup; overrides `data.directory`.
    #[arg(short, long)]
    pub dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing() {
        let args = CliArgs::parse_from(["self", "--config", "plotboard.toml", "-d", "/data"]);
        assert_eq!(
            args,
            CliArgs {
                config: Some(PathBuf::from("plotboard.toml")),
                dir: Some(PathBuf::from("/data")),
            }
        );
    }

    #[test]
    fn test_args_default() {
        let args = CliArgs::parse_from(["self"]);
        assert_eq!(
            args,
            CliArgs {
                config: None,
                dir: None
            }
        );
    }
}
