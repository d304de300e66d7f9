pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(ValueEnum))]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(Parser))]
#[cfg_attr(feature = "cli", command(name = "hgdb-circt-pack"))]
#[cfg_attr(
    feature = "cli",
    command(about = "Stage pre-built CIRCT binaries into a Python package layout")
)]
pub struct CliConfig {
    /// Path to the package manifest
    #[cfg_attr(feature = "cli", arg(short, long, default_value = "package.toml"))]
    pub config: PathBuf,

    /// Override the staging output directory
    #[cfg_attr(feature = "cli", arg(short, long))]
    pub output_dir: Option<PathBuf>,

    /// Also build the distribution archive
    #[cfg_attr(feature = "cli", arg(long))]
    pub dist: bool,

    /// Print the resolved plan as JSON without touching the filesystem
    #[cfg_attr(feature = "cli", arg(long))]
    pub dry_run: bool,

    /// Enable verbose output
    #[cfg_attr(feature = "cli", arg(short, long))]
    pub verbose: bool,

    #[cfg_attr(feature = "cli", arg(long, value_enum, default_value_t = LogFormat::Compact))]
    pub log_format: LogFormat,
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let config = CliConfig::parse_from(["hgdb-circt-pack"]);
        assert_eq!(config.config, PathBuf::from("package.toml"));
        assert!(config.output_dir.is_none());
        assert!(!config.dist);
        assert!(!config.dry_run);
        assert_eq!(config.log_format, LogFormat::Compact);
    }

    #[test]
    fn test_cli_overrides() {
        let config = CliConfig::parse_from([
            "hgdb-circt-pack",
            "--config",
            "pkg/package.toml",
            "--output-dir",
            "out",
            "--dist",
            "--log-format",
            "json",
        ]);
        assert_eq!(config.config, PathBuf::from("pkg/package.toml"));
        assert_eq!(config.output_dir, Some(PathBuf::from("out")));
        assert!(config.dist);
        assert_eq!(config.log_format, LogFormat::Json);
    }
}
