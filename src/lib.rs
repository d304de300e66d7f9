pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::cli::LocalStorage;
pub use config::toml_config::{PackageManifest, ResolvedConfig};
pub use config::{CliConfig, LogFormat};

pub use self::core::{engine::PackEngine, pipeline::PackagePipeline, staging::stage_binaries};
pub use utils::error::{PackError, Result};
