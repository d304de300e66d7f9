use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Descriptive metadata published with the package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageMetadata {
    pub name: String,
    pub version: String,
    pub author: String,
    pub author_email: String,
    pub url: String,
    pub description: String,
    #[serde(default = "default_readme")]
    pub readme: String,
    #[serde(default = "default_content_type")]
    pub long_description_content_type: String,
    pub python_requires: String,
    #[serde(default)]
    pub extras: BTreeMap<String, Vec<String>>,
}

fn default_readme() -> String {
    "README.md".to_string()
}

fn default_content_type() -> String {
    "text/markdown".to_string()
}

/// A pre-built file that passed the existence check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    pub name: String,
    pub source: PathBuf,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StagedFile {
    pub name: String,
    pub destination: PathBuf,
    pub size: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StageReport {
    pub binaries: Vec<StagedFile>,
    pub scripts: Vec<StagedFile>,
    #[serde(skip)]
    pub long_description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PackageOutcome {
    pub output_dir: PathBuf,
    pub metadata_path: PathBuf,
    pub report: StageReport,
    pub archive_path: Option<PathBuf>,
}

/// Everything a run will touch, resolved to concrete paths.
#[derive(Debug, Clone, Serialize)]
pub struct StagePlan {
    pub package: String,
    pub version: String,
    pub bin_dir: PathBuf,
    pub binaries: Vec<String>,
    pub output_dir: PathBuf,
    pub scripts_source_dir: PathBuf,
    pub scripts: Vec<String>,
    pub scripts_output_dir: PathBuf,
    pub readme: PathBuf,
    pub dist_dir: Option<PathBuf>,
}

/// Output of the verify phase. Nothing has been copied when this exists.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VerifiedInputs {
    pub binaries: Vec<Artifact>,
    pub scripts: Vec<Artifact>,
    /// README text, already decoded.
    pub long_description: String,
}
