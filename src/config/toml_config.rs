use crate::core::ConfigProvider;
use crate::domain::model::{PackageMetadata, StagePlan};
use crate::utils::error::{PackError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_BINARIES: [&str; 2] = ["circt-opt", "firtool"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageManifest {
    pub package: PackageMetadata,
    #[serde(default)]
    pub build: BuildConfig,
    #[serde(default)]
    pub scripts: ScriptConfig,
    pub dist: Option<DistConfig>,
    /// Directory the manifest was loaded from; relative paths resolve against it.
    #[serde(skip)]
    base_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    #[serde(default = "default_root_dir")]
    pub root_dir: String,
    #[serde(default = "default_bin_dir")]
    pub bin_dir: String,
    #[serde(default = "default_binaries")]
    pub binaries: Vec<String>,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScriptConfig {
    pub dir: Option<String>,
    /// Falls back to the binary names when omitted.
    pub names: Option<Vec<String>>,
    pub output_dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_dist_dir")]
    pub output_dir: String,
}

fn default_root_dir() -> String {
    ".".to_string()
}

fn default_bin_dir() -> String {
    "build/bin".to_string()
}

fn default_binaries() -> Vec<String> {
    DEFAULT_BINARIES.iter().map(|s| s.to_string()).collect()
}

fn default_output_dir() -> String {
    "build/lib".to_string()
}

fn default_dist_dir() -> String {
    "dist".to_string()
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            root_dir: default_root_dir(),
            bin_dir: default_bin_dir(),
            binaries: default_binaries(),
            output_dir: default_output_dir(),
        }
    }
}

impl PackageManifest {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(PackError::IoError)?;
        let mut manifest = Self::from_toml_str(&content)?;
        manifest.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(manifest)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PackError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CIRCT_VERSION})，未定義的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PackError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Replaces the staging output directory. Relative paths are taken from the
    /// current working directory, not the manifest location.
    pub fn set_output_dir(&mut self, dir: &Path) -> Result<()> {
        let absolute = if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            std::env::current_dir()?.join(dir)
        };
        self.build.output_dir = absolute.to_string_lossy().into_owned();
        Ok(())
    }

    pub fn enable_dist(&mut self) {
        match self.dist.as_mut() {
            Some(dist) => dist.enabled = true,
            None => {
                self.dist = Some(DistConfig {
                    enabled: true,
                    output_dir: default_dist_dir(),
                })
            }
        }
    }

    pub fn script_names(&self) -> &[String] {
        self.scripts
            .names
            .as_deref()
            .unwrap_or(&self.build.binaries)
    }

    pub fn dist_enabled(&self) -> bool {
        self.dist.as_ref().map(|d| d.enabled).unwrap_or(false)
    }

    /// Turns manifest paths into the concrete plan a run executes.
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        self.validate()?;

        let root = self.base_dir.join(&self.build.root_dir);
        let output_dir = root.join(&self.build.output_dir);
        let scripts_output_dir = match &self.scripts.output_dir {
            Some(dir) => root.join(dir),
            None => output_dir.join("scripts"),
        };
        let dist_dir = self
            .dist
            .as_ref()
            .filter(|d| d.enabled)
            .map(|d| root.join(&d.output_dir));
        let bin_dir = root.join(&self.build.bin_dir);
        let scripts_source_dir = root.join(self.scripts.dir.as_deref().unwrap_or("scripts"));

        validation::validate_distinct_dirs("build.output_dir", &output_dir, &bin_dir)?;
        validation::validate_distinct_dirs(
            "scripts.output_dir",
            &scripts_output_dir,
            &scripts_source_dir,
        )?;

        let plan = StagePlan {
            package: self.package.name.clone(),
            version: self.package.version.clone(),
            bin_dir,
            binaries: self.build.binaries.clone(),
            output_dir,
            scripts_source_dir,
            scripts: self.script_names().to_vec(),
            scripts_output_dir,
            readme: root.join(&self.package.readme),
            dist_dir,
        };

        Ok(ResolvedConfig {
            metadata: self.package.clone(),
            plan,
        })
    }
}

impl Validate for PackageManifest {
    fn validate(&self) -> Result<()> {
        let pkg = &self.package;
        validation::validate_non_empty_string("package.name", &pkg.name)?;
        validation::validate_version("package.version", &pkg.version)?;
        validation::validate_non_empty_string("package.author", &pkg.author)?;
        validation::validate_email("package.author_email", &pkg.author_email)?;
        validation::validate_url("package.url", &pkg.url)?;
        validation::validate_non_empty_string("package.description", &pkg.description)?;
        validation::validate_path("package.readme", &pkg.readme)?;
        validation::validate_non_empty_string(
            "package.python_requires",
            &pkg.python_requires,
        )?;
        for (extra, requirements) in &pkg.extras {
            validation::validate_non_empty_string("package.extras", extra)?;
            for req in requirements {
                validation::validate_non_empty_string(&format!("package.extras.{}", extra), req)?;
            }
        }

        validation::validate_path("build.root_dir", &self.build.root_dir)?;
        validation::validate_path("build.bin_dir", &self.build.bin_dir)?;
        validation::validate_path("build.output_dir", &self.build.output_dir)?;
        if self.build.binaries.is_empty() {
            return Err(PackError::MissingConfigError {
                field: "build.binaries".to_string(),
            });
        }
        validation::validate_file_names("build.binaries", &self.build.binaries)?;

        if let Some(dir) = &self.scripts.dir {
            validation::validate_path("scripts.dir", dir)?;
        }
        if let Some(dir) = &self.scripts.output_dir {
            validation::validate_path("scripts.output_dir", dir)?;
        }
        validation::validate_file_names("scripts.names", self.script_names())?;

        if let Some(dist) = &self.dist {
            validation::validate_path("dist.output_dir", &dist.output_dir)?;
        }

        Ok(())
    }
}

/// A validated manifest with every path resolved.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub metadata: PackageMetadata,
    pub plan: StagePlan,
}

impl ConfigProvider for ResolvedConfig {
    fn metadata(&self) -> &PackageMetadata {
        &self.metadata
    }

    fn plan(&self) -> &StagePlan {
        &self.plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[package]
name = "hgdb-circt"
version = "0.0.1"
author = "Keyi Zhang"
author_email = "keyi@cs.stanford.edu"
url = "https://github.com/Kuree/hgdb-circt"
description = "Circt binary patched with hgdb"
python_requires = ">=3.6"

[package.extras]
test = ["pytest>=6.0"]
"#;

    #[test]
    fn test_parse_basic_manifest_uses_defaults() {
        let manifest = PackageManifest::from_toml_str(BASIC).unwrap();

        assert_eq!(manifest.package.name, "hgdb-circt");
        assert_eq!(manifest.package.readme, "README.md");
        assert_eq!(manifest.package.long_description_content_type, "text/markdown");
        assert_eq!(manifest.build.binaries, vec!["circt-opt", "firtool"]);
        assert_eq!(manifest.script_names(), &["circt-opt", "firtool"]);
        assert!(!manifest.dist_enabled());
        assert!(manifest.validate().is_ok());
    }

    #[test]
    fn test_resolve_paths_against_root() {
        let manifest = PackageManifest::from_toml_str(BASIC).unwrap();
        let resolved = manifest.resolve().unwrap();
        let plan = resolved.plan();

        assert_eq!(plan.bin_dir, Path::new("./build/bin"));
        assert_eq!(plan.output_dir, Path::new("./build/lib"));
        assert_eq!(plan.scripts_source_dir, Path::new("./scripts"));
        assert_eq!(plan.scripts_output_dir, Path::new("./build/lib/scripts"));
        assert_eq!(plan.readme, Path::new("./README.md"));
        assert!(plan.dist_dir.is_none());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("HGDB_CIRCT_TEST_VERSION", "1.4.2");

        let content = BASIC.replace("\"0.0.1\"", "\"${HGDB_CIRCT_TEST_VERSION}\"");
        let manifest = PackageManifest::from_toml_str(&content).unwrap();
        assert_eq!(manifest.package.version, "1.4.2");

        std::env::remove_var("HGDB_CIRCT_TEST_VERSION");
    }

    #[test]
    fn test_unknown_env_var_is_kept_and_rejected_by_validation() {
        let content = BASIC.replace("\"0.0.1\"", "\"${HGDB_CIRCT_UNSET_VAR}\"");
        let manifest = PackageManifest::from_toml_str(&content).unwrap();
        assert_eq!(manifest.package.version, "${HGDB_CIRCT_UNSET_VAR}");
        assert!(manifest.validate().is_err());
    }

    #[test]
    fn test_scripts_may_differ_from_binaries() {
        let content = format!(
            "{}\n[build]\nbinaries = [\"circt-opt\", \"firtool\"]\n\n[scripts]\nnames = [\"firtool\"]\n",
            BASIC
        );
        let manifest = PackageManifest::from_toml_str(&content).unwrap();
        assert_eq!(manifest.script_names(), &["firtool"]);
    }

    #[test]
    fn test_rejects_empty_binary_list() {
        let content = format!("{}\n[build]\nbinaries = []\n", BASIC);
        let manifest = PackageManifest::from_toml_str(&content).unwrap();
        assert!(matches!(
            manifest.validate(),
            Err(PackError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_url() {
        let content = BASIC.replace("https://github.com/Kuree/hgdb-circt", "not a url");
        let manifest = PackageManifest::from_toml_str(&content).unwrap();
        assert!(manifest.resolve().is_err());
    }

    #[test]
    fn test_rejects_output_dir_equal_to_bin_dir() {
        let content = format!("{}\n[build]\noutput_dir = \"./build/bin\"\n", BASIC);
        let manifest = PackageManifest::from_toml_str(&content).unwrap();
        match manifest.resolve() {
            Err(PackError::InvalidConfigValueError { field, .. }) => {
                assert_eq!(field, "build.output_dir")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_scripts_output_equal_to_scripts_dir() {
        let content = format!(
            "{}\n[scripts]\ndir = \"scripts\"\noutput_dir = \"scripts\"\n",
            BASIC
        );
        let manifest = PackageManifest::from_toml_str(&content).unwrap();
        match manifest.resolve() {
            Err(PackError::InvalidConfigValueError { field, .. }) => {
                assert_eq!(field, "scripts.output_dir")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_output_override_onto_existing_bin_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let bin_dir = dir.path().join("build").join("bin");
        std::fs::create_dir_all(&bin_dir).unwrap();
        std::fs::write(dir.path().join("package.toml"), BASIC).unwrap();

        let mut manifest = PackageManifest::from_file(dir.path().join("package.toml")).unwrap();
        manifest.set_output_dir(&bin_dir).unwrap();
        assert!(matches!(
            manifest.resolve(),
            Err(PackError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_manifest_load_errors_carry_recovery_hint() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = PackageManifest::from_file(dir.path().join("package.toml")).unwrap_err();
        assert!(matches!(err, PackError::IoError(_)));
        assert_eq!(err.exit_code(), 3);
        assert!(!err.recovery_suggestion().is_empty());

        let err = PackageManifest::from_toml_str("[package\nname = ").unwrap_err();
        assert_eq!(err.exit_code(), 1);
        assert!(err.user_friendly_message().contains("manifest"));
    }

    #[test]
    fn test_malformed_toml() {
        let err = PackageManifest::from_toml_str("[package\nname = ").unwrap_err();
        assert!(matches!(err, PackError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_enable_dist_and_output_override() {
        let mut manifest = PackageManifest::from_toml_str(BASIC).unwrap();
        manifest.enable_dist();
        manifest.set_output_dir(Path::new("/tmp/hgdb-out")).unwrap();

        let plan = manifest.resolve().unwrap().plan;
        assert_eq!(plan.output_dir, Path::new("/tmp/hgdb-out"));
        assert_eq!(plan.dist_dir, Some(PathBuf::from("./dist")));
    }

    #[test]
    fn test_manifest_from_file_resolves_next_to_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut file = NamedTempFile::new_in(dir.path()).unwrap();
        file.write_all(BASIC.as_bytes()).unwrap();

        let manifest = PackageManifest::from_file(file.path()).unwrap();
        assert_eq!(manifest.base_dir(), dir.path());

        let plan = manifest.resolve().unwrap().plan;
        assert!(plan.bin_dir.starts_with(dir.path()));
    }
}
