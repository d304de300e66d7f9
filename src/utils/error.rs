use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PackError {
    #[error("Expected pre-built binary not found: {}", .path.display())]
    MissingArtifact { path: PathBuf },

    #[error("Expected script not found: {}", .path.display())]
    MissingScript { path: PathBuf },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Artifact,
    Configuration,
    Io,
    Packaging,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl PackError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PackError::MissingArtifact { .. } | PackError::MissingScript { .. } => {
                ErrorCategory::Artifact
            }
            PackError::IoError(_) => ErrorCategory::Io,
            PackError::ZipError(_) | PackError::SerializationError(_) => ErrorCategory::Packaging,
            PackError::ConfigValidationError { .. }
            | PackError::InvalidConfigValueError { .. }
            | PackError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    /// Process exit code for a failed run. Never zero.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Artifact | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io | ErrorCategory::Packaging => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            PackError::MissingArtifact { .. } => {
                "Run the CMake build first so that build/bin contains every binary".to_string()
            }
            PackError::MissingScript { .. } => {
                "Check that the scripts directory contains a file for every script name"
                    .to_string()
            }
            PackError::IoError(_) => {
                "Check file permissions and free disk space in the output directory".to_string()
            }
            PackError::ZipError(_) => "Remove the dist directory and try again".to_string(),
            PackError::SerializationError(_) => {
                "This is likely a bug; rerun with --verbose and report it".to_string()
            }
            PackError::ConfigValidationError { field, .. }
            | PackError::InvalidConfigValueError { field, .. }
            | PackError::MissingConfigError { field } => {
                format!("Fix '{}' in the package manifest", field)
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PackError::MissingArtifact { path } => format!(
                "Build output is incomplete: {} does not exist",
                path.display()
            ),
            PackError::MissingScript { path } => {
                format!("Script {} does not exist", path.display())
            }
            PackError::ConfigValidationError { .. }
            | PackError::InvalidConfigValueError { .. }
            | PackError::MissingConfigError { .. } => {
                format!("Package manifest is invalid: {}", self)
            }
            _ => format!("Packaging failed: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, PackError>;
