use crate::utils::error::{PackError, Result};
use regex::Regex;
use std::collections::HashSet;
use std::path::{Component, Path};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

// PEP 440 public release segment with optional pre/post/dev suffixes.
const VERSION_PATTERN: &str =
    r"^\d+(\.\d+)*((a|b|rc)\d+)?(\.post\d+)?(\.dev\d+)?$";

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(PackError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(PackError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(PackError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(PackError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(PackError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PackError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// A file name must stay inside the directory it is joined onto.
pub fn validate_file_name(field_name: &str, name: &str) -> Result<()> {
    validate_non_empty_string(field_name, name)?;

    if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        return Err(PackError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: name.to_string(),
            reason: "Name must be a plain file name without path separators".to_string(),
        });
    }

    Ok(())
}

pub fn validate_file_names(field_name: &str, names: &[String]) -> Result<()> {
    let mut seen = HashSet::new();
    for name in names {
        validate_file_name(field_name, name)?;
        if !seen.insert(name.as_str()) {
            return Err(PackError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: name.clone(),
                reason: "Duplicate name".to_string(),
            });
        }
    }
    Ok(())
}

fn lexical_components(path: &Path) -> Vec<Component<'_>> {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Copying into the directory being copied from would truncate the sources.
pub fn validate_distinct_dirs(field_name: &str, dir: &Path, source: &Path) -> Result<()> {
    let same = match (dir.canonicalize(), source.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => lexical_components(dir) == lexical_components(source),
    };

    if same {
        return Err(PackError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: dir.display().to_string(),
            reason: format!("Must differ from the source directory {}", source.display()),
        });
    }
    Ok(())
}

pub fn validate_version(field_name: &str, version: &str) -> Result<()> {
    let re = Regex::new(VERSION_PATTERN).map_err(|e| PackError::ConfigValidationError {
        field: field_name.to_string(),
        message: format!("version pattern failed to compile: {}", e),
    })?;

    if !re.is_match(version) {
        return Err(PackError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: version.to_string(),
            reason: "Not a valid release version (expected e.g. 0.0.1 or 1.2rc1)".to_string(),
        });
    }
    Ok(())
}

pub fn validate_email(field_name: &str, email: &str) -> Result<()> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(PackError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: email.to_string(),
            reason: "Not a valid email address".to_string(),
        }),
    }
}
