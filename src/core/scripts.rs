use crate::core::staging::{copy_artifacts, verify_artifacts};
use crate::core::Storage;
use crate::domain::model::{Artifact, StagedFile};
use crate::utils::error::{PackError, Result};
use std::path::Path;

pub const SCRIPT_MANIFEST: &str = "scripts.json";

pub async fn verify_scripts<S: Storage>(
    storage: &S,
    source_dir: &Path,
    names: &[String],
) -> Result<Vec<Artifact>> {
    verify_artifacts(storage, source_dir, names, |path| PackError::MissingScript {
        path,
    })
    .await
}

/// Installs verified scripts into `dest_dir` and marks them executable.
pub async fn register_scripts<S: Storage>(
    storage: &S,
    scripts: &[Artifact],
    dest_dir: &Path,
) -> Result<Vec<StagedFile>> {
    let staged = copy_artifacts(storage, scripts, dest_dir).await?;
    for script in &staged {
        storage.set_executable(&script.destination).await?;
        tracing::debug!("Registered script {}", script.name);
    }
    Ok(staged)
}

/// Writes the list of registered script names next to the staged binaries.
pub async fn write_script_manifest<S: Storage>(
    storage: &S,
    output_dir: &Path,
    scripts: &[StagedFile],
) -> Result<()> {
    let names: Vec<&str> = scripts.iter().map(|s| s.name.as_str()).collect();
    let json = serde_json::to_string_pretty(&names)?;
    storage
        .write_file(&output_dir.join(SCRIPT_MANIFEST), json.as_bytes())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::cli::LocalStorage;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_script_is_reported() {
        let src = TempDir::new().unwrap();
        let result =
            verify_scripts(&LocalStorage::new(), src.path(), &["firtool".to_string()]).await;
        assert!(matches!(result, Err(PackError::MissingScript { .. })));
    }

    #[tokio::test]
    async fn test_register_and_manifest() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        std::fs::write(src.path().join("firtool"), b"#!/bin/sh\nexec firtool \"$@\"\n").unwrap();
        let storage = LocalStorage::new();

        let scripts = verify_scripts(&storage, src.path(), &["firtool".to_string()])
            .await
            .unwrap();
        let staged = register_scripts(&storage, &scripts, &out.path().join("scripts"))
            .await
            .unwrap();
        write_script_manifest(&storage, out.path(), &staged).await.unwrap();

        assert!(out.path().join("scripts").join("firtool").is_file());
        let manifest = std::fs::read_to_string(out.path().join(SCRIPT_MANIFEST)).unwrap();
        let names: Vec<String> = serde_json::from_str(&manifest).unwrap();
        assert_eq!(names, vec!["firtool"]);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(out.path().join("scripts").join("firtool"))
                .unwrap()
                .permissions()
                .mode();
            assert_eq!(mode & 0o111, 0o111);
        }
    }
}
