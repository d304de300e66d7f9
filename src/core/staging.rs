use crate::core::Storage;
use crate::domain::model::{Artifact, StagedFile};
use crate::utils::error::{PackError, Result};
use std::path::{Path, PathBuf};

/// Checks that `source_dir/<name>` is a regular file for every name, in order.
/// Stops at the first missing one; `missing` builds the error for its path.
pub async fn verify_artifacts<S, F>(
    storage: &S,
    source_dir: &Path,
    names: &[String],
    missing: F,
) -> Result<Vec<Artifact>>
where
    S: Storage,
    F: Fn(PathBuf) -> PackError,
{
    let mut artifacts = Vec::with_capacity(names.len());

    for name in names {
        let source = source_dir.join(name);
        match storage.file_size(&source).await? {
            Some(size) => {
                tracing::debug!("Found {} ({} bytes)", source.display(), size);
                artifacts.push(Artifact {
                    name: name.clone(),
                    source,
                    size,
                });
            }
            None => {
                tracing::error!("Missing expected file: {}", source.display());
                return Err(missing(source));
            }
        }
    }

    Ok(artifacts)
}

/// Copies already-verified artifacts into `dest_dir`, creating it if needed.
pub async fn copy_artifacts<S: Storage>(
    storage: &S,
    artifacts: &[Artifact],
    dest_dir: &Path,
) -> Result<Vec<StagedFile>> {
    storage.create_dir_all(dest_dir).await?;

    let mut staged = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let destination = dest_dir.join(&artifact.name);
        let size = storage.copy_file(&artifact.source, &destination).await?;
        tracing::debug!(
            "Copied {} -> {}",
            artifact.source.display(),
            destination.display()
        );
        staged.push(StagedFile {
            name: artifact.name.clone(),
            destination,
            size,
        });
    }

    Ok(staged)
}

/// Verifies every binary under `source_dir`, then copies them all into
/// `dest_dir`. Nothing is copied unless every binary is present.
pub async fn stage_binaries<S: Storage>(
    storage: &S,
    names: &[String],
    source_dir: &Path,
    dest_dir: &Path,
) -> Result<Vec<StagedFile>> {
    let artifacts = verify_artifacts(storage, source_dir, names, |path| {
        PackError::MissingArtifact { path }
    })
    .await?;

    copy_artifacts(storage, &artifacts, dest_dir).await
}
