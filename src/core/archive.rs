use crate::core::Storage;
use crate::domain::model::{PackageMetadata, StageReport};
use crate::utils::error::Result;
use sha2::{Digest, Sha256};
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::{SimpleFileOptions, ZipWriter};

pub const RECORD: &str = "RECORD";

pub fn archive_file_name(metadata: &PackageMetadata) -> String {
    format!("{}-{}.zip", metadata.name, metadata.version)
}

/// One `RECORD` line: archive path, hex sha256 and byte size.
pub fn record_line(path: &str, data: &[u8]) -> String {
    format!("{},sha256={:x},{}", path, Sha256::digest(data), data.len())
}

/// Bundles staged binaries, scripts and `PKG-INFO` into
/// `<dist_dir>/<name>-<version>.zip` and returns its path. Binaries sit at the
/// archive root, the same layout as the staging output directory.
pub async fn build_archive<S: Storage>(
    storage: &S,
    dist_dir: &Path,
    metadata: &PackageMetadata,
    report: &StageReport,
    pkg_info: &str,
) -> Result<PathBuf> {
    let mut entries: Vec<(String, Vec<u8>, bool)> = Vec::new();
    for binary in &report.binaries {
        let data = storage.read_file(&binary.destination).await?;
        entries.push((binary.name.clone(), data, true));
    }
    for script in &report.scripts {
        let data = storage.read_file(&script.destination).await?;
        entries.push((
            format!("{}.data/scripts/{}", metadata.name, script.name),
            data,
            true,
        ));
    }
    entries.push(("PKG-INFO".to_string(), pkg_info.as_bytes().to_vec(), false));

    let zip_data = {
        let executable = SimpleFileOptions::default().unix_permissions(0o755);
        let regular = SimpleFileOptions::default().unix_permissions(0o644);
        let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
        let mut record = Vec::with_capacity(entries.len() + 1);

        for (name, data, is_executable) in &entries {
            let options = if *is_executable {
                executable.clone()
            } else {
                regular.clone()
            };
            zip.start_file(name.as_str(), options)?;
            zip.write_all(data)?;
            record.push(record_line(name, data));
        }

        record.push(format!("{},,", RECORD));
        zip.start_file(RECORD, regular)?;
        zip.write_all(record.join("\n").as_bytes())?;
        zip.write_all(b"\n")?;

        let cursor = zip.finish()?;
        cursor.into_inner()
    };

    let archive_path = dist_dir.join(archive_file_name(metadata));
    tracing::debug!(
        "Writing archive ({} bytes, {} entries) to {}",
        zip_data.len(),
        entries.len() + 1,
        archive_path.display()
    );
    storage.write_file(&archive_path, &zip_data).await?;

    Ok(archive_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_line() {
        assert_eq!(
            record_line("PKG-INFO", b""),
            "PKG-INFO,sha256=e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855,0"
        );
    }
}
