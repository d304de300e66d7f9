use crate::core::Storage;
use crate::domain::model::PackageMetadata;
use crate::utils::error::Result;
use std::path::Path;

pub const PKG_INFO: &str = "PKG-INFO";

/// Reads the long description. The file must be valid UTF-8.
pub async fn read_long_description<S: Storage>(storage: &S, path: &Path) -> Result<String> {
    let bytes = storage.read_file(path).await?;
    let text = String::from_utf8(bytes).map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("{} is not valid UTF-8: {}", path.display(), e),
        )
    })?;
    Ok(text)
}

/// Renders core metadata (version 2.1) with the long description as the body.
pub fn render_pkg_info(metadata: &PackageMetadata, long_description: &str) -> String {
    let mut headers = vec![
        "Metadata-Version: 2.1".to_string(),
        format!("Name: {}", metadata.name),
        format!("Version: {}", metadata.version),
        format!("Summary: {}", metadata.description),
        format!("Home-page: {}", metadata.url),
        format!("Author: {}", metadata.author),
        format!("Author-email: {}", metadata.author_email),
        format!("Requires-Python: {}", metadata.python_requires),
    ];

    for (extra, requirements) in &metadata.extras {
        headers.push(format!("Provides-Extra: {}", extra));
        for req in requirements {
            headers.push(format!("Requires-Dist: {}; extra == \"{}\"", req, extra));
        }
    }

    headers.push(format!(
        "Description-Content-Type: {}",
        metadata.long_description_content_type
    ));

    let mut out = headers.join("\n");
    out.push_str("\n\n");
    out.push_str(long_description);
    out
}

pub async fn write_pkg_info<S: Storage>(
    storage: &S,
    output_dir: &Path,
    metadata: &PackageMetadata,
    long_description: &str,
) -> Result<String> {
    let rendered = render_pkg_info(metadata, long_description);
    storage
        .write_file(&output_dir.join(PKG_INFO), rendered.as_bytes())
        .await?;
    Ok(rendered)
}
