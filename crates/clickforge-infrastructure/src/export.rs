//! Writing rendered thumbnails to disk.

use std::path::{Path, PathBuf};

use clickforge_core::{Result, Thumbnail};
use tracing::info;

/// Decodes the thumbnail image and writes it.
///
/// `target` may be a directory (the suggested file name is appended) or a
/// full file path. Missing parent directories are created.
pub async fn export_thumbnail(thumbnail: &Thumbnail, target: &Path) -> Result<PathBuf> {
    let bytes = thumbnail.image.decode()?;

    let path = if target.is_dir() || target.extension().is_none() {
        target.join(thumbnail.file_name())
    } else {
        target.to_path_buf()
    };
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&path, &bytes).await?;

    info!(id = %thumbnail.id, path = %path.display(), size = bytes.len(), "exported thumbnail");
    Ok(path)
}
