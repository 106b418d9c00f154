//! Loading user supplied reference images from disk.

use std::path::Path;

use clickforge_core::{ClickforgeError, ImageData, Result};
use tracing::debug;

/// Largest reference image accepted, in bytes.
pub const MAX_REFERENCE_BYTES: u64 = 5 * 1024 * 1024;

/// Image types the image model accepts as conditioning input.
pub const SUPPORTED_MIME_TYPES: &[&str] = &["image/png", "image/jpeg", "image/webp", "image/gif"];

/// Reads an image file into a data URL, validating type and size.
pub async fn load_reference_image(path: &Path) -> Result<ImageData> {
    let mime = mime_guess::from_path(path)
        .first()
        .map(|mime| mime.essence_str().to_string())
        .ok_or_else(|| {
            ClickforgeError::invalid_input(format!(
                "cannot tell the image type of {}",
                path.display()
            ))
        })?;
    if !SUPPORTED_MIME_TYPES.contains(&mime.as_str()) {
        return Err(ClickforgeError::invalid_input(format!(
            "{} is {mime}; expected one of {}",
            path.display(),
            SUPPORTED_MIME_TYPES.join(", ")
        )));
    }

    let metadata = tokio::fs::metadata(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ClickforgeError::not_found("reference image", path.display().to_string())
        } else {
            e.into()
        }
    })?;
    if metadata.len() > MAX_REFERENCE_BYTES {
        return Err(ClickforgeError::invalid_input(format!(
            "reference image is {} bytes; the limit is 5 MB",
            metadata.len()
        )));
    }

    let bytes = tokio::fs::read(path).await?;
    debug!(path = %path.display(), mime = %mime, size = bytes.len(), "loaded reference image");
    Ok(ImageData::from_bytes(&mime, &bytes))
}
