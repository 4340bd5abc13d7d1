use std::path::{Path, PathBuf};

use crate::dropbox::FileMetadata;
use crate::error::GalleryboxError;

/// Default snapshot location for a gallery: `~/.gallerybox/snapshots/<name>.json`.
pub fn default_snapshot_path(gallery: &str) -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".gallerybox")
        .join("snapshots")
        .join(format!("{gallery}.json"))
}

/// Read a snapshot. `Ok(None)` when the file does not exist.
pub fn load_snapshot(path: &Path) -> Result<Option<Vec<FileMetadata>>, GalleryboxError> {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    serde_json::from_str(&data)
        .map(Some)
        .map_err(|e| GalleryboxError::ConfigError {
            path: path.to_path_buf(),
            detail: format!("Invalid snapshot: {e}"),
        })
}

pub fn save_snapshot(path: &Path, assets: &[FileMetadata]) -> Result<(), GalleryboxError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_string_pretty(assets).map_err(|e| {
        GalleryboxError::ProtocolError(format!("Failed to serialize snapshot: {e}"))
    })?;
    std::fs::write(path, data)?;
    tracing::info!("Wrote {} assets to snapshot {}", assets.len(), path.display());
    Ok(())
}
