//! Gallery summaries on top of an [`AssetStore`].
//!
//! A gallery is a configured Dropbox folder. Summaries list the folder live
//! and fall back to the last saved snapshot when the store fails, so a
//! Dropbox outage degrades to slightly stale data instead of an error.

pub mod snapshot;

use std::path::PathBuf;

use serde::Serialize;

use crate::config::{GalleryConfig, GalleryboxConfig};
use crate::dropbox::{normalize_folder_path, FileMetadata, FileSelector};
use crate::error::GalleryboxError;
use crate::store::AssetStore;

pub use snapshot::{default_snapshot_path, load_snapshot, save_snapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetSource {
    Dropbox,
    Snapshot,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssetPreview {
    #[serde(flatten)]
    pub file: FileMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GallerySummary {
    pub name: String,
    pub folder: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub source: AssetSource,
    pub asset_count: usize,
    pub previews: Vec<AssetPreview>,
    /// Why the live listing was not used, when `source` is `Snapshot`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryOptions {
    /// Mint a temporary link for every preview of a live listing.
    pub links: bool,
}

/// Look up a gallery by name, suggesting a close match when it is missing.
pub fn find_gallery<'a>(
    config: &'a GalleryboxConfig,
    name: &str,
) -> Result<&'a GalleryConfig, GalleryboxError> {
    config.galleries.get(name).ok_or_else(|| {
        let known: Vec<&str> = config.galleries.keys().map(String::as_str).collect();
        GalleryboxError::GalleryNotFound {
            name: name.to_string(),
            suggestion: suggest_gallery(name, &known),
        }
    })
}

/// Closest known name within Levenshtein distance 2, unless the match is ambiguous.
pub fn suggest_gallery(input: &str, known: &[&str]) -> Option<String> {
    let mut best: Option<(&str, usize)> = None;
    let mut ambiguous = false;

    for &candidate in known {
        let dist = strsim::levenshtein(input, candidate);
        match best {
            Some((_, best_dist)) if dist > best_dist => {}
            Some((_, best_dist)) if dist == best_dist => ambiguous = true,
            _ => {
                best = Some((candidate, dist));
                ambiguous = false;
            }
        }
    }

    match best {
        Some((name, dist)) if dist <= 2 && !ambiguous => Some(name.to_string()),
        _ => None,
    }
}

pub fn snapshot_path(name: &str, gallery: &GalleryConfig) -> PathBuf {
    gallery
        .snapshot
        .clone()
        .unwrap_or_else(|| default_snapshot_path(name))
}

/// Summarize a gallery: asset count plus the first `preview_count` assets.
pub async fn summarize(
    store: &dyn AssetStore,
    name: &str,
    gallery: &GalleryConfig,
    options: SummaryOptions,
) -> Result<GallerySummary, GalleryboxError> {
    let folder = normalize_folder_path(&gallery.folder);

    let (assets, source, fallback_reason) = match store.list_folder(&folder).await {
        Ok(assets) => (assets, AssetSource::Dropbox, None),
        Err(err) => {
            let path = snapshot_path(name, gallery);
            tracing::warn!("Listing gallery '{name}' failed ({err}); trying snapshot {}", path.display());
            match load_snapshot(&path) {
                Ok(Some(assets)) => (assets, AssetSource::Snapshot, Some(err.to_string())),
                Ok(None) => return Err(err),
                Err(snapshot_err) => {
                    tracing::warn!("Ignoring unusable snapshot for '{name}': {snapshot_err}");
                    return Err(err);
                }
            }
        }
    };

    let mut previews = Vec::new();
    for file in assets.iter().take(gallery.preview_count) {
        let link = if options.links && source == AssetSource::Dropbox {
            preview_link(store, file).await
        } else {
            None
        };
        previews.push(AssetPreview {
            file: file.clone(),
            link,
        });
    }

    Ok(GallerySummary {
        name: name.to_string(),
        folder,
        description: gallery.description.clone(),
        source,
        asset_count: assets.len(),
        previews,
        fallback_reason,
    })
}

async fn preview_link(store: &dyn AssetStore, file: &FileMetadata) -> Option<String> {
    match store.get_temporary_link(&FileSelector::from(file)).await {
        Ok(link) => Some(link),
        Err(e) => {
            tracing::warn!("No preview link for {}: {e}", file.display_path());
            None
        }
    }
}

/// List the gallery live and store the result as its snapshot.
pub async fn refresh_snapshot(
    store: &dyn AssetStore,
    name: &str,
    gallery: &GalleryConfig,
) -> Result<(PathBuf, usize), GalleryboxError> {
    let assets = store
        .list_folder(&normalize_folder_path(&gallery.folder))
        .await?;
    let path = snapshot_path(name, gallery);
    save_snapshot(&path, &assets)?;
    Ok((path, assets.len()))
}
