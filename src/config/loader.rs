use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::GalleryboxError;

use super::env::{expand_dropbox_settings, expand_gallery_config};
use super::types::{DropboxSettings, GalleryConfig, GalleryboxConfig};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "GALLERYBOX_CONFIG";

/// Discover config files in precedence order (highest first).
///
/// 1. `--config` CLI flag
/// 2. `GALLERYBOX_CONFIG` env var
/// 3. `./config/gallerybox.json` (project-level)
/// 4. `~/.gallerybox/gallerybox.json` (home-level)
pub fn discover_config_files(cli_config: Option<&str>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(path) = cli_config {
        candidates.push(PathBuf::from(path));
    }
    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        candidates.push(PathBuf::from(env_path));
    }
    candidates.push(PathBuf::from("./config/gallerybox.json"));
    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join(".gallerybox").join("gallerybox.json"));
    }

    let mut files: Vec<PathBuf> = Vec::new();
    for path in candidates {
        if path.exists() && !files.contains(&path) {
            files.push(path);
        }
    }
    files
}

fn load_config_file(path: &Path) -> Result<GalleryboxConfig, GalleryboxError> {
    let content = std::fs::read_to_string(path).map_err(|e| GalleryboxError::ConfigError {
        path: path.to_path_buf(),
        detail: format!("Cannot read file: {e}"),
    })?;

    serde_json::from_str::<GalleryboxConfig>(&content).map_err(|e| GalleryboxError::ConfigError {
        path: path.to_path_buf(),
        detail: format!("Invalid JSON: {e}"),
    })
}

/// Earlier sources win for the same gallery name.
fn merge_galleries(target: &mut HashMap<String, GalleryConfig>, source: HashMap<String, GalleryConfig>) {
    for (name, gallery) in source {
        target.entry(name).or_insert(gallery);
    }
}

/// Merge already-parsed configs, highest precedence first.
///
/// The `dropbox` section is taken whole from the first config that has one.
pub fn merge_configs(configs: Vec<GalleryboxConfig>) -> GalleryboxConfig {
    let mut dropbox: Option<DropboxSettings> = None;
    let mut galleries = HashMap::new();
    for cfg in configs {
        if dropbox.is_none() {
            dropbox = cfg.dropbox;
        }
        merge_galleries(&mut galleries, cfg.galleries);
    }
    GalleryboxConfig { dropbox, galleries }
}

/// Load, merge and expand all configuration.
///
/// An explicit `--config` path that does not exist is an error; every other
/// location is optional.
pub fn load_config(cli_config: Option<&str>) -> Result<GalleryboxConfig, GalleryboxError> {
    if let Some(path) = cli_config {
        if !Path::new(path).exists() {
            return Err(GalleryboxError::ConfigError {
                path: PathBuf::from(path),
                detail: "File does not exist".to_string(),
            });
        }
    }

    let files = discover_config_files(cli_config);
    tracing::debug!("Loading config from {:?}", files);

    let parsed = files
        .iter()
        .map(|path| load_config_file(path))
        .collect::<Result<Vec<_>, _>>()?;
    let mut config = merge_configs(parsed);

    if let Some(ref mut settings) = config.dropbox {
        expand_dropbox_settings(settings)?;
    }
    for gallery in config.galleries.values_mut() {
        expand_gallery_config(gallery)?;
    }

    Ok(config)
}
