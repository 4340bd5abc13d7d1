use tokio::sync::OnceCell;

use crate::config::{load_config, GalleryConfig, GalleryboxConfig};
use crate::dropbox::DropboxClient;
use crate::error::GalleryboxError;
use crate::gallery::{self, GallerySummary, SummaryOptions};

/// Merged configuration plus a lazily built Dropbox client.
///
/// The client is created on first use, so commands that never touch Dropbox
/// (like `gallery list`) work without credentials.
pub struct Runtime {
    config: GalleryboxConfig,
    client: OnceCell<DropboxClient>,
}

impl Runtime {
    /// Create a Runtime by loading and merging all config sources.
    pub fn from_config(cli_config: Option<&str>) -> Result<Self, GalleryboxError> {
        Ok(Self::with_config(load_config(cli_config)?))
    }

    pub fn with_config(config: GalleryboxConfig) -> Self {
        Self {
            config,
            client: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &GalleryboxConfig {
        &self.config
    }

    /// The shared Dropbox client, built on first call.
    pub async fn client(&self) -> Result<&DropboxClient, GalleryboxError> {
        self.client
            .get_or_try_init(|| async {
                tracing::debug!("Creating Dropbox client");
                DropboxClient::from_settings(&self.config.dropbox_settings())
            })
            .await
    }

    /// Configured gallery names, sorted.
    pub fn gallery_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.config.galleries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn gallery(&self, name: &str) -> Result<&GalleryConfig, GalleryboxError> {
        gallery::find_gallery(&self.config, name)
    }

    pub async fn summarize_gallery(
        &self,
        name: &str,
        options: SummaryOptions,
    ) -> Result<GallerySummary, GalleryboxError> {
        let config = self.gallery(name)?;
        let client = self.client().await?;
        gallery::summarize(client, name, config, options).await
    }

    /// List a gallery live and save the result as its snapshot.
    pub async fn snapshot_gallery(
        &self,
        name: &str,
    ) -> Result<(std::path::PathBuf, usize), GalleryboxError> {
        let config = self.gallery(name)?;
        let client = self.client().await?;
        gallery::refresh_snapshot(client, name, config).await
    }
}
