use async_trait::async_trait;

use crate::dropbox::{DownloadedFile, DropboxClient, FileMetadata, FileSelector};
use crate::error::GalleryboxError;

impl std::fmt::Debug for dyn AssetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetStore").finish()
    }
}

/// Where gallery assets live. Dropbox in production; tests swap in their own.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// All files directly under a folder, in listing order.
    async fn list_folder(&self, path: &str) -> Result<Vec<FileMetadata>, GalleryboxError>;

    /// Raw bytes plus whatever metadata the store can attach.
    async fn download_file(&self, selector: &FileSelector)
        -> Result<DownloadedFile, GalleryboxError>;

    /// A short-lived URL a browser can fetch directly.
    async fn get_temporary_link(&self, selector: &FileSelector) -> Result<String, GalleryboxError>;
}

#[async_trait]
impl AssetStore for DropboxClient {
    async fn list_folder(&self, path: &str) -> Result<Vec<FileMetadata>, GalleryboxError> {
        DropboxClient::list_folder(self, path).await
    }

    async fn download_file(
        &self,
        selector: &FileSelector,
    ) -> Result<DownloadedFile, GalleryboxError> {
        DropboxClient::download_file(self, selector).await
    }

    async fn get_temporary_link(&self, selector: &FileSelector) -> Result<String, GalleryboxError> {
        DropboxClient::get_temporary_link(self, selector).await
    }
}
