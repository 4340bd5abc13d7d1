pub mod cli;
pub mod config;
pub mod dropbox;
pub mod error;
pub mod gallery;
pub mod oauth;
pub mod retry;
pub mod runtime;
pub mod store;

pub use config::{load_config, DropboxSettings, GalleryConfig, GalleryboxConfig};
pub use dropbox::{DownloadedFile, DropboxClient, FileMetadata, FileSelector};
pub use error::GalleryboxError;
pub use oauth::{AccessToken, Credentials, RefreshPolicy, TokenManager};
pub use retry::RetryPolicy;
pub use runtime::Runtime;
pub use store::AssetStore;

/// One-shot convenience function: load config, list a folder, drop the client.
pub async fn list_once(
    cli_config: Option<&str>,
    folder: &str,
) -> Result<Vec<FileMetadata>, GalleryboxError> {
    let runtime = Runtime::from_config(cli_config)?;
    let client = runtime.client().await?;
    client
        .list_folder(&dropbox::normalize_folder_path(folder))
        .await
}
