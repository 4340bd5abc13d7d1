use serde_json::json;

use crate::error::GalleryboxError;

use super::client::DropboxClient;
use super::types::{FileMetadata, ListFolderPage};

impl DropboxClient {
    /// List every file directly under `path`, following pagination.
    ///
    /// Folders and deletion markers are dropped. Pages are fetched one after
    /// another, and a failure on any page fails the whole listing.
    pub async fn list_folder(&self, path: &str) -> Result<Vec<FileMetadata>, GalleryboxError> {
        let first = json!({
            "path": path,
            "recursive": false,
            "include_media_info": false,
            "include_deleted": false,
            "include_non_downloadable_files": true,
        });

        let mut page: ListFolderPage = self.rpc("files/list_folder", &first).await?;
        let mut files = Vec::new();
        let mut pages = 1;

        loop {
            let cursor = page.next_cursor().map(str::to_string);
            files.extend(page.entries.into_iter().filter_map(|e| e.into_file()));

            let Some(cursor) = cursor else {
                break;
            };
            page = self
                .rpc("files/list_folder/continue", &json!({ "cursor": cursor }))
                .await?;
            pages += 1;
        }

        tracing::debug!("Listed {} files in '{}' across {} pages", files.len(), path, pages);
        Ok(files)
    }
}
