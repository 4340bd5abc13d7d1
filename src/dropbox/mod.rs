pub mod client;
pub mod content;
pub mod hash;
pub mod listing;
pub mod types;

pub use client::DropboxClient;
pub use hash::content_hash;
pub use types::{normalize_folder_path, DownloadedFile, FileMetadata, FileSelector};
