use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GalleryboxError;

/// Attributes of a remote file as they were when it was listed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMetadata {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub path_display: Option<String>,
    #[serde(default)]
    pub path_lower: Option<String>,
    #[serde(default)]
    pub client_modified: Option<DateTime<Utc>>,
    #[serde(default)]
    pub server_modified: Option<DateTime<Utc>>,
    #[serde(default)]
    pub size: u64,
    #[serde(default = "default_downloadable")]
    pub is_downloadable: bool,
    #[serde(default)]
    pub content_hash: Option<String>,
}

fn default_downloadable() -> bool {
    true
}

impl FileMetadata {
    /// Best path to show a user: display casing first, then the lowercased path, then the name.
    pub fn display_path(&self) -> &str {
        self.path_display
            .as_deref()
            .or(self.path_lower.as_deref())
            .unwrap_or(&self.name)
    }
}

/// One element of a `list_folder` page. Only files survive listing.
#[derive(Debug, Deserialize)]
#[serde(tag = ".tag", rename_all = "lowercase")]
pub(crate) enum ListEntry {
    File(FileMetadata),
    Folder {},
    Deleted {},
    #[serde(other)]
    Other,
}

impl ListEntry {
    pub(crate) fn into_file(self) -> Option<FileMetadata> {
        match self {
            ListEntry::File(meta) => Some(meta),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListFolderPage {
    #[serde(default)]
    pub entries: Vec<ListEntry>,
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

impl ListFolderPage {
    /// The cursor to continue with, if the server says there is more.
    pub(crate) fn next_cursor(&self) -> Option<&str> {
        if self.has_more {
            self.cursor.as_deref().filter(|c| !c.is_empty())
        } else {
            None
        }
    }
}

/// Identifies a remote file by id, by path, or both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSelector {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

impl FileSelector {
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            path: None,
        }
    }

    pub fn by_path(path: impl Into<String>) -> Self {
        Self {
            id: None,
            path: Some(path.into()),
        }
    }

    /// The value sent as Dropbox's `path` argument. The id wins when both are set.
    pub fn wire_value(&self) -> Result<&str, GalleryboxError> {
        non_empty(&self.id)
            .or_else(|| non_empty(&self.path))
            .ok_or(GalleryboxError::EmptySelector)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl From<&FileMetadata> for FileSelector {
    fn from(meta: &FileMetadata) -> Self {
        Self {
            id: Some(meta.id.clone()),
            path: meta.path_lower.clone(),
        }
    }
}

/// A downloaded file with whatever metadata Dropbox attached to it.
#[derive(Debug, Clone)]
pub struct DownloadedFile {
    pub metadata: Option<FileMetadata>,
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Normalize a folder path for `list_folder`: leading slash, no trailing slash,
/// and the root spelled as the empty string.
pub fn normalize_folder_path(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
