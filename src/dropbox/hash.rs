use sha2::{Digest, Sha256};

use crate::error::GalleryboxError;

use super::types::DownloadedFile;

/// Dropbox hashes content in 4 MiB blocks.
pub const BLOCK_SIZE: usize = 4 * 1024 * 1024;

/// Compute Dropbox's `content_hash`: SHA-256 over the concatenated SHA-256
/// digests of each 4 MiB block, hex encoded.
pub fn content_hash(bytes: &[u8]) -> String {
    let mut overall = Sha256::new();
    for block in bytes.chunks(BLOCK_SIZE) {
        overall.update(Sha256::digest(block));
    }
    format!("{:x}", overall.finalize())
}

impl DownloadedFile {
    /// Check the bytes against the hash Dropbox reported. Without metadata or
    /// a reported hash there is nothing to compare and this succeeds.
    pub fn verify_content_hash(&self) -> Result<(), GalleryboxError> {
        let Some(meta) = self.metadata.as_ref() else {
            return Ok(());
        };
        let Some(expected) = meta.content_hash.as_deref() else {
            return Ok(());
        };
        let actual = content_hash(&self.bytes);
        if actual.eq_ignore_ascii_case(expected) {
            Ok(())
        } else {
            Err(GalleryboxError::ContentHashMismatch {
                path: meta.display_path().to_string(),
                expected: expected.to_string(),
                actual,
            })
        }
    }
}
