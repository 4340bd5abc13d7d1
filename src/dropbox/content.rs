use reqwest::header::{HeaderMap, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::json;

use crate::error::GalleryboxError;

use super::client::{header_safe_json, DropboxClient};
use super::types::{DownloadedFile, FileMetadata, FileSelector};

const API_RESULT_HEADER: &str = "dropbox-api-result";
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Deserialize)]
struct TemporaryLinkResponse {
    #[serde(default)]
    link: Option<String>,
}

impl DropboxClient {
    /// Download a file's bytes. Metadata comes from the `dropbox-api-result`
    /// header; if it is absent or unreadable the download still succeeds
    /// without it.
    pub async fn download_file(
        &self,
        selector: &FileSelector,
    ) -> Result<DownloadedFile, GalleryboxError> {
        let target = selector.wire_value()?;
        let arg = header_safe_json(&json!({ "path": target }));
        let endpoint = "files/download";
        let url = self.content_url(endpoint);

        let response = self
            .send(endpoint, &url, |req| req.header("Dropbox-API-Arg", arg.as_str()))
            .await?;

        let metadata = parse_api_result(response.headers());
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| GalleryboxError::Transport {
                endpoint: endpoint.to_string(),
                detail: format!("Failed to read body: {e}"),
            })?;

        tracing::debug!("Downloaded {} bytes for {target}", bytes.len());
        Ok(DownloadedFile {
            metadata,
            bytes: bytes.to_vec(),
            content_type,
        })
    }

    /// Mint a short-lived public URL for a file.
    pub async fn get_temporary_link(
        &self,
        selector: &FileSelector,
    ) -> Result<String, GalleryboxError> {
        let target = selector.wire_value()?;
        let resp: TemporaryLinkResponse = self
            .rpc("files/get_temporary_link", &json!({ "path": target }))
            .await?;
        resp.link.filter(|l| !l.is_empty()).ok_or_else(|| {
            GalleryboxError::ProtocolError(
                "files/get_temporary_link response is missing 'link'".to_string(),
            )
        })
    }
}

fn parse_api_result(headers: &HeaderMap) -> Option<FileMetadata> {
    let raw = headers.get(API_RESULT_HEADER)?;
    let text = match raw.to_str() {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("Ignoring unreadable {API_RESULT_HEADER} header: {e}");
            return None;
        }
    };
    match serde_json::from_str::<FileMetadata>(text) {
        Ok(meta) => Some(meta),
        Err(e) => {
            tracing::warn!("Ignoring malformed {API_RESULT_HEADER} header: {e}");
            None
        }
    }
}
