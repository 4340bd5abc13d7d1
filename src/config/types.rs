use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_TOKEN_URL: &str = "https://api.dropboxapi.com/oauth2/token";
pub const DEFAULT_API_BASE: &str = "https://api.dropboxapi.com/2";
pub const DEFAULT_CONTENT_BASE: &str = "https://content.dropboxapi.com/2";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GalleryboxConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dropbox: Option<DropboxSettings>,
    #[serde(default)]
    pub galleries: HashMap<String, GalleryConfig>,
}

impl GalleryboxConfig {
    /// The Dropbox section, or the built-in defaults when no file set one.
    pub fn dropbox_settings(&self) -> DropboxSettings {
        self.dropbox.clone().unwrap_or_default()
    }
}

/// Endpoints, credentials and request policy for the Dropbox client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropboxSettings {
    #[serde(default)]
    pub app_key: Option<String>,
    #[serde(default)]
    pub app_secret: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_url")]
    pub token_url: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_content_base")]
    pub content_base: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// A cached token is not served once it is this close to expiry.
    #[serde(default = "default_refresh_margin_secs")]
    pub refresh_margin_secs: u64,
    /// TTL assumed when the token endpoint omits `expires_in`.
    #[serde(default = "default_token_ttl_secs")]
    pub default_token_ttl_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
}

fn default_token_url() -> String {
    DEFAULT_TOKEN_URL.to_string()
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_content_base() -> String {
    DEFAULT_CONTENT_BASE.to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_refresh_margin_secs() -> u64 {
    60
}

fn default_token_ttl_secs() -> u64 {
    300
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_base_delay_ms() -> u64 {
    500
}

impl Default for DropboxSettings {
    fn default() -> Self {
        Self {
            app_key: None,
            app_secret: None,
            refresh_token: None,
            token_url: default_token_url(),
            api_base: default_api_base(),
            content_base: default_content_base(),
            request_timeout_secs: default_request_timeout_secs(),
            refresh_margin_secs: default_refresh_margin_secs(),
            default_token_ttl_secs: default_token_ttl_secs(),
            max_retries: default_max_retries(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
        }
    }
}

impl DropboxSettings {
    /// Settings pointing every endpoint at one base URL, as a mock server exposes them.
    pub fn with_base_url(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            token_url: format!("{base}/oauth2/token"),
            api_base: format!("{base}/2"),
            content_base: format!("{base}/2"),
            ..Self::default()
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryConfig {
    #[serde(default)]
    pub description: Option<String>,
    pub folder: String,
    #[serde(default = "default_preview_count")]
    pub preview_count: usize,
    /// Where the local asset snapshot lives; defaults to the per-gallery home path.
    #[serde(default)]
    pub snapshot: Option<PathBuf>,
}

fn default_preview_count() -> usize {
    6
}
