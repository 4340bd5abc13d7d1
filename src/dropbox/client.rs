use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::config::DropboxSettings;
use crate::error::GalleryboxError;
use crate::oauth::{Credentials, RefreshPolicy, TokenManager};
use crate::retry::RetryPolicy;

/// Longest error body carried into an `Upstream` error.
const MAX_ERROR_BODY: usize = 500;

/// Authenticated Dropbox API v2 client.
///
/// Owns the token cache, so one instance should live for the whole process
/// and be shared by reference.
pub struct DropboxClient {
    http: reqwest::Client,
    tokens: TokenManager,
    api_base: String,
    content_base: String,
    retry: RetryPolicy,
}

impl std::fmt::Debug for DropboxClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DropboxClient")
            .field("api_base", &self.api_base)
            .field("content_base", &self.content_base)
            .field("retry", &self.retry)
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

impl DropboxClient {
    /// Build a client from settings, resolving credentials from the environment first.
    ///
    /// Fails with `MissingCredentials` before any network I/O.
    pub fn from_settings(settings: &DropboxSettings) -> Result<Self, GalleryboxError> {
        let credentials = Credentials::resolve(settings)?;
        Self::new(settings, credentials)
    }

    pub fn new(settings: &DropboxSettings, credentials: Credentials) -> Result<Self, GalleryboxError> {
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(|e| GalleryboxError::ConfigError {
                path: std::path::PathBuf::from("<dropbox>"),
                detail: format!("Cannot build HTTP client: {e}"),
            })?;

        let tokens = TokenManager::new(
            http.clone(),
            &settings.token_url,
            credentials,
            RefreshPolicy::from_settings(settings)?,
        );

        Ok(Self {
            http,
            tokens,
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            content_base: settings.content_base.trim_end_matches('/').to_string(),
            retry: RetryPolicy::from_settings(settings),
        })
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    /// A valid bearer token, from cache or freshly exchanged.
    pub async fn access_token(&self) -> Result<String, GalleryboxError> {
        self.tokens.access_token().await
    }

    pub(crate) fn api_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.api_base, endpoint)
    }

    pub(crate) fn content_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.content_base, endpoint)
    }

    /// POST to `url` with a bearer token, letting `build` add the body or headers.
    ///
    /// A 401 drops the token and is retried once with a fresh one. 429 and
    /// 5xx follow the retry policy. Any other non-2xx becomes `Upstream`.
    pub(crate) async fn send<F>(
        &self,
        endpoint: &str,
        url: &str,
        build: F,
    ) -> Result<reqwest::Response, GalleryboxError>
    where
        F: Fn(reqwest::RequestBuilder) -> reqwest::RequestBuilder + Send + Sync,
    {
        let mut attempt = 0;
        let mut reauthorized = false;

        loop {
            let token = self.tokens.access_token().await?;
            tracing::debug!("POST {url}");
            let response = build(self.http.post(url).bearer_auth(&token))
                .send()
                .await
                .map_err(|e| GalleryboxError::Transport {
                    endpoint: endpoint.to_string(),
                    detail: e.to_string(),
                })?;

            let status = response.status();
            if status.is_success() {
                return Ok(response);
            }

            if status == StatusCode::UNAUTHORIZED && !reauthorized {
                tracing::warn!("Dropbox rejected the access token on {endpoint}; refreshing");
                self.tokens.invalidate(&token);
                reauthorized = true;
                continue;
            }

            if let Some(delay) = self.retry.delay_for(&response, attempt) {
                tracing::warn!(
                    "Dropbox {endpoint} returned {status}. Retry {}/{} after {delay:?}",
                    attempt + 1,
                    self.retry.max_retries
                );
                attempt += 1;
                tokio::time::sleep(delay).await;
                continue;
            }

            let body = response.text().await.unwrap_or_default();
            return Err(GalleryboxError::Upstream {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body: summarize_error_body(&body),
            });
        }
    }

    /// RPC-style call: JSON in, JSON out.
    pub(crate) async fn rpc<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &serde_json::Value,
    ) -> Result<T, GalleryboxError> {
        let url = self.api_url(endpoint);
        let response = self.send(endpoint, &url, |req| req.json(body)).await?;
        response.json::<T>().await.map_err(|e| {
            GalleryboxError::ProtocolError(format!("Failed to parse {endpoint} response: {e}"))
        })
    }
}

/// Prefer Dropbox's `error_summary`; otherwise a trimmed prefix of the raw body.
fn summarize_error_body(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(summary) = value.get("error_summary").and_then(|s| s.as_str()) {
            return summary.to_string();
        }
    }
    body.trim().chars().take(MAX_ERROR_BODY).collect()
}

/// Serialize `value` for a `Dropbox-API-Arg` header: HTTP header values must be
/// ASCII, so everything else (and DEL) is written as `\uXXXX` escapes.
pub(crate) fn header_safe_json(value: &serde_json::Value) -> String {
    let raw = value.to_string();
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if ch.is_ascii() && ch != '\u{7f}' {
            out.push(ch);
        } else {
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{unit:04x}"));
            }
        }
    }
    out
}
