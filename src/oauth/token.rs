use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;

use crate::error::GalleryboxError;
use crate::oauth::credentials::Credentials;

/// Raw response from the OAuth token endpoint.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// A token as issued, before the manager turns the TTL into an expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_in: Option<i64>,
}

impl TokenResponse {
    fn into_issued(self) -> Result<IssuedToken, GalleryboxError> {
        let access_token = self
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                GalleryboxError::ProtocolError(
                    "Token response is missing 'access_token'".to_string(),
                )
            })?;
        Ok(IssuedToken {
            access_token,
            expires_in: self.expires_in,
        })
    }
}

pub fn basic_auth_header(app_key: &str, app_secret: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{app_key}:{app_secret}")))
}

/// Exchange the long-lived refresh token for a short-lived access token.
pub async fn exchange_refresh_token(
    http: &reqwest::Client,
    token_url: &str,
    credentials: &Credentials,
) -> Result<IssuedToken, GalleryboxError> {
    let resp = http
        .post(token_url)
        .header(
            reqwest::header::AUTHORIZATION,
            basic_auth_header(&credentials.app_key, &credentials.app_secret),
        )
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", credentials.refresh_token.as_str()),
        ])
        .send()
        .await
        .map_err(|e| GalleryboxError::AuthExchange(format!("Token refresh request failed: {e}")))?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(GalleryboxError::AuthExchange(format!(
            "Token refresh failed with status {status}: {body}"
        )));
    }

    let token_resp: TokenResponse = resp.json().await.map_err(|e| {
        GalleryboxError::AuthExchange(format!("Failed to parse token response: {e}"))
    })?;

    token_resp.into_issued()
}
