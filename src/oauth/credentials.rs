use crate::config::DropboxSettings;
use crate::error::GalleryboxError;

pub const APP_KEY_ENV: &str = "DROPBOX_APP_KEY";
pub const APP_SECRET_ENV: &str = "DROPBOX_APP_SECRET";
pub const REFRESH_TOKEN_ENV: &str = "DROPBOX_REFRESH_TOKEN";

/// The long-lived app credentials used for the refresh-token grant.
#[derive(Clone)]
pub struct Credentials {
    pub app_key: String,
    pub app_secret: String,
    pub refresh_token: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("app_key", &self.app_key)
            .field("app_secret", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Resolve credentials from the process environment, falling back to the
    /// config file's values. Every missing piece is reported at once.
    pub fn resolve(settings: &DropboxSettings) -> Result<Self, GalleryboxError> {
        Self::resolve_with(settings, |name| std::env::var(name).ok())
    }

    pub fn resolve_with<F>(settings: &DropboxSettings, lookup: F) -> Result<Self, GalleryboxError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |env_name: &str, fallback: &Option<String>| {
            lookup(env_name)
                .or_else(|| fallback.clone())
                .filter(|v| !v.trim().is_empty())
        };

        let app_key = pick(APP_KEY_ENV, &settings.app_key);
        let app_secret = pick(APP_SECRET_ENV, &settings.app_secret);
        let refresh_token = pick(REFRESH_TOKEN_ENV, &settings.refresh_token);

        match (app_key, app_secret, refresh_token) {
            (Some(app_key), Some(app_secret), Some(refresh_token)) => Ok(Self {
                app_key,
                app_secret,
                refresh_token,
            }),
            (key, secret, refresh) => {
                let mut missing = Vec::new();
                if key.is_none() {
                    missing.push(APP_KEY_ENV);
                }
                if secret.is_none() {
                    missing.push(APP_SECRET_ENV);
                }
                if refresh.is_none() {
                    missing.push(REFRESH_TOKEN_ENV);
                }
                Err(GalleryboxError::MissingCredentials { missing })
            }
        }
    }
}
