use crate::error::GalleryboxError;

use super::types::{DropboxSettings, GalleryConfig};

/// Expand environment variable references in a string.
///
/// - `${VAR}` is replaced with the variable's value; unset is an error
/// - `${VAR:-fallback}` uses `fallback` when the variable is unset or empty
///
/// A `$` not followed by `{` is kept literally.
pub fn expand_env_vars(input: &str) -> Result<String, GalleryboxError> {
    expand_with(input, |name| std::env::var(name).ok())
}

fn expand_with<F>(input: &str, lookup: F) -> Result<String, GalleryboxError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after.find('}').ok_or_else(|| {
            env_error(format!("Unclosed variable reference: ${{{after}"))
        })?;
        let expr = &after[..end];

        match expr.split_once(":-") {
            Some((name, fallback)) => match lookup(name) {
                Some(val) if !val.is_empty() => result.push_str(&val),
                _ => result.push_str(fallback),
            },
            None => {
                if expr.is_empty() {
                    return Err(env_error("Empty variable name in ${}".to_string()));
                }
                let val = lookup(expr).ok_or_else(|| {
                    env_error(format!("Environment variable '{expr}' is not set"))
                })?;
                result.push_str(&val);
            }
        }
        rest = &after[end + 1..];
    }

    result.push_str(rest);
    Ok(result)
}

/// Expand references in the credential and endpoint fields of the Dropbox section.
pub fn expand_dropbox_settings(settings: &mut DropboxSettings) -> Result<(), GalleryboxError> {
    for field in [
        &mut settings.app_key,
        &mut settings.app_secret,
        &mut settings.refresh_token,
    ] {
        if let Some(value) = field.as_mut() {
            *value = expand_env_vars(value)?;
        }
    }
    settings.token_url = expand_env_vars(&settings.token_url)?;
    settings.api_base = expand_env_vars(&settings.api_base)?;
    settings.content_base = expand_env_vars(&settings.content_base)?;
    Ok(())
}

pub fn expand_gallery_config(gallery: &mut GalleryConfig) -> Result<(), GalleryboxError> {
    gallery.folder = expand_env_vars(&gallery.folder)?;
    Ok(())
}

fn env_error(detail: String) -> GalleryboxError {
    GalleryboxError::ConfigError {
        path: std::path::PathBuf::from("<env>"),
        detail,
    }
}
