use std::path::PathBuf;

/// Every failure the Dropbox client, the gallery layer and the CLI can report.
///
/// The enum is `Clone` because a single token refresh result is handed to
/// every task waiting on it.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GalleryboxError {
    #[error("Missing Dropbox configuration: set {}", .missing.join(", "))]
    MissingCredentials { missing: Vec<&'static str> },

    #[error("Error in config {}: {detail}", path.display())]
    ConfigError { path: PathBuf, detail: String },

    #[error("Dropbox token exchange failed: {0}")]
    AuthExchange(String),

    #[error("Dropbox {endpoint} failed with status {status}: {body}")]
    Upstream {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Cannot reach Dropbox {endpoint}: {detail}")]
    Transport { endpoint: String, detail: String },

    #[error("Protocol error: {0}")]
    ProtocolError(String),

    #[error("A file selector needs an id or a path")]
    EmptySelector,

    #[error("{}", format_gallery_not_found(.name, .suggestion.as_deref()))]
    GalleryNotFound {
        name: String,
        suggestion: Option<String>,
    },

    #[error("Content hash mismatch for {path}: expected {expected}, got {actual}")]
    ContentHashMismatch {
        path: String,
        expected: String,
        actual: String,
    },

    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for GalleryboxError {
    fn from(err: std::io::Error) -> Self {
        GalleryboxError::IoError(err.to_string())
    }
}

fn format_gallery_not_found(name: &str, suggestion: Option<&str>) -> String {
    match suggestion {
        Some(s) => format!("Gallery '{name}' not found. Did you mean '{s}'?"),
        None => format!("Gallery '{name}' not found."),
    }
}

impl GalleryboxError {
    /// Error code string for structured JSON output.
    pub fn code(&self) -> &'static str {
        match self {
            GalleryboxError::MissingCredentials { .. } => "config_error",
            GalleryboxError::ConfigError { .. } => "config_error",
            GalleryboxError::AuthExchange(_) => "auth_error",
            GalleryboxError::Upstream { .. } => "upstream_error",
            GalleryboxError::Transport { .. } => "transport_error",
            GalleryboxError::ProtocolError(_) => "parse_error",
            GalleryboxError::EmptySelector => "invalid_selector",
            GalleryboxError::GalleryNotFound { .. } => "not_found",
            GalleryboxError::ContentHashMismatch { .. } => "integrity_error",
            GalleryboxError::IoError(_) => "io_error",
        }
    }

    /// HTTP status reported by Dropbox, when the failure came from an API call.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            GalleryboxError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        let mut obj = serde_json::Map::new();
        if let GalleryboxError::Upstream {
            endpoint, status, ..
        } = self
        {
            obj.insert("endpoint".into(), serde_json::Value::String(endpoint.clone()));
            obj.insert("status".into(), serde_json::json!(status));
        }
        if let GalleryboxError::GalleryNotFound { name, .. } = self {
            obj.insert("gallery".into(), serde_json::Value::String(name.clone()));
        }
        obj.insert("message".into(), serde_json::Value::String(self.to_string()));
        obj.insert("code".into(), serde_json::Value::String(self.code().to_string()));
        serde_json::json!({ "error": obj })
    }
}
