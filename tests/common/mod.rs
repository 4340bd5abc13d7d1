pub mod http_mock;

use gallerybox::{Credentials, DropboxClient, DropboxSettings, GalleryboxConfig};
use wiremock::MockServer;

pub const APP_KEY: &str = "app-key";
pub const APP_SECRET: &str = "app-secret";
pub const REFRESH_TOKEN: &str = "refresh-token";

pub fn credentials() -> Credentials {
    Credentials {
        app_key: APP_KEY.into(),
        app_secret: APP_SECRET.into(),
        refresh_token: REFRESH_TOKEN.into(),
    }
}

#[allow(dead_code)]
/// Settings routing every endpoint to the mock server, with fast retries.
pub fn settings_for(server: &MockServer) -> DropboxSettings {
    let mut settings = DropboxSettings::with_base_url(&server.uri());
    settings.request_timeout_secs = 5;
    settings.retry_base_delay_ms = 10;
    settings
}

#[allow(dead_code)]
pub fn client_for(server: &MockServer) -> DropboxClient {
    DropboxClient::new(&settings_for(server), credentials()).unwrap()
}

/// Create a temp directory with a gallerybox.json config file.
#[allow(dead_code)]
pub fn temp_config_dir(config: &GalleryboxConfig) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("gallerybox.json");
    let json = serde_json::to_string_pretty(config).unwrap();
    std::fs::write(config_path, json).unwrap();
    dir
}
