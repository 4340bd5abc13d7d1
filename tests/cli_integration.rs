use std::collections::HashMap;
use std::path::Path;

use assert_cmd::Command;
use gallerybox::{DropboxSettings, GalleryConfig, GalleryboxConfig};
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

/// A command isolated from the caller's credentials and home directory.
fn gallerybox_cmd(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("gallerybox").unwrap();
    cmd.env("HOME", home)
        .env_remove("DROPBOX_APP_KEY")
        .env_remove("DROPBOX_APP_SECRET")
        .env_remove("DROPBOX_REFRESH_TOKEN")
        .env_remove("GALLERYBOX_CONFIG")
        .env_remove("GALLERYBOX_LOG_LEVEL");
    cmd
}

fn galleries_config(dropbox: Option<DropboxSettings>, snapshot: Option<&Path>) -> GalleryboxConfig {
    let mut galleries = HashMap::new();
    galleries.insert(
        "smith-wedding".to_string(),
        GalleryConfig {
            description: Some("June ceremony".into()),
            folder: "/Clients/Smith".into(),
            preview_count: 2,
            snapshot: snapshot.map(Path::to_path_buf),
        },
    );
    galleries.insert(
        "jones-portraits".to_string(),
        GalleryConfig {
            description: None,
            folder: "/Clients/Jones".into(),
            preview_count: 6,
            snapshot: None,
        },
    );
    GalleryboxConfig { dropbox, galleries }
}

#[test]
fn missing_credentials_name_the_variables() {
    let home = tempfile::tempdir().unwrap();
    gallerybox_cmd(home.path())
        .args(["ls", "/Shoot"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("DROPBOX_APP_KEY"))
        .stderr(predicate::str::contains("DROPBOX_REFRESH_TOKEN"));
}

#[test]
fn missing_credentials_json_error() {
    let home = tempfile::tempdir().unwrap();
    gallerybox_cmd(home.path())
        .args(["ls", "/Shoot", "--json"])
        .env("DROPBOX_APP_KEY", "key")
        .env("DROPBOX_REFRESH_TOKEN", "refresh")
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"code\": \"config_error\""))
        .stdout(predicate::str::contains("DROPBOX_APP_SECRET"));
}

#[test]
fn get_requires_a_target() {
    let home = tempfile::tempdir().unwrap();
    gallerybox_cmd(home.path()).arg("get").assert().failure();
}

#[test]
fn explicit_missing_config_is_an_error() {
    let home = tempfile::tempdir().unwrap();
    gallerybox_cmd(home.path())
        .args(["--config", "/nonexistent/gallerybox.json", "gallery", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("/nonexistent/gallerybox.json"));
}

#[test]
fn gallery_list_needs_no_credentials() {
    let home = tempfile::tempdir().unwrap();
    let dir = common::temp_config_dir(&galleries_config(None, None));
    gallerybox_cmd(home.path())
        .env("GALLERYBOX_CONFIG", dir.path().join("gallerybox.json"))
        .args(["gallery", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("smith-wedding"))
        .stdout(predicate::str::contains("/Clients/Jones"));
}

#[test]
fn gallery_list_json() {
    let home = tempfile::tempdir().unwrap();
    let dir = common::temp_config_dir(&galleries_config(None, None));
    let config = dir.path().join("gallerybox.json");
    gallerybox_cmd(home.path())
        .args(["--config", config.to_str().unwrap(), "gallery", "list", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"previewCount\": 2"));
}

#[test]
fn unknown_gallery_suggests_closest() {
    let home = tempfile::tempdir().unwrap();
    let dir = common::temp_config_dir(&galleries_config(None, None));
    gallerybox_cmd(home.path())
        .env("GALLERYBOX_CONFIG", dir.path().join("gallerybox.json"))
        .args(["gallery", "show", "smith-weding"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Did you mean 'smith-wedding'"));
}

/// Runs the binary on a blocking thread so the mock server keeps serving.
async fn run_blocking(cmd: Command) -> assert_cmd::assert::Assert {
    let mut cmd = cmd;
    tokio::task::spawn_blocking(move || cmd.assert())
        .await
        .unwrap()
}

fn credentialed_cmd(home: &Path, config: &Path) -> Command {
    let mut cmd = gallerybox_cmd(home);
    cmd.env("DROPBOX_APP_KEY", common::APP_KEY)
        .env("DROPBOX_APP_SECRET", common::APP_SECRET)
        .env("DROPBOX_REFRESH_TOKEN", common::REFRESH_TOKEN)
        .env("GALLERYBOX_CONFIG", config);
    cmd
}

#[tokio::test(flavor = "multi_thread")]
async fn ls_lists_files_from_dropbox() {
    let server = MockServer::start().await;
    common::http_mock::mount_token(&server, "tok1").await;
    Mock::given(method("POST"))
        .and(path("/2/files/list_folder"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entries": [
                common::http_mock::file_entry("IMG_0001.jpg"),
                common::http_mock::file_entry("IMG_0002.jpg"),
            ],
            "cursor": "c0",
            "has_more": false,
        })))
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let dir = common::temp_config_dir(&galleries_config(Some(common::settings_for(&server)), None));
    let mut cmd = credentialed_cmd(home.path(), &dir.path().join("gallerybox.json"));
    cmd.args(["ls", "/Shoot", "--json"]);

    run_blocking(cmd)
        .await
        .success()
        .stdout(predicate::str::contains("\"id\": \"id:IMG_0001.jpg\""))
        .stdout(predicate::str::contains("IMG_0002.jpg"));
}

#[tokio::test(flavor = "multi_thread")]
async fn gallery_show_falls_back_to_snapshot() {
    let server = MockServer::start().await;
    common::http_mock::mount_token(&server, "tok1").await;
    Mock::given(method("POST"))
        .and(path("/2/files/list_folder"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "error_summary": "path/not_found/",
        })))
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let snapshot = home.path().join("smith.json");
    let saved: Vec<gallerybox::FileMetadata> = (1..=3)
        .map(|i| {
            serde_json::from_value(common::http_mock::file_entry(&format!("IMG_000{i}.jpg")))
                .unwrap()
        })
        .collect();
    gallerybox::gallery::save_snapshot(&snapshot, &saved).unwrap();

    let dir = common::temp_config_dir(&galleries_config(
        Some(common::settings_for(&server)),
        Some(&snapshot),
    ));
    let mut cmd = credentialed_cmd(home.path(), &dir.path().join("gallerybox.json"));
    cmd.args(["gallery", "show", "smith-wedding", "--json"]);

    run_blocking(cmd)
        .await
        .success()
        .stdout(predicate::str::contains("\"source\": \"snapshot\""))
        .stdout(predicate::str::contains("\"assetCount\": 3"))
        .stdout(predicate::str::contains("path/not_found/"));
}

#[tokio::test(flavor = "multi_thread")]
async fn link_prints_temporary_link() {
    let server = MockServer::start().await;
    common::http_mock::mount_token(&server, "tok1").await;
    Mock::given(method("POST"))
        .and(path("/2/files/get_temporary_link"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "link": "https://dl.dropboxusercontent.com/apitl/1/xyz",
        })))
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let dir = common::temp_config_dir(&galleries_config(Some(common::settings_for(&server)), None));
    let mut cmd = credentialed_cmd(home.path(), &dir.path().join("gallerybox.json"));
    cmd.args(["link", "--id", "id:xyz"]);

    run_blocking(cmd)
        .await
        .success()
        .stdout(predicate::str::diff("https://dl.dropboxusercontent.com/apitl/1/xyz\n"));
}
