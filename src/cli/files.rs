use std::io::Write;
use std::path::Path;

use colored::Colorize;
use serde_json::json;

use crate::dropbox::{content_hash, normalize_folder_path, DownloadedFile, FileSelector};
use crate::error::GalleryboxError;
use crate::runtime::Runtime;

use super::output::{print_files, print_json, stdout_is_tty, OutputMode};

/// Build a selector from `--id` / `--path`, rejecting the case where both are blank.
pub fn selector_from_args(
    id: Option<String>,
    path: Option<String>,
) -> Result<FileSelector, GalleryboxError> {
    let selector = FileSelector { id, path };
    selector.wire_value()?;
    Ok(selector)
}

pub async fn run_ls(runtime: &Runtime, path: &str, json: bool) -> Result<(), GalleryboxError> {
    let client = runtime.client().await?;
    let files = client.list_folder(&normalize_folder_path(path)).await?;
    print_files(&files, OutputMode::from_flag(json), stdout_is_tty());
    Ok(())
}

pub async fn run_get(
    runtime: &Runtime,
    selector: &FileSelector,
    output: Option<&Path>,
    verify: bool,
    json: bool,
) -> Result<(), GalleryboxError> {
    let client = runtime.client().await?;
    let file = client.download_file(selector).await?;
    if verify {
        file.verify_content_hash()?;
    }

    match output {
        Some(path) => {
            std::fs::write(path, &file.bytes)?;
            tracing::info!("Saved {} bytes to {}", file.bytes.len(), path.display());
        }
        None if !json => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&file.bytes)?;
            stdout.flush()?;
        }
        None => {}
    }

    if json {
        print_json(&download_record(&file, output, verify));
    } else if output.is_some() {
        let name = file
            .metadata
            .as_ref()
            .map(|m| m.display_path().to_string())
            .unwrap_or_else(|| selector.wire_value().unwrap_or_default().to_string());
        eprintln!(
            "{} {} ({} bytes, {})",
            "Downloaded".green(),
            name,
            file.bytes.len(),
            file.content_type
        );
    }
    Ok(())
}

fn download_record(file: &DownloadedFile, output: Option<&Path>, verified: bool) -> serde_json::Value {
    json!({
        "metadata": file.metadata,
        "contentType": file.content_type,
        "size": file.bytes.len(),
        "contentHash": content_hash(&file.bytes),
        "verified": verified,
        "savedTo": output.map(|p| p.display().to_string()),
    })
}

pub async fn run_link(runtime: &Runtime, selector: &FileSelector) -> Result<(), GalleryboxError> {
    let client = runtime.client().await?;
    let link = client.get_temporary_link(selector).await?;
    println!("{link}");
    Ok(())
}

pub async fn run_token(runtime: &Runtime, show: bool) -> Result<(), GalleryboxError> {
    let client = runtime.client().await?;
    let token = client.access_token().await?;
    match client.tokens().cached_expiry() {
        Some(expiry) => println!("Token valid until {}", expiry.to_rfc3339()),
        None => println!("Token acquired"),
    }
    if show {
        println!("{token}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_requires_id_or_path() {
        assert!(matches!(
            selector_from_args(None, Some("  ".into())),
            Err(GalleryboxError::EmptySelector)
        ));
        let sel = selector_from_args(Some("id:1".into()), Some("/a.jpg".into())).unwrap();
        assert_eq!(sel.wire_value().unwrap(), "id:1");
    }

    #[test]
    fn record_reports_hash_and_destination() {
        let file = DownloadedFile {
            metadata: None,
            bytes: b"abc".to_vec(),
            content_type: "image/jpeg".into(),
        };
        let record = download_record(&file, Some(Path::new("/tmp/out.jpg")), false);
        assert_eq!(record["size"], 3);
        assert_eq!(record["contentType"], "image/jpeg");
        assert_eq!(
            record["contentHash"],
            "4f8b42c22dd3729b519ba6f68d2da7cc5b2d606d05daed5ad5128cc03e6c6358"
        );
        assert_eq!(record["savedTo"], "/tmp/out.jpg");
        assert!(record["metadata"].is_null());
    }
}
