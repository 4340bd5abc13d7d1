use colored::Colorize;

use crate::error::GalleryboxError;
use crate::gallery::SummaryOptions;
use crate::runtime::Runtime;

use super::output::{print_json, print_summary, stdout_is_tty, OutputMode};

/// Print configured galleries. Needs no credentials.
pub fn run_gallery_list(runtime: &Runtime, json: bool) -> Result<(), GalleryboxError> {
    let names = runtime.gallery_names();

    if json {
        let entries: Vec<serde_json::Value> = names
            .iter()
            .filter_map(|name| {
                let g = runtime.config().galleries.get(*name)?;
                Some(serde_json::json!({
                    "name": name,
                    "folder": g.folder,
                    "description": g.description,
                    "previewCount": g.preview_count,
                }))
            })
            .collect();
        print_json(&entries);
        return Ok(());
    }

    if names.is_empty() {
        println!("No galleries configured.");
        return Ok(());
    }

    let is_tty = stdout_is_tty();
    for name in names {
        let Some(g) = runtime.config().galleries.get(name) else {
            continue;
        };
        let desc = g.description.as_deref().unwrap_or("");
        if is_tty {
            println!("{}  {}  {}", name.bold(), g.folder.dimmed(), desc);
        } else {
            println!("{name}  {}  {desc}", g.folder);
        }
    }
    Ok(())
}

pub async fn run_gallery_show(
    runtime: &Runtime,
    name: &str,
    links: bool,
    json: bool,
) -> Result<(), GalleryboxError> {
    let summary = runtime
        .summarize_gallery(name, SummaryOptions { links })
        .await?;
    print_summary(&summary, OutputMode::from_flag(json), stdout_is_tty());
    Ok(())
}

pub async fn run_gallery_snapshot(runtime: &Runtime, name: &str) -> Result<(), GalleryboxError> {
    let (path, count) = runtime.snapshot_gallery(name).await?;
    println!("Saved {count} asset(s) for '{name}' to {}", path.display());
    Ok(())
}
