use colored::Colorize;
use serde::Serialize;

use crate::dropbox::FileMetadata;
use crate::error::GalleryboxError;
use crate::gallery::{AssetSource, GallerySummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Pretty,
    Json,
}

impl OutputMode {
    pub fn from_flag(json: bool) -> Self {
        if json {
            OutputMode::Json
        } else {
            OutputMode::Pretty
        }
    }
}

pub fn stdout_is_tty() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stdout())
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

/// Human-readable byte count, binary units.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

pub fn format_file_row(file: &FileMetadata, is_tty: bool) -> String {
    let size = format!("{:>10}", format_size(file.size));
    let modified = file
        .server_modified
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".repeat(16));
    let path = file.display_path();

    if is_tty {
        format!("{} {}  {}", size.dimmed(), modified.dimmed(), path.bold())
    } else {
        format!("{size} {modified}  {path}")
    }
}

pub fn print_files(files: &[FileMetadata], mode: OutputMode, is_tty: bool) {
    match mode {
        OutputMode::Json => print_json(files),
        OutputMode::Pretty => {
            for file in files {
                println!("{}", format_file_row(file, is_tty));
            }
            let total = format!("{} file(s)", files.len());
            if is_tty {
                println!("{}", total.dimmed());
            } else {
                println!("{total}");
            }
        }
    }
}

pub fn print_summary(summary: &GallerySummary, mode: OutputMode, is_tty: bool) {
    if mode == OutputMode::Json {
        print_json(summary);
        return;
    }

    if is_tty {
        println!("{} {}", summary.name.bold(), summary.folder.dimmed());
    } else {
        println!("{} {}", summary.name, summary.folder);
    }
    if let Some(desc) = &summary.description {
        println!("  {desc}");
    }
    println!("  {} asset(s)", summary.asset_count);

    if summary.source == AssetSource::Snapshot {
        let note = format!(
            "  (from snapshot: {})",
            summary.fallback_reason.as_deref().unwrap_or("live listing unavailable")
        );
        if is_tty {
            println!("{}", note.yellow());
        } else {
            println!("{note}");
        }
    }

    for preview in &summary.previews {
        println!("  {}", format_file_row(&preview.file, is_tty));
        if let Some(link) = &preview.link {
            if is_tty {
                println!("      {}", link.underline());
            } else {
                println!("      {link}");
            }
        }
    }
}

pub fn print_error(err: &GalleryboxError, json_mode: bool) {
    if json_mode {
        println!("{}", serde_json::to_string_pretty(&err.to_json()).unwrap_or_default());
    } else {
        eprintln!("{} {}", "Error:".red().bold(), err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(size: u64) -> FileMetadata {
        FileMetadata {
            id: "id:1".into(),
            name: "IMG_0001.jpg".into(),
            path_display: Some("/Shoot/IMG_0001.jpg".into()),
            path_lower: None,
            client_modified: None,
            server_modified: None,
            size,
            is_downloadable: true,
            content_hash: None,
        }
    }

    #[test]
    fn output_mode_from_flag() {
        assert_eq!(OutputMode::from_flag(true), OutputMode::Json);
        assert_eq!(OutputMode::from_flag(false), OutputMode::Pretty);
    }

    #[test]
    fn sizes() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1024), "1.0 KiB");
        assert_eq!(format_size(1536), "1.5 KiB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MiB");
    }

    #[test]
    fn plain_row_has_path_and_placeholder_date() {
        let row = format_file_row(&file(2048), false);
        assert!(row.contains("2.0 KiB"));
        assert!(row.contains("----------------"));
        assert!(row.ends_with("/Shoot/IMG_0001.jpg"));
    }

    #[test]
    fn row_with_modified_time() {
        let mut f = file(10);
        f.server_modified = Some("2024-03-01T12:30:00Z".parse().unwrap());
        let row = format_file_row(&f, false);
        assert!(row.contains("2024-03-01 12:30"));
    }

    #[test]
    fn print_error_both_modes() {
        let err = GalleryboxError::EmptySelector;
        print_error(&err, true);
        print_error(&err, false);
    }
}
