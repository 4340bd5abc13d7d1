use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use gallerybox::cli::{files, gallery, output};
use gallerybox::{GalleryboxError, Runtime};

#[derive(Parser)]
#[command(name = "gallerybox", version, about = "Browse and fetch photo galleries stored in Dropbox")]
struct Cli {
    /// Config file to load instead of the default search path
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Identifies a remote file. The id wins when both are given.
#[derive(Args)]
#[group(required = true, multiple = true)]
struct Target {
    /// Dropbox file id (id:...)
    #[arg(long)]
    id: Option<String>,

    /// Dropbox path (/folder/file.jpg)
    #[arg(long)]
    path: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List files in a Dropbox folder
    Ls {
        /// Folder path; empty or "/" for the root
        #[arg(default_value = "")]
        path: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Download a file
    Get {
        #[command(flatten)]
        target: Target,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Check the bytes against Dropbox's content hash
        #[arg(long)]
        verify: bool,

        /// Print a JSON record of the download
        #[arg(long)]
        json: bool,
    },

    /// Print a short-lived download link
    Link {
        #[command(flatten)]
        target: Target,
    },

    /// Acquire an access token and print its expiry
    Token {
        /// Also print the token itself
        #[arg(long)]
        show: bool,
    },

    /// Work with configured galleries
    Gallery {
        #[command(subcommand)]
        action: GalleryAction,
    },
}

#[derive(Subcommand)]
enum GalleryAction {
    /// List configured galleries
    List {
        #[arg(long)]
        json: bool,
    },
    /// Summarize a gallery
    Show {
        name: String,

        /// Include a temporary link for each preview
        #[arg(long)]
        links: bool,

        #[arg(long)]
        json: bool,
    },
    /// Save the current listing as the gallery's offline snapshot
    Snapshot { name: String },
}

impl Commands {
    fn wants_json(&self) -> bool {
        match self {
            Commands::Ls { json, .. } | Commands::Get { json, .. } => *json,
            Commands::Gallery {
                action: GalleryAction::List { json } | GalleryAction::Show { json, .. },
            } => *json,
            _ => false,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("GALLERYBOX_LOG_LEVEL")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json_mode = cli.command.wants_json();

    if let Err(e) = run(cli).await {
        output::print_error(&e, json_mode);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), GalleryboxError> {
    let runtime = Runtime::from_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Ls { path, json } => files::run_ls(&runtime, &path, json).await,
        Commands::Get {
            target,
            output,
            verify,
            json,
        } => {
            let selector = files::selector_from_args(target.id, target.path)?;
            files::run_get(&runtime, &selector, output.as_deref(), verify, json).await
        }
        Commands::Link { target } => {
            let selector = files::selector_from_args(target.id, target.path)?;
            files::run_link(&runtime, &selector).await
        }
        Commands::Token { show } => files::run_token(&runtime, show).await,
        Commands::Gallery { action } => match action {
            GalleryAction::List { json } => gallery::run_gallery_list(&runtime, json),
            GalleryAction::Show { name, links, json } => {
                gallery::run_gallery_show(&runtime, &name, links, json).await
            }
            GalleryAction::Snapshot { name } => {
                gallery::run_gallery_snapshot(&runtime, &name).await
            }
        },
    }
}
