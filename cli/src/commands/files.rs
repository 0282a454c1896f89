//! Source file listing, opening and outline copying.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Result};
use chrono::Local;
use clap::Args;
use outliner::config::OutputFormat;
use outliner::storage::{ArtifactStorage, ProcessedIndex};
use outliner::worker::{DirectoryScanner, DEFAULT_RECENT_LIMIT};

use crate::state::AppState;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Maximum number of files to show.
    #[arg(long, default_value_t = DEFAULT_RECENT_LIMIT)]
    pub max: usize,
}

#[derive(Args, Debug)]
pub struct CopyArgs {
    /// Source file whose outline should be copied.
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct OpenArgs {
    /// Source file to open.
    pub file: PathBuf,

    /// Open the saved outline instead of the source.
    #[arg(long)]
    pub processed: bool,
}

/// Resolves a path given on the command line. Paths that do not exist as
/// given are looked up in the text folder.
pub(crate) fn resolve_source(state: &AppState, path: &Path) -> PathBuf {
    if path.is_absolute() || path.exists() {
        return path.to_path_buf();
    }
    state.settings.text_folder().join(path)
}

pub fn list(state: &AppState, args: ListArgs) -> Result<()> {
    let folder = state.settings.text_folder();
    let format = state.settings.model_settings().output_format;
    let index = ProcessedIndex::new(state.settings.processed_folder());

    let files = DirectoryScanner::new(&folder).recent_text_files(args.max)?;
    if files.is_empty() {
        println!("No .txt files in {}", folder.display());
        return Ok(());
    }

    println!("{} ({} files)", folder.display(), files.len());
    for file in files {
        let marker = if index.is_processed(&file.path, format) {
            "✓"
        } else {
            " "
        };
        let name = file
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!(
            "  [{}] {:<40} {}",
            marker,
            name,
            file.modified.with_timezone(&Local).format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

pub fn copy(state: &AppState, args: CopyArgs) -> Result<()> {
    let source = resolve_source(state, &args.file);
    let format = state.settings.model_settings().output_format;
    let storage = ArtifactStorage::new(state.settings.processed_folder());

    let text = storage.read(&source, format)?;
    if !state.clipboard_available {
        bail!("No clipboard available on this system");
    }
    state
        .clipboard
        .set_text(&text)
        .map_err(|e| anyhow!("Failed to copy outline: {}", e))?;

    println!(
        "Copied {} to the clipboard",
        storage.path_for(&source, format).display()
    );
    Ok(())
}

/// The file `open` launches: the source itself, or its outline in the
/// current format. Either must already exist.
fn open_target(
    source: &Path,
    processed: bool,
    storage: &ArtifactStorage,
    format: OutputFormat,
) -> Result<PathBuf> {
    let target = if processed {
        storage.path_for(source, format)
    } else {
        source.to_path_buf()
    };
    if !target.is_file() {
        bail!("File not found: {}", target.display());
    }
    Ok(target)
}

pub fn open(state: &AppState, args: OpenArgs) -> Result<()> {
    let source = resolve_source(state, &args.file);
    let format = state.settings.model_settings().output_format;
    let storage = ArtifactStorage::new(state.settings.processed_folder());

    let target = open_target(&source, args.processed, &storage, format)?;
    opener::open(&target).map_err(|e| anyhow!("Could not open {}: {}", target.display(), e))?;
    println!("Opened {}", target.display());
    Ok(())
}
