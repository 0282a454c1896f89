//! `outliner` command-line front end.

mod commands;
mod state;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use outliner::logging::{self, LoggingOptions};
use outliner::secrets;

use crate::commands::{
    files::{CopyArgs, ListArgs, OpenArgs},
    process::ProcessArgs,
    prompts::PromptsCommand,
    settings::SettingsCommand,
};
use crate::state::AppState;

#[derive(Parser, Debug)]
#[command(
    name = "outliner",
    version,
    about = "Turn text files into outlines with a remote completion model",
    after_help = r#"
EXAMPLES:
  outliner list                        # recent .txt files in the text folder
  outliner process lecture.txt         # outline one file with the saved settings
  outliner process a.txt b.txt --format md --model gpt-4.1-mini
  outliner copy lecture.txt            # copy the saved outline to the clipboard
  outliner open lecture.txt --processed
  outliner settings set --temperature 0.3
"#
)]
struct Cli {
    /// Directory holding user_settings.json and the processed/ folder.
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// File containing the API key. Overrides OPENAI_API_KEY.
    #[arg(long, global = true)]
    api_key_file: Option<String>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the most recent text files in the text folder.
    List(ListArgs),
    /// Outline one or more files concurrently.
    Process(ProcessArgs),
    /// Copy a processed file's outline to the clipboard.
    Copy(CopyArgs),
    /// Open a source file, or its outline, with the default application.
    Open(OpenArgs),
    /// Show or change model and folder settings.
    #[command(subcommand)]
    Settings(SettingsCommand),
    /// Manage system prompt presets.
    #[command(subcommand)]
    Prompts(PromptsCommand),
    /// Show the supported models and their prices.
    Models,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&LoggingOptions {
        json: cli.log_json,
        ..Default::default()
    })?;
    secrets::load_dotenv();

    let state = AppState::load(cli.config_dir, cli.api_key_file.as_deref())?;

    match cli.command {
        Command::List(args) => commands::files::list(&state, args),
        Command::Process(args) => commands::process::run(&state, args).await,
        Command::Copy(args) => commands::files::copy(&state, args),
        Command::Open(args) => commands::files::open(&state, args),
        Command::Settings(cmd) => commands::settings::run(&state, cmd),
        Command::Prompts(cmd) => commands::prompts::run(&state, cmd),
        Command::Models => {
            commands::settings::models();
            Ok(())
        }
    }
}
