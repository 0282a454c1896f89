//! System prompt presets.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::state::AppState;

#[derive(Subcommand, Debug)]
pub enum PromptsCommand {
    /// List presets, marking the default.
    List,
    /// Create or replace a preset.
    Upsert(UpsertArgs),
    /// Set the default preset.
    Default {
        id: String,
    },
}

#[derive(Args, Debug)]
pub struct UpsertArgs {
    /// Preset id. A new id is generated when omitted.
    #[arg(long)]
    pub id: Option<String>,

    #[arg(long)]
    pub name: String,

    /// Prompt text. Use --file to read it from disk instead.
    #[arg(long, conflicts_with = "file", required_unless_present = "file")]
    pub content: Option<String>,

    #[arg(long)]
    pub file: Option<std::path::PathBuf>,

    /// Make this preset the default.
    #[arg(long)]
    pub set_default: bool,
}

pub fn run(state: &AppState, command: PromptsCommand) -> Result<()> {
    let prompts = state.settings.prompts();
    match command {
        PromptsCommand::List => {
            let default_id = prompts.default_prompt_id();
            for preset in prompts.presets() {
                let marker = if preset.id == default_id { "*" } else { " " };
                println!("{} {:<38} {}", marker, preset.id, preset.name);
            }
        }
        PromptsCommand::Upsert(args) => {
            let content = match (&args.content, &args.file) {
                (Some(content), _) => content.clone(),
                (None, Some(path)) => std::fs::read_to_string(path)?,
                (None, None) => String::new(),
            };
            let preset =
                prompts.upsert(args.id.as_deref(), &args.name, &content, args.set_default)?;
            println!("Saved prompt '{}' ({})", preset.name, preset.id);
        }
        PromptsCommand::Default { id } => {
            prompts.set_default_prompt_id(&id)?;
            println!("Default prompt set to {}", id);
        }
    }
    Ok(())
}
