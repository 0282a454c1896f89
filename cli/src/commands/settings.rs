//! Model, folder and theme settings.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use outliner::completion::{TransformService, MODEL_CATALOG};
use outliner::config::{ModelSettingsUpdate, OutputFormat, Theme};

use crate::state::AppState;

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// Print the current settings.
    Show,
    /// Change one or more settings.
    Set(SetArgs),
}

#[derive(Args, Debug)]
pub struct SetArgs {
    #[arg(long)]
    pub model: Option<String>,

    #[arg(long)]
    pub temperature: Option<f64>,

    #[arg(long)]
    pub top_p: Option<f64>,

    /// Output format: txt or md.
    #[arg(long)]
    pub format: Option<OutputFormat>,

    /// Folder scanned for source text files.
    #[arg(long)]
    pub text_folder: Option<PathBuf>,

    /// dark or light.
    #[arg(long)]
    pub theme: Option<Theme>,
}

pub fn run(state: &AppState, command: SettingsCommand) -> Result<()> {
    match command {
        SettingsCommand::Show => show(state),
        SettingsCommand::Set(args) => {
            set(state, args)?;
            show(state)
        }
    }
}

fn show(state: &AppState) -> Result<()> {
    let settings = &state.settings;
    let model = settings.model_settings();

    println!("Settings file:   {}", settings.settings_path().display());
    println!("Text folder:     {}", settings.text_folder().display());
    println!("Processed:       {}", settings.processed_folder().display());
    println!("Model:           {}", model.model);
    println!("Temperature:     {}", model.temperature);
    println!("Top P:           {}", model.top_p);
    println!("Output format:   {}", model.output_format);
    println!("Theme:           {}", settings.theme());
    println!("Default prompt:  {}", settings.prompts().default_prompt_id());
    println!(
        "API key:         {}",
        if state.service.is_configured() {
            "configured"
        } else {
            "missing"
        }
    );
    Ok(())
}

impl SetArgs {
    /// The model-related part of the change, or `None` when it touches no
    /// model field.
    fn model_update(&self) -> Option<ModelSettingsUpdate> {
        if self.model.is_none()
            && self.temperature.is_none()
            && self.top_p.is_none()
            && self.format.is_none()
        {
            return None;
        }
        Some(ModelSettingsUpdate {
            model: self.model.clone(),
            temperature: self.temperature,
            top_p: self.top_p,
            output_format: self.format,
        })
    }
}

fn set(state: &AppState, args: SetArgs) -> Result<()> {
    if let Some(update) = args.model_update() {
        state.settings.set_model_settings(update)?;
    }

    if let Some(folder) = args.text_folder {
        state.settings.set_text_folder(folder)?;
    }
    if let Some(theme) = args.theme {
        state.settings.set_theme(theme)?;
    }
    Ok(())
}

pub fn models() {
    println!(
        "{:<14} {:<14} {:>10} {:>10}  Notes",
        "ID", "Name", "In $/1M", "Out $/1M"
    );
    for model in MODEL_CATALOG {
        println!(
            "{:<14} {:<14} {:>10.2} {:>10.2}  {}",
            model.id, model.name, model.input_price_per_1m, model.output_price_per_1m, model.notes
        );
    }
}
