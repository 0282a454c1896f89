//! Outline jobs.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Args;
use outliner::broadcast::{JobEvent, JobEventKind};
use outliner::completion::catalog;
use outliner::config::{ConfigProfile, OutputFormat};
use outliner::pipeline::{ChannelListener, FanoutListener, LogListener};
use outliner::storage::ArtifactStorage;
use outliner::worker::JobOrchestrator;

use super::files::resolve_source;
use crate::state::AppState;

#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Text files to outline. Bare names are looked up in the text folder.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Prompt preset id. Defaults to the saved default preset.
    #[arg(long)]
    pub prompt: Option<String>,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(long)]
    pub temperature: Option<f64>,

    #[arg(long)]
    pub top_p: Option<f64>,

    /// Output format: txt or md.
    #[arg(long)]
    pub format: Option<OutputFormat>,
}

impl ProcessArgs {
    /// Applies command-line overrides on top of the saved profile.
    fn apply_overrides(&self, mut profile: ConfigProfile) -> Result<ConfigProfile> {
        if let Some(model) = &self.model {
            if !catalog::is_supported(model) {
                bail!("Unsupported model '{}'. Run `outliner models` for the list.", model);
            }
            profile.model = model.clone();
        }
        if let Some(t) = self.temperature {
            profile = profile.with_temperature(t);
        }
        if let Some(p) = self.top_p {
            profile = profile.with_top_p(p);
        }
        if let Some(format) = self.format {
            profile = profile.with_output_format(format);
        }
        Ok(profile)
    }
}

#[derive(Default)]
struct Summary {
    succeeded: usize,
    failed: usize,
    total_tokens: u64,
    cost: f64,
}

pub async fn run(state: &AppState, args: ProcessArgs) -> Result<()> {
    let profile = args.apply_overrides(state.settings.profile(args.prompt.as_deref()))?;
    let paths: Vec<PathBuf> = args
        .files
        .iter()
        .map(|f| resolve_source(state, f))
        .collect();

    let (channel, mut events) = ChannelListener::new();
    let listener = FanoutListener::new()
        .with(Arc::new(channel))
        .with(Arc::new(LogListener));

    let orchestrator = JobOrchestrator::new(
        state.service.clone(),
        ArtifactStorage::new(state.settings.processed_folder()),
        state.clipboard.clone(),
        Arc::new(listener),
    );

    let ids = orchestrator.submit(paths, profile)?;
    println!("Submitted {} job(s)", ids.len());

    let mut summary = Summary::default();
    while summary.succeeded + summary.failed < ids.len() {
        let Some(event) = events.recv().await else {
            break;
        };
        print_event(&event, &mut summary);
    }
    orchestrator.wait_idle().await;

    println!(
        "Done: {} succeeded, {} failed, {} tokens, ~${:.4}",
        summary.succeeded, summary.failed, summary.total_tokens, summary.cost
    );
    if summary.failed > 0 {
        bail!("{} of {} file(s) failed", summary.failed, ids.len());
    }
    Ok(())
}

fn print_event(event: &JobEvent, summary: &mut Summary) {
    match &event.kind {
        JobEventKind::Started => println!("[started] {}", event.filename),
        JobEventKind::ClipboardWarning { message } => {
            println!("[warning] {}: {}", event.filename, message)
        }
        JobEventKind::Succeeded { usage, output_path } => {
            summary.succeeded += 1;
            summary.total_tokens += usage.total_tokens;
            summary.cost += usage.estimated_cost().unwrap_or(0.0);
            println!(
                "[done] {} -> {} ({} tokens, {:.2}s)",
                event.filename,
                output_path.display(),
                usage.total_tokens,
                usage.elapsed_seconds
            );
        }
        JobEventKind::Failed { failure } => {
            summary.failed += 1;
            println!("[failed] {}: {}", event.filename, failure);
        }
    }
}
