//! The interactive studio.
//!
//! Remote operations (analysis, rendering, refinement) run on background
//! tasks and report back through a channel, so the prompt stays usable while
//! Gemini works. Everything else completes before the next prompt.

use std::future::Future;
use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Result, anyhow};
use clickforge_application::{OperationOutcome, SessionUseCase};
use clickforge_core::session::RefinedImage;
use clickforge_core::{GenerationSession, Thumbnail, WorkflowStep};
use clickforge_infrastructure::{export_thumbnail, load_reference_image};
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::commands::vault::{CLEAR_PROMPT, is_confirmation};
use crate::context::AppContext;
use crate::repl::command::{ReferenceArg, StudioCommand};
use crate::repl::helper::StudioHelper;
use crate::view;

const PROMPT: &str = "forge> ";

pub async fn run(ctx: &AppContext) -> Result<()> {
    let studio = ctx.studio().await?;
    let usecase = Arc::new(SessionUseCase::new(
        studio,
        Arc::clone(&ctx.history),
        ctx.config.defaults.clone(),
    ));

    let (report_tx, mut report_rx) = mpsc::channel::<String>(32);
    let printer = tokio::spawn(async move {
        while let Some(report) = report_rx.recv().await {
            print!("{report}");
            let _ = io::stdout().flush();
        }
    });

    let mut rl = Editor::new()?;
    rl.set_helper(Some(StudioHelper));

    println!("{}", "=== ClickForge Studio ===".bright_magenta().bold());
    println!(
        "{}",
        "Set a topic, run 'analyze', then 'select <n>'. Type 'help' for all commands."
            .bright_black()
    );
    let stored = ctx.history.len().await;
    if stored > 0 {
        println!("{}", format!("{stored} thumbnail(s) in the vault.").bright_black());
    }
    println!();

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                let command = match StudioCommand::parse(trimmed) {
                    Ok(command) => command,
                    Err(message) => {
                        println!("{}", message.yellow());
                        continue;
                    }
                };

                match command {
                    StudioCommand::Quit => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    StudioCommand::ClearVault => {
                        let answer = rl.readline(CLEAR_PROMPT).unwrap_or_default();
                        if !is_confirmation(&answer) {
                            println!("Cancelled.");
                            continue;
                        }
                    }
                    _ => {}
                }

                if let Err(err) = dispatch(ctx, &usecase, command, &report_tx).await {
                    println!("{}", format!("Error: {err}").red());
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        }
    }

    // Pending reports are dropped with their tasks when the runtime shuts down.
    drop(report_tx);
    printer.abort();
    Ok(())
}

async fn dispatch(
    ctx: &AppContext,
    usecase: &Arc<SessionUseCase>,
    command: StudioCommand,
    reports: &mpsc::Sender<String>,
) -> Result<()> {
    match command {
        StudioCommand::Topic(topic) => {
            usecase.update_params(|params| params.topic = topic).await;
            println!("Topic set.");
        }
        StudioCommand::Set(field, value) => {
            usecase.set_param(field, &value).await?;
            println!("{field} set to {}.", value.trim());
        }
        StudioCommand::Ratio(ratio) => {
            usecase
                .update_params(|params| params.aspect_ratio = ratio)
                .await;
            println!("Aspect ratio set to {ratio}.");
        }
        StudioCommand::Viral(Some(on)) => {
            usecase.update_params(|params| params.viral_mode = on).await;
            println!("Viral mode {}.", if on { "on" } else { "off" });
        }
        StudioCommand::Viral(None) => {
            let on = usecase.toggle_viral_mode().await;
            println!("Viral mode {}.", if on { "on" } else { "off" });
        }
        StudioCommand::Reference(ReferenceArg::Path(path)) => {
            let image = load_reference_image(&path).await?;
            info!(path = %path.display(), mime = image.mime_type(), "reference image attached");
            usecase.set_reference_image(image).await;
            println!("Reference image attached.");
        }
        StudioCommand::Reference(ReferenceArg::Clear) => {
            usecase.clear_reference_image().await;
            println!("Reference image removed.");
        }
        StudioCommand::Analyze => {
            let params = usecase.snapshot().await.params().clone();
            let task = Arc::clone(usecase);
            spawn_report(reports, async move {
                let outcome = task.start_analysis(params).await;
                analysis_report(&outcome, &task.snapshot().await)
            });
            println!("{}", "Analyzing market...".yellow());
        }
        StudioCommand::Concepts => {
            usecase.navigate(WorkflowStep::Strategy).await;
            print!("{}", view::concepts(&usecase.snapshot().await));
        }
        StudioCommand::Select(index) => {
            let session = usecase.snapshot().await;
            let concept = session
                .concepts()
                .get(index)
                .ok_or_else(|| anyhow!("there is no concept {}", index + 1))?;
            let concept_id = concept.id.clone();
            println!("{} {}", "Rendering".yellow(), concept.title);

            let task = Arc::clone(usecase);
            spawn_report(reports, async move {
                let outcome = task.select_concept(&concept_id).await;
                render_report(outcome, &task.snapshot().await)
            });
        }
        StudioCommand::Refine(instruction) => {
            let task = Arc::clone(usecase);
            spawn_report(reports, async move {
                let outcome = task.refine_active(&instruction).await;
                refine_report(outcome, &task.snapshot().await)
            });
            println!("{}", "Refining...".yellow());
        }
        StudioCommand::Open(index) => {
            let entry = ctx
                .history
                .nth(index)
                .await
                .ok_or_else(|| anyhow!("the vault has no entry {}", index + 1))?;
            let result = usecase.open_result(&entry.id).await?;
            print!("{}", view::thumbnail(&result));
        }
        StudioCommand::Close => {
            usecase.close_result().await;
            println!("Closed.");
        }
        StudioCommand::Vault => {
            usecase.navigate(WorkflowStep::Vault).await;
            print!("{}", view::vault(&ctx.history.list().await));
        }
        StudioCommand::Export(target) => {
            let session = usecase.snapshot().await;
            let active = session
                .active()
                .ok_or_else(|| anyhow!("open or render a thumbnail first"))?;
            let target = match target {
                Some(path) => path,
                None => ctx.paths.exports_dir()?,
            };
            let path = export_thumbnail(active, &target).await?;
            println!("{} {}", "Saved".green(), path.display());
        }
        StudioCommand::ClearVault => {
            usecase.clear_history().await?;
            println!("{}", "Vault cleared.".green());
        }
        StudioCommand::Status => print!("{}", view::status(&usecase.snapshot().await)),
        StudioCommand::Help => print!("{}", view::help()),
        StudioCommand::Quit => {}
    }
    Ok(())
}

fn spawn_report<F>(reports: &mpsc::Sender<String>, task: F)
where
    F: Future<Output = String> + Send + 'static,
{
    let tx = reports.clone();
    tokio::spawn(async move {
        let _ = tx.send(task.await).await;
    });
}

fn analysis_report(outcome: &OperationOutcome<usize>, session: &GenerationSession) -> String {
    match view::unfinished(outcome, session) {
        Some(message) => format!("{message}\n"),
        None => format!(
            "{}\n{}",
            "Strategy ready.".green(),
            view::concepts(session)
        ),
    }
}

fn render_report(
    outcome: clickforge_core::Result<OperationOutcome<Thumbnail>>,
    session: &GenerationSession,
) -> String {
    match outcome {
        Ok(OperationOutcome::Completed(result)) => view::thumbnail(&result),
        Ok(other) => view::unfinished(&other, session)
            .map(|message| format!("{message}\n"))
            .unwrap_or_default(),
        Err(err) => {
            warn!(error = %err, "render result not saved");
            format!(
                "{}\n",
                format!("Rendered, but the vault could not be saved: {err}").red()
            )
        }
    }
}

fn refine_report(
    outcome: clickforge_core::Result<OperationOutcome<RefinedImage>>,
    session: &GenerationSession,
) -> String {
    match outcome {
        Ok(OperationOutcome::Completed(_)) => match session.active() {
            Some(active) => format!("{}\n{}", "Refined.".green(), view::thumbnail(active)),
            None => format!("{}\n", "Refined.".green()),
        },
        Ok(other) => view::unfinished(&other, session)
            .map(|message| format!("{message}\n"))
            .unwrap_or_default(),
        Err(err) => {
            warn!(error = %err, "refinement not saved");
            format!(
                "{}\n",
                format!("Refined, but the vault could not be saved: {err}").red()
            )
        }
    }
}
