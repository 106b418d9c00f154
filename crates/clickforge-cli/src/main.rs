use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

mod commands;
mod context;
mod logging;
mod repl;
mod view;

use context::AppContext;

#[derive(Parser)]
#[command(name = "clickforge")]
#[command(about = "ClickForge - AI thumbnail concept studio", long_about = None)]
struct Cli {
    /// Keep config, secrets, vault and logs under this directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log level for clickforge crates (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive studio (default)
    Studio,
    /// Inspect or manage saved thumbnails
    Vault {
        #[command(subcommand)]
        action: VaultAction,
    },
}

#[derive(Subcommand)]
enum VaultAction {
    /// List saved thumbnails, newest first
    List,
    /// Write a saved thumbnail to disk
    Export {
        /// Position in the list, starting at 1
        index: usize,
        /// File or directory to write to (defaults to the exports directory)
        path: Option<PathBuf>,
    },
    /// Delete every saved thumbnail
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let base = cli.data_dir.as_deref();

    let paths = clickforge_infrastructure::ClickforgePaths::new(base);
    let _guard = logging::init(&paths.logs_dir()?, &cli.log_level)?;
    info!(version = env!("CARGO_PKG_VERSION"), "clickforge starting");

    let ctx = AppContext::load(base).await?;

    match cli.command.unwrap_or(Commands::Studio) {
        Commands::Studio => commands::studio::run(&ctx).await?,
        Commands::Vault { action } => match action {
            VaultAction::List => commands::vault::list(&ctx).await?,
            VaultAction::Export { index, path } => {
                commands::vault::export(&ctx, index, path).await?
            }
            VaultAction::Clear { yes } => commands::vault::clear(&ctx, yes).await?,
        },
    }

    Ok(())
}
