//! `clickforge vault` subcommands.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clickforge_infrastructure::export_thumbnail;
use colored::Colorize;

use crate::context::AppContext;
use crate::view;

pub const CLEAR_PROMPT: &str = "Clear every thumbnail in the vault? [y/N] ";

/// True only for an explicit yes.
pub fn is_confirmation(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

pub async fn list(ctx: &AppContext) -> Result<()> {
    print!("{}", view::vault(&ctx.history.list().await));
    Ok(())
}

/// Exports the entry at one-based `position`.
pub async fn export(ctx: &AppContext, position: usize, target: Option<PathBuf>) -> Result<()> {
    let entry = position
        .checked_sub(1)
        .ok_or_else(|| anyhow!("positions start at 1"))?;
    let thumbnail = ctx
        .history
        .nth(entry)
        .await
        .ok_or_else(|| anyhow!("the vault has no entry {position}"))?;
    let target = match target {
        Some(path) => path,
        None => ctx.paths.exports_dir()?,
    };
    let path = export_thumbnail(&thumbnail, &target).await?;
    println!("{} {}", "Saved".green(), path.display());
    Ok(())
}

pub async fn clear(ctx: &AppContext, yes: bool) -> Result<()> {
    if !yes {
        print!("{CLEAR_PROMPT}");
        io::stdout().flush()?;
        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        if !is_confirmation(&answer) {
            println!("Cancelled.");
            return Ok(());
        }
    }
    let count = ctx.history.len().await;
    ctx.history.clear().await?;
    println!("{} {count} thumbnail(s) removed.", "Vault cleared.".green());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_only_explicit_yes_confirms() {
        assert!(is_confirmation("y\n"));
        assert!(is_confirmation(" YES "));
        assert!(!is_confirmation(""));
        assert!(!is_confirmation("n"));
        assert!(!is_confirmation("yep"));
    }

    #[tokio::test]
    async fn test_clear_with_yes_on_empty_vault() {
        let temp = TempDir::new().unwrap();
        let ctx = AppContext::load(Some(temp.path())).await.unwrap();
        clear(&ctx, true).await.unwrap();
        assert!(ctx.history.is_empty().await);
    }

    #[tokio::test]
    async fn test_export_missing_entry_fails() {
        let temp = TempDir::new().unwrap();
        let ctx = AppContext::load(Some(temp.path())).await.unwrap();
        assert!(export(&ctx, 1, None).await.is_err());
        assert!(export(&ctx, 0, None).await.is_err());
    }
}
