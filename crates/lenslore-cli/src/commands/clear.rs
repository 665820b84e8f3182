use crate::commands::context::AppContext;
use crate::commands::prompts;
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::fs;
use std::path::Path;

pub fn run_clear(all: bool, watched: bool, logs: bool, yes: bool, output: &Output) -> Result<()> {
    let watched = watched || all;
    let logs = logs || all;

    if !watched && !logs {
        output.warn("No clear option specified. Use --watched, --logs, or --all");
        output.println("\nExample: lenslore clear --watched");
        return Ok(());
    }

    if !yes && !prompts::prompt_yes_no("This cannot be undone. Continue?", false)? {
        output.info("Nothing cleared");
        return Ok(());
    }

    let ctx = AppContext::load()?;
    if watched {
        clear_watched(&ctx, output)?;
    }
    if logs {
        clear_logs(ctx.paths.log_dir(), output)?;
    }
    Ok(())
}

fn clear_watched(ctx: &AppContext, output: &Output) -> Result<()> {
    let mut watchlist = ctx.open_watchlist(false)?;
    if watchlist.is_empty() {
        output.info("Watched list is already empty");
        return Ok(());
    }
    let count = watchlist.len();
    watchlist.clear()?;
    output.success(format!("Removed {} movies from your watched list", count));
    Ok(())
}

/// Delete rotated session logs (`lenslore.*`) in `log_dir`.
fn clear_logs(log_dir: &Path, output: &Output) -> Result<()> {
    let removed = remove_session_logs(log_dir)?;
    if removed == 0 {
        output.info("No session logs found to clear");
    } else {
        output.success(format!("Cleared {} log file(s) in {}", removed, log_dir.display()));
    }
    Ok(())
}

fn remove_session_logs(log_dir: &Path) -> Result<usize> {
    if !log_dir.exists() {
        return Ok(0);
    }
    let mut removed = 0;
    for entry in fs::read_dir(log_dir)? {
        let path = entry?.path();
        let is_session_log = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("lenslore."));
        if path.is_file() && is_session_log {
            fs::remove_file(&path)
                .map_err(|e| eyre!("Failed to remove log file at {}: {}", path.display(), e))?;
            removed += 1;
        }
    }
    Ok(removed)
}
