use crate::commands::context::AppContext;
use crate::commands::prompts;
use crate::output::Output;
use crate::render::summary_line;
use crate::WatchedCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, CellAlignment, Table};
use lenslore_core::{WatchlistError, WatchlistStore};
use lenslore_models::{UserRating, WatchedEntry};
use tracing::info;

pub async fn run_watched(cmd: WatchedCommands, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let mut watchlist = ctx.open_watchlist(false)?;

    match cmd {
        WatchedCommands::List => list(&watchlist, output),
        WatchedCommands::Summary => summary(&watchlist, output),
        WatchedCommands::Add { id, rating } => {
            let rating = rating.map(UserRating::new).transpose()?;
            add(&ctx, &mut watchlist, &id, rating, output).await
        }
        WatchedCommands::Remove { id } => remove(&mut watchlist, &id, output),
    }
}

fn list(watchlist: &WatchlistStore, output: &Output) -> Result<()> {
    if output.format().is_json() {
        output.json(&serde_json::to_value(watchlist.entries())?);
        return Ok(());
    }
    if watchlist.is_empty() {
        output.info("Your watched list is empty");
        return Ok(());
    }
    output.println(watched_table(watchlist.entries()).to_string());
    output.info(summary_line(&watchlist.summary()));
    Ok(())
}

fn summary(watchlist: &WatchlistStore, output: &Output) -> Result<()> {
    let summary = watchlist.summary();
    if output.format().is_json() {
        output.json(&serde_json::to_value(summary)?);
    } else {
        output.info(summary_line(&summary));
    }
    Ok(())
}

/// Fetch `id` from the catalog and append it. Outside a browse session the
/// rating is given once, so it counts as a single decision.
async fn add(
    ctx: &AppContext,
    watchlist: &mut WatchlistStore,
    id: &str,
    rating: Option<UserRating>,
    output: &Output,
) -> Result<()> {
    if let Some(entry) = watchlist.get(id) {
        output.warn(format!("{} is already on your list ({}⭐)", entry.title, entry.user_rating));
        return Ok(());
    }

    let catalog = ctx.catalog()?;
    let detail = catalog
        .movie(id)
        .await
        .map_err(|e| eyre!("{} 😓 ({})", e.user_message(), e))?;

    let rating = match rating {
        Some(rating) => rating,
        None => prompts::prompt_rating(&detail.title, output)?,
    };

    let entry = WatchedEntry::from_detail(&detail, rating, 1);
    match watchlist.add(entry) {
        Ok(()) => {
            info!(id = %detail.id, rating = rating.stars(), "Added to watched list");
            output.success(format!("Added {} with {}⭐", detail.title, rating));
            Ok(())
        }
        Err(WatchlistError::AlreadyWatched(_)) => {
            output.warn(format!("{} is already on your list", detail.title));
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn remove(watchlist: &mut WatchlistStore, id: &str, output: &Output) -> Result<()> {
    let Some(title) = watchlist.get(id).map(|e| e.title.clone()) else {
        output.warn(format!("{} is not on your list", id));
        return Ok(());
    };
    watchlist.delete(id)?;
    output.success(format!("Removed {}", title));
    Ok(())
}

fn watched_table(entries: &[WatchedEntry]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(
        ["#", "Title", "Year", "⭐️ IMDb", "🌟 Yours", "⏳ Runtime", "Decisions"]
            .into_iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
    );
    for (i, entry) in entries.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&entry.title),
            Cell::new(&entry.release_year),
            Cell::new(format!("{:.2}", entry.catalog_rating)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", entry.user_rating)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{} min", entry.runtime_minutes)).set_alignment(CellAlignment::Right),
            Cell::new(entry.rating_revision_count).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use lenslore_models::MovieDetail;

    #[test]
    fn test_watched_table_formats_ratings() {
        let detail = MovieDetail {
            id: "tt0133093".to_string(),
            title: "The Matrix".to_string(),
            release_year: "1999".to_string(),
            runtime: "136 min".to_string(),
            catalog_rating: "8.7".to_string(),
            ..Default::default()
        };
        let entry = WatchedEntry::from_detail(&detail, UserRating::new(9).unwrap(), 2);
        let rendered = watched_table(&[entry]).to_string();
        assert!(rendered.contains("8.70"));
        assert!(rendered.contains("9.00"));
        assert!(rendered.contains("136 min"));
    }
}
