use crate::commands::context::AppContext;
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{presets::UTF8_FULL, modifiers::UTF8_ROUND_CORNERS, Attribute, Cell, Color, Table};
use lenslore_models::{MovieDetail, WatchedEntry};
use serde_json::json;

pub async fn run_show(id: &str, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let catalog = ctx.catalog()?;
    let watchlist = ctx.open_watchlist(false)?;

    // The interactive view only logs detail failures; here they are the result
    let detail = catalog
        .movie(id)
        .await
        .map_err(|e| eyre!("{} 😓 ({})", e.user_message(), e))?;
    let watched = watchlist.get(&detail.id);

    if output.format().is_json() {
        output.json(&json!({
            "movie": detail,
            "runtimeMinutes": detail.runtime_minutes(),
            "watched": watched,
        }));
    } else {
        output.println(detail_table(&detail, watched).to_string());
    }
    Ok(())
}

fn detail_table(detail: &MovieDetail, watched: Option<&WatchedEntry>) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new(&detail.title).fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new(&detail.release_year),
    ]);

    let rows = [
        ("IMDb id", detail.id.clone()),
        ("Released", format!("{} • {}", detail.released, detail.runtime)),
        ("Genre", detail.genre.clone()),
        ("Rating", format!("⭐ {} IMDb rating", detail.catalog_rating)),
        ("Plot", detail.plot.clone()),
        ("Starring", detail.actors.clone()),
        ("Directed by", detail.director.clone()),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label).add_attribute(Attribute::Bold), Cell::new(value)]);
    }

    let yours = match watched {
        Some(entry) => format!("You gave {} {}⭐ rating", detail.title, entry.user_rating),
        None => "Not on your watched list".to_string(),
    };
    table.add_row(vec![Cell::new("Your rating").add_attribute(Attribute::Bold), Cell::new(yours)]);

    table.load_preset(UTF8_FULL);
    table.apply_modifier(UTF8_ROUND_CORNERS);
    table
}
