use crate::commands::context::AppContext;
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Table};
use lenslore_core::SearchController;
use lenslore_models::SearchResult;

pub async fn run_search(query: &str, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let catalog = ctx.catalog()?;
    let min_chars = ctx.config.search.min_query_chars;

    let (mut search, mut completions) = SearchController::new(catalog, min_chars);
    search.set_query(query);
    if !search.is_loading() {
        output.warn(format!("Type at least {} characters to search", min_chars));
        return Ok(());
    }

    let completion = completions
        .recv()
        .await
        .ok_or_else(|| eyre!("Search ended without a response"))?;
    search.apply(completion);

    if let Some(error) = search.error() {
        return Err(eyre!("{} 😓", error));
    }

    if output.format().is_json() {
        output.json(&serde_json::to_value(search.results())?);
    } else {
        output.println(results_table(search.results()).to_string());
        output.info(format!("Found {} results", search.results().len()));
    }
    Ok(())
}

fn results_table(results: &[SearchResult]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("Title").add_attribute(Attribute::Bold),
        Cell::new("Year").add_attribute(Attribute::Bold),
        Cell::new("IMDb id").add_attribute(Attribute::Bold),
    ]);
    for (i, movie) in results.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&movie.title),
            Cell::new(&movie.release_year),
            Cell::new(&movie.id),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_results_table_rows() {
        let results = vec![SearchResult {
            id: "tt0133093".to_string(),
            title: "The Matrix".to_string(),
            release_year: "1999".to_string(),
            poster_url: "N/A".to_string(),
        }];
        let table = results_table(&results);
        assert_eq!(table.row_iter().count(), 1);
        let rendered = table.to_string();
        assert!(rendered.contains("The Matrix"));
        assert!(rendered.contains("tt0133093"));
    }
}
