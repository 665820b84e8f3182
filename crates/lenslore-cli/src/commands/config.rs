use crate::commands::prompts;
use crate::output::Output;
use crate::ConfigCommands;
use color_eyre::eyre::{eyre, Context};
use color_eyre::Result;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Attribute, Cell, Color, Table};
use lenslore_config::{Config, PathManager, API_KEY_ENV};
use owo_colors::OwoColorize;
use serde_json::json;

pub fn run_config(cmd: ConfigCommands, output: &Output) -> Result<()> {
    let paths = PathManager::default();
    match cmd {
        ConfigCommands::Show { full } => show_config(&paths, full, output),
        ConfigCommands::SetKey { key } => set_key(&paths, key, output),
        ConfigCommands::Init { force } => init_config(&paths, force, output),
    }
}

fn load(paths: &PathManager) -> Result<Config> {
    let config_file = paths.config_file();
    Config::load_or_default(&config_file)
        .map_err(|e| eyre!("{}", e))
        .wrap_err_with(|| format!("Failed to load config from {}", config_file.display()))
}

/// Keep the first and last two characters of a key.
fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 6 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}{}{}", head, "*".repeat(chars.len() - 4), tail)
}

fn key_source(config: &Config) -> &'static str {
    let from_env = std::env::var(API_KEY_ENV).map(|v| !v.trim().is_empty()).unwrap_or(false);
    if from_env {
        "environment"
    } else if config.is_api_key_configured() {
        "config file"
    } else {
        "not set"
    }
}

fn show_config(paths: &PathManager, full: bool, output: &Output) -> Result<()> {
    let config = load(paths)?;
    let api_key = config.resolve_api_key().ok();
    let key_display = match &api_key {
        Some(key) if full => key.clone(),
        Some(key) => mask_secret(key),
        None => "(not set)".to_string(),
    };

    if output.format().is_json() {
        output.json(&json!({
            "config_file": paths.config_file().display().to_string(),
            "storage_file": paths.storage_file().display().to_string(),
            "api_key": key_display,
            "api_key_source": key_source(&config),
            "catalog": {
                "base_url": config.catalog.base_url,
                "timeout_seconds": config.catalog.timeout_seconds,
            },
            "search": { "min_query_chars": config.search.min_query_chars },
            "layout": { "narrow_breakpoint": config.layout.narrow_breakpoint },
            "storage": { "watched_key": config.storage.watched_key },
        }));
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("Lenslore Configuration").fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);
    let key_cell = if api_key.is_some() {
        format!("{} {}", "✓".green(), key_display)
    } else {
        format!("{} {}", "✗".red(), key_display)
    };
    let rows = [
        ("Config File", paths.config_file().display().to_string()),
        ("Storage File", paths.storage_file().display().to_string()),
        ("API Key", key_cell),
        ("API Key Source", key_source(&config).to_string()),
        ("Catalog URL", config.catalog.base_url.clone()),
        ("Timeout", format!("{}s", config.catalog.timeout_seconds)),
        ("Min Query Chars", config.search.min_query_chars.to_string()),
        ("Narrow Breakpoint", format!("{} columns", config.layout.narrow_breakpoint)),
        ("Watched Key", config.storage.watched_key.clone()),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label).add_attribute(Attribute::Bold), Cell::new(value)]);
    }
    table.load_preset(UTF8_FULL);
    table.apply_modifier(UTF8_ROUND_CORNERS);
    output.println(table.to_string());

    if api_key.is_none() {
        output.warn(format!(
            "No API key. Get one at https://www.omdbapi.com/apikey.aspx, then run 'lenslore config set-key' or set {}",
            API_KEY_ENV
        ));
    }
    Ok(())
}

fn set_key(paths: &PathManager, key: Option<String>, output: &Output) -> Result<()> {
    let key = match key {
        Some(key) => key,
        None => prompts::prompt_string("OMDb API key", None)?,
    };
    let key = key.trim().to_string();
    if key.is_empty() {
        return Err(eyre!("API key cannot be empty"));
    }

    let mut config = load(paths)?;
    config.catalog.api_key = Some(key);
    config
        .save_to_file(&paths.config_file())
        .map_err(|e| eyre!("{}", e))
        .wrap_err("Failed to save config")?;

    output.success(format!("API key saved to {}", paths.config_file().display()));
    if std::env::var(API_KEY_ENV).is_ok() {
        output.warn(format!("{} is set and takes priority over the config file", API_KEY_ENV));
    }
    Ok(())
}

fn init_config(paths: &PathManager, force: bool, output: &Output) -> Result<()> {
    let config_file = paths.config_file();
    if config_file.exists() && !force {
        output.warn(format!("{} already exists (use --force to overwrite)", config_file.display()));
        return Ok(());
    }

    paths.ensure_directories().map_err(|e| eyre!("{}", e))?;
    Config::default()
        .save_to_file(&config_file)
        .map_err(|e| eyre!("{}", e))
        .wrap_err("Failed to write default config")?;
    output.success(format!("Wrote default configuration to {}", config_file.display()));
    Ok(())
}
