use color_eyre::eyre::{eyre, Context};
use color_eyre::Result;
use lenslore_config::{Config, PathManager};
use lenslore_core::{FileStore, MemoryStore, WatchlistStore};
use lenslore_sources::{MovieCatalog, OmdbClient};
use std::sync::Arc;
use tracing::debug;

/// Used when neither `--width` nor `$COLUMNS` says how wide the terminal is.
const FALLBACK_WIDTH: u16 = 100;

/// Paths and validated configuration shared by every command.
pub struct AppContext {
    pub paths: PathManager,
    pub config: Config,
}

impl AppContext {
    pub fn load() -> Result<Self> {
        let paths = PathManager::default();
        let config_file = paths.config_file();
        let config = Config::load_or_default(&config_file)
            .map_err(|e| eyre!("{}", e))
            .wrap_err_with(|| format!("Failed to load config from {}", config_file.display()))?;
        config.validate().map_err(|e| eyre!("Invalid configuration: {}", e))?;
        debug!(path = %config_file.display(), "Configuration loaded");
        Ok(Self { paths, config })
    }

    /// Resolve the API key and build the catalog client. Fails before any
    /// request when no key is configured.
    pub fn catalog(&self) -> Result<Arc<dyn MovieCatalog>> {
        let api_key = self.config.resolve_api_key().map_err(|e| eyre!("{}", e))?;
        let client = OmdbClient::from_config(&self.config.catalog, api_key)?;
        Ok(Arc::new(client))
    }

    pub fn open_watchlist(&self, ephemeral: bool) -> Result<WatchlistStore> {
        let key = self.config.storage.watched_key.clone();
        if ephemeral {
            return Ok(WatchlistStore::open(Box::new(MemoryStore::new()), key));
        }
        self.paths
            .ensure_directories()
            .map_err(|e| eyre!("{}", e))
            .wrap_err("Failed to create data directories")?;
        let store = FileStore::open(self.paths.storage_file());
        debug!(path = %store.path().display(), "Opened watched list storage");
        Ok(WatchlistStore::open(Box::new(store), key))
    }
}

/// Width from `--width`, then `$COLUMNS`, then a fixed fallback.
pub fn viewport_width(override_width: Option<u16>) -> u16 {
    viewport_width_from(override_width, std::env::var("COLUMNS").ok())
}

fn viewport_width_from(override_width: Option<u16>, columns: Option<String>) -> u16 {
    override_width
        .or_else(|| columns.and_then(|c| c.trim().parse().ok()))
        .filter(|w| *w > 0)
        .unwrap_or(FALLBACK_WIDTH)
}
