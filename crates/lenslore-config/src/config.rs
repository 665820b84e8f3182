use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable that overrides `catalog.api_key`.
pub const API_KEY_ENV: &str = "LENSLORE_OMDB_API_KEY";

/// Value written by `config init` until the user supplies a real key.
pub const PLACEHOLDER_API_KEY: &str = "YOUR_OMDB_API_KEY";

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CatalogConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SearchConfig {
    /// Queries shorter than this (after trimming) never hit the catalog
    #[serde(default = "default_min_query_chars")]
    pub min_query_chars: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LayoutConfig {
    /// Terminal widths at or below this many columns use the narrow layout
    #[serde(default = "default_narrow_breakpoint")]
    pub narrow_breakpoint: u16,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_watched_key")]
    pub watched_key: String,
}

fn default_base_url() -> String {
    "https://www.omdbapi.com".to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_min_query_chars() -> usize {
    3
}

fn default_narrow_breakpoint() -> u16 {
    80
}

fn default_watched_key() -> String {
    "watched".to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { min_query_chars: default_min_query_chars() }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self { narrow_breakpoint: default_narrow_breakpoint() }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { watched_key: default_watched_key() }
    }
}

impl Config {
    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the file if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &PathBuf) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.catalog.base_url.trim().is_empty() {
            return Err(anyhow::anyhow!("catalog.base_url cannot be empty"));
        }
        if self.catalog.timeout_seconds == 0 {
            return Err(anyhow::anyhow!("catalog.timeout_seconds must be greater than zero"));
        }
        if self.search.min_query_chars == 0 {
            return Err(anyhow::anyhow!("search.min_query_chars must be at least 1"));
        }
        if self.storage.watched_key.is_empty() {
            return Err(anyhow::anyhow!("storage.watched_key cannot be empty"));
        }
        Ok(())
    }

    pub fn is_api_key_configured(&self) -> bool {
        usable_key(self.catalog.api_key.as_deref()).is_some()
    }

    /// The catalog API key, from the environment first and the config file second.
    pub fn resolve_api_key(&self) -> anyhow::Result<String> {
        self.resolve_api_key_with(std::env::var(API_KEY_ENV).ok())
    }

    pub fn resolve_api_key_with(&self, env_value: Option<String>) -> anyhow::Result<String> {
        usable_key(env_value.as_deref())
            .or_else(|| usable_key(self.catalog.api_key.as_deref()))
            .map(str::to_string)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "No OMDb API key configured. Run 'lenslore config set-key' or set {}",
                    API_KEY_ENV
                )
            })
    }
}

fn usable_key(key: Option<&str>) -> Option<&str> {
    key.map(str::trim)
        .filter(|k| !k.is_empty() && *k != PLACEHOLDER_API_KEY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.catalog.api_key = Some("c0ffee".to_string());
        config.layout.narrow_breakpoint = 100;

        let path = file.path().to_path_buf();
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.catalog.api_key.as_deref(), Some("c0ffee"));
        assert_eq!(loaded.catalog.base_url, "https://www.omdbapi.com");
        assert_eq!(loaded.layout.narrow_breakpoint, 100);
        assert_eq!(loaded.storage.watched_key, "watched");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[catalog]\napi_key = \"abc\"\n").unwrap();
        assert_eq!(config.catalog.timeout_seconds, 10);
        assert_eq!(config.search.min_query_chars, 3);
        assert_eq!(config.layout.narrow_breakpoint, 80);
    }

    #[test]
    fn test_config_validate() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.catalog.timeout_seconds = 0;
        assert!(config.validate().is_err());

        config.catalog.timeout_seconds = 5;
        config.search.min_query_chars = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_api_key_resolution_order() {
        let mut config = Config::default();
        assert!(config.resolve_api_key_with(None).is_err());

        config.catalog.api_key = Some(PLACEHOLDER_API_KEY.to_string());
        assert!(config.resolve_api_key_with(None).is_err());
        assert!(!config.is_api_key_configured());

        config.catalog.api_key = Some("from-file".to_string());
        assert_eq!(config.resolve_api_key_with(None).unwrap(), "from-file");
        assert_eq!(
            config.resolve_api_key_with(Some("from-env".to_string())).unwrap(),
            "from-env"
        );
        assert_eq!(
            config.resolve_api_key_with(Some("  ".to_string())).unwrap(),
            "from-file"
        );
    }
}
