pub mod config;
pub mod paths;

pub use config::{CatalogConfig, Config, LayoutConfig, SearchConfig, StorageConfig, API_KEY_ENV, PLACEHOLDER_API_KEY};
pub use paths::{PathManager, container_base_path};
