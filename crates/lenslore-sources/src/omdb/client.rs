use crate::error::CatalogError;
use crate::omdb::api;
use crate::traits::MovieCatalog;
use async_trait::async_trait;
use lenslore_config::CatalogConfig;
use lenslore_models::{MovieDetail, SearchResult};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Clone)]
pub struct OmdbClient {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> Result<Self, CatalogError> {
        if api_key.trim().is_empty() {
            return Err(CatalogError::NotConfigured("OMDb API key is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("lenslore/", env!("CARGO_PKG_VERSION")))
            .build()?;

        info!(base_url = %base_url, "OMDb client ready");
        Ok(Self {
            client: Arc::new(client),
            base_url,
            api_key,
        })
    }

    /// Build a client from the `[catalog]` section and an already-resolved key.
    pub fn from_config(config: &CatalogConfig, api_key: String) -> Result<Self, CatalogError> {
        Self::new(
            api_key,
            config.base_url.clone(),
            Duration::from_secs(config.timeout_seconds),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl MovieCatalog for OmdbClient {
    fn catalog_name(&self) -> &str {
        "omdb"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, CatalogError> {
        api::search_movies(&self.client, &self.base_url, &self.api_key, query).await
    }

    async fn movie(&self, id: &str) -> Result<MovieDetail, CatalogError> {
        api::get_movie(&self.client, &self.base_url, &self.api_key, id).await
    }
}
