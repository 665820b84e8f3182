use async_trait::async_trait;
use lenslore_models::{MovieDetail, SearchResult};
use crate::error::CatalogError;

/// A remote movie catalog that can be searched by free text and queried by id.
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    // Catalog metadata
    fn catalog_name(&self) -> &str;

    /// Summaries matching `query`, in catalog order.
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, CatalogError>;

    /// Full record for one catalog id.
    async fn movie(&self, id: &str) -> Result<MovieDetail, CatalogError>;
}
