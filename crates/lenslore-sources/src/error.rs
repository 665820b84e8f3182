use thiserror::Error;

/// Ways a catalog request can fail. Cancellation is not one of them: a
/// superseded request is aborted by its owner and never produces a value.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Network or transport failure before a response arrived.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The catalog answered with a non-success HTTP status.
    #[error("catalog returned HTTP {status}")]
    Status { status: u16 },

    /// The catalog answered successfully but reported no match.
    #[error("not found: {0}")]
    NotFound(String),

    /// The response body could not be decoded.
    #[error("failed to decode catalog response: {0}")]
    Decode(String),

    /// Client not configured (missing API key, etc.).
    #[error("catalog not configured: {0}")]
    NotConfigured(String),
}

impl CatalogError {
    /// Short message suitable for showing next to the search box.
    pub fn user_message(&self) -> &'static str {
        match self {
            CatalogError::Transport(_) => "Failed to fetch",
            CatalogError::NotFound(_) => "Movie Not Found!",
            CatalogError::Status { .. } | CatalogError::Decode(_) => "Something went wrong",
            CatalogError::NotConfigured(_) => "Catalog is not configured",
        }
    }
}
