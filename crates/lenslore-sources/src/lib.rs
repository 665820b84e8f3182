pub mod traits;
pub mod omdb;
pub mod error;

pub use traits::MovieCatalog;
pub use omdb::OmdbClient;
pub use error::CatalogError;
