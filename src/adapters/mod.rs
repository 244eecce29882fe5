//! Adapter interfaces for external book catalogs.
//!
//! Adapters hide the HTTP details of a catalog service behind
//! [`CatalogSource`], so the library can be driven by a stub in tests.

pub mod google_books;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::Isbn;

// Re-export the Google Books adapter
pub use google_books::GoogleBooksClient;

/// Errors talking to a catalog service
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to decode catalog response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(String),

    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

/// Metadata for the first volume matching an ISBN.
///
/// Every field is optional; the catalog may omit any of them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogVolume {
    /// All listed authors, in catalog order
    pub authors: Vec<String>,

    pub title: Option<String>,

    /// Free-form date as returned by the catalog ("2011", "2011-05-12", ...)
    pub published_date: Option<String>,

    pub page_count: Option<u32>,

    /// Genres / categories
    pub categories: Option<Vec<String>>,

    /// Cover thumbnail URL
    pub thumbnail_url: Option<String>,
}

/// Trait for book catalog services
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Human-readable catalog name
    fn name(&self) -> &str;

    /// Look up the first volume for an ISBN; `Ok(None)` when nothing matches
    async fn find_by_isbn(&self, isbn: &Isbn) -> Result<Option<CatalogVolume>, CatalogError>;

    /// Download a cover image
    async fn fetch_cover(&self, url: &str) -> Result<Vec<u8>, CatalogError>;
}
