//! A single book being looked up in a catalog.
//!
//! A [`Book`] starts with nothing but its ISBN. [`Book::lookup`] fills in the
//! details; until it succeeds every accessor returns `None`.

use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, warn};

use super::isbn::Isbn;
use super::record::{html_fragment, surname_of, thumbnail_file_name, LibraryRecord};
use crate::adapters::{CatalogError, CatalogSource};
use crate::library::ThumbnailStore;

/// Why a lookup produced no usable book
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("No catalog entry for ISBN {0}")]
    NotFound(Isbn),

    #[error("Catalog entry for ISBN {0} lists no author")]
    MissingAuthor(Isbn),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Details filled in by a successful lookup
#[derive(Debug, Clone, PartialEq)]
pub struct BookDetails {
    /// First listed author
    pub author: String,
    pub title: Option<String>,
    pub published: Option<String>,
    pub pages: Option<u32>,
    pub genres: Option<Vec<String>>,
    pub thumbnail_url: Option<String>,
}

/// Result of storing a cover thumbnail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverOutcome {
    /// The catalog image was downloaded
    Downloaded(PathBuf),

    /// The placeholder image was copied in its place
    Placeholder(PathBuf),

    /// Neither the download nor the placeholder copy worked
    Missing,
}

/// A book identified by ISBN
#[derive(Debug, Clone)]
pub struct Book {
    isbn: Isbn,
    details: Option<BookDetails>,
}

impl Book {
    pub fn new(isbn: Isbn) -> Self {
        Self {
            isbn,
            details: None,
        }
    }

    pub fn isbn(&self) -> &Isbn {
        &self.isbn
    }

    /// Query the catalog and keep the first result's details
    pub async fn lookup(&mut self, source: &dyn CatalogSource) -> Result<&BookDetails, LookupError> {
        debug!(isbn = %self.isbn, catalog = source.name(), "Looking up book");

        let volume = source
            .find_by_isbn(&self.isbn)
            .await?
            .ok_or_else(|| LookupError::NotFound(self.isbn.clone()))?;

        // Multi-author books keep only the first author
        let author = volume
            .authors
            .into_iter()
            .find(|a| !a.trim().is_empty())
            .ok_or_else(|| LookupError::MissingAuthor(self.isbn.clone()))?;

        Ok(&*self.details.insert(BookDetails {
            author,
            title: volume.title,
            published: volume.published_date,
            pages: volume.page_count,
            genres: volume.categories,
            thumbnail_url: volume.thumbnail_url,
        }))
    }

    pub fn details(&self) -> Option<&BookDetails> {
        self.details.as_ref()
    }

    pub fn author(&self) -> Option<&str> {
        self.details.as_ref().map(|d| d.author.as_str())
    }

    pub fn title(&self) -> Option<&str> {
        self.details.as_ref()?.title.as_deref()
    }

    pub fn published(&self) -> Option<&str> {
        self.details.as_ref()?.published.as_deref()
    }

    pub fn pages(&self) -> Option<u32> {
        self.details.as_ref()?.pages
    }

    pub fn genres(&self) -> Option<&[String]> {
        self.details.as_ref()?.genres.as_deref()
    }

    pub fn surname(&self) -> Option<String> {
        self.author().map(surname_of)
    }

    pub fn thumbnail_file(&self) -> Option<String> {
        self.surname()
            .map(|surname| thumbnail_file_name(&surname, &self.isbn))
    }

    pub fn html_fragment(&self) -> Option<String> {
        self.thumbnail_file()
            .map(|file| html_fragment(&self.isbn, &file))
    }

    /// Database record for this book, once the author is known
    pub fn to_record(&self) -> Option<LibraryRecord> {
        let author = self.author()?;
        Some(LibraryRecord::new(
            author,
            self.title().unwrap_or_default(),
            Some(self.isbn.clone()),
        ))
    }

    /// Store the cover thumbnail, falling back to the placeholder image.
    ///
    /// Failures are logged, never returned.
    pub async fn store_cover(
        &self,
        source: &dyn CatalogSource,
        thumbnails: &ThumbnailStore,
    ) -> CoverOutcome {
        let Some(file_name) = self.thumbnail_file() else {
            return CoverOutcome::Missing;
        };

        let url = self.details.as_ref().and_then(|d| d.thumbnail_url.as_deref());
        if let Some(url) = url {
            match source.fetch_cover(url).await {
                Ok(bytes) => match thumbnails.write(&file_name, bytes).await {
                    Ok(path) => return CoverOutcome::Downloaded(path),
                    Err(e) => warn!(file = %file_name, "Failed to write cover: {:#}", e),
                },
                Err(e) => warn!(isbn = %self.isbn, %url, "Failed to download cover: {}", e),
            }
        } else {
            debug!(isbn = %self.isbn, "Catalog has no cover image");
        }

        match thumbnails.copy_placeholder(&file_name).await {
            Ok(path) => CoverOutcome::Placeholder(path),
            Err(e) => {
                tracing::error!(file = %file_name, "Failed to copy placeholder cover: {:#}", e);
                CoverOutcome::Missing
            }
        }
    }
}
