//! Shared fixtures: an in-memory catalog and a temp library root.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use shelf::{CatalogError, CatalogSource, CatalogVolume, Isbn, LibraryPaths};
use tempfile::TempDir;

pub const PLACEHOLDER: &[u8] = b"\xff\xd8placeholder-cover";

/// Catalog backed by a map; covers are served only for known URLs
#[derive(Default)]
pub struct StubCatalog {
    volumes: HashMap<String, CatalogVolume>,
    covers: HashMap<String, Vec<u8>>,
    pub lookups: AtomicUsize,
    pub cover_fetches: AtomicUsize,
}

impl StubCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_book(mut self, isbn: &str, author: &str, title: &str) -> Self {
        let url = format!("http://covers.test/{}", isbn);
        self.covers.insert(url.clone(), format!("cover-{}", isbn).into_bytes());
        self.volumes.insert(
            isbn.to_string(),
            CatalogVolume {
                authors: vec![author.to_string()],
                title: Some(title.to_string()),
                published_date: Some("2001".to_string()),
                page_count: Some(300),
                categories: Some(vec!["Fiction".to_string()]),
                thumbnail_url: Some(url),
            },
        );
        self
    }

    /// A book whose cover URL cannot be fetched
    pub fn with_unreachable_cover(mut self, isbn: &str, author: &str, title: &str) -> Self {
        self.volumes.insert(
            isbn.to_string(),
            CatalogVolume {
                authors: vec![author.to_string()],
                title: Some(title.to_string()),
                thumbnail_url: Some("http://unreachable.test/cover.jpg".to_string()),
                ..Default::default()
            },
        );
        self
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogSource for StubCatalog {
    fn name(&self) -> &str {
        "stub"
    }

    async fn find_by_isbn(&self, isbn: &Isbn) -> Result<Option<CatalogVolume>, CatalogError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.volumes.get(isbn.as_str()).cloned())
    }

    async fn fetch_cover(&self, url: &str) -> Result<Vec<u8>, CatalogError> {
        self.cover_fetches.fetch_add(1, Ordering::SeqCst);
        self.covers
            .get(url)
            .cloned()
            .ok_or_else(|| CatalogError::Unavailable(format!("connection refused: {}", url)))
    }
}

/// Temp library root with the placeholder image in place
pub fn library_root() -> (TempDir, LibraryPaths) {
    let temp = TempDir::new().unwrap();
    let paths = LibraryPaths::under(temp.path());
    std::fs::create_dir_all(paths.placeholder.parent().unwrap()).unwrap();
    std::fs::write(&paths.placeholder, PLACEHOLDER).unwrap();
    (temp, paths)
}

/// File contents, or empty if the file does not exist
pub fn read_or_empty(path: &std::path::Path) -> String {
    std::fs::read_to_string(path).unwrap_or_default()
}
