//! Google Books volumes API client.
//!
//! Endpoint: GET https://www.googleapis.com/books/v1/volumes?q=isbn:<isbn>

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use tracing::debug;

use super::{CatalogError, CatalogSource, CatalogVolume};
use crate::domain::Isbn;

/// Default public volumes endpoint
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/books/v1/volumes";

/// Google Books client
pub struct GoogleBooksClient {
    /// Volumes endpoint
    base_url: String,
    /// Optional API key (anonymous quota otherwise)
    api_key: Option<String>,
    /// HTTP client
    client: reqwest::Client,
}

/// Response from the volumes endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumesResponse {
    #[serde(default)]
    total_items: u32,
    #[serde(default)]
    items: Vec<VolumeItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeItem {
    #[serde(default)]
    volume_info: VolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    title: Option<String>,
    #[serde(default)]
    authors: Vec<String>,
    published_date: Option<String>,
    page_count: Option<u32>,
    categories: Option<Vec<String>>,
    image_links: Option<ImageLinks>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageLinks {
    thumbnail: Option<String>,
}

impl From<VolumeInfo> for CatalogVolume {
    fn from(info: VolumeInfo) -> Self {
        Self {
            authors: info.authors,
            title: info.title,
            published_date: info.published_date,
            page_count: info.page_count,
            categories: info.categories,
            thumbnail_url: info.image_links.and_then(|links| links.thumbnail),
        }
    }
}

/// Decode a volumes response body, keeping only the first item
pub fn parse_volumes(body: &str) -> Result<Option<CatalogVolume>, CatalogError> {
    let response: VolumesResponse = serde_json::from_str(body)?;
    debug!(total_items = response.total_items, "Decoded volumes response");
    Ok(response
        .items
        .into_iter()
        .next()
        .map(|item| CatalogVolume::from(item.volume_info)))
}

impl GoogleBooksClient {
    /// Create a client against the default endpoint
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, None, None)
    }

    /// Create a client with a custom endpoint, key and timeout
    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Option<Duration>,
    ) -> Self {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        // Only fails if the TLS backend cannot initialise
        let client = builder.build().unwrap_or_else(|_| reqwest::Client::new());

        Self {
            base_url: base_url.into(),
            api_key,
            client,
        }
    }

    /// Create from the resolved catalog settings
    pub fn from_settings(settings: &crate::config::CatalogSettings) -> Self {
        Self::with_base_url(
            settings.base_url.clone(),
            settings.api_key.clone(),
            Some(Duration::from_secs(settings.timeout_seconds)),
        )
    }

    /// Build the lookup URL for an ISBN
    fn volumes_url(&self, isbn: &Isbn) -> Result<Url, CatalogError> {
        let query = format!("isbn:{}", isbn);
        let mut params = vec![("q", query.as_str())];
        if let Some(key) = &self.api_key {
            params.push(("key", key.as_str()));
        }

        Url::parse_with_params(&self.base_url, &params)
            .map_err(|e| CatalogError::InvalidUrl(format!("{}: {}", self.base_url, e)))
    }
}

impl Default for GoogleBooksClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogSource for GoogleBooksClient {
    fn name(&self) -> &str {
        "google-books"
    }

    async fn find_by_isbn(&self, isbn: &Isbn) -> Result<Option<CatalogVolume>, CatalogError> {
        let url = self.volumes_url(isbn)?;
        debug!(%url, "Querying catalog");

        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_volumes(&body)
    }

    async fn fetch_cover(&self, url: &str) -> Result<Vec<u8>, CatalogError> {
        let bytes = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        Ok(bytes.to_vec())
    }
}
