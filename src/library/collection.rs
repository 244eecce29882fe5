//! The library aggregate: an ordered collection of records persisted to the
//! flat-file database and the HTML snippet.
//!
//! Records are kept sorted by [`SortKey`] in memory. Every mutation re-reads
//! the database first and rewrites both files from that one ordering, so they
//! always agree line for line.
//!
//! [`SortKey`]: crate::domain::SortKey

use anyhow::Result;
use tracing::{debug, info, instrument, warn};

use super::snippet::{self, SnippetEntry};
use super::{database, write_atomic};
use crate::adapters::CatalogSource;
use crate::config::LibraryPaths;
use crate::domain::{Book, CoverOutcome, Isbn, IsbnError, LibraryRecord, LookupError};

/// Message shown for a library with no books
pub const EMPTY_MESSAGE: &str = "Your library is empty! Add some books!";

/// What happened to a requested addition
#[derive(Debug)]
pub enum AddOutcome {
    /// Book looked up and persisted
    Added {
        record: LibraryRecord,
        cover: CoverOutcome,
    },

    /// Input was not a 13-character ISBN; nothing was looked up
    InvalidIsbn(IsbnError),

    /// Lookup produced no usable book; nothing was written
    NotFound(LookupError),
}

/// Ordered collection of library records
#[derive(Debug)]
pub struct Library {
    paths: LibraryPaths,
    records: Vec<LibraryRecord>,
    /// Snippet lines that match no record
    orphans: Vec<SnippetEntry>,
}

impl Library {
    /// Open a library, reading its database file (missing = empty)
    pub async fn open(paths: LibraryPaths) -> Result<Self> {
        let mut library = Self {
            paths,
            records: Vec::new(),
            orphans: Vec::new(),
        };
        library.reload().await?;
        Ok(library)
    }

    pub fn paths(&self) -> &LibraryPaths {
        &self.paths
    }

    /// Records in display order
    pub fn records(&self) -> &[LibraryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Snippet lines kept because no record matches them
    pub fn orphans(&self) -> &[SnippetEntry] {
        &self.orphans
    }

    /// Re-read both files from disk and re-sort in memory
    pub async fn reload(&mut self) -> Result<()> {
        let mut records = database::read(&self.paths.database).await?;
        let entries = snippet::read_entries(&self.paths.snippet).await?;

        let missing = records.iter().filter(|r| r.isbn.is_none()).count();
        let orphans = snippet::backfill_isbns(&mut records, entries);
        let filled = missing - records.iter().filter(|r| r.isbn.is_none()).count();
        if filled > 0 {
            debug!(filled, "Recovered ISBNs from HTML snippet");
        }
        if !orphans.is_empty() {
            debug!(orphans = orphans.len(), "Keeping snippet lines with no matching record");
        }

        records.sort_by_cached_key(LibraryRecord::sort_key);
        self.records = records;
        self.orphans = orphans;
        Ok(())
    }

    /// Human-readable listing: the empty-state message or a markdown table
    pub fn listing(&self) -> String {
        if self.records.is_empty() {
            return EMPTY_MESSAGE.to_string();
        }
        render_table(&self.records)
    }

    /// Re-read the database and return its listing
    pub async fn load(&mut self) -> Result<String> {
        self.reload().await?;
        Ok(self.listing())
    }

    /// Insert a record at its sorted position (after any equal keys)
    pub fn insert(&mut self, record: LibraryRecord) -> usize {
        let key = record.sort_key();
        let pos = self.records.partition_point(|r| r.sort_key() <= key);
        self.records.insert(pos, record);
        pos
    }

    /// Look up an ISBN and, if the catalog knows it, add it to the library.
    ///
    /// Invalid input and unknown books leave both files untouched.
    #[instrument(skip(self, source), fields(catalog = source.name()))]
    pub async fn add_book(&mut self, input: &str, source: &dyn CatalogSource) -> Result<AddOutcome> {
        let isbn = match Isbn::parse(input) {
            Ok(isbn) => isbn,
            Err(e) => {
                warn!("{}...skipping", e);
                return Ok(AddOutcome::InvalidIsbn(e));
            }
        };

        let mut book = Book::new(isbn);
        if let Err(e) = book.lookup(source).await {
            info!("Nothing added: {}", e);
            return Ok(AddOutcome::NotFound(e));
        }

        let Some(record) = book.to_record() else {
            // lookup succeeded, so the author is set
            return Ok(AddOutcome::NotFound(LookupError::MissingAuthor(book.isbn().clone())));
        };

        // Rows written since open must survive the rewrite
        self.reload().await?;

        let cover = book.store_cover(source, &self.paths.thumbnail_store()).await;

        let pos = self.insert(record.clone());
        if let Err(e) = self.persist().await {
            self.records.remove(pos);
            return Err(e);
        }

        info!(author = %record.author, title = %record.title, "Added book");
        Ok(AddOutcome::Added { record, cover })
    }

    /// Reload from disk, re-sort, and rewrite both files
    pub async fn sort(&mut self) -> Result<()> {
        self.reload().await?;
        self.persist().await?;
        info!(books = self.records.len(), "Library sorted");
        Ok(())
    }

    /// Write the database, then the snippet, each via atomic replace
    async fn persist(&self) -> Result<()> {
        let rows = database::render(&self.records)?;
        write_atomic(&self.paths.database, rows.into_bytes()).await?;

        let html = snippet::render(&self.records, &self.orphans);
        write_atomic(&self.paths.snippet, html.into_bytes()).await?;

        debug!(
            database = %self.paths.database.display(),
            snippet = %self.paths.snippet.display(),
            "Library persisted"
        );
        Ok(())
    }
}

/// Markdown table with a 1-based index column
fn render_table(records: &[LibraryRecord]) -> String {
    let index_width = records.len().to_string().len();
    let author_width = records
        .iter()
        .map(|r| r.author.chars().count())
        .max()
        .unwrap_or(0)
        .max("Author".len());
    let title_width = records
        .iter()
        .map(|r| r.title.chars().count())
        .max()
        .unwrap_or(0)
        .max("Title".len());

    let row = |index: &str, author: &str, title: &str| {
        format!(
            "| {:>iw$} | {:<aw$} | {:<tw$} |",
            index,
            author,
            title,
            iw = index_width,
            aw = author_width,
            tw = title_width
        )
    };

    let mut lines = Vec::with_capacity(records.len() + 2);
    lines.push(row("", "Author", "Title"));
    lines.push(format!(
        "|{}:|:{}|:{}|",
        "-".repeat(index_width + 1),
        "-".repeat(author_width + 1),
        "-".repeat(title_width + 1)
    ));
    for (i, record) in records.iter().enumerate() {
        lines.push(row(&(i + 1).to_string(), &record.author, &record.title));
    }

    lines.join("\n")
}
