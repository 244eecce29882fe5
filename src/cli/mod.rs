//! Command-line interface for shelf.
//!
//! Provides commands for adding books by ISBN, listing and re-sorting the
//! library, looking up catalog metadata, and showing the configuration.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::adapters::{CatalogSource, GoogleBooksClient};
use crate::config::{self, ResolvedConfig};
use crate::domain::{Book, CoverOutcome, Isbn};
use crate::library::{AddOutcome, Library};

/// shelf - Personal book library tracker
#[derive(Parser, Debug)]
#[command(name = "shelf")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Library root directory (defaults to the config file's project or the current directory)
    #[arg(long, global = true, env = "SHELF_HOME")]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Look up books by ISBN and add them to the library
    Add {
        /// One or more 13-digit ISBNs, added one after another
        #[arg(required = true)]
        isbns: Vec<String>,
    },

    /// Show the books in the library
    List,

    /// Re-sort the library and regenerate the HTML snippet
    Sort,

    /// Show catalog metadata for an ISBN without adding it
    Lookup {
        /// 13-digit ISBN
        isbn: String,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let cfg = config::init_config(self.root)?;

        match self.command {
            Commands::Add { isbns } => add_books(cfg, &isbns).await,
            Commands::List => list_library(cfg).await,
            Commands::Sort => sort_library(cfg).await,
            Commands::Lookup { isbn } => lookup_book(cfg, &isbn).await,
            Commands::Config => show_config(cfg),
        }
    }
}

fn catalog(cfg: &ResolvedConfig) -> GoogleBooksClient {
    GoogleBooksClient::from_settings(&cfg.catalog)
}

/// Add books one at a time
async fn add_books(cfg: &ResolvedConfig, isbns: &[String]) -> Result<()> {
    let source = catalog(cfg);
    let mut library = Library::open(cfg.paths.clone()).await?;

    for input in isbns {
        let outcome = library.add_book(input, &source).await?;
        if let Some(line) = added_line(&outcome) {
            println!("{}", line);
        }
        if let AddOutcome::Added { cover: CoverOutcome::Missing, .. } = outcome {
            eprintln!("   (no thumbnail stored for {})", input);
        }
    }

    Ok(())
}

/// Confirmation printed for an added book.
///
/// Skipped inputs print nothing here; `Library::add_book` already logged why.
fn added_line(outcome: &AddOutcome) -> Option<String> {
    match outcome {
        AddOutcome::Added { record, .. } => Some(format!("{} {}", record.title, record.author)),
        AddOutcome::InvalidIsbn(_) | AddOutcome::NotFound(_) => None,
    }
}

/// List the library
async fn list_library(cfg: &ResolvedConfig) -> Result<()> {
    let library = Library::open(cfg.paths.clone()).await?;
    println!("{}", library.listing());
    Ok(())
}

/// Re-sort both files
async fn sort_library(cfg: &ResolvedConfig) -> Result<()> {
    let mut library = Library::open(cfg.paths.clone()).await?;
    library.sort().await?;
    eprintln!("Sorted {} book(s)", library.len());
    Ok(())
}

/// Print catalog metadata for an ISBN
async fn lookup_book(cfg: &ResolvedConfig, input: &str) -> Result<()> {
    let isbn = Isbn::parse(input)?;
    let source = catalog(cfg);
    let mut book = Book::new(isbn);

    if let Err(e) = book.lookup(&source).await {
        eprintln!("{}", e);
        return Ok(());
    }

    let none = || "-".to_string();
    println!("ISBN:      {}", book.isbn());
    println!("Author:    {}", book.author().map(str::to_string).unwrap_or_else(none));
    println!("Title:     {}", book.title().map(str::to_string).unwrap_or_else(none));
    println!("Published: {}", book.published().map(str::to_string).unwrap_or_else(none));
    println!("Pages:     {}", book.pages().map(|p| p.to_string()).unwrap_or_else(none));
    println!("Genres:    {}", book.genres().map(|g| g.join(", ")).unwrap_or_else(none));
    println!("Thumbnail: {}", book.thumbnail_file().unwrap_or_else(none));
    println!("Catalog:   {}", source.name());

    Ok(())
}

/// Show the resolved configuration (for debugging)
fn show_config(cfg: &ResolvedConfig) -> Result<()> {
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Paths:");
    println!("  Root:        {}", cfg.paths.root.display());
    println!("  Database:    {}", cfg.paths.database.display());
    println!("  Snippet:     {}", cfg.paths.snippet.display());
    println!("  Thumbnails:  {}", cfg.paths.thumbnails.display());
    println!("  Placeholder: {}", cfg.paths.placeholder.display());
    println!();
    println!("Catalog:");
    println!("  Base URL: {}", cfg.catalog.base_url);
    println!(
        "  API key:  {}",
        if cfg.catalog.api_key.is_some() { "(set)" } else { "(none)" }
    );
    println!("  Timeout:  {}s", cfg.catalog.timeout_seconds);

    Ok(())
}
