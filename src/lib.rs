//! shelf - Personal book library tracker
//!
//! Looks books up by ISBN in a public catalog, keeps them in a flat-file
//! database sorted by author surname, and regenerates a static HTML snippet
//! of cover thumbnails for display.
//!
//! # Modules
//!
//! - `adapters`: Catalog integrations (Google Books)
//! - `domain`: Data structures (Isbn, Book, LibraryRecord)
//! - `library`: The library aggregate and its files
//! - `config`: Layered configuration
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Add books
//! shelf add 9781444720723 9780141439518
//!
//! # Show the collection
//! shelf list
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;
pub mod library;

// Re-export main types at crate root for convenience
pub use adapters::{CatalogError, CatalogSource, CatalogVolume, GoogleBooksClient};
pub use config::LibraryPaths;
pub use domain::{Book, CoverOutcome, Isbn, LibraryRecord, LookupError};
pub use library::{AddOutcome, Library, ThumbnailStore};
