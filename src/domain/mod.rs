//! Domain types for the book library.
//!
//! This module contains the core data structures:
//! - Isbn: validated 13-character identifier
//! - Book: a single catalog lookup and its derived fields
//! - LibraryRecord: one persisted book plus the shared sort key

pub mod book;
pub mod isbn;
pub mod record;

// Re-export commonly used types
pub use book::{Book, BookDetails, CoverOutcome, LookupError};
pub use isbn::{Isbn, IsbnError, ISBN_LEN};
pub use record::{surname_of, LibraryRecord, SortKey};
