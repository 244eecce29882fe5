//! Canonical file layout of a library.
//!
//! Single source of truth - use this instead of hardcoding paths.
//!
//! ## Layout
//!
//! | Location | Purpose |
//! |----------|---------|
//! | `library.csv` | `author#title#isbn` rows, sorted by surname |
//! | `templates/book_thumbnails.html` | One `<a><img/></a>` line per book |
//! | `static/thumbnails/` | `{surname}_{isbn}.jpeg` covers |
//! | `static/images/unknownCover.jpg` | Placeholder cover |

use std::path::{Path, PathBuf};

use crate::library::ThumbnailStore;

pub const DATABASE_FILE: &str = "library.csv";
pub const SNIPPET_FILE: &str = "templates/book_thumbnails.html";
pub const THUMBNAILS_DIR: &str = "static/thumbnails";
pub const PLACEHOLDER_IMAGE: &str = "static/images/unknownCover.jpg";

/// Resolved absolute (or root-relative) locations of library files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryPaths {
    /// Library root directory
    pub root: PathBuf,
    /// Flat-file database
    pub database: PathBuf,
    /// HTML snippet
    pub snippet: PathBuf,
    /// Thumbnail directory
    pub thumbnails: PathBuf,
    /// Placeholder cover image
    pub placeholder: PathBuf,
}

impl LibraryPaths {
    /// Default layout under `root`
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            root: root.to_path_buf(),
            database: root.join(DATABASE_FILE),
            snippet: root.join(SNIPPET_FILE),
            thumbnails: root.join(THUMBNAILS_DIR),
            placeholder: root.join(PLACEHOLDER_IMAGE),
        }
    }

    pub fn thumbnail_store(&self) -> ThumbnailStore {
        ThumbnailStore::new(&self.thumbnails, &self.placeholder)
    }
}
