//! Book library storage.
//!
//! The library is a flat-file database plus two derived artifacts that a
//! static site serves directly.
//!
//! # Storage Layout
//!
//! ```text
//! <root>/
//! ├── library.csv                     # author#title#isbn, sorted by surname
//! ├── templates/
//! │   └── book_thumbnails.html        # one <a><img/></a> line per book
//! └── static/
//!     ├── images/unknownCover.jpg     # placeholder cover
//!     └── thumbnails/
//!         └── <surname>_<isbn>.jpeg
//! ```

pub mod collection;
pub mod database;
pub mod snippet;
pub mod thumbnails;

pub use collection::{AddOutcome, Library, EMPTY_MESSAGE};
pub use snippet::SnippetEntry;
pub use thumbnails::{write_atomic, ThumbnailStore};
