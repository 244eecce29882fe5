//! Library records and the naming conventions derived from them.
//!
//! The surname, thumbnail filename and HTML fragment are computed here and
//! nowhere else, so the database file and the HTML snippet always sort and
//! link the same way.

use super::isbn::Isbn;

/// Extension used for every stored thumbnail
pub const THUMBNAIL_EXT: &str = "jpeg";

/// Public URL prefix of the thumbnails directory
pub const THUMBNAIL_URL_PREFIX: &str = "/static/thumbnails/";

/// Extract the surname from an author's full name.
///
/// Takes the second whitespace-separated token (the first one if the name
/// is a single word) and strips apostrophes, path separators and control
/// characters, so the result is usable inside a file name.
pub fn surname_of(author: &str) -> String {
    let mut tokens = author.split_whitespace();
    let first = tokens.next().unwrap_or_default();
    file_safe(tokens.next().unwrap_or(first))
}

fn file_safe(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '\'' | '/' | '\\') && !c.is_control())
        .collect()
}

/// `{surname}_{isbn}.jpeg`, always a single path component
pub fn thumbnail_file_name(surname: &str, isbn: &Isbn) -> String {
    format!(
        "{}_{}.{}",
        file_safe(surname),
        file_safe(isbn.as_str()),
        THUMBNAIL_EXT
    )
}

/// Anchor + image markup for one book in the snippet file
pub fn html_fragment(isbn: &Isbn, thumbnail_file: &str) -> String {
    format!(
        "<a href='book/{}'><img src='{}{}'/></a>",
        escape_attr(isbn.as_str()),
        THUMBNAIL_URL_PREFIX,
        escape_attr(thumbnail_file)
    )
}

/// Escape text for a quoted HTML attribute value
pub fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Inverse of [`escape_attr`]
pub fn unescape_attr(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Ordering key shared by both output files
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SortKey {
    pub surname: String,
    pub author: String,
    pub title: String,
}

/// One book as persisted in the library database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryRecord {
    /// Author's full name (first listed author only)
    pub author: String,

    /// Book title
    pub title: String,

    /// ISBN, absent for rows written before ISBNs were stored
    pub isbn: Option<Isbn>,
}

impl LibraryRecord {
    pub fn new(author: impl Into<String>, title: impl Into<String>, isbn: Option<Isbn>) -> Self {
        Self {
            author: author.into(),
            title: title.into(),
            isbn,
        }
    }

    pub fn surname(&self) -> String {
        surname_of(&self.author)
    }

    pub fn sort_key(&self) -> SortKey {
        SortKey {
            surname: self.surname(),
            author: self.author.clone(),
            title: self.title.clone(),
        }
    }

    /// Thumbnail filename, if the ISBN is known
    pub fn thumbnail_file(&self) -> Option<String> {
        self.isbn
            .as_ref()
            .map(|isbn| thumbnail_file_name(&self.surname(), isbn))
    }

    /// Snippet line for this record, if the ISBN is known
    pub fn html_fragment(&self) -> Option<String> {
        let isbn = self.isbn.as_ref()?;
        Some(html_fragment(isbn, &thumbnail_file_name(&self.surname(), isbn)))
    }
}
