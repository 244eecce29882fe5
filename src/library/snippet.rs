//! Static HTML snippet listing every book's thumbnail.
//!
//! The snippet is derived output: it is regenerated from the library
//! records on every change, one line per record that has an ISBN. Lines
//! that match no record are carried forward unchanged at their surname's
//! position.

use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::record::{unescape_attr, THUMBNAIL_URL_PREFIX};
use crate::domain::{Isbn, LibraryRecord, SortKey};

/// A thumbnail line read back from an existing snippet file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetEntry {
    /// Surname part of the thumbnail filename
    pub surname: String,
    pub isbn: Isbn,
    /// The line as found in the file, without surrounding whitespace
    pub line: String,
}

impl SnippetEntry {
    /// Parse one line of an existing snippet
    pub fn parse(line: &str) -> Option<Self> {
        let (surname, isbn) = parse_line(line)?;
        Some(Self {
            surname,
            isbn,
            line: line.trim().to_string(),
        })
    }

    /// Sorts with records of the same surname, ahead of them
    pub fn sort_key(&self) -> SortKey {
        SortKey {
            surname: self.surname.clone(),
            author: String::new(),
            title: String::new(),
        }
    }
}

/// Render snippet content for records plus carried-over lines.
///
/// `records` must already be in sort order.
pub fn render(records: &[LibraryRecord], orphans: &[SnippetEntry]) -> String {
    let mut lines: Vec<(SortKey, String)> = records
        .iter()
        .filter_map(|r| Some((r.sort_key(), r.html_fragment()?)))
        .collect();
    lines.extend(orphans.iter().map(|e| (e.sort_key(), e.line.clone())));
    lines.sort_by(|a, b| a.0.cmp(&b.0));

    lines.into_iter().map(|(_, line)| line + "\n").collect()
}

/// Extract `(surname, isbn)` from a snippet line via its thumbnail filename.
///
/// Understands both the current markup and older lines such as
/// `<a href = 'book/…'><img src='/static/thumbnails/King_9781444720723.jpeg'/>`.
pub fn parse_line(line: &str) -> Option<(String, Isbn)> {
    let marker = THUMBNAIL_URL_PREFIX.trim_start_matches('/');
    let start = line.find(marker)? + marker.len();
    let rest = &line[start..];
    let end = rest.find(|c: char| c == '\'' || c == '"').unwrap_or(rest.len());
    let file = unescape_attr(&rest[..end]);

    let stem = file.rsplit_once('.').map_or(file.as_str(), |(stem, _ext)| stem);
    let (surname, isbn) = stem.rsplit_once('_')?;
    Some((surname.to_string(), Isbn::parse(isbn).ok()?))
}

/// Read the thumbnail lines of an existing snippet file, in file order
pub async fn read_entries(path: &Path) -> Result<Vec<SnippetEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read HTML snippet: {}", path.display()))?;

    Ok(content.lines().filter_map(SnippetEntry::parse).collect())
}

/// Fill in missing ISBNs from snippet entries with the same surname.
///
/// Entries are consumed in order, so two records by the same author pick up
/// the snippet's lines in the order they appear. Returns the entries whose
/// ISBN belongs to no record.
pub fn backfill_isbns(records: &mut [LibraryRecord], entries: Vec<SnippetEntry>) -> Vec<SnippetEntry> {
    let mut unused: Vec<SnippetEntry> = entries
        .into_iter()
        .filter(|e| !records.iter().any(|r| r.isbn.as_ref() == Some(&e.isbn)))
        .collect();

    for record in records.iter_mut().filter(|r| r.isbn.is_none()) {
        let surname = record.surname();
        if let Some(pos) = unused.iter().position(|e| e.surname == surname) {
            record.isbn = Some(unused.remove(pos).isbn);
        }
    }

    unused
}

#[cfg(test)]
mod tests {
    use super::*;

    fn isbn(s: &str) -> Isbn {
        Isbn::parse(s).unwrap()
    }

    fn entry(line: &str) -> SnippetEntry {
        SnippetEntry::parse(line).unwrap()
    }

    #[test]
    fn test_render_skips_records_without_isbn() {
        let records = vec![
            LibraryRecord::new("Jane Austen", "Emma", None),
            LibraryRecord::new("Stephen King", "The Shining", Some(isbn("9781444720723"))),
        ];

        assert_eq!(
            render(&records, &[]),
            "<a href='book/9781444720723'><img src='/static/thumbnails/King_9781444720723.jpeg'/></a>\n"
        );
    }

    #[test]
    fn test_render_keeps_orphans_in_surname_order() {
        let records = vec![
            LibraryRecord::new("Jane Austen", "Emma", Some(isbn("9780141439587"))),
            LibraryRecord::new("Stephen King", "The Shining", Some(isbn("9781444720723"))),
        ];
        let orphans = vec![
            entry("  <a href = 'book/9780349107806'><img src='/static/thumbnails/Banks_9780349107806.jpeg'/>"),
            entry("<a href = 'book/9780000000001'><img src='/static/thumbnails/_9780000000001.jpeg'/>"),
        ];

        let html = render(&records, &orphans);
        let lines: Vec<&str> = html.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("/_9780000000001.jpeg"));
        assert!(lines[1].contains("Austen_9780141439587"));
        assert_eq!(
            lines[2],
            "<a href = 'book/9780349107806'><img src='/static/thumbnails/Banks_9780349107806.jpeg'/>"
        );
        assert!(lines[3].contains("King_9781444720723"));
    }

    #[test]
    fn test_parse_rendered_line() {
        let record = LibraryRecord::new("Stephen King", "The Shining", Some(isbn("9781444720723")));
        let line = record.html_fragment().unwrap();

        assert_eq!(
            parse_line(&line),
            Some(("King".to_string(), isbn("9781444720723")))
        );
    }

    #[test]
    fn test_parse_escaped_line() {
        let record = LibraryRecord::new("Ann <b>&\"Q\"", "Markup", Some(isbn("9781444720723")));
        let line = record.html_fragment().unwrap();

        assert_eq!(
            parse_line(&line),
            Some((record.surname(), isbn("9781444720723")))
        );
    }

    #[test]
    fn test_parse_legacy_line() {
        let line = "<a href = 'book/9780141439518'><img src='/static/thumbnails/Austen_9780141439518.jpeg'/>";
        assert_eq!(
            parse_line(line),
            Some(("Austen".to_string(), isbn("9780141439518")))
        );
    }

    #[test]
    fn test_parse_unrelated_line() {
        assert_eq!(parse_line("<p>hello</p>"), None);
        assert_eq!(parse_line("<img src='/static/thumbnails/broken.jpeg'/>"), None);
        assert!(SnippetEntry::parse("<p>hello</p>").is_none());
    }

    #[test]
    fn test_backfill_by_surname_in_order() {
        let mut records = vec![
            LibraryRecord::new("Jane Austen", "Emma", None),
            LibraryRecord::new("Jane Austen", "Persuasion", None),
            LibraryRecord::new("Stephen King", "The Shining", Some(isbn("9781444720723"))),
            LibraryRecord::new("Nobody Known", "Mystery", None),
        ];
        let entries = vec![
            entry("<img src='/static/thumbnails/King_9781444720723.jpeg'/>"),
            entry("<img src='/static/thumbnails/Austen_9780141439587.jpeg'/>"),
            entry("<img src='/static/thumbnails/Austen_9780141439686.jpeg'/>"),
            entry("<img src='/static/thumbnails/_9780349107806.jpeg'/>"),
        ];

        let orphans = backfill_isbns(&mut records, entries);
        assert_eq!(records[0].isbn, Some(isbn("9780141439587")));
        assert_eq!(records[1].isbn, Some(isbn("9780141439686")));
        assert_eq!(records[3].isbn, None);

        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].surname, "");
        assert_eq!(orphans[0].isbn, isbn("9780349107806"));
    }
}
