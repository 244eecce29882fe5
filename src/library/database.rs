//! Flat-file library database.
//!
//! One book per line, fields separated by `#`:
//!
//! ```text
//! Stephen King#The Shining#9781444720723
//! Jane Austen#Emma
//! ```
//!
//! The ISBN column is optional so that two-column files keep loading.
//! Fields containing `#` or quotes are quoted on write.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;

use crate::domain::{Isbn, LibraryRecord};

/// Field separator
pub const SEPARATOR: u8 = b'#';

/// Parse database contents into records, in file order.
///
/// Blank lines and rows without an author are skipped.
pub fn parse(content: &str) -> Result<Vec<LibraryRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(SEPARATOR)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = Vec::new();
    for (line, row) in reader.records().enumerate() {
        let row = row.with_context(|| format!("Malformed library row {}", line + 1))?;

        let author = row.get(0).unwrap_or_default().trim();
        if author.is_empty() {
            continue;
        }
        let title = row.get(1).unwrap_or_default().trim();
        let isbn = match row.get(2).map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => match Isbn::parse(raw) {
                Ok(isbn) => Some(isbn),
                Err(e) => {
                    warn!(row = line + 1, "Ignoring stored ISBN: {}", e);
                    None
                }
            },
            None => None,
        };

        records.push(LibraryRecord::new(author, title, isbn));
    }

    Ok(records)
}

/// Serialize records, one line each
pub fn render(records: &[LibraryRecord]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(SEPARATOR)
        .has_headers(false)
        .flexible(true)
        .from_writer(Vec::new());

    for record in records {
        match &record.isbn {
            Some(isbn) => writer.write_record([
                record.author.as_str(),
                record.title.as_str(),
                isbn.as_str(),
            ])?,
            None => writer.write_record([record.author.as_str(), record.title.as_str()])?,
        }
    }

    let bytes = writer.into_inner().context("Failed to flush library rows")?;
    String::from_utf8(bytes).context("Library rows are not valid UTF-8")
}

/// Read the database file; a missing file is an empty library
pub async fn read(path: &Path) -> Result<Vec<LibraryRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read library database: {}", path.display()))?;

    parse(&content).with_context(|| format!("Failed to parse library database: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn isbn(s: &str) -> Isbn {
        Isbn::parse(s).unwrap()
    }

    #[test]
    fn test_parse_two_and_three_columns() {
        let content = "Stephen King#The Shining#9781444720723\nJane Austen#Emma\n\n";
        let records = parse(content).unwrap();

        assert_eq!(
            records,
            vec![
                LibraryRecord::new("Stephen King", "The Shining", Some(isbn("9781444720723"))),
                LibraryRecord::new("Jane Austen", "Emma", None),
            ]
        );
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("\n\n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_drops_bad_isbn() {
        let records = parse("Stephen King#The Shining#12345\n").unwrap();
        assert_eq!(records[0].isbn, None);
        assert_eq!(records[0].title, "The Shining");
    }

    #[test]
    fn test_render_plain_rows() {
        let records = vec![
            LibraryRecord::new("Stephen King", "The Shining", Some(isbn("9781444720723"))),
            LibraryRecord::new("Jane Austen", "Emma", None),
        ];

        assert_eq!(
            render(&records).unwrap(),
            "Stephen King#The Shining#9781444720723\nJane Austen#Emma\n"
        );
    }

    #[test]
    fn test_separator_inside_title_survives() {
        let records = vec![LibraryRecord::new(
            "Some Author",
            "C# in Depth",
            Some(isbn("9781617294532")),
        )];

        let content = render(&records).unwrap();
        assert_eq!(content, "Some Author#\"C# in Depth\"#9781617294532\n");
        assert_eq!(parse(&content).unwrap(), records);
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let records = read(&temp.path().join("library.csv")).await.unwrap();
        assert!(records.is_empty());
    }
}
