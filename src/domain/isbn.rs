//! EAN-13 book identifiers.

use thiserror::Error;

/// Number of characters in an EAN-13 barcode
pub const ISBN_LEN: usize = 13;

/// Errors from parsing an ISBN
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IsbnError {
    #[error("The ISBN provided ({input}) is not EAN-13 ({len} characters)")]
    WrongLength { input: String, len: usize },
}

/// A 13-character ISBN.
///
/// Only the length is checked; the catalog decides whether the number
/// actually names a book.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Isbn(String);

impl Isbn {
    /// Parse an ISBN, rejecting anything that is not exactly 13 characters
    pub fn parse(input: &str) -> Result<Self, IsbnError> {
        let len = input.chars().count();
        if len != ISBN_LEN {
            return Err(IsbnError::WrongLength {
                input: input.to_string(),
                len,
            });
        }
        Ok(Self(input.to_string()))
    }

    /// Get the raw string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Isbn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Isbn {
    type Err = IsbnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_isbn() {
        let isbn = Isbn::parse("9781444720723").unwrap();
        assert_eq!(isbn.as_str(), "9781444720723");
        assert_eq!(isbn.to_string(), "9781444720723");
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert_eq!(
            Isbn::parse("978144472072"),
            Err(IsbnError::WrongLength {
                input: "978144472072".to_string(),
                len: 12
            })
        );
        assert!(Isbn::parse("97814447207230").is_err());
        assert!(Isbn::parse("").is_err());
    }

    #[test]
    fn test_length_is_counted_in_characters() {
        // 13 characters, more than 13 bytes
        assert!(Isbn::parse("ééééééééééééé").is_ok());
    }

    #[test]
    fn test_error_message_names_input() {
        let err = Isbn::parse("123").unwrap_err();
        assert!(err.to_string().contains("(123) is not EAN-13"));
    }
}
