// src/error.rs

//! Unified error handling for the foodscores application.

use std::fmt;

use thiserror::Error;

use crate::models::RecordError;

/// Result type alias for foodscores operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading or writing failed
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// A named input could not be opened or read
    #[error("Cannot read {path}: {source}")]
    ReadInput {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A named input is not well-formed CSV
    #[error("Invalid CSV in {context}: {source}")]
    InvalidCsv {
        context: String,
        #[source]
        source: csv::Error,
    },

    /// A flat field mapping could not be turned into a record
    #[error("Malformed record in {context}: {source}")]
    MalformedRecord {
        context: String,
        #[source]
        source: RecordError,
    },

    /// Scraping the inspection source failed
    #[error("Fetch error for {context}: {message}")]
    SourceFetch { context: String, message: String },

    /// Feed serialization failed
    #[error("Feed error: {0}")]
    Feed(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Attach the input name to an I/O failure.
    pub fn read_input(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::ReadInput {
            path: path.into(),
            source,
        }
    }

    /// Attach input context to a CSV parse failure.
    pub fn invalid_csv(context: impl Into<String>, source: csv::Error) -> Self {
        Self::InvalidCsv {
            context: context.into(),
            source,
        }
    }

    /// Attach input context to a field-level record error.
    pub fn malformed(context: impl Into<String>, source: RecordError) -> Self {
        Self::MalformedRecord {
            context: context.into(),
            source,
        }
    }

    /// Create a fetch error with context.
    pub fn source_fetch(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::SourceFetch {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create a feed serialization error.
    pub fn feed(message: impl fmt::Display) -> Self {
        Self::Feed(message.to_string())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_message_names_input() {
        let err = AppError::malformed("scores.csv: line 4", RecordError::MissingField("name"));
        let message = err.to_string();
        assert!(message.contains("scores.csv: line 4"));
        assert!(message.contains("name"));
    }

    #[test]
    fn test_read_input_message_names_path() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory");
        let err = AppError::read_input("snapshot-2015-06.csv", io);
        assert_eq!(
            err.to_string(),
            "Cannot read snapshot-2015-06.csv: No such file or directory"
        );
    }

    #[test]
    fn test_csv_message_has_single_prefix() {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader("a,b\nc\n".as_bytes());
        let err: AppError = rdr.records().find_map(|r| r.err()).unwrap().into();
        assert!(!err.to_string().starts_with("CSV error: CSV error"));
    }

    #[test]
    fn test_source_fetch_message() {
        let err = AppError::source_fetch("zip 75201 page 2", "no results table");
        assert_eq!(
            err.to_string(),
            "Fetch error for zip 75201 page 2: no results table"
        );
    }
}
