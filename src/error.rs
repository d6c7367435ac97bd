//! Error types for xsd2jsonschema
//!
//! Only a handful of conditions are fatal to a conversion: input that is
//! empty, not UTF-8 or not well-formed XML, input beyond the configured
//! limits, and type graphs nested deeper than the recursion limit. Everything
//! else (unresolved references, unknown types, unparsable facet values)
//! degrades to a less precise fragment and never surfaces here.

use std::fmt;
use thiserror::Error;

/// Result type alias using the crate Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for conversions
#[derive(Error, Debug)]
pub enum Error {
    /// The input was empty or contained only whitespace
    #[error("empty XSD content provided")]
    EmptyInput,

    /// The input is not well-formed XML
    #[error("invalid XML in XSD: {0}")]
    MalformedXml(#[from] ParseError),

    /// The input bytes are not valid UTF-8
    #[error("decoding error: {0}")]
    Decode(String),

    /// Limit exceeded error
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// Type resolution recursed deeper than allowed
    #[error("schema too deep: recursion limit of {limit} reached at '{path}'")]
    SchemaTooDeep {
        /// Element path at which the limit was hit
        path: String,
        /// The configured maximum depth
        limit: usize,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or configuration error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns true if the input itself was rejected before conversion started
    pub fn is_rejected_input(&self) -> bool {
        matches!(
            self,
            Error::EmptyInput | Error::MalformedXml(_) | Error::Decode(_)
        )
    }
}

/// XML well-formedness error
#[derive(Debug, Clone)]
pub struct ParseError {
    /// Error message from the XML reader
    pub message: String,
    /// Location in the input (`line:column`)
    pub location: Option<String>,
}

impl ParseError {
    /// Create a new parse error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
        }
    }

    /// Set the location
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set the location from a byte offset into `text`
    pub fn at_offset(self, text: &str, offset: usize) -> Self {
        let (line, column) = line_column(text, offset);
        self.with_location(format!("{}:{}", line, column))
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(ref loc) = self.location {
            write!(f, " (at {})", loc)?;
        }

        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// 1-based line and column of a byte offset
fn line_column(text: &str, offset: usize) -> (usize, usize) {
    let mut end = offset.min(text.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    let before = &text[..end];
    let line = before.matches('\n').count() + 1;
    let column = match before.rfind('\n') {
        Some(newline) => before[newline + 1..].chars().count() + 1,
        None => before.chars().count() + 1,
    };
    (line, column)
}
