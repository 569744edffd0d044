//! Native PDF parser, trimmed to what the flattener needs: object
//! syntax, the classic cross-reference table, and a lenient full-scan
//! recovery path for documents whose xref machinery we do not decode.

pub mod lexer;
pub mod objects;
pub mod reader;

use crate::error::FormError;

pub use self::objects::{PdfArray, PdfDictionary, PdfName, PdfObject, PdfStream, PdfString};
pub use self::reader::FormReader;

/// Result type for parser operations
pub type ParseResult<T> = Result<T, ParseError>;

/// PDF parser errors
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid PDF header")]
    InvalidHeader,

    #[error("Syntax error at position {position}: {message}")]
    SyntaxError { position: usize, message: String },

    #[error("Unexpected token: expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },

    #[error("Missing required key: {0}")]
    MissingKey(String),

    #[error("Invalid xref table")]
    InvalidXRef,

    #[error("Invalid trailer")]
    InvalidTrailer,

    #[error("Circular reference detected")]
    CircularReference,

    #[error("Stream decode error: {0}")]
    StreamDecodeError(String),
}

impl From<ParseError> for FormError {
    fn from(err: ParseError) -> Self {
        FormError::DocumentFormat(err.to_string())
    }
}
