use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not a well-formed PDF document: {0}")]
    DocumentFormat(String),

    #[error("Document emission failed: {0}")]
    Emit(String),

    #[error("Flatten failed: {0}")]
    Flatten(String),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Field {id} does not support {operation}")]
    UnsupportedFieldOperation { id: String, operation: &'static str },

    #[error("Encoding error: {0}")]
    EncodingError(String),
}

pub type Result<T> = std::result::Result<T, FormError>;
