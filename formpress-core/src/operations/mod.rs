//! High-level operations on existing PDF documents.

pub mod flatten;
pub mod inspect;

pub use flatten::{flatten_document, flatten_file};
pub use inspect::{inspect_fields, FormFieldInfo};
