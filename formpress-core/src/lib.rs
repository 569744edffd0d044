//! # formpress
//!
//! A form page designer core in pure Rust: compose a single fixed-size
//! page of typed form widgets, emit it as a PDF with real fillable
//! AcroForm fields, and flatten filled documents into locked copies.
//!
//! ## Designing and exporting
//!
//! ```rust
//! use formpress::{emit_pdf, FieldKind, FormDesigner};
//!
//! # fn main() -> formpress::Result<()> {
//! let mut designer = FormDesigner::new();
//! designer.add_field(FieldKind::Label);
//! designer.add_field(FieldKind::Text);
//! let id = designer.add_field(FieldKind::Checkbox).id.clone();
//! designer.move_field(&id, 50.0, 200.0)?;
//!
//! let pdf_bytes = emit_pdf(designer.fields())?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Flattening
//!
//! ```rust,no_run
//! use formpress::operations::flatten_file;
//!
//! # fn main() -> formpress::Result<()> {
//! flatten_file("filled.pdf", "locked.pdf")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`model`] - field records, the kind catalog and page constants
//! - [`designer`] - the field collection and pointer-gesture state machine
//! - [`emitter`] - field collection to PDF conversion
//! - [`operations`] - flattening and inspection of existing documents
//! - [`parser`] - the native PDF reader backing the operations
//! - [`document`], [`page`], [`writer`] - the generation backend

pub mod designer;
pub mod document;
pub mod emitter;
pub mod error;
pub mod forms;
pub mod geometry;
pub mod graphics;
pub mod model;
pub mod objects;
pub mod operations;
pub mod page;
pub mod parser;
pub mod text;
pub mod writer;

// Re-export the designer-to-document pipeline
pub use designer::{FormDesigner, Interaction};
pub use document::Document;
pub use emitter::{emit_document, emit_pdf};
pub use error::{FormError, Result};
pub use geometry::{Point, Rectangle};
pub use model::{Field, FieldKind, MIN_FIELD_SIZE, PAGE_HEIGHT, PAGE_WIDTH};

// Re-export the document-processing side
pub use operations::{flatten_document, flatten_file, inspect_fields, FormFieldInfo};
pub use parser::FormReader;

/// Current version of formpress
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
