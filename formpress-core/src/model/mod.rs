//! The field model: one record per placed widget, plus the per-kind
//! defaults catalog.

mod catalog;
mod field;

pub use catalog::FieldDefaults;
pub use field::{Field, FieldKind, MIN_FIELD_SIZE, PAGE_HEIGHT, PAGE_WIDTH};
