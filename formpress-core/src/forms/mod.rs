//! Interactive form support: widget annotation dictionaries and the
//! document-level AcroForm, ISO 32000-1 Chapter 12.7.

mod widgets;

pub use widgets::{
    create_checkbox_dict, create_combo_dict, create_radio_dict, create_text_field_dict, AcroForm,
};

/// Restrict a field id to the characters PDF field names tolerate.
///
/// Everything outside `[A-Za-z0-9._-]` becomes `_`.
pub fn sanitize_field_name(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
