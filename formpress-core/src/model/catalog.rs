//! Per-kind creation defaults.
//!
//! A freshly added field must be visible and usable without manual
//! sizing, so every kind ships a plausible size, a prompt label and,
//! for option-bearing kinds, a placeholder option list.

use super::FieldKind;

/// Creation-time defaults for one field kind.
#[derive(Debug, Clone, Copy)]
pub struct FieldDefaults {
    pub width: f64,
    pub height: f64,
    pub label: &'static str,
    pub options: &'static [&'static str],
}

impl FieldKind {
    /// The static defaults table for this kind.
    pub fn defaults(&self) -> FieldDefaults {
        match self {
            FieldKind::Text => FieldDefaults {
                width: 200.0,
                height: 30.0,
                label: "Text input",
                options: &[],
            },
            FieldKind::TextArea => FieldDefaults {
                width: 250.0,
                height: 80.0,
                label: "Multi-line text",
                options: &[],
            },
            FieldKind::Checkbox => FieldDefaults {
                width: 20.0,
                height: 20.0,
                label: "Checkbox",
                options: &[],
            },
            FieldKind::Radio => FieldDefaults {
                width: 20.0,
                height: 20.0,
                label: "Radio button",
                options: &[],
            },
            FieldKind::Dropdown => FieldDefaults {
                width: 180.0,
                height: 30.0,
                label: "Dropdown",
                options: &["Option 1", "Option 2", "Option 3"],
            },
            FieldKind::Signature => FieldDefaults {
                width: 220.0,
                height: 70.0,
                label: "Signature",
                options: &[],
            },
            FieldKind::Label => FieldDefaults {
                width: 160.0,
                height: 24.0,
                label: "Label text",
                options: &[],
            },
            FieldKind::BulletList => FieldDefaults {
                width: 180.0,
                height: 70.0,
                label: "Bulleted list",
                options: &["First item", "Second item"],
            },
            FieldKind::NumberList => FieldDefaults {
                width: 180.0,
                height: 70.0,
                label: "Numbered list",
                options: &["First item", "Second item"],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MIN_FIELD_SIZE;

    #[test]
    fn test_defaults_are_valid_geometry() {
        for kind in FieldKind::all() {
            let d = kind.defaults();
            assert!(d.width >= MIN_FIELD_SIZE, "{kind} default width too small");
            assert!(d.height >= MIN_FIELD_SIZE, "{kind} default height too small");
            assert!(!d.label.is_empty());
        }
    }

    #[test]
    fn test_square_kinds_start_square() {
        for kind in [FieldKind::Checkbox, FieldKind::Radio] {
            let d = kind.defaults();
            assert_eq!(d.width, d.height);
        }
    }

    #[test]
    fn test_option_kinds_have_placeholders() {
        for kind in FieldKind::all() {
            let d = kind.defaults();
            assert_eq!(kind.has_options(), !d.options.is_empty());
        }
        assert_eq!(FieldKind::Dropdown.defaults().options.len(), 3);
    }
}
