use serde::{Deserialize, Serialize};

/// Logical page width in PDF units (A4 portrait).
pub const PAGE_WIDTH: f64 = 595.0;
/// Logical page height in PDF units (A4 portrait).
pub const PAGE_HEIGHT: f64 = 842.0;
/// Smallest edge a field can be resized to.
pub const MIN_FIELD_SIZE: f64 = 20.0;

/// The nine kinds of placeable form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Single-line text input
    Text,
    /// Multi-line text input
    TextArea,
    /// Toggle box
    Checkbox,
    /// Radio button (its own one-member exclusive group)
    Radio,
    /// Drop-down choice
    Dropdown,
    /// Signature placeholder
    Signature,
    /// Static caption, no widget
    Label,
    /// Bulleted static list, no widget
    #[serde(rename = "ul")]
    BulletList,
    /// Numbered static list, no widget
    #[serde(rename = "ol")]
    NumberList,
}

impl FieldKind {
    /// Whether this kind carries an option list.
    pub fn has_options(&self) -> bool {
        matches!(
            self,
            FieldKind::Dropdown | FieldKind::BulletList | FieldKind::NumberList
        )
    }

    /// Whether emission produces a fillable widget (as opposed to
    /// static page text only).
    pub fn emits_widget(&self) -> bool {
        !matches!(
            self,
            FieldKind::Label | FieldKind::BulletList | FieldKind::NumberList
        )
    }

    /// Whether resize keeps width and height equal.
    pub fn keeps_square(&self) -> bool {
        matches!(self, FieldKind::Checkbox | FieldKind::Radio)
    }

    /// Whether double-click opens the inline editor.
    pub fn inline_editable(&self) -> bool {
        matches!(self, FieldKind::Label) || self.has_options()
    }

    /// Stable lowercase name, used in diagnostics and layout files.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::TextArea => "textarea",
            FieldKind::Checkbox => "checkbox",
            FieldKind::Radio => "radio",
            FieldKind::Dropdown => "dropdown",
            FieldKind::Signature => "signature",
            FieldKind::Label => "label",
            FieldKind::BulletList => "ul",
            FieldKind::NumberList => "ol",
        }
    }

    /// All kinds, in toolbox order.
    pub fn all() -> [FieldKind; 9] {
        [
            FieldKind::Text,
            FieldKind::TextArea,
            FieldKind::Checkbox,
            FieldKind::Radio,
            FieldKind::Dropdown,
            FieldKind::Signature,
            FieldKind::Label,
            FieldKind::BulletList,
            FieldKind::NumberList,
        ]
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One placed widget: identity, kind, geometry and content.
///
/// Coordinates are designer-space: origin top-left, the same space the
/// visual canvas uses. The emitter converts to PDF space on the way out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Opaque unique identifier, assigned at creation, never reused.
    pub id: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    /// Display text; authoritative content only for `Label` fields.
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Option lines; `Some` only for option-bearing kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl Field {
    /// Option list to emit for this field: its own options, or the
    /// kind's defaults when the list is absent or empty.
    pub fn effective_options(&self) -> Vec<String> {
        match &self.options {
            Some(opts) if !opts.is_empty() => opts.clone(),
            _ => self
                .kind
                .defaults()
                .options
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}
