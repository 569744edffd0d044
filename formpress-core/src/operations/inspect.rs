//! Read-only form field inspection for existing documents.

use super::flatten::{collect_widgets, WidgetValue};
use crate::error::Result;
use crate::parser::{FormReader, PdfObject};

/// One form field as found in a document.
#[derive(Debug, Clone, PartialEq)]
pub struct FormFieldInfo {
    /// Field name (/T), possibly inherited
    pub name: Option<String>,
    /// Field type: text, button, choice, signature
    pub kind: Option<String>,
    /// Current value, if the field has been filled
    pub value: Option<String>,
}

/// Lists every widget annotation's field name, type and value.
pub fn inspect_fields(data: &[u8]) -> Result<Vec<FormFieldInfo>> {
    let reader = FormReader::parse(data)?;
    let mut fields = Vec::new();

    for page_id in reader.page_ids()? {
        let Some(page_dict) = reader
            .object(page_id.0, page_id.1)
            .and_then(PdfObject::as_dict)
        else {
            continue;
        };

        for widget in collect_widgets(&reader, page_dict).0 {
            fields.push(FormFieldInfo {
                name: widget.name,
                kind: widget.field_type.as_deref().map(describe_field_type),
                value: match widget.value {
                    Some(WidgetValue::Text(text)) => Some(text),
                    // An Off state means unfilled
                    Some(WidgetValue::State(state)) if state != "Off" => Some(state),
                    _ => None,
                },
            });
        }
    }

    Ok(fields)
}

fn describe_field_type(ft: &str) -> String {
    match ft {
        "Tx" => "text",
        "Btn" => "button",
        "Ch" => "choice",
        "Sig" => "signature",
        other => other,
    }
    .to_string()
}
