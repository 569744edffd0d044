//! Turns an ordered field collection into a single-page PDF with real
//! fillable widgets.
//!
//! The collection order has no effect on geometry; every field is
//! placed independently through the same top-left to bottom-left
//! conversion. Fields that fail the bounds check are skipped and
//! logged, never aborting the batch.

use crate::document::Document;
use crate::error::{FormError, Result};
use crate::forms::{
    create_checkbox_dict, create_combo_dict, create_radio_dict, create_text_field_dict,
    sanitize_field_name,
};
use crate::geometry::Rectangle;
use crate::graphics::Color;
use crate::model::{Field, FieldKind, PAGE_HEIGHT, PAGE_WIDTH};
use crate::page::Page;
use crate::text::Font;
use tracing::{debug, warn};

/// Prompt shown inside an unfilled signature box.
const SIGNATURE_PROMPT: &str = "Sign here";
/// Line step for the static list kinds.
const LIST_LEADING: f64 = 14.0;
/// Baseline inset from the top of a label box.
const LABEL_BASELINE_INSET: f64 = 10.0;

/// Builds the output document for a field collection.
///
/// Out-of-bounds or degenerate fields are omitted with a warning; any
/// construction error aborts the whole emission.
pub fn emit_document(fields: &[Field]) -> Result<Document> {
    let mut page = Page::a4();
    let mut emitted = 0usize;

    for field in fields {
        let Some(rect) = validated_rect(field) else {
            continue;
        };
        emit_field(&mut page, field, rect);
        emitted += 1;
    }

    stamp_footer(&mut page);
    debug!(emitted, skipped = fields.len() - emitted, "page assembled");

    let mut document = Document::new();
    document.set_title("Form");
    document.add_page(page);
    Ok(document)
}

/// Emits a field collection straight to PDF bytes.
pub fn emit_pdf(fields: &[Field]) -> Result<Vec<u8>> {
    let document = emit_document(fields)?;
    document
        .to_bytes()
        .map_err(|e| FormError::Emit(e.to_string()))
}

/// Converts to page space and applies the bounds check. `None` means
/// the field is skipped.
fn validated_rect(field: &Field) -> Option<Rectangle> {
    if field.width <= 0.0 || field.height <= 0.0 {
        warn!(id = %field.id, "skipping field with degenerate size");
        return None;
    }

    let rect = Rectangle::from_top_left(field.x, field.y, field.width, field.height, PAGE_HEIGHT);

    // Edges exactly on the page boundary are kept.
    if field.x < 0.0
        || field.x + field.width > PAGE_WIDTH
        || rect.lower_left.y < 0.0
        || rect.upper_right.y > PAGE_HEIGHT
    {
        warn!(
            id = %field.id,
            x = field.x,
            y = field.y,
            width = field.width,
            height = field.height,
            "skipping field outside the page"
        );
        return None;
    }

    Some(rect)
}

fn emit_field(page: &mut Page, field: &Field, rect: Rectangle) {
    match field.kind {
        FieldKind::Label => {
            page.text()
                .set_font(Font::Helvetica, 12.0)
                .at(
                    rect.lower_left.x,
                    rect.lower_left.y + rect.height() - LABEL_BASELINE_INSET,
                )
                .write(&field.label);
        }
        FieldKind::BulletList => {
            emit_list(page, &rect, &field.effective_options(), |_| {
                "\u{2022} ".to_string()
            });
        }
        FieldKind::NumberList => {
            emit_list(page, &rect, &field.effective_options(), |i| {
                format!("{}. ", i + 1)
            });
        }
        FieldKind::Text => {
            let name = sanitize_field_name(&field.id);
            page.add_widget(create_text_field_dict(&name, rect, false, None));
        }
        FieldKind::TextArea => {
            let name = sanitize_field_name(&field.id);
            page.add_widget(create_text_field_dict(&name, rect, true, None));
        }
        FieldKind::Checkbox => {
            let name = sanitize_field_name(&field.id);
            page.add_widget(create_checkbox_dict(&name, rect));
        }
        FieldKind::Radio => {
            let name = sanitize_field_name(&field.id);
            page.add_widget(create_radio_dict(&name, rect));
        }
        FieldKind::Dropdown => {
            let name = sanitize_field_name(&field.id);
            page.add_widget(create_combo_dict(&name, rect, &field.effective_options()));
        }
        FieldKind::Signature => {
            let name = sanitize_field_name(&field.id);
            page.add_widget(create_text_field_dict(
                &name,
                rect,
                true,
                Some(SIGNATURE_PROMPT),
            ));
            // No native signature-capture widget exists; a faint frame
            // marks the area as a visual cue.
            page.graphics()
                .set_stroke_color(Color::gray(0.7))
                .set_line_width(0.75)
                .rect(
                    rect.lower_left.x,
                    rect.lower_left.y,
                    rect.width(),
                    rect.height(),
                )
                .stroke();
        }
    }
}

/// Static text lines stacked downward from the top of the box.
fn emit_list(
    page: &mut Page,
    rect: &Rectangle,
    options: &[String],
    prefix: impl Fn(usize) -> String,
) {
    for (i, option) in options.iter().enumerate() {
        let baseline = rect.upper_right.y - 12.0 - (i as f64) * LIST_LEADING;
        page.text()
            .set_font(Font::Helvetica, 11.0)
            .at(rect.lower_left.x, baseline)
            .write(&format!("{}{}", prefix(i), option));
    }
}

/// Cosmetic footer near the bottom margin.
fn stamp_footer(page: &mut Page) {
    page.text()
        .set_font(Font::HelveticaOblique, 7.0)
        .at(50.0, 20.0)
        .write("Generated with formpress");
}
