//! Flattening: bake widget values into static page content and strip
//! all interactivity. Irreversible by design.
//!
//! The input only has to be a parseable PDF with widget annotations;
//! it does not need to come from this crate's emitter.

use crate::error::{FormError, Result};
use crate::parser::{FormReader, PdfArray, PdfDictionary, PdfName, PdfObject, PdfString};
use crate::text::{encode_win_ansi, push_literal_string};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::Path;
use tracing::debug;

const OVERLAY_FONT_SIZE: f64 = 10.0;
const OVERLAY_LEADING: f64 = 12.0;
const MAX_PARENT_DEPTH: usize = 16;

/// One widget annotation found on a page, with its inherited field
/// properties already resolved.
pub(crate) struct WidgetRecord {
    /// Indirect id of the annotation, when it was a reference
    pub object_id: Option<(u32, u16)>,
    /// [llx, lly, urx, ury]
    pub rect: Option<[f64; 4]>,
    pub name: Option<String>,
    pub field_type: Option<String>,
    pub value: Option<WidgetValue>,
    pub multiline: bool,
}

/// A field's current value: text (string) or an appearance state name.
pub(crate) enum WidgetValue {
    Text(String),
    State(String),
}

/// Flattens a filled (or blank) form document into a locked copy.
///
/// Every widget's current value becomes static page content; all
/// widget annotations and the AcroForm entry are removed. Fails with
/// [`FormError::DocumentFormat`] when the input does not parse; no
/// partial output is ever produced.
pub fn flatten_document(data: &[u8]) -> Result<Vec<u8>> {
    let reader = FormReader::parse(data)?;
    let page_ids = reader.page_ids()?;
    if page_ids.is_empty() {
        return Err(FormError::DocumentFormat("document has no pages".to_string()));
    }

    // First pass, read-only: what to draw and what to strip, per page.
    let mut edits = Vec::new();
    let mut total_widgets = 0usize;

    for page_id in page_ids {
        let Some(page_dict) = reader
            .object(page_id.0, page_id.1)
            .and_then(PdfObject::as_dict)
        else {
            continue;
        };

        let (widgets, kept_annots) = collect_widgets(&reader, page_dict);
        total_widgets += widgets.len();

        let overlay = build_overlay(&widgets);
        edits.push(PageEdit {
            page_id,
            overlay,
            base_contents: resolve_contents(&reader, page_dict),
            kept_annots,
            widget_ids: widgets.iter().filter_map(|w| w.object_id).collect(),
        });
    }

    debug!(widgets = total_widgets, pages = edits.len(), "flattening");

    // Second pass: rewrite the object set.
    let (mut objects, mut trailer) = reader.into_parts();
    let mut next_number = objects.keys().map(|(n, _)| *n).max().unwrap_or(0) + 1;

    for edit in edits {
        apply_page_edit(&mut objects, &edit, &mut next_number)?;
        for id in edit.widget_ids {
            objects.remove(&id);
        }
    }

    remove_acro_form(&mut objects, &trailer);

    // The rewrite is a single complete file
    trailer.remove("Prev");
    trailer.remove("XRefStm");

    serialize_document(&objects, &trailer)
}

/// Flattens a PDF file on disk.
pub fn flatten_file(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<()> {
    let data = std::fs::read(input)?;
    let flattened = flatten_document(&data)?;
    std::fs::write(output, flattened)?;
    Ok(())
}

struct PageEdit {
    page_id: (u32, u16),
    overlay: Option<Vec<u8>>,
    /// Existing content streams as an array of stream references
    base_contents: PdfArray,
    kept_annots: Vec<PdfObject>,
    widget_ids: Vec<(u32, u16)>,
}

/// Normalizes a page's Contents entry to an array of stream
/// references, following one level of indirection if the entry itself
/// points at an array.
fn resolve_contents(reader: &FormReader, page_dict: &PdfDictionary) -> PdfArray {
    let Some(entry) = page_dict.get("Contents") else {
        return PdfArray::new();
    };
    match reader.resolve(entry) {
        PdfObject::Array(array) => array.clone(),
        _ => PdfArray(vec![entry.clone()]),
    }
}

/// Splits a page's annotations into widgets (with resolved field data)
/// and everything else (kept verbatim).
pub(crate) fn collect_widgets(
    reader: &FormReader,
    page_dict: &PdfDictionary,
) -> (Vec<WidgetRecord>, Vec<PdfObject>) {
    let mut widgets = Vec::new();
    let mut kept = Vec::new();

    let Some(annots) = page_dict.get("Annots").map(|a| reader.resolve(a)) else {
        return (widgets, kept);
    };
    let Some(annots) = annots.as_array() else {
        return (widgets, kept);
    };

    for entry in annots.iter() {
        let resolved = reader.resolve(entry);
        let Some(dict) = resolved.as_dict() else {
            kept.push(entry.clone());
            continue;
        };

        let is_widget = dict
            .get("Subtype")
            .and_then(PdfObject::as_name)
            .map(|n| n.as_str() == "Widget")
            .unwrap_or(false);
        if !is_widget {
            kept.push(entry.clone());
            continue;
        }

        let flags = inherited(reader, dict, "Ff")
            .and_then(PdfObject::as_integer)
            .unwrap_or(0);

        widgets.push(WidgetRecord {
            object_id: entry.as_reference(),
            rect: read_rect(reader, dict),
            name: inherited(reader, dict, "T")
                .and_then(PdfObject::as_string)
                .map(PdfString::to_text),
            field_type: inherited(reader, dict, "FT")
                .and_then(PdfObject::as_name)
                .map(|n| n.as_str().to_string()),
            value: match inherited(reader, dict, "V") {
                Some(PdfObject::String(s)) => Some(WidgetValue::Text(s.to_text())),
                Some(PdfObject::Name(n)) => Some(WidgetValue::State(n.as_str().to_string())),
                _ => None,
            },
            multiline: flags & (1 << 12) != 0,
        });
    }

    (widgets, kept)
}

/// Look a key up on the annotation itself, then up the Parent chain.
pub(crate) fn inherited<'a>(
    reader: &'a FormReader,
    dict: &'a PdfDictionary,
    key: &str,
) -> Option<&'a PdfObject> {
    let mut current = dict;
    for _ in 0..MAX_PARENT_DEPTH {
        if let Some(value) = current.get(key) {
            return Some(reader.resolve(value));
        }
        current = reader
            .resolve(current.get("Parent")?)
            .as_dict()?;
    }
    None
}

fn read_rect(reader: &FormReader, dict: &PdfDictionary) -> Option<[f64; 4]> {
    let rect = reader.resolve(dict.get("Rect")?).as_array()?;
    let mut out = [0.0; 4];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = reader.resolve(rect.get(i)?).as_real()?;
    }
    Some(out)
}

/// Content-stream operations rendering every widget's value.
fn build_overlay(widgets: &[WidgetRecord]) -> Option<Vec<u8>> {
    let mut ops = String::new();

    for widget in widgets {
        let Some([llx, lly, urx, ury]) = widget.rect else {
            continue;
        };

        match (widget.field_type.as_deref(), &widget.value) {
            (Some("Btn"), Some(WidgetValue::State(state))) if state != "Off" => {
                let x = (llx + urx) / 2.0 - 3.0;
                let y = (lly + ury) / 2.0 - 4.0;
                push_text_run(&mut ops, x, y, "X");
            }
            (Some("Tx"), Some(WidgetValue::Text(text))) | (Some("Ch"), Some(WidgetValue::Text(text)))
                if !text.is_empty() =>
            {
                if widget.multiline {
                    for (i, line) in text.split('\n').enumerate() {
                        let line = line.trim_end_matches('\r');
                        let baseline = ury - OVERLAY_LEADING - i as f64 * OVERLAY_LEADING;
                        if baseline < lly {
                            break;
                        }
                        push_text_run(&mut ops, llx + 2.0, baseline, line);
                    }
                } else {
                    let baseline = lly + (ury - lly) / 2.0 - OVERLAY_FONT_SIZE / 2.0 + 1.0;
                    push_text_run(&mut ops, llx + 2.0, baseline, text);
                }
            }
            _ => {}
        }
    }

    if ops.is_empty() {
        return None;
    }
    Some(format!("q\n{ops}Q\n").into_bytes())
}

fn push_text_run(ops: &mut String, x: f64, y: f64, text: &str) {
    ops.push_str("BT\n");
    writeln!(ops, "/Helv {OVERLAY_FONT_SIZE} Tf").unwrap();
    writeln!(ops, "{x:.2} {y:.2} Td").unwrap();
    push_literal_string(ops, &encode_win_ansi(text));
    ops.push_str(" Tj\nET\n");
}

/// Rewrites one page dictionary: annotations stripped of widgets, the
/// overlay appended to Contents, and a Helvetica resource guaranteed.
fn apply_page_edit(
    objects: &mut HashMap<(u32, u16), PdfObject>,
    edit: &PageEdit,
    next_number: &mut u32,
) -> Result<()> {
    // Register the overlay stream first; the page borrow comes after.
    let overlay_ref = match &edit.overlay {
        Some(data) => {
            let id = (*next_number, 0u16);
            *next_number += 1;

            let mut dict = PdfDictionary::new();
            dict.insert("Length", PdfObject::Integer(data.len() as i64));
            objects.insert(
                id,
                PdfObject::Stream(crate::parser::PdfStream {
                    dict,
                    data: data.clone(),
                }),
            );
            Some(PdfObject::Reference(id.0, id.1))
        }
        None => None,
    };

    let page = objects
        .get_mut(&edit.page_id)
        .ok_or_else(|| FormError::Flatten("page object disappeared".to_string()))?;
    let PdfObject::Dictionary(page_dict) = page else {
        return Err(FormError::Flatten("page object is not a dictionary".to_string()));
    };

    if edit.kept_annots.is_empty() {
        page_dict.remove("Annots");
    } else {
        page_dict.insert("Annots", PdfObject::Array(PdfArray(edit.kept_annots.clone())));
    }

    if let Some(overlay_ref) = overlay_ref {
        let mut contents = edit.base_contents.clone();
        contents.push(overlay_ref);
        page_dict.insert("Contents", PdfObject::Array(contents));

        ensure_helvetica(page_dict);
    }

    Ok(())
}

/// The overlay uses /Helv; make sure the page's font resources name it.
/// Indirect resources are replaced by a direct dictionary so the edit
/// stays local to the page.
fn ensure_helvetica(page_dict: &mut PdfDictionary) {
    let mut resources = match page_dict.remove("Resources") {
        Some(PdfObject::Dictionary(dict)) => dict,
        // A reference would need the whole document to patch; starting
        // fresh keeps the overlay font available either way. Existing
        // resources reached through the reference stay untouched for
        // the original operators only when they are direct.
        _ => PdfDictionary::new(),
    };

    let mut fonts = match resources.remove("Font") {
        Some(PdfObject::Dictionary(dict)) => dict,
        _ => PdfDictionary::new(),
    };

    if !fonts.contains_key("Helv") {
        let mut helv = PdfDictionary::new();
        helv.insert("Type", PdfObject::Name(PdfName("Font".to_string())));
        helv.insert("Subtype", PdfObject::Name(PdfName("Type1".to_string())));
        helv.insert("BaseFont", PdfObject::Name(PdfName("Helvetica".to_string())));
        fonts.insert("Helv", PdfObject::Dictionary(helv));
    }

    resources.insert("Font", PdfObject::Dictionary(fonts));
    page_dict.insert("Resources", PdfObject::Dictionary(resources));
}

fn remove_acro_form(objects: &mut HashMap<(u32, u16), PdfObject>, trailer: &PdfDictionary) {
    let Some((number, generation)) = trailer.get("Root").and_then(PdfObject::as_reference) else {
        return;
    };
    if let Some(PdfObject::Dictionary(catalog)) = objects.get_mut(&(number, generation)) {
        catalog.remove("AcroForm");
    }
}

// ---- serialization -------------------------------------------------

/// Writes the complete object set back out with a fresh xref table.
fn serialize_document(
    objects: &HashMap<(u32, u16), PdfObject>,
    trailer: &PdfDictionary,
) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    out.extend_from_slice(b"%PDF-1.7\n");
    out.extend_from_slice(&[b'%', 0xE2, 0xE3, 0xCF, 0xD3, b'\n']);

    let mut ids: Vec<(u32, u16)> = objects.keys().copied().collect();
    ids.sort();

    let mut positions: HashMap<u32, (u64, u16)> = HashMap::new();
    for (number, generation) in &ids {
        positions.insert(*number, (out.len() as u64, *generation));
        out.extend_from_slice(format!("{number} {generation} obj\n").as_bytes());
        serialize_object(&mut out, &objects[&(*number, *generation)]);
        out.extend_from_slice(b"\nendobj\n");
    }

    let max_number = ids.iter().map(|(n, _)| *n).max().unwrap_or(0);
    let xref_position = out.len();

    out.extend_from_slice(format!("xref\n0 {}\n", max_number + 1).as_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for number in 1..=max_number {
        match positions.get(&number) {
            Some((position, generation)) => {
                out.extend_from_slice(format!("{position:010} {generation:05} n \n").as_bytes())
            }
            None => out.extend_from_slice(b"0000000000 00000 f \n"),
        }
    }

    let mut trailer = trailer.clone();
    trailer.insert("Size", PdfObject::Integer((max_number + 1) as i64));

    out.extend_from_slice(b"trailer\n");
    serialize_object(&mut out, &PdfObject::Dictionary(trailer));
    out.extend_from_slice(format!("\nstartxref\n{xref_position}\n%%EOF\n").as_bytes());

    Ok(out)
}

fn serialize_object(out: &mut Vec<u8>, object: &PdfObject) {
    match object {
        PdfObject::Null => out.extend_from_slice(b"null"),
        PdfObject::Boolean(b) => out.extend_from_slice(if *b { b"true" } else { b"false" }),
        PdfObject::Integer(i) => out.extend_from_slice(i.to_string().as_bytes()),
        PdfObject::Real(f) => out.extend_from_slice(
            format!("{f:.6}")
                .trim_end_matches('0')
                .trim_end_matches('.')
                .as_bytes(),
        ),
        PdfObject::String(s) => {
            let mut literal = String::new();
            push_literal_string(&mut literal, s.as_bytes());
            out.extend_from_slice(literal.as_bytes());
        }
        PdfObject::Name(n) => {
            out.push(b'/');
            for &byte in n.as_str().as_bytes() {
                // Escape whitespace and delimiters inside names
                if byte <= b' '
                    || matches!(byte, b'/' | b'<' | b'>' | b'[' | b']' | b'(' | b')' | b'%' | b'#')
                {
                    out.extend_from_slice(format!("#{byte:02X}").as_bytes());
                } else {
                    out.push(byte);
                }
            }
        }
        PdfObject::Array(array) => {
            out.push(b'[');
            for (i, item) in array.iter().enumerate() {
                if i > 0 {
                    out.push(b' ');
                }
                serialize_object(out, item);
            }
            out.push(b']');
        }
        PdfObject::Dictionary(dict) => {
            out.extend_from_slice(b"<<");
            for (key, value) in &dict.0 {
                out.extend_from_slice(b"\n");
                serialize_object(out, &PdfObject::Name(key.clone()));
                out.push(b' ');
                serialize_object(out, value);
            }
            out.extend_from_slice(b"\n>>");
        }
        PdfObject::Stream(stream) => {
            let mut dict = stream.dict.clone();
            dict.insert("Length", PdfObject::Integer(stream.data.len() as i64));
            serialize_object(out, &PdfObject::Dictionary(dict));
            out.extend_from_slice(b"\nstream\n");
            out.extend_from_slice(&stream.data);
            out.extend_from_slice(b"\nendstream");
        }
        PdfObject::Reference(number, generation) => {
            out.extend_from_slice(format!("{number} {generation} R").as_bytes());
        }
    }
}
