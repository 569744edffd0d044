//! End-to-end export workflows: designer gestures through emission,
//! verified by reading the produced bytes back with the crate's own
//! parser.

use formpress::operations::flatten;
use formpress::parser::{FormReader, PdfObject};
use formpress::{emit_pdf, Field, FieldKind, FormDesigner, Point};

/// All widget annotation dictionaries of the single page, resolved.
fn page_widgets(data: &[u8]) -> Vec<formpress::parser::PdfDictionary> {
    let reader = FormReader::parse(data).expect("emitted PDF must parse");
    let page_ids = reader.page_ids().unwrap();
    assert_eq!(page_ids.len(), 1, "emitter produces a single page");

    let page = reader
        .object(page_ids[0].0, page_ids[0].1)
        .and_then(PdfObject::as_dict)
        .unwrap();

    let mut widgets = Vec::new();
    if let Some(annots) = page.get("Annots").map(|a| reader.resolve(a)) {
        if let Some(annots) = annots.as_array() {
            for entry in annots.iter() {
                let dict = reader.resolve(entry).as_dict().unwrap().clone();
                if dict.get("Subtype").and_then(PdfObject::as_name).map(|n| n.as_str())
                    == Some("Widget")
                {
                    widgets.push(dict);
                }
            }
        }
    }
    widgets
}

fn rect_of(dict: &formpress::parser::PdfDictionary) -> [f64; 4] {
    let rect = dict.get("Rect").and_then(PdfObject::as_array).unwrap();
    [
        rect.get(0).unwrap().as_real().unwrap(),
        rect.get(1).unwrap().as_real().unwrap(),
        rect.get(2).unwrap().as_real().unwrap(),
        rect.get(3).unwrap().as_real().unwrap(),
    ]
}

#[test]
fn test_single_default_text_field_end_to_end() {
    // Add one text field with catalog defaults (200x30), drag it to
    // (50, 50), export.
    let mut designer = FormDesigner::new();
    let id = designer.add_field(FieldKind::Text).id.clone();
    designer.move_field(&id, 50.0, 50.0).unwrap();

    let pdf = emit_pdf(designer.fields()).unwrap();
    let widgets = page_widgets(&pdf);
    assert_eq!(widgets.len(), 1);

    let widget = &widgets[0];
    assert_eq!(
        widget.get("FT").and_then(PdfObject::as_name).unwrap().as_str(),
        "Tx"
    );
    // y = 842 - 50 - 30 = 762
    assert_eq!(rect_of(widget), [50.0, 762.0, 250.0, 792.0]);
    // Empty initial value
    assert!(widget.get("V").is_none());
}

#[test]
fn test_dropdown_options_survive_in_order() {
    let mut designer = FormDesigner::new();
    let id = designer.add_field(FieldKind::Dropdown).id.clone();
    designer.double_click(&id);
    designer.commit_edit("A\nB").unwrap();

    let pdf = emit_pdf(designer.fields()).unwrap();
    let widgets = page_widgets(&pdf);
    assert_eq!(widgets.len(), 1);

    let opt = widgets[0].get("Opt").and_then(PdfObject::as_array).unwrap();
    let values: Vec<String> = opt
        .iter()
        .map(|o| o.as_string().unwrap().to_text())
        .collect();
    assert_eq!(values, vec!["A".to_string(), "B".to_string()]);
}

#[test]
fn test_out_of_bounds_field_omitted_edge_field_kept() {
    let in_bounds = Field {
        id: "edge".to_string(),
        kind: FieldKind::Text,
        label: "Text input".to_string(),
        x: 0.0,
        y: 50.0,
        width: 595.0,
        height: 30.0,
        options: None,
    };
    let out_of_bounds = Field {
        id: "outside".to_string(),
        kind: FieldKind::Text,
        label: "Text input".to_string(),
        x: -5.0,
        y: 50.0,
        width: 100.0,
        height: 30.0,
        options: None,
    };

    let pdf = emit_pdf(&[in_bounds, out_of_bounds]).unwrap();
    let widgets = page_widgets(&pdf);
    assert_eq!(widgets.len(), 1);
    assert_eq!(
        widgets[0]
            .get("T")
            .and_then(PdfObject::as_string)
            .unwrap()
            .to_text(),
        "edge"
    );
}

#[test]
fn test_widget_name_sanitization_end_to_end() {
    let field = Field {
        id: "a b#1".to_string(),
        kind: FieldKind::Text,
        label: "Text input".to_string(),
        x: 50.0,
        y: 50.0,
        width: 200.0,
        height: 30.0,
        options: None,
    };

    let pdf = emit_pdf(&[field]).unwrap();
    let widgets = page_widgets(&pdf);
    assert_eq!(
        widgets[0]
            .get("T")
            .and_then(PdfObject::as_string)
            .unwrap()
            .to_text(),
        "a_b_1"
    );
}

#[test]
fn test_every_widget_kind_round_trips() {
    let mut designer = FormDesigner::new();
    for kind in FieldKind::all() {
        designer.add_field(kind);
    }

    let pdf = emit_pdf(designer.fields()).unwrap();
    let widgets = page_widgets(&pdf);

    // 6 of the 9 kinds produce widgets; label and the two lists are
    // static text only.
    assert_eq!(widgets.len(), 6);

    let mut types: Vec<String> = widgets
        .iter()
        .map(|w| w.get("FT").and_then(PdfObject::as_name).unwrap().as_str().to_string())
        .collect();
    types.sort();
    // text, textarea and signature are Tx; checkbox and radio are Btn;
    // dropdown is Ch
    assert_eq!(types, vec!["Btn", "Btn", "Ch", "Tx", "Tx", "Tx"]);
}

#[test]
fn test_resize_gesture_then_export() {
    let mut designer = FormDesigner::new();
    let id = designer.add_field(FieldKind::Checkbox).id.clone();
    designer.move_field(&id, 100.0, 100.0).unwrap();

    // Pointer delta (30, 10) on a 20x20 checkbox: both axes become 50
    designer.handle_down(&id, Point::new(120.0, 120.0));
    designer.pointer_move(Point::new(150.0, 130.0));
    designer.pointer_up();

    let pdf = emit_pdf(designer.fields()).unwrap();
    let widgets = page_widgets(&pdf);
    let rect = rect_of(&widgets[0]);
    assert_eq!(rect[2] - rect[0], 50.0);
    assert_eq!(rect[3] - rect[1], 50.0);
}

#[test]
fn test_collection_order_does_not_change_geometry() {
    let a = Field {
        id: "a".to_string(),
        kind: FieldKind::Text,
        label: "Text input".to_string(),
        x: 50.0,
        y: 50.0,
        width: 200.0,
        height: 30.0,
        options: None,
    };
    let mut b = a.clone();
    b.id = "b".to_string();
    b.y = 120.0;

    let forward = emit_pdf(&[a.clone(), b.clone()]).unwrap();
    let backward = emit_pdf(&[b, a]).unwrap();

    let mut rects_fwd: Vec<_> = page_widgets(&forward)
        .iter()
        .map(|w| {
            (
                w.get("T").and_then(PdfObject::as_string).unwrap().to_text(),
                rect_of(w),
            )
        })
        .collect();
    let mut rects_bwd: Vec<_> = page_widgets(&backward)
        .iter()
        .map(|w| {
            (
                w.get("T").and_then(PdfObject::as_string).unwrap().to_text(),
                rect_of(w),
            )
        })
        .collect();
    rects_fwd.sort_by(|x, y| x.0.cmp(&y.0));
    rects_bwd.sort_by(|x, y| x.0.cmp(&y.0));
    assert_eq!(rects_fwd, rects_bwd);
}

#[test]
fn test_flatten_after_export_leaves_no_widgets() {
    let mut designer = FormDesigner::new();
    designer.add_field(FieldKind::Text);
    designer.add_field(FieldKind::Signature);
    designer.add_field(FieldKind::Label);

    let pdf = emit_pdf(designer.fields()).unwrap();
    assert_eq!(page_widgets(&pdf).len(), 2);

    let flattened = flatten::flatten_document(&pdf).unwrap();
    assert!(page_widgets(&flattened).is_empty());
    assert!(!String::from_utf8_lossy(&flattened).contains("/AcroForm"));
}
