//! Widget annotation dictionaries, one builder per fillable kind.
//!
//! Each builder produces a merged field/annotation dictionary: the
//! widget is its own field, which keeps the object graph flat and is
//! all this single-page format needs.

use crate::geometry::Rectangle;
use crate::objects::{Dictionary, Object, ObjectId};

const DEFAULT_APPEARANCE: &str = "/Helv 12 Tf 0 g";

fn base_widget_dict(name: &str, rect: Rectangle) -> Dictionary {
    let mut dict = Dictionary::new();

    dict.set("Type", Object::Name("Annot".to_string()));
    dict.set("Subtype", Object::Name("Widget".to_string()));
    dict.set("T", Object::String(name.to_string()));
    dict.set(
        "Rect",
        Object::Array(vec![
            Object::Real(rect.lower_left.x),
            Object::Real(rect.lower_left.y),
            Object::Real(rect.upper_right.x),
            Object::Real(rect.upper_right.y),
        ]),
    );

    // Print flag
    dict.set("F", Object::Integer(4));

    // Black border on white background
    let mut mk = Dictionary::new();
    mk.set("BC", Object::Array(vec![Object::Real(0.0)]));
    mk.set("BG", Object::Array(vec![Object::Real(1.0)]));
    dict.set("MK", Object::Dictionary(mk));

    let mut bs = Dictionary::new();
    bs.set("W", Object::Real(1.0));
    bs.set("S", Object::Name("S".to_string()));
    dict.set("BS", Object::Dictionary(bs));

    dict
}

/// Text field widget; `multiline` also serves the signature placeholder.
pub fn create_text_field_dict(
    name: &str,
    rect: Rectangle,
    multiline: bool,
    value: Option<&str>,
) -> Dictionary {
    let mut dict = base_widget_dict(name, rect);

    dict.set("FT", Object::Name("Tx".to_string()));
    dict.set("DA", Object::String(DEFAULT_APPEARANCE.to_string()));

    if multiline {
        dict.set("Ff", Object::Integer(1 << 12));
    }

    if let Some(value) = value {
        dict.set("V", Object::String(value.to_string()));
        dict.set("DV", Object::String(value.to_string()));
    }

    dict
}

/// Checkbox widget, initially off.
pub fn create_checkbox_dict(name: &str, rect: Rectangle) -> Dictionary {
    let mut dict = base_widget_dict(name, rect);

    dict.set("FT", Object::Name("Btn".to_string()));
    dict.set("V", Object::Name("Off".to_string()));
    dict.set("AS", Object::Name("Off".to_string()));

    dict
}

/// Radio widget forming its own one-member exclusive group.
///
/// The model has no cross-field grouping; each radio field is keyed by
/// its own sanitized id and toggles independently.
pub fn create_radio_dict(name: &str, rect: Rectangle) -> Dictionary {
    let mut dict = base_widget_dict(name, rect);

    dict.set("FT", Object::Name("Btn".to_string()));
    // Radio + NoToggleToOff
    dict.set("Ff", Object::Integer((1 << 15) | (1 << 14)));
    dict.set("AS", Object::Name("Off".to_string()));

    // Circle style
    if let Some(Object::Dictionary(mk)) = dict.get_mut("MK") {
        mk.set("CA", Object::String("l".to_string()));
    }

    dict
}

/// Combo box (dropdown) widget offering `options` in order.
pub fn create_combo_dict(name: &str, rect: Rectangle, options: &[String]) -> Dictionary {
    let mut dict = base_widget_dict(name, rect);

    dict.set("FT", Object::Name("Ch".to_string()));
    dict.set("DA", Object::String(DEFAULT_APPEARANCE.to_string()));

    // Combo flag
    dict.set("Ff", Object::Integer(1 << 17));

    let opt_array: Vec<Object> = options
        .iter()
        .map(|o| Object::String(o.clone()))
        .collect();
    dict.set("Opt", Object::Array(opt_array));

    dict
}

/// Interactive form dictionary (AcroForm)
#[derive(Debug, Clone, Default)]
pub struct AcroForm {
    fields: Vec<ObjectId>,
}

impl AcroForm {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn add_field(&mut self, field_ref: ObjectId) {
        self.fields.push(field_ref);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn to_dict(&self) -> Dictionary {
        let mut dict = Dictionary::new();

        let fields: Vec<Object> = self.fields.iter().map(|r| Object::Reference(*r)).collect();
        dict.set("Fields", Object::Array(fields));
        dict.set("NeedAppearances", Object::Boolean(true));
        dict.set("DA", Object::String(DEFAULT_APPEARANCE.to_string()));

        dict
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn rect() -> Rectangle {
        Rectangle::new(Point::new(50.0, 762.0), Point::new(250.0, 792.0))
    }

    #[test]
    fn test_text_field_dict() {
        let dict = create_text_field_dict("name", rect(), false, None);

        assert_eq!(dict.get("FT"), Some(&Object::Name("Tx".to_string())));
        assert_eq!(dict.get("T"), Some(&Object::String("name".to_string())));
        assert_eq!(
            dict.get("Subtype"),
            Some(&Object::Name("Widget".to_string()))
        );
        assert!(dict.get("Ff").is_none());
        assert!(dict.get("V").is_none());

        let rect_arr = dict.get("Rect").and_then(|o| o.as_array()).unwrap();
        assert_eq!(rect_arr[1].as_real(), Some(762.0));
        assert_eq!(rect_arr[3].as_real(), Some(792.0));
    }

    #[test]
    fn test_multiline_and_prefill() {
        let dict = create_text_field_dict("sig", rect(), true, Some("Sign here"));

        assert_eq!(dict.get("Ff"), Some(&Object::Integer(1 << 12)));
        assert_eq!(dict.get("V"), Some(&Object::String("Sign here".to_string())));
        assert_eq!(
            dict.get("DV"),
            Some(&Object::String("Sign here".to_string()))
        );
    }

    #[test]
    fn test_checkbox_starts_off() {
        let dict = create_checkbox_dict("agree", rect());

        assert_eq!(dict.get("FT"), Some(&Object::Name("Btn".to_string())));
        assert_eq!(dict.get("V"), Some(&Object::Name("Off".to_string())));
        assert_eq!(dict.get("AS"), Some(&Object::Name("Off".to_string())));
    }

    #[test]
    fn test_radio_flags() {
        let dict = create_radio_dict("choice", rect());

        let flags = dict.get("Ff").and_then(|o| o.as_integer()).unwrap();
        assert_ne!(flags & (1 << 15), 0); // Radio
        assert_ne!(flags & (1 << 14), 0); // NoToggleToOff

        let mk = dict.get_dict("MK").unwrap();
        assert_eq!(mk.get("CA"), Some(&Object::String("l".to_string())));
    }

    #[test]
    fn test_combo_options_in_order() {
        let options = vec!["A".to_string(), "B".to_string()];
        let dict = create_combo_dict("pick", rect(), &options);

        assert_eq!(dict.get("FT"), Some(&Object::Name("Ch".to_string())));
        let flags = dict.get("Ff").and_then(|o| o.as_integer()).unwrap();
        assert_ne!(flags & (1 << 17), 0); // Combo

        let opt = dict.get("Opt").and_then(|o| o.as_array()).unwrap();
        assert_eq!(opt.len(), 2);
        assert_eq!(opt[0].as_string(), Some("A"));
        assert_eq!(opt[1].as_string(), Some("B"));
    }

    #[test]
    fn test_acro_form_dict() {
        let mut form = AcroForm::new();
        assert!(form.is_empty());

        form.add_field(ObjectId::new(5, 0));
        form.add_field(ObjectId::new(7, 0));

        let dict = form.to_dict();
        assert_eq!(dict.get("NeedAppearances"), Some(&Object::Boolean(true)));
        let fields = dict.get("Fields").and_then(|o| o.as_array()).unwrap();
        assert_eq!(fields.len(), 2);
    }
}
