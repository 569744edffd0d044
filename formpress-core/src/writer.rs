use crate::document::Document;
use crate::error::Result;
use crate::forms::AcroForm;
use crate::objects::{Dictionary, Object, ObjectId, Stream};
use crate::text::Font;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::io::Write;

/// Serializes a [`Document`] into PDF syntax: objects, page tree,
/// AcroForm wiring, cross-reference table and trailer.
pub struct PdfWriter<W: Write> {
    writer: W,
    xref_positions: HashMap<ObjectId, u64>,
    current_position: u64,
}

impl<W: Write> PdfWriter<W> {
    pub fn new_with_writer(writer: W) -> Self {
        Self {
            writer,
            xref_positions: HashMap::new(),
            current_position: 0,
        }
    }

    pub fn write_document(&mut self, document: &Document) -> Result<()> {
        self.write_header()?;

        let catalog_id = ObjectId::new(1, 0);
        let pages_id = ObjectId::new(2, 0);

        // Lay out object numbers up front; page dictionaries reference
        // their content and widget objects, the catalog references the
        // AcroForm, so every id must be known before anything is written.
        let mut next_number = 3u32;
        let mut page_layouts = Vec::new();
        let mut acro_form = AcroForm::new();

        for page in &document.pages {
            let page_id = ObjectId::new(next_number, 0);
            let content_id = ObjectId::new(next_number + 1, 0);
            next_number += 2;

            let widget_ids: Vec<ObjectId> = page
                .widgets()
                .iter()
                .map(|_| {
                    let id = ObjectId::new(next_number, 0);
                    next_number += 1;
                    id
                })
                .collect();

            for id in &widget_ids {
                acro_form.add_field(*id);
            }

            page_layouts.push((page_id, content_id, widget_ids));
        }

        let acro_form_id = if acro_form.is_empty() {
            None
        } else {
            let id = ObjectId::new(next_number, 0);
            next_number += 1;
            Some(id)
        };

        let info_id = ObjectId::new(next_number, 0);

        self.write_catalog(catalog_id, pages_id, acro_form_id)?;
        self.write_page_tree(pages_id, document, &page_layouts)?;

        if let Some(id) = acro_form_id {
            self.write_object(id, Object::Dictionary(acro_form.to_dict()))?;
        }

        self.write_info(info_id, document)?;

        let xref_position = self.current_position;
        self.write_xref()?;
        self.write_trailer(catalog_id, info_id, xref_position)?;

        self.writer.flush()?;
        Ok(())
    }

    fn write_header(&mut self) -> Result<()> {
        self.write_bytes(b"%PDF-1.7\n")?;
        // Binary comment so transports treat the file as binary
        self.write_bytes(&[b'%', 0xE2, 0xE3, 0xCF, 0xD3, b'\n'])?;
        Ok(())
    }

    fn write_catalog(
        &mut self,
        catalog_id: ObjectId,
        pages_id: ObjectId,
        acro_form_id: Option<ObjectId>,
    ) -> Result<()> {
        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name("Catalog".to_string()));
        catalog.set("Pages", Object::Reference(pages_id));
        if let Some(id) = acro_form_id {
            catalog.set("AcroForm", Object::Reference(id));
        }

        self.write_object(catalog_id, Object::Dictionary(catalog))
    }

    fn write_page_tree(
        &mut self,
        pages_id: ObjectId,
        document: &Document,
        page_layouts: &[(ObjectId, ObjectId, Vec<ObjectId>)],
    ) -> Result<()> {
        let mut pages_dict = Dictionary::new();
        pages_dict.set("Type", Object::Name("Pages".to_string()));
        pages_dict.set("Count", Object::Integer(document.pages.len() as i64));
        pages_dict.set(
            "Kids",
            Object::Array(
                page_layouts
                    .iter()
                    .map(|(page_id, _, _)| Object::Reference(*page_id))
                    .collect(),
            ),
        );

        self.write_object(pages_id, Object::Dictionary(pages_dict))?;

        for (page, (page_id, content_id, widget_ids)) in
            document.pages.iter().zip(page_layouts)
        {
            self.write_page(page, *page_id, pages_id, *content_id, widget_ids)?;
            self.write_page_content(*content_id, page)?;

            for (widget, widget_id) in page.widgets().iter().zip(widget_ids) {
                self.write_object(*widget_id, Object::Dictionary(widget.clone()))?;
            }
        }

        Ok(())
    }

    fn write_page(
        &mut self,
        page: &crate::page::Page,
        page_id: ObjectId,
        parent_id: ObjectId,
        content_id: ObjectId,
        widget_ids: &[ObjectId],
    ) -> Result<()> {
        let mut page_dict = Dictionary::new();
        page_dict.set("Type", Object::Name("Page".to_string()));
        page_dict.set("Parent", Object::Reference(parent_id));
        page_dict.set(
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(page.width()),
                Object::Real(page.height()),
            ]),
        );
        page_dict.set("Contents", Object::Reference(content_id));
        page_dict.set("Resources", Object::Dictionary(standard_resources()));

        if !widget_ids.is_empty() {
            page_dict.set(
                "Annots",
                Object::Array(widget_ids.iter().map(|id| Object::Reference(*id)).collect()),
            );
        }

        self.write_object(page_id, Object::Dictionary(page_dict))
    }

    fn write_page_content(&mut self, content_id: ObjectId, page: &crate::page::Page) -> Result<()> {
        let content = page.generate_content();

        let mut stream = Stream::new(content);
        stream.compress_flate()?;

        self.write_object(
            content_id,
            Object::Stream(stream.dictionary().clone(), stream.data().to_vec()),
        )
    }

    fn write_info(&mut self, info_id: ObjectId, document: &Document) -> Result<()> {
        let mut info_dict = Dictionary::new();

        if let Some(ref title) = document.metadata.title {
            info_dict.set("Title", Object::String(title.clone()));
        }
        if let Some(ref producer) = document.metadata.producer {
            info_dict.set("Producer", Object::String(producer.clone()));
        }
        if let Some(creation_date) = document.metadata.creation_date {
            info_dict.set("CreationDate", Object::String(format_pdf_date(creation_date)));
        }

        self.write_object(info_id, Object::Dictionary(info_dict))
    }

    fn write_object(&mut self, id: ObjectId, object: Object) -> Result<()> {
        self.xref_positions.insert(id, self.current_position);

        let header = format!("{} {} obj\n", id.number(), id.generation());
        self.write_bytes(header.as_bytes())?;

        self.write_object_value(&object)?;

        self.write_bytes(b"\nendobj\n")?;
        Ok(())
    }

    fn write_object_value(&mut self, object: &Object) -> Result<()> {
        match object {
            Object::Null => self.write_bytes(b"null")?,
            Object::Boolean(b) => self.write_bytes(if *b { b"true" } else { b"false" })?,
            Object::Integer(i) => self.write_bytes(i.to_string().as_bytes())?,
            Object::Real(f) => self.write_bytes(
                format!("{f:.6}")
                    .trim_end_matches('0')
                    .trim_end_matches('.')
                    .as_bytes(),
            )?,
            Object::String(s) => {
                let mut literal = String::new();
                crate::text::push_literal_string(&mut literal, s.as_bytes());
                self.write_bytes(literal.as_bytes())?;
            }
            Object::Name(n) => {
                self.write_bytes(b"/")?;
                self.write_bytes(n.as_bytes())?;
            }
            Object::Array(arr) => {
                self.write_bytes(b"[")?;
                for (i, obj) in arr.iter().enumerate() {
                    if i > 0 {
                        self.write_bytes(b" ")?;
                    }
                    self.write_object_value(obj)?;
                }
                self.write_bytes(b"]")?;
            }
            Object::Dictionary(dict) => {
                self.write_bytes(b"<<")?;
                for (key, value) in dict.entries() {
                    self.write_bytes(b"\n/")?;
                    self.write_bytes(key.as_bytes())?;
                    self.write_bytes(b" ")?;
                    self.write_object_value(value)?;
                }
                self.write_bytes(b"\n>>")?;
            }
            Object::Stream(dict, data) => {
                self.write_object_value(&Object::Dictionary(dict.clone()))?;
                self.write_bytes(b"\nstream\n")?;
                self.write_bytes(data)?;
                self.write_bytes(b"\nendstream")?;
            }
            Object::Reference(id) => {
                let ref_str = format!("{} {} R", id.number(), id.generation());
                self.write_bytes(ref_str.as_bytes())?;
            }
        }
        Ok(())
    }

    fn write_xref(&mut self) -> Result<()> {
        self.write_bytes(b"xref\n")?;

        let mut entries: Vec<_> = self
            .xref_positions
            .iter()
            .map(|(id, pos)| (*id, *pos))
            .collect();
        entries.sort_by_key(|(id, _)| id.number());

        let max_obj_num = entries.iter().map(|(id, _)| id.number()).max().unwrap_or(0);

        self.write_bytes(format!("0 {}\n", max_obj_num + 1).as_bytes())?;
        self.write_bytes(b"0000000000 65535 f \n")?;

        for obj_num in 1..=max_obj_num {
            if let Some((_, position)) = entries.iter().find(|(id, _)| id.number() == obj_num) {
                self.write_bytes(format!("{position:010} {:05} n \n", 0).as_bytes())?;
            } else {
                self.write_bytes(b"0000000000 00000 f \n")?;
            }
        }

        Ok(())
    }

    fn write_trailer(
        &mut self,
        catalog_id: ObjectId,
        info_id: ObjectId,
        xref_position: u64,
    ) -> Result<()> {
        let max_obj_num = self
            .xref_positions
            .keys()
            .map(|id| id.number())
            .max()
            .unwrap_or(0);

        let mut trailer = Dictionary::new();
        trailer.set("Size", Object::Integer((max_obj_num + 1) as i64));
        trailer.set("Root", Object::Reference(catalog_id));
        trailer.set("Info", Object::Reference(info_id));

        self.write_bytes(b"trailer\n")?;
        self.write_object_value(&Object::Dictionary(trailer))?;
        self.write_bytes(b"\nstartxref\n")?;
        self.write_bytes(xref_position.to_string().as_bytes())?;
        self.write_bytes(b"\n%%EOF\n")?;

        Ok(())
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write_all(data)?;
        self.current_position += data.len() as u64;
        Ok(())
    }
}

/// Font resources shared by every page.
fn standard_resources() -> Dictionary {
    let mut font_dict = Dictionary::new();
    for font in Font::all() {
        let mut font_entry = Dictionary::new();
        font_entry.set("Type", Object::Name("Font".to_string()));
        font_entry.set("Subtype", Object::Name("Type1".to_string()));
        font_entry.set("BaseFont", Object::Name(font.pdf_name().to_string()));
        font_dict.set(font.resource_name(), Object::Dictionary(font_entry));
    }

    let mut resources = Dictionary::new();
    resources.set("Font", Object::Dictionary(font_dict));
    resources
}

/// Format a DateTime as a PDF date string (D:YYYYMMDDHHmmSS+00'00)
fn format_pdf_date(date: DateTime<Utc>) -> String {
    format!("{}+00'00", date.format("D:%Y%m%d%H%M%S"))
}
