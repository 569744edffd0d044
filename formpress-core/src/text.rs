//! Content-stream text operations.
//!
//! A trimmed text builder for the standard Type 1 fonts this emitter
//! uses. Text is encoded as Windows-1252 so the bullet glyph and
//! common punctuation survive the trip into literal strings.

use std::fmt::Write;

/// Standard 14 fonts used by the emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Font {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    Courier,
}

impl Font {
    /// PDF BaseFont name
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::HelveticaBold => "Helvetica-Bold",
            Font::HelveticaOblique => "Helvetica-Oblique",
            Font::Courier => "Courier",
        }
    }

    /// Resource key inside the page's /Font dictionary
    pub fn resource_name(&self) -> &'static str {
        match self {
            Font::Helvetica => "Helv",
            Font::HelveticaBold => "HelvB",
            Font::HelveticaOblique => "HelvO",
            Font::Courier => "Cour",
        }
    }

    /// All fonts registered in every page's resources.
    pub fn all() -> [Font; 4] {
        [
            Font::Helvetica,
            Font::HelveticaBold,
            Font::HelveticaOblique,
            Font::Courier,
        ]
    }
}

/// Encode text as Windows-1252 for literal strings in content streams.
pub(crate) fn encode_win_ansi(text: &str) -> Vec<u8> {
    let mut result = Vec::with_capacity(text.len());
    for ch in text.chars() {
        match ch as u32 {
            0x00..=0x7F => result.push(ch as u8),
            0xA0..=0xFF => result.push(ch as u8),
            0x20AC => result.push(0x80), // Euro sign
            0x2018 => result.push(0x91), // Left single quotation mark
            0x2019 => result.push(0x92), // Right single quotation mark
            0x201C => result.push(0x93), // Left double quotation mark
            0x201D => result.push(0x94), // Right double quotation mark
            0x2022 => result.push(0x95), // Bullet
            0x2013 => result.push(0x96), // En dash
            0x2014 => result.push(0x97), // Em dash
            0x2026 => result.push(0x85), // Horizontal ellipsis
            _ => result.push(b'?'),
        }
    }
    result
}

/// Append encoded bytes as an escaped PDF literal string.
pub(crate) fn push_literal_string(out: &mut String, bytes: &[u8]) {
    out.push('(');
    for &byte in bytes {
        match byte {
            b'(' => out.push_str("\\("),
            b')' => out.push_str("\\)"),
            b'\\' => out.push_str("\\\\"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            0x20..=0x7E => out.push(byte as char),
            _ => write!(out, "\\{byte:03o}").unwrap(),
        }
    }
    out.push(')');
}

#[derive(Debug, Clone)]
pub struct TextContext {
    operations: String,
    current_font: Font,
    font_size: f64,
    position: (f64, f64),
}

impl TextContext {
    pub fn new() -> Self {
        Self {
            operations: String::new(),
            current_font: Font::Helvetica,
            font_size: 12.0,
            position: (0.0, 0.0),
        }
    }

    pub fn set_font(&mut self, font: Font, size: f64) -> &mut Self {
        self.current_font = font;
        self.font_size = size;
        self
    }

    pub fn at(&mut self, x: f64, y: f64) -> &mut Self {
        self.position = (x, y);
        self
    }

    /// Emit one positioned text run.
    pub fn write(&mut self, text: &str) -> &mut Self {
        self.operations.push_str("BT\n");
        writeln!(
            &mut self.operations,
            "/{} {} Tf",
            self.current_font.resource_name(),
            self.font_size
        )
        .unwrap();
        writeln!(
            &mut self.operations,
            "{:.2} {:.2} Td",
            self.position.0, self.position.1
        )
        .unwrap();

        push_literal_string(&mut self.operations, &encode_win_ansi(text));
        self.operations.push_str(" Tj\n");
        self.operations.push_str("ET\n");
        self
    }

    pub(crate) fn generate_operations(&self) -> Vec<u8> {
        self.operations.as_bytes().to_vec()
    }
}

impl Default for TextContext {
    fn default() -> Self {
        Self::new()
    }
}
