//! Whole-document reader.
//!
//! The primary path walks the classic cross-reference table chain from
//! `startxref`. Documents with xref streams, damaged offsets or other
//! structural surprises fall back to a full scan for `N G obj` headers,
//! which is enough to flatten anything whose objects are intact.

use super::lexer::{Lexer, Token};
use super::objects::{PdfDictionary, PdfObject};
use super::{ParseError, ParseResult};
use std::collections::HashMap;
use tracing::debug;

const NULL_OBJECT: PdfObject = PdfObject::Null;
const MAX_RESOLVE_DEPTH: usize = 32;
const MAX_TREE_DEPTH: usize = 64;

/// A parsed document: every indirect object plus the trailer.
pub struct FormReader {
    objects: HashMap<(u32, u16), PdfObject>,
    trailer: PdfDictionary,
}

impl FormReader {
    /// Parse a complete PDF from memory.
    pub fn parse(data: &[u8]) -> ParseResult<Self> {
        if !data.starts_with(b"%PDF-") {
            return Err(ParseError::InvalidHeader);
        }

        match Self::parse_via_xref(data) {
            Ok(reader) => Ok(reader),
            Err(err) => {
                debug!(%err, "xref walk failed, recovering by full scan");
                Self::parse_via_scan(data)
            }
        }
    }

    fn parse_via_xref(data: &[u8]) -> ParseResult<Self> {
        let start_offset = find_startxref(data)?;

        // Newest table first; older tables only fill gaps.
        let mut offsets: HashMap<u32, (u64, u16)> = HashMap::new();
        let mut trailer: Option<PdfDictionary> = None;
        let mut next = Some(start_offset);
        let mut visited = Vec::new();

        while let Some(offset) = next {
            if visited.contains(&offset) {
                return Err(ParseError::CircularReference);
            }
            visited.push(offset);

            let section_trailer = parse_xref_section(data, offset, &mut offsets)?;
            next = section_trailer
                .get("Prev")
                .and_then(PdfObject::as_integer)
                .map(|p| p as usize);
            if trailer.is_none() {
                trailer = Some(section_trailer);
            }
        }

        let trailer = trailer.ok_or(ParseError::InvalidTrailer)?;
        if trailer.get("Root").is_none() {
            return Err(ParseError::InvalidTrailer);
        }

        let mut objects = HashMap::new();
        for (number, (offset, generation)) in offsets {
            let object = parse_indirect_object(data, offset as usize, number, generation)?;
            objects.insert((number, generation), object);
        }

        Ok(Self { objects, trailer })
    }

    fn parse_via_scan(data: &[u8]) -> ParseResult<Self> {
        let mut objects = HashMap::new();

        // Later definitions win: incremental updates append to the file.
        for (number, generation, body_start) in scan_object_headers(data) {
            let mut lexer = Lexer::new_at(data, body_start);
            if let Ok(object) = PdfObject::parse(&mut lexer) {
                objects.insert((number, generation), object);
            }
        }

        if objects.is_empty() {
            return Err(ParseError::SyntaxError {
                position: 0,
                message: "no indirect objects found".to_string(),
            });
        }

        let trailer = match scan_trailer(data) {
            Some(t) if t.get("Root").is_some() => t,
            _ => reconstruct_trailer(&objects)?,
        };

        Ok(Self { objects, trailer })
    }

    pub fn trailer(&self) -> &PdfDictionary {
        &self.trailer
    }

    pub fn object(&self, number: u32, generation: u16) -> Option<&PdfObject> {
        self.objects.get(&(number, generation)).or_else(|| {
            // Generation mismatches show up in sloppily updated files;
            // fall back to any object with the right number.
            self.objects
                .iter()
                .find(|((n, _), _)| *n == number)
                .map(|(_, obj)| obj)
        })
    }

    /// Follow reference chains to the underlying object.
    pub fn resolve<'a>(&'a self, object: &'a PdfObject) -> &'a PdfObject {
        let mut current = object;
        for _ in 0..MAX_RESOLVE_DEPTH {
            match current {
                PdfObject::Reference(number, generation) => {
                    current = self.object(*number, *generation).unwrap_or(&NULL_OBJECT);
                }
                other => return other,
            }
        }
        &NULL_OBJECT
    }

    /// The document catalog.
    pub fn catalog(&self) -> ParseResult<&PdfDictionary> {
        let root = self.trailer.get("Root").ok_or(ParseError::InvalidTrailer)?;
        self.resolve(root)
            .as_dict()
            .ok_or(ParseError::InvalidTrailer)
    }

    /// Object ids of all pages, in document order.
    pub fn page_ids(&self) -> ParseResult<Vec<(u32, u16)>> {
        let catalog = self.catalog()?;
        let pages = catalog
            .get("Pages")
            .ok_or_else(|| ParseError::MissingKey("Pages".to_string()))?;

        let mut ids = Vec::new();
        if let Some((number, generation)) = pages.as_reference() {
            self.collect_pages(number, generation, 0, &mut ids)?;
        }
        Ok(ids)
    }

    fn collect_pages(
        &self,
        number: u32,
        generation: u16,
        depth: usize,
        ids: &mut Vec<(u32, u16)>,
    ) -> ParseResult<()> {
        if depth > MAX_TREE_DEPTH {
            return Err(ParseError::CircularReference);
        }

        let Some(node) = self.object(number, generation).and_then(PdfObject::as_dict) else {
            return Ok(());
        };

        match node.get_type() {
            Some("Page") => ids.push((number, generation)),
            _ => {
                if let Some(kids) = node.get("Kids").map(|k| self.resolve(k)) {
                    if let Some(kids) = kids.as_array() {
                        for kid in kids.iter() {
                            if let Some((n, g)) = kid.as_reference() {
                                self.collect_pages(n, g, depth + 1, ids)?;
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Decompose into the raw object map and trailer for rewriting.
    pub fn into_parts(self) -> (HashMap<(u32, u16), PdfObject>, PdfDictionary) {
        (self.objects, self.trailer)
    }
}

/// Locate the startxref offset near the end of the file.
fn find_startxref(data: &[u8]) -> ParseResult<usize> {
    let tail_start = data.len().saturating_sub(1024);
    let tail = &data[tail_start..];

    let keyword_pos = tail
        .windows(b"startxref".len())
        .rposition(|w| w == b"startxref")
        .ok_or(ParseError::InvalidXRef)?;

    let mut lexer = Lexer::new_at(data, tail_start + keyword_pos);
    if lexer.next_token()? != Token::StartXref {
        return Err(ParseError::InvalidXRef);
    }
    match lexer.next_token()? {
        Token::Integer(offset) if offset >= 0 && (offset as usize) < data.len() => {
            Ok(offset as usize)
        }
        _ => Err(ParseError::InvalidXRef),
    }
}

/// Parse one classic xref section plus its trailer dictionary. Fills
/// `offsets` with in-use entries not already present.
fn parse_xref_section(
    data: &[u8],
    offset: usize,
    offsets: &mut HashMap<u32, (u64, u16)>,
) -> ParseResult<PdfDictionary> {
    let mut lexer = Lexer::new_at(data, offset);
    if lexer.next_token()? != Token::Xref {
        return Err(ParseError::InvalidXRef);
    }

    loop {
        let token = lexer.next_token()?;
        match token {
            Token::Trailer => break,
            Token::Integer(start) if start >= 0 => {
                let count = match lexer.next_token()? {
                    Token::Integer(c) if c >= 0 => c as u32,
                    _ => return Err(ParseError::InvalidXRef),
                };

                for i in 0..count {
                    let entry_offset = match lexer.next_token()? {
                        Token::Integer(o) if o >= 0 => o as u64,
                        _ => return Err(ParseError::InvalidXRef),
                    };
                    let generation = match lexer.next_token()? {
                        Token::Integer(g) if g >= 0 => g as u16,
                        _ => return Err(ParseError::InvalidXRef),
                    };
                    let in_use = read_xref_flag(&mut lexer)?;

                    let number = start as u32 + i;
                    if in_use && number > 0 {
                        offsets.entry(number).or_insert((entry_offset, generation));
                    }
                }
            }
            _ => return Err(ParseError::InvalidXRef),
        }
    }

    match PdfObject::parse(&mut lexer)? {
        PdfObject::Dictionary(dict) => Ok(dict),
        _ => Err(ParseError::InvalidTrailer),
    }
}

/// The n/f marker after each xref entry; not a token the lexer knows.
fn read_xref_flag(lexer: &mut Lexer<'_>) -> ParseResult<bool> {
    lexer.skip_whitespace();
    match lexer.next_raw_char() {
        Some(b'n') => Ok(true),
        Some(b'f') => Ok(false),
        other => Err(ParseError::SyntaxError {
            position: lexer.position(),
            message: format!("invalid xref entry flag: {other:?}"),
        }),
    }
}

/// Parse `N G obj <object>` at a known offset.
fn parse_indirect_object(
    data: &[u8],
    offset: usize,
    expected_number: u32,
    expected_generation: u16,
) -> ParseResult<PdfObject> {
    let mut lexer = Lexer::new_at(data, offset);

    let number = match lexer.next_token()? {
        Token::Integer(n) => n,
        _ => {
            return Err(ParseError::SyntaxError {
                position: offset,
                message: "expected object number".to_string(),
            })
        }
    };
    let generation = match lexer.next_token()? {
        Token::Integer(g) => g,
        _ => {
            return Err(ParseError::SyntaxError {
                position: offset,
                message: "expected generation number".to_string(),
            })
        }
    };
    if lexer.next_token()? != Token::Obj {
        return Err(ParseError::SyntaxError {
            position: offset,
            message: "expected obj keyword".to_string(),
        });
    }
    if number != expected_number as i64 || generation != expected_generation as i64 {
        return Err(ParseError::SyntaxError {
            position: offset,
            message: format!(
                "object header mismatch: found {number} {generation}, expected {expected_number} {expected_generation}"
            ),
        });
    }

    PdfObject::parse(&mut lexer)
}

/// All `N G obj` headers in the file, as (number, generation, body offset).
fn scan_object_headers(data: &[u8]) -> Vec<(u32, u16, usize)> {
    let mut headers = Vec::new();
    let keyword = b"obj";

    let mut i = 0;
    while i + keyword.len() <= data.len() {
        if &data[i..i + keyword.len()] != keyword {
            i += 1;
            continue;
        }
        // Standalone keyword: delimited on both sides
        let after = data.get(i + keyword.len()).copied();
        if !matches!(after, None | Some(b'\0' | b'\t' | b'\n' | b'\x0C' | b'\r' | b' ' | b'<')) {
            i += 1;
            continue;
        }

        if let Some((number, generation)) = backtrack_object_header(data, i) {
            headers.push((number, generation, i + keyword.len()));
        }
        i += keyword.len();
    }
    headers
}

/// Walk backwards from the `obj` keyword over `N G `.
fn backtrack_object_header(data: &[u8], keyword_pos: usize) -> Option<(u32, u16)> {
    let read_digits_back = |mut pos: usize| -> Option<(u64, usize)> {
        let end = pos;
        while pos > 0 && data[pos - 1].is_ascii_digit() {
            pos -= 1;
        }
        if pos == end {
            return None;
        }
        let text = std::str::from_utf8(&data[pos..end]).ok()?;
        Some((text.parse().ok()?, pos))
    };
    let skip_space_back = |mut pos: usize| -> usize {
        while pos > 0 && matches!(data[pos - 1], b' ' | b'\t' | b'\r' | b'\n') {
            pos -= 1;
        }
        pos
    };

    let pos = skip_space_back(keyword_pos);
    let (generation, pos) = read_digits_back(pos)?;
    let pos = skip_space_back(pos);
    let (number, _) = read_digits_back(pos)?;

    if number == 0 || number > u32::MAX as u64 || generation > u16::MAX as u64 {
        return None;
    }
    Some((number as u32, generation as u16))
}

/// The last trailer dictionary in the file, if any parses.
fn scan_trailer(data: &[u8]) -> Option<PdfDictionary> {
    let keyword = b"trailer";
    let pos = data
        .windows(keyword.len())
        .rposition(|w| w == keyword)?;

    let mut lexer = Lexer::new_at(data, pos + keyword.len());
    match PdfObject::parse(&mut lexer) {
        Ok(PdfObject::Dictionary(dict)) => Some(dict),
        _ => None,
    }
}

/// No usable trailer: point Root at the first catalog found.
fn reconstruct_trailer(
    objects: &HashMap<(u32, u16), PdfObject>,
) -> ParseResult<PdfDictionary> {
    let mut ids: Vec<_> = objects.keys().copied().collect();
    ids.sort();

    for (number, generation) in ids {
        if let Some(dict) = objects[&(number, generation)].as_dict() {
            if dict.get_type() == Some("Catalog") {
                let mut trailer = PdfDictionary::new();
                trailer.insert("Root", PdfObject::Reference(number, generation));
                return Ok(trailer);
            }
        }
    }
    Err(ParseError::InvalidTrailer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_pdf() -> Vec<u8> {
        let mut doc = crate::Document::new();
        doc.add_page(crate::page::Page::a4());
        doc.to_bytes().unwrap()
    }

    #[test]
    fn test_parse_own_output() {
        let data = sample_pdf();
        let reader = FormReader::parse(&data).unwrap();

        assert!(reader.trailer().get("Root").is_some());
        let catalog = reader.catalog().unwrap();
        assert_eq!(catalog.get_type(), Some("Catalog"));
        assert_eq!(reader.page_ids().unwrap().len(), 1);
    }

    #[test]
    fn test_rejects_non_pdf() {
        assert!(matches!(
            FormReader::parse(b"GIF89a not a pdf"),
            Err(ParseError::InvalidHeader)
        ));
        assert!(FormReader::parse(b"").is_err());
    }

    #[test]
    fn test_recovers_from_broken_startxref() {
        let mut data = sample_pdf();
        // Corrupt the startxref offset digits
        let pos = data
            .windows(9)
            .rposition(|w| w == b"startxref")
            .unwrap();
        for byte in &mut data[pos + 10..pos + 13] {
            if byte.is_ascii_digit() {
                *byte = b'9';
            }
        }

        let reader = FormReader::parse(&data).unwrap();
        assert_eq!(reader.page_ids().unwrap().len(), 1);
    }

    #[test]
    fn test_resolve_follows_references() {
        let data = sample_pdf();
        let reader = FormReader::parse(&data).unwrap();

        let catalog = reader.catalog().unwrap();
        let pages = reader.resolve(catalog.get("Pages").unwrap());
        assert_eq!(pages.as_dict().unwrap().get_type(), Some("Pages"));
    }

    #[test]
    fn test_resolve_missing_reference_is_null() {
        let data = sample_pdf();
        let reader = FormReader::parse(&data).unwrap();

        let dangling = PdfObject::Reference(9999, 0);
        assert!(reader.resolve(&dangling).is_null());
    }

    #[test]
    fn test_backtrack_object_header() {
        let data = b"junk 12 0 obj << >> endobj";
        let headers = scan_object_headers(data);
        assert_eq!(headers.len(), 1);
        assert_eq!(headers[0].0, 12);
        assert_eq!(headers[0].1, 0);
    }

    #[test]
    fn test_scan_ignores_endobj() {
        // The obj inside endobj must not count as a header
        let data = b"7 0 obj 42 endobj";
        let headers = scan_object_headers(data);
        assert_eq!(headers.len(), 1);
        assert_eq!(headers[0].0, 7);
    }
}
