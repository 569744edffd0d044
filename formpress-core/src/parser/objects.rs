//! PDF object parser, ISO 32000-1 Section 7.3.

use super::lexer::{Lexer, Token};
use super::{ParseError, ParseResult};
use std::collections::BTreeMap;

/// PDF Name object
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PdfName(pub String);

impl PdfName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// PDF String object, raw bytes as stored
#[derive(Debug, Clone, PartialEq)]
pub struct PdfString(pub Vec<u8>);

impl PdfString {
    /// Lossy UTF-8 view, good enough for form values
    pub fn to_text(&self) -> String {
        String::from_utf8_lossy(&self.0).into_owned()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// PDF Array object
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PdfArray(pub Vec<PdfObject>);

impl PdfArray {
    pub fn new() -> Self {
        PdfArray(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PdfObject> {
        self.0.get(index)
    }

    pub fn push(&mut self, obj: PdfObject) {
        self.0.push(obj);
    }

    pub fn iter(&self) -> impl Iterator<Item = &PdfObject> {
        self.0.iter()
    }
}

/// PDF Dictionary object; sorted keys keep rewrites deterministic
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PdfDictionary(pub BTreeMap<PdfName, PdfObject>);

impl PdfDictionary {
    pub fn new() -> Self {
        PdfDictionary(BTreeMap::new())
    }

    pub fn get(&self, key: &str) -> Option<&PdfObject> {
        self.0.get(&PdfName(key.to_string()))
    }

    pub fn insert(&mut self, key: impl Into<String>, value: PdfObject) {
        self.0.insert(PdfName(key.into()), value);
    }

    pub fn remove(&mut self, key: &str) -> Option<PdfObject> {
        self.0.remove(&PdfName(key.to_string()))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(&PdfName(key.to_string()))
    }

    /// Value of the /Type key, if present
    pub fn get_type(&self) -> Option<&str> {
        self.get("Type").and_then(|obj| obj.as_name()).map(PdfName::as_str)
    }
}

/// PDF Stream object
#[derive(Debug, Clone, PartialEq)]
pub struct PdfStream {
    pub dict: PdfDictionary,
    pub data: Vec<u8>,
}

impl PdfStream {
    /// Stream data with the Filter chain undone. Only FlateDecode (and
    /// unfiltered data) is supported; anything else is an error.
    pub fn decode(&self) -> ParseResult<Vec<u8>> {
        match self.dict.get("Filter") {
            None => Ok(self.data.clone()),
            Some(PdfObject::Name(name)) if name.as_str() == "FlateDecode" => {
                crate::objects::decompress_flate(&self.data)
                    .map_err(|e| ParseError::StreamDecodeError(e.to_string()))
            }
            Some(PdfObject::Array(filters)) if filters.len() == 1 => {
                match filters.get(0).and_then(|f| f.as_name()) {
                    Some(name) if name.as_str() == "FlateDecode" => {
                        crate::objects::decompress_flate(&self.data)
                            .map_err(|e| ParseError::StreamDecodeError(e.to_string()))
                    }
                    other => Err(ParseError::StreamDecodeError(format!(
                        "unsupported filter: {other:?}"
                    ))),
                }
            }
            Some(other) => Err(ParseError::StreamDecodeError(format!(
                "unsupported filter: {other:?}"
            ))),
        }
    }
}

/// PDF object types
#[derive(Debug, Clone, PartialEq)]
pub enum PdfObject {
    Null,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    String(PdfString),
    Name(PdfName),
    Array(PdfArray),
    Dictionary(PdfDictionary),
    Stream(PdfStream),
    /// object number, generation number
    Reference(u32, u16),
}

impl PdfObject {
    /// Parse one object from the lexer.
    pub fn parse(lexer: &mut Lexer<'_>) -> ParseResult<Self> {
        let token = lexer.next_token()?;
        Self::parse_from_token(lexer, token)
    }

    fn parse_from_token(lexer: &mut Lexer<'_>, token: Token) -> ParseResult<Self> {
        match token {
            Token::Null => Ok(PdfObject::Null),
            Token::Boolean(b) => Ok(PdfObject::Boolean(b)),
            Token::Integer(i) => Self::parse_number_or_reference(lexer, i),
            Token::Real(r) => Ok(PdfObject::Real(r)),
            Token::String(s) => Ok(PdfObject::String(PdfString(s))),
            Token::Name(n) => Ok(PdfObject::Name(PdfName(n))),
            Token::ArrayStart => Self::parse_array(lexer),
            Token::DictStart => Self::parse_dictionary_or_stream(lexer),
            Token::Eof => Err(ParseError::SyntaxError {
                position: lexer.position(),
                message: "Unexpected end of input".to_string(),
            }),
            other => Err(ParseError::UnexpectedToken {
                expected: "PDF object".to_string(),
                found: format!("{other:?}"),
            }),
        }
    }

    /// `N G R` is an indirect reference; a lone integer is just an
    /// integer. Two tokens of lookahead with pushback.
    fn parse_number_or_reference(lexer: &mut Lexer<'_>, first: i64) -> ParseResult<Self> {
        let second = lexer.next_token()?;
        if let Token::Integer(generation) = second {
            let third = lexer.next_token()?;
            if third == Token::R && first >= 0 && generation >= 0 {
                return Ok(PdfObject::Reference(first as u32, generation as u16));
            }
            lexer.push_token(third);
            lexer.push_token(second);
        } else {
            lexer.push_token(second);
        }
        Ok(PdfObject::Integer(first))
    }

    fn parse_array(lexer: &mut Lexer<'_>) -> ParseResult<Self> {
        let mut elements = Vec::new();

        loop {
            let token = lexer.next_token()?;
            match token {
                Token::ArrayEnd => break,
                other => elements.push(Self::parse_from_token(lexer, other)?),
            }
        }

        Ok(PdfObject::Array(PdfArray(elements)))
    }

    fn parse_dictionary_or_stream(lexer: &mut Lexer<'_>) -> ParseResult<Self> {
        let mut dict = PdfDictionary::new();

        loop {
            let token = lexer.next_token()?;
            match token {
                Token::DictEnd => break,
                Token::Name(key) => {
                    let value = Self::parse(lexer)?;
                    dict.insert(key, value);
                }
                other => {
                    return Err(ParseError::UnexpectedToken {
                        expected: "dictionary key or >>".to_string(),
                        found: format!("{other:?}"),
                    })
                }
            }
        }

        // A stream keyword after the dictionary makes this a stream object
        let token = lexer.next_token()?;
        if token != Token::Stream {
            lexer.push_token(token);
            return Ok(PdfObject::Dictionary(dict));
        }

        let data = Self::parse_stream_data(lexer, &dict)?;
        Ok(PdfObject::Stream(PdfStream { dict, data }))
    }

    fn parse_stream_data(lexer: &mut Lexer<'_>, dict: &PdfDictionary) -> ParseResult<Vec<u8>> {
        lexer.read_newline();
        let mark = lexer.position();

        // Trust a direct Length; an indirect, missing or lying one falls
        // back to scanning for the endstream keyword.
        if let Some(PdfObject::Integer(length)) = dict.get("Length") {
            if *length >= 0 {
                if let Ok(data) = lexer.read_bytes(*length as usize) {
                    lexer.skip_whitespace();
                    if matches!(lexer.next_token(), Ok(Token::EndStream)) {
                        return Ok(data);
                    }
                }
                lexer.seek(mark);
            }
        }

        lexer.read_until_keyword(b"endstream")
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PdfObject::Null)
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            PdfObject::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_real(&self) -> Option<f64> {
        match self {
            PdfObject::Real(r) => Some(*r),
            PdfObject::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&PdfString> {
        match self {
            PdfObject::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_name(&self) -> Option<&PdfName> {
        match self {
            PdfObject::Name(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&PdfArray> {
        match self {
            PdfObject::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&PdfDictionary> {
        match self {
            PdfObject::Dictionary(d) => Some(d),
            PdfObject::Stream(s) => Some(&s.dict),
            _ => None,
        }
    }

    pub fn as_stream(&self) -> Option<&PdfStream> {
        match self {
            PdfObject::Stream(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<(u32, u16)> {
        match self {
            PdfObject::Reference(obj, gen) => Some((*obj, *gen)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &[u8]) -> PdfObject {
        let mut lexer = Lexer::new(input);
        PdfObject::parse(&mut lexer).unwrap()
    }

    #[test]
    fn test_parse_simple_objects() {
        assert_eq!(parse(b"null"), PdfObject::Null);
        assert_eq!(parse(b"true"), PdfObject::Boolean(true));
        assert_eq!(parse(b"123"), PdfObject::Integer(123));
        assert_eq!(parse(b"3.14"), PdfObject::Real(3.14));
        assert_eq!(
            parse(b"/Widget"),
            PdfObject::Name(PdfName("Widget".to_string()))
        );
        assert_eq!(
            parse(b"(Hello)"),
            PdfObject::String(PdfString(b"Hello".to_vec()))
        );
    }

    #[test]
    fn test_parse_reference_vs_integers() {
        assert_eq!(parse(b"12 0 R"), PdfObject::Reference(12, 0));

        // Three integers, no R: the array keeps all three
        let obj = parse(b"[1 2 3]");
        let array = obj.as_array().unwrap();
        assert_eq!(array.len(), 3);
        assert_eq!(array.get(2).unwrap().as_integer(), Some(3));

        // Mixed references and integers
        let obj = parse(b"[1 0 R 42]");
        let array = obj.as_array().unwrap();
        assert_eq!(array.len(), 2);
        assert_eq!(array.get(0).unwrap().as_reference(), Some((1, 0)));
        assert_eq!(array.get(1).unwrap().as_integer(), Some(42));
    }

    #[test]
    fn test_parse_dictionary() {
        let obj = parse(b"<< /Type /Page /Parent 1 0 R /MediaBox [0 0 595 842] >>");
        let dict = obj.as_dict().unwrap();

        assert_eq!(dict.get_type(), Some("Page"));
        assert_eq!(dict.get("Parent").unwrap().as_reference(), Some((1, 0)));
        assert_eq!(dict.get("MediaBox").unwrap().as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_parse_stream_with_length() {
        let obj = parse(b"<< /Length 5 >>\nstream\nABCDE\nendstream");
        let stream = obj.as_stream().unwrap();
        assert_eq!(stream.data, b"ABCDE");
        assert_eq!(stream.decode().unwrap(), b"ABCDE");
    }

    #[test]
    fn test_parse_stream_with_wrong_length() {
        // Length says 2, actual data runs to endstream
        let obj = parse(b"<< /Length 2 >>\nstream\nABCDE\nendstream");
        let stream = obj.as_stream().unwrap();
        assert_eq!(stream.data, b"ABCDE");
    }

    #[test]
    fn test_parse_stream_with_indirect_length() {
        let obj = parse(b"<< /Length 9 0 R >>\nstream\nABCDE\nendstream");
        let stream = obj.as_stream().unwrap();
        assert_eq!(stream.data, b"ABCDE");
    }

    #[test]
    fn test_nested_structures() {
        let obj = parse(b"<< /Kids [<< /A 1 >> << /B [2 3] >>] >>");
        let dict = obj.as_dict().unwrap();
        let kids = dict.get("Kids").unwrap().as_array().unwrap();
        assert_eq!(kids.len(), 2);
        assert!(kids.get(0).unwrap().as_dict().unwrap().contains_key("A"));
    }

    #[test]
    fn test_flate_stream_decode() {
        let mut stream = crate::objects::Stream::new(b"Hello stream".to_vec());
        stream.compress_flate().unwrap();

        let mut dict = PdfDictionary::new();
        dict.insert("Filter", PdfObject::Name(PdfName("FlateDecode".to_string())));
        let parsed = PdfStream {
            dict,
            data: stream.data().to_vec(),
        };
        assert_eq!(parsed.decode().unwrap(), b"Hello stream");
    }

    #[test]
    fn test_unsupported_filter_errors() {
        let mut dict = PdfDictionary::new();
        dict.insert("Filter", PdfObject::Name(PdfName("DCTDecode".to_string())));
        let stream = PdfStream {
            dict,
            data: vec![1, 2, 3],
        };
        assert!(stream.decode().is_err());
    }
}
