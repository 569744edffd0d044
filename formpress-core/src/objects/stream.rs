use crate::error::{FormError, Result};
use crate::objects::Dictionary;
use std::io::{Read, Write};

#[derive(Debug, Clone)]
pub struct Stream {
    dictionary: Dictionary,
    data: Vec<u8>,
}

impl Stream {
    pub fn new(data: Vec<u8>) -> Self {
        let mut dictionary = Dictionary::new();
        dictionary.set("Length", data.len() as i64);

        Self { dictionary, data }
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn compress_flate(&mut self) -> Result<()> {
        use flate2::write::ZlibEncoder;
        use flate2::Compression;

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(&self.data)
            .map_err(|e| FormError::EncodingError(e.to_string()))?;
        let compressed = encoder
            .finish()
            .map_err(|e| FormError::EncodingError(e.to_string()))?;

        self.data = compressed;
        self.dictionary.set("Length", self.data.len() as i64);
        self.dictionary
            .set("Filter", crate::objects::Object::Name("FlateDecode".into()));

        Ok(())
    }
}

/// Inflate FlateDecode stream data.
pub(crate) fn decompress_flate(data: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = flate2::read::ZlibDecoder::new(data);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|e| FormError::EncodingError(e.to_string()))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::Object;

    #[test]
    fn test_stream_new() {
        let data = vec![1, 2, 3, 4, 5];
        let stream = Stream::new(data.clone());

        assert_eq!(stream.data(), &data);
        assert_eq!(stream.dictionary().get("Length"), Some(&Object::Integer(5)));
    }

    #[test]
    fn test_compress_roundtrip() {
        let original = "BT /Helv 12 Tf 50 762 Td (Hello) Tj ET\n"
            .repeat(8)
            .into_bytes();
        let mut stream = Stream::new(original.clone());

        stream.compress_flate().unwrap();
        assert_ne!(stream.data(), &original[..]);
        assert_eq!(
            stream.dictionary().get("Filter"),
            Some(&Object::Name("FlateDecode".to_string()))
        );
        assert_eq!(
            stream.dictionary().get("Length"),
            Some(&Object::Integer(stream.data().len() as i64))
        );

        let restored = decompress_flate(stream.data()).unwrap();
        assert_eq!(restored, original);
    }
}
