//! Dynamic document codec backed by the `bson` crate.

use bson::Document;

use super::RecordCodec;
use crate::error::Result;

/// Codec producing [`bson::Document`] values.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentCodec;

impl DocumentCodec {
    /// Encode a document to its wire bytes.
    ///
    /// # Errors
    ///
    /// Returns error if the document cannot be serialized.
    pub fn encode(document: &Document) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        document.to_writer(&mut buf)?;
        Ok(buf)
    }
}

impl RecordCodec for DocumentCodec {
    type Value = Document;
    type Error = bson::de::Error;

    #[inline]
    fn decode(&self, record: &[u8]) -> std::result::Result<Document, bson::de::Error> {
        Document::from_reader(record)
    }
}
