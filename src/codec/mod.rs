//! Codec module - decoding of complete documents.
//!
//! The framer hands each complete, terminator-checked document to a
//! [`RecordCodec`]. Two codecs are provided:
//!
//! - [`DocumentCodec`] - decodes into a dynamic [`bson::Document`]
//! - [`SerdeCodec`] - decodes into any `T: DeserializeOwned` via `bson::from_slice`
//!
//! # Example
//!
//! ```
//! use bson::doc;
//! use bson_framer::codec::{DocumentCodec, RecordCodec, SerdeCodec};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! let bytes = DocumentCodec::encode(&doc! { "x": 1, "y": 2 }).unwrap();
//!
//! let document = DocumentCodec.decode(&bytes).unwrap();
//! assert_eq!(document.get_i32("x").unwrap(), 1);
//!
//! let point = SerdeCodec::<Point>::new().decode(&bytes).unwrap();
//! assert_eq!(point, Point { x: 1, y: 2 });
//! ```

mod document;
mod typed;

pub use document::DocumentCodec;
pub use typed::SerdeCodec;

/// Decoder for one complete, framed document.
///
/// `record` is always the exact byte range of a single document: length
/// prefix, elements and terminator.
pub trait RecordCodec {
    /// Decoded value type.
    type Value;
    /// Error reported for undecodable documents.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Decode one document.
    fn decode(&self, record: &[u8]) -> std::result::Result<Self::Value, Self::Error>;
}

impl<C: RecordCodec + ?Sized> RecordCodec for &C {
    type Value = C::Value;
    type Error = C::Error;

    #[inline]
    fn decode(&self, record: &[u8]) -> std::result::Result<Self::Value, Self::Error> {
        (**self).decode(record)
    }
}
