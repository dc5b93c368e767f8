//! # bson-framer
//!
//! Incremental de-framing of BSON document streams.
//!
//! Bytes arrive in chunks of any size and alignment (file reads, socket
//! reads). The [`Framer`] buffers them, locates document boundaries from the
//! 4-byte little-endian length prefix, validates length and terminator, and
//! emits each complete document either as raw bytes or decoded by a
//! [`RecordCodec`](codec::RecordCodec).
//!
//! ## Architecture
//!
//! - **Accumulator**: owned buffer of bytes not yet framed
//! - **Framer**: extraction state machine, emitting into a [`RecordSink`]
//! - **Codec**: decodes one complete document (`bson` backed)
//! - **Reader**: async adapter over `tokio::io::AsyncRead`
//!
//! ## Example
//!
//! ```
//! use bson::doc;
//! use bson_framer::codec::DocumentCodec;
//! use bson_framer::{Framer, FramerConfig};
//!
//! let mut stream = DocumentCodec::encode(&doc! { "a": 1 }).unwrap();
//! stream.extend(DocumentCodec::encode(&doc! { "b": 2 }).unwrap());
//!
//! let mut framer = Framer::documents(FramerConfig::default()).unwrap();
//! let mut records = Vec::new();
//! for chunk in stream.chunks(3) {
//!     framer.push(chunk, &mut records).unwrap();
//! }
//! framer.finish();
//!
//! assert_eq!(records.len(), 2);
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod protocol;

mod reader;

pub use config::FramerConfig;
pub use error::{FramerError, Result};
pub use protocol::{Framer, Record, RecordSink};
pub use reader::{DocumentReader, DEFAULT_READ_BUFFER_SIZE};
