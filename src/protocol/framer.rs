//! Incremental document framer.
//!
//! Accepts chunks of arbitrary size and alignment, and emits every complete
//! document as soon as its last byte arrives. Per push, extraction runs until
//! no further document can be completed:
//!
//! 1. read the 4-byte declared length (cached as `pending_length`)
//! 2. reject lengths below 5 or above `max_record_length`
//! 3. wait until the whole document is buffered
//! 4. require the final byte to be `0x00`
//! 5. decode with the [`RecordCodec`] and emit to the [`RecordSink`]
//!
//! Any framing or codec error discards *everything* buffered, including
//! complete documents that follow the bad one. There is no resynchronization.
//!
//! # Example
//!
//! ```
//! use bson::doc;
//! use bson_framer::codec::DocumentCodec;
//! use bson_framer::{Framer, FramerConfig, Record};
//!
//! let mut framer = Framer::new(DocumentCodec, FramerConfig::default()).unwrap();
//! let bytes = DocumentCodec::encode(&doc! { "n": 1 }).unwrap();
//!
//! let mut records = Vec::new();
//! framer.push(&bytes[..3], &mut records).unwrap();
//! assert!(records.is_empty());
//!
//! framer.push(&bytes[3..], &mut records).unwrap();
//! match &records[0] {
//!     Record::Decoded(document) => assert_eq!(document.get_i32("n").unwrap(), 1),
//!     Record::Raw(_) => unreachable!(),
//! }
//! ```

use std::collections::VecDeque;

use bytes::Bytes;

use super::accumulator::Accumulator;
use super::wire_format::{
    read_declared_length, validate_declared_length, DOCUMENT_TERMINATOR, LENGTH_PREFIX_SIZE,
};
use crate::codec::{DocumentCodec, RecordCodec};
use crate::config::FramerConfig;
use crate::error::{FramerError, Result};

/// One emitted document.
#[derive(Debug, Clone, PartialEq)]
pub enum Record<V> {
    /// Exact wire bytes of the document (prefix and terminator included).
    Raw(Bytes),
    /// Value produced by the record codec.
    Decoded(V),
}

impl<V> Record<V> {
    /// Raw bytes, if this record was emitted raw.
    pub fn as_raw(&self) -> Option<&Bytes> {
        match self {
            Record::Raw(bytes) => Some(bytes),
            Record::Decoded(_) => None,
        }
    }

    /// Decoded value, if this record was emitted decoded.
    pub fn as_decoded(&self) -> Option<&V> {
        match self {
            Record::Raw(_) => None,
            Record::Decoded(value) => Some(value),
        }
    }

    pub fn into_raw(self) -> Option<Bytes> {
        match self {
            Record::Raw(bytes) => Some(bytes),
            Record::Decoded(_) => None,
        }
    }

    pub fn into_decoded(self) -> Option<V> {
        match self {
            Record::Raw(_) => None,
            Record::Decoded(value) => Some(value),
        }
    }
}

/// Consumer of emitted documents.
///
/// Implemented for `Vec<Record<V>>`, `VecDeque<Record<V>>` and any
/// `FnMut(Record<V>)` closure.
pub trait RecordSink<V> {
    /// Receive one document. Called synchronously from [`Framer::push`].
    fn emit(&mut self, record: Record<V>);
}

impl<V> RecordSink<V> for Vec<Record<V>> {
    #[inline]
    fn emit(&mut self, record: Record<V>) {
        self.push(record);
    }
}

impl<V> RecordSink<V> for VecDeque<Record<V>> {
    #[inline]
    fn emit(&mut self, record: Record<V>) {
        self.push_back(record);
    }
}

impl<V, F: FnMut(Record<V>)> RecordSink<V> for F {
    #[inline]
    fn emit(&mut self, record: Record<V>) {
        self(record)
    }
}

/// Stateful framer turning a chunked byte stream into documents.
///
/// Exclusively owns its buffered bytes. Not internally synchronized; share
/// it across threads only behind your own lock.
#[derive(Debug)]
pub struct Framer<C: RecordCodec = DocumentCodec> {
    accumulator: Accumulator,
    codec: C,
    config: FramerConfig,
    closed: bool,
}

impl Framer<DocumentCodec> {
    /// Create a framer emitting [`bson::Document`] values (or raw bytes).
    ///
    /// # Errors
    ///
    /// Returns [`FramerError::Config`] if the configuration is invalid.
    pub fn documents(config: FramerConfig) -> Result<Self> {
        Self::new(DocumentCodec, config)
    }
}

impl<C: RecordCodec> Framer<C> {
    /// Create a framer with an explicit codec.
    ///
    /// # Errors
    ///
    /// Returns [`FramerError::Config`] if the configuration is invalid.
    pub fn new(codec: C, config: FramerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            accumulator: Accumulator::new(),
            codec,
            config,
            closed: false,
        })
    }

    /// Accept a chunk and emit every document it completes.
    ///
    /// Documents completed before an error are emitted before the error is
    /// returned. At most one error is returned per call.
    ///
    /// # Errors
    ///
    /// - [`FramerError::BufferLimitExceeded`] if retained plus incoming bytes
    ///   exceed `max_buffered_bytes`. The chunk is not appended and the
    ///   framer is closed.
    /// - [`FramerError::InvalidLength`], [`FramerError::DocumentTooLarge`],
    ///   [`FramerError::InvalidTermination`] or [`FramerError::Codec`] on a
    ///   bad document. All buffered bytes are discarded; the framer stays
    ///   usable.
    /// - [`FramerError::Closed`] after a fatal error or [`finish`](Self::finish).
    pub fn push<S>(&mut self, chunk: &[u8], sink: &mut S) -> Result<()>
    where
        S: RecordSink<C::Value> + ?Sized,
    {
        if self.closed {
            return Err(FramerError::Closed);
        }

        if let Some(max) = self.config.max_buffered_bytes {
            let attempted = self.accumulator.len() as u64 + chunk.len() as u64;
            if attempted > max {
                self.closed = true;
                tracing::error!(attempted, max, "buffer limit exceeded, closing framer");
                return Err(FramerError::BufferLimitExceeded { attempted, max });
            }
        }

        self.accumulator.append(chunk);
        self.extract(sink)
    }

    /// Like [`push`](Self::push) but collects emissions into a vector.
    pub fn push_collect(&mut self, chunk: &[u8]) -> (Vec<Record<C::Value>>, Option<FramerError>) {
        let mut records = Vec::new();
        let err = self.push(chunk, &mut records).err();
        (records, err)
    }

    /// Signal end-of-stream.
    ///
    /// A trailing partial document is dropped without error. Returns the
    /// number of bytes dropped. The framer is closed afterwards.
    pub fn finish(&mut self) -> usize {
        self.closed = true;
        let dropped = self.accumulator.reset();
        if dropped > 0 {
            tracing::debug!(dropped, "end of stream, dropping incomplete document");
        }
        dropped
    }

    /// Run extraction until more input is needed or an error occurs.
    fn extract<S>(&mut self, sink: &mut S) -> Result<()>
    where
        S: RecordSink<C::Value> + ?Sized,
    {
        loop {
            let length = match self.accumulator.pending_length() {
                Some(length) => length,
                None => {
                    let Some(declared) = read_declared_length(self.accumulator.as_slice()) else {
                        return Ok(());
                    };
                    match validate_declared_length(declared, self.config.max_record_length) {
                        Ok(length) => {
                            self.accumulator.set_pending_length(length);
                            length
                        }
                        Err(e) => return Err(self.reset(e)),
                    }
                }
            };

            let length = length as usize;
            if self.accumulator.len() < length {
                return Ok(());
            }

            let found = self.accumulator.as_slice()[length - 1];
            if found != DOCUMENT_TERMINATOR {
                return Err(self.reset(FramerError::InvalidTermination { found }));
            }

            let value = match self.codec.decode(&self.accumulator.as_slice()[..length]) {
                Ok(value) => value,
                Err(e) => return Err(self.reset(FramerError::Codec(Box::new(e)))),
            };

            let record = if self.config.emit_raw {
                Record::Raw(self.accumulator.split_front(length))
            } else {
                self.accumulator.advance(length);
                Record::Decoded(value)
            };
            tracing::trace!(length, remaining = self.accumulator.len(), "document framed");
            sink.emit(record);

            if self.accumulator.len() <= LENGTH_PREFIX_SIZE {
                return Ok(());
            }
        }
    }

    /// Discard all buffered bytes and hand back `err`.
    fn reset(&mut self, err: FramerError) -> FramerError {
        let dropped = self.accumulator.reset();
        tracing::warn!(error = %err, dropped, "framing error, discarding buffered bytes");
        err
    }

    /// Number of bytes currently retained.
    #[inline]
    pub fn buffered_len(&self) -> usize {
        self.accumulator.len()
    }

    /// Declared length of the document being assembled, once known.
    #[inline]
    pub fn pending_length(&self) -> Option<u32> {
        self.accumulator.pending_length()
    }

    /// Whether the framer still accepts chunks.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn config(&self) -> &FramerConfig {
        &self.config
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }
}
