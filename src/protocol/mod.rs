//! Protocol module - wire format, accumulation and framing.
//!
//! This module implements document de-framing:
//! - 4-byte little-endian length prefix and `0x00` terminator
//! - Accumulator for bytes spanning several chunks
//! - Framer state machine emitting complete documents

mod accumulator;
mod framer;
mod wire_format;

pub use accumulator::{Accumulator, DEFAULT_CAPACITY};
pub use framer::{Framer, Record, RecordSink};
pub use wire_format::{
    build_record, build_record_into, read_declared_length, validate_declared_length,
    DEFAULT_MAX_DOCUMENT_LENGTH, DOCUMENT_TERMINATOR, LENGTH_PREFIX_SIZE, MIN_DOCUMENT_LENGTH,
    PROTOCOL_MAX_DOCUMENT_LENGTH,
};
