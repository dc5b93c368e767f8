//! Error types for bson-framer.

use thiserror::Error;

/// Boxed error produced by a [`RecordCodec`](crate::codec::RecordCodec).
pub type CodecError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for all framing operations.
#[derive(Debug, Error)]
pub enum FramerError {
    /// Invalid construction arguments. Nothing is processed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Declared document length is below the 5-byte minimum.
    #[error("invalid document length")]
    InvalidLength {
        /// Length prefix as read from the wire.
        declared: i32,
    },

    /// Declared document length exceeds `max_record_length`.
    #[error("document exceeds configured maximum length")]
    DocumentTooLarge {
        /// Length prefix as read from the wire.
        declared: i32,
        /// Configured limit.
        max: u32,
    },

    /// Retained plus incoming bytes exceed `max_buffered_bytes`.
    ///
    /// The offending chunk is rejected and the framer is closed.
    #[error("more than max_buffered_bytes received")]
    BufferLimitExceeded {
        /// Bytes that would have been retained after the append.
        attempted: u64,
        /// Configured limit.
        max: u64,
    },

    /// The last byte of a document is not `0x00`.
    #[error("invalid document termination")]
    InvalidTermination {
        /// Byte found where the terminator was expected.
        found: u8,
    },

    /// The record codec rejected a complete document.
    #[error(transparent)]
    Codec(CodecError),

    /// BSON serialization error while building a document.
    #[error("BSON encode error: {0}")]
    Encode(#[from] bson::ser::Error),

    /// The framer was closed by a fatal error or by end-of-stream.
    #[error("framer is closed")]
    Closed,

    /// I/O error while reading from the byte source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FramerError {
    /// Either of the two limit kinds: per-document or per-stream.
    pub fn is_limit_exceeded(&self) -> bool {
        matches!(
            self,
            FramerError::DocumentTooLarge { .. } | FramerError::BufferLimitExceeded { .. }
        )
    }

    /// Whether the framer stops accepting chunks after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            FramerError::Config(_)
                | FramerError::BufferLimitExceeded { .. }
                | FramerError::Closed
                | FramerError::Io(_)
        )
    }

    /// Borrow the codec error as its concrete type, if it is one.
    pub fn codec_error<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            FramerError::Codec(e) => e.downcast_ref::<E>(),
            _ => None,
        }
    }
}

/// Result type alias using FramerError.
pub type Result<T> = std::result::Result<T, FramerError>;
