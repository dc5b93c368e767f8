//! Async adapter pulling documents out of any `AsyncRead`.
//!
//! Reads chunks from the source, pushes them through a [`Framer`] and hands
//! documents out one at a time. EOF is end-of-stream: a trailing partial
//! document is dropped silently.
//!
//! # Example
//!
//! ```ignore
//! use bson_framer::{DocumentReader, FramerConfig};
//!
//! let file = tokio::fs::File::open("dump.bson").await?;
//! let mut reader = DocumentReader::documents(file, FramerConfig::default())?;
//!
//! while let Some(result) = reader.next_record().await {
//!     match result {
//!         Ok(record) => println!("{:?}", record),
//!         Err(e) if e.is_fatal() => return Err(e.into()),
//!         Err(e) => eprintln!("skipping: {}", e),
//!     }
//! }
//! ```

use std::collections::VecDeque;

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::codec::{DocumentCodec, RecordCodec};
use crate::config::FramerConfig;
use crate::error::{FramerError, Result};
use crate::protocol::{Framer, Record};

/// Default size of a single read from the source (64 KiB).
pub const DEFAULT_READ_BUFFER_SIZE: usize = 64 * 1024;

/// Pull-style document stream over an async byte source.
pub struct DocumentReader<R, C: RecordCodec = DocumentCodec> {
    reader: R,
    framer: Framer<C>,
    read_buf: Vec<u8>,
    ready: VecDeque<Record<C::Value>>,
    pending_error: Option<FramerError>,
    done: bool,
}

impl<R: AsyncRead + Unpin> DocumentReader<R, DocumentCodec> {
    /// Create a reader emitting [`bson::Document`] values (or raw bytes).
    ///
    /// # Errors
    ///
    /// Returns [`FramerError::Config`] if the configuration is invalid.
    pub fn documents(reader: R, config: FramerConfig) -> Result<Self> {
        Self::new(reader, DocumentCodec, config)
    }
}

impl<R: AsyncRead + Unpin, C: RecordCodec> DocumentReader<R, C> {
    /// Create a reader with an explicit codec.
    ///
    /// # Errors
    ///
    /// Returns [`FramerError::Config`] if the configuration is invalid.
    pub fn new(reader: R, codec: C, config: FramerConfig) -> Result<Self> {
        Ok(Self {
            reader,
            framer: Framer::new(codec, config)?,
            read_buf: vec![0u8; DEFAULT_READ_BUFFER_SIZE],
            ready: VecDeque::new(),
            pending_error: None,
            done: false,
        })
    }

    /// Change the size of a single read. Zero is treated as one.
    pub fn with_read_buffer_size(mut self, size: usize) -> Self {
        self.read_buf = vec![0u8; size.max(1)];
        self
    }

    /// Next document or error, or `None` at end of stream.
    ///
    /// Non-fatal framing errors are yielded and reading continues on the next
    /// call. After a fatal error (buffer limit, I/O) the stream ends.
    pub async fn next_record(&mut self) -> Option<Result<Record<C::Value>>> {
        loop {
            if let Some(record) = self.ready.pop_front() {
                return Some(Ok(record));
            }

            if let Some(err) = self.pending_error.take() {
                if err.is_fatal() {
                    self.done = true;
                }
                return Some(Err(err));
            }

            if self.done {
                return None;
            }

            let n = match self.reader.read(&mut self.read_buf).await {
                Ok(0) => {
                    self.framer.finish();
                    self.done = true;
                    continue;
                }
                Ok(n) => n,
                Err(e) => {
                    self.done = true;
                    return Some(Err(FramerError::Io(e)));
                }
            };

            if let Err(e) = self.framer.push(&self.read_buf[..n], &mut self.ready) {
                self.pending_error = Some(e);
            }
        }
    }

    /// The framer driving this reader.
    pub fn framer(&self) -> &Framer<C> {
        &self.framer
    }

    /// Unwrap the underlying source. Buffered bytes are lost.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::{doc, Document};
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tokio::io::ReadBuf;

    fn stream_of(documents: &[Document]) -> Vec<u8> {
        let mut bytes = Vec::new();
        for document in documents {
            bytes.extend(DocumentCodec::encode(document).unwrap());
        }
        bytes
    }

    async fn drain<R: AsyncRead + Unpin>(
        reader: &mut DocumentReader<R>,
    ) -> (Vec<Document>, Vec<FramerError>) {
        let mut documents = Vec::new();
        let mut errors = Vec::new();
        while let Some(result) = reader.next_record().await {
            match result {
                Ok(record) => documents.push(record.into_decoded().unwrap()),
                Err(e) => errors.push(e),
            }
        }
        (documents, errors)
    }

    struct FailingReader;

    impl AsyncRead for FailingReader {
        fn poll_read(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &mut ReadBuf<'_>,
        ) -> Poll<std::io::Result<()>> {
            Poll::Ready(Err(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "source went away",
            )))
        }
    }

    #[tokio::test]
    async fn test_reads_all_documents_in_small_chunks() {
        let originals = vec![doc! { "i": 0 }, doc! { "i": 1, "s": "x" }, doc! {}];
        let bytes = stream_of(&originals);

        let mut reader = DocumentReader::documents(&bytes[..], FramerConfig::default())
            .unwrap()
            .with_read_buffer_size(3);
        let (documents, errors) = drain(&mut reader).await;

        assert!(errors.is_empty());
        assert_eq!(documents, originals);
        assert!(reader.framer().is_closed());
    }

    #[tokio::test]
    async fn test_trailing_partial_document_is_silent() {
        let mut bytes = stream_of(&[doc! { "whole": true }]);
        let partial = stream_of(&[doc! { "cut": "off" }]);
        bytes.extend_from_slice(&partial[..partial.len() - 2]);

        let mut reader = DocumentReader::documents(&bytes[..], FramerConfig::default()).unwrap();
        let (documents, errors) = drain(&mut reader).await;

        assert_eq!(documents, vec![doc! { "whole": true }]);
        assert!(errors.is_empty());
    }

    #[tokio::test]
    async fn test_non_fatal_error_then_continues() {
        let good = stream_of(&[doc! { "after": 1 }]);
        let mut bytes = vec![0x05, 0x00, 0x00, 0x00, 0x01];
        bytes.extend_from_slice(&good);

        // Reads line up with the bad document, so it is rejected before the
        // good one is buffered.
        let mut reader = DocumentReader::documents(&bytes[..], FramerConfig::default())
            .unwrap()
            .with_read_buffer_size(5);
        let (documents, errors) = drain(&mut reader).await;

        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], FramerError::InvalidTermination { .. }));
        assert_eq!(documents, vec![doc! { "after": 1 }]);
    }

    #[tokio::test]
    async fn test_fatal_error_ends_stream() {
        let bytes = stream_of(&[doc! { "a": 1 }, doc! { "b": 2 }]);
        let config = FramerConfig::new().with_max_buffered_bytes(4);

        let mut reader = DocumentReader::documents(&bytes[..], config).unwrap();
        let (documents, errors) = drain(&mut reader).await;

        assert!(documents.is_empty());
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], FramerError::BufferLimitExceeded { .. }));
    }

    #[tokio::test]
    async fn test_io_error_is_reported_once() {
        let mut reader = DocumentReader::documents(FailingReader, FramerConfig::default()).unwrap();

        let first = reader.next_record().await;
        assert!(matches!(first, Some(Err(FramerError::Io(_)))));
        assert!(reader.next_record().await.is_none());
    }

    #[tokio::test]
    async fn test_raw_mode() {
        let bytes = stream_of(&[doc! { "r": 1 }]);
        let config = FramerConfig::new().with_emit_raw(true);

        let mut reader = DocumentReader::documents(&bytes[..], config).unwrap();
        let record = reader.next_record().await.unwrap().unwrap();

        assert_eq!(&record.into_raw().unwrap()[..], &bytes[..]);
        assert!(reader.next_record().await.is_none());
    }
}
