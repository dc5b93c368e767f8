//! Owned buffer of bytes received but not yet framed.
//!
//! Uses `bytes::BytesMut` so that completed documents can be split off the
//! front without copying. The cached `pending_length` always describes the
//! document at the current front of the buffer.

use bytes::{Buf, Bytes, BytesMut};

use super::wire_format::read_declared_length;

/// Default initial capacity (64 KiB).
pub const DEFAULT_CAPACITY: usize = 64 * 1024;

/// Retained bytes plus the declared length of the document being assembled.
#[derive(Debug)]
pub struct Accumulator {
    buffer: BytesMut,
    pending_length: Option<u32>,
}

impl Accumulator {
    /// Create an empty accumulator with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an empty accumulator with a custom initial capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
            pending_length: None,
        }
    }

    /// Append a chunk to the back of the buffer.
    #[inline]
    pub fn append(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
    }

    /// Retained bytes.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    /// Number of retained bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Declared length of the document at the front, if already read.
    #[inline]
    pub fn pending_length(&self) -> Option<u32> {
        self.pending_length
    }

    /// Cache the declared length of the document at the front.
    #[inline]
    pub fn set_pending_length(&mut self, length: u32) {
        debug_assert_eq!(
            read_declared_length(&self.buffer).map(|d| d as u32),
            Some(length)
        );
        self.pending_length = Some(length);
    }

    /// Detach the first `len` bytes and clear the pending length.
    ///
    /// # Panics
    ///
    /// Panics if `len > self.len()`.
    pub fn split_front(&mut self, len: usize) -> Bytes {
        self.pending_length = None;
        self.buffer.split_to(len).freeze()
    }

    /// Drop the first `len` bytes and clear the pending length.
    ///
    /// # Panics
    ///
    /// Panics if `len > self.len()`.
    pub fn advance(&mut self, len: usize) {
        self.pending_length = None;
        self.buffer.advance(len);
    }

    /// Discard everything. Returns the number of bytes dropped.
    pub fn reset(&mut self) -> usize {
        let dropped = self.buffer.len();
        self.buffer.clear();
        self.pending_length = None;
        dropped
    }
}

impl Default for Accumulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_order() {
        let mut acc = Accumulator::new();
        acc.append(&[1, 2]);
        acc.append(&[]);
        acc.append(&[3]);

        assert_eq!(acc.as_slice(), &[1, 2, 3]);
        assert_eq!(acc.len(), 3);
        assert_eq!(acc.pending_length(), None);
    }

    #[test]
    fn test_split_front_keeps_remainder() {
        let mut acc = Accumulator::with_capacity(8);
        acc.append(&[5, 0, 0, 0, 0, 9, 9]);
        acc.set_pending_length(5);

        let front = acc.split_front(5);

        assert_eq!(&front[..], &[5, 0, 0, 0, 0]);
        assert_eq!(acc.as_slice(), &[9, 9]);
        assert_eq!(acc.pending_length(), None);
    }

    #[test]
    fn test_advance_clears_pending() {
        let mut acc = Accumulator::new();
        acc.append(&[5, 0, 0, 0, 0, 7]);
        acc.set_pending_length(5);

        acc.advance(5);

        assert_eq!(acc.as_slice(), &[7]);
        assert_eq!(acc.pending_length(), None);
    }

    #[test]
    fn test_reset_discards_everything() {
        let mut acc = Accumulator::new();
        acc.append(&[6, 0, 0, 0, 1]);
        acc.set_pending_length(6);

        assert_eq!(acc.reset(), 5);
        assert!(acc.is_empty());
        assert_eq!(acc.pending_length(), None);
        assert_eq!(acc.reset(), 0);
    }
}
