//! Wire format of a framed document.
//!
//! ```text
//! ┌──────────────┬──────────────────────┬────────────┐
//! │ Length       │ Elements             │ Terminator │
//! │ 4 bytes      │ length - 5 bytes     │ 1 byte     │
//! │ int32 LE     │ (opaque to framing)  │ 0x00       │
//! └──────────────┴──────────────────────┴────────────┘
//! ```
//!
//! The length counts the whole document, prefix and terminator included.

use crate::error::{FramerError, Result};

/// Size of the length prefix in bytes.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Smallest legal document: length prefix plus terminator.
pub const MIN_DOCUMENT_LENGTH: i32 = 5;

/// Default maximum document length (16 MiB).
pub const DEFAULT_MAX_DOCUMENT_LENGTH: u32 = 16_777_216;

/// Largest length the signed 32-bit prefix can declare.
pub const PROTOCOL_MAX_DOCUMENT_LENGTH: u32 = i32::MAX as u32;

/// Byte that must end every document.
pub const DOCUMENT_TERMINATOR: u8 = 0x00;

/// Read the declared length from the front of `buf`.
///
/// Returns `None` if fewer than [`LENGTH_PREFIX_SIZE`] bytes are available.
///
/// # Example
///
/// ```
/// use bson_framer::protocol::read_declared_length;
///
/// assert_eq!(read_declared_length(&[0x05, 0, 0, 0, 0]), Some(5));
/// assert_eq!(read_declared_length(&[0xFF, 0xFF, 0xFF, 0xFF]), Some(-1));
/// assert_eq!(read_declared_length(&[0x05, 0]), None);
/// ```
#[inline]
pub fn read_declared_length(buf: &[u8]) -> Option<i32> {
    let prefix: [u8; LENGTH_PREFIX_SIZE] = buf.get(..LENGTH_PREFIX_SIZE)?.try_into().ok()?;
    Some(i32::from_le_bytes(prefix))
}

/// Check a declared length against the protocol minimum and `max_length`.
///
/// Returns the length as `u32` on success.
///
/// # Errors
///
/// - [`FramerError::InvalidLength`] if below [`MIN_DOCUMENT_LENGTH`]
/// - [`FramerError::DocumentTooLarge`] if above `max_length`
pub fn validate_declared_length(declared: i32, max_length: u32) -> Result<u32> {
    if declared < MIN_DOCUMENT_LENGTH {
        return Err(FramerError::InvalidLength { declared });
    }

    // Non-negative after the minimum check.
    let length = declared as u32;
    if length > max_length {
        return Err(FramerError::DocumentTooLarge {
            declared,
            max: max_length,
        });
    }

    Ok(length)
}

/// Wrap an encoded element list in document framing.
///
/// # Panics
///
/// Panics if the framed length would not fit the signed 32-bit prefix.
///
/// # Example
///
/// ```
/// use bson_framer::protocol::build_record;
///
/// assert_eq!(build_record(&[]), vec![0x05, 0, 0, 0, 0]);
/// ```
pub fn build_record(elements: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(elements.len() + LENGTH_PREFIX_SIZE + 1);
    build_record_into(elements, &mut buf);
    buf
}

/// Append a framed document holding `elements` to `buf`.
///
/// # Panics
///
/// Panics if the framed length would not fit the signed 32-bit prefix.
pub fn build_record_into(elements: &[u8], buf: &mut Vec<u8>) {
    let total = elements.len() + LENGTH_PREFIX_SIZE + 1;
    let length = i32::try_from(total).expect("document length exceeds i32::MAX");

    buf.reserve(total);
    buf.extend_from_slice(&length.to_le_bytes());
    buf.extend_from_slice(elements);
    buf.push(DOCUMENT_TERMINATOR);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(LENGTH_PREFIX_SIZE, 4);
        assert_eq!(MIN_DOCUMENT_LENGTH, 5);
        assert_eq!(DEFAULT_MAX_DOCUMENT_LENGTH, 16 * 1024 * 1024);
        assert_eq!(PROTOCOL_MAX_DOCUMENT_LENGTH, 2_147_483_647);
    }

    #[test]
    fn test_read_declared_length_little_endian() {
        assert_eq!(read_declared_length(&[0x10, 0x00, 0x00, 0x00]), Some(16));
        assert_eq!(read_declared_length(&[0x00, 0x01, 0x00, 0x00]), Some(256));
        assert_eq!(
            read_declared_length(&[0xFF, 0xFF, 0xFF, 0x7F]),
            Some(i32::MAX)
        );
        assert_eq!(
            read_declared_length(&[0x00, 0x00, 0x00, 0x80]),
            Some(i32::MIN)
        );
    }

    #[test]
    fn test_read_declared_length_ignores_trailing_bytes() {
        assert_eq!(read_declared_length(&[0x07, 0, 0, 0, 0xAA, 0xBB]), Some(7));
    }

    #[test]
    fn test_read_declared_length_short_buffer() {
        assert_eq!(read_declared_length(&[]), None);
        assert_eq!(read_declared_length(&[0x05, 0x00, 0x00]), None);
    }

    #[test]
    fn test_validate_declared_length() {
        assert_eq!(validate_declared_length(5, 100).unwrap(), 5);
        assert_eq!(validate_declared_length(100, 100).unwrap(), 100);

        assert!(matches!(
            validate_declared_length(4, 100),
            Err(FramerError::InvalidLength { declared: 4 })
        ));
        assert!(matches!(
            validate_declared_length(-1, 100),
            Err(FramerError::InvalidLength { declared: -1 })
        ));
        assert!(matches!(
            validate_declared_length(101, 100),
            Err(FramerError::DocumentTooLarge {
                declared: 101,
                max: 100
            })
        ));
    }

    #[test]
    fn test_build_record() {
        let record = build_record(&[0x0A, b'a', 0x00]);
        assert_eq!(record, vec![0x08, 0, 0, 0, 0x0A, b'a', 0x00, 0x00]);
        assert_eq!(read_declared_length(&record), Some(record.len() as i32));
    }

    #[test]
    fn test_build_record_into_appends() {
        let mut buf = vec![0xEE];
        build_record_into(&[], &mut buf);
        build_record_into(&[], &mut buf);
        assert_eq!(buf, vec![0xEE, 5, 0, 0, 0, 0, 5, 0, 0, 0, 0]);
    }
}
