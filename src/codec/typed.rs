//! Typed codec: documents deserialized straight into user structs.

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::RecordCodec;
use crate::error::Result;

/// Codec deserializing each document into `T`.
pub struct SerdeCodec<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> SerdeCodec<T> {
    /// Create a codec for `T`.
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T: Serialize> SerdeCodec<T> {
    /// Encode a value to document wire bytes.
    ///
    /// # Errors
    ///
    /// Returns error if `T` does not serialize to a document.
    pub fn encode(value: &T) -> Result<Vec<u8>> {
        Ok(bson::to_vec(value)?)
    }
}

impl<T> Default for SerdeCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for SerdeCodec<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> Copy for SerdeCodec<T> {}

impl<T> fmt::Debug for SerdeCodec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerdeCodec")
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T: DeserializeOwned> RecordCodec for SerdeCodec<T> {
    type Value = T;
    type Error = bson::de::Error;

    #[inline]
    fn decode(&self, record: &[u8]) -> std::result::Result<T, bson::de::Error> {
        bson::from_slice(record)
    }
}
