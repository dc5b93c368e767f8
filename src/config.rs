//! Framer configuration.
//!
//! [`FramerConfig`] is the typed options structure. It can be built with the
//! `with_*` setters, deserialized with serde, or parsed from an untyped JSON
//! value with [`FramerConfig::from_json`], which applies the same checks a
//! dynamically typed caller would need.
//!
//! # Example
//!
//! ```
//! use bson_framer::FramerConfig;
//!
//! let config = FramerConfig::new()
//!     .with_emit_raw(true)
//!     .with_max_buffered_bytes(1024 * 1024);
//! assert!(config.validate().is_ok());
//!
//! let json = serde_json::json!({ "max_record_length": 4096 });
//! let config = FramerConfig::from_json(&json).unwrap();
//! assert_eq!(config.max_record_length, 4096);
//! ```

use serde::Deserialize;
use serde_json::Value;

use crate::error::{FramerError, Result};
use crate::protocol::{DEFAULT_MAX_DOCUMENT_LENGTH, PROTOCOL_MAX_DOCUMENT_LENGTH};

/// Options controlling a [`Framer`](crate::Framer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FramerConfig {
    /// Emit raw document bytes instead of decoded values.
    pub emit_raw: bool,
    /// Largest declared document length accepted.
    pub max_record_length: u32,
    /// Cap on retained plus incoming bytes per push. `None` is unbounded.
    pub max_buffered_bytes: Option<u64>,
}

impl Default for FramerConfig {
    fn default() -> Self {
        Self {
            emit_raw: false,
            max_record_length: DEFAULT_MAX_DOCUMENT_LENGTH,
            max_buffered_bytes: None,
        }
    }
}

impl FramerConfig {
    /// Create a configuration with default settings.
    ///
    /// Defaults: decoded emission, 16 MiB max document, unbounded buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether raw bytes are emitted.
    pub fn with_emit_raw(mut self, emit_raw: bool) -> Self {
        self.emit_raw = emit_raw;
        self
    }

    /// Set the maximum accepted document length.
    pub fn with_max_record_length(mut self, max_record_length: u32) -> Self {
        self.max_record_length = max_record_length;
        self
    }

    /// Cap the number of bytes the framer may retain.
    pub fn with_max_buffered_bytes(mut self, max_buffered_bytes: u64) -> Self {
        self.max_buffered_bytes = Some(max_buffered_bytes);
        self
    }

    /// Check the configuration against protocol limits.
    ///
    /// # Errors
    ///
    /// Returns [`FramerError::Config`] if `max_record_length` exceeds the
    /// signed 32-bit length field.
    pub fn validate(&self) -> Result<()> {
        if self.max_record_length > PROTOCOL_MAX_DOCUMENT_LENGTH {
            return Err(FramerError::Config(
                "max record length exceeds protocol limit".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a configuration from an untyped JSON value.
    ///
    /// Missing keys and `null` values fall back to defaults. A top-level
    /// `null` yields the default configuration. Unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`FramerError::Config`] if the value is not an object, if a
    /// known key has the wrong type, or if the result fails [`validate`].
    ///
    /// [`validate`]: FramerConfig::validate
    pub fn from_json(value: &Value) -> Result<Self> {
        let map = match value {
            Value::Null => return Ok(Self::default()),
            Value::Object(map) => map,
            _ => {
                return Err(FramerError::Config(
                    "configuration must be an object".to_string(),
                ))
            }
        };

        let mut config = Self::default();

        match map.get("emit_raw") {
            None | Some(Value::Null) => {}
            Some(Value::Bool(b)) => config.emit_raw = *b,
            Some(_) => {
                return Err(FramerError::Config(
                    "emit_raw must be a boolean".to_string(),
                ))
            }
        }

        if let Some(n) = optional_u64(map.get("max_record_length"), "max_record_length")? {
            if n > u64::from(PROTOCOL_MAX_DOCUMENT_LENGTH) {
                return Err(FramerError::Config(
                    "max record length exceeds protocol limit".to_string(),
                ));
            }
            // Bounded by the check above.
            config.max_record_length = n as u32;
        }

        if let Some(n) = optional_u64(map.get("max_buffered_bytes"), "max_buffered_bytes")? {
            config.max_buffered_bytes = Some(n);
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`FramerError::Config`] on malformed JSON or on any error
    /// [`from_json`](FramerConfig::from_json) reports.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(s)
            .map_err(|e| FramerError::Config(format!("malformed configuration: {}", e)))?;
        Self::from_json(&value)
    }
}

fn optional_u64(value: Option<&Value>, key: &str) -> Result<Option<u64>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_u64().map(Some).ok_or_else(|| {
            FramerError::Config(format!("{} must be a non-negative integer", key))
        }),
        Some(_) => Err(FramerError::Config(format!("{} must be a number", key))),
    }
}
