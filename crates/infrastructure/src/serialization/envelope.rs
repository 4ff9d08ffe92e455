//! The `{"state": ..., "version": 0}` wrapper around each storage entry.
//!
//! Output is deterministic: 2-space indentation and a trailing newline.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::ser::{PrettyFormatter, Serializer};

/// Schema version written into every entry.
pub const STATE_VERSION: u32 = 0;

/// Error type for storage entry encoding.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// JSON serialization failed.
    #[error("JSON serialization failed: {0}")]
    Serialize(serde_json::Error),

    /// The entry is not valid JSON or does not hold the expected state.
    #[error("malformed storage entry: {0}")]
    Deserialize(serde_json::Error),

    /// The entry was written by an incompatible schema.
    #[error("unsupported storage version {found}, expected {STATE_VERSION}")]
    UnsupportedVersion {
        /// Version found in the entry.
        found: u32,
    },
}

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    state: &'a T,
    version: u32,
}

#[derive(Deserialize)]
struct Envelope<T> {
    state: T,
    #[serde(default)]
    version: u32,
}

/// Wraps `state` in the storage envelope.
///
/// # Errors
///
/// Returns an error if `state` cannot be serialized.
pub fn encode_state<T: Serialize>(state: &T) -> Result<Vec<u8>, SerializationError> {
    let envelope = EnvelopeRef {
        state,
        version: STATE_VERSION,
    };
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"  ");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    envelope
        .serialize(&mut serializer)
        .map_err(SerializationError::Serialize)?;
    buffer.push(b'\n');
    Ok(buffer)
}

/// Unwraps the state from a storage envelope.
///
/// # Errors
///
/// Returns an error for malformed JSON, a missing `state` or a version
/// other than [`STATE_VERSION`].
pub fn decode_state<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SerializationError> {
    let envelope: Envelope<T> =
        serde_json::from_slice(bytes).map_err(SerializationError::Deserialize)?;
    if envelope.version != STATE_VERSION {
        return Err(SerializationError::UnsupportedVersion {
            found: envelope.version,
        });
    }
    Ok(envelope.state)
}
