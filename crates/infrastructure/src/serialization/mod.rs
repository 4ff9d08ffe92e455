//! Serialization of persisted client state.

mod envelope;

pub use envelope::{STATE_VERSION, SerializationError, decode_state, encode_state};
