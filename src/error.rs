use thiserror::Error;

pub type Result<T, E = DecodeError> = core::result::Result<T, E>;

/// Per-payload decode failures. None of these are fatal; callers skip the
/// payload and carry on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// No decoder is registered for the 2-byte type tag. Expected for
    /// gadget generations this crate does not know about.
    #[error("unknown gadget type 0x{}", hex::encode(.0))]
    UnknownGadgetType([u8; 2]),
    #[error("malformed payload: expected at least {expected} bytes, got {actual}")]
    MalformedPayload { expected: usize, actual: usize },
    /// The payload carries the 0x000a tag but not the CO2 gadget signature.
    #[error("payload does not match the CO2 gadget signature")]
    FormatMismatch,
}
