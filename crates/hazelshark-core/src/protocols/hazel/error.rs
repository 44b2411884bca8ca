use serde::Serialize;
use thiserror::Error;

/// Errors that stop decoding of a Hazel datagram.
///
/// Unknown enum values are not errors; they are kept in the decoded field as
/// `Unknown(raw)` variants.
///
/// # Examples
/// ```
/// use hazelshark_core::DecodeError;
///
/// let err = DecodeError::OutOfBounds { offset: 3, needed: 2, available: 1 };
/// assert!(err.to_string().contains("out of bounds"));
/// assert!(err.is_out_of_bounds());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecodeError {
    #[error("read out of bounds at offset {offset}: need {needed} bytes, {available} remaining")]
    OutOfBounds {
        offset: usize,
        needed: usize,
        available: usize,
    },
    #[error(
        "message length mismatch at offset {offset}: declared {declared} bytes, {available} remaining"
    )]
    LengthMismatch {
        offset: usize,
        declared: usize,
        available: usize,
    },
    #[error("malformed packed integer at offset {offset}: no terminator within {max_len} bytes")]
    MalformedVarInt { offset: usize, max_len: usize },
}

impl DecodeError {
    /// True for errors caused by the buffer ending before a read completed.
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(
            self,
            DecodeError::OutOfBounds { .. } | DecodeError::LengthMismatch { .. }
        )
    }

    /// Offset at which the failing read started.
    pub fn offset(&self) -> usize {
        match self {
            DecodeError::OutOfBounds { offset, .. }
            | DecodeError::LengthMismatch { offset, .. }
            | DecodeError::MalformedVarInt { offset, .. } => *offset,
        }
    }

    /// Stable identifier used in compliance reports.
    pub fn violation_id(&self) -> &'static str {
        match self {
            DecodeError::OutOfBounds { .. } => "HZ-OUT-OF-BOUNDS",
            DecodeError::LengthMismatch { .. } => "HZ-LENGTH-MISMATCH",
            DecodeError::MalformedVarInt { .. } => "HZ-MALFORMED-VARINT",
        }
    }
}
