//! Error types for configuration, command decoding and actuator ownership.

use thiserror::Error;

/// Boost table configuration rejected at load time.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The ascending table has no entries.
    #[error("ascending boost table is empty")]
    EmptyTable,

    /// `valid_up_to` does not strictly increase at `index`.
    #[error("boost table entry {index} is out of order ({valid_up_to} after {previous})")]
    Unsorted {
        index: usize,
        previous: u16,
        valid_up_to: u16,
    },

    /// The last entry does not reach the maximum duty.
    #[error("boost table ends at {last}, must cover {max}")]
    Incomplete { last: u16, max: i16 },

    /// A boost value lies outside the representable duty range.
    #[error("boost value {value} is outside [-{max}, {max}]")]
    BoostOutOfRange { value: i16, max: i16 },

    /// Stored record was written by an incompatible firmware.
    #[error("unsupported boost table record version {0}")]
    UnsupportedVersion(u8),

    /// Stored bytes are not a valid CBOR record.
    #[error("malformed boost table record")]
    Malformed,

    /// Tables could not be written as a CBOR record.
    #[error("boost tables could not be encoded")]
    Unencodable,
}

/// A single command byte could not be decoded.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command token 0x{0:02x}")]
    UnknownToken(u8),
}

/// Signed duty outside `[-DUTY_MAX, DUTY_MAX]`.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("duty {0} is outside [-1023, 1023]")]
pub struct DutyOutOfRange(pub i32);

/// Failure to hand a request to an actuator's owning task.
#[cfg(feature = "std")]
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MailboxError {
    /// The owning task has stopped; nobody will apply the request.
    #[error("actuator task is no longer running")]
    Closed,

    /// Rejected before queuing.
    #[error(transparent)]
    OutOfRange(#[from] DutyOutOfRange),
}
