//! Error types for encode and decode.

use std::io;
use thiserror::Error;

/// Result type alias for codec operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Every way an encode or decode can fail. None of them are recovered from.
#[derive(Debug, Error)]
pub enum Error {
    /// The code table at the front of an encoded file could not be parsed.
    #[error("malformed header: {0}")]
    MalformedHeader(String),

    /// The payload ran out before the end-of-stream code was seen.
    #[error("unexpected end of stream after {bits_read} payload bits")]
    TruncatedPayload { bits_read: u64 },

    /// The payload contains a bit run that no code in the table can match.
    #[error("invalid code in payload after {bits} bits")]
    InvalidCode { bits: usize },

    /// A byte showed up while encoding that the counting pass never saw.
    #[error("byte 0x{0:02x} has no code; input changed between passes")]
    UnknownSymbol(u8),

    /// The end-of-stream code does not fit the header's one-byte length field.
    #[error("end-of-stream code is {len} bits, header allows at most 255")]
    CodeTooLong { len: usize },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Error::MalformedHeader(message.into())
    }

    /// Map a short read inside the header to a malformed-header error.
    pub(crate) fn header_io(err: io::Error, what: &str) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Error::malformed(format!("stream ended while reading {what}"))
        } else {
            Error::Io(err)
        }
    }
}
