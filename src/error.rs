//! Error types for the oxiflac crate.

use thiserror::Error;

/// Errors that can occur when decoding or encoding a FLAC metadata chain.
#[derive(Error, Debug)]
pub enum Error {
    /// A caller passed a value outside the range an operation accepts.
    #[error("Invalid argument `{name}` = {value}: {reason}")]
    InvalidArgument {
        name: &'static str,
        value: u64,
        reason: &'static str,
    },

    /// A read would run past the end of the buffer.
    #[error("Read out of range: {needed} bytes at offset {offset}, {available} available")]
    OutOfRange {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// The stream does not start with the `fLaC` marker.
    #[error("Not a FLAC stream: expected magic fLaC, found {found:02X?}")]
    NotAContainer { found: Vec<u8> },

    /// The stream ended inside a block header or before a declared payload
    /// was complete.
    #[error("Truncated stream at byte {offset}: expected {expected} bytes, {available} available")]
    TruncatedStream {
        offset: u64,
        expected: u64,
        available: u64,
    },

    /// A serialized payload does not fit in the 24-bit length field.
    #[error("Payload of block type {block_type} is {len} bytes, limit is 16777215")]
    PayloadTooLarge { block_type: u8, len: usize },

    /// A chain must contain at least one block to be written.
    #[error("Cannot write an empty metadata chain")]
    EmptyChain,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failure returned by [`MetadataChain::parse`](crate::MetadataChain::parse).
pub type ParseError = Error;

/// Failure returned by [`MetadataChain::write`](crate::MetadataChain::write).
pub type WriteError = Error;

impl Error {
    pub(crate) fn out_of_range(offset: usize, needed: usize, buffer_len: usize) -> Self {
        Error::OutOfRange {
            offset,
            needed,
            available: buffer_len.saturating_sub(offset),
        }
    }
}
