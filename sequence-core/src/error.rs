use thiserror::Error;

/// Failures a sequence can surface to its caller.
///
/// Exhaustion is not an error (reads past the end return the configured
/// sentinel) and out-of-order `get_between` requests return an empty vec.
/// What remains is I/O from the underlying source, propagated unmodified,
/// and decode failures in encoded character streams.
#[derive(Debug, Error)]
pub enum SequenceError {
    /// Reading from or seeking the underlying source failed.
    #[error("read from underlying source failed")]
    Io(#[from] std::io::Error),

    /// The byte stream is not valid in the configured encoding.
    #[error("invalid {encoding} byte 0x{byte:02x} at stream position {position}")]
    Decode {
        encoding: &'static str,
        byte: u8,
        position: u64,
    },

    /// The source ended in the middle of a multi-byte code point.
    #[error("source ended inside a multi-byte code point at stream position {position}")]
    IncompleteCodePoint { position: u64 },
}
