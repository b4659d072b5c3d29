//! Stream-backed sequence implementations.
//!
//! Reads raw bytes from an `io::Read + io::Seek` source in fixed-size
//! chunks and retains every filled buffer for the lifetime of the sequence,
//! so any checkpoint a caller still holds stays rewindable without I/O.
//! Memory is reclaimed by `reset()` or by dropping the sequence.

mod buffer;
pub mod bytes;
pub mod chars;
pub mod encoding;

pub use bytes::{ByteStreamOptions, ByteStreamSequence};
pub use chars::{CharStreamOptions, CharStreamSequence};
pub use encoding::TextEncoding;

/// Default number of bytes read per buffer refill.
pub const DEFAULT_BUFFER_SIZE: usize = 1024;
