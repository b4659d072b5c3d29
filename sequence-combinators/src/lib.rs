//! Derived sequences wrapping an inner sequence.
//!
//! Each wrapper forwards the sequence contract to exactly one inner
//! sequence, transforming or filtering items lazily. Checkpoints are the
//! inner sequence's checkpoints verbatim; rewinding one rewinds the inner
//! sequence.

pub mod ext;
pub mod filter;
pub mod map;
pub mod window;

pub use ext::SequenceExt;
pub use filter::FilterSequence;
pub use map::MapSequence;
pub use window::WindowSequence;
