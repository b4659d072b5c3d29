//! In-memory sequence implementations.
//!
//! The whole source is resident, so checkpoint/rewind is pure index
//! manipulation and no buffer eviction concerns exist.

pub mod generator;
pub mod string;
pub mod vec;

pub use generator::GeneratorSequence;
pub use string::{StringOptions, StringSequence};
pub use vec::VecSequence;
