//! Core contract of the sequence toolkit.
//!
//! Defines the value types shared by every sequence implementation
//! (`Location`, `StateFlags`, `SequenceStatistics`, `Checkpoint`) and the
//! [`Sequence`] trait that parser combinators and lexers consume.

pub mod checkpoint;
pub mod error;
pub mod flags;
pub mod location;
pub mod sequence;
pub mod state;
pub mod statistics;

pub use checkpoint::{Checkpoint, SequenceId};
pub use error::SequenceError;
pub use flags::StateFlags;
pub use location::Location;
pub use sequence::Sequence;
pub use state::CursorState;
pub use statistics::SequenceStatistics;
