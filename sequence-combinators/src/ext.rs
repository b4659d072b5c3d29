use sequence_core::{Sequence, SequenceError};

use crate::{FilterSequence, MapSequence, WindowSequence};

/// Builder-style constructors for the derived sequences.
pub trait SequenceExt: Sequence + Sized {
    /// Lazily transforms every yielded item.
    fn map_items<U, F>(self, transform: F) -> MapSequence<Self, F, U>
    where
        U: Clone,
        F: Fn(Self::Item) -> U,
    {
        MapSequence::new(self, transform)
    }

    /// Surfaces only items matching the predicate, eagerly skipping the
    /// rest. Fails if the initial skip-ahead hits an I/O or decode error.
    fn filter_items<P>(self, predicate: P) -> Result<FilterSequence<Self, P>, SequenceError>
    where
        P: FnMut(&Self::Item) -> bool,
    {
        FilterSequence::new(self, predicate)
    }

    /// Opens a window supporting a no-argument rewind back to this point.
    fn window(self) -> WindowSequence<Self> {
        WindowSequence::new(self)
    }
}

impl<S: Sequence + Sized> SequenceExt for S {}
