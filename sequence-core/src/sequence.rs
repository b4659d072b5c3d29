use crate::{Checkpoint, Location, SequenceError, SequenceStatistics, StateFlags};

/// The rewindable cursor abstraction every parser-facing input source
/// implements.
///
/// A sequence is a sequential, single-writer cursor over a source of items.
/// Reading past the end is not an error: `get_next` keeps returning the
/// configured end sentinel and `consumed` stops advancing. Backtracking is
/// done with [`checkpoint`](Sequence::checkpoint) /
/// [`rewind`](Sequence::rewind); buffered implementations retain whatever
/// backing data is needed so that every checkpoint stays rewindable until
/// the sequence is reset or dropped.
pub trait Sequence {
    type Item: Clone;

    /// Returns and consumes the next item, or the end sentinel past
    /// end-of-input. Underlying I/O failures propagate unmodified.
    fn get_next(&mut self) -> Result<Self::Item, SequenceError>;

    /// Returns the next item without consuming it. Repeated calls return
    /// the same value.
    fn peek(&mut self) -> Result<Self::Item, SequenceError>;

    /// Pushes a value to be the next one returned, whether or not it was
    /// ever read from the source. Put-backs do not advance `consumed` or
    /// the location, and a rewind discards any still pending.
    fn put_back(&mut self, item: Self::Item);

    /// True once the read position has reached the end sentinel and no
    /// put-backs are pending.
    fn is_at_end(&self) -> bool;

    /// Count of items consumed from the start of input.
    fn consumed(&self) -> usize;

    /// Line/column of the current read position.
    fn current_location(&self) -> Location;

    /// Position flags, queryable without side effects.
    fn flags(&self) -> StateFlags;

    /// Captures the current read position for later rewind.
    fn checkpoint(&mut self) -> Checkpoint;

    /// Restores the read position, flags, and location captured in the
    /// checkpoint. Returns `false` (and changes nothing) if the checkpoint
    /// was produced by a different sequence.
    fn rewind(&mut self, checkpoint: &Checkpoint) -> bool;

    /// Returns the items consumed between two checkpoints of this sequence,
    /// concatenated across retained buffers. An out-of-order pair yields an
    /// empty vec, not an error.
    fn get_between(&self, start: &Checkpoint, end: &Checkpoint) -> Vec<Self::Item>;

    /// Counters accumulated since construction or the last reset.
    fn statistics(&self) -> SequenceStatistics;

    /// Returns the sequence to its freshly-constructed state. Stream-backed
    /// sequences re-seek the source and drop retained buffers.
    fn reset(&mut self) -> Result<(), SequenceError>;
}

impl<S: Sequence + ?Sized> Sequence for Box<S> {
    type Item = S::Item;

    fn get_next(&mut self) -> Result<Self::Item, SequenceError> {
        (**self).get_next()
    }

    fn peek(&mut self) -> Result<Self::Item, SequenceError> {
        (**self).peek()
    }

    fn put_back(&mut self, item: Self::Item) {
        (**self).put_back(item)
    }

    fn is_at_end(&self) -> bool {
        (**self).is_at_end()
    }

    fn consumed(&self) -> usize {
        (**self).consumed()
    }

    fn current_location(&self) -> Location {
        (**self).current_location()
    }

    fn flags(&self) -> StateFlags {
        (**self).flags()
    }

    fn checkpoint(&mut self) -> Checkpoint {
        (**self).checkpoint()
    }

    fn rewind(&mut self, checkpoint: &Checkpoint) -> bool {
        (**self).rewind(checkpoint)
    }

    fn get_between(&self, start: &Checkpoint, end: &Checkpoint) -> Vec<Self::Item> {
        (**self).get_between(start, end)
    }

    fn statistics(&self) -> SequenceStatistics {
        (**self).statistics()
    }

    fn reset(&mut self) -> Result<(), SequenceError> {
        (**self).reset()
    }
}
