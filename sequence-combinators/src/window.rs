use sequence_core::{Checkpoint, Location, Sequence, SequenceError};
use sequence_core::{SequenceStatistics, StateFlags};

/// Wrapper giving speculative parses a single "give it all back" escape
/// hatch.
///
/// A checkpoint of the inner sequence is captured at construction;
/// [`rewind_all`](WindowSequence::rewind_all) unwinds every item consumed
/// through the window since then. Simpler than juggling one checkpoint per
/// attempt when a multi-branch parse only ever needs to restart from where
/// the window opened.
#[derive(Debug)]
pub struct WindowSequence<S: Sequence> {
    inner: S,
    origin: Checkpoint,
}

impl<S: Sequence> WindowSequence<S> {
    pub fn new(mut inner: S) -> Self {
        let origin = inner.checkpoint();
        Self { inner, origin }
    }

    /// Rewinds the inner sequence to where the window was opened.
    pub fn rewind_all(&mut self) -> bool {
        self.inner.rewind(&self.origin)
    }

    /// Count of items consumed through the window since it opened.
    pub fn window_consumed(&self) -> usize {
        self.inner.consumed().saturating_sub(self.origin.consumed())
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Sequence> Sequence for WindowSequence<S> {
    type Item = S::Item;

    fn get_next(&mut self) -> Result<S::Item, SequenceError> {
        self.inner.get_next()
    }

    fn peek(&mut self) -> Result<S::Item, SequenceError> {
        self.inner.peek()
    }

    fn put_back(&mut self, item: S::Item) {
        self.inner.put_back(item);
    }

    fn is_at_end(&self) -> bool {
        self.inner.is_at_end()
    }

    fn consumed(&self) -> usize {
        self.inner.consumed()
    }

    fn current_location(&self) -> Location {
        self.inner.current_location()
    }

    fn flags(&self) -> StateFlags {
        self.inner.flags()
    }

    fn checkpoint(&mut self) -> Checkpoint {
        self.inner.checkpoint()
    }

    fn rewind(&mut self, checkpoint: &Checkpoint) -> bool {
        self.inner.rewind(checkpoint)
    }

    fn get_between(&self, start: &Checkpoint, end: &Checkpoint) -> Vec<S::Item> {
        self.inner.get_between(start, end)
    }

    fn statistics(&self) -> SequenceStatistics {
        self.inner.statistics()
    }

    /// Resets the inner sequence and reopens the window at the start.
    fn reset(&mut self) -> Result<(), SequenceError> {
        self.inner.reset()?;
        self.origin = self.inner.checkpoint();
        Ok(())
    }
}
