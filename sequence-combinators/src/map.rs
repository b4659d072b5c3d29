use std::marker::PhantomData;

use sequence_core::{Checkpoint, Location, Sequence, SequenceError};
use sequence_core::{SequenceStatistics, StateFlags};

/// Wraps an inner sequence and a pure transform, applying it lazily to
/// every yielded item.
///
/// No extra checkpoint state is needed: a rewind rewinds the inner
/// sequence, and the transform is reapplied on the next read. The end
/// sentinel is the transform of the inner sentinel.
pub struct MapSequence<S, F, U> {
    inner: S,
    transform: F,
    put_backs: Vec<U>,
    _output: PhantomData<U>,
}

impl<S, F, U> MapSequence<S, F, U>
where
    S: Sequence,
    F: Fn(S::Item) -> U,
    U: Clone,
{
    pub fn new(inner: S, transform: F) -> Self {
        Self {
            inner,
            transform,
            put_backs: Vec::new(),
            _output: PhantomData,
        }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S, F, U> Sequence for MapSequence<S, F, U>
where
    S: Sequence,
    F: Fn(S::Item) -> U,
    U: Clone,
{
    type Item = U;

    fn get_next(&mut self) -> Result<U, SequenceError> {
        if let Some(item) = self.put_backs.pop() {
            return Ok(item);
        }
        Ok((self.transform)(self.inner.get_next()?))
    }

    fn peek(&mut self) -> Result<U, SequenceError> {
        if let Some(item) = self.put_backs.last() {
            return Ok(item.clone());
        }
        Ok((self.transform)(self.inner.peek()?))
    }

    fn put_back(&mut self, item: U) {
        self.put_backs.push(item);
    }

    fn is_at_end(&self) -> bool {
        self.put_backs.is_empty() && self.inner.is_at_end()
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
        if !self.inner.rewind(checkpoint) {
            return false;
        }
        self.put_backs.clear();
        true
    }

    fn get_between(&self, start: &Checkpoint, end: &Checkpoint) -> Vec<U> {
        self.inner
            .get_between(start, end)
            .into_iter()
            .map(&self.transform)
            .collect()
    }

    fn statistics(&self) -> SequenceStatistics {
        self.inner.statistics()
    }

    fn reset(&mut self) -> Result<(), SequenceError> {
        self.put_backs.clear();
        self.inner.reset()
    }
}

impl<S: std::fmt::Debug, F, U> std::fmt::Debug for MapSequence<S, F, U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapSequence")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}
