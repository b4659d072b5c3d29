use sequence_core::{Checkpoint, Location, Sequence, SequenceError};
use sequence_core::{SequenceStatistics, StateFlags};

/// Wraps an inner sequence and a predicate, surfacing only matching items.
///
/// The inner sequence is eagerly advanced past non-matching items on
/// construction and after every consuming read, so `peek`/`get_next`
/// always see a matching item or end-of-input. Two consequences, both
/// intentional: `START_OF_INPUT` may already be false immediately after
/// construction (the skip consumed inner items), and `consumed()` reports
/// inner consumption including skipped items, not the matched-item count.
pub struct FilterSequence<S: Sequence, P> {
    inner: S,
    predicate: P,
    put_backs: Vec<S::Item>,
    needs_skip: bool,
}

impl<S, P> FilterSequence<S, P>
where
    S: Sequence,
    P: FnMut(&S::Item) -> bool,
{
    /// Wraps `inner`, immediately skipping to the first matching item.
    pub fn new(inner: S, predicate: P) -> Result<Self, SequenceError> {
        let mut filtered = Self {
            inner,
            predicate,
            put_backs: Vec::new(),
            needs_skip: false,
        };
        filtered.skip_ahead()?;
        Ok(filtered)
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    /// Advances the inner sequence until its cursor rests on a matching
    /// item or the end.
    fn skip_ahead(&mut self) -> Result<(), SequenceError> {
        self.needs_skip = false;
        loop {
            if self.inner.is_at_end() {
                return Ok(());
            }
            let item = self.inner.peek()?;
            if self.inner.is_at_end() {
                // The peek discovered the end and returned the sentinel.
                return Ok(());
            }
            if (self.predicate)(&item) {
                return Ok(());
            }
            self.inner.get_next()?;
        }
    }

    fn settle(&mut self) -> Result<(), SequenceError> {
        if self.needs_skip {
            self.skip_ahead()?;
        }
        Ok(())
    }
}

impl<S, P> Sequence for FilterSequence<S, P>
where
    S: Sequence,
    P: FnMut(&S::Item) -> bool,
{
    type Item = S::Item;

    fn get_next(&mut self) -> Result<S::Item, SequenceError> {
        if let Some(item) = self.put_backs.pop() {
            return Ok(item);
        }
        self.settle()?;
        let item = self.inner.get_next()?;
        self.skip_ahead()?;
        Ok(item)
    }

    fn peek(&mut self) -> Result<S::Item, SequenceError> {
        if let Some(item) = self.put_backs.last() {
            return Ok(item.clone());
        }
        self.settle()?;
        self.inner.peek()
    }

    fn put_back(&mut self, item: S::Item) {
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

    /// Restores the inner position exactly as captured; if that position
    /// precedes the usual skip-ahead, the skip replays on the next read.
    fn rewind(&mut self, checkpoint: &Checkpoint) -> bool {
        if !self.inner.rewind(checkpoint) {
            return false;
        }
        self.put_backs.clear();
        self.needs_skip = true;
        true
    }

    fn get_between(&self, start: &Checkpoint, end: &Checkpoint) -> Vec<S::Item> {
        // Raw inner range, skipped items included.
        self.inner.get_between(start, end)
    }

    fn statistics(&self) -> SequenceStatistics {
        self.inner.statistics()
    }

    /// Resets the inner sequence and replays the same initial skip-ahead
    /// construction performed.
    fn reset(&mut self) -> Result<(), SequenceError> {
        self.inner.reset()?;
        self.put_backs.clear();
        self.skip_ahead()
    }
}

impl<S: Sequence + std::fmt::Debug, P> std::fmt::Debug for FilterSequence<S, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterSequence")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}
