use std::sync::Arc;

use sequence_core::{Checkpoint, CursorState, Location, Sequence, SequenceError};
use sequence_core::{SequenceStatistics, StateFlags};

/// Sequence over a pull function `(index) -> (value, is_last)`.
///
/// The generator is treated as not idempotently replayable: every produced
/// value is appended to a growable log, and rewinds replay from the log
/// without re-invoking the function. Once a call reports `is_last`, further
/// reads past that value return the sentinel and the generator is never
/// called again.
pub struct GeneratorSequence<T, F> {
    generate: F,
    log: Vec<T>,
    source_ended: bool,
    state: CursorState<T>,
}

impl<T, F> GeneratorSequence<T, F>
where
    T: Clone,
    F: FnMut(usize) -> (T, bool),
{
    pub fn new(generate: F, end_sentinel: T) -> Self {
        Self::with_name(generate, end_sentinel, None)
    }

    pub fn with_name(generate: F, end_sentinel: T, source_name: Option<Arc<str>>) -> Self {
        Self {
            generate,
            log: Vec::new(),
            source_ended: false,
            state: CursorState::new(end_sentinel, source_name),
        }
    }

    /// Makes sure the log holds a value at the cursor, pulling from the
    /// generator if needed. Returns `false` at end of input.
    fn fill_to_cursor(&mut self) -> bool {
        let index = self.state.consumed();
        if index < self.log.len() {
            return true;
        }
        if self.source_ended {
            self.state.mark_end();
            return false;
        }
        let (value, is_last) = (self.generate)(index);
        self.log.push(value);
        self.source_ended = is_last;
        true
    }

    fn sync_end(&mut self) {
        if self.source_ended && self.state.consumed() >= self.log.len() {
            self.state.mark_end();
        }
    }
}

impl<T, F> Sequence for GeneratorSequence<T, F>
where
    T: Clone,
    F: FnMut(usize) -> (T, bool),
{
    type Item = T;

    fn get_next(&mut self) -> Result<T, SequenceError> {
        if let Some(item) = self.state.pop_back() {
            return Ok(item);
        }
        if !self.fill_to_cursor() {
            return Ok(self.state.sentinel());
        }
        let item = self.log[self.state.consumed()].clone();
        self.state.note_read(false);
        self.sync_end();
        Ok(item)
    }

    fn peek(&mut self) -> Result<T, SequenceError> {
        self.state.note_peek();
        if let Some(item) = self.state.peek_back() {
            return Ok(item.clone());
        }
        if !self.fill_to_cursor() {
            return Ok(self.state.sentinel());
        }
        Ok(self.log[self.state.consumed()].clone())
    }

    fn put_back(&mut self, item: T) {
        self.state.push_back(item);
    }

    fn is_at_end(&self) -> bool {
        !self.state.has_put_backs() && self.state.at_end()
    }

    fn consumed(&self) -> usize {
        self.state.consumed()
    }

    fn current_location(&self) -> Location {
        self.state.location()
    }

    fn flags(&self) -> StateFlags {
        self.state.flags()
    }

    fn checkpoint(&mut self) -> Checkpoint {
        let consumed = self.state.consumed();
        self.state.checkpoint(0, consumed, consumed as u64)
    }

    fn rewind(&mut self, checkpoint: &Checkpoint) -> bool {
        if !self.state.accepts(checkpoint) {
            return false;
        }
        self.state.restore(checkpoint, true);
        true
    }

    fn get_between(&self, start: &Checkpoint, end: &Checkpoint) -> Vec<T> {
        if !self.state.owns(start) || !self.state.owns(end) {
            return Vec::new();
        }
        if start.consumed() > end.consumed() {
            return Vec::new();
        }
        let lo = start.consumed().min(self.log.len());
        let hi = end.consumed().min(self.log.len());
        self.log[lo..hi].to_vec()
    }

    fn statistics(&self) -> SequenceStatistics {
        self.state.statistics()
    }

    /// Resets the cursor. The log of already-produced values is kept as the
    /// replay source, so a non-idempotent generator is never re-invoked for
    /// values it already yielded.
    fn reset(&mut self) -> Result<(), SequenceError> {
        self.state.reset();
        self.sync_end();
        Ok(())
    }
}

impl<T: std::fmt::Debug, F> std::fmt::Debug for GeneratorSequence<T, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorSequence")
            .field("log_len", &self.log.len())
            .field("source_ended", &self.source_ended)
            .finish_non_exhaustive()
    }
}
