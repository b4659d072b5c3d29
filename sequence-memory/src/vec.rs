use std::sync::Arc;

use sequence_core::{Checkpoint, CursorState, Location, Sequence, SequenceError};
use sequence_core::{SequenceStatistics, StateFlags};

/// Sequence over an owned `Vec<T>`.
///
/// The simplest implementation: everything is addressable by index, so a
/// rewind is a cursor reset and `get_between` is a direct slice. The end
/// sentinel is supplied at construction.
#[derive(Debug)]
pub struct VecSequence<T> {
    items: Vec<T>,
    state: CursorState<T>,
}

impl<T: Clone> VecSequence<T> {
    pub fn new(items: Vec<T>, end_sentinel: T) -> Self {
        Self::with_name(items, end_sentinel, None)
    }

    pub fn with_name(items: Vec<T>, end_sentinel: T, source_name: Option<Arc<str>>) -> Self {
        let mut state = CursorState::new(end_sentinel, source_name);
        if items.is_empty() {
            state.mark_end();
        }
        Self { items, state }
    }

    fn sync_end(&mut self) {
        if self.state.consumed() >= self.items.len() {
            self.state.mark_end();
        }
    }
}

impl<T: Clone> Sequence for VecSequence<T> {
    type Item = T;

    fn get_next(&mut self) -> Result<T, SequenceError> {
        if let Some(item) = self.state.pop_back() {
            return Ok(item);
        }
        match self.items.get(self.state.consumed()) {
            Some(item) => {
                let item = item.clone();
                self.state.note_read(false);
                self.sync_end();
                Ok(item)
            }
            None => Ok(self.state.sentinel()),
        }
    }

    fn peek(&mut self) -> Result<T, SequenceError> {
        self.state.note_peek();
        if let Some(item) = self.state.peek_back() {
            return Ok(item.clone());
        }
        match self.items.get(self.state.consumed()) {
            Some(item) => Ok(item.clone()),
            None => Ok(self.state.sentinel()),
        }
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
        // Single resident buffer: every rewind is to the current buffer.
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
        let lo = start.consumed().min(self.items.len());
        let hi = end.consumed().min(self.items.len());
        self.items[lo..hi].to_vec()
    }

    fn statistics(&self) -> SequenceStatistics {
        self.state.statistics()
    }

    fn reset(&mut self) -> Result<(), SequenceError> {
        self.state.reset();
        if self.items.is_empty() {
            self.state.mark_end();
        }
        Ok(())
    }
}
