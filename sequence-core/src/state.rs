use std::sync::Arc;

use tracing::warn;

use crate::{Checkpoint, Location, SequenceId, SequenceStatistics, StateFlags};

/// Bookkeeping common to every sequence implementation: identity, consumed
/// count, location, flags, statistics, sentinel, and the put-back stack.
///
/// Implementations own one of these and layer their buffering strategy
/// around it; checkpoint capture and restore go through here so that the
/// counters stay consistent across all sequence kinds.
#[derive(Debug)]
pub struct CursorState<T> {
    id: SequenceId,
    sentinel: T,
    consumed: usize,
    location: Location,
    flags: StateFlags,
    stats: SequenceStatistics,
    put_backs: Vec<T>,
}

impl<T: Clone> CursorState<T> {
    pub fn new(sentinel: T, source_name: Option<Arc<str>>) -> Self {
        let location = match source_name {
            Some(name) => Location::for_source(name),
            None => Location::new(),
        };
        Self {
            id: SequenceId::next(),
            sentinel,
            consumed: 0,
            location,
            flags: StateFlags::initial(),
            stats: SequenceStatistics::new(),
            put_backs: Vec::new(),
        }
    }

    pub fn id(&self) -> SequenceId {
        self.id
    }

    pub fn sentinel(&self) -> T {
        self.sentinel.clone()
    }

    pub fn consumed(&self) -> usize {
        self.consumed
    }

    pub fn location(&self) -> Location {
        self.location.clone()
    }

    pub fn flags(&self) -> StateFlags {
        self.flags
    }

    pub fn statistics(&self) -> SequenceStatistics {
        self.stats
    }

    /// Records one consumed item and updates location and flags.
    pub fn note_read(&mut self, is_newline: bool) {
        self.consumed += 1;
        self.stats.items_read += 1;
        self.flags.remove(StateFlags::START_OF_INPUT);
        self.flags.set(StateFlags::START_OF_LINE, is_newline);
        self.location.advance(is_newline);
    }

    /// Records one peek call.
    pub fn note_peek(&mut self) {
        self.stats.items_peeked += 1;
    }

    /// Records one buffer refill against the underlying source.
    pub fn note_refill(&mut self) {
        self.stats.buffer_refills += 1;
    }

    /// Marks the end of input; sticky until rewind or reset.
    pub fn mark_end(&mut self) {
        self.flags.insert(StateFlags::END_OF_INPUT);
    }

    pub fn at_end(&self) -> bool {
        self.flags.contains(StateFlags::END_OF_INPUT)
    }

    pub fn push_back(&mut self, item: T) {
        self.put_backs.push(item);
    }

    /// Pops a pending put-back. Injected values carry no source position,
    /// so neither `consumed`, the location, nor `items_read` advances.
    pub fn pop_back(&mut self) -> Option<T> {
        let item = self.put_backs.pop()?;
        self.flags.remove(StateFlags::START_OF_INPUT);
        Some(item)
    }

    /// Top of the put-back stack, for peeking.
    pub fn peek_back(&self) -> Option<&T> {
        self.put_backs.last()
    }

    pub fn has_put_backs(&self) -> bool {
        !self.put_backs.is_empty()
    }

    /// Captures a checkpoint at the given buffer coordinates.
    pub fn checkpoint(
        &mut self,
        buffer_index: usize,
        offset: usize,
        stream_position: u64,
    ) -> Checkpoint {
        self.stats.checkpoints_created += 1;
        Checkpoint::new(
            self.id,
            self.consumed,
            buffer_index,
            offset,
            stream_position,
            self.flags,
            self.location.clone(),
        )
    }

    /// True if the checkpoint was produced by this sequence.
    pub fn owns(&self, checkpoint: &Checkpoint) -> bool {
        checkpoint.sequence_id() == self.id
    }

    /// True if the checkpoint was produced by this sequence. Logs and
    /// refuses otherwise.
    pub fn accepts(&self, checkpoint: &Checkpoint) -> bool {
        if self.owns(checkpoint) {
            return true;
        }
        warn!(
            checkpoint_consumed = checkpoint.consumed(),
            "rewind refused: checkpoint belongs to a different sequence"
        );
        false
    }

    /// Restores consumed count, flags, and location from a checkpoint and
    /// discards pending put-backs. `to_current_buffer` is whether the target
    /// lies inside the buffer the cursor already held.
    pub fn restore(&mut self, checkpoint: &Checkpoint, to_current_buffer: bool) {
        self.consumed = checkpoint.consumed();
        self.flags = checkpoint.flags();
        self.location = checkpoint.location();
        self.put_backs.clear();
        self.stats.rewinds += 1;
        if to_current_buffer {
            self.stats.rewinds_to_current_buffer += 1;
        }
    }

    /// Clears everything back to the freshly-constructed state, keeping the
    /// source name.
    pub fn reset(&mut self) {
        self.consumed = 0;
        let source_name = self.location.source_name.take();
        self.location = match source_name {
            Some(name) => Location::for_source(name),
            None => Location::new(),
        };
        self.flags = StateFlags::initial();
        self.stats = SequenceStatistics::new();
        self.put_backs.clear();
    }
}
