use std::cmp::Ordering;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use crate::{Location, StateFlags};

static NEXT_SEQUENCE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a sequence instance.
///
/// Checkpoints carry the id of the sequence that produced them so a rewind
/// against a foreign sequence can be detected and refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SequenceId(u64);

impl SequenceId {
    /// Allocates a fresh id. Called once per sequence construction.
    pub fn next() -> Self {
        Self(NEXT_SEQUENCE_ID.fetch_add(1, AtomicOrdering::Relaxed))
    }
}

/// A snapshot of a sequence's read position, replayable via
/// [`Sequence::rewind`](crate::Sequence::rewind).
///
/// Checkpoints are lightweight values holding indices and counters; they
/// reference buffer state by index but never own it. The producing sequence
/// keeps whatever backing data the checkpoint needs alive until it is reset
/// or dropped.
#[derive(Debug, Clone)]
pub struct Checkpoint {
    sequence_id: SequenceId,
    consumed: usize,
    buffer_index: usize,
    offset: usize,
    stream_position: u64,
    flags: StateFlags,
    location: Location,
}

impl Checkpoint {
    /// Captures a checkpoint. Used by sequence implementations, not callers.
    pub fn new(
        sequence_id: SequenceId,
        consumed: usize,
        buffer_index: usize,
        offset: usize,
        stream_position: u64,
        flags: StateFlags,
        location: Location,
    ) -> Self {
        Self {
            sequence_id,
            consumed,
            buffer_index,
            offset,
            stream_position,
            flags,
            location,
        }
    }

    /// Id of the sequence this checkpoint belongs to.
    pub fn sequence_id(&self) -> SequenceId {
        self.sequence_id
    }

    /// Count of items consumed at the time of capture.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Index of the buffer the cursor was in. Always 0 for in-memory
    /// sequences.
    pub fn buffer_index(&self) -> usize {
        self.buffer_index
    }

    /// Item offset of the cursor within its buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Byte offset of the containing buffer's start in the underlying
    /// stream. 0 for sequences with no backing stream.
    pub fn stream_position(&self) -> u64 {
        self.stream_position
    }

    /// Flags at the time of capture.
    pub fn flags(&self) -> StateFlags {
        self.flags
    }

    /// Location at the time of capture.
    pub fn location(&self) -> Location {
        self.location.clone()
    }
}

impl PartialEq for Checkpoint {
    fn eq(&self, other: &Self) -> bool {
        self.sequence_id == other.sequence_id && self.consumed == other.consumed
    }
}

/// Checkpoints from the same sequence are totally ordered by how much input
/// was consumed; checkpoints from different sequences are incomparable.
impl PartialOrd for Checkpoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.sequence_id != other.sequence_id {
            return None;
        }
        Some(self.consumed.cmp(&other.consumed))
    }
}
