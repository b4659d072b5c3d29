use std::io::{Read, Seek, SeekFrom};
use std::sync::Arc;

use tracing::{debug, trace};

use sequence_core::{Checkpoint, CursorState, Location, Sequence, SequenceError};
use sequence_core::{SequenceStatistics, StateFlags};

use crate::buffer::{Buffer, BufferChain};
use crate::DEFAULT_BUFFER_SIZE;

/// Configuration for [`ByteStreamSequence`].
#[derive(Debug, Clone)]
pub struct ByteStreamOptions {
    /// Bytes read per buffer refill.
    pub buffer_size: usize,
    /// Value returned past end-of-input.
    pub end_sentinel: u8,
    /// Source name carried in locations.
    pub source_name: Option<Arc<str>>,
}

impl Default for ByteStreamOptions {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            end_sentinel: 0,
            source_name: None,
        }
    }
}

/// Sequence of bytes over a streaming source.
///
/// Steady-state memory is one buffer per `buffer_size` bytes of input
/// actually visited; every filled buffer is retained so outstanding
/// checkpoints can always be rewound without re-reading the source.
/// A rewind only moves the internal cursor, never the OS stream.
#[derive(Debug)]
pub struct ByteStreamSequence<R> {
    reader: R,
    chain: BufferChain<u8>,
    ended: bool,
    next_position: u64,
    buffer_size: usize,
    state: CursorState<u8>,
}

impl<R: Read + Seek> ByteStreamSequence<R> {
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, ByteStreamOptions::default())
    }

    pub fn with_options(reader: R, options: ByteStreamOptions) -> Self {
        assert!(options.buffer_size > 0, "buffer size must be at least 1");
        Self {
            reader,
            chain: BufferChain::new(),
            ended: false,
            next_position: 0,
            buffer_size: options.buffer_size,
            state: CursorState::new(options.end_sentinel, options.source_name),
        }
    }

    /// Reads one chunk from the source. A chunk shorter than `buffer_size`
    /// means the source is exhausted (reads loop until the chunk is full or
    /// the source reports end).
    fn refill(&mut self) -> Result<(), SequenceError> {
        let mut chunk = vec![0u8; self.buffer_size];
        let mut filled = 0;
        while filled < chunk.len() {
            // Interrupted reads are retried in place; propagating one would
            // drop the bytes already copied in earlier iterations.
            match self.reader.read(&mut chunk[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        }
        self.state.note_refill();
        trace!(bytes = filled, position = self.next_position, "buffer refill");

        if filled < self.buffer_size {
            self.ended = true;
        }
        if filled == 0 {
            self.chain.mark_last();
            return Ok(());
        }
        chunk.truncate(filled);
        let buffer = Buffer::new(
            chunk,
            self.chain.total_items(),
            self.next_position,
            self.ended,
        );
        self.next_position += filled as u64;
        self.chain.push(buffer);
        Ok(())
    }

    /// Makes sure the cursor addresses an unread byte, refilling as needed.
    /// Returns `false` (and flags end-of-input) when the source is done.
    fn ensure_current(&mut self) -> Result<bool, SequenceError> {
        loop {
            if self.chain.current().is_some() {
                return Ok(true);
            }
            if self.ended {
                self.state.mark_end();
                return Ok(false);
            }
            self.refill()?;
        }
    }
}

impl<R: Read + Seek> Sequence for ByteStreamSequence<R> {
    type Item = u8;

    fn get_next(&mut self) -> Result<u8, SequenceError> {
        if let Some(byte) = self.state.pop_back() {
            return Ok(byte);
        }
        if !self.ensure_current()? {
            return Ok(self.state.sentinel());
        }
        let byte = match self.chain.current() {
            Some(&byte) => byte,
            None => return Ok(self.state.sentinel()),
        };
        self.chain.advance();
        self.state.note_read(byte == b'\n');
        if self.chain.at_terminal_end() {
            self.state.mark_end();
        }
        Ok(byte)
    }

    fn peek(&mut self) -> Result<u8, SequenceError> {
        self.state.note_peek();
        if let Some(&byte) = self.state.peek_back() {
            return Ok(byte);
        }
        if !self.ensure_current()? {
            return Ok(self.state.sentinel());
        }
        match self.chain.current() {
            Some(&byte) => Ok(byte),
            None => Ok(self.state.sentinel()),
        }
    }

    fn put_back(&mut self, item: u8) {
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
        let (buffer_index, offset) = self.chain.cursor();
        let position = self.chain.cursor_buffer_position() + offset as u64;
        self.state.checkpoint(buffer_index, offset, position)
    }

    fn rewind(&mut self, checkpoint: &Checkpoint) -> bool {
        if !self.state.accepts(checkpoint) {
            return false;
        }
        let (current_buffer, _) = self.chain.cursor();
        let to_current = checkpoint.buffer_index() == current_buffer;
        self.chain
            .set_cursor(checkpoint.buffer_index(), checkpoint.offset());
        self.state.restore(checkpoint, to_current);
        true
    }

    fn get_between(&self, start: &Checkpoint, end: &Checkpoint) -> Vec<u8> {
        if !self.state.owns(start) || !self.state.owns(end) {
            return Vec::new();
        }
        if start.consumed() > end.consumed() {
            return Vec::new();
        }
        self.chain.slice_between(
            (start.buffer_index(), start.offset()),
            (end.buffer_index(), end.offset()),
        )
    }

    fn statistics(&self) -> SequenceStatistics {
        self.state.statistics()
    }

    fn reset(&mut self) -> Result<(), SequenceError> {
        self.reader.seek(SeekFrom::Start(0))?;
        self.chain.clear();
        self.ended = false;
        self.next_position = 0;
        self.state.reset();
        debug!("byte stream sequence reset");
        Ok(())
    }
}
