use std::io::{Read, Seek, SeekFrom};
use std::sync::Arc;

use tracing::{debug, trace};

use sequence_core::{Checkpoint, CursorState, Location, Sequence, SequenceError};
use sequence_core::{SequenceStatistics, StateFlags};

use crate::buffer::{Buffer, BufferChain};
use crate::encoding::{Decoder, TextEncoding};
use crate::DEFAULT_BUFFER_SIZE;

/// Configuration for [`CharStreamSequence`].
#[derive(Debug, Clone)]
pub struct CharStreamOptions {
    /// Bytes read per buffer refill.
    pub buffer_size: usize,
    /// Value returned past end-of-input.
    pub end_sentinel: char,
    /// How raw bytes are decoded into characters.
    pub encoding: TextEncoding,
    /// Fold `"\r\n"`, `"\r"`, and `"\n"` into a single `'\n'`.
    pub normalize_line_endings: bool,
    /// Source name carried in locations.
    pub source_name: Option<Arc<str>>,
}

impl Default for CharStreamOptions {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            end_sentinel: '\0',
            encoding: TextEncoding::Utf8,
            normalize_line_endings: true,
            source_name: None,
        }
    }
}

/// Sequence of chars decoded from a streaming byte source.
///
/// Layers decoding and newline normalization over the byte-buffering
/// strategy of [`ByteStreamSequence`](crate::ByteStreamSequence). Retained
/// buffers hold whole code points: a multi-byte code point split across two
/// chunk reads is carried by the decoder and completed on the next refill,
/// so no checkpoint can ever land inside one. A `"\r\n"` pair, including
/// one straddling a chunk boundary, consumes as one logical `'\n'` when
/// normalization is enabled (the default).
///
/// A byte that is invalid in the configured encoding truncates the
/// sequence: the chars decoded before it are surfaced normally, the error
/// is raised once, and the sequence then reports end-of-input.
#[derive(Debug)]
pub struct CharStreamSequence<R> {
    reader: R,
    chain: BufferChain<char>,
    decoder: Decoder,
    pending_cr: bool,
    pending_error: Option<SequenceError>,
    ended: bool,
    next_position: u64,
    buffer_size: usize,
    normalize: bool,
    state: CursorState<char>,
}

impl<R: Read + Seek> CharStreamSequence<R> {
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, CharStreamOptions::default())
    }

    pub fn with_options(reader: R, options: CharStreamOptions) -> Self {
        assert!(options.buffer_size > 0, "buffer size must be at least 1");
        Self {
            reader,
            chain: BufferChain::new(),
            decoder: Decoder::new(options.encoding),
            pending_cr: false,
            pending_error: None,
            ended: false,
            next_position: 0,
            buffer_size: options.buffer_size,
            normalize: options.normalize_line_endings,
            state: CursorState::new(options.end_sentinel, options.source_name),
        }
    }

    /// Reads and decodes one chunk. May produce an empty result without
    /// reaching the end (e.g. a chunk holding only the first bytes of a
    /// code point, or a lone `'\r'` awaiting its possible `'\n'`); callers
    /// loop until a char is available or the end is flagged.
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

        let chunk_start = self.next_position;
        self.next_position += filled as u64;
        if filled < self.buffer_size {
            self.ended = true;
        }

        let carried_before = self.decoder.carry_len();
        let mut raw = Vec::with_capacity(filled);
        if filled > 0 {
            if let Err(err) = self.decoder.decode(&chunk[..filled], chunk_start, &mut raw) {
                // The chars decoded before the offending byte are kept and
                // surfaced first; the error is raised once they are consumed
                // and the sequence ends there.
                self.decoder.reset();
                self.ended = true;
                self.pending_error = Some(err);
            }
        }

        let mut chars = if self.normalize {
            self.fold_newlines(raw)
        } else {
            raw
        };
        if self.ended && self.pending_cr {
            // Bare '\r' at end of source normalizes to '\n'.
            self.pending_cr = false;
            chars.push('\n');
        }

        if chars.is_empty() {
            if self.ended {
                self.chain.mark_last();
            }
            return Ok(());
        }
        let start_position = chunk_start - carried_before as u64;
        let buffer = Buffer::new(chars, self.chain.total_items(), start_position, self.ended);
        self.chain.push(buffer);
        Ok(())
    }

    /// Newline folding with a carry for a `'\r'` that ends a chunk: its
    /// fate depends on whether the next chunk starts with `'\n'`.
    fn fold_newlines(&mut self, raw: Vec<char>) -> Vec<char> {
        let mut out = Vec::with_capacity(raw.len());
        for ch in raw {
            if self.pending_cr {
                self.pending_cr = false;
                out.push('\n');
                if ch == '\n' {
                    continue;
                }
            }
            if ch == '\r' {
                self.pending_cr = true;
            } else {
                out.push(ch);
            }
        }
        out
    }

    fn ensure_current(&mut self) -> Result<bool, SequenceError> {
        loop {
            if self.chain.current().is_some() {
                return Ok(true);
            }
            if self.ended {
                // Surfaces a decode failure or a code point truncated by
                // end-of-source, but only once the valid chars before it
                // have been consumed.
                if let Some(err) = self.pending_error.take() {
                    self.state.mark_end();
                    return Err(err);
                }
                self.decoder.finish()?;
                self.state.mark_end();
                return Ok(false);
            }
            self.refill()?;
        }
    }
}

impl<R: Read + Seek> Sequence for CharStreamSequence<R> {
    type Item = char;

    fn get_next(&mut self) -> Result<char, SequenceError> {
        if let Some(ch) = self.state.pop_back() {
            return Ok(ch);
        }
        if !self.ensure_current()? {
            return Ok(self.state.sentinel());
        }
        let ch = match self.chain.current() {
            Some(&ch) => ch,
            None => return Ok(self.state.sentinel()),
        };
        self.chain.advance();
        self.state.note_read(ch == '\n');
        if self.chain.at_terminal_end() {
            self.state.mark_end();
        }
        Ok(ch)
    }

    fn peek(&mut self) -> Result<char, SequenceError> {
        self.state.note_peek();
        if let Some(&ch) = self.state.peek_back() {
            return Ok(ch);
        }
        if !self.ensure_current()? {
            return Ok(self.state.sentinel());
        }
        match self.chain.current() {
            Some(&ch) => Ok(ch),
            None => Ok(self.state.sentinel()),
        }
    }

    fn put_back(&mut self, item: char) {
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
        // Buffers hold whole code points, so the cursor can never address
        // half of one; the decoder carry lives strictly past every retained
        // buffer.
        debug_assert!(
            self.decoder.carry_len() == 0 || !self.chain.at_terminal_end(),
            "checkpoint taken inside a partially decoded code point"
        );
        let (buffer_index, offset) = self.chain.cursor();
        let position = self.chain.cursor_buffer_position();
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

    fn get_between(&self, start: &Checkpoint, end: &Checkpoint) -> Vec<char> {
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
        self.decoder.reset();
        self.pending_cr = false;
        self.pending_error = None;
        self.ended = false;
        self.next_position = 0;
        self.state.reset();
        debug!("char stream sequence reset");
        Ok(())
    }
}
