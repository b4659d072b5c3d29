use std::sync::Arc;

use sequence_core::{Checkpoint, CursorState, Location, Sequence, SequenceError};
use sequence_core::{SequenceStatistics, StateFlags};

/// Configuration for [`StringSequence`].
#[derive(Debug, Clone)]
pub struct StringOptions {
    /// Value returned past end-of-input.
    pub end_sentinel: char,
    /// Fold `"\r\n"`, `"\r"`, and `"\n"` into a single `'\n'`.
    pub normalize_line_endings: bool,
    /// Source name carried in locations.
    pub source_name: Option<Arc<str>>,
}

impl Default for StringOptions {
    fn default() -> Self {
        Self {
            end_sentinel: '\0',
            normalize_line_endings: true,
            source_name: None,
        }
    }
}

/// Char sequence over an in-memory string.
///
/// Line endings are normalized at construction when enabled (the default):
/// a `"\r\n"` pair consumes as one logical unit. Disabled, raw characters
/// including bare `'\r'` are surfaced unmodified.
#[derive(Debug)]
pub struct StringSequence {
    chars: Vec<char>,
    state: CursorState<char>,
}

impl StringSequence {
    pub fn new(text: &str) -> Self {
        Self::with_options(text, StringOptions::default())
    }

    pub fn with_options(text: &str, options: StringOptions) -> Self {
        let chars = if options.normalize_line_endings {
            normalize(text)
        } else {
            text.chars().collect()
        };
        let mut state = CursorState::new(options.end_sentinel, options.source_name);
        if chars.is_empty() {
            state.mark_end();
        }
        Self { chars, state }
    }

    fn sync_end(&mut self) {
        if self.state.consumed() >= self.chars.len() {
            self.state.mark_end();
        }
    }
}

fn normalize(text: &str) -> Vec<char> {
    let mut out = Vec::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            out.push('\n');
        } else {
            out.push(ch);
        }
    }
    out
}

impl Sequence for StringSequence {
    type Item = char;

    fn get_next(&mut self) -> Result<char, SequenceError> {
        if let Some(ch) = self.state.pop_back() {
            return Ok(ch);
        }
        match self.chars.get(self.state.consumed()) {
            Some(&ch) => {
                self.state.note_read(ch == '\n');
                self.sync_end();
                Ok(ch)
            }
            None => Ok(self.state.sentinel()),
        }
    }

    fn peek(&mut self) -> Result<char, SequenceError> {
        self.state.note_peek();
        if let Some(&ch) = self.state.peek_back() {
            return Ok(ch);
        }
        match self.chars.get(self.state.consumed()) {
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

    fn get_between(&self, start: &Checkpoint, end: &Checkpoint) -> Vec<char> {
        if !self.state.owns(start) || !self.state.owns(end) {
            return Vec::new();
        }
        if start.consumed() > end.consumed() {
            return Vec::new();
        }
        let lo = start.consumed().min(self.chars.len());
        let hi = end.consumed().min(self.chars.len());
        self.chars[lo..hi].to_vec()
    }

    fn statistics(&self) -> SequenceStatistics {
        self.state.statistics()
    }

    fn reset(&mut self) -> Result<(), SequenceError> {
        self.state.reset();
        if self.chars.is_empty() {
            self.state.mark_end();
        }
        Ok(())
    }
}
