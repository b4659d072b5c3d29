/// One filled chunk of decoded items plus the metadata needed to map
/// checkpoints back onto it.
#[derive(Debug)]
pub(crate) struct Buffer<T> {
    items: Vec<T>,
    start_consumed: usize,
    start_position: u64,
    is_last: bool,
}

impl<T> Buffer<T> {
    pub fn new(items: Vec<T>, start_consumed: usize, start_position: u64, is_last: bool) -> Self {
        Self {
            items,
            start_consumed,
            start_position,
            is_last,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Item index (from start of input) of the first item in this buffer.
    #[allow(dead_code)]
    pub fn start_consumed(&self) -> usize {
        self.start_consumed
    }

    /// Stream byte offset at which this buffer begins.
    pub fn start_position(&self) -> u64 {
        self.start_position
    }

    pub fn is_last(&self) -> bool {
        self.is_last
    }

    pub fn mark_last(&mut self) {
        self.is_last = true;
    }
}

/// Oldest-first list of retained buffers plus the read cursor.
///
/// Nothing is ever evicted: a checkpoint can reference an arbitrarily old
/// buffer, and since caller-side checkpoint lifetimes are not observable,
/// full retention is the simple correct policy. `clear()` (driven by the
/// owning sequence's reset) is the one reclamation point.
#[derive(Debug)]
pub(crate) struct BufferChain<T> {
    buffers: Vec<Buffer<T>>,
    buffer_index: usize,
    offset: usize,
}

impl<T: Clone> BufferChain<T> {
    pub fn new() -> Self {
        Self {
            buffers: Vec::new(),
            buffer_index: 0,
            offset: 0,
        }
    }

    pub fn clear(&mut self) {
        self.buffers.clear();
        self.buffer_index = 0;
        self.offset = 0;
    }

    /// Total number of items held across all buffers.
    pub fn total_items(&self) -> usize {
        self.buffers
            .last()
            .map(|buf| buf.start_consumed + buf.len())
            .unwrap_or(0)
    }

    /// Appends a buffer and hops the cursor onto it if the cursor was
    /// parked at the end of the previous one.
    pub fn push(&mut self, buffer: Buffer<T>) {
        debug_assert!(buffer.len() > 0, "empty buffers are never retained");
        self.buffers.push(buffer);
        self.normalize_cursor();
    }

    fn normalize_cursor(&mut self) {
        while self.buffer_index + 1 < self.buffers.len()
            && self.offset >= self.buffers[self.buffer_index].len()
        {
            self.buffer_index += 1;
            self.offset = 0;
        }
    }

    /// Item at the cursor, if the cursor lies inside a filled buffer.
    pub fn current(&self) -> Option<&T> {
        self.buffers
            .get(self.buffer_index)
            .and_then(|buf| buf.items.get(self.offset))
    }

    /// Moves the cursor past the current item.
    pub fn advance(&mut self) {
        self.offset += 1;
        self.normalize_cursor();
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.buffer_index, self.offset)
    }

    /// Repositions the cursor at coordinates captured in a checkpoint.
    /// The referenced buffer must still be retained.
    pub fn set_cursor(&mut self, buffer_index: usize, offset: usize) {
        if self.buffers.is_empty() {
            assert!(
                buffer_index == 0 && offset == 0,
                "checkpoint references a buffer that is no longer retained"
            );
        } else {
            assert!(
                buffer_index < self.buffers.len() && offset <= self.buffers[buffer_index].len(),
                "checkpoint references a buffer that is no longer retained"
            );
        }
        self.buffer_index = buffer_index;
        self.offset = offset;
        self.normalize_cursor();
    }

    /// Stream byte offset of the buffer the cursor is in (0 before the
    /// first refill).
    pub fn cursor_buffer_position(&self) -> u64 {
        self.buffers
            .get(self.buffer_index)
            .map(Buffer::start_position)
            .unwrap_or(0)
    }

    /// True when the cursor sits at the end of a buffer marked terminal.
    pub fn at_terminal_end(&self) -> bool {
        match self.buffers.get(self.buffer_index) {
            Some(buf) => buf.is_last() && self.offset >= buf.len(),
            None => false,
        }
    }

    /// Marks the newest buffer terminal (end of source reached).
    pub fn mark_last(&mut self) {
        if let Some(buf) = self.buffers.last_mut() {
            buf.mark_last();
        }
    }

    /// Concatenates the items between two cursor positions, possibly
    /// spanning several retained buffers.
    pub fn slice_between(&self, from: (usize, usize), to: (usize, usize)) -> Vec<T> {
        if self.buffers.is_empty() || from.0 > to.0 {
            return Vec::new();
        }
        assert!(
            to.0 < self.buffers.len(),
            "checkpoint references a buffer that is no longer retained"
        );
        let mut out = Vec::new();
        for index in from.0..=to.0 {
            let buf = &self.buffers[index];
            let lo = if index == from.0 { from.1 } else { 0 };
            let hi = if index == to.0 { to.1 } else { buf.len() };
            if lo < hi {
                out.extend(buf.items[lo..hi].iter().cloned());
            }
        }
        out
    }
}
