use bitflags::bitflags;

bitflags! {
    /// Position flags queryable at any time without consuming input.
    pub struct StateFlags: u8 {
        /// Set until the first successful consuming read.
        const START_OF_INPUT = 0b0001;
        /// Set once the read position reaches the end sentinel; sticky.
        const END_OF_INPUT = 0b0010;
        /// Set at the start of input and immediately after consuming a newline.
        const START_OF_LINE = 0b0100;
    }
}

impl StateFlags {
    /// Flags of a freshly constructed sequence.
    pub fn initial() -> Self {
        StateFlags::START_OF_INPUT | StateFlags::START_OF_LINE
    }
}

impl Default for StateFlags {
    fn default() -> Self {
        Self::initial()
    }
}
