/// Counters accumulated over the lifetime of a sequence instance.
///
/// All counters are monotone; only an explicit `reset()` on the owning
/// sequence clears them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequenceStatistics {
    /// Items consumed from the source (sentinel reads and popped put-backs
    /// excluded).
    pub items_read: usize,
    /// Number of peek calls.
    pub items_peeked: usize,
    /// Number of rewinds applied.
    pub rewinds: usize,
    /// Rewinds whose target lay inside the buffer the cursor already held.
    pub rewinds_to_current_buffer: usize,
    /// Buffer refills performed against the underlying source.
    pub buffer_refills: usize,
    /// Checkpoints handed out.
    pub checkpoints_created: usize,
}

impl SequenceStatistics {
    pub fn new() -> Self {
        Self::default()
    }
}
