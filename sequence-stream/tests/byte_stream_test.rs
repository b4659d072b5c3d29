use std::io::Cursor;

use pretty_assertions::assert_eq;
use sequence_core::{Sequence, StateFlags};
use sequence_stream::{ByteStreamOptions, ByteStreamSequence};

fn seq_with_buffer(data: &[u8], buffer_size: usize) -> ByteStreamSequence<Cursor<Vec<u8>>> {
    ByteStreamSequence::with_options(
        Cursor::new(data.to_vec()),
        ByteStreamOptions {
            buffer_size,
            ..ByteStreamOptions::default()
        },
    )
}

fn read_all<S: Sequence>(seq: &mut S) -> Vec<S::Item> {
    let mut out = Vec::new();
    loop {
        let before = seq.consumed();
        let item = seq.get_next().unwrap();
        if seq.consumed() == before {
            // Sentinel read: consumed did not advance.
            return out;
        }
        out.push(item);
    }
}

#[test]
fn test_reads_across_buffer_boundaries() {
    let mut seq = seq_with_buffer(b"abcdefghij", 3);
    assert_eq!(read_all(&mut seq), b"abcdefghij".to_vec());
    assert_eq!(seq.consumed(), 10);
    assert_eq!(seq.get_next().unwrap(), 0);
    // 3 + 3 + 3 + 1
    assert_eq!(seq.statistics().buffer_refills, 4);
}

#[test]
fn test_exact_multiple_of_buffer_size() {
    let mut seq = seq_with_buffer(b"abcdef", 3);
    assert_eq!(read_all(&mut seq), b"abcdef".to_vec());
    assert_eq!(seq.get_next().unwrap(), 0);
    assert!(seq.is_at_end());
    // Two full buffers plus the empty read that discovers the end.
    assert_eq!(seq.statistics().buffer_refills, 3);
}

#[test]
fn test_empty_source() {
    let mut seq = seq_with_buffer(b"", 4);
    assert_eq!(seq.get_next().unwrap(), 0);
    assert!(seq.is_at_end());
    assert!(seq.flags().contains(StateFlags::END_OF_INPUT));
    assert_eq!(seq.consumed(), 0);
}

#[test]
fn test_peek_is_idempotent_and_refills() {
    let mut seq = seq_with_buffer(b"xy", 1);
    for _ in 0..3 {
        assert_eq!(seq.peek().unwrap(), b'x');
    }
    assert_eq!(seq.consumed(), 0);
    assert_eq!(seq.statistics().buffer_refills, 1);
    assert_eq!(seq.get_next().unwrap(), b'x');
}

#[test]
fn test_sentinel_is_stable() {
    let mut seq = seq_with_buffer(b"a", 4);
    seq.get_next().unwrap();
    for _ in 0..3 {
        assert_eq!(seq.get_next().unwrap(), 0);
        assert!(seq.is_at_end());
    }
    assert_eq!(seq.consumed(), 1);
}

#[test]
fn test_custom_sentinel() {
    let mut seq = ByteStreamSequence::with_options(
        Cursor::new(b"a".to_vec()),
        ByteStreamOptions {
            end_sentinel: 0xFF,
            ..ByteStreamOptions::default()
        },
    );
    seq.get_next().unwrap();
    assert_eq!(seq.get_next().unwrap(), 0xFF);
}

#[test]
fn test_rewind_within_current_buffer() {
    let mut seq = seq_with_buffer(b"abcdef", 5);
    seq.get_next().unwrap();
    let cp = seq.checkpoint();
    seq.get_next().unwrap();
    seq.get_next().unwrap();
    assert!(seq.rewind(&cp));
    assert_eq!(seq.get_next().unwrap(), b'b');

    let stats = seq.statistics();
    assert_eq!(stats.rewinds, 1);
    assert_eq!(stats.rewinds_to_current_buffer, 1);
}

#[test]
fn test_rewind_to_earlier_buffer_without_io() {
    let mut seq = seq_with_buffer(b"abcdefgh", 2);
    seq.get_next().unwrap();
    let cp = seq.checkpoint();
    for _ in 0..6 {
        seq.get_next().unwrap();
    }
    let refills_before = seq.statistics().buffer_refills;

    assert!(seq.rewind(&cp));
    assert_eq!(seq.consumed(), 1);
    assert_eq!(seq.get_next().unwrap(), b'b');
    assert_eq!(seq.get_next().unwrap(), b'c');
    // Replayed from retained buffers; no new refills.
    assert_eq!(seq.statistics().buffer_refills, refills_before);
    assert_eq!(seq.statistics().rewinds, 1);
    assert_eq!(seq.statistics().rewinds_to_current_buffer, 0);
}

#[test]
fn test_statistics_example() {
    // 6 items, buffer size 5: read one, checkpoint, read two, rewind,
    // then read through to exhaustion.
    let mut seq = seq_with_buffer(&[1, 2, 3, 4, 5, 6], 5);
    seq.get_next().unwrap();
    let cp = seq.checkpoint();
    seq.get_next().unwrap();
    seq.get_next().unwrap();
    assert!(seq.rewind(&cp));
    while !seq.is_at_end() {
        seq.get_next().unwrap();
    }
    let stats = seq.statistics();
    assert_eq!(stats.checkpoints_created, 1);
    assert_eq!(stats.rewinds, 1);
    assert_eq!(stats.rewinds_to_current_buffer, 1);
    assert_eq!(seq.consumed(), 6);
}

#[test]
fn test_get_between_single_buffer() {
    let mut seq = seq_with_buffer(b"abcdef", 10);
    seq.get_next().unwrap();
    let start = seq.checkpoint();
    seq.get_next().unwrap();
    seq.get_next().unwrap();
    seq.get_next().unwrap();
    let end = seq.checkpoint();
    assert_eq!(seq.get_between(&start, &end), b"bcd".to_vec());
}

#[test]
fn test_get_between_spanning_buffers() {
    let mut seq = seq_with_buffer(b"abcdefghij", 3);
    seq.get_next().unwrap();
    let start = seq.checkpoint();
    for _ in 0..7 {
        seq.get_next().unwrap();
    }
    let end = seq.checkpoint();
    assert_eq!(seq.get_between(&start, &end), b"bcdefgh".to_vec());
}

#[test]
fn test_get_between_out_of_order_is_empty() {
    let mut seq = seq_with_buffer(b"abcdef", 2);
    let start = seq.checkpoint();
    for _ in 0..4 {
        seq.get_next().unwrap();
    }
    let end = seq.checkpoint();
    assert_eq!(seq.get_between(&end, &start), Vec::<u8>::new());
}

#[test]
fn test_rewind_at_exhaustion_is_noop() {
    let mut seq = seq_with_buffer(b"ab", 2);
    read_all(&mut seq);
    seq.get_next().unwrap();
    let cp = seq.checkpoint();
    assert!(seq.rewind(&cp));
    assert!(seq.is_at_end());
    assert_eq!(seq.get_next().unwrap(), 0);
    assert_eq!(seq.consumed(), 2);
}

#[test]
fn test_newline_bytes_update_location() {
    let mut seq = seq_with_buffer(b"a\nb", 2);
    seq.get_next().unwrap();
    assert_eq!(seq.current_location().line, 1);
    seq.get_next().unwrap();
    assert_eq!(seq.current_location().line, 2);
    assert_eq!(seq.current_location().column, 0);
    assert!(seq.flags().contains(StateFlags::START_OF_LINE));
}

#[test]
fn test_checkpoint_stream_position() {
    let mut seq = seq_with_buffer(b"abcdef", 2);
    for _ in 0..3 {
        seq.get_next().unwrap();
    }
    let cp = seq.checkpoint();
    assert_eq!(cp.stream_position(), 3);
    assert_eq!(cp.buffer_index(), 1);
    assert_eq!(cp.offset(), 1);
}

#[test]
fn test_reset_reseeks_and_clears() {
    let mut seq = seq_with_buffer(b"abc", 2);
    read_all(&mut seq);
    seq.reset().unwrap();
    assert_eq!(seq.consumed(), 0);
    assert!(!seq.is_at_end());
    assert_eq!(seq.statistics().buffer_refills, 0);
    assert_eq!(read_all(&mut seq), b"abc".to_vec());
}

#[test]
fn test_put_back_and_rewind_discards() {
    let mut seq = seq_with_buffer(b"ab", 2);
    seq.get_next().unwrap();
    let cp = seq.checkpoint();
    seq.put_back(b'z');
    assert_eq!(seq.peek().unwrap(), b'z');
    assert!(seq.rewind(&cp));
    assert_eq!(seq.get_next().unwrap(), b'b');
}

/// Reader that fragments its data and injects one `Interrupted` error
/// between fragments.
struct InterruptedReader {
    inner: Cursor<Vec<u8>>,
    max_read: usize,
    calls: usize,
    interrupt_on_call: usize,
}

impl InterruptedReader {
    fn new(data: &[u8], max_read: usize, interrupt_on_call: usize) -> Self {
        Self {
            inner: Cursor::new(data.to_vec()),
            max_read,
            calls: 0,
            interrupt_on_call,
        }
    }
}

impl std::io::Read for InterruptedReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.calls += 1;
        if self.calls == self.interrupt_on_call {
            return Err(std::io::Error::new(
                std::io::ErrorKind::Interrupted,
                "interrupted",
            ));
        }
        let limit = buf.len().min(self.max_read);
        self.inner.read(&mut buf[..limit])
    }
}

impl std::io::Seek for InterruptedReader {
    fn seek(&mut self, pos: std::io::SeekFrom) -> std::io::Result<u64> {
        self.inner.seek(pos)
    }
}

#[test]
fn test_interrupted_read_mid_refill_loses_nothing() {
    // "abc" lands in the chunk, then the reader is interrupted, then "def".
    let reader = InterruptedReader::new(b"abcdef", 3, 2);
    let mut seq = ByteStreamSequence::with_options(
        reader,
        ByteStreamOptions {
            buffer_size: 6,
            ..ByteStreamOptions::default()
        },
    );
    assert_eq!(read_all(&mut seq), b"abcdef".to_vec());
    assert!(seq.is_at_end());
}
