use std::io::Cursor;

use pretty_assertions::assert_eq;
use sequence_core::{Sequence, SequenceError, StateFlags};
use sequence_stream::{CharStreamOptions, CharStreamSequence, TextEncoding};

fn seq_with(text: &str, buffer_size: usize) -> CharStreamSequence<Cursor<Vec<u8>>> {
    CharStreamSequence::with_options(
        Cursor::new(text.as_bytes().to_vec()),
        CharStreamOptions {
            buffer_size,
            ..CharStreamOptions::default()
        },
    )
}

fn raw_seq_with(text: &str, buffer_size: usize) -> CharStreamSequence<Cursor<Vec<u8>>> {
    CharStreamSequence::with_options(
        Cursor::new(text.as_bytes().to_vec()),
        CharStreamOptions {
            buffer_size,
            normalize_line_endings: false,
            ..CharStreamOptions::default()
        },
    )
}

fn read_all<S: Sequence>(seq: &mut S) -> Vec<S::Item> {
    let mut out = Vec::new();
    loop {
        let before = seq.consumed();
        let item = seq.get_next().unwrap();
        if seq.consumed() == before {
            return out;
        }
        out.push(item);
    }
}

#[test]
fn test_reads_ascii_text() {
    let mut seq = seq_with("hello", 2);
    assert_eq!(read_all(&mut seq), vec!['h', 'e', 'l', 'l', 'o']);
    assert_eq!(seq.get_next().unwrap(), '\0');
    assert_eq!(seq.consumed(), 5);
}

#[test]
fn test_multibyte_chars_within_buffer() {
    let mut seq = seq_with("héllo", 16);
    assert_eq!(read_all(&mut seq), vec!['h', 'é', 'l', 'l', 'o']);
    assert_eq!(seq.consumed(), 5);
}

#[test]
fn test_multibyte_char_split_across_buffers() {
    // 'é' is two bytes; buffer size 3 splits it on "h é l" boundaries.
    let mut seq = seq_with("héllo", 3);
    assert_eq!(read_all(&mut seq), vec!['h', 'é', 'l', 'l', 'o']);
}

#[test]
fn test_code_point_longer_than_buffer() {
    // 🚀 is four bytes; a two-byte buffer forces the decoder to carry it
    // across two refills.
    let mut seq = seq_with("a🚀b", 2);
    assert_eq!(read_all(&mut seq), vec!['a', '🚀', 'b']);
    assert_eq!(seq.consumed(), 3);
}

#[test]
fn test_checkpoint_round_trip_with_tiny_buffer() {
    // Checkpoints always sit on whole code points, even when one encoded
    // code point spans several refills.
    let mut seq = seq_with("a🚀b🎉c", 3);
    seq.get_next().unwrap();
    let cp = seq.checkpoint();
    assert_eq!(seq.get_next().unwrap(), '🚀');
    assert_eq!(seq.get_next().unwrap(), 'b');
    assert!(seq.rewind(&cp));
    assert_eq!(seq.consumed(), 1);
    assert_eq!(seq.get_next().unwrap(), '🚀');
    assert_eq!(seq.get_next().unwrap(), 'b');
    assert_eq!(seq.get_next().unwrap(), '🎉');
    assert_eq!(seq.get_next().unwrap(), 'c');
}

#[test]
fn test_newline_normalization_table() {
    let mut seq = seq_with("\r\na\r\n", 16);
    assert_eq!(read_all(&mut seq), vec!['\n', 'a', '\n']);
    assert_eq!(seq.get_next().unwrap(), '\0');
    assert_eq!(seq.consumed(), 3);
}

#[test]
fn test_newline_normalization_disabled() {
    let mut seq = raw_seq_with("\r\na\r\n", 16);
    assert_eq!(read_all(&mut seq), vec!['\r', '\n', 'a', '\r', '\n']);
    assert_eq!(seq.consumed(), 5);
}

#[test]
fn test_crlf_straddling_buffer_boundary() {
    // Buffer size 2 puts '\r' at the end of one chunk and '\n' at the
    // start of the next; they still fold into one '\n'.
    let mut seq = seq_with("a\r\nb", 2);
    assert_eq!(read_all(&mut seq), vec!['a', '\n', 'b']);
    assert_eq!(seq.consumed(), 3);
}

#[test]
fn test_bare_cr_at_end_of_source() {
    let mut seq = seq_with("ab\r", 2);
    assert_eq!(read_all(&mut seq), vec!['a', 'b', '\n']);
}

#[test]
fn test_start_of_line_flag_both_modes() {
    let mut seq = seq_with("a\r\nb", 16);
    seq.get_next().unwrap();
    assert!(!seq.flags().contains(StateFlags::START_OF_LINE));
    seq.get_next().unwrap(); // normalized '\n'
    assert!(seq.flags().contains(StateFlags::START_OF_LINE));
    assert_eq!(seq.current_location().line, 2);

    let mut raw = raw_seq_with("a\r\nb", 16);
    raw.get_next().unwrap(); // 'a'
    raw.get_next().unwrap(); // '\r'
    assert!(!raw.flags().contains(StateFlags::START_OF_LINE));
    raw.get_next().unwrap(); // '\n'
    assert!(raw.flags().contains(StateFlags::START_OF_LINE));
}

#[test]
fn test_get_between_spanning_buffers() {
    let mut seq = seq_with("abcdefgh", 3);
    seq.get_next().unwrap();
    let start = seq.checkpoint();
    for _ in 0..5 {
        seq.get_next().unwrap();
    }
    let end = seq.checkpoint();
    assert_eq!(seq.get_between(&start, &end), vec!['b', 'c', 'd', 'e', 'f']);
    assert_eq!(seq.get_between(&end, &start), Vec::<char>::new());
}

#[test]
fn test_ascii_encoding_fast_path() {
    let mut seq = CharStreamSequence::with_options(
        Cursor::new(b"abc".to_vec()),
        CharStreamOptions {
            encoding: TextEncoding::Ascii,
            buffer_size: 2,
            ..CharStreamOptions::default()
        },
    );
    assert_eq!(read_all(&mut seq), vec!['a', 'b', 'c']);
}

#[test]
fn test_ascii_encoding_rejects_high_byte() {
    let mut seq = CharStreamSequence::with_options(
        Cursor::new(vec![b'a', 0xC3, 0xA9]),
        CharStreamOptions {
            encoding: TextEncoding::Ascii,
            ..CharStreamOptions::default()
        },
    );
    assert_eq!(seq.get_next().unwrap(), 'a');
    let err = seq.get_next().unwrap_err();
    assert!(matches!(err, SequenceError::Decode { position: 1, .. }));
    assert!(seq.is_at_end());
}

#[test]
fn test_latin1_encoding() {
    let mut seq = CharStreamSequence::with_options(
        Cursor::new(vec![b'c', 0xE9]),
        CharStreamOptions {
            encoding: TextEncoding::Latin1,
            ..CharStreamOptions::default()
        },
    );
    assert_eq!(read_all(&mut seq), vec!['c', 'é']);
}

#[test]
fn test_truncated_code_point_errors_after_valid_prefix() {
    // "a" followed by the first two bytes of '€'.
    let mut seq = CharStreamSequence::with_options(
        Cursor::new(vec![b'a', 0xE2, 0x82]),
        CharStreamOptions::default(),
    );
    assert_eq!(seq.get_next().unwrap(), 'a');
    let err = seq.get_next().unwrap_err();
    assert!(matches!(err, SequenceError::IncompleteCodePoint { .. }));
}

#[test]
fn test_invalid_utf8_propagates() {
    let mut seq = CharStreamSequence::new(Cursor::new(vec![0xFF]));
    assert!(matches!(
        seq.get_next(),
        Err(SequenceError::Decode { position: 0, .. })
    ));
}

#[test]
fn test_decode_error_surfaces_valid_prefix_first() {
    let mut seq = CharStreamSequence::new(Cursor::new(vec![b'a', b'b', 0xFF]));
    assert_eq!(seq.get_next().unwrap(), 'a');
    assert_eq!(seq.get_next().unwrap(), 'b');
    let err = seq.get_next().unwrap_err();
    assert!(matches!(err, SequenceError::Decode { position: 2, .. }));

    // The error is raised once; the sequence then ends cleanly.
    assert!(seq.is_at_end());
    assert_eq!(seq.get_next().unwrap(), '\0');
    assert_eq!(seq.consumed(), 2);
}

#[test]
fn test_location_and_consumed_through_normalization() {
    let mut seq = seq_with("ab\r\ncd", 4);
    for _ in 0..3 {
        seq.get_next().unwrap();
    }
    // "\r\n" consumed as one logical unit.
    assert_eq!(seq.consumed(), 3);
    assert_eq!(seq.current_location().line, 2);
    assert_eq!(seq.current_location().column, 0);
}

#[test]
fn test_reset_reseeks_and_decodes_again() {
    let mut seq = seq_with("a🚀", 2);
    read_all(&mut seq);
    seq.reset().unwrap();
    assert_eq!(seq.consumed(), 0);
    assert!(!seq.is_at_end());
    assert_eq!(read_all(&mut seq), vec!['a', '🚀']);
}

#[test]
fn test_rewind_at_exhaustion_is_noop() {
    let mut seq = seq_with("ab", 8);
    read_all(&mut seq);
    let cp = seq.checkpoint();
    assert!(seq.rewind(&cp));
    assert!(seq.is_at_end());
    assert_eq!(seq.get_next().unwrap(), '\0');
    assert_eq!(seq.consumed(), 2);
}

/// Reader that fragments its data and injects one `Interrupted` error
/// between fragments.
struct InterruptedReader {
    inner: Cursor<Vec<u8>>,
    max_read: usize,
    calls: usize,
    interrupt_on_call: usize,
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
    // The interruption lands between the two halves of a chunk, with a
    // multi-byte char straddling the fragment boundary.
    let reader = InterruptedReader {
        inner: Cursor::new("abé".as_bytes().to_vec()),
        max_read: 3,
        calls: 0,
        interrupt_on_call: 2,
    };
    let mut seq = CharStreamSequence::with_options(
        reader,
        CharStreamOptions {
            buffer_size: 4,
            ..CharStreamOptions::default()
        },
    );
    assert_eq!(read_all(&mut seq), vec!['a', 'b', 'é']);
    assert!(seq.is_at_end());
}
