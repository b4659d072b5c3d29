use sequence_core::SequenceError;

/// Text encoding used to decode a byte stream into characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    /// UTF-8; multi-byte code points may span buffer refills.
    #[default]
    Utf8,
    /// 7-bit ASCII; bytes above 0x7F are a decode error.
    Ascii,
    /// ISO-8859-1; every byte maps directly to a code point.
    Latin1,
}

impl TextEncoding {
    pub fn name(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Ascii => "ascii",
            TextEncoding::Latin1 => "latin-1",
        }
    }

    /// Single-byte encodings need no carry bookkeeping between refills.
    pub fn is_single_byte(&self) -> bool {
        !matches!(self, TextEncoding::Utf8)
    }
}

/// Incremental decoder feeding bytes in and producing chars.
///
/// A multi-byte UTF-8 code point split across chunk boundaries is carried
/// over and completed by the following chunk, so decoding works even when
/// the chunk size is smaller than one encoded code point.
#[derive(Debug)]
pub(crate) struct Decoder {
    encoding: TextEncoding,
    carry: [u8; 4],
    carry_len: usize,
    carry_need: usize,
    carry_start: u64,
}

impl Decoder {
    pub fn new(encoding: TextEncoding) -> Self {
        Self {
            encoding,
            carry: [0; 4],
            carry_len: 0,
            carry_need: 0,
            carry_start: 0,
        }
    }

    /// Number of carried bytes waiting for the rest of their code point.
    pub fn carry_len(&self) -> usize {
        self.carry_len
    }

    pub fn reset(&mut self) {
        self.carry_len = 0;
        self.carry_need = 0;
        self.carry_start = 0;
    }

    /// Decodes a chunk read at stream offset `base_position`, appending
    /// completed chars to `out`. Incomplete trailing bytes are carried.
    pub fn decode(
        &mut self,
        bytes: &[u8],
        base_position: u64,
        out: &mut Vec<char>,
    ) -> Result<(), SequenceError> {
        match self.encoding {
            TextEncoding::Utf8 => self.decode_utf8(bytes, base_position, out),
            TextEncoding::Ascii => {
                for (i, &byte) in bytes.iter().enumerate() {
                    if byte > 0x7F {
                        return Err(SequenceError::Decode {
                            encoding: self.encoding.name(),
                            byte,
                            position: base_position + i as u64,
                        });
                    }
                    out.push(byte as char);
                }
                Ok(())
            }
            TextEncoding::Latin1 => {
                out.extend(bytes.iter().map(|&byte| char::from(byte)));
                Ok(())
            }
        }
    }

    /// Called at end of source; fails if bytes of an unfinished code point
    /// are still carried.
    pub fn finish(&self) -> Result<(), SequenceError> {
        if self.carry_len > 0 {
            return Err(SequenceError::IncompleteCodePoint {
                position: self.carry_start,
            });
        }
        Ok(())
    }

    fn decode_utf8(
        &mut self,
        bytes: &[u8],
        base_position: u64,
        out: &mut Vec<char>,
    ) -> Result<(), SequenceError> {
        for (i, &byte) in bytes.iter().enumerate() {
            let position = base_position + i as u64;
            if self.carry_len == 0 {
                match byte {
                    0x00..=0x7F => out.push(byte as char),
                    0xC2..=0xDF => self.begin_carry(byte, 2, position),
                    0xE0..=0xEF => self.begin_carry(byte, 3, position),
                    0xF0..=0xF4 => self.begin_carry(byte, 4, position),
                    _ => {
                        return Err(SequenceError::Decode {
                            encoding: "utf-8",
                            byte,
                            position,
                        })
                    }
                }
            } else {
                if byte & 0xC0 != 0x80 {
                    return Err(SequenceError::Decode {
                        encoding: "utf-8",
                        byte,
                        position,
                    });
                }
                self.carry[self.carry_len] = byte;
                self.carry_len += 1;
                if self.carry_len == self.carry_need {
                    out.push(self.complete_carry()?);
                }
            }
        }
        Ok(())
    }

    fn begin_carry(&mut self, byte: u8, need: usize, position: u64) {
        self.carry[0] = byte;
        self.carry_len = 1;
        self.carry_need = need;
        self.carry_start = position;
    }

    fn complete_carry(&mut self) -> Result<char, SequenceError> {
        let need = self.carry_need;
        let bytes = &self.carry[..need];
        let code_point = match need {
            2 => ((bytes[0] & 0x1F) as u32) << 6 | (bytes[1] & 0x3F) as u32,
            3 => {
                ((bytes[0] & 0x0F) as u32) << 12
                    | ((bytes[1] & 0x3F) as u32) << 6
                    | (bytes[2] & 0x3F) as u32
            }
            _ => {
                ((bytes[0] & 0x07) as u32) << 18
                    | ((bytes[1] & 0x3F) as u32) << 12
                    | ((bytes[2] & 0x3F) as u32) << 6
                    | (bytes[3] & 0x3F) as u32
            }
        };
        let minimum = match need {
            2 => 0x80,
            3 => 0x800,
            _ => 0x10000,
        };
        let position = self.carry_start;
        let first = self.carry[0];
        self.carry_len = 0;
        self.carry_need = 0;
        if code_point < minimum {
            // Overlong encoding.
            return Err(SequenceError::Decode {
                encoding: "utf-8",
                byte: first,
                position,
            });
        }
        char::from_u32(code_point).ok_or(SequenceError::Decode {
            encoding: "utf-8",
            byte: first,
            position,
        })
    }
}
