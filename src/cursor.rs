//! Monotonic reading of an in-memory byte buffer.
//!
//! The word2vec binary format interleaves ASCII fields, separated by
//! spaces and newlines, with raw little-endian `f32` values. `ByteCursor`
//! provides the three primitives needed to walk such a buffer: reading a
//! delimited token, reading a single `f32`, and consuming a newline.
//!
//! Once the cursor runs into the end of the buffer, it latches an
//! end-of-input flag. Every subsequent read fails with
//! [`Error::Truncated`] without touching the buffer, so a read loop can
//! stop cleanly on truncated files.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Error, Result};

const SPACE: u8 = b' ';
const NEWLINE: u8 = b'\n';

/// Cursor over a borrowed byte buffer.
///
/// The position only moves forward and never exceeds the buffer length.
#[derive(Clone, Debug)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
    eof: bool,
}

impl<'a> ByteCursor<'a> {
    /// Construct a cursor positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        ByteCursor {
            data,
            pos: 0,
            eof: false,
        }
    }

    /// Get the current read position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Check whether the end of the buffer was reached.
    ///
    /// The end-of-input flag is latched: once this method returns `true`,
    /// it will keep returning `true`.
    pub fn at_end(&mut self) -> bool {
        if self.pos >= self.data.len() {
            self.eof = true;
        }

        self.eof
    }

    /// Read a token that is terminated by a space or a newline.
    ///
    /// The delimiter is consumed, but not part of the returned token. An
    /// empty token is returned when the delimiter is at the current
    /// position. If the buffer ends before a delimiter is found, the
    /// cursor is marked as ended and does not advance.
    pub fn read_token(&mut self) -> Result<&'a [u8]> {
        if self.at_end() {
            return Err(self.truncated("token"));
        }

        let rest = &self.data[self.pos..];
        match rest.iter().position(|&b| b == SPACE || b == NEWLINE) {
            Some(len) => {
                self.pos += len + 1;
                Ok(&rest[..len])
            }
            None => {
                self.eof = true;
                Err(self.truncated("token"))
            }
        }
    }

    /// Read a little-endian IEEE-754 single precision value.
    pub fn read_f32(&mut self) -> Result<f32> {
        if self.at_end() {
            return Err(self.truncated("vector component"));
        }

        let rest = &self.data[self.pos..];
        if rest.len() < 4 {
            self.eof = true;
            return Err(self.truncated("vector component"));
        }

        self.pos += 4;
        Ok(LittleEndian::read_f32(&rest[..4]))
    }

    /// Consume exactly one newline byte.
    ///
    /// Fails with [`Error::Format`] if the byte at the current position
    /// is not a newline.
    pub fn consume_newline(&mut self) -> Result<()> {
        if self.at_end() {
            return Err(self.truncated("newline"));
        }

        let found = self.data[self.pos];
        if found != NEWLINE {
            return Err(Error::Format(format!(
                "Expected a newline, found byte {:#04x} at offset {}",
                found, self.pos
            )));
        }

        self.pos += 1;
        Ok(())
    }

    fn truncated(&self, what: &str) -> Error {
        Error::Truncated(format!(
            "input ended at offset {} while reading {}",
            self.pos, what
        ))
    }
}

#[cfg(test)]
mod tests {
    use byteorder::{LittleEndian, WriteBytesExt};

    use super::ByteCursor;
    use crate::error::Error;

    #[test]
    fn reads_tokens_up_to_delimiters() {
        let mut cursor = ByteCursor::new(b"12 100\nrest");
        assert_eq!(cursor.read_token().unwrap(), b"12");
        assert_eq!(cursor.position(), 3);
        assert_eq!(cursor.read_token().unwrap(), b"100");
        assert_eq!(cursor.position(), 7);
        assert!(!cursor.at_end());
    }

    #[test]
    fn empty_token_at_delimiter() {
        let mut cursor = ByteCursor::new(b" word ");
        assert_eq!(cursor.read_token().unwrap(), b"");
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.read_token().unwrap(), b"word");
    }

    #[test]
    fn unterminated_token_latches_end() {
        let mut cursor = ByteCursor::new(b"abc");
        assert!(cursor.read_token().unwrap_err().is_truncated());
        assert_eq!(cursor.position(), 0);
        assert!(cursor.at_end());

        // Reads after the end was latched keep failing.
        assert!(cursor.read_f32().unwrap_err().is_truncated());
        assert!(cursor.consume_newline().unwrap_err().is_truncated());
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn reads_little_endian_floats() {
        let mut data = Vec::new();
        data.write_f32::<LittleEndian>(1.5).unwrap();
        data.write_f32::<LittleEndian>(-2.25).unwrap();

        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.read_f32().unwrap(), 1.5);
        assert_eq!(cursor.read_f32().unwrap(), -2.25);
        assert_eq!(cursor.position(), 8);
        assert!(cursor.at_end());
        assert!(cursor.read_f32().unwrap_err().is_truncated());
    }

    #[test]
    fn partial_float_is_truncation() {
        let mut cursor = ByteCursor::new(&[0, 0, 128]);
        assert!(cursor.read_f32().unwrap_err().is_truncated());
        assert_eq!(cursor.position(), 0);
        assert!(cursor.at_end());
    }

    #[test]
    fn newline_is_checked() {
        let mut cursor = ByteCursor::new(b"\nx");
        cursor.consume_newline().unwrap();
        assert_eq!(cursor.position(), 1);

        match cursor.consume_newline() {
            Err(Error::Format(_)) => (),
            other => panic!("expected format error, got {:?}", other),
        }
        assert_eq!(cursor.position(), 1);
    }
}
