//! Character sources for the tokenizer.
//!
//! The tokenizer pulls one character at a time, and needs to know when input is exhausted.
//! `CharSource` is that contract; this module provides it for in-memory text
//! (any character iterator) and for buffered byte readers holding UTF-8.

use std::io::{BufRead, ErrorKind};

/// A source of characters with explicit end-of-input.
pub trait CharSource {
    /// Pull the next character, or `None` at end of input.
    fn next_char(&mut self) -> std::io::Result<Option<char>>;
}

impl<T: CharSource + ?Sized> CharSource for &mut T {
    fn next_char(&mut self) -> std::io::Result<Option<char>> {
        (**self).next_char()
    }
}

/// Characters from an in-memory iterator, e.g. `str::chars`.
#[derive(Debug, Clone)]
pub struct TextSource<I> {
    chars: I,
}

impl<I> TextSource<I>
where
    I: Iterator<Item = char>,
{
    pub fn new(chars: I) -> Self {
        TextSource { chars }
    }
}

impl<I> CharSource for TextSource<I>
where
    I: Iterator<Item = char>,
{
    fn next_char(&mut self) -> std::io::Result<Option<char>> {
        Ok(self.chars.next())
    }
}

/// Characters decoded from a buffered reader of UTF-8 bytes.
///
/// Bytes are consumed only as characters are requested,
/// so the reader is left just past the last character handed out.
/// The reader is never closed; `into_inner` returns it to the caller.
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
}

impl<R> ReaderSource<R>
where
    R: BufRead,
{
    pub fn new(reader: R) -> Self {
        ReaderSource { reader }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    fn next_byte(&mut self) -> std::io::Result<Option<u8>> {
        loop {
            let available = match self.reader.fill_buf() {
                Ok(available) => available,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            let Some(&byte) = available.first() else {
                return Ok(None);
            };
            self.reader.consume(1);
            return Ok(Some(byte));
        }
    }
}

/// Number of bytes in the UTF-8 sequence led by this byte,
/// or None if it cannot start a sequence.
fn sequence_width(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7F => Some(1),
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF4 => Some(4),
        _ => None,
    }
}

fn invalid_utf8(msg: impl Into<String>) -> std::io::Error {
    std::io::Error::new(ErrorKind::InvalidData, msg.into())
}

impl<R> CharSource for ReaderSource<R>
where
    R: BufRead,
{
    fn next_char(&mut self) -> std::io::Result<Option<char>> {
        let Some(lead) = self.next_byte()? else {
            return Ok(None);
        };
        let width = sequence_width(lead)
            .ok_or_else(|| invalid_utf8(format!("invalid UTF-8 lead byte {lead:#04x}")))?;

        let mut bytes = [lead, 0, 0, 0];
        for slot in bytes.iter_mut().take(width).skip(1) {
            *slot = self
                .next_byte()?
                .ok_or_else(|| invalid_utf8("input ends inside a UTF-8 sequence"))?;
        }
        let decoded = std::str::from_utf8(&bytes[..width])
            .map_err(|e| invalid_utf8(format!("invalid UTF-8 sequence: {e}")))?;
        Ok(decoded.chars().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Cursor, Read};

    fn drain(mut source: impl CharSource) -> std::io::Result<String> {
        let mut out = String::new();
        while let Some(ch) = source.next_char()? {
            out.push(ch);
        }
        Ok(out)
    }

    #[test]
    fn text_source_yields_all_chars() -> std::io::Result<()> {
        assert_eq!(drain(TextSource::new("(λ x)".chars()))?, "(λ x)");
        Ok(())
    }

    #[test]
    fn reader_source_decodes_multibyte() -> std::io::Result<()> {
        let input = "héllo → 世界 🦀";
        // A one-byte buffer forces every multi-byte sequence across fill_buf calls.
        let reader = BufReader::with_capacity(1, input.as_bytes());
        assert_eq!(drain(ReaderSource::new(reader))?, input);
        Ok(())
    }

    #[test]
    fn reader_source_rejects_bad_lead_byte() {
        let err = drain(ReaderSource::new(Cursor::new(vec![b'a', 0xFF]))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn reader_source_rejects_truncated_sequence() {
        // First two bytes of the three-byte encoding of '世'.
        let err = drain(ReaderSource::new(Cursor::new(vec![0xE4, 0xB8]))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn reader_source_leaves_remainder() -> std::io::Result<()> {
        let mut source = ReaderSource::new(Cursor::new("ab".as_bytes()));
        assert_eq!(source.next_char()?, Some('a'));
        let mut rest = String::new();
        source.into_inner().read_to_string(&mut rest)?;
        assert_eq!(rest, "b");
        Ok(())
    }
}
