//! Line reader that reports the byte offset of every line

use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};

/// Reads an mbox stream one line at a time from offset 0.
///
/// Lines keep their terminator. End of stream is a zero-length line at the
/// final offset.
pub struct OffsetLineReader<R> {
    reader: BufReader<R>,
    line: Vec<u8>,
    position: u64,
}

impl<R: Read + Seek> OffsetLineReader<R> {
    /// Seek `inner` back to the start and wrap it
    pub fn rewind(mut inner: R) -> io::Result<Self> {
        inner.seek(SeekFrom::Start(0))?;
        Ok(Self {
            reader: BufReader::new(inner),
            line: Vec::new(),
            position: 0,
        })
    }
}

impl<R: Read> OffsetLineReader<R> {
    /// Read the next line, returning the offset it starts at and its bytes
    pub fn read_line(&mut self) -> io::Result<(u64, &[u8])> {
        let line_pos = self.position;
        self.line.clear();
        let n = self.reader.read_until(b'\n', &mut self.line)?;
        self.position += n as u64;
        Ok((line_pos, &self.line))
    }

    /// Bytes consumed so far
    pub fn position(&self) -> u64 {
        self.position
    }
}

/// True for lines made only of ASCII whitespace, VT included
pub fn is_whitespace_only(line: &[u8]) -> bool {
    line.iter()
        .all(|b| matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_offsets() {
        let mut cursor = Cursor::new(b"ab\n\ncd".to_vec());
        cursor.seek(SeekFrom::End(0)).unwrap();

        let mut lines = OffsetLineReader::rewind(&mut cursor).unwrap();
        assert_eq!(lines.read_line().unwrap(), (0, &b"ab\n"[..]));
        assert_eq!(lines.read_line().unwrap(), (3, &b"\n"[..]));
        assert_eq!(lines.read_line().unwrap(), (4, &b"cd"[..]));
        assert_eq!(lines.read_line().unwrap(), (6, &b""[..]));
        assert_eq!(lines.position(), 6);
    }

    #[test]
    fn test_whitespace_only() {
        assert!(is_whitespace_only(b" \t\r\n"));
        assert!(is_whitespace_only(b"\x0b\n"));
        assert!(!is_whitespace_only(b" x\n"));
    }
}
