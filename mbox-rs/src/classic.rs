//! Classic mboxo boundary detection
//!
//! Every line that starts with "From " opens a new message. This is what
//! most mail tools do, and it splits messages whose bodies quote an
//! unescaped "From " line.

use std::io::{Read, Seek};
use tracing::info;

use crate::error::Result;
use crate::lines::OffsetLineReader;
use crate::strategy::TocStrategy;
use crate::strict::grammar::FROM_PREFIX;
use crate::toc::{LineTerminator, MessageRange, TableOfContents};

#[derive(Debug, Clone, Default)]
pub struct ClassicTocBuilder {
    terminator: LineTerminator,
}

impl ClassicTocBuilder {
    pub fn new(terminator: LineTerminator) -> Self {
        Self { terminator }
    }

    /// Scan `reader` from offset 0 and build its table of contents
    pub fn build<R: Read + Seek>(&self, reader: &mut R) -> Result<TableOfContents> {
        let term_len = self.terminator.byte_len();
        let mut lines = OffsetLineReader::rewind(reader)?;
        let mut ranges = Vec::new();
        let mut open: Option<u64> = None;
        let mut last_was_blank = false;

        loop {
            let (line_pos, line) = lines.read_line()?;
            let at_end = line.is_empty();

            if at_end || line.starts_with(FROM_PREFIX) {
                if let Some(start) = open.take() {
                    let stop = if last_was_blank {
                        line_pos - term_len
                    } else {
                        line_pos
                    };
                    ranges.push(MessageRange::new(start, stop));
                }
                if at_end {
                    break;
                }
                open = Some(line_pos);
                last_was_blank = false;
            } else {
                last_was_blank = line == self.terminator.as_bytes();
            }
        }

        let toc = TableOfContents::new(ranges, lines.position());
        info!(
            messages = toc.len(),
            file_length = toc.file_length(),
            "Built classic table of contents"
        );
        Ok(toc)
    }
}

impl TocStrategy for ClassicTocBuilder {
    fn generate_toc<R: Read + Seek>(&self, reader: &mut R) -> Result<TableOfContents> {
        self.build(reader)
    }

    fn name(&self) -> &'static str {
        "classic"
    }

    fn terminator(&self) -> LineTerminator {
        self.terminator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn build(input: &str) -> Vec<(u64, u64)> {
        ClassicTocBuilder::new(LineTerminator::Lf)
            .build(&mut Cursor::new(input.as_bytes()))
            .unwrap()
            .ranges()
            .iter()
            .map(|r| (r.start, r.stop))
            .collect()
    }

    #[test]
    fn test_every_from_line_splits() {
        let input = "From a\nSubject: x\n\nFrom the author\nbody\n";
        let second = input.find("From the").unwrap() as u64;
        assert_eq!(
            build(input),
            vec![(0, second - 1), (second, input.len() as u64)]
        );
    }

    #[test]
    fn test_content_before_first_separator_is_skipped() {
        let input = "preamble\nFrom a\nbody\n";
        assert_eq!(build(input), vec![(9, input.len() as u64)]);
    }

    #[test]
    fn test_no_separator() {
        assert!(build("just text\n").is_empty());
        assert!(build("").is_empty());
    }
}
