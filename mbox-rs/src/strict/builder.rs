//! Strict boundary detection
//!
//! Separator lines are accepted tentatively. The line that follows decides:
//! real content confirms the new message, while another separator or a
//! blank line retracts it and the separator is read back as body text of
//! the message that was open before it.

use std::io::{Read, Seek};
use tracing::{debug, info, trace};

use crate::config::Config;
use crate::error::Result;
use crate::lines::{is_whitespace_only, OffsetLineReader};
use crate::strategy::TocStrategy;
use crate::toc::{LineTerminator, MessageRange, TableOfContents};

use super::grammar::{self, FROM_PREFIX};
use super::obfuscation::ObfuscationNormalizer;

/// Builds a table of contents using the strict separator grammar
#[derive(Debug, Clone, Default)]
pub struct StrictTocBuilder {
    normalizer: ObfuscationNormalizer,
    terminator: LineTerminator,
}

impl StrictTocBuilder {
    pub fn new(normalizer: ObfuscationNormalizer, terminator: LineTerminator) -> Self {
        Self {
            normalizer,
            terminator,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            ObfuscationNormalizer::new(config.obfuscation.patterns.clone()),
            config.parser.line_terminator,
        )
    }

    /// Whether `line` is a genuine separator after normalization.
    ///
    /// The line itself is never modified.
    pub fn is_separator(&self, line: &[u8]) -> bool {
        if !line.starts_with(FROM_PREFIX) {
            return false;
        }

        let text = String::from_utf8_lossy(line);
        grammar::is_from_line(&self.normalizer.normalize(&text))
    }

    /// Scan `reader` from offset 0 and build its table of contents
    pub fn build<R: Read + Seek>(&self, reader: &mut R) -> Result<TableOfContents> {
        let mut lines = OffsetLineReader::rewind(reader)?;
        let mut state = BoundaryState::new(self.terminator.byte_len());

        loop {
            let (line_pos, line) = lines.read_line()?;

            if line.is_empty() {
                state.end_of_stream(line_pos);
                break;
            }

            if self.is_separator(line) {
                trace!(offset = line_pos, "separator line");
                state.separator(line_pos);
            } else if line == self.terminator.as_bytes() {
                state.blank();
            } else {
                state.other(is_whitespace_only(line));
            }
        }

        let toc = TableOfContents::new(state.into_ranges(), lines.position());
        info!(
            messages = toc.len(),
            file_length = toc.file_length(),
            "Built strict table of contents"
        );
        Ok(toc)
    }
}

impl TocStrategy for StrictTocBuilder {
    fn generate_toc<R: Read + Seek>(&self, reader: &mut R) -> Result<TableOfContents> {
        self.build(reader)
    }

    fn name(&self) -> &'static str {
        "strict"
    }

    fn terminator(&self) -> LineTerminator {
        self.terminator
    }
}

/// A separator seen on the previous line, not yet confirmed
#[derive(Debug, Clone, Copy, PartialEq)]
struct Candidate {
    start: u64,
    /// The open message as it would be closed by this separator
    closes: Option<MessageRange>,
}

/// Per-scan state. Finalized ranges are only ever appended to; retraction
/// drops the pending candidate and leaves the open message untouched.
#[derive(Debug)]
struct BoundaryState {
    term_len: u64,
    finalized: Vec<MessageRange>,
    /// Start of the confirmed message that has no stop yet
    open: Option<u64>,
    /// Set exactly when the previous line was a separator
    candidate: Option<Candidate>,
    last_was_blank: bool,
}

impl BoundaryState {
    fn new(term_len: u64) -> Self {
        Self {
            term_len,
            finalized: Vec::new(),
            open: None,
            candidate: None,
            last_was_blank: false,
        }
    }

    fn separator(&mut self, line_pos: u64) {
        // Two separators in a row cannot both start a message
        let retracted = self.retract();

        let stop = if self.last_was_blank || retracted {
            line_pos.saturating_sub(self.term_len)
        } else {
            line_pos
        };
        let closes = self.open.map(|start| MessageRange::new(start, stop));

        self.candidate = Some(Candidate {
            start: line_pos,
            closes,
        });
        self.last_was_blank = false;
    }

    fn blank(&mut self) {
        // A separator followed by a blank line has no headers
        self.retract();
        self.last_was_blank = true;
    }

    fn other(&mut self, whitespace_only: bool) {
        if whitespace_only {
            self.retract();
        } else {
            self.confirm();
        }
        self.last_was_blank = false;
    }

    fn end_of_stream(&mut self, line_pos: u64) {
        self.confirm();

        if let Some(start) = self.open.take() {
            let stop = if self.last_was_blank {
                line_pos.saturating_sub(self.term_len)
            } else {
                line_pos
            };
            debug!(start, stop, "closing last message");
            self.finalized.push(MessageRange::new(start, stop));
        }
    }

    /// Drop the pending separator, returning whether there was one
    fn retract(&mut self) -> bool {
        match self.candidate.take() {
            Some(candidate) => {
                debug!(offset = candidate.start, "retracting false separator");
                true
            }
            None => false,
        }
    }

    /// Commit the pending separator: close the open message and open the new one
    fn confirm(&mut self) {
        if let Some(candidate) = self.candidate.take() {
            if let Some(closed) = candidate.closes {
                debug!(start = closed.start, stop = closed.stop, "closing message");
                self.finalized.push(closed);
            }
            debug!(offset = candidate.start, "opening message");
            self.open = Some(candidate.start);
        }
    }

    fn into_ranges(self) -> Vec<MessageRange> {
        self.finalized
    }
}
