//! Table of contents types
//!
//! Byte ranges of the messages found in an mbox archive.

use serde::{Deserialize, Serialize};

/// Line terminator used when turning a line position into a stop offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineTerminator {
    /// "\n"
    Lf,
    /// "\r\n"
    CrLf,
}

impl LineTerminator {
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            Self::Lf => b"\n",
            Self::CrLf => b"\r\n",
        }
    }

    /// Length of the terminator in bytes
    pub fn byte_len(&self) -> u64 {
        self.as_bytes().len() as u64
    }

    /// Strip this terminator from the end of `line`, if present
    pub fn strip<'a>(&self, line: &'a [u8]) -> &'a [u8] {
        line.strip_suffix(self.as_bytes()).unwrap_or(line)
    }
}

impl Default for LineTerminator {
    /// The platform's native terminator
    fn default() -> Self {
        if cfg!(windows) {
            Self::CrLf
        } else {
            Self::Lf
        }
    }
}

/// Half-open byte span `[start, stop)` of one message, separator line included
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRange {
    pub start: u64,
    pub stop: u64,
}

impl MessageRange {
    pub fn new(start: u64, stop: u64) -> Self {
        Self { start, stop }
    }

    /// Number of bytes covered by the range
    pub fn len(&self) -> u64 {
        self.stop.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.stop <= self.start
    }
}

/// Ordered message index of an archive.
///
/// Keys are the positions in `ranges`, so they are contiguous from 0 and
/// follow the order of the messages in the stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableOfContents {
    ranges: Vec<MessageRange>,
    /// Total bytes consumed while building the index
    file_length: u64,
}

impl TableOfContents {
    pub fn new(ranges: Vec<MessageRange>, file_length: u64) -> Self {
        debug_assert!(ranges.iter().all(|range| !range.is_empty()));
        debug_assert!(ranges.iter().all(|range| range.stop <= file_length));
        Self {
            ranges,
            file_length,
        }
    }

    /// Range stored under `key`
    pub fn get(&self, key: usize) -> Option<&MessageRange> {
        self.ranges.get(key)
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Next free key
    pub fn next_key(&self) -> usize {
        self.ranges.len()
    }

    pub fn file_length(&self) -> u64 {
        self.file_length
    }

    pub fn ranges(&self) -> &[MessageRange] {
        &self.ranges
    }

    /// Iterate over `(key, range)` pairs in stream order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &MessageRange)> {
        self.ranges.iter().enumerate()
    }

    /// Serialize the index as JSON
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
