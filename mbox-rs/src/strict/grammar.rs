//! Separator line grammar
//!
//! A line starting with "From " only opens a message when the rest of it
//! looks like a sender followed by an asctime-style timestamp:
//!
//! ```text
//! From sender@example.com Wed Dec 25 12:00:00 2024
//! From sender@example.com Wed Dec 25 12:00 +0100 2024 remote
//! ```
//!
//! Character classes are ASCII-only: whitespace is one of space, tab,
//! CR, LF, VT or FF, word characters are `[0-9A-Za-z_]`.

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;

const WS: &str = r"[ \t\n\r\x0B\x0C]";
const NON_WS: &str = r"[^ \t\n\r\x0B\x0C]";
const WORD: &str = "[0-9A-Za-z_]";
const DIGIT: &str = "[0-9]";

/// Literal prefix every candidate separator starts with
pub const FROM_PREFIX: &[u8] = b"From ";

/// Compiled on first use and shared read-only afterwards
static FROM_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&from_line_pattern()).expect("separator grammar is a valid regex")
});

fn from_line_pattern() -> String {
    format!(
        concat!(
            "^From {ws}*(?P<sender>{nws}+){ws}+",
            "(?P<weekday>{w}{w}{w}){ws}+(?P<month>{w}{w}{w}){ws}+(?P<day>{d}?{d}){ws}+",
            "(?P<time>{d}?{d}:{d}{d}(?::{d}{d})?)(?:{ws}+(?P<zone>{nws}+))?{ws}+",
            "(?P<year>{d}{d}{d}{d}){ws}*{nws}*{ws}*$"
        ),
        ws = WS,
        nws = NON_WS,
        w = WORD,
        d = DIGIT,
    )
}

/// Whether `line` is a genuine separator line.
///
/// The line is expected to be normalized already; its terminator may be
/// left in place.
pub fn is_from_line(line: &str) -> bool {
    FROM_LINE.is_match(line)
}

/// Fields of a separator line that matched the grammar
#[derive(Debug, Clone, PartialEq)]
pub struct SeparatorLine {
    pub sender: String,
    /// Timestamp, when the fields form a valid calendar date
    pub date: Option<NaiveDateTime>,
}

impl SeparatorLine {
    /// Extract the sender and timestamp, `None` if the line is not a separator
    pub fn parse(line: &str) -> Option<Self> {
        let caps = FROM_LINE.captures(line)?;

        let date_str = format!(
            "{} {} {} {} {}",
            &caps["weekday"], &caps["month"], &caps["day"], &caps["time"], &caps["year"]
        );

        Some(Self {
            sender: caps["sender"].to_string(),
            date: parse_asctime(&date_str),
        })
    }
}

/// Parse "Wed Dec 25 12:00:00 2024", seconds optional
fn parse_asctime(date_str: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(date_str, "%a %b %e %H:%M:%S %Y")
        .or_else(|_| NaiveDateTime::parse_from_str(date_str, "%a %b %e %H:%M %Y"))
        .ok()
}
