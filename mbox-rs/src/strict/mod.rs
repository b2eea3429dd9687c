//! Strict mbox boundary detection
//!
//! Stricter than the classic mboxo rules about what starts a new message:
//! the separator line must carry a timestamp, and separators that are
//! immediately followed by another separator or by a blank line are
//! treated as body text.

pub mod builder;
pub mod grammar;
pub mod obfuscation;

pub use builder::StrictTocBuilder;
pub use grammar::{is_from_line, SeparatorLine};
pub use obfuscation::ObfuscationNormalizer;
