//! Address obfuscation normalizer
//!
//! Archives scraped from mailing lists often write addresses as
//! `user (at) example.com` to defeat harvesters. The separator grammar needs
//! a single sender token, so candidate lines are rewritten before matching.

use std::borrow::Cow;

#[derive(Debug, Clone, Default)]
pub struct ObfuscationNormalizer {
    patterns: Vec<String>,
}

impl ObfuscationNormalizer {
    /// Create a normalizer from an ordered catalog
    pub fn new(patterns: Vec<String>) -> Self {
        Self { patterns }
    }

    /// Replace every occurrence of the first catalog pattern found in
    /// `line` with "@".
    ///
    /// Only one pattern is ever applied and the result is not scanned
    /// again. Lines without any pattern are borrowed back unchanged.
    pub fn normalize<'a>(&self, line: &'a str) -> Cow<'a, str> {
        if line.is_empty() {
            return Cow::Borrowed(line);
        }

        match self
            .patterns
            .iter()
            .find(|pattern| !pattern.is_empty() && line.contains(pattern.as_str()))
        {
            Some(pattern) => Cow::Owned(line.replace(pattern.as_str(), "@")),
            None => Cow::Borrowed(line),
        }
    }
}
