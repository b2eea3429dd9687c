//! Boundary detection strategies
//!
//! A [`Mailbox`](crate::mailbox::Mailbox) delegates indexing to a
//! [`TocStrategy`], so the same access layer works with either the strict
//! or the classic separator rules.

use std::io::{Read, Seek};

use crate::classic::ClassicTocBuilder;
use crate::config::Config;
use crate::error::Result;
use crate::strict::StrictTocBuilder;
use crate::toc::{LineTerminator, TableOfContents};

/// Produces a table of contents from a seekable byte stream
pub trait TocStrategy {
    /// Scan the whole stream from offset 0.
    ///
    /// Read errors are returned as-is; malformed input never is an error.
    fn generate_toc<R: Read + Seek>(&self, reader: &mut R) -> Result<TableOfContents>;

    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Line terminator the stop offsets are computed with
    fn terminator(&self) -> LineTerminator;
}

/// Strategy selected at runtime from configuration
#[derive(Debug, Clone)]
pub enum ConfiguredStrategy {
    Strict(StrictTocBuilder),
    Classic(ClassicTocBuilder),
}

impl ConfiguredStrategy {
    pub fn from_config(config: &Config) -> Self {
        if config.parser.strict {
            Self::Strict(StrictTocBuilder::from_config(config))
        } else {
            Self::Classic(ClassicTocBuilder::new(config.parser.line_terminator))
        }
    }
}

impl TocStrategy for ConfiguredStrategy {
    fn generate_toc<R: Read + Seek>(&self, reader: &mut R) -> Result<TableOfContents> {
        match self {
            Self::Strict(builder) => builder.generate_toc(reader),
            Self::Classic(builder) => builder.generate_toc(reader),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Strict(builder) => builder.name(),
            Self::Classic(builder) => builder.name(),
        }
    }

    fn terminator(&self) -> LineTerminator {
        match self {
            Self::Strict(builder) => builder.terminator(),
            Self::Classic(builder) => builder.terminator(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const QUOTED: &str = "From a@x Mon Jan 1 00:00:00 2020\nSubject: hi\n\n\
                          From the author: thanks.\n";

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        assert_eq!(ConfiguredStrategy::from_config(&config).name(), "strict");

        config.parser.strict = false;
        assert_eq!(ConfiguredStrategy::from_config(&config).name(), "classic");
    }

    #[test]
    fn test_terminator_follows_config() {
        let mut config = Config::default();
        config.parser.line_terminator = LineTerminator::CrLf;
        assert_eq!(
            ConfiguredStrategy::from_config(&config).terminator(),
            LineTerminator::CrLf
        );

        config.parser.strict = false;
        config.parser.line_terminator = LineTerminator::Lf;
        assert_eq!(
            ConfiguredStrategy::from_config(&config).terminator(),
            LineTerminator::Lf
        );
    }

    #[test]
    fn test_strategies_disagree_on_body_from_lines() {
        let mut config = Config::default();
        let strict = ConfiguredStrategy::from_config(&config);
        config.parser.strict = false;
        let classic = ConfiguredStrategy::from_config(&config);

        let mut cursor = Cursor::new(QUOTED.as_bytes());
        assert_eq!(strict.generate_toc(&mut cursor).unwrap().len(), 1);
        assert_eq!(classic.generate_toc(&mut cursor).unwrap().len(), 2);
    }
}
