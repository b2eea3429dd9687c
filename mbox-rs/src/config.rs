//! Configuration for mbox-rs

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{MboxError, Result};
use crate::toc::LineTerminator;

/// Main configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Boundary detection settings
    #[serde(default)]
    pub parser: ParserConfig,
    /// Obfuscation catalog used before separator matching
    #[serde(default)]
    pub obfuscation: ObfuscationConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ParserConfig {
    /// Line terminator used in offset arithmetic
    #[serde(default)]
    pub line_terminator: LineTerminator,
    /// Use the strict separator grammar (false selects the classic mboxo rules)
    #[serde(default = "default_strict")]
    pub strict: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObfuscationConfig {
    /// Substrings rewritten to "@", checked in order; the first hit wins
    #[serde(default = "default_patterns")]
    pub patterns: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    /// One of "pretty", "compact" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_strict() -> bool {
    true
}

fn default_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "pretty".to_string()
}

/// Default obfuscation catalog.
///
/// Longer patterns come before the substrings they contain, since only the
/// first pattern found in a line is applied.
pub fn default_patterns() -> Vec<String> {
    [
        " (at) ", " [at] ", "(at)", "[at]", " at ", "_at_", " AT ", " en ", "__at__",
    ]
    .iter()
    .map(|p| p.to_string())
    .collect()
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            line_terminator: LineTerminator::default(),
            strict: default_strict(),
        }
    }
}

impl Default for ObfuscationConfig {
    fn default() -> Self {
        Self {
            patterns: default_patterns(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| MboxError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| MboxError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.obfuscation.patterns.iter().any(|p| p.is_empty()) {
            return Err(MboxError::Config(
                "Obfuscation patterns must not be empty".to_string(),
            ));
        }

        match self.logging.format.as_str() {
            "pretty" | "compact" | "json" => Ok(()),
            other => Err(MboxError::Config(format!("Unknown log format '{}'", other))),
        }
    }
}
