//! mbox-rs: Strict mbox indexing
//!
//! Builds an accurate table of contents for mbox archives whose message
//! bodies contain lines that look like separators.
//!
//! # Features
//!
//! - **Strict grammar**: a "From " line only starts a message when it
//!   carries a sender and an asctime-style timestamp
//! - **Retraction**: a separator directly followed by another separator or
//!   by a blank line is read back as body text
//! - **Obfuscated senders**: `user (at) example.com` style addresses are
//!   normalized before matching
//! - **Classic mode**: the usual mboxo rules, for comparison
//!
//! # Example
//!
//! ```no_run
//! use mbox_rs::mailbox::Mailbox;
//! use mbox_rs::strict::StrictTocBuilder;
//! use mbox_rs::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let mut mailbox = Mailbox::open("archive.mbox", StrictTocBuilder::from_config(&config))?;
//!
//!     for message in mailbox.messages() {
//!         let message = message?;
//!         println!("{} {}", message.key, message.from_line);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`strict`]: Separator grammar, obfuscation normalizer and the strict builder
//! - [`classic`]: Classic mboxo builder
//! - [`strategy`]: The `TocStrategy` seam between indexing and access
//! - [`mailbox`]: Message access by key
//! - [`toc`]: Table of contents types
//! - [`config`]: Configuration management
//! - [`error`]: Error types and handling

pub mod classic;
pub mod config;
pub mod error;
pub mod lines;
pub mod logging;
pub mod mailbox;
pub mod strategy;
pub mod strict;
pub mod toc;

// Re-export commonly used types
pub use config::Config;
pub use error::{MboxError, Result};
pub use mailbox::{Mailbox, MboxMessage};
pub use strategy::{ConfiguredStrategy, TocStrategy};
pub use toc::{LineTerminator, MessageRange, TableOfContents};
