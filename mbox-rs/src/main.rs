//! CLI for indexing mbox archives
//!
//! # Usage
//!
//! ```bash
//! # Print the table of contents of one or more archives
//! mbox-rs toc list-2009.mbox list-2010.mbox
//!
//! # Same, as JSON
//! mbox-rs toc --json list-2009.mbox
//!
//! # Count messages with the classic mboxo rules
//! mbox-rs --classic count list-2009.mbox
//!
//! # Dump one message
//! mbox-rs show list-2009.mbox 42
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use mbox_rs::{logging, Config, ConfiguredStrategy, Mailbox, TocStrategy};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const DEFAULT_CONFIG_PATH: &str = "mbox-rs.toml";

#[derive(Parser)]
#[command(name = "mbox-rs")]
#[command(about = "Index mbox archives with strict separator detection", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./mbox-rs.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Use the classic mboxo rules instead of the strict grammar
    #[arg(long, global = true)]
    classic: bool,

    /// Obfuscation pattern to rewrite to "@" (repeatable, replaces the configured list)
    #[arg(long = "pattern", global = true)]
    patterns: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the table of contents
    Toc {
        /// Mbox files
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },
    /// Print message counts
    Count {
        /// Mbox files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Write the raw bytes of one message to stdout
    Show {
        /// Mbox file
        file: PathBuf,
        /// Message key
        key: usize,
    },
}

#[derive(Debug, Serialize)]
struct ArchiveIndex {
    path: PathBuf,
    file_length: u64,
    messages: Vec<TocEntry>,
}

#[derive(Debug, Serialize)]
struct TocEntry {
    key: usize,
    start: u64,
    stop: u64,
    length: u64,
    sender: Option<String>,
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            Config::from_file(DEFAULT_CONFIG_PATH)?
        }
        None => Config::default(),
    };

    if cli.classic {
        config.parser.strict = false;
    }
    if !cli.patterns.is_empty() {
        config.obfuscation.patterns = cli.patterns.clone();
    }

    config.validate()?;
    Ok(config)
}

/// Index one archive; runs on a blocking thread with its own file handle
fn index_archive(path: PathBuf, strategy: ConfiguredStrategy) -> anyhow::Result<ArchiveIndex> {
    let mut mailbox = Mailbox::open(&path, strategy)
        .with_context(|| format!("Failed to index {}", path.display()))?;

    let mut messages = Vec::with_capacity(mailbox.len());
    for message in mailbox.messages() {
        let message = message?;
        messages.push(TocEntry {
            key: message.key,
            start: message.range.start,
            stop: message.range.stop,
            length: message.size(),
            sender: message.separator().map(|sep| sep.sender),
        });
    }

    Ok(ArchiveIndex {
        path: mailbox.path().to_path_buf(),
        file_length: mailbox.file_length(),
        messages,
    })
}

/// Index every archive concurrently, returning results in argument order
async fn index_all(
    files: Vec<PathBuf>,
    strategy: &ConfiguredStrategy,
) -> anyhow::Result<Vec<ArchiveIndex>> {
    let handles: Vec<_> = files
        .into_iter()
        .map(|path| {
            let strategy = strategy.clone();
            tokio::task::spawn_blocking(move || index_archive(path, strategy))
        })
        .collect();

    let mut indexes = Vec::with_capacity(handles.len());
    for handle in handles {
        indexes.push(handle.await??);
    }
    Ok(indexes)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    logging::init(&config.logging)?;

    let strategy = ConfiguredStrategy::from_config(&config);
    info!(strategy = strategy.name(), "Starting mbox-rs");

    match cli.command {
        Commands::Toc { files, json } => {
            let indexes = index_all(files, &strategy).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&indexes)?);
            } else {
                for index in &indexes {
                    println!("{} ({} bytes)", index.path.display(), index.file_length);
                    println!(
                        "{:>6} {:>12} {:>12} {:>10}  {}",
                        "Key",
                        "Start",
                        "Stop",
                        "Length",
                        "Sender"
                    );
                    println!("{:-<70}", "");
                    for entry in &index.messages {
                        println!(
                            "{:>6} {:>12} {:>12} {:>10}  {}",
                            entry.key,
                            entry.start,
                            entry.stop,
                            entry.length,
                            entry.sender.as_deref().unwrap_or("-")
                        );
                    }
                    println!("\nTotal: {} message(s)\n", index.messages.len());
                }
            }
        }
        Commands::Count { files } => {
            for index in index_all(files, &strategy).await? {
                println!("{}\t{}", index.messages.len(), index.path.display());
            }
        }
        Commands::Show { file, key } => {
            let mut mailbox = Mailbox::open(&file, strategy)?;
            let raw = mailbox.get_bytes(key)?;
            debug!(key, bytes = raw.len(), "Writing message");

            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&raw)?;
            stdout.flush()?;
        }
    }

    Ok(())
}
