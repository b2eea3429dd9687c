//! Access to the messages of an mbox file
//!
//! The file is indexed once by a [`TocStrategy`]; messages are then read
//! on demand by seeking to their recorded byte range.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom};
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{MboxError, Result};
use crate::strategy::TocStrategy;
use crate::strict::SeparatorLine;
use crate::toc::{MessageRange, TableOfContents};

/// An mbox file together with the strategy that indexes it
pub struct Mailbox<S: TocStrategy> {
    path: PathBuf,
    file: File,
    strategy: S,
    toc: TableOfContents,
}

impl<S: TocStrategy> Mailbox<S> {
    /// Open an existing mbox file and build its table of contents
    pub fn open<P: AsRef<Path>>(path: P, strategy: S) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        Self::index(path, file, strategy)
    }

    /// Open an mbox file, creating an empty one if it does not exist
    pub fn create<P: AsRef<Path>>(path: P, strategy: S) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;
        Self::index(path, file, strategy)
    }

    fn index(path: PathBuf, mut file: File, strategy: S) -> Result<Self> {
        let toc = strategy.generate_toc(&mut file)?;

        info!(
            path = %path.display(),
            strategy = strategy.name(),
            messages = toc.len(),
            "Opened mailbox"
        );

        Ok(Self {
            path,
            file,
            strategy,
            toc,
        })
    }

    /// Rebuild the table of contents, e.g. after the file changed on disk
    pub fn refresh(&mut self) -> Result<()> {
        self.toc = self.strategy.generate_toc(&mut self.file)?;
        info!(
            path = %self.path.display(),
            messages = self.toc.len(),
            "Regenerated table of contents"
        );
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn toc(&self) -> &TableOfContents {
        &self.toc
    }

    pub fn len(&self) -> usize {
        self.toc.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toc.is_empty()
    }

    pub fn keys(&self) -> Range<usize> {
        0..self.toc.len()
    }

    pub fn next_key(&self) -> usize {
        self.toc.next_key()
    }

    pub fn file_length(&self) -> u64 {
        self.toc.file_length()
    }

    /// Raw bytes of a message, separator line included
    pub fn get_bytes(&mut self, key: usize) -> Result<Vec<u8>> {
        let range = *self.toc.get(key).ok_or(MboxError::KeyNotFound(key))?;
        debug!(key, start = range.start, stop = range.stop, "Reading message");

        self.file.seek(SeekFrom::Start(range.start))?;
        let mut buf = vec![0u8; range.len() as usize];
        self.file.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// A message split into its separator line and the rest
    pub fn get_message(&mut self, key: usize) -> Result<MboxMessage> {
        let range = *self.toc.get(key).ok_or(MboxError::KeyNotFound(key))?;
        let mut raw = self.get_bytes(key)?;

        let line_len = raw
            .iter()
            .position(|&b| b == b'\n')
            .map(|i| i + 1)
            .unwrap_or(raw.len());
        let content = raw.split_off(line_len);

        let terminator = self.strategy.terminator();
        let from_line = String::from_utf8_lossy(terminator.strip(&raw)).into_owned();

        Ok(MboxMessage {
            key,
            range,
            from_line,
            content,
        })
    }

    /// Iterate over all messages in key order
    pub fn messages(&mut self) -> impl Iterator<Item = Result<MboxMessage>> + '_ {
        self.keys().map(move |key| self.get_message(key))
    }
}

/// A message read from an mbox file
#[derive(Debug, Clone)]
pub struct MboxMessage {
    pub key: usize,
    pub range: MessageRange,
    /// Separator line without the strategy's line terminator
    pub from_line: String,
    /// Everything after the separator line
    pub content: Vec<u8>,
}

impl MboxMessage {
    /// Sender and date from the separator line, if it follows the grammar
    pub fn separator(&self) -> Option<SeparatorLine> {
        SeparatorLine::parse(&self.from_line)
    }

    /// Size of the message in the file
    pub fn size(&self) -> u64 {
        self.range.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strict::StrictTocBuilder;
    use std::io::Write;

    const ARCHIVE: &str = "From a@x Mon Jan 1 00:00:00 2020\nSubject: hi\n\nbody\n\n\
                           From b@y Tue Jan 2 01:02:03 2020\nSubject: yo\n\nbody2\n";

    fn write_archive(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_open_and_read() {
        let archive = write_archive(ARCHIVE);
        let mut mailbox = Mailbox::open(archive.path(), StrictTocBuilder::default()).unwrap();

        assert_eq!(mailbox.len(), 2);
        assert_eq!(mailbox.keys(), 0..2);
        assert_eq!(mailbox.file_length(), ARCHIVE.len() as u64);

        let first = mailbox.get_message(0).unwrap();
        assert_eq!(first.from_line, "From a@x Mon Jan 1 00:00:00 2020");
        assert_eq!(first.content, b"Subject: hi\n\nbody\n");
        assert_eq!(first.separator().unwrap().sender, "a@x");

        let raw = mailbox.get_bytes(1).unwrap();
        assert!(raw.starts_with(b"From b@y"));
        assert!(raw.ends_with(b"body2\n"));
    }

    #[test]
    fn test_unknown_key() {
        let archive = write_archive(ARCHIVE);
        let mut mailbox = Mailbox::open(archive.path(), StrictTocBuilder::default()).unwrap();

        assert!(matches!(mailbox.get_bytes(2), Err(MboxError::KeyNotFound(2))));
        assert!(matches!(mailbox.get_message(7), Err(MboxError::KeyNotFound(7))));
    }

    #[test]
    fn test_messages_iterator() {
        let archive = write_archive(ARCHIVE);
        let mut mailbox = Mailbox::open(archive.path(), StrictTocBuilder::default()).unwrap();

        let senders: Vec<String> = mailbox
            .messages()
            .map(|m| m.unwrap().separator().unwrap().sender)
            .collect();
        assert_eq!(senders, vec!["a@x", "b@y"]);
    }

    #[test]
    fn test_refresh_picks_up_appended_messages() {
        let mut archive = write_archive(ARCHIVE);
        let mut mailbox = Mailbox::open(archive.path(), StrictTocBuilder::default()).unwrap();
        assert_eq!(mailbox.len(), 2);

        archive
            .write_all(b"\nFrom c@z Wed Jan 3 00:00:00 2020\nSubject: three\n")
            .unwrap();
        archive.flush().unwrap();

        mailbox.refresh().unwrap();
        assert_eq!(mailbox.len(), 3);
        assert_eq!(mailbox.next_key(), 3);
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.mbox");

        let result = Mailbox::open(&path, StrictTocBuilder::default());
        assert!(matches!(result, Err(MboxError::Io(_))));
        assert!(!path.exists());
    }

    #[test]
    fn test_create_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.mbox");

        let mut mailbox = Mailbox::create(&path, StrictTocBuilder::default()).unwrap();
        assert!(path.exists());
        assert_eq!(mailbox.path(), path.as_path());
        assert!(mailbox.is_empty());
        assert_eq!(mailbox.file_length(), 0);
        assert_eq!(mailbox.next_key(), 0);
        assert!(matches!(mailbox.get_bytes(0), Err(MboxError::KeyNotFound(0))));
    }

    #[test]
    fn test_create_keeps_existing_content() {
        let archive = write_archive(ARCHIVE);
        let mut mailbox = Mailbox::create(archive.path(), StrictTocBuilder::default()).unwrap();

        assert_eq!(mailbox.len(), 2);
        assert_eq!(mailbox.file_length(), ARCHIVE.len() as u64);

        let second = mailbox.get_message(1).unwrap();
        assert_eq!(second.size(), mailbox.toc().get(1).unwrap().len());
        assert_eq!(second.from_line, "From b@y Tue Jan 2 01:02:03 2020");
    }
}
