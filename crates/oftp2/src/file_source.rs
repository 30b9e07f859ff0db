//! Abstract Virtual File sources; a `send_file` call reads from one.

use std::fs::File;
use std::io::{self, Read};

use time::OffsetDateTime;

/// A sequential, unseekable source of Virtual File octets.
///
/// No seek is required: this core never sends a nonzero RestartPosition
/// (see SPEC_FULL.md §4.6.4), so a file source only needs to stream forward.
pub trait FileSource {
    fn len(&self) -> u64;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn modified(&self) -> OffsetDateTime;
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

/// Adapts `std::fs::File` to [`FileSource`], always available since file I/O
/// is core to this crate rather than an optional feature.
pub struct StdFileSource {
    file: File,
    len: u64,
    modified: OffsetDateTime,
}

impl StdFileSource {
    pub fn open(path: impl AsRef<std::path::Path>) -> io::Result<Self> {
        let file = File::open(path)?;
        let metadata = file.metadata()?;
        let modified = metadata
            .modified()
            .map(OffsetDateTime::from)
            .unwrap_or_else(|_| OffsetDateTime::now_utc());
        Ok(Self {
            file,
            len: metadata.len(),
            modified,
        })
    }
}

impl FileSource for StdFileSource {
    fn len(&self) -> u64 {
        self.len
    }

    fn modified(&self) -> OffsetDateTime {
        self.modified
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}
