//! Fixed-size page I/O over a Jet/ACE database file.
//!
//! [`PageScanner`] serves page-sized byte buffers by sequential
//! ([`read_page`](PageScanner::read_page)) or indexed
//! ([`read_page_at_index`](PageScanner::read_page_at_index)) access. The page
//! size comes from the resolved [`FormatVersion`](crate::jet::version::FormatVersion);
//! the scanner itself never second-guesses it.
//!
//! Pages are read into a reusable working buffer. Callers receive [`Page`]
//! snapshots that own a copy of the bytes, so a later read can never change a
//! page that was already handed out.

use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::ops::Deref;

use tracing::trace;

use crate::MdbError;

/// Supertrait combining `Read + Seek` for type-erased readers.
pub trait ReadSeek: Read + Seek {}
impl<T: Read + Seek> ReadSeek for T {}

/// Immutable snapshot of one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    index: u64,
    offset: u64,
    data: Vec<u8>,
}

impl Page {
    /// Page index within the file.
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Absolute byte offset of the page (`index * page_size`).
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Page bytes; always exactly one page long.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Mutable access to this snapshot's own bytes.
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl Deref for Page {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}

/// Check that `file` is a regular file and return its length in bytes.
pub fn regular_file_len(file: &File, name: &str) -> Result<u64, MdbError> {
    let metadata = file
        .metadata()
        .map_err(|e| MdbError::Io(format!("Cannot stat {}: {}", name, e)))?;
    if !metadata.is_file() {
        return Err(MdbError::InvalidFile(format!("{} is not a regular file", name)));
    }
    Ok(metadata.len())
}

/// Page reader over a regular file or any seekable byte source.
pub struct PageScanner {
    reader: Box<dyn ReadSeek>,
    file_size: u64,
    page_size: u32,
    current: Option<u64>,
    buffer: Vec<u8>,
    spare: Vec<u8>,
    last_error: Option<MdbError>,
}

impl PageScanner {
    /// Build a scanner over an open file.
    ///
    /// Fails with [`MdbError::InvalidFile`] if the handle does not refer to a
    /// regular file. The handle is closed on every failure path.
    pub fn new(file: File, page_size: u32) -> Result<Self, MdbError> {
        let file_size = regular_file_len(&file, "database file")?;
        Self::from_reader(file, file_size, page_size)
    }

    /// Build a scanner over an in-memory file image.
    pub fn from_bytes(data: Vec<u8>, page_size: u32) -> Result<Self, MdbError> {
        let file_size = data.len() as u64;
        Self::from_reader(Cursor::new(data), file_size, page_size)
    }

    /// Build a scanner over any seekable source whose total length is known.
    pub fn from_reader<R: Read + Seek + 'static>(
        reader: R,
        file_size: u64,
        page_size: u32,
    ) -> Result<Self, MdbError> {
        if page_size == 0 {
            return Err(MdbError::Argument("page size must be positive".to_string()));
        }
        Ok(PageScanner {
            reader: Box::new(reader),
            file_size,
            page_size,
            current: None,
            buffer: vec![0u8; page_size as usize],
            spare: vec![0u8; page_size as usize],
            last_error: None,
        })
    }

    /// Page size in bytes.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Total length of the underlying file in bytes.
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Number of complete pages in the file. A trailing partial page is not counted.
    pub fn page_count(&self) -> u64 {
        self.file_size / self.page_size as u64
    }

    /// Index of the most recently read page, or `None` if nothing has been read.
    pub fn current_page_index(&self) -> Option<u64> {
        self.current
    }

    /// Byte offset of the most recently read page.
    pub fn current_offset(&self) -> Option<u64> {
        self.current.map(|i| i * self.page_size as u64)
    }

    /// Failure recorded by the most recent read, if it failed with an I/O error.
    ///
    /// Cleared at the start of every read, so it never outlives a later success.
    /// Boundary failures are not recorded here.
    pub fn error(&self) -> Option<&MdbError> {
        self.last_error.as_ref()
    }

    /// Read the page at `index` into the working buffer.
    ///
    /// Returns [`MdbError::PageOutOfRange`] without touching any state when the
    /// page would extend past the end of the file. On an I/O failure the error
    /// is returned and also recorded in [`error`](Self::error); the current page
    /// and its contents are left as they were.
    pub fn read_page_at_index(&mut self, index: u64) -> Result<(), MdbError> {
        self.last_error = None;

        let ps = self.page_size as u64;
        let offset = match index.checked_mul(ps) {
            Some(off) if off.checked_add(ps).is_some_and(|end| end <= self.file_size) => off,
            _ => {
                return Err(MdbError::PageOutOfRange {
                    index,
                    page_count: self.page_count(),
                })
            }
        };

        if let Err(e) = self.fill_spare(offset) {
            let err = MdbError::Io(format!("Cannot read page {}: {}", index, e));
            self.last_error = Some(err.clone());
            return Err(err);
        }

        std::mem::swap(&mut self.buffer, &mut self.spare);
        self.current = Some(index);
        trace!(index, offset, "read page");
        Ok(())
    }

    /// Read the next sequential page: page 0 first, then `current + 1`.
    pub fn read_page(&mut self) -> Result<(), MdbError> {
        let next = self.current.map_or(0, |i| i + 1);
        self.read_page_at_index(next)
    }

    /// Return to the "nothing read yet" state.
    pub fn rewind(&mut self) {
        self.current = None;
        self.last_error = None;
    }

    /// Snapshot of the current page, or `None` before the first successful read.
    pub fn page(&self) -> Option<Page> {
        self.current.map(|index| Page {
            index,
            offset: index * self.page_size as u64,
            data: self.buffer.clone(),
        })
    }

    /// Read and return the page at `index` in one step.
    pub fn fetch(&mut self, index: u64) -> Result<Page, MdbError> {
        self.read_page_at_index(index)?;
        self.page().ok_or_else(|| MdbError::Io(format!("Page {} not buffered", index)))
    }

    /// Visit every complete page from the start of the file.
    ///
    /// Stops cleanly at the end-of-file boundary; any other failure, or an
    /// error returned by the callback, stops the scan and is returned.
    pub fn for_each_page<F>(&mut self, mut callback: F) -> Result<(), MdbError>
    where
        F: FnMut(u64, &[u8]) -> Result<(), MdbError>,
    {
        self.rewind();
        loop {
            match self.read_page() {
                Ok(()) => {}
                Err(e) if e.is_page_out_of_range() => return Ok(()),
                Err(e) => return Err(e),
            }
            let index = self.current.unwrap_or(0);
            callback(index, &self.buffer)?;
        }
    }

    /// Release the underlying file handle.
    pub fn close(self) -> Result<(), MdbError> {
        drop(self);
        Ok(())
    }

    /// Read one page worth of bytes at `offset` into the spare buffer.
    ///
    /// A read that stops early at end-of-file zero-fills the remainder.
    fn fill_spare(&mut self, offset: u64) -> io::Result<()> {
        self.reader.seek(SeekFrom::Start(offset))?;

        let mut filled = 0;
        while filled < self.spare.len() {
            match self.reader.read(&mut self.spare[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        self.spare[filled..].fill(0);
        Ok(())
    }
}
