//! Catalog orchestration.
//!
//! [`Catalog`] ties the other components together: it resolves the format
//! version, builds a [`PageScanner`] sized for it, then decodes page 0 as the
//! [`DefinitionPage`] and the `MSysObjects` table definition (page 2) as a
//! [`TableDefinitionPage`].
//!
//! The Jet definition page carries no pointer to the system catalog; page 2
//! is fixed by convention of the format family.

use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use tracing::debug;

use crate::jet::constants::MSYS_OBJECTS_PAGE;
use crate::jet::definition::DefinitionPage;
use crate::jet::scanner::{regular_file_len, Page, PageScanner};
use crate::jet::table_definition::{next_page_of, TableDefinitionPage};
use crate::jet::version::FormatVersion;
use crate::MdbError;

/// An open Jet/ACE database file.
pub struct Catalog {
    version: FormatVersion,
    scanner: PageScanner,
    definition_page: Option<DefinitionPage>,
    msys_objects: Option<TableDefinitionPage>,
}

impl Catalog {
    /// Open a database file and detect its format version.
    ///
    /// The file handle is released on every failure path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, MdbError> {
        let path = path.as_ref();
        let mut file = File::open(path)
            .map_err(|e| MdbError::Io(format!("Cannot open {}: {}", path.display(), e)))?;
        let file_size = regular_file_len(&file, &path.display().to_string())?;
        let version = FormatVersion::detect(&mut file)?;
        debug!(path = %path.display(), file_size, %version, "opened database");
        Self::init(file, file_size, version)
    }

    /// Open an in-memory database image.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, MdbError> {
        let file_size = data.len() as u64;
        Self::from_reader(Cursor::new(data), file_size)
    }

    /// Open any seekable source whose total length is known.
    pub fn from_reader<R: Read + Seek + 'static>(
        mut reader: R,
        file_size: u64,
    ) -> Result<Self, MdbError> {
        let version = FormatVersion::detect(&mut reader)?;
        Self::init(reader, file_size, version)
    }

    fn init<R: Read + Seek + 'static>(
        reader: R,
        file_size: u64,
        version: FormatVersion,
    ) -> Result<Self, MdbError> {
        let scanner = PageScanner::from_reader(reader, file_size, version.page_size())?;
        Ok(Catalog {
            version,
            scanner,
            definition_page: None,
            msys_objects: None,
        })
    }

    /// Decode the definition page and the system catalog's table definition.
    ///
    /// Stops at the first failure and returns it unchanged; nothing decoded by
    /// a failed call is kept.
    pub fn read(&mut self) -> Result<(), MdbError> {
        self.definition_page = None;
        self.msys_objects = None;

        let page0 = self.scanner.fetch(0)?;
        let definition = DefinitionPage::parse(&page0, self.version)?;

        let chain = self.read_definition_chain(MSYS_OBJECTS_PAGE)?;
        let slices: Vec<&[u8]> = chain.iter().map(|p| p.bytes()).collect();
        let msys_objects = TableDefinitionPage::parse_chain(&slices, self.version)?;

        debug!(
            rows = msys_objects.num_rows,
            pages = chain.len(),
            "read system catalog definition"
        );
        self.definition_page = Some(definition);
        self.msys_objects = Some(msys_objects);
        Ok(())
    }

    /// Read a table definition page and every continuation page it links to.
    ///
    /// The chain is bounded by the page count so a cyclic chain cannot loop.
    pub fn read_definition_chain(&mut self, first: u64) -> Result<Vec<Page>, MdbError> {
        let mut chain = vec![self.scanner.fetch(first)?];
        let limit = self.scanner.page_count() as usize;
        while let Some(next) = chain.last().and_then(|p| next_page_of(p)) {
            if next == 0 {
                break;
            }
            if chain.len() >= limit {
                return Err(MdbError::MalformedTableDefinition(format!(
                    "definition chain starting at page {} does not terminate",
                    first
                )));
            }
            if next as u64 >= self.scanner.page_count() {
                return Err(MdbError::MalformedTableDefinition(format!(
                    "continuation page {} of chain starting at page {} is past end of file ({} pages)",
                    next,
                    first,
                    self.scanner.page_count()
                )));
            }
            chain.push(self.scanner.fetch(next as u64)?);
        }
        Ok(chain)
    }

    /// Decode the table definition starting at any page, e.g. a user table's.
    pub fn table_definition(&mut self, page: u64) -> Result<TableDefinitionPage, MdbError> {
        let chain = self.read_definition_chain(page)?;
        let slices: Vec<&[u8]> = chain.iter().map(|p| p.bytes()).collect();
        TableDefinitionPage::parse_chain(&slices, self.version)
    }

    /// Release the underlying file handle.
    pub fn close(self) -> Result<(), MdbError> {
        self.scanner.close()
    }

    /// Format version detected at open time.
    pub fn version(&self) -> FormatVersion {
        self.version
    }

    /// Page size fixed by the detected version.
    pub fn page_size(&self) -> u32 {
        self.scanner.page_size()
    }

    /// Number of complete pages in the file.
    pub fn page_count(&self) -> u64 {
        self.scanner.page_count()
    }

    /// Decoded page 0, available after a successful [`read`](Self::read).
    pub fn definition_page(&self) -> Option<&DefinitionPage> {
        self.definition_page.as_ref()
    }

    /// Decoded `MSysObjects` definition, available after a successful [`read`](Self::read).
    pub fn catalog_table(&self) -> Option<&TableDefinitionPage> {
        self.msys_objects.as_ref()
    }

    /// Direct access to the page scanner.
    pub fn scanner_mut(&mut self) -> &mut PageScanner {
        &mut self.scanner
    }
}
