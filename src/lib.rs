//! Microsoft Jet/ACE database file analysis toolkit.
//!
//! The `mdb-utils` crate (library name `mdb`) reads the paginated container
//! format used by Microsoft Access (`.mdb` and `.accdb` files) without a
//! native driver. It detects the on-disk format version, serves fixed-size
//! pages from the file, and decodes the two pages every other decoder depends
//! on: the database definition page (page 0) and the table definition of the
//! `MSysObjects` system catalog (page 2).
//!
//! # CLI Reference
//!
//! The `mdbinfo` binary (default `cli` feature) wraps the library:
//!
//! | Command | Purpose |
//! |---------|---------|
//! | [`mdbinfo info`](cli::app::Commands::Info) | Version, header fields and system catalog schema |
//! | [`mdbinfo pages`](cli::app::Commands::Pages) | Classify every page and summarize page types |
//! | [`mdbinfo dump`](cli::app::Commands::Dump) | Hex dump of raw page bytes |
//! | [`mdbinfo completions`](cli::app::Commands::Completions) | Shell completion scripts |
//!
//! # Library API
//!
//! ```no_run
//! use mdb::jet::catalog::Catalog;
//!
//! let mut catalog = Catalog::open("northwind.mdb").unwrap();
//! catalog.read().unwrap();
//! println!("Format: {}", catalog.version());
//!
//! if let Some(tdef) = catalog.catalog_table() {
//!     println!("MSysObjects rows: {}", tdef.num_rows);
//!     for col in &tdef.columns {
//!         println!("  {} ({})", col.name, col.column_type);
//!     }
//! }
//! catalog.close().unwrap();
//! ```
//!
//! ## Key entry points
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Catalog`](jet::catalog::Catalog) | Open a file, read page 0 and the catalog definition |
//! | [`FormatVersion`](jet::version::FormatVersion) | Version byte to page size and field layout |
//! | [`PageScanner`](jet::scanner::PageScanner) | Sequential and indexed page access |
//! | [`DefinitionPage`](jet::definition::DefinitionPage) | Decoded database header |
//! | [`TableDefinitionPage`](jet::table_definition::TableDefinitionPage) | Decoded table schema |
//!
//! ## Feature flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli` | on | Builds the `mdbinfo` binary and its clap/colored/indicatif stack. |

#[cfg(feature = "cli")]
pub mod cli;
pub mod jet;
pub mod util;

use thiserror::Error;

/// Errors returned by `mdb` operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MdbError {
    /// An I/O error occurred (file open, read, seek, or write failure).
    #[error("I/O error: {0}")]
    Io(String),

    /// The path does not refer to a regular file.
    #[error("Invalid file: {0}")]
    InvalidFile(String),

    /// The version byte does not match any known Jet/ACE format.
    #[error("Unsupported format version code 0x{0:02x}")]
    UnsupportedVersion(u8),

    /// A page index lies past the end of the file.
    ///
    /// This is the expected "no more pages" signal during scanning and is
    /// not an anomaly on its own.
    #[error("Page {index} out of range (file has {page_count} pages)")]
    PageOutOfRange { index: u64, page_count: u64 },

    /// Page 0 failed the definition page structural checks.
    #[error("Malformed definition page: {0}")]
    MalformedHeader(String),

    /// A table definition page failed structural checks.
    #[error("Malformed table definition: {0}")]
    MalformedTableDefinition(String),

    /// An invalid argument was supplied (bad page size, bad option, etc.).
    #[error("Invalid argument: {0}")]
    Argument(String),
}

impl MdbError {
    /// Returns true for the recoverable end-of-file boundary signal.
    pub fn is_page_out_of_range(&self) -> bool {
        matches!(self, MdbError::PageOutOfRange { .. })
    }
}
