//! Jet/ACE binary format parsing.
//!
//! Components, leaves first:
//!
//! - [`version`] maps the version byte at offset `0x14` to a [`version::FormatVersion`],
//!   which fixes the page size and field layout.
//! - [`scanner`] serves fixed-size pages by sequential or indexed access.
//! - [`definition`] decodes page 0, the database header.
//! - [`table_definition`] decodes table schema pages.
//! - [`catalog`] orchestrates the above for the `MSysObjects` system catalog.
//!
//! Start with [`catalog::Catalog`] to open a file.

pub mod catalog;
pub mod constants;
pub mod definition;
pub mod page_types;
pub mod scanner;
pub mod table_definition;
pub mod version;
