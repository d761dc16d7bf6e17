//! Jet/ACE page type definitions.
//!
//! The first byte of every page tags what the page holds. [`PageType`] maps
//! that tag to a variant with a short name and a description.

use serde::Serialize;
use std::fmt;

use crate::jet::constants::*;

/// Page type tag stored in byte 0 of every page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PageType {
    /// Database definition page; only page 0 carries this tag.
    Definition,
    /// Row data page.
    Data,
    /// Table definition page (or a continuation of one).
    TableDefinition,
    /// Intermediate B-tree index page.
    IndexIntermediate,
    /// Leaf B-tree index page.
    IndexLeaf,
    /// Page usage bitmap.
    UsageMap,
    /// Any other tag value.
    Unknown(u8),
}

impl PageType {
    /// Classify a raw tag byte.
    ///
    /// # Examples
    ///
    /// ```
    /// use mdb::jet::page_types::PageType;
    ///
    /// assert_eq!(PageType::from_u8(0x02), PageType::TableDefinition);
    /// assert_eq!(PageType::from_u8(0x42), PageType::Unknown(0x42));
    /// ```
    pub fn from_u8(tag: u8) -> Self {
        match tag {
            PAGE_TYPE_DEFINITION => PageType::Definition,
            PAGE_TYPE_DATA => PageType::Data,
            PAGE_TYPE_TABLE_DEFINITION => PageType::TableDefinition,
            PAGE_TYPE_INDEX_INTERMEDIATE => PageType::IndexIntermediate,
            PAGE_TYPE_INDEX_LEAF => PageType::IndexLeaf,
            PAGE_TYPE_USAGE_MAP => PageType::UsageMap,
            other => PageType::Unknown(other),
        }
    }

    /// Classify a page by its first byte. An empty slice is `Unknown(0xFF)`.
    pub fn of_page(page: &[u8]) -> Self {
        page.first().map_or(PageType::Unknown(0xFF), |&b| Self::from_u8(b))
    }

    /// Raw tag byte.
    pub fn as_u8(&self) -> u8 {
        match self {
            PageType::Definition => PAGE_TYPE_DEFINITION,
            PageType::Data => PAGE_TYPE_DATA,
            PageType::TableDefinition => PAGE_TYPE_TABLE_DEFINITION,
            PageType::IndexIntermediate => PAGE_TYPE_INDEX_INTERMEDIATE,
            PageType::IndexLeaf => PAGE_TYPE_INDEX_LEAF,
            PageType::UsageMap => PAGE_TYPE_USAGE_MAP,
            PageType::Unknown(tag) => *tag,
        }
    }

    /// Short upper-case name, as used by `mdbinfo pages --type`.
    pub fn name(&self) -> &'static str {
        match self {
            PageType::Definition => "DEFINITION",
            PageType::Data => "DATA",
            PageType::TableDefinition => "TDEF",
            PageType::IndexIntermediate => "INDEX_NODE",
            PageType::IndexLeaf => "INDEX_LEAF",
            PageType::UsageMap => "USAGE_MAP",
            PageType::Unknown(_) => "UNKNOWN",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PageType::Definition => "Database definition (file header)",
            PageType::Data => "Table row data",
            PageType::TableDefinition => "Table definition (columns and indexes)",
            PageType::IndexIntermediate => "Intermediate index node",
            PageType::IndexLeaf => "Leaf index node",
            PageType::UsageMap => "Page usage bitmap",
            PageType::Unknown(_) => "Unrecognized page tag",
        }
    }

    /// Look up a page type by its [`name`](Self::name), case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        [
            PageType::Definition,
            PageType::Data,
            PageType::TableDefinition,
            PageType::IndexIntermediate,
            PageType::IndexLeaf,
            PageType::UsageMap,
        ]
        .into_iter()
        .find(|pt| pt.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageType::Unknown(tag) => write!(f, "UNKNOWN(0x{:02x})", tag),
            other => write!(f, "{}", other.name()),
        }
    }
}
