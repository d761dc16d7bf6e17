//! Format version detection.
//!
//! The byte at file offset `0x14` identifies the Jet/ACE engine that wrote the
//! file. The resolved [`FormatVersion`] is the sole authority for page size and
//! for the field layout used by the page decoders; nothing read from page 0 is
//! trusted before it has been resolved.

use std::fmt;
use std::io::{Read, Seek, SeekFrom};

use serde::Serialize;
use tracing::debug;

use crate::jet::constants::*;
use crate::MdbError;

/// Known Jet/ACE on-disk format versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FormatVersion {
    /// Jet 3 (Access 97), 2 KiB pages.
    Jet3,
    /// Jet 4 (Access 2000/2002/2003).
    Jet4,
    /// ACE 12 (Access 2007).
    Ace12,
    /// ACE 14 (Access 2010).
    Ace14,
    /// ACE 16 (Access 2016).
    Ace16,
    /// ACE 17 (Access 2019 and Microsoft 365).
    Ace17,
}

impl FormatVersion {
    /// Map a version code to a format version.
    ///
    /// # Examples
    ///
    /// ```
    /// use mdb::jet::version::FormatVersion;
    ///
    /// assert_eq!(FormatVersion::from_code(0x00).unwrap().page_size(), 2048);
    /// assert_eq!(FormatVersion::from_code(0x01).unwrap().page_size(), 4096);
    /// assert!(FormatVersion::from_code(0x7f).is_err());
    /// ```
    pub fn from_code(code: u8) -> Result<Self, MdbError> {
        match code {
            VERSION_CODE_JET3 => Ok(FormatVersion::Jet3),
            VERSION_CODE_JET4 => Ok(FormatVersion::Jet4),
            VERSION_CODE_ACE12 => Ok(FormatVersion::Ace12),
            VERSION_CODE_ACE14 => Ok(FormatVersion::Ace14),
            VERSION_CODE_ACE16 => Ok(FormatVersion::Ace16),
            VERSION_CODE_ACE17 => Ok(FormatVersion::Ace17),
            other => Err(MdbError::UnsupportedVersion(other)),
        }
    }

    /// Read the version byte at [`VERSION_OFFSET`] and resolve it.
    ///
    /// The reader position is left just past the version byte.
    pub fn detect<R: Read + Seek + ?Sized>(reader: &mut R) -> Result<Self, MdbError> {
        reader
            .seek(SeekFrom::Start(VERSION_OFFSET))
            .map_err(|e| MdbError::Io(format!("Cannot seek to version byte: {}", e)))?;

        let mut code = [0u8; 1];
        reader
            .read_exact(&mut code)
            .map_err(|e| MdbError::Io(format!("Cannot read version byte: {}", e)))?;

        let version = Self::from_code(code[0])?;
        debug!(code = code[0], %version, page_size = version.page_size(), "detected format version");
        Ok(version)
    }

    /// The on-disk version code.
    pub fn code(&self) -> u8 {
        match self {
            FormatVersion::Jet3 => VERSION_CODE_JET3,
            FormatVersion::Jet4 => VERSION_CODE_JET4,
            FormatVersion::Ace12 => VERSION_CODE_ACE12,
            FormatVersion::Ace14 => VERSION_CODE_ACE14,
            FormatVersion::Ace16 => VERSION_CODE_ACE16,
            FormatVersion::Ace17 => VERSION_CODE_ACE17,
        }
    }

    /// Page size in bytes.
    pub fn page_size(&self) -> u32 {
        self.layout().page_size
    }

    /// Field layout shared by the page decoders.
    pub fn layout(&self) -> &'static JetLayout {
        match self {
            FormatVersion::Jet3 => &JET3_LAYOUT,
            _ => &JET4_LAYOUT,
        }
    }

    /// Returns true for the Jet3 layout family.
    pub fn is_jet3(&self) -> bool {
        matches!(self, FormatVersion::Jet3)
    }

    /// Returns true for ACE (`.accdb`) versions.
    pub fn is_ace(&self) -> bool {
        !matches!(self, FormatVersion::Jet3 | FormatVersion::Jet4)
    }

    /// Engine identifier expected at the start of page 0.
    pub fn engine_name(&self) -> &'static [u8; 15] {
        if self.is_ace() {
            ENGINE_ACE
        } else {
            ENGINE_JET
        }
    }

    /// Access release that introduced this format.
    pub fn product_name(&self) -> &'static str {
        match self {
            FormatVersion::Jet3 => "Access 97",
            FormatVersion::Jet4 => "Access 2000-2003",
            FormatVersion::Ace12 => "Access 2007",
            FormatVersion::Ace14 => "Access 2010",
            FormatVersion::Ace16 => "Access 2016",
            FormatVersion::Ace17 => "Access 2019",
        }
    }

    /// Every known version, in code order.
    pub fn all() -> &'static [FormatVersion] {
        &[
            FormatVersion::Jet3,
            FormatVersion::Jet4,
            FormatVersion::Ace12,
            FormatVersion::Ace14,
            FormatVersion::Ace16,
            FormatVersion::Ace17,
        ]
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormatVersion::Jet3 => "Jet3",
            FormatVersion::Jet4 => "Jet4",
            FormatVersion::Ace12 => "ACE12",
            FormatVersion::Ace14 => "ACE14",
            FormatVersion::Ace16 => "ACE16",
            FormatVersion::Ace17 => "ACE17",
        };
        write!(f, "{}", name)
    }
}
