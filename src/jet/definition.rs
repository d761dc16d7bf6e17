//! Database definition page (page 0) decoding.
//!
//! Page 0 starts with a fixed signature and the engine identifier
//! (`"Standard Jet DB"` or `"Standard ACE DB"`), followed by the version code at
//! `0x14`. The next 126 (Jet3) or 128 (Jet4/ACE) bytes are masked with RC4
//! under a well-known key; the sort order, code page, encoding key and
//! creation date live inside that masked region.

use byteorder::{ByteOrder, LittleEndian};
use serde::Serialize;
use tracing::debug;

use crate::jet::constants::*;
use crate::jet::version::FormatVersion;
use crate::MdbError;

/// Decoded database header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DefinitionPage {
    /// Version the page was decoded under.
    pub version: FormatVersion,
    /// Engine identifier from bytes 4-18.
    pub engine: String,
    /// Database sort order (collation / language id).
    pub sort_order: u16,
    /// Code page used for Jet3 text.
    pub code_page: u16,
    /// Database encoding key; non-zero when data pages are encoded.
    pub encoding_key: u32,
    /// Creation timestamp as an OLE automation date (Jet4 and later).
    pub creation_date: Option<f64>,
}

impl DefinitionPage {
    /// Decode page 0 under the given version.
    ///
    /// `page` must hold at least one full page; bytes past the version's page
    /// size are ignored.
    pub fn parse(page: &[u8], version: FormatVersion) -> Result<Self, MdbError> {
        let layout = version.layout();
        let page_size = layout.page_size as usize;
        if page.len() < page_size {
            return Err(MdbError::MalformedHeader(format!(
                "page is {} bytes, expected {}",
                page.len(),
                page_size
            )));
        }
        let page = &page[..page_size];

        if page[..DEF_MAGIC.len()] != DEF_MAGIC {
            return Err(MdbError::MalformedHeader(format!(
                "bad signature {:02x?} (page type 0x{:02x})",
                &page[..DEF_MAGIC.len()],
                page[0]
            )));
        }

        let engine = &page[DEF_ENGINE_NAME..DEF_ENGINE_NAME + DEF_ENGINE_NAME_LEN];
        if engine != version.engine_name() {
            return Err(MdbError::MalformedHeader(format!(
                "engine identifier {:?} does not match {} format",
                String::from_utf8_lossy(engine),
                version
            )));
        }

        if page[DEF_VERSION] != version.code() {
            return Err(MdbError::MalformedHeader(format!(
                "version field 0x{:02x} does not match detected version 0x{:02x}",
                page[DEF_VERSION],
                version.code()
            )));
        }

        // Unmask a private copy of the header region only.
        let end = DEF_MASKED_HEADER + layout.def_masked_len;
        let mut header = page[..end].to_vec();
        unmask(&mut header[DEF_MASKED_HEADER..]);

        let creation_date = layout
            .def_creation_date
            .map(|off| LittleEndian::read_f64(&header[off..]));

        let def = DefinitionPage {
            version,
            engine: String::from_utf8_lossy(engine).into_owned(),
            sort_order: LittleEndian::read_u16(&header[layout.def_sort_order..]),
            code_page: LittleEndian::read_u16(&header[DEF_CODE_PAGE..]),
            encoding_key: LittleEndian::read_u32(&header[DEF_ENCODING_KEY..]),
            creation_date,
        };
        debug!(
            sort_order = def.sort_order,
            code_page = def.code_page,
            encoded = def.is_encoded(),
            "decoded definition page"
        );
        Ok(def)
    }

    /// Returns true if the database's data pages are encoded.
    pub fn is_encoded(&self) -> bool {
        self.encoding_key != 0
    }
}

/// Mask or unmask the RC4-protected header region of page 0 in place.
///
/// The mask is symmetric: applying it twice restores the original bytes.
pub fn apply_header_mask(page: &mut [u8], version: FormatVersion) -> Result<(), MdbError> {
    let end = DEF_MASKED_HEADER + version.layout().def_masked_len;
    if page.len() < end {
        return Err(MdbError::Argument(format!(
            "definition page needs at least {} bytes, got {}",
            end,
            page.len()
        )));
    }
    unmask(&mut page[DEF_MASKED_HEADER..end]);
    Ok(())
}

fn unmask(region: &mut [u8]) {
    rc4_apply(&DEF_MASK_KEY.to_le_bytes(), region);
}

/// RC4 keystream XOR.
fn rc4_apply(key: &[u8], data: &mut [u8]) {
    let mut s: [u8; 256] = std::array::from_fn(|i| i as u8);
    let mut j: u8 = 0;
    for i in 0..256 {
        j = j.wrapping_add(s[i]).wrapping_add(key[i % key.len()]);
        s.swap(i, j as usize);
    }

    let (mut i, mut j) = (0u8, 0u8);
    for byte in data.iter_mut() {
        i = i.wrapping_add(1);
        j = j.wrapping_add(s[i as usize]);
        s.swap(i as usize, j as usize);
        let k = s[s[i as usize].wrapping_add(s[j as usize]) as usize];
        *byte ^= k;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_definition_page(version: FormatVersion) -> Vec<u8> {
        let layout = version.layout();
        let mut page = vec![0u8; layout.page_size as usize];
        page[..4].copy_from_slice(&DEF_MAGIC);
        page[DEF_ENGINE_NAME..DEF_ENGINE_NAME + 15].copy_from_slice(version.engine_name());
        LittleEndian::write_u32(&mut page[DEF_VERSION..], version.code() as u32);
        LittleEndian::write_u16(&mut page[layout.def_sort_order..], 0x0409);
        LittleEndian::write_u16(&mut page[DEF_CODE_PAGE..], 1252);
        LittleEndian::write_u32(&mut page[DEF_ENCODING_KEY..], 0);
        if let Some(off) = layout.def_creation_date {
            LittleEndian::write_f64(&mut page[off..], 45000.5);
        }
        apply_header_mask(&mut page, version).unwrap();
        page
    }

    #[test]
    fn test_rc4_known_vector() {
        let mut data = b"Plaintext".to_vec();
        rc4_apply(b"Key", &mut data);
        assert_eq!(data, [0xBB, 0xF3, 0x16, 0xE8, 0xD9, 0x40, 0xAF, 0x0A, 0xD3]);
    }

    #[test]
    fn test_mask_is_symmetric() {
        let original = build_definition_page(FormatVersion::Jet4);
        let mut page = original.clone();
        apply_header_mask(&mut page, FormatVersion::Jet4).unwrap();
        assert_ne!(page, original);
        apply_header_mask(&mut page, FormatVersion::Jet4).unwrap();
        assert_eq!(page, original);
    }

    #[test]
    fn test_parse_jet4() {
        let page = build_definition_page(FormatVersion::Jet4);
        let def = DefinitionPage::parse(&page, FormatVersion::Jet4).unwrap();
        assert_eq!(def.version, FormatVersion::Jet4);
        assert_eq!(def.engine, "Standard Jet DB");
        assert_eq!(def.sort_order, 0x0409);
        assert_eq!(def.code_page, 1252);
        assert!(!def.is_encoded());
        assert_eq!(def.creation_date, Some(45000.5));
    }

    #[test]
    fn test_parse_jet3_has_no_creation_date() {
        let page = build_definition_page(FormatVersion::Jet3);
        let def = DefinitionPage::parse(&page, FormatVersion::Jet3).unwrap();
        assert_eq!(def.sort_order, 0x0409);
        assert_eq!(def.creation_date, None);
    }

    #[test]
    fn test_parse_ace_engine_name() {
        let page = build_definition_page(FormatVersion::Ace14);
        let def = DefinitionPage::parse(&page, FormatVersion::Ace14).unwrap();
        assert_eq!(def.engine, "Standard ACE DB");
    }

    #[test]
    fn test_parse_does_not_modify_input() {
        let page = build_definition_page(FormatVersion::Jet4);
        let copy = page.clone();
        DefinitionPage::parse(&page, FormatVersion::Jet4).unwrap();
        assert_eq!(page, copy);
    }

    #[test]
    fn test_wrong_page_type_rejected() {
        let mut page = build_definition_page(FormatVersion::Jet4);
        page[0] = PAGE_TYPE_DATA;
        assert!(matches!(
            DefinitionPage::parse(&page, FormatVersion::Jet4),
            Err(MdbError::MalformedHeader(_))
        ));
    }

    #[test]
    fn test_engine_family_mismatch_rejected() {
        let page = build_definition_page(FormatVersion::Ace12);
        // ACE engine identifier decoded as Jet4.
        let err = DefinitionPage::parse(&page, FormatVersion::Jet4).unwrap_err();
        assert!(matches!(err, MdbError::MalformedHeader(_)));
    }

    #[test]
    fn test_version_field_mismatch_rejected() {
        let page = build_definition_page(FormatVersion::Ace14);
        assert!(matches!(
            DefinitionPage::parse(&page, FormatVersion::Ace16),
            Err(MdbError::MalformedHeader(_))
        ));
    }

    #[test]
    fn test_truncated_page_rejected() {
        let page = build_definition_page(FormatVersion::Jet4);
        assert!(matches!(
            DefinitionPage::parse(&page[..2048], FormatVersion::Jet4),
            Err(MdbError::MalformedHeader(_))
        ));
    }

    #[test]
    fn test_encoded_database_flag() {
        let mut page = build_definition_page(FormatVersion::Jet4);
        apply_header_mask(&mut page, FormatVersion::Jet4).unwrap();
        LittleEndian::write_u32(&mut page[DEF_ENCODING_KEY..], 0xDEADBEEF);
        apply_header_mask(&mut page, FormatVersion::Jet4).unwrap();
        let def = DefinitionPage::parse(&page, FormatVersion::Jet4).unwrap();
        assert!(def.is_encoded());
        assert_eq!(def.encoding_key, 0xDEADBEEF);
    }
}
