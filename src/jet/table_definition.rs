//! Table definition (TDEF) page decoding.
//!
//! A table definition describes one table's schema: row count, column
//! descriptors, real (physical) index descriptors and logical indexes. The same
//! format is used for user tables and for the `MSysObjects` system catalog.
//!
//! Layout of the definition bytes, in order:
//!
//! | Section | Jet3 | Jet4/ACE |
//! |---------|------|----------|
//! | Header | 43 bytes | 63 bytes |
//! | Real index entries | 8 bytes each | 12 bytes each |
//! | Column entries | 18 bytes each | 25 bytes each |
//! | Column names | u8 length + text | u16 length + UTF-16LE |
//! | Real index column maps | 39 bytes each | 52 bytes each |
//! | Logical index entries | 20 bytes each | 28 bytes each |
//! | Logical index names | as column names | as column names |
//!
//! Definitions too large for one page continue on further TDEF pages linked by
//! the next-page pointer at offset 4; continuation data starts at offset 8.

use std::fmt;

use byteorder::{ByteOrder, LittleEndian};
use serde::Serialize;
use tracing::debug;

use crate::jet::constants::*;
use crate::jet::version::FormatVersion;
use crate::MdbError;

/// Column data types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ColumnType {
    Boolean,
    Byte,
    Integer,
    LongInteger,
    Money,
    Float,
    Double,
    DateTime,
    Binary,
    Text,
    Ole,
    Memo,
    Guid,
    Numeric,
    Complex,
    Unknown(u8),
}

impl ColumnType {
    pub fn from_u8(code: u8) -> Self {
        match code {
            0x01 => ColumnType::Boolean,
            0x02 => ColumnType::Byte,
            0x03 => ColumnType::Integer,
            0x04 => ColumnType::LongInteger,
            0x05 => ColumnType::Money,
            0x06 => ColumnType::Float,
            0x07 => ColumnType::Double,
            0x08 => ColumnType::DateTime,
            0x09 => ColumnType::Binary,
            0x0A => ColumnType::Text,
            0x0B => ColumnType::Ole,
            0x0C => ColumnType::Memo,
            0x0F => ColumnType::Guid,
            0x10 => ColumnType::Numeric,
            0x12 => ColumnType::Complex,
            other => ColumnType::Unknown(other),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ColumnType::Boolean => "Boolean",
            ColumnType::Byte => "Byte",
            ColumnType::Integer => "Integer",
            ColumnType::LongInteger => "Long Integer",
            ColumnType::Money => "Currency",
            ColumnType::Float => "Single",
            ColumnType::Double => "Double",
            ColumnType::DateTime => "DateTime",
            ColumnType::Binary => "Binary",
            ColumnType::Text => "Text",
            ColumnType::Ole => "OLE",
            ColumnType::Memo => "Memo",
            ColumnType::Guid => "Replication ID",
            ColumnType::Numeric => "Numeric",
            ColumnType::Complex => "Complex",
            ColumnType::Unknown(_) => "Unknown",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Unknown(code) => write!(f, "Unknown(0x{:02x})", code),
            other => write!(f, "{}", other.name()),
        }
    }
}

/// One column descriptor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDefinition {
    pub name: String,
    pub column_type: ColumnType,
    /// Column number referenced by index column maps.
    pub number: u16,
    /// Slot in the row's variable-length offset table.
    pub var_offset: u16,
    /// Position in the row's column count.
    pub row_column_number: u16,
    pub flags: u8,
    /// Byte offset within the fixed-length area of a row.
    pub fixed_offset: u16,
    /// Declared length in bytes.
    pub length: u16,
}

impl ColumnDefinition {
    pub fn is_fixed(&self) -> bool {
        self.flags & COLUMN_FLAG_FIXED != 0
    }

    pub fn is_nullable(&self) -> bool {
        self.flags & COLUMN_FLAG_NULLABLE != 0
    }

    pub fn is_auto_number(&self) -> bool {
        self.flags & COLUMN_FLAG_AUTO_NUMBER != 0
    }
}

/// A column participating in a real index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexColumn {
    pub column_number: u16,
    pub ascending: bool,
}

/// Physical index descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RealIndex {
    pub number: u32,
    pub num_rows: u32,
    pub columns: Vec<IndexColumn>,
    /// Usage map pointer (row number in the low byte, page in the upper 24 bits).
    pub usage_map: u32,
    /// Root page of the index B-tree.
    pub first_data_page: u32,
    pub flags: u8,
}

impl RealIndex {
    pub fn is_unique(&self) -> bool {
        self.flags & INDEX_FLAG_UNIQUE != 0
    }

    pub fn ignores_nulls(&self) -> bool {
        self.flags & INDEX_FLAG_IGNORE_NULLS != 0
    }

    pub fn is_required(&self) -> bool {
        self.flags & INDEX_FLAG_REQUIRED != 0
    }
}

/// Named index as seen by users; several may share one real index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogicalIndex {
    pub name: String,
    pub index_number: u32,
    /// Real index backing this logical index.
    pub real_index: u32,
    pub index_type: u8,
}

impl LogicalIndex {
    pub fn is_primary_key(&self) -> bool {
        self.index_type == INDEX_TYPE_PRIMARY_KEY
    }

    pub fn is_foreign_key(&self) -> bool {
        self.index_type == INDEX_TYPE_FOREIGN_KEY
    }
}

/// Decoded table definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableDefinitionPage {
    pub version: FormatVersion,
    /// Continuation page of the first page (0 if none).
    pub next_page: u32,
    pub definition_length: u32,
    pub num_rows: u32,
    /// Next autonumber value.
    pub autonumber: u32,
    pub table_type: u8,
    pub max_columns: u16,
    pub num_var_columns: u16,
    pub num_columns: u16,
    pub num_indexes: u32,
    pub num_real_indexes: u32,
    pub usage_map: u32,
    pub free_map: u32,
    pub columns: Vec<ColumnDefinition>,
    pub real_indexes: Vec<RealIndex>,
    pub logical_indexes: Vec<LogicalIndex>,
}

impl TableDefinitionPage {
    /// Decode a definition that fits on a single page.
    pub fn parse(page: &[u8], version: FormatVersion) -> Result<Self, MdbError> {
        Self::parse_chain(&[page], version)
    }

    /// Decode a definition spread over a first page and its continuation pages.
    pub fn parse_chain(pages: &[&[u8]], version: FormatVersion) -> Result<Self, MdbError> {
        let layout = version.layout();
        let data = assemble(pages, layout.page_size as usize)?;
        let mut r = DefReader::new(&data);

        let header = r.take(layout.tdef_cols_start, "header")?;
        let table_type = header[layout.tdef_table_type];
        if table_type != TABLE_TYPE_USER && table_type != TABLE_TYPE_SYSTEM {
            return Err(MdbError::MalformedTableDefinition(format!(
                "unknown table type 0x{:02x}",
                table_type
            )));
        }

        let num_var_columns = LittleEndian::read_u16(&header[layout.tdef_num_var_cols..]);
        let num_columns = LittleEndian::read_u16(&header[layout.tdef_num_cols..]);
        if num_var_columns > num_columns {
            return Err(MdbError::MalformedTableDefinition(format!(
                "{} variable columns but only {} columns",
                num_var_columns, num_columns
            )));
        }
        let num_indexes = LittleEndian::read_u32(&header[layout.tdef_num_idx..]);
        let num_real_indexes = LittleEndian::read_u32(&header[layout.tdef_num_real_idx..]);

        let real_entries = r.take_entries(num_real_indexes, layout.real_idx_entry_size, "real index entries")?;
        let real_rows: Vec<u32> = real_entries
            .chunks_exact(layout.real_idx_entry_size)
            .map(|e| LittleEndian::read_u32(&e[layout.real_idx_num_rows..]))
            .collect();

        let col_entries = r.take_entries(num_columns as u32, layout.col_entry_size, "column entries")?;
        let mut columns = Vec::with_capacity(num_columns as usize);
        for entry in col_entries.chunks_exact(layout.col_entry_size) {
            columns.push(ColumnDefinition {
                name: String::new(),
                column_type: ColumnType::from_u8(entry[0]),
                number: LittleEndian::read_u16(&entry[layout.col_num..]),
                var_offset: LittleEndian::read_u16(&entry[layout.col_var_offset..]),
                row_column_number: LittleEndian::read_u16(&entry[layout.col_row_col_num..]),
                flags: entry[layout.col_flags],
                fixed_offset: LittleEndian::read_u16(&entry[layout.col_fixed_offset..]),
                length: LittleEndian::read_u16(&entry[layout.col_size..]),
            });
        }
        for col in columns.iter_mut() {
            col.name = r.name(version, "column name")?;
        }

        let idx_defs = r.take_entries(num_real_indexes, layout.idx_def_size, "real index column maps")?;
        let mut real_indexes = Vec::with_capacity(real_rows.len());
        for (i, (def, num_rows)) in idx_defs
            .chunks_exact(layout.idx_def_size)
            .zip(real_rows)
            .enumerate()
        {
            let index_columns = index_columns(def, layout, &columns, i)?;
            real_indexes.push(RealIndex {
                number: i as u32,
                num_rows,
                columns: index_columns,
                usage_map: LittleEndian::read_u32(&def[layout.idx_def_usage_map..]),
                first_data_page: LittleEndian::read_u32(&def[layout.idx_def_first_dp..]),
                flags: def[layout.idx_def_flags],
            });
        }

        let logical_entries = r.take_entries(num_indexes, layout.logical_idx_size, "logical index entries")?;
        let mut logical_indexes = Vec::new();
        for entry in logical_entries.chunks_exact(layout.logical_idx_size) {
            let real_index = LittleEndian::read_u32(&entry[layout.logical_idx_real_num..]);
            if real_index >= num_real_indexes {
                return Err(MdbError::MalformedTableDefinition(format!(
                    "logical index refers to real index {} of {}",
                    real_index, num_real_indexes
                )));
            }
            logical_indexes.push(LogicalIndex {
                name: String::new(),
                index_number: LittleEndian::read_u32(&entry[layout.logical_idx_num..]),
                real_index,
                index_type: entry[layout.logical_idx_type],
            });
        }
        for idx in logical_indexes.iter_mut() {
            idx.name = r.name(version, "index name")?;
        }

        let tdef = TableDefinitionPage {
            version,
            next_page: LittleEndian::read_u32(&header[TDEF_NEXT_PAGE..]),
            definition_length: LittleEndian::read_u32(&header[TDEF_LENGTH..]),
            num_rows: LittleEndian::read_u32(&header[layout.tdef_num_rows..]),
            autonumber: LittleEndian::read_u32(&header[layout.tdef_autonumber..]),
            table_type,
            max_columns: LittleEndian::read_u16(&header[layout.tdef_max_cols..]),
            num_var_columns,
            num_columns,
            num_indexes,
            num_real_indexes,
            usage_map: LittleEndian::read_u32(&header[layout.tdef_usage_map..]),
            free_map: LittleEndian::read_u32(&header[layout.tdef_free_map..]),
            columns,
            real_indexes,
            logical_indexes,
        };
        debug!(
            rows = tdef.num_rows,
            columns = tdef.num_columns,
            real_indexes = tdef.num_real_indexes,
            logical_indexes = tdef.num_indexes,
            pages = pages.len(),
            "decoded table definition"
        );
        Ok(tdef)
    }

    /// Returns true for system tables such as `MSysObjects`.
    pub fn is_system_table(&self) -> bool {
        self.table_type == TABLE_TYPE_SYSTEM
    }

    /// Find a column by name (case-insensitive, as Access resolves names).
    pub fn column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Columns ordered by column number, the order row decoders use.
    pub fn columns_by_number(&self) -> Vec<&ColumnDefinition> {
        let mut cols: Vec<&ColumnDefinition> = self.columns.iter().collect();
        cols.sort_by_key(|c| c.number);
        cols
    }
}

/// Read the continuation pointer of a TDEF page without decoding it.
pub fn next_page_of(page: &[u8]) -> Option<u32> {
    if page.len() < TDEF_NEXT_PAGE + 4 {
        return None;
    }
    Some(LittleEndian::read_u32(&page[TDEF_NEXT_PAGE..]))
}

/// Concatenate the definition bytes of a page chain.
fn assemble(pages: &[&[u8]], page_size: usize) -> Result<Vec<u8>, MdbError> {
    if pages.is_empty() {
        return Err(MdbError::MalformedTableDefinition("no pages".to_string()));
    }
    let mut data = Vec::with_capacity(pages.len() * page_size);
    for (i, page) in pages.iter().enumerate() {
        if page.len() < page_size {
            return Err(MdbError::MalformedTableDefinition(format!(
                "page {} of chain is {} bytes, expected {}",
                i,
                page.len(),
                page_size
            )));
        }
        if page[TDEF_PAGE_TYPE] != PAGE_TYPE_TABLE_DEFINITION {
            return Err(MdbError::MalformedTableDefinition(format!(
                "page {} of chain has page type 0x{:02x}, expected 0x{:02x}",
                i, page[TDEF_PAGE_TYPE], PAGE_TYPE_TABLE_DEFINITION
            )));
        }
        let start = if i == 0 { 0 } else { TDEF_CONTINUATION_HEADER };
        data.extend_from_slice(&page[start..page_size]);
    }
    Ok(data)
}

fn index_columns(
    def: &[u8],
    layout: &JetLayout,
    columns: &[ColumnDefinition],
    index: usize,
) -> Result<Vec<IndexColumn>, MdbError> {
    let mut out = Vec::new();
    for slot in def[layout.idx_def_columns..]
        .chunks_exact(3)
        .take(INDEX_COLUMN_SLOTS)
    {
        let column_number = LittleEndian::read_u16(slot);
        if column_number == INDEX_COLUMN_UNUSED {
            continue;
        }
        if !columns.iter().any(|c| c.number == column_number) {
            return Err(MdbError::MalformedTableDefinition(format!(
                "real index {} refers to missing column {}",
                index, column_number
            )));
        }
        out.push(IndexColumn {
            column_number,
            ascending: slot[2] & INDEX_ORDER_ASCENDING != 0,
        });
    }
    Ok(out)
}

/// Bounds-checked cursor over assembled definition bytes.
struct DefReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> DefReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        DefReader { data, pos: 0 }
    }

    fn take(&mut self, len: usize, what: &str) -> Result<&'a [u8], MdbError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| {
                MdbError::MalformedTableDefinition(format!(
                    "{} ({} bytes at offset {}) runs past the end of the definition ({} bytes)",
                    what,
                    len,
                    self.pos,
                    self.data.len()
                ))
            })?;
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn take_entries(&mut self, count: u32, size: usize, what: &str) -> Result<&'a [u8], MdbError> {
        let len = (count as usize).checked_mul(size).ok_or_else(|| {
            MdbError::MalformedTableDefinition(format!("{} count {} is too large", what, count))
        })?;
        self.take(len, what)
    }

    /// Length-prefixed name: u8 + code page bytes (Jet3) or u16 + UTF-16LE.
    ///
    /// Jet3 bytes are mapped as Latin-1 regardless of the database code page,
    /// so bytes 0x80-0x9F of Windows-1252 names come out as C1 controls.
    fn name(&mut self, version: FormatVersion, what: &str) -> Result<String, MdbError> {
        if version.is_jet3() {
            let len = self.take(1, what)?[0] as usize;
            let bytes = self.take(len, what)?;
            Ok(bytes.iter().map(|&b| b as char).collect())
        } else {
            let len = LittleEndian::read_u16(self.take(2, what)?) as usize;
            if len % 2 != 0 {
                return Err(MdbError::MalformedTableDefinition(format!(
                    "{} has odd UTF-16 byte length {}",
                    what, len
                )));
            }
            let bytes = self.take(len, what)?;
            let units: Vec<u16> = bytes.chunks_exact(2).map(LittleEndian::read_u16).collect();
            Ok(String::from_utf16_lossy(&units))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal builder mirroring the on-disk section order.
    struct TdefBuilder {
        version: FormatVersion,
        columns: Vec<(String, u8, u16, u8, u16)>,
        real_indexes: Vec<(u32, Vec<u16>, u8)>,
        logical_indexes: Vec<(&'static str, u32, u8)>,
        num_rows: u32,
        table_type: u8,
        index_order: u8,
    }

    impl TdefBuilder {
        fn new(version: FormatVersion) -> Self {
            TdefBuilder {
                version,
                columns: Vec::new(),
                real_indexes: Vec::new(),
                logical_indexes: Vec::new(),
                num_rows: 0,
                table_type: TABLE_TYPE_SYSTEM,
                index_order: 0x01,
            }
        }

        fn column(mut self, name: &str, ty: u8, number: u16, flags: u8, len: u16) -> Self {
            self.columns.push((name.to_string(), ty, number, flags, len));
            self
        }

        fn bytes(&self) -> Vec<u8> {
            let l = self.version.layout();
            let mut out = vec![0u8; l.tdef_cols_start];
            out[0] = PAGE_TYPE_TABLE_DEFINITION;
            out[1] = 0x01;
            LittleEndian::write_u32(&mut out[l.tdef_num_rows..], self.num_rows);
            out[l.tdef_table_type] = self.table_type;
            LittleEndian::write_u16(&mut out[l.tdef_max_cols..], self.columns.len() as u16);
            let var = self.columns.iter().filter(|c| c.3 & COLUMN_FLAG_FIXED == 0).count();
            LittleEndian::write_u16(&mut out[l.tdef_num_var_cols..], var as u16);
            LittleEndian::write_u16(&mut out[l.tdef_num_cols..], self.columns.len() as u16);
            LittleEndian::write_u32(&mut out[l.tdef_num_idx..], self.logical_indexes.len() as u32);
            LittleEndian::write_u32(&mut out[l.tdef_num_real_idx..], self.real_indexes.len() as u32);

            for (rows, _, _) in &self.real_indexes {
                let mut e = vec![0u8; l.real_idx_entry_size];
                LittleEndian::write_u32(&mut e[l.real_idx_num_rows..], *rows);
                out.extend(e);
            }
            for (_, ty, number, flags, len) in &self.columns {
                let mut e = vec![0u8; l.col_entry_size];
                e[0] = *ty;
                LittleEndian::write_u16(&mut e[l.col_num..], *number);
                e[l.col_flags] = *flags;
                LittleEndian::write_u16(&mut e[l.col_size..], *len);
                out.extend(e);
            }
            for (name, ..) in &self.columns {
                self.push_name(&mut out, name);
            }
            for (_, cols, flags) in &self.real_indexes {
                let mut e = vec![0u8; l.idx_def_size];
                for slot in 0..INDEX_COLUMN_SLOTS {
                    let at = l.idx_def_columns + slot * 3;
                    let col = cols.get(slot).copied().unwrap_or(INDEX_COLUMN_UNUSED);
                    LittleEndian::write_u16(&mut e[at..], col);
                    e[at + 2] = self.index_order;
                }
                LittleEndian::write_u32(&mut e[l.idx_def_first_dp..], 77);
                e[l.idx_def_flags] = *flags;
                out.extend(e);
            }
            for (i, (_, real, ty)) in self.logical_indexes.iter().enumerate() {
                let mut e = vec![0u8; l.logical_idx_size];
                LittleEndian::write_u32(&mut e[l.logical_idx_num..], i as u32);
                LittleEndian::write_u32(&mut e[l.logical_idx_real_num..], *real);
                e[l.logical_idx_type] = *ty;
                out.extend(e);
            }
            for (name, ..) in &self.logical_indexes {
                self.push_name(&mut out, name);
            }
            out
        }

        fn push_name(&self, out: &mut Vec<u8>, name: &str) {
            if self.version.is_jet3() {
                out.push(name.len() as u8);
                out.extend_from_slice(name.as_bytes());
            } else {
                let units: Vec<u16> = name.encode_utf16().collect();
                let mut len = [0u8; 2];
                LittleEndian::write_u16(&mut len, (units.len() * 2) as u16);
                out.extend_from_slice(&len);
                for u in units {
                    let mut b = [0u8; 2];
                    LittleEndian::write_u16(&mut b, u);
                    out.extend_from_slice(&b);
                }
            }
        }

        fn page(&self) -> Vec<u8> {
            let mut page = self.bytes();
            page.resize(self.version.page_size() as usize, 0);
            page
        }
    }

    fn msys_objects(version: FormatVersion) -> TdefBuilder {
        let mut b = TdefBuilder::new(version)
            .column("Id", 0x04, 0, COLUMN_FLAG_FIXED | COLUMN_FLAG_AUTO_NUMBER, 4)
            .column("ParentId", 0x04, 1, COLUMN_FLAG_FIXED | COLUMN_FLAG_NULLABLE, 4)
            .column("Name", 0x0A, 2, COLUMN_FLAG_NULLABLE, 128)
            .column("Type", 0x03, 3, COLUMN_FLAG_FIXED, 2)
            .column("DateCreate", 0x08, 4, COLUMN_FLAG_FIXED, 8);
        b.num_rows = 42;
        b.real_indexes = vec![(42, vec![0], INDEX_FLAG_UNIQUE), (42, vec![1, 2], 0)];
        b.logical_indexes = vec![
            ("Id", 0, INDEX_TYPE_PRIMARY_KEY),
            ("ParentIdName", 1, 0),
        ];
        b
    }

    #[test]
    fn test_parse_jet4_catalog() {
        let page = msys_objects(FormatVersion::Jet4).page();
        let tdef = TableDefinitionPage::parse(&page, FormatVersion::Jet4).unwrap();
        assert_eq!(tdef.num_rows, 42);
        assert!(tdef.is_system_table());
        assert_eq!(tdef.num_columns, 5);
        assert_eq!(tdef.num_var_columns, 1);
        assert_eq!(tdef.columns[2].name, "Name");
        assert_eq!(tdef.columns[2].column_type, ColumnType::Text);
        assert_eq!(tdef.columns[2].length, 128);
        assert!(tdef.columns[0].is_auto_number());
        assert!(tdef.columns[1].is_nullable());
        assert!(!tdef.columns[2].is_fixed());

        assert_eq!(tdef.real_indexes.len(), 2);
        assert!(tdef.real_indexes[0].is_unique());
        assert_eq!(tdef.real_indexes[0].first_data_page, 77);
        assert_eq!(
            tdef.real_indexes[1].columns,
            vec![
                IndexColumn { column_number: 1, ascending: true },
                IndexColumn { column_number: 2, ascending: true },
            ]
        );
        assert_eq!(tdef.logical_indexes[1].name, "ParentIdName");
        assert!(tdef.logical_indexes[0].is_primary_key());
        assert_eq!(tdef.logical_indexes[1].real_index, 1);
    }

    #[test]
    fn test_parse_jet3_catalog() {
        let page = msys_objects(FormatVersion::Jet3).page();
        assert_eq!(page.len(), 2048);
        let tdef = TableDefinitionPage::parse(&page, FormatVersion::Jet3).unwrap();
        assert_eq!(tdef.num_rows, 42);
        assert_eq!(tdef.columns[4].name, "DateCreate");
        assert_eq!(tdef.columns[4].column_type, ColumnType::DateTime);
        assert_eq!(tdef.logical_indexes[0].name, "Id");
    }

    #[test]
    fn test_jet3_names_map_bytes_as_latin1() {
        let data = [3u8, b'C', 0xE9, 0x80];
        let name = DefReader::new(&data).name(FormatVersion::Jet3, "name").unwrap();
        assert_eq!(name, "C\u{e9}\u{80}");
    }

    #[test]
    fn test_index_order_is_a_flag_bit() {
        let mut b = msys_objects(FormatVersion::Jet4);
        b.index_order = 0x81;
        let tdef = TableDefinitionPage::parse(&b.page(), FormatVersion::Jet4).unwrap();
        assert!(tdef.real_indexes[1].columns.iter().all(|c| c.ascending));

        b.index_order = 0x80;
        let tdef = TableDefinitionPage::parse(&b.page(), FormatVersion::Jet4).unwrap();
        assert!(tdef.real_indexes[1].columns.iter().all(|c| !c.ascending));
    }

    #[test]
    fn test_column_lookup_and_ordering() {
        let mut b = TdefBuilder::new(FormatVersion::Jet4)
            .column("Second", 0x04, 1, COLUMN_FLAG_FIXED, 4)
            .column("First", 0x04, 0, COLUMN_FLAG_FIXED, 4);
        b.table_type = TABLE_TYPE_USER;
        let tdef = TableDefinitionPage::parse(&b.page(), FormatVersion::Jet4).unwrap();
        assert!(!tdef.is_system_table());
        assert_eq!(tdef.column("first").unwrap().number, 0);
        let ordered: Vec<&str> = tdef.columns_by_number().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(ordered, vec!["First", "Second"]);
    }

    #[test]
    fn test_wrong_page_type_rejected() {
        let mut page = msys_objects(FormatVersion::Jet4).page();
        page[0] = PAGE_TYPE_DATA;
        assert!(matches!(
            TableDefinitionPage::parse(&page, FormatVersion::Jet4),
            Err(MdbError::MalformedTableDefinition(_))
        ));
    }

    #[test]
    fn test_unknown_table_type_rejected() {
        let mut b = msys_objects(FormatVersion::Jet4);
        b.table_type = 0x11;
        assert!(matches!(
            TableDefinitionPage::parse(&b.page(), FormatVersion::Jet4),
            Err(MdbError::MalformedTableDefinition(_))
        ));
    }

    #[test]
    fn test_column_count_past_page_rejected() {
        let mut page = msys_objects(FormatVersion::Jet3).page();
        let l = FormatVersion::Jet3.layout();
        LittleEndian::write_u16(&mut page[l.tdef_num_cols..], 500);
        LittleEndian::write_u16(&mut page[l.tdef_num_var_cols..], 0);
        let err = TableDefinitionPage::parse(&page, FormatVersion::Jet3).unwrap_err();
        assert!(err.to_string().contains("column entries"), "{}", err);
    }

    #[test]
    fn test_var_columns_exceeding_columns_rejected() {
        let mut page = msys_objects(FormatVersion::Jet4).page();
        let l = FormatVersion::Jet4.layout();
        LittleEndian::write_u16(&mut page[l.tdef_num_var_cols..], 9);
        assert!(TableDefinitionPage::parse(&page, FormatVersion::Jet4).is_err());
    }

    #[test]
    fn test_index_on_missing_column_rejected() {
        let mut b = msys_objects(FormatVersion::Jet4);
        b.real_indexes[0].1 = vec![99];
        assert!(matches!(
            TableDefinitionPage::parse(&b.page(), FormatVersion::Jet4),
            Err(MdbError::MalformedTableDefinition(_))
        ));
    }

    #[test]
    fn test_logical_index_on_missing_real_index_rejected() {
        let mut b = msys_objects(FormatVersion::Jet4);
        b.logical_indexes[1].1 = 5;
        assert!(TableDefinitionPage::parse(&b.page(), FormatVersion::Jet4).is_err());
    }

    #[test]
    fn test_huge_index_count_does_not_allocate() {
        let mut page = msys_objects(FormatVersion::Jet4).page();
        let l = FormatVersion::Jet4.layout();
        LittleEndian::write_u32(&mut page[l.tdef_num_real_idx..], u32::MAX);
        assert!(TableDefinitionPage::parse(&page, FormatVersion::Jet4).is_err());
    }

    #[test]
    fn test_parse_chain_across_continuation_page() {
        let version = FormatVersion::Jet3;
        let ps = version.page_size() as usize;
        let mut b = TdefBuilder::new(version);
        for i in 0..100u16 {
            b = b.column(&format!("Column{:02}", i), 0x04, i, COLUMN_FLAG_FIXED, 4);
        }
        let bytes = b.bytes();
        assert!(bytes.len() > ps, "definition must need two pages");

        let mut first = bytes[..ps].to_vec();
        LittleEndian::write_u32(&mut first[TDEF_NEXT_PAGE..], 9);
        let mut second = vec![0u8; ps];
        second[0] = PAGE_TYPE_TABLE_DEFINITION;
        second[1] = 0x01;
        let rest = &bytes[ps..];
        second[TDEF_CONTINUATION_HEADER..TDEF_CONTINUATION_HEADER + rest.len()].copy_from_slice(rest);

        assert!(TableDefinitionPage::parse(&first, version).is_err());

        let tdef = TableDefinitionPage::parse_chain(&[&first, &second], version).unwrap();
        assert_eq!(tdef.next_page, 9);
        assert_eq!(tdef.columns.len(), 100);
        assert_eq!(tdef.columns[99].name, "Column99");
        assert_eq!(next_page_of(&first), Some(9));
    }

    #[test]
    fn test_parse_chain_rejects_foreign_continuation() {
        let version = FormatVersion::Jet4;
        let first = msys_objects(version).page();
        let second = vec![PAGE_TYPE_DATA; version.page_size() as usize];
        assert!(matches!(
            TableDefinitionPage::parse_chain(&[&first, &second], version),
            Err(MdbError::MalformedTableDefinition(_))
        ));
    }

    #[test]
    fn test_column_type_codes() {
        assert_eq!(ColumnType::from_u8(0x0C), ColumnType::Memo);
        assert_eq!(ColumnType::from_u8(0x0F), ColumnType::Guid);
        assert_eq!(ColumnType::from_u8(0x0D), ColumnType::Unknown(0x0D));
        assert_eq!(ColumnType::Unknown(0x0D).to_string(), "Unknown(0x0d)");
    }
}
