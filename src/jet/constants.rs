/// Jet/ACE page and file structure constants.
///
/// Offsets are byte positions within a page. Everything that differs between
/// the Jet3 family (Access 97) and the Jet4 family (Access 2000 and every ACE
/// release) lives in one [`JetLayout`] table per family so that page size and
/// field offsets for a version are always read from the same place.
// File-level constants
pub const VERSION_OFFSET: u64 = 0x14; // 1 byte - format version code
pub const MAX_PAGE_SIZE: u32 = 4096;

// Version codes (byte at VERSION_OFFSET)
pub const VERSION_CODE_JET3: u8 = 0x00;
pub const VERSION_CODE_JET4: u8 = 0x01;
pub const VERSION_CODE_ACE12: u8 = 0x02;
pub const VERSION_CODE_ACE14: u8 = 0x03;
pub const VERSION_CODE_ACE16: u8 = 0x05;
pub const VERSION_CODE_ACE17: u8 = 0x06;

// Page type tags (first byte of every page)
pub const PAGE_TYPE_DEFINITION: u8 = 0x00;
pub const PAGE_TYPE_DATA: u8 = 0x01;
pub const PAGE_TYPE_TABLE_DEFINITION: u8 = 0x02;
pub const PAGE_TYPE_INDEX_INTERMEDIATE: u8 = 0x03;
pub const PAGE_TYPE_INDEX_LEAF: u8 = 0x04;
pub const PAGE_TYPE_USAGE_MAP: u8 = 0x05;

// Definition page (page 0)
pub const DEF_MAGIC: [u8; 4] = [0x00, 0x01, 0x00, 0x00];
pub const DEF_ENGINE_NAME: usize = 0x04; // 15 bytes - engine identifier
pub const DEF_ENGINE_NAME_LEN: usize = 15;
pub const DEF_VERSION: usize = 0x14; // 4 bytes - version code
pub const DEF_MASKED_HEADER: usize = 0x18; // start of the RC4-masked region
pub const DEF_CODE_PAGE: usize = 0x3C; // 2 bytes
pub const DEF_ENCODING_KEY: usize = 0x3E; // 4 bytes - non-zero when data pages are encoded
pub const DEF_MASK_KEY: u32 = 0x6b39dac7;
pub const ENGINE_JET: &[u8; 15] = b"Standard Jet DB";
pub const ENGINE_ACE: &[u8; 15] = b"Standard ACE DB";

// System catalog
pub const MSYS_OBJECTS_PAGE: u64 = 2;

// Table definition page
pub const TDEF_PAGE_TYPE: usize = 0; // 1 byte - 0x02
pub const TDEF_NEXT_PAGE: usize = 4; // 4 bytes - continuation page (0 if none)
pub const TDEF_LENGTH: usize = 8; // 4 bytes - total definition length
pub const TDEF_CONTINUATION_HEADER: usize = 8; // data offset on continuation pages
pub const TABLE_TYPE_USER: u8 = 0x4E;
pub const TABLE_TYPE_SYSTEM: u8 = 0x53;
pub const INDEX_COLUMN_SLOTS: usize = 10;
pub const INDEX_COLUMN_UNUSED: u16 = 0xFFFF;
pub const INDEX_ORDER_ASCENDING: u8 = 0x01; // order byte flag of an index column slot

// Column flag bits
pub const COLUMN_FLAG_FIXED: u8 = 0x01;
pub const COLUMN_FLAG_NULLABLE: u8 = 0x02;
pub const COLUMN_FLAG_AUTO_NUMBER: u8 = 0x04;

// Real index flag bits
pub const INDEX_FLAG_UNIQUE: u8 = 0x01;
pub const INDEX_FLAG_IGNORE_NULLS: u8 = 0x02;
pub const INDEX_FLAG_REQUIRED: u8 = 0x08;

// Logical index types
pub const INDEX_TYPE_PRIMARY_KEY: u8 = 0x01;
pub const INDEX_TYPE_FOREIGN_KEY: u8 = 0x02;

/// Page size and field offsets for one layout family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JetLayout {
    pub page_size: u32,

    // Definition page
    pub def_masked_len: usize,
    pub def_sort_order: usize,
    pub def_creation_date: Option<usize>,

    // Table definition header
    pub tdef_num_rows: usize,
    pub tdef_autonumber: usize,
    pub tdef_table_type: usize,
    pub tdef_max_cols: usize,
    pub tdef_num_var_cols: usize,
    pub tdef_num_cols: usize,
    pub tdef_num_idx: usize,
    pub tdef_num_real_idx: usize,
    pub tdef_usage_map: usize,
    pub tdef_free_map: usize,
    pub tdef_cols_start: usize,

    // Real index entries (immediately after the header)
    pub real_idx_entry_size: usize,
    pub real_idx_num_rows: usize,

    // Column entries
    pub col_entry_size: usize,
    pub col_num: usize,
    pub col_var_offset: usize,
    pub col_row_col_num: usize,
    pub col_flags: usize,
    pub col_fixed_offset: usize,
    pub col_size: usize,

    /// Width of the length prefix on column and index names.
    pub name_len_size: usize,

    // Real index column maps
    pub idx_def_size: usize,
    pub idx_def_columns: usize,
    pub idx_def_usage_map: usize,
    pub idx_def_first_dp: usize,
    pub idx_def_flags: usize,

    // Logical index entries
    pub logical_idx_size: usize,
    pub logical_idx_num: usize,
    pub logical_idx_real_num: usize,
    pub logical_idx_type: usize,
}

/// Access 97 layout.
pub const JET3_LAYOUT: JetLayout = JetLayout {
    page_size: 2048,

    def_masked_len: 126,
    def_sort_order: 0x3A,
    def_creation_date: None,

    tdef_num_rows: 12,
    tdef_autonumber: 16,
    tdef_table_type: 20,
    tdef_max_cols: 21,
    tdef_num_var_cols: 23,
    tdef_num_cols: 25,
    tdef_num_idx: 27,
    tdef_num_real_idx: 31,
    tdef_usage_map: 35,
    tdef_free_map: 39,
    tdef_cols_start: 43,

    real_idx_entry_size: 8,
    real_idx_num_rows: 4,

    col_entry_size: 18,
    col_num: 1,
    col_var_offset: 3,
    col_row_col_num: 5,
    col_flags: 13,
    col_fixed_offset: 14,
    col_size: 16,

    name_len_size: 1,

    idx_def_size: 39,
    idx_def_columns: 0,
    idx_def_usage_map: 30,
    idx_def_first_dp: 34,
    idx_def_flags: 38,

    logical_idx_size: 20,
    logical_idx_num: 0,
    logical_idx_real_num: 4,
    logical_idx_type: 19,
};

/// Access 2000 and later layout (Jet4 and every ACE release).
pub const JET4_LAYOUT: JetLayout = JetLayout {
    page_size: 4096,

    def_masked_len: 128,
    def_sort_order: 0x6E,
    def_creation_date: Some(0x72),

    tdef_num_rows: 16,
    tdef_autonumber: 20,
    tdef_table_type: 40,
    tdef_max_cols: 41,
    tdef_num_var_cols: 43,
    tdef_num_cols: 45,
    tdef_num_idx: 47,
    tdef_num_real_idx: 51,
    tdef_usage_map: 55,
    tdef_free_map: 59,
    tdef_cols_start: 63,

    real_idx_entry_size: 12,
    real_idx_num_rows: 4,

    col_entry_size: 25,
    col_num: 5,
    col_var_offset: 7,
    col_row_col_num: 9,
    col_flags: 15,
    col_fixed_offset: 21,
    col_size: 23,

    name_len_size: 2,

    idx_def_size: 52,
    idx_def_columns: 4,
    idx_def_usage_map: 34,
    idx_def_first_dp: 38,
    idx_def_flags: 42,

    logical_idx_size: 28,
    logical_idx_num: 4,
    logical_idx_real_num: 8,
    logical_idx_type: 23,
};
