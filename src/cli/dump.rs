use std::io::Write;

use crate::cli::wprintln;
use crate::jet::catalog::Catalog;
use crate::util::hex::hex_dump;
use crate::MdbError;

pub struct DumpOptions {
    pub file: String,
    pub page: Option<u64>,
    pub length: Option<usize>,
    pub raw: bool,
}

pub fn execute(opts: &DumpOptions, writer: &mut dyn Write) -> Result<(), MdbError> {
    let mut catalog = Catalog::open(&opts.file)?;
    let page_num = opts.page.unwrap_or(0);
    let fetched = catalog.scanner_mut().fetch(page_num);
    catalog.close()?;
    let page = fetched?;

    let dump_len = opts.length.unwrap_or(page.len()).min(page.len());
    let bytes = &page.bytes()[..dump_len];

    if opts.raw {
        writer
            .write_all(bytes)
            .map_err(|e| MdbError::Io(format!("Cannot write to stdout: {}", e)))?;
    } else {
        wprintln!(
            writer,
            "Hex dump of {} page {} ({} bytes):",
            opts.file,
            page.index(),
            dump_len
        )?;
        wprintln!(writer)?;
        wprintln!(writer, "{}", hex_dump(bytes, page.offset()))?;
    }

    Ok(())
}
