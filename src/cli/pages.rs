use std::collections::BTreeMap;
use std::io::Write;

use colored::Colorize;
use serde::Serialize;

use crate::cli::{create_progress_bar, wprintln};
use crate::jet::catalog::Catalog;
use crate::jet::page_types::PageType;
use crate::util::hex::format_offset;
use crate::MdbError;

/// Options for the pages subcommand.
pub struct PagesOptions {
    pub file: String,
    pub filter_type: Option<String>,
    pub json: bool,
}

#[derive(Serialize)]
struct PageJson {
    page_number: u64,
    offset: u64,
    page_type: &'static str,
    tag: u8,
}

#[derive(Serialize)]
struct PagesJson {
    file: String,
    version: String,
    page_size: u32,
    page_count: u64,
    pages: Vec<PageJson>,
    summary: BTreeMap<&'static str, u64>,
}

/// Walk every page and classify it by its type tag.
pub fn execute(opts: &PagesOptions, writer: &mut dyn Write) -> Result<(), MdbError> {
    let filter = match &opts.filter_type {
        Some(name) => Some(PageType::from_name(name).ok_or_else(|| {
            MdbError::Argument(format!(
                "Unknown page type '{}' (expected DEFINITION, DATA, TDEF, INDEX_NODE, INDEX_LEAF, USAGE_MAP)",
                name
            ))
        })?),
        None => None,
    };

    let mut catalog = Catalog::open(&opts.file)?;
    let version = catalog.version();
    let page_size = catalog.page_size();
    let page_count = catalog.page_count();

    let pb = if opts.json {
        indicatif::ProgressBar::hidden()
    } else {
        create_progress_bar(page_count, "pages")
    };

    let mut pages = Vec::new();
    let mut summary: BTreeMap<&'static str, u64> = BTreeMap::new();
    let scan = catalog.scanner_mut().for_each_page(|index, data| {
        pb.inc(1);
        let page_type = PageType::of_page(data);
        *summary.entry(page_type.name()).or_insert(0) += 1;
        if filter.map_or(true, |f| f == page_type) {
            pages.push((index, page_type));
        }
        Ok(())
    });
    pb.finish_and_clear();
    if let Err(e) = scan {
        catalog.close()?;
        return Err(e);
    }
    catalog.close()?;

    if opts.json {
        let out = PagesJson {
            file: opts.file.clone(),
            version: version.to_string(),
            page_size,
            page_count,
            pages: pages
                .iter()
                .map(|&(index, page_type)| PageJson {
                    page_number: index,
                    offset: index * page_size as u64,
                    page_type: page_type.name(),
                    tag: page_type.as_u8(),
                })
                .collect(),
            summary,
        };
        let json = serde_json::to_string_pretty(&out)
            .map_err(|e| MdbError::Io(format!("JSON serialization error: {}", e)))?;
        wprintln!(writer, "{}", json)?;
        return Ok(());
    }

    wprintln!(
        writer,
        "{} ({}, {} pages of {} bytes)",
        opts.file.bold(),
        version,
        page_count,
        page_size
    )?;
    wprintln!(writer)?;
    for (index, page_type) in &pages {
        let name = match page_type {
            PageType::Unknown(_) => page_type.name().red().to_string(),
            _ => page_type.name().to_string(),
        };
        wprintln!(
            writer,
            "Page {:>6}  offset {:<22} 0x{:02x} {:<12} {}",
            index,
            format_offset(index * page_size as u64),
            page_type.as_u8(),
            name,
            page_type.description()
        )?;
    }

    wprintln!(writer)?;
    wprintln!(writer, "{}", "Page Type Summary".bold())?;
    for (name, count) in &summary {
        wprintln!(writer, "  {:<12} {:>8}", name, count)?;
    }
    Ok(())
}
