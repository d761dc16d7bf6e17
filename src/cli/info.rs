use std::io::Write;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use colored::Colorize;
use serde::Serialize;

use crate::cli::{wprint, wprintln};
use crate::jet::catalog::Catalog;
use crate::jet::definition::DefinitionPage;
use crate::jet::table_definition::TableDefinitionPage;
use crate::jet::version::FormatVersion;
use crate::util::hex::format_hex32;
use crate::MdbError;

/// Options for the info subcommand.
pub struct InfoOptions {
    pub file: String,
    pub json: bool,
}

#[derive(Serialize)]
struct InfoJson<'a> {
    file: &'a str,
    version: FormatVersion,
    product: &'static str,
    page_size: u32,
    page_count: u64,
    creation_date: Option<String>,
    definition: &'a DefinitionPage,
    catalog: &'a TableDefinitionPage,
}

/// Open a database, decode page 0 and the `MSysObjects` definition, and print both.
///
/// The text report lists the format version, page geometry, header fields
/// (sort order, code page, encoding key, creation date) and the system
/// catalog's columns and indexes. `--json` emits the same data as one object.
pub fn execute(opts: &InfoOptions, writer: &mut dyn Write) -> Result<(), MdbError> {
    let mut catalog = Catalog::open(&opts.file)?;
    if let Err(e) = catalog.read() {
        catalog.close()?;
        return Err(e);
    }

    let (Some(def), Some(tdef)) = (catalog.definition_page(), catalog.catalog_table()) else {
        return Err(MdbError::Argument(format!("{} has not been read", opts.file)));
    };

    if opts.json {
        let info = InfoJson {
            file: &opts.file,
            version: catalog.version(),
            product: catalog.version().product_name(),
            page_size: catalog.page_size(),
            page_count: catalog.page_count(),
            creation_date: def.creation_date.and_then(format_ole_date),
            definition: def,
            catalog: tdef,
        };
        let json = serde_json::to_string_pretty(&info)
            .map_err(|e| MdbError::Io(format!("JSON serialization error: {}", e)))?;
        wprintln!(writer, "{}", json)?;
    } else {
        print_header(writer, &opts.file, &catalog, def)?;
        wprintln!(writer)?;
        print_table_definition(writer, "MSysObjects", tdef)?;
    }

    catalog.close()
}

fn print_header(
    writer: &mut dyn Write,
    file: &str,
    catalog: &Catalog,
    def: &DefinitionPage,
) -> Result<(), MdbError> {
    let version = catalog.version();
    wprintln!(writer, "{}", "Database Definition Page".bold())?;
    wprintln!(writer, "{}", "-".repeat(40))?;
    wprintln!(writer, "File:          {}", file)?;
    wprintln!(
        writer,
        "Format:        {} ({}, code 0x{:02x})",
        version,
        version.product_name(),
        version.code()
    )?;
    wprintln!(writer, "Engine:        {}", def.engine)?;
    wprintln!(writer, "Page Size:     {}", catalog.page_size())?;
    wprintln!(writer, "Page Count:    {}", catalog.page_count())?;
    wprintln!(writer, "Sort Order:    0x{:04x}", def.sort_order)?;
    wprintln!(writer, "Code Page:     {}", def.code_page)?;
    wprint!(writer, "Encoding Key:  {}", format_hex32(def.encoding_key))?;
    if def.is_encoded() {
        wprintln!(writer, " {}", "(encoded)".yellow())?;
    } else {
        wprintln!(writer)?;
    }
    match def.creation_date.and_then(format_ole_date) {
        Some(date) => wprintln!(writer, "Created:       {}", date)?,
        None => wprintln!(writer, "Created:       n/a")?,
    }
    Ok(())
}

fn print_table_definition(
    writer: &mut dyn Write,
    name: &str,
    tdef: &TableDefinitionPage,
) -> Result<(), MdbError> {
    let kind = if tdef.is_system_table() { "system" } else { "user" };
    wprintln!(writer, "{}", format!("Table Definition: {} ({})", name, kind).bold())?;
    wprintln!(writer, "{}", "-".repeat(40))?;
    wprintln!(writer, "Rows:             {}", tdef.num_rows)?;
    wprintln!(writer, "Columns:          {} ({} variable)", tdef.num_columns, tdef.num_var_columns)?;
    wprintln!(writer, "Real Indexes:     {}", tdef.num_real_indexes)?;
    wprintln!(writer, "Logical Indexes:  {}", tdef.num_indexes)?;
    if tdef.next_page != 0 {
        wprintln!(writer, "Continues On:     page {}", tdef.next_page)?;
    }
    wprintln!(writer)?;

    wprintln!(
        writer,
        "  {:>4}  {:<24} {:<16} {:>6}  {}",
        "#",
        "Name",
        "Type",
        "Length",
        "Flags"
    )?;
    for col in tdef.columns_by_number() {
        let mut flags = Vec::new();
        if col.is_fixed() {
            flags.push("fixed");
        }
        if col.is_nullable() {
            flags.push("nullable");
        }
        if col.is_auto_number() {
            flags.push("autonumber");
        }
        wprintln!(
            writer,
            "  {:>4}  {:<24} {:<16} {:>6}  {}",
            col.number,
            col.name,
            col.column_type.to_string(),
            col.length,
            flags.join(",")
        )?;
    }

    if !tdef.logical_indexes.is_empty() {
        wprintln!(writer)?;
        wprintln!(writer, "  Indexes:")?;
        for idx in &tdef.logical_indexes {
            let Some(real) = tdef.real_indexes.get(idx.real_index as usize) else {
                wprintln!(writer, "    {} (real index {} missing)", idx.name, idx.real_index)?;
                continue;
            };
            let columns: Vec<String> = real
                .columns
                .iter()
                .map(|ic| {
                    let name = tdef
                        .columns
                        .iter()
                        .find(|c| c.number == ic.column_number)
                        .map_or("?", |c| c.name.as_str());
                    if ic.ascending {
                        name.to_string()
                    } else {
                        format!("{} DESC", name)
                    }
                })
                .collect();
            let mut tags = Vec::new();
            if idx.is_primary_key() {
                tags.push("primary key".green().to_string());
            }
            if idx.is_foreign_key() {
                tags.push("foreign key".to_string());
            }
            if real.is_unique() {
                tags.push("unique".to_string());
            }
            if real.is_required() {
                tags.push("required".to_string());
            }
            if real.ignores_nulls() {
                tags.push("ignore-nulls".to_string());
            }
            wprintln!(
                writer,
                "    {} ({}) {}",
                idx.name,
                columns.join(", "),
                tags.join(" ")
            )?;
        }
    }
    Ok(())
}

/// Render an OLE automation date (days since 1899-12-30) as a timestamp.
fn format_ole_date(value: f64) -> Option<String> {
    if !value.is_finite() || value.abs() > 2_958_466.0 {
        return None;
    }
    let epoch: NaiveDateTime = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let days = value.trunc();
    let seconds = ((value - days).abs() * 86_400.0).round() as i64;
    let dt = epoch
        .checked_add_signed(TimeDelta::try_days(days as i64)?)?
        .checked_add_signed(TimeDelta::try_seconds(seconds)?)?;
    Some(dt.format("%Y-%m-%d %H:%M:%S").to_string())
}
