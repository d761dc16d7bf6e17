//! CLI subcommand implementations for the `mdbinfo` binary.
//!
//! Argument parsing uses clap derive macros. The top-level [`app::Cli`] struct
//! and [`app::Commands`] enum live in [`app`] and are shared between `main.rs`
//! and `build.rs` (for man page generation) via `include!()`.
//!
//! Each subcommand module has an `Options` struct holding the parsed arguments
//! and a `pub fn execute(opts, writer) -> Result<(), MdbError>` entry point. The
//! `writer: &mut dyn Write` parameter lets tests capture output and the global
//! `--output` flag redirect it to a file.
//!
//! | Command | Module | Purpose |
//! |---------|--------|---------|
//! | `mdbinfo info` | [`info`] | Version, definition page fields and `MSysObjects` schema |
//! | `mdbinfo pages` | [`pages`] | Page type of every page plus a summary table |
//! | `mdbinfo dump` | [`dump`] | Hex dump of one page |
//!
//! The `wprintln!` and `wprint!` macros wrap `writeln!`/`write!` to convert
//! `io::Error` into `MdbError`.

pub mod app;
pub mod dump;
pub mod info;
pub mod pages;

/// Write a line to the given writer, converting io::Error to MdbError.
macro_rules! wprintln {
    ($w:expr) => {
        writeln!($w).map_err(|e| $crate::MdbError::Io(e.to_string()))
    };
    ($w:expr, $($arg:tt)*) => {
        writeln!($w, $($arg)*).map_err(|e| $crate::MdbError::Io(e.to_string()))
    };
}

/// Write (without newline) to the given writer, converting io::Error to MdbError.
macro_rules! wprint {
    ($w:expr, $($arg:tt)*) => {
        write!($w, $($arg)*).map_err(|e| $crate::MdbError::Io(e.to_string()))
    };
}

pub(crate) use wprint;
pub(crate) use wprintln;

use indicatif::{ProgressBar, ProgressStyle};

/// Create a styled progress bar for iterating over pages.
pub(crate) fn create_progress_bar(count: u64, unit: &str) -> ProgressBar {
    let pb = ProgressBar::new(count);
    let style = ProgressStyle::default_bar()
        .template(&format!(
            "{{spinner:.green}} [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {} ({{eta}})",
            unit
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb
}
