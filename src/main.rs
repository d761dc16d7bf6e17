#[cfg(not(feature = "cli"))]
compile_error!("The `mdbinfo` binary requires the `cli` feature. Build with `--features cli`.");

use clap::Parser;
use std::fs::File;
use std::io::Write;
use std::process;
use tracing_subscriber::EnvFilter;

use mdb::cli;
use mdb::cli::app::{Cli, ColorMode, Commands};
use mdb::MdbError;

fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match cli.color {
        ColorMode::Always => colored::control::set_override(true),
        ColorMode::Never => colored::control::set_override(false),
        ColorMode::Auto => {}
    }

    let writer_result: Result<Box<dyn Write>, MdbError> = match &cli.output {
        Some(path) => File::create(path)
            .map(|f| Box::new(f) as Box<dyn Write>)
            .map_err(|e| MdbError::Io(format!("Cannot create {}: {}", path, e))),
        None => Ok(Box::new(std::io::stdout()) as Box<dyn Write>),
    };

    let mut writer = match writer_result {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Info { file, json } => {
            cli::info::execute(&cli::info::InfoOptions { file, json }, &mut writer)
        }

        Commands::Pages {
            file,
            filter_type,
            json,
        } => cli::pages::execute(
            &cli::pages::PagesOptions {
                file,
                filter_type,
                json,
            },
            &mut writer,
        ),

        Commands::Dump {
            file,
            page,
            length,
            raw,
        } => cli::dump::execute(
            &cli::dump::DumpOptions {
                file,
                page,
                length,
                raw,
            },
            &mut writer,
        ),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "mdbinfo", &mut writer);
            Ok(())
        }
    };

    if let Err(e) = result.and_then(|()| writer.flush().map_err(|e| MdbError::Io(e.to_string())))
    {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// `RUST_LOG` wins when set; otherwise `--verbose` turns on debug output for the library.
fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("mdb=debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
