use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "mdbinfo")]
#[command(about = "Microsoft Jet/ACE database file analysis toolkit")]
#[command(version)]
pub struct Cli {
    /// Control colored output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Write output to a file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<String>,

    /// Log page reads and decoding steps to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show format version, header fields and the system catalog schema
    Info {
        /// Path to database file (.mdb/.accdb)
        #[arg(short, long)]
        file: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Classify every page and summarize page types
    Pages {
        /// Path to database file (.mdb/.accdb)
        #[arg(short, long)]
        file: String,

        /// Only list pages of this type (e.g. TDEF, DATA, INDEX_LEAF)
        #[arg(short = 't', long = "type")]
        filter_type: Option<String>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Hex dump of raw page bytes
    Dump {
        /// Path to database file (.mdb/.accdb)
        #[arg(short, long)]
        file: String,

        /// Page number to dump (default: 0)
        #[arg(short, long)]
        page: Option<u64>,

        /// Number of bytes to dump (default: whole page)
        #[arg(short, long)]
        length: Option<usize>,

        /// Output raw binary bytes (no formatting)
        #[arg(long)]
        raw: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}
