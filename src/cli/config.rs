// CLI configuration
use clap::{Parser, Subcommand, ValueEnum};

/// Oxiflac - FLAC metadata CLI tool
#[derive(Parser, Debug)]
#[command(name = "oxiflac")]
#[command(about = "Inspect and edit FLAC metadata blocks", long_about = None)]
#[command(version)]
#[command(author = "xwsjjctz <xwsjjctz@icloud.com>")]
pub struct Config {
    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty", global = true)]
    pub format: OutputFormat,

    /// Quiet mode (suppress progress messages)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    #[default]
    Pretty,
    /// Compact JSON
    Json,
    /// Key-value pairs
    KeyValue,
    /// Table format
    Table,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read a metadata summary from FLAC file(s)
    Read {
        /// FLAC file path(s)
        #[arg(value_name = "FILE", required = true)]
        files: Vec<String>,

        /// Output to file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Show stream and file information
    Info {
        /// FLAC file path(s)
        #[arg(value_name = "FILE", required = true)]
        files: Vec<String>,

        /// Also list every metadata block
        #[arg(short, long)]
        detailed: bool,
    },

    /// List the metadata blocks of a file
    Blocks {
        /// FLAC file path
        #[arg(value_name = "FILE")]
        file: String,

        /// Include raw payloads (base64) of untyped blocks
        #[arg(short, long)]
        payload: bool,
    },

    /// Print every value of a tag
    Get {
        /// FLAC file path
        #[arg(value_name = "FILE")]
        file: String,

        /// Field name (title, artist, year, ... or a raw Vorbis key)
        #[arg(value_name = "FIELD")]
        field: String,
    },

    /// Replace all values of a tag
    Set {
        /// FLAC file path
        #[arg(value_name = "FILE")]
        file: String,

        /// Field name
        #[arg(value_name = "FIELD")]
        field: String,

        /// New value
        #[arg(value_name = "VALUE")]
        value: String,
    },

    /// Append a value to a tag
    Add {
        /// FLAC file path
        #[arg(value_name = "FILE")]
        file: String,

        /// Field name
        #[arg(value_name = "FIELD")]
        field: String,

        /// Value to append
        #[arg(value_name = "VALUE")]
        value: String,
    },

    /// Remove every value of a tag
    Remove {
        /// FLAC file path
        #[arg(value_name = "FILE")]
        file: String,

        /// Field name
        #[arg(value_name = "FIELD")]
        field: String,
    },

    /// Export embedded pictures
    ExportCover {
        /// FLAC file path
        #[arg(value_name = "FILE")]
        file: String,

        /// Output directory for cover images
        #[arg(short, long)]
        output: String,

        /// Picture index (exports every picture when omitted)
        #[arg(short, long)]
        index: Option<usize>,
    },

    /// Read summaries for every file matching a pattern
    Batch {
        /// Directory path
        #[arg(short, long)]
        directory: String,

        /// File pattern (e.g. "*.flac")
        #[arg(short, long, default_value = "*.flac")]
        pattern: String,
    },
}
