//! CLI tool for zipnest archive operations.

mod commands;
mod exit_codes;
mod progress;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use zipnest::{Compression, NameDecoding, ProgressTree};

/// Shape-aware zip tool
#[derive(Parser)]
#[command(name = "zipnest")]
#[command(author, version, about = "Shape-aware zip tool", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Suppress progress output
    #[arg(long, short = 'q', global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an archive from a file or directory (alias: a)
    #[command(alias = "a")]
    Zip {
        /// File or directory to archive
        source: PathBuf,

        /// Archive file to create
        archive: PathBuf,

        /// Do not wrap a directory source in a folder named after it
        #[arg(long)]
        no_parent_dir: bool,

        /// Compression method
        #[arg(short = 'm', long, value_enum, default_value = "stored")]
        method: Method,
    },

    /// Extract an archive into a directory (alias: x)
    #[command(alias = "x")]
    Unzip {
        /// Archive file to extract
        archive: PathBuf,

        /// Output directory
        #[arg(short = 'o', long, default_value = ".")]
        output: PathBuf,

        /// Skip CRC-32 verification of extracted content
        #[arg(long)]
        skip_checksum: bool,

        /// How entry names without the UTF-8 flag are decoded
        #[arg(long, value_enum, default_value = "auto")]
        encoding: Encoding,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum Method {
    Stored,
    Deflate,
}

impl From<Method> for Compression {
    fn from(method: Method) -> Self {
        match method {
            Method::Stored => Compression::Stored,
            Method::Deflate => Compression::Deflated,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum Encoding {
    /// UTF-8 when flagged, CP437 otherwise
    Auto,
    Utf8,
    Cp437,
}

impl From<Encoding> for NameDecoding {
    fn from(encoding: Encoding) -> Self {
        match encoding {
            Encoding::Auto => NameDecoding::ContainerDefault,
            Encoding::Utf8 => NameDecoding::Utf8,
            Encoding::Cp437 => NameDecoding::Cp437,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // One tree per invocation; Ctrl+C flips its flag and the worker
    // winds down cooperatively (rolling back where the operation does).
    let progress = ProgressTree::new();
    {
        let progress = progress.clone();
        ctrlc::set_handler(move || {
            eprintln!("\nInterrupted, finishing up...");
            progress.cancel();
        })
        .ok();
    }

    let exit_code = match cli.command {
        Commands::Zip {
            source,
            archive,
            no_parent_dir,
            method,
        } => commands::zip(&commands::ZipConfig {
            source: &source,
            archive: &archive,
            keep_parent_dir: !no_parent_dir,
            compression: method.into(),
            quiet: cli.quiet,
            progress,
        }),

        Commands::Unzip {
            archive,
            output,
            skip_checksum,
            encoding,
        } => commands::unzip(&commands::UnzipConfig {
            archive: &archive,
            output: &output,
            skip_checksum,
            decoding: encoding.into(),
            quiet: cli.quiet,
            progress,
        }),
    };

    std::process::exit(exit_code.code());
}
