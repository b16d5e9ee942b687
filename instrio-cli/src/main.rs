use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use instrio_core::{
    discover_library, from_ieee_block, parse_ascii, parse_binary, to_ieee_block,
    ArchitectureCache, ElementFormat, Endianness, FoundBy, LibraryPath, Platform,
};
use serde::Serialize;
use std::io::Write;
use tabled::{Table, Tabled};

/// Instrument data block tools
#[derive(Parser)]
#[command(
    name = "instrio",
    about = "Encode and decode instrument data blocks, and inspect I/O libraries",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct Packing {
    /// Elements are 4-byte floats instead of 8-byte doubles
    #[arg(long)]
    single: bool,

    /// Payload is big-endian
    #[arg(long)]
    big_endian: bool,
}

impl Packing {
    fn format(&self) -> ElementFormat {
        if self.single {
            ElementFormat::Single
        } else {
            ElementFormat::Double
        }
    }

    fn endianness(&self) -> Endianness {
        Endianness::from_big_endian(self.big_endian)
    }
}

#[derive(Subcommand)]
enum Command {
    /// Show which word sizes shared libraries were built for
    Arch {
        #[arg(required = true)]
        paths: Vec<std::path::PathBuf>,

        #[arg(long)]
        json: bool,
    },
    /// Encode numbers as a definite-length binary block
    Encode {
        #[command(flatten)]
        packing: Packing,

        /// Write the block here instead of stdout
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,

        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<f64>,
    },
    /// Decode a binary block or ASCII reply from a file
    Decode {
        path: std::path::PathBuf,

        #[command(flatten)]
        packing: Packing,

        /// Use the legacy block decoder
        #[arg(long, conflicts_with = "ascii")]
        legacy: bool,

        /// Treat the file as an ASCII numeric reply
        #[arg(long)]
        ascii: bool,
    },
    /// Report the configured I/O library and its bitness
    Info {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Tabled)]
struct ArchRow {
    #[tabled(rename = "Library")]
    path: String,
    #[tabled(rename = "Found by")]
    found_by: String,
    #[tabled(rename = "Bitness")]
    bitness: String,
}

impl From<&LibraryPath> for ArchRow {
    fn from(lib: &LibraryPath) -> Self {
        Self {
            path: lib.to_string(),
            found_by: lib.found_by.to_string(),
            bitness: lib.bitness(),
        }
    }
}

#[derive(Serialize)]
struct Report<'a> {
    platform: String,
    library: Option<&'a LibraryPath>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Arch { paths, json } => {
            let mut cache = ArchitectureCache::new();
            let libraries: Vec<LibraryPath> = paths
                .into_iter()
                .map(|p| LibraryPath::new(p, FoundBy::Explicit).with_cached_architecture(&mut cache))
                .collect();
            log::debug!("Probed {} distinct paths", cache.len());

            if json {
                println!("{}", serde_json::to_string_pretty(&libraries)?);
            } else {
                let rows: Vec<ArchRow> = libraries.iter().map(ArchRow::from).collect();
                println!("{}", Table::new(rows));
            }
        }

        Command::Encode {
            packing,
            output,
            values,
        } => {
            let block = to_ieee_block(&values, packing.format(), packing.endianness())?;
            log::debug!("Encoded {} values into {} bytes", values.len(), block.len());
            match output {
                Some(path) => std::fs::write(&path, &block)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => std::io::stdout().lock().write_all(&block)?,
            }
        }

        Command::Decode {
            path,
            packing,
            legacy,
            ascii,
        } => {
            let data =
                std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?;

            let values = if ascii {
                parse_ascii(&String::from_utf8_lossy(&data))
            } else if legacy {
                parse_binary(&data, packing.big_endian, packing.single)?
            } else {
                from_ieee_block(&data, packing.format(), packing.endianness())?
            };

            log::debug!("Decoded {} values from {}", values.len(), path.display());
            if values.is_empty() {
                println!("No values found.");
            }
            for value in values {
                println!("{value}");
            }
        }

        Command::Info { json } => {
            let library = discover_library()?.map(LibraryPath::with_architecture);
            match &library {
                Some(lib) => log::debug!("Resolved library {} (found by {})", lib, lib.found_by),
                None => log::debug!("No library configured"),
            }
            let report = Report {
                platform: Platform::current().to_string(),
                library: library.as_ref(),
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }

            println!("{}", "Machine".bold());
            println!("   Platform: {}", report.platform);
            println!();
            println!("{}", "I/O library".bold());
            match report.library {
                Some(lib) => println!("{}", Table::new([ArchRow::from(lib)])),
                None => println!("   {}", "Not found.".yellow()),
            }
        }
    }

    Ok(())
}

