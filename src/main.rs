use std::io;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crc16_nibble::crc16_ccitt;
use crc16_nibble::stream::{DEFAULT_CHUNK_SIZE, Summary, checksum_file, checksum_reader};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Lowercase hex, e.g. e5cc
    Hex,
    /// Uppercase hex, e.g. E5CC
    Upper,
    /// Decimal, e.g. 58828
    Dec,
    /// Big-endian bytes, e.g. "E5 CC"
    Bytes,
}

#[derive(Parser, Debug)]
#[command(
    name = "crc16",
    about = "CRC-16/CCITT (poly 0x1021, init 0x1D0F) checksum of files or stdin"
)]
struct Args {
    /// Input files. None or "-" reads standard input.
    #[arg(value_name = "FILE")]
    files: Vec<String>,

    /// Checksum this text instead of reading files
    #[arg(short, long, value_name = "TEXT", conflicts_with = "files")]
    string: Option<String>,

    /// Output format of the checksum
    #[arg(
        long,
        value_enum,
        env = "CRC16_FORMAT",
        default_value_t = Format::Hex
    )]
    format: Format,

    /// Read buffer size in bytes
    #[arg(
        long,
        value_name = "BYTES",
        env = "CRC16_CHUNK_SIZE",
        default_value_t = DEFAULT_CHUNK_SIZE,
        value_parser = parse_chunk_size
    )]
    chunk_size: usize,

    /// Print only the checksum, without the input name
    #[arg(short, long)]
    quiet: bool,
}

fn format_checksum(crc: u16, format: Format) -> String {
    match format {
        Format::Hex => format!("{crc:04x}"),
        Format::Upper => format!("{crc:04X}"),
        Format::Dec => crc.to_string(),
        Format::Bytes => {
            let [high, low] = crc.to_be_bytes();
            format!("{high:02X} {low:02X}")
        }
    }
}

fn parse_chunk_size(value: &str) -> Result<usize, String> {
    let size: usize = value.parse().map_err(|e| format!("{e}"))?;
    if size == 0 {
        return Err("chunk size must be greater than zero".to_string());
    }
    Ok(size)
}

fn render_line(crc: u16, name: &str, format: Format, quiet: bool) -> String {
    let checksum = format_checksum(crc, format);
    if quiet {
        checksum
    } else {
        format!("{checksum}  {name}")
    }
}

/// `-` reads from `stdin`; any other name is opened as a file.
fn checksum_input<R: Read>(name: &str, chunk_size: usize, stdin: R) -> Result<Summary> {
    if name == "-" {
        checksum_reader(stdin, chunk_size).context("Failed to read standard input")
    } else {
        checksum_file(Path::new(name), chunk_size)
            .with_context(|| format!("Failed to checksum '{name}'"))
    }
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout only carries checksums.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    if let Some(text) = &args.string {
        let crc = crc16_ccitt(text.as_bytes());
        info!(bytes = text.len(), crc, "checksummed string argument");
        let name = format!("\"{text}\"");
        println!("{}", render_line(crc, &name, args.format, args.quiet));
        return Ok(());
    }

    let inputs = if args.files.is_empty() {
        vec!["-".to_string()]
    } else {
        args.files.clone()
    };

    for name in &inputs {
        let summary = checksum_input(name, args.chunk_size, io::stdin().lock())?;
        info!(input = %name, bytes = summary.len, crc = %summary, "checksummed input");
        println!("{}", render_line(summary.crc, name, args.format, args.quiet));
    }

    Ok(())
}
