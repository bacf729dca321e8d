// src/main.rs
mod logger;

use anyhow::Context;
use clap::Parser;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "huffzip", version)]
#[command(about = "Zip and unzip files using Huffman coding.", long_about = None)]
struct Cli {
    /// Path to the input file
    input: PathBuf,
    /// Path to the output file
    output: PathBuf,
    /// Decode the input file instead of encoding it
    #[arg(short, long)]
    decode: bool,
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init(logger::level_for(cli.verbose, cli.quiet))?;

    let command = if cli.decode { "decode" } else { "encode" };
    let span = tracing::info_span!("command_execution", command, input = %cli.input.display());
    let _enter = span.enter();

    if cli.decode {
        decode_file(&cli.input, &cli.output)
    } else {
        encode_file(&cli.input, &cli.output)
    }
}

// Creating the output truncates it, so it must not be the input
fn ensure_distinct(input: &Path, output: &Path) -> anyhow::Result<()> {
    let input = fs::canonicalize(input).with_context(|| format!("opening {}", input.display()))?;
    if fs::canonicalize(output).is_ok_and(|output| output == input) {
        anyhow::bail!("input and output are the same file: {}", input.display());
    }
    Ok(())
}

// A failed run leaves no half-written output behind
fn discard_partial(output: &Path) {
    if let Err(e) = fs::remove_file(output) {
        warn!(output = %output.display(), error = %e, "could not remove partial output");
    }
}

fn encode_file(input: &Path, output: &Path) -> anyhow::Result<()> {
    ensure_distinct(input, output)?;
    let source = File::open(input).with_context(|| format!("opening {}", input.display()))?;
    let dest = File::create(output).with_context(|| format!("creating {}", output.display()))?;

    let stats = huffzip::encode(source, dest)
        .inspect_err(|_| discard_partial(output))
        .with_context(|| format!("encoding {}", input.display()))?;

    match stats.ratio() {
        Some(ratio) => info!(
            bytes_in = stats.input_bytes,
            bytes_out = stats.output_bytes(),
            ratio = %format!("{:.1}%", ratio * 100.0),
            "File encoded: {}",
            output.display()
        ),
        None => info!(bytes_out = stats.output_bytes(), "Empty file encoded: {}", output.display()),
    }
    Ok(())
}

fn decode_file(input: &Path, output: &Path) -> anyhow::Result<()> {
    ensure_distinct(input, output)?;
    let source = File::open(input).with_context(|| format!("opening {}", input.display()))?;
    let source = BufReader::new(source);
    let dest = File::create(output).with_context(|| format!("creating {}", output.display()))?;

    let stats = huffzip::decode(source, dest)
        .inspect_err(|_| discard_partial(output))
        .with_context(|| format!("decoding {}", input.display()))?;

    info!(bytes_out = stats.output_bytes, "File decoded: {}", output.display());
    Ok(())
}
