#![deny(clippy::pedantic)]
#![deny(clippy::cargo)]
// `clio` uses an older `windows-sys` than our other dependencies.
#![allow(clippy::multiple_crate_versions)]
use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use clap::Parser;
use clio::Output;
use fibdrv_sequence::fib::Engine;
use fibdrv_sequence::oracle::{Oracle, Radix, DEFAULT_OFFSET, DEFAULT_WRITE_ACK, MAX_LENGTH};
use log::{debug, info};

/// Writes the log the `/dev/fibonacci` client is expected to print.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[clap(flatten)]
    verbose: clap_verbosity_flag::Verbosity,
    /// Where to write the expected log, `-` for stdout.
    #[arg(default_value = "expected_hex.txt")]
    output: Output,
    /// Largest offset the client reads.
    #[arg(long, default_value_t = DEFAULT_OFFSET, value_parser = parse_offset)]
    offset: u64,
    /// How to compute the sequence: `iterative` or `fast-doubling`.
    #[arg(long, default_value_t = Engine::default())]
    engine: Engine,
    /// Base the device reports values in: `hex` or `decimal`.
    #[arg(long, default_value_t = Radix::default())]
    radix: Radix,
    /// Value the device returns for every write.
    #[arg(long, default_value_t = DEFAULT_WRITE_ACK, allow_negative_numbers = true)]
    write_ack: i64,
}

fn parse_offset(arg: &str) -> Result<u64, String> {
    let offset: u64 = arg.parse().map_err(|e| format!("{e}"))?;
    if offset > MAX_LENGTH {
        return Err(format!("the device clamps offsets to {MAX_LENGTH}, got {offset}"));
    }
    Ok(offset)
}

fn write_oracle(oracle: &Oracle, output: &mut Output) -> io::Result<usize> {
    let mut writer = BufWriter::new(output);
    let lines = oracle.write_to(&mut writer)?;
    writer.flush()?;
    Ok(lines)
}

fn main() -> Result<()> {
    let Cli {
        verbose,
        mut output,
        offset,
        engine,
        radix,
        write_ack,
    } = Cli::parse();
    env_logger::Builder::new()
        .filter_level(verbose.log_level_filter())
        .init();

    let sequence = engine.sequence(offset);
    debug!("Computed {} values with the {engine} engine", sequence.len());
    let oracle = Oracle::new(sequence)
        .with_radix(radix)
        .with_write_ack(write_ack);

    let target = output.path().to_string_lossy().into_owned();
    let lines = write_oracle(&oracle, &mut output)
        .with_context(|| format!("failed to write expected output to {target}"))?;
    output
        .finish()
        .with_context(|| format!("failed to close {target}"))?;
    info!("Wrote {lines} {radix} lines to {target}");
    Ok(())
}
