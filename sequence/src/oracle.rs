//! Expected output of the `/dev/fibonacci` client.
//!
//! The client writes to the device `N + 1` times, then reads every offset
//! from `0` to `N` and back down again, printing one line per operation.
use core::fmt;
use core::str::FromStr;
use std::io::{self, Write};

use itertools::{chain, repeat_n};
use log::debug;
use num::BigUint;
use thiserror::Error;

use crate::fib::Sequence;

pub const DEVICE: &str = "/dev/fibonacci";

/// What the device's write handler returns, regardless of the buffer.
pub const DEFAULT_WRITE_ACK: i64 = 1;

/// The device clamps seeks to this offset.
pub const MAX_LENGTH: u64 = 10_000;

/// The offset the client reads up to.
pub const DEFAULT_OFFSET: u64 = 100;

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown radix `{0}`, expected `hex` or `decimal`")]
pub struct ParseRadixError(String);

/// Base the device reports values in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Radix {
    /// Uppercase, unpadded, no `0x` prefix.
    #[default]
    Hex,
    Decimal,
}

impl fmt::Display for Radix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Radix::Hex => "hex",
            Radix::Decimal => "decimal",
        })
    }
}

impl FromStr for Radix {
    type Err = ParseRadixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hex" => Ok(Radix::Hex),
            "decimal" => Ok(Radix::Decimal),
            other => Err(ParseRadixError(other.to_owned())),
        }
    }
}

/// One line of client output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Line<'a> {
    Write {
        ack: i64,
    },
    Read {
        offset: u64,
        value: &'a BigUint,
        radix: Radix,
    },
}

impl fmt::Display for Line<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Line::Write { ack } => write!(f, "Writing to {DEVICE}, returned the sequence {ack}"),
            Line::Read {
                offset,
                value,
                radix,
            } => {
                write!(f, "Reading from {DEVICE} at offset {offset}, returned the sequence ")?;
                match radix {
                    Radix::Hex => write!(f, "{value:X}.")?,
                    Radix::Decimal => write!(f, "{value}.")?,
                }
                Ok(())
            }
        }
    }
}

/// The full expected log for one client run.
#[derive(Clone, Debug)]
pub struct Oracle {
    sequence: Sequence,
    radix: Radix,
    write_ack: i64,
}

impl Oracle {
    #[must_use]
    pub fn new(sequence: Sequence) -> Self {
        Self {
            sequence,
            radix: Radix::default(),
            write_ack: DEFAULT_WRITE_ACK,
        }
    }

    #[must_use]
    pub fn with_radix(self, radix: Radix) -> Self { Self { radix, ..self } }

    #[must_use]
    pub fn with_write_ack(self, write_ack: i64) -> Self { Self { write_ack, ..self } }

    pub fn writes(&self) -> impl Iterator<Item = Line<'_>> {
        repeat_n(Line::Write { ack: self.write_ack }, self.sequence.len())
    }

    pub fn reads_ascending(&self) -> impl Iterator<Item = Line<'_>> {
        self.sequence.entries().map(|(offset, value)| self.read(offset, value))
    }

    pub fn reads_descending(&self) -> impl Iterator<Item = Line<'_>> {
        self.sequence
            .entries()
            .rev()
            .map(|(offset, value)| self.read(offset, value))
    }

    /// Every line in the order the client prints them.
    pub fn lines(&self) -> impl Iterator<Item = Line<'_>> {
        chain!(self.writes(), self.reads_ascending(), self.reads_descending())
    }

    /// Writes every line, `\n` terminated, returning how many were written.
    ///
    /// # Errors
    ///
    /// Errors if writing to `out` fails.
    pub fn write_to<W: Write>(&self, mut out: W) -> io::Result<usize> {
        let mut written = 0;
        for line in self.lines() {
            writeln!(out, "{line}")?;
            written += 1;
        }
        debug!("Wrote {written} lines up to offset {}", self.sequence.max_offset());
        Ok(written)
    }

    fn read<'a>(&self, offset: u64, value: &'a BigUint) -> Line<'a> {
        Line::Read {
            offset,
            value,
            radix: self.radix,
        }
    }
}
