pub mod batch;
pub mod city;
pub mod config;
pub mod dates;
pub mod format;
pub mod line;
pub mod normalize;
pub mod sanitize;
pub mod store;

use batch::ParsedRecord;
use config::Config;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Records only, for callers that do not need the per-line diagnostics.
pub fn parse_delivery_dates(text: &str, config: &Config) -> Vec<ParsedRecord> {
    batch::parse_batch(text, config).records
}

/// Concatenate the given files, newline-separated; `-` or no input reads stdin.
pub fn read_inputs(inputs: &[PathBuf]) -> io::Result<Vec<u8>> {
    if inputs.is_empty() {
        return read_stdin();
    }

    let mut out: Vec<u8> = Vec::new();
    for p in inputs {
        if !out.is_empty() {
            out.push(b'\n');
        }
        if p == Path::new("-") {
            out.extend(read_stdin()?);
        } else {
            out.extend(std::fs::read(p)?);
        }
    }
    Ok(out)
}

fn read_stdin() -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    io::stdin().read_to_end(&mut buf)?;
    Ok(buf)
}
