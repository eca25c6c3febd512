//! `volvelle-check`: Verifies the checksum of codex32 and bech32 strings.
//!
//! Each string is split at its last `1` into prefix and data part. The
//! checksum code is taken from `--variant`, or guessed from the prefix
//! (`ms` is codex32, anything else bech32).
//!
//! **Usage:**
//! ```
//! volvelle-check [--variant <codex32|bech32>] <STRING>...
//! ```
//!
//! Exits non-zero if any string is malformed or fails its checksum.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::process;

use anyhow::Result;
use clap::Parser;
use volvelle::ChecksumVariant;
use volvelle_clients::verify::check;

/// Check codex32 and bech32 strings.
#[derive(Parser)]
#[command(
    name = "volvelle-check",
    about = "Verify the checksum of codex32 and bech32 strings"
)]
struct Args {
    /// Checksum code; guessed from the prefix when omitted.
    #[arg(long)]
    variant: Option<ChecksumVariant>,

    /// Strings to check.
    #[arg(required = true)]
    strings: Vec<String>,
}

fn main() -> Result<()> {
    volvelle_clients::init_logging();
    volvelle::init();
    let args = Args::parse();

    let mut failed = 0usize;
    for input in &args.strings {
        match check(input, args.variant) {
            Ok(checked) if checked.is_valid() => println!("VALID    {input}"),
            Ok(checked) => {
                failed += 1;
                println!("INVALID  {input}  residue {}", checked.residue);
            }
            Err(e) => {
                failed += 1;
                println!("ERROR    {input}  {e}");
            }
        }
    }

    println!();
    println!("{} checked, {failed} failed", args.strings.len());

    if failed > 0 {
        process::exit(1);
    }
    Ok(())
}
