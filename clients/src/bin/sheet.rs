//! `volvelle-sheet`: Works a checksum worksheet from the command line.
//!
//! Lays out a worksheet for the configured session, feeds it the given data
//! symbols one square at a time, and prints the finished grid with the
//! share string and its validity.
//!
//! **Usage:**
//! ```
//! volvelle-sheet [--config <file>] [--hrp <hrp>] [--threshold <k>]
//!                [--bits <n>] [--variant <codex32|bech32>]
//!                [--resume <snapshot>] [--data <symbols>] [--trace]
//!                [--snapshot <file>]
//! ```
//!
//! Exits non-zero if any entered symbol is rejected or contradicts the
//! worksheet.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use volvelle::{ActionKind, ChecksumVariant, Session};
use volvelle_clients::config::SheetConfig;
use volvelle_clients::render;

/// Work a codex32 or bech32 checksum worksheet.
#[derive(Parser)]
#[command(
    name = "volvelle-sheet",
    about = "Work a codex32 or bech32 checksum worksheet"
)]
struct Args {
    /// TOML file with session defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Human-readable prefix (default: ms).
    #[arg(long)]
    hrp: Option<String>,

    /// Share threshold digit, 2 to 9 (default: 2).
    #[arg(long)]
    threshold: Option<u8>,

    /// Secret size in bits (default: 128).
    #[arg(long)]
    bits: Option<u16>,

    /// Checksum code (default: codex32).
    #[arg(long)]
    variant: Option<ChecksumVariant>,

    /// Continue from a saved session instead of starting a new one.
    #[arg(long, conflicts_with_all = ["config", "hrp", "threshold", "bits", "variant"])]
    resume: Option<PathBuf>,

    /// Data part symbols to enter, in string order.
    #[arg(long, default_value = "")]
    data: String,

    /// Print the actions produced by each symbol.
    #[arg(long)]
    trace: bool,

    /// Save the session to this file when done.
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

fn open_session(args: &Args) -> Result<Session> {
    if let Some(path) = &args.resume {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        return Session::deserialize(&text)
            .with_context(|| format!("Failed to load session from {}", path.display()));
    }
    let file = match &args.config {
        Some(path) => SheetConfig::load(path)?,
        None => SheetConfig::default(),
    };
    let flags = SheetConfig {
        hrp: args.hrp.clone(),
        threshold: args.threshold,
        bits: args.bits,
        variant: args.variant,
    };
    Ok(Session::new(file.merge(flags).params()?)?)
}

fn main() -> Result<()> {
    volvelle_clients::init_logging();
    volvelle::init();
    let args = Args::parse();

    let mut session = open_session(&args)?;
    if session.share_count() == 0 {
        session.new_share();
    }
    let share = session.share_count() - 1;
    info!(share, params = ?session.params(), "worksheet ready");

    let mut cells: Vec<_> = session
        .worksheet_cells(share)?
        .into_iter()
        .filter(|c| c.kind.is_editable())
        .collect();
    cells.sort_by_key(|c| c.x);
    let symbols: Vec<char> = args.data.chars().filter(|c| !c.is_whitespace()).collect();
    if symbols.len() > cells.len() {
        bail!(
            "{} symbols given, the worksheet has {} squares",
            symbols.len(),
            cells.len()
        );
    }

    let mut errors = 0usize;
    for (cell, symbol) in cells.iter().zip(&symbols) {
        let trace = session.handle_input_change(&cell.id.to_string(), &symbol.to_string())?;
        errors += trace.count(ActionKind::Error);
        if args.trace {
            println!("{} <- {symbol}", cell.id);
            print!("{}", render::trace(&trace));
        }
    }

    println!("{}", render::grid(&session.worksheet_cells(share)?));
    println!("Header:  {}", session.header_summary(share)?);
    println!("Share:   {}", session.share_string(share)?);
    let status = match session.is_valid(share)? {
        Some(true) => "VALID",
        Some(false) => "INVALID",
        None => "INCOMPLETE",
    };
    println!("Status:  {status}");

    if let Some(path) = &args.snapshot {
        fs::write(path, session.serialize()?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "session saved");
    }

    if errors > 0 {
        eprintln!("{errors} rejected or contradicting entries");
        process::exit(1);
    }
    Ok(())
}
