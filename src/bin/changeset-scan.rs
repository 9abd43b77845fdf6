//! Command-line interface for changeset-scan
//!
//! Usage:
//!   changeset-scan `<path>` [--start-date YYYY-MM-DD] [--report editors|comments|records|all]

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use log::{info, warn};
use memmap2::Mmap;

use changeset_scan::listener::{CommentRanking, EditorUsage, RecordCollector};
use changeset_scan::{peak_allocated_bytes, DecodeOptions, Dispatcher};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Report {
    Editors,
    Comments,
    Records,
    All,
}

#[derive(Debug, Parser)]
#[command(version, about = "Decode an OpenStreetMap changeset dump and print statistics")]
struct Args {
    /// Uncompressed changeset dump (changesets-*.osm)
    path: PathBuf,

    /// Only count changesets created on or after this date (YYYY-MM-DD)
    #[arg(long, short = 's')]
    start_date: Option<String>,

    /// Scan from the beginning instead of binary-searching to the start date
    #[arg(long)]
    no_seek: bool,

    /// Which report to print
    #[arg(long, short = 'r', value_enum, default_value = "editors")]
    report: Report,

    /// Number of rows for ranked reports
    #[arg(long, default_value_t = 100)]
    top: usize,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if args.path.extension().is_some_and(|ext| ext == "bz2") {
        bail!(
            "{} is compressed; decompress it first (e.g. `bunzip2 -k`)",
            args.path.display()
        );
    }
    let start_date = args.start_date.clone().unwrap_or_default();
    if !start_date.is_empty() && start_date.len() != 10 {
        warn!("start date {start_date:?} is not YYYY-MM-DD; comparing as a plain string");
    }

    let file = File::open(&args.path)
        .with_context(|| format!("failed to open {}", args.path.display()))?;
    // SAFETY: the dump is treated as read-only for the life of the map
    let mmap = unsafe { Mmap::map(&file) }
        .with_context(|| format!("failed to map {}", args.path.display()))?;
    #[cfg(unix)]
    if let Err(e) = mmap.advise(memmap2::Advice::Sequential) {
        warn!("madvise failed: {e}");
    }

    let wants = |r: Report| args.report == r || args.report == Report::All;
    let mut editors = EditorUsage::new();
    let mut comments = CommentRanking::new();
    let mut records = RecordCollector::new();

    let options = DecodeOptions::new()
        .with_start_date(start_date.as_str())
        .with_seek(!args.no_seek);
    let mut dispatcher = Dispatcher::new(options);
    if wants(Report::Editors) {
        dispatcher.add_listener(&mut editors);
    }
    if wants(Report::Comments) {
        dispatcher.add_listener(&mut comments);
    }
    if wants(Report::Records) {
        dispatcher.add_listener(&mut records);
    }

    let started = Instant::now();
    let summary = dispatcher
        .run(&mmap)
        .with_context(|| format!("failed to decode {}", args.path.display()))?;
    drop(dispatcher);

    info!(
        "{} changesets decoded, {} in range, started at byte {} of {} ({:.2?})",
        summary.decoded,
        summary.dispatched,
        summary.start_offset,
        mmap.len(),
        started.elapsed()
    );
    if let Some(peak) = peak_allocated_bytes() {
        info!("peak heap: {peak} bytes");
    }

    let mut out = BufWriter::new(io::stdout().lock());
    if wants(Report::Editors) {
        writeln!(out)?;
        editors.write_report(&mut out, 0.1)?;
    }
    if wants(Report::Comments) {
        writeln!(out)?;
        comments.write_report(&mut out, args.top)?;
    }
    if wants(Report::Records) {
        writeln!(out)?;
        for cs in records.records() {
            writeln!(
                out,
                "{:>10}  {}  {:<24}  {}",
                cs.id, cs.date, cs.user, cs.application
            )?;
        }
    }
    out.flush()?;
    Ok(())
}
