//! chaincalc CLI
//!
//! Thin argument-parsing shell around the sizing library: collects the
//! parameter specifications, runs the exploration, and prints the report.

use anyhow::Context;
use chaincalc::{explore, report, Schema};
use clap::Parser;
use std::io::{self, Write};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "chaincalc")]
#[command(about = "Size the head/chain hash index of a content-addressed block store")]
struct Args {
    /// Data file size sweep, e.g. "1g-64g" (doubling range, k/m/g/t suffixes)
    #[arg(long)]
    maxdatafile: String,

    /// Block size sweep, e.g. "4k-64k" (doubling range)
    #[arg(long)]
    blocksize: String,

    /// Acceptable collision interval sweep, e.g. "100-10000" (decade range)
    #[arg(long)]
    collisioninterval: String,

    /// Ceiling on initial (heads-only) memory, e.g. "64m"
    #[arg(long)]
    maxinitmem: Option<String>,

    /// Ceiling on worst-case total memory, e.g. "512m"
    #[arg(long)]
    maxtotalmem: Option<String>,

    /// Minimum chain capacity sweep (doubling range) [default: 4-8]
    #[arg(long)]
    minchainentries: Option<String>,

    /// Acceptable blocks-per-head window, e.g. "10-100" or "-100"
    #[arg(long)]
    minmaxblocksperhead: Option<String>,

    /// Emit the report as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut pairs: Vec<(&str, &str)> = vec![
        ("maxdatafile", args.maxdatafile.as_str()),
        ("blocksize", args.blocksize.as_str()),
        ("collisioninterval", args.collisioninterval.as_str()),
    ];
    if let Some(value) = args.maxinitmem.as_deref() {
        pairs.push(("maxinitmem", value));
    }
    if let Some(value) = args.maxtotalmem.as_deref() {
        pairs.push(("maxtotalmem", value));
    }
    if let Some(value) = args.minchainentries.as_deref() {
        pairs.push(("minchainentries", value));
    }
    if let Some(value) = args.minmaxblocksperhead.as_deref() {
        pairs.push(("minmaxblocksperhead", value));
    }
    debug!("collected {} parameter specifications", pairs.len());

    let schema = Schema::block_store();
    let layouts = explore(&schema, &pairs).context("exploration failed")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.json {
        let json = report::render_json(&layouts)?;
        writeln!(out, "{json}")?;
    } else {
        report::render_text(&mut out, &layouts)?;
    }

    Ok(())
}
