//! CLI definitions and handlers

mod output;
mod scan;

use anyhow::{Context, Result};
use clap::Parser;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use chardetect::config::{load_config_file, load_detector_config};
use chardetect::DetectorConfig;

pub use output::OutputFormat;

/// Parse and validate workers count (1-64)
fn parse_workers(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("workers must be at least 1".to_string())
    } else if n > 64 {
        Err("workers cannot exceed 64".to_string())
    } else {
        Ok(n)
    }
}

/// chardetect - guess the character encoding of files
#[derive(Parser, Debug)]
#[command(name = "chardetect")]
#[command(
    version,
    about = "Guess the character encoding of files from their bytes alone",
    after_help = "\
Examples:
  chardetect notes.txt                    Print encoding and confidence
  chardetect *.txt --format json          JSON array for scripting
  chardetect legacy.csv --minimal         Encoding name only
  chardetect huge.log --stream            Feed line by line, stop when sure"
)]
pub struct Cli {
    /// Files to inspect
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format: text or json
    #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Print only the encoding name
    #[arg(long)]
    pub minimal: bool,

    /// Feed input line by line and stop as soon as the answer is settled
    #[arg(long)]
    pub stream: bool,

    /// Config file (default: chardetect.toml or .chardetectrc.json in the current directory)
    #[arg(long, env = "CHARDETECT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Number of parallel workers (1-64)
    #[arg(long, global = true, default_value = "8", value_parser = parse_workers)]
    pub workers: usize,
}

fn resolve_config(explicit: Option<&Path>) -> Result<DetectorConfig> {
    match explicit {
        Some(path) => load_config_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(load_detector_config(Path::new("."))),
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(cli.config.as_deref())?;
    let format: OutputFormat = if cli.minimal {
        OutputFormat::Minimal
    } else {
        cli.format.parse()?
    };

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(cli.workers)
        .build()?;

    // par_iter + collect keeps input order
    let reports: Vec<scan::FileReport> = pool.install(|| {
        cli.files
            .par_iter()
            .map(|path| scan::scan_path(path, &config, cli.stream))
            .collect()
    });

    let mut failures = 0usize;
    for report in &reports {
        if let Err(e) = &report.outcome {
            failures += 1;
            warn!("Skipping {}: {:#}", report.path.display(), e);
            eprintln!("{}: error: {:#}", report.path.display(), e);
        }
    }

    let rendered = output::render(&reports, format)?;
    if !rendered.is_empty() {
        println!("{}", rendered);
    }

    info!(
        "Inspected {} file(s), {} unreadable",
        reports.len(),
        failures
    );
    if failures > 0 {
        std::process::exit(1);
    }
    Ok(())
}
